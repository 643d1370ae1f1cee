use std::collections::HashMap;

use crate::json_ext::Path;
use crate::resolve::ScalarPath;
use crate::scalars::ScalarMap;
use crate::spec::{Fragments, Query, Schema, Selection};

/// Resolve every response position holding a scalar with a decode transform.
///
/// Covers every operation's selection set in the document. Paths are
/// sequences of response keys (alias if present, else field name) relative to
/// the top-level response object; inline fragments add no segment, named
/// fragment spreads are expanded in place. Result order is document order,
/// depth first.
pub fn resolve_output_paths(query: &Query, schema: &Schema, scalars: &ScalarMap) -> Vec<ScalarPath> {
    let mut parameters = ResolveParameters {
        schema,
        scalars,
        fragments: &query.fragments,
        resolved_fragments: HashMap::new(),
        fragment_stack: Vec::new(),
    };

    let mut paths = Vec::new();
    for operation in &query.operations {
        let mut prefix = Path::empty();
        resolve_selection_set(
            &operation.selection_set,
            &mut prefix,
            &mut parameters,
            &mut paths,
        );
    }
    paths
}

struct ResolveParameters<'a> {
    schema: &'a Schema,
    scalars: &'a ScalarMap,
    fragments: &'a Fragments,
    /// Occurrence lists per fragment, relative to the fragment root, so each
    /// fragment is resolved once no matter how often it is spread.
    resolved_fragments: HashMap<String, Vec<ScalarPath>>,
    /// Fragments on the current expansion path; a name found here again is a
    /// cycle and contributes nothing further.
    fragment_stack: Vec<String>,
}

fn resolve_selection_set(
    selection_set: &[Selection],
    prefix: &mut Path,
    parameters: &mut ResolveParameters<'_>,
    paths: &mut Vec<ScalarPath>,
) {
    for selection in selection_set {
        match selection {
            Selection::Field {
                name,
                alias,
                field_type,
                selection_set,
            } => {
                let response_key = alias.as_deref().unwrap_or(name.as_str());
                if let Some(type_name) = field_type.scalar_type_name(parameters.schema) {
                    if parameters.scalars.has_decoder(type_name) {
                        let mut path = prefix.clone();
                        path.push(response_key);
                        paths.push(ScalarPath {
                            type_name: type_name.to_string(),
                            path,
                        });
                    }
                } else if let Some(selection_set) = selection_set {
                    prefix.push(response_key);
                    resolve_selection_set(selection_set, prefix, parameters, paths);
                    prefix.pop();
                }
            }
            Selection::InlineFragment { selection_set } => {
                resolve_selection_set(selection_set, prefix, parameters, paths);
            }
            Selection::FragmentSpread { name } => {
                for occurrence in resolve_fragment(name, parameters) {
                    paths.push(ScalarPath {
                        type_name: occurrence.type_name,
                        path: prefix.join(&occurrence.path),
                    });
                }
            }
        }
    }
}

fn resolve_fragment(name: &str, parameters: &mut ResolveParameters<'_>) -> Vec<ScalarPath> {
    if parameters.fragment_stack.iter().any(|n| n == name) {
        // legal self reference, direct or transitive
        return Vec::new();
    }
    if let Some(resolved) = parameters.resolved_fragments.get(name) {
        return resolved.clone();
    }

    let fragments = parameters.fragments;
    let fragment = match fragments.get(name) {
        Some(fragment) => fragment,
        None => {
            failfast_debug!("missing fragment named: {}", name);
            return Vec::new();
        }
    };

    parameters.fragment_stack.push(name.to_string());
    let mut occurrences = Vec::new();
    let mut prefix = Path::empty();
    resolve_selection_set(
        &fragment.selection_set,
        &mut prefix,
        parameters,
        &mut occurrences,
    );
    parameters.fragment_stack.pop();

    parameters
        .resolved_fragments
        .insert(name.to_string(), occurrences.clone());
    occurrences
}
