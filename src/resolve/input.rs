use crate::json_ext::Path;
use crate::resolve::ScalarPath;
use crate::scalars::ScalarMap;
use crate::spec::{FieldType, Query, Schema};

/// Resolve every variable position holding a scalar with an encode transform.
///
/// Covers every variable definition of every operation in the document,
/// descending through input object types in declaration order. List and
/// non-null wrappers never add path segments. Purely static: a pure function
/// of the document, the schema and the registered type names.
pub fn resolve_input_paths(query: &Query, schema: &Schema, scalars: &ScalarMap) -> Vec<ScalarPath> {
    let mut paths = Vec::new();
    for operation in &query.operations {
        for (variable, ty) in &operation.variables {
            let mut path = Path::empty();
            path.push(variable.as_str());
            let mut visited = Vec::new();
            resolve_variable_type(ty, &mut path, schema, scalars, &mut visited, &mut paths);
        }
    }
    paths
}

fn resolve_variable_type<'a>(
    ty: &'a FieldType,
    path: &mut Path,
    schema: &'a Schema,
    scalars: &ScalarMap,
    visited: &mut Vec<&'a str>,
    paths: &mut Vec<ScalarPath>,
) {
    match ty {
        // lists are handled by the mapper's array transparency, non-null is
        // irrelevant to where values live
        FieldType::List(inner) | FieldType::NonNull(inner) => {
            resolve_variable_type(inner, path, schema, scalars, visited, paths)
        }
        ty => {
            if let Some(type_name) = ty.scalar_type_name(schema) {
                if scalars.has_encoder(type_name) {
                    paths.push(ScalarPath {
                        type_name: type_name.to_string(),
                        path: path.clone(),
                    });
                }
            } else if let FieldType::Named(name) = ty {
                if schema.enums.contains(name) {
                    // enums need no transform
                } else if let Some(input_type) = schema.input_types.get(name) {
                    // a type already on the descent is a legal recursive
                    // input type; it contributes nothing further
                    if visited.iter().any(|visited_name| *visited_name == name) {
                        return;
                    }
                    visited.push(name);
                    for (field_name, field_type) in input_type.fields() {
                        path.push(field_name.as_str());
                        resolve_variable_type(field_type, path, schema, scalars, visited, paths);
                        path.pop();
                    }
                    visited.pop();
                } else {
                    failfast_debug!("unknown type '{}' in a variable definition", name);
                }
            }
        }
    }
}
