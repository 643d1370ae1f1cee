use apollo_parser::ast;

use crate::spec::{FieldType, Schema};

/// A selection with the schema type of every field already resolved.
///
/// `Selection::from_ast` carries the current type down the AST, so the type
/// applicable at any position is always an explicit parameter rather than
/// traversal state.
#[derive(Debug, Clone)]
pub(crate) enum Selection {
    Field {
        name: String,
        alias: Option<String>,
        field_type: FieldType,
        selection_set: Option<Vec<Selection>>,
    },
    InlineFragment {
        selection_set: Vec<Selection>,
    },
    FragmentSpread {
        name: String,
    },
}

impl Selection {
    pub(crate) fn from_ast(
        selection: ast::Selection,
        current_type: &FieldType,
        schema: &Schema,
    ) -> Option<Self> {
        match selection {
            // Spec: https://spec.graphql.org/draft/#Field
            ast::Selection::Field(field) => {
                let name = field
                    .name()
                    .expect("the node Name is not optional in the spec; qed")
                    .text()
                    .to_string();
                // Meta fields such as __typename are not part of the schema
                // and are never custom scalars.
                if name.starts_with("__") {
                    return None;
                }
                let alias = field.alias().map(|alias| {
                    alias
                        .name()
                        .expect("the node Name is not optional in the spec; qed")
                        .text()
                        .to_string()
                });

                let field_type = match current_type
                    .inner_type_name()
                    .and_then(|type_name| schema.object_types.get(type_name))
                    .and_then(|object_type| object_type.field(&name))
                {
                    Some(field_type) => field_type.clone(),
                    None => {
                        failfast_debug!(
                            "cannot query field '{}' on type '{}'",
                            name,
                            current_type,
                        );
                        return None;
                    }
                };

                let selection_set = if field_type.is_builtin_scalar() {
                    None
                } else {
                    field.selection_set().map(|selection_set| {
                        selection_set
                            .selections()
                            .filter_map(|selection| {
                                Selection::from_ast(selection, &field_type, schema)
                            })
                            .collect()
                    })
                };

                Some(Self::Field {
                    name,
                    alias,
                    field_type,
                    selection_set,
                })
            }
            // Spec: https://spec.graphql.org/draft/#InlineFragment
            ast::Selection::InlineFragment(inline_fragment) => {
                // A missing type condition means the fragment applies to the
                // enclosing type.
                let fragment_type = inline_fragment
                    .type_condition()
                    .map(|condition| {
                        FieldType::Named(
                            condition
                                .named_type()
                                .expect("TypeCondition must specify a type; qed")
                                .name()
                                .expect("the node Name is not optional in the spec; qed")
                                .text()
                                .to_string(),
                        )
                    })
                    .unwrap_or_else(|| current_type.clone());

                let selection_set = inline_fragment
                    .selection_set()
                    .expect("the node SelectionSet is not optional in the spec; qed")
                    .selections()
                    .filter_map(|selection| Selection::from_ast(selection, &fragment_type, schema))
                    .collect();

                Some(Self::InlineFragment { selection_set })
            }
            // Spec: https://spec.graphql.org/draft/#FragmentSpread
            ast::Selection::FragmentSpread(fragment_spread) => {
                let name = fragment_spread
                    .fragment_name()
                    .expect("the node FragmentName is not optional in the spec; qed")
                    .name()
                    .expect("the node Name is not optional in the spec; qed")
                    .text()
                    .to_string();

                Some(Self::FragmentSpread { name })
            }
        }
    }
}
