use std::collections::HashMap;

use apollo_parser::ast;

use crate::spec::{FieldType, Schema, Selection};

#[derive(Debug, Default)]
pub(crate) struct Fragments {
    map: HashMap<String, Fragment>,
}

impl Fragments {
    pub(crate) fn from_ast(document: &ast::Document, schema: &Schema) -> Self {
        let map = document
            .definitions()
            .filter_map(|definition| match definition {
                // Spec: https://spec.graphql.org/draft/#FragmentDefinition
                ast::Definition::FragmentDefinition(fragment_definition) => {
                    Some(fragment_definition)
                }
                _ => None,
            })
            .map(|fragment_definition| {
                let name = fragment_definition
                    .fragment_name()
                    .expect("the node FragmentName is not optional in the spec; qed")
                    .name()
                    .expect("the node Name is not optional in the spec; qed")
                    .text()
                    .to_string();

                let type_condition = fragment_definition
                    .type_condition()
                    .expect("Fragments must specify the type they apply to; qed")
                    .named_type()
                    .expect("Fragments must specify the type they apply to; qed")
                    .name()
                    .expect("the node Name is not optional in the spec; qed")
                    .text()
                    .to_string();

                let current_type = FieldType::Named(type_condition);
                let selection_set = fragment_definition
                    .selection_set()
                    .expect("the node SelectionSet is not optional in the spec; qed")
                    .selections()
                    .filter_map(|selection| Selection::from_ast(selection, &current_type, schema))
                    .collect();

                (name, Fragment { selection_set })
            })
            .collect();
        Fragments { map }
    }

    pub(crate) fn get(&self, key: impl AsRef<str>) -> Option<&Fragment> {
        self.map.get(key.as_ref())
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Fragment {
    pub(crate) selection_set: Vec<Selection>,
}
