use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use apollo_parser::ast;
use indexmap::IndexMap;

use crate::spec::{FieldType, OperationKind, SpecError};

/// A parsed GraphQL type schema.
///
/// Built once from SDL text and shared read-only for the lifetime of a codec.
/// Only the parts path resolution needs are kept: field types of objects and
/// interfaces, field types of input objects, and the names of custom scalars
/// and enums.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    string: String,
    pub(crate) object_types: HashMap<String, ObjectType>,
    pub(crate) input_types: HashMap<String, InputObjectType>,
    pub(crate) custom_scalars: HashSet<String>,
    pub(crate) enums: HashSet<String>,
    root_operations: HashMap<OperationKind, String>,
}

impl Schema {
    /// Returns a reference to the underlying SDL string.
    pub fn as_str(&self) -> &str {
        self.string.as_str()
    }

    /// The name of the root object type for `kind` operations.
    pub(crate) fn root_operation_name(&self, kind: OperationKind) -> &str {
        self.root_operations
            .get(&kind)
            .map(|name| name.as_str())
            .unwrap_or_else(|| kind.default_type_name())
    }
}

impl FromStr for Schema {
    type Err = SpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parser = apollo_parser::Parser::new(s);
        let tree = parser.parse();
        let errors = tree
            .errors()
            .map(|err| format!("{:?}", err))
            .collect::<Vec<_>>();
        if !errors.is_empty() {
            return Err(SpecError::ParsingError(errors.join(", ")));
        }

        let mut schema = Schema {
            string: s.to_owned(),
            ..Default::default()
        };

        let document = tree.document();
        for definition in document.definitions() {
            match definition {
                ast::Definition::ObjectTypeDefinition(object) => {
                    let object_type: ObjectType = object.into();
                    schema
                        .object_types
                        .insert(object_type.name.clone(), object_type);
                }
                ast::Definition::InterfaceTypeDefinition(interface) => {
                    let object_type: ObjectType = interface.into();
                    schema
                        .object_types
                        .insert(object_type.name.clone(), object_type);
                }
                ast::Definition::ObjectTypeExtension(extension) => {
                    let extension: ObjectType = extension.into();
                    if let Some(existing) = schema.object_types.get_mut(&extension.name) {
                        existing.extend(extension);
                    } else {
                        failfast_debug!("extension of unknown type '{}'", extension.name);
                    }
                }
                ast::Definition::InterfaceTypeExtension(extension) => {
                    let extension: ObjectType = extension.into();
                    if let Some(existing) = schema.object_types.get_mut(&extension.name) {
                        existing.extend(extension);
                    } else {
                        failfast_debug!("extension of unknown interface '{}'", extension.name);
                    }
                }
                ast::Definition::InputObjectTypeDefinition(input) => {
                    let input_type: InputObjectType = input.into();
                    schema
                        .input_types
                        .insert(input_type.name.clone(), input_type);
                }
                ast::Definition::ScalarTypeDefinition(scalar) => {
                    let name = scalar
                        .name()
                        .expect("the node Name is not optional in the spec; qed")
                        .text()
                        .to_string();
                    schema.custom_scalars.insert(name);
                }
                ast::Definition::EnumTypeDefinition(enum_type) => {
                    let name = enum_type
                        .name()
                        .expect("the node Name is not optional in the spec; qed")
                        .text()
                        .to_string();
                    schema.enums.insert(name);
                }
                // Spec: https://spec.graphql.org/draft/#sec-Schema
                ast::Definition::SchemaDefinition(definition) => {
                    schema.add_root_operations(definition.root_operation_type_definitions());
                }
                ast::Definition::SchemaExtension(extension) => {
                    schema.add_root_operations(extension.root_operation_type_definitions());
                }
                _ => {}
            }
        }

        Ok(schema)
    }
}

impl Schema {
    fn add_root_operations(
        &mut self,
        definitions: impl Iterator<Item = ast::RootOperationTypeDefinition>,
    ) {
        for definition in definitions {
            let type_name = definition
                .named_type()
                .expect("the node NamedType is not optional in the spec; qed")
                .name()
                .expect("the node Name is not optional in the spec; qed")
                .text()
                .to_string();
            let kind = OperationKind::from(
                definition
                    .operation_type()
                    .expect("the node OperationType is not optional in the spec; qed"),
            );
            self.root_operations.insert(kind, type_name);
        }
    }
}

macro_rules! implement_object_type_or_interface {
    ($visibility:vis $name:ident => $( $ast_ty:ty ),+ $(,)?) => {
        #[derive(Debug, Clone, Default)]
        $visibility struct $name {
            pub(crate) name: String,
            fields: HashMap<String, FieldType>,
        }

        impl $name {
            pub(crate) fn field(&self, name: &str) -> Option<&FieldType> {
                self.fields.get(name)
            }

            fn extend(&mut self, other: Self) {
                self.fields.extend(other.fields);
            }
        }

        $(
            impl From<$ast_ty> for $name {
                fn from(definition: $ast_ty) -> Self {
                    let name = definition
                        .name()
                        .expect("the node Name is not optional in the spec; qed")
                        .text()
                        .to_string();
                    let fields = definition
                        .fields_definition()
                        .iter()
                        .flat_map(|x| x.field_definitions())
                        .map(|x| {
                            let name = x
                                .name()
                                .expect("the node Name is not optional in the spec; qed")
                                .text()
                                .to_string();
                            let ty = x
                                .ty()
                                .expect("the node Type is not optional in the spec; qed")
                                .into();
                            (name, ty)
                        })
                        .collect();

                    $name { name, fields }
                }
            }
        )+
    };
}

// Spec: https://spec.graphql.org/draft/#sec-Objects
// Spec: https://spec.graphql.org/draft/#sec-Interfaces
implement_object_type_or_interface!(
    pub(crate) ObjectType =>
    ast::ObjectTypeDefinition,
    ast::ObjectTypeExtension,
    ast::InterfaceTypeDefinition,
    ast::InterfaceTypeExtension,
);

/// An input object type, with fields in declaration order.
// Spec: https://spec.graphql.org/draft/#sec-Input-Objects
#[derive(Debug, Clone, Default)]
pub(crate) struct InputObjectType {
    pub(crate) name: String,
    fields: IndexMap<String, FieldType>,
}

impl InputObjectType {
    pub(crate) fn fields(&self) -> impl Iterator<Item = (&String, &FieldType)> {
        self.fields.iter()
    }
}

impl From<ast::InputObjectTypeDefinition> for InputObjectType {
    fn from(definition: ast::InputObjectTypeDefinition) -> Self {
        let name = definition
            .name()
            .expect("the node Name is not optional in the spec; qed")
            .text()
            .to_string();
        let fields = definition
            .input_fields_definition()
            .iter()
            .flat_map(|x| x.input_value_definitions())
            .map(|x| {
                let name = x
                    .name()
                    .expect("the node Name is not optional in the spec; qed")
                    .text()
                    .to_string();
                let ty = x
                    .ty()
                    .expect("the node Type is not optional in the spec; qed")
                    .into();
                (name, ty)
            })
            .collect();

        InputObjectType { name, fields }
    }
}
