use apollo_parser::ast;
use indexmap::IndexMap;

use crate::spec::{FieldType, Fragments, Schema, Selection, SpecError};

/// A parsed query document: its operations with typed selection sets and
/// typed variable definitions, plus its fragment definitions.
///
/// Parsing resolves every field against the schema once; the document is
/// never mutated afterwards.
#[derive(Debug)]
pub struct Query {
    string: String,
    pub(crate) fragments: Fragments,
    pub(crate) operations: Vec<Operation>,
}

impl Query {
    /// Returns a reference to the underlying query string.
    pub fn as_str(&self) -> &str {
        self.string.as_str()
    }

    pub fn parse(query: impl Into<String>, schema: &Schema) -> Result<Self, SpecError> {
        let string = query.into();

        let parser = apollo_parser::Parser::new(string.as_str());
        let tree = parser.parse();
        let errors = tree
            .errors()
            .map(|err| format!("{:?}", err))
            .collect::<Vec<_>>();
        if !errors.is_empty() {
            failfast_debug!("parsing error(s): {}", errors.join(", "));
            return Err(SpecError::ParsingError(errors.join(", ")));
        }

        let document = tree.document();
        let fragments = Fragments::from_ast(&document, schema);

        let operations = document
            .definitions()
            .filter_map(|definition| {
                if let ast::Definition::OperationDefinition(operation) = definition {
                    Operation::from_ast(operation, schema)
                } else {
                    None
                }
            })
            .collect();

        Ok(Query {
            string,
            fragments,
            operations,
        })
    }
}

#[derive(Debug)]
pub(crate) struct Operation {
    pub(crate) selection_set: Vec<Selection>,
    pub(crate) variables: IndexMap<String, FieldType>,
}

impl Operation {
    // Spec: https://spec.graphql.org/draft/#sec-Language.Operations
    fn from_ast(operation: ast::OperationDefinition, schema: &Schema) -> Option<Self> {
        let kind = operation
            .operation_type()
            .and_then(|op| {
                op.query_token()
                    .map(|_| OperationKind::Query)
                    .or_else(|| op.mutation_token().map(|_| OperationKind::Mutation))
                    .or_else(|| op.subscription_token().map(|_| OperationKind::Subscription))
            })
            .unwrap_or(OperationKind::Query);

        let current_type = FieldType::Named(schema.root_operation_name(kind).to_string());

        let selection_set = operation
            .selection_set()
            .expect("the node SelectionSet is not optional in the spec; qed")
            .selections()
            .filter_map(|selection| Selection::from_ast(selection, &current_type, schema))
            .collect();

        let variables = operation
            .variable_definitions()
            .iter()
            .flat_map(|x| x.variable_definitions())
            .map(|definition| {
                let name = definition
                    .variable()
                    .expect("the node Variable is not optional in the spec; qed")
                    .name()
                    .expect("the node Name is not optional in the spec; qed")
                    .text()
                    .to_string();
                let ty = FieldType::from(
                    definition
                        .ty()
                        .expect("the node Type is not optional in the spec; qed"),
                );

                (name, ty)
            })
            .collect();

        Some(Operation {
            selection_set,
            variables,
        })
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub(crate) enum OperationKind {
    Query,
    Mutation,
    Subscription,
}

impl OperationKind {
    /// The conventional root type name, used when the schema has no explicit
    /// `schema { … }` definition.
    pub(crate) fn default_type_name(&self) -> &'static str {
        match self {
            OperationKind::Query => "Query",
            OperationKind::Mutation => "Mutation",
            OperationKind::Subscription => "Subscription",
        }
    }
}

impl From<ast::OperationType> for OperationKind {
    // Spec: https://spec.graphql.org/draft/#OperationType
    fn from(operation_type: ast::OperationType) -> Self {
        if operation_type.query_token().is_some() {
            Self::Query
        } else if operation_type.mutation_token().is_some() {
            Self::Mutation
        } else if operation_type.subscription_token().is_some() {
            Self::Subscription
        } else {
            unreachable!(
                "either the `query` token is provided, either the `mutation` token, \
                either the `subscription` token; qed"
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn schema() -> Schema {
        "type Query {
            me: User
            friends: [User]
        }
        type User {
            id: ID
            name: String
            birthday: Date
        }
        scalar Date"
            .parse()
            .expect("could not parse schema")
    }

    #[test]
    fn parses_operations_and_typed_variables() {
        let query = Query::parse(
            "query Profile($id: ID!, $since: Date) { me { name birthday } }",
            &schema(),
        )
        .expect("could not parse query");

        assert_eq!(query.operations.len(), 1);
        let operation = &query.operations[0];
        let variables: Vec<(&String, &FieldType)> = operation.variables.iter().collect();
        assert_eq!(variables.len(), 2);
        assert_eq!(variables[0].0, "id");
        assert_eq!(
            variables[0].1,
            &FieldType::NonNull(Box::new(FieldType::Id)),
        );
        assert_eq!(variables[1].0, "since");
        assert_eq!(variables[1].1, &FieldType::Named("Date".to_string()));
    }

    #[test]
    fn resolves_field_types_from_the_schema() {
        let query =
            Query::parse("{ me { birthday } }", &schema()).expect("could not parse query");
        let operation = &query.operations[0];
        match &operation.selection_set[0] {
            Selection::Field {
                name,
                selection_set: Some(selection_set),
                ..
            } => {
                assert_eq!(name, "me");
                match &selection_set[0] {
                    Selection::Field { name, field_type, .. } => {
                        assert_eq!(name, "birthday");
                        assert_eq!(field_type, &FieldType::Named("Date".to_string()));
                    }
                    other => panic!("expected a field, got {:?}", other),
                }
            }
            other => panic!("expected a field with subselections, got {:?}", other),
        }
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let query =
            Query::parse("{ me { name doesNotExist } }", &schema()).expect("could not parse query");
        let operation = &query.operations[0];
        match &operation.selection_set[0] {
            Selection::Field {
                selection_set: Some(selection_set),
                ..
            } => assert_eq!(selection_set.len(), 1),
            other => panic!("expected a field with subselections, got {:?}", other),
        }
    }

    #[test]
    fn rejects_unparsable_documents() {
        let result = Query::parse("query {", &schema());
        assert!(matches!(result, Err(SpecError::ParsingError(_))));
    }
}
