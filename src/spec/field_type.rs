use apollo_parser::ast;

use crate::spec::Schema;

// Primitives are taken from scalars: https://spec.graphql.org/draft/#sec-Scalars
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum FieldType {
    Named(String),
    List(Box<FieldType>),
    NonNull(Box<FieldType>),
    String,
    Int,
    Float,
    Id,
    Boolean,
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Named(ty) => write!(f, "{}", ty),
            FieldType::List(ty) => write!(f, "[{}]", ty),
            FieldType::NonNull(ty) => write!(f, "{}!", ty),
            FieldType::String => write!(f, "String"),
            FieldType::Int => write!(f, "Int"),
            FieldType::Float => write!(f, "Float"),
            FieldType::Id => write!(f, "ID"),
            FieldType::Boolean => write!(f, "Boolean"),
        }
    }
}

impl FieldType {
    /// return the name of the type on which selections happen
    ///
    /// Example if we get the field `list: [User!]!`, it will return "User"
    pub(crate) fn inner_type_name(&self) -> Option<&str> {
        match self {
            FieldType::Named(name) => Some(name.as_str()),
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.inner_type_name(),
            FieldType::String
            | FieldType::Int
            | FieldType::Float
            | FieldType::Id
            | FieldType::Boolean => None,
        }
    }

    pub(crate) fn is_builtin_scalar(&self) -> bool {
        match self {
            FieldType::Named(_) | FieldType::List(_) | FieldType::NonNull(_) => false,
            FieldType::String
            | FieldType::Int
            | FieldType::Float
            | FieldType::Id
            | FieldType::Boolean => true,
        }
    }

    /// The scalar type name this type resolves to once list and non-null
    /// wrappers are unwrapped, if it resolves to a scalar at all.
    ///
    /// Built-in scalars answer with their canonical name; named types answer
    /// only if the schema declares them as custom scalars.
    pub(crate) fn scalar_type_name<'a>(&'a self, schema: &'a Schema) -> Option<&'a str> {
        match self {
            FieldType::Named(name) if schema.custom_scalars.contains(name) => Some(name.as_str()),
            FieldType::Named(_) => None,
            FieldType::List(inner) | FieldType::NonNull(inner) => inner.scalar_type_name(schema),
            FieldType::String => Some("String"),
            FieldType::Int => Some("Int"),
            FieldType::Float => Some("Float"),
            FieldType::Id => Some("ID"),
            FieldType::Boolean => Some("Boolean"),
        }
    }
}

impl From<ast::Type> for FieldType {
    // Spec: https://spec.graphql.org/draft/#sec-Type-References
    fn from(ty: ast::Type) -> Self {
        match ty {
            ast::Type::NamedType(named) => named.into(),
            ast::Type::ListType(list) => list.into(),
            ast::Type::NonNullType(non_null) => non_null.into(),
        }
    }
}

impl From<ast::NamedType> for FieldType {
    // Spec: https://spec.graphql.org/draft/#NamedType
    fn from(named: ast::NamedType) -> Self {
        let name = named
            .name()
            .expect("the node Name is not optional in the spec; qed")
            .text()
            .to_string();
        match name.as_str() {
            "String" => Self::String,
            "Int" => Self::Int,
            "Float" => Self::Float,
            "ID" => Self::Id,
            "Boolean" => Self::Boolean,
            _ => Self::Named(name),
        }
    }
}

impl From<ast::ListType> for FieldType {
    // Spec: https://spec.graphql.org/draft/#ListType
    fn from(list: ast::ListType) -> Self {
        Self::List(Box::new(
            list.ty()
                .expect("the node Type is not optional in the spec; qed")
                .into(),
        ))
    }
}

impl From<ast::NonNullType> for FieldType {
    // Spec: https://spec.graphql.org/draft/#NonNullType
    fn from(non_null: ast::NonNullType) -> Self {
        if let Some(list) = non_null.list_type() {
            Self::NonNull(Box::new(list.into()))
        } else if let Some(named) = non_null.named_type() {
            Self::NonNull(Box::new(named.into()))
        } else {
            unreachable!("either the NamedType node is provided, either the ListType node; qed")
        }
    }
}
