//! @ai:module:intent Classify Go type expressions into rendered strings and shape flags
//! @ai:module:layer domain
//! @ai:module:public_api TypeExpr, TypeDescriptor, resolve, INVALID_TYPE
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};

/// Sentinel rendered for type expressions the resolver does not understand.
/// No valid Go type can be spelled this way.
pub const INVALID_TYPE: &str = "---";

/// @ai:intent Closed set of type expression shapes the resolver understands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeExpr {
    /// `User`, `int64`
    Name(String),
    /// `time.Time`
    Qualified { package: String, name: String },
    /// `*T`
    Pointer(Box<TypeExpr>),
    /// `[]T` when `len` is `None`, `[N]T` otherwise
    Array {
        len: Option<String>,
        elem: Box<TypeExpr>,
    },
    /// `map[K]V`
    Map {
        key: Box<TypeExpr>,
        value: Box<TypeExpr>,
    },
    /// Anything else: channels, func types, inline structs, generics, unions.
    Other { kind: String, text: String },
}

impl TypeExpr {
    /// @ai:intent Find the first sub-expression the resolver cannot classify
    /// @ai:effects pure
    pub fn first_unresolved(&self) -> Option<&TypeExpr> {
        match self {
            TypeExpr::Name(_) | TypeExpr::Qualified { .. } => None,
            TypeExpr::Pointer(inner) => inner.first_unresolved(),
            TypeExpr::Array { elem, .. } => elem.first_unresolved(),
            TypeExpr::Map { key, value } => key.first_unresolved().or(value.first_unresolved()),
            TypeExpr::Other { .. } => Some(self),
        }
    }
}

/// @ai:intent Resolved shape of a type expression
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TypeDescriptor {
    #[serde(rename = "Type")]
    pub full: String,
    #[serde(rename = "baseType")]
    pub base: String,
    #[serde(rename = "isArray")]
    pub is_array: bool,
    #[serde(rename = "notNull")]
    pub not_null: bool,
}

impl TypeDescriptor {
    /// @ai:intent Descriptor flagging an unresolved type
    pub fn invalid() -> Self {
        Self {
            full: INVALID_TYPE.to_string(),
            base: INVALID_TYPE.to_string(),
            is_array: false,
            not_null: true,
        }
    }

    /// @ai:intent Descriptor for a method signature, which has value semantics
    pub fn signature(rendered: String) -> Self {
        Self {
            base: rendered.clone(),
            full: rendered,
            is_array: false,
            not_null: true,
        }
    }

    /// @ai:effects pure
    pub fn is_valid(&self) -> bool {
        self.full != INVALID_TYPE
    }
}

/// @ai:intent Resolve a type expression into its descriptor
/// @ai:post result is TypeDescriptor::invalid() when any part of expr is TypeExpr::Other
/// @ai:example (*User) -> { Type: "*User", isArray: false, notNull: false }
/// @ai:example ([]*User) -> { Type: "[]*User", baseType: "*User", isArray: true, notNull: false }
/// @ai:effects pure
pub fn resolve(expr: &TypeExpr) -> TypeDescriptor {
    let Some(full) = render(expr) else {
        return TypeDescriptor::invalid();
    };
    let (is_array, not_null) = shape(expr);

    TypeDescriptor {
        base: base(expr).unwrap_or_else(|| full.clone()),
        full,
        is_array,
        not_null,
    }
}

/// @ai:intent Render a type expression as it would be written in Go
/// @ai:post None when expr contains an unresolved shape
/// @ai:effects pure
pub fn render(expr: &TypeExpr) -> Option<String> {
    match expr {
        TypeExpr::Name(name) => Some(name.clone()),
        TypeExpr::Qualified { package, name } => Some(format!("{}.{}", package, name)),
        TypeExpr::Pointer(inner) => render(inner).map(|inner| format!("*{}", inner)),
        TypeExpr::Array { len, elem } => {
            let elem = render(elem)?;
            Some(format!("[{}]{}", len.as_deref().unwrap_or(""), elem))
        }
        TypeExpr::Map { key, value } => Some(format!("map[{}]{}", render(key)?, render(value)?)),
        TypeExpr::Other { .. } => None,
    }
}

/// (is_array, not_null)
fn shape(expr: &TypeExpr) -> (bool, bool) {
    match expr {
        TypeExpr::Name(_) | TypeExpr::Qualified { .. } | TypeExpr::Map { .. } => (false, true),
        TypeExpr::Pointer(inner) => (shape(inner).0, false),
        TypeExpr::Array { elem, .. } => (true, shape(elem).1),
        TypeExpr::Other { .. } => (false, true),
    }
}

fn base(expr: &TypeExpr) -> Option<String> {
    match expr {
        TypeExpr::Array { elem, .. } => render(elem),
        TypeExpr::Pointer(inner) if matches!(**inner, TypeExpr::Array { .. }) => base(inner),
        _ => None,
    }
}
