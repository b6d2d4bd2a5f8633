//! @ai:module:intent Define the entities emitted for code generators
//! @ai:module:layer domain
//! @ai:module:public_api TypeEntity, TypeKind, MemberEntity, ParameterDescriptor
//! @ai:module:depends_on naming, descriptor, annotation
//! @ai:module:stateless true

use crate::annotation::Annotation;
use crate::descriptor::TypeDescriptor;
use crate::naming::{MemberNames, TypeNames};
use serde::{Deserialize, Serialize};

/// @ai:intent Discriminates record (struct) from contract (interface) declarations
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Record,
    Contract,
}

/// @ai:intent One extracted struct or interface declaration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeEntity {
    #[serde(flatten)]
    pub names: TypeNames,
    pub kind: TypeKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    pub fields: Vec<MemberEntity>,
    pub key: String,
}

/// @ai:intent One struct field, interface method or embedded member
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemberEntity {
    #[serde(flatten)]
    pub names: MemberNames,
    #[serde(flatten)]
    pub descriptor: TypeDescriptor,
    #[serde(flatten)]
    pub annotation: Annotation,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub docs: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<ParameterDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ParameterDescriptor>,
    pub key: String,
}

/// @ai:intent One argument or result of an interface method
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParameterDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub descriptor: TypeDescriptor,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub variadic: bool,
}

impl TypeEntity {
    /// @ai:intent Create an entity with names derived from the declared name
    /// @ai:post key equals the canonical singular Name
    pub fn new(declared: &str, kind: TypeKind) -> Self {
        let names = TypeNames::derive(declared);
        Self {
            key: names.name.clone(),
            names,
            kind,
            docs: Vec::new(),
            comments: Vec::new(),
            fields: Vec::new(),
        }
    }
}

impl MemberEntity {
    /// @ai:intent Create a member, keyed by JSON name or by type for anonymous members
    /// @ai:post key == names.json_name when named, key == descriptor.full otherwise
    pub fn new(declared: Option<&str>, descriptor: TypeDescriptor) -> Self {
        let names = declared.map(MemberNames::derive).unwrap_or_default();
        let key = if names.is_anonymous() {
            descriptor.full.clone()
        } else {
            names.json_name.clone()
        };

        Self {
            names,
            descriptor,
            annotation: Annotation::default(),
            docs: Vec::new(),
            comments: Vec::new(),
            args: Vec::new(),
            results: Vec::new(),
            key,
        }
    }

    /// @ai:intent Check if the member has no declared name
    pub fn is_embedded(&self) -> bool {
        self.names.is_anonymous()
    }
}
