//! @ai:module:intent goshape library: extract Go struct and interface shapes for code generators
//! @ai:module:layer infrastructure
//! @ai:module:public_api annotation, config, descriptor, entity, error, extractor, inflection, language, naming, output, parser
//! @ai:module:stateless true
//!
//! # goshape
//!
//! Reads Go declarations and emits a normalized document describing every record
//! (struct) and contract (interface): derived name spellings, resolved member types,
//! parsed struct tags, doc comments and method signatures.
//!
//! ## Example
//!
//! ```rust,no_run
//! use goshape::{extractor, output::Document};
//! use std::path::Path;
//!
//! let entities = extractor::extract_file(Path::new("models/user.go")).unwrap();
//! let document = Document::assemble("go", entities);
//! println!("{}", document.to_json().unwrap());
//! ```

pub mod annotation;
pub mod config;
pub mod descriptor;
pub mod entity;
pub mod error;
pub mod extractor;
pub mod inflection;
pub mod language;
pub mod naming;
pub mod output;
pub mod parser;

pub use annotation::Annotation;
pub use config::{GenerateConfig, OutputTarget};
pub use descriptor::{resolve, TypeDescriptor, TypeExpr};
pub use entity::{MemberEntity, ParameterDescriptor, TypeEntity, TypeKind};
pub use error::{Error, Result};
pub use extractor::{extract_file, extract_source};
pub use language::{collect_sources, is_supported_file};
pub use naming::{MemberNames, TypeNames};
pub use output::{generate, write_document, Document};
