//! @ai:module:intent Assemble the ordered document and write it as indented JSON
//! @ai:module:layer infrastructure
//! @ai:module:public_api Document, generate, write_document
//! @ai:module:depends_on entity, extractor, language, config, error

use crate::config::{GenerateConfig, OutputTarget};
use crate::entity::TypeEntity;
use crate::error::{Error, Result};
use crate::extractor::extract_file;
use crate::language::{collect_sources, SRC_KIND};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// @ai:intent Output envelope handed to code generators
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub kind: String,
    #[serde(rename = "srcKind")]
    pub src_kind: String,
    pub data: Vec<TypeEntity>,
}

impl Document {
    /// @ai:intent Pool entities into a document ordered by key
    /// @ai:post data is sorted by key; equal keys keep their input order
    /// @ai:effects pure
    pub fn assemble(kind: impl Into<String>, mut entities: Vec<TypeEntity>) -> Self {
        entities.sort_by(|a, b| a.key.cmp(&b.key));
        Self {
            kind: kind.into(),
            src_kind: SRC_KIND.to_string(),
            data: entities,
        }
    }

    /// @ai:intent Render the document as tab-indented JSON
    /// @ai:effects pure
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut serializer)?;

        String::from_utf8(buf)
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

/// @ai:intent Extract every input and write one document, or nothing on failure
/// @ai:pre config was produced by GenerateConfig::resolve
/// @ai:post the destination is untouched unless every input parsed
/// @ai:effects fs:read, fs:write, logging
pub fn generate(config: &GenerateConfig) -> Result<Document> {
    let sources = collect_sources(&config.inputs)?;
    let mut entities = Vec::new();

    for source in &sources {
        tracing::debug!("parsing {}", source.display());
        entities.extend(extract_file(source)?);
    }

    let document = Document::assemble(config.kind.clone(), entities);
    write_document(&document, &config.output)?;

    tracing::info!(
        "wrote {} entities from {} files to {}",
        document.data.len(),
        sources.len(),
        config.output
    );
    Ok(document)
}

/// @ai:intent Serialize a document to its destination
/// @ai:effects fs:write
pub fn write_document(document: &Document, target: &OutputTarget) -> Result<()> {
    let json = document.to_json()?;

    match target {
        OutputTarget::Stdout => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            stdout.flush()?;
        }
        OutputTarget::File(path) => {
            std::fs::write(path, json).map_err(|e| Error::Write {
                path: path.clone(),
                source: e,
            })?;
        }
    }

    Ok(())
}
