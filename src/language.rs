//! @ai:module:intent Describe the Go source language the extractor reads
//! @ai:module:layer domain
//! @ai:module:public_api SRC_KIND, EXTENSION, grammar, is_supported_file, collect_sources
//! @ai:module:depends_on error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Identifier of the declaration language, written as `srcKind`.
pub const SRC_KIND: &str = "go";

/// Source file extension, without the dot.
pub const EXTENSION: &str = "go";

const TEST_SUFFIX: &str = "_test.go";

/// @ai:intent Tree-sitter grammar for Go sources
/// @ai:effects pure
pub fn grammar() -> tree_sitter::Language {
    tree_sitter_go::LANGUAGE.into()
}

/// @ai:intent Check if a path names a Go source file
/// @ai:example ("model.go") -> true
/// @ai:example ("model.rs") -> false
/// @ai:effects pure
pub fn is_supported_file(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()) == Some(EXTENSION)
}

/// @ai:intent Expand input paths into the Go files to process
/// @ai:pre every path exists
/// @ai:post files come first in argument order; directory contents are sorted
/// @ai:edge_cases _test.go files inside directories are skipped
/// @ai:effects fs:read
pub fn collect_sources(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut sources = Vec::new();

    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|e| Error::FileRead {
                    path: input.clone(),
                    source: e.into(),
                })?;
                let path = entry.path();
                let is_test = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(TEST_SUFFIX));
                if entry.file_type().is_file() && is_supported_file(path) && !is_test {
                    found.push(path.to_path_buf());
                }
            }
            sources.extend(found);
        } else if is_supported_file(input) {
            sources.push(input.clone());
        } else {
            return Err(Error::UnsupportedFileType(input.display().to_string()));
        }
    }

    Ok(sources)
}
