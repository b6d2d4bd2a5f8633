//! @ai:module:intent Resolve run configuration: inputs, output destination, generator kind
//! @ai:module:layer infrastructure
//! @ai:module:public_api GenerateConfig, OutputTarget, STDOUT_SENTINEL, DEFAULT_KIND
//! @ai:module:depends_on language, error
//! @ai:module:stateless true

use crate::error::{Error, Result};
use crate::language::SRC_KIND;
use std::fmt;
use std::path::PathBuf;

/// Output path value that sends the document to standard output.
pub const STDOUT_SENTINEL: &str = "-";

/// Generator kind written when the caller does not override it.
pub const DEFAULT_KIND: &str = SRC_KIND;

/// @ai:intent Where the assembled document is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// @ai:intent Everything one extraction run needs
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub inputs: Vec<PathBuf>,
    pub output: OutputTarget,
    pub kind: String,
}

impl GenerateConfig {
    /// @ai:intent Build a configuration, deriving the output path when omitted
    /// @ai:pre inputs come straight from the command line
    /// @ai:post output is Stdout for "-", the given path otherwise, or <input>.json for a lone file
    /// @ai:edge_cases no -o with several inputs or a directory -> Err(MissingOutput)
    /// @ai:effects fs:read
    pub fn resolve(inputs: Vec<PathBuf>, out: Option<&str>, kind: Option<String>) -> Result<Self> {
        let output = match out {
            Some(STDOUT_SENTINEL) => OutputTarget::Stdout,
            Some(path) => OutputTarget::File(PathBuf::from(path)),
            None => match inputs.as_slice() {
                [single] if !single.is_dir() => OutputTarget::File(single.with_extension("json")),
                _ => {
                    return Err(Error::MissingOutput {
                        inputs: inputs.len(),
                    })
                }
            },
        };

        Ok(Self {
            inputs,
            output,
            kind: kind.unwrap_or_else(|| DEFAULT_KIND.to_string()),
        })
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputTarget::Stdout => write!(f, "<stdout>"),
            OutputTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_output_replaces_extension() {
        let config = GenerateConfig::resolve(vec![PathBuf::from("models/user.go")], None, None)
            .unwrap();
        assert_eq!(
            config.output,
            OutputTarget::File(PathBuf::from("models/user.json"))
        );
        assert_eq!(config.kind, "go");
    }

    #[test]
    fn test_stdout_sentinel() {
        let config = GenerateConfig::resolve(
            vec![PathBuf::from("a.go"), PathBuf::from("b.go")],
            Some("-"),
            Some("graphql".to_string()),
        )
        .unwrap();
        assert_eq!(config.output, OutputTarget::Stdout);
        assert_eq!(config.kind, "graphql");
    }

    #[test]
    fn test_explicit_output_path() {
        let config =
            GenerateConfig::resolve(vec![PathBuf::from("a.go")], Some("out/all.json"), None)
                .unwrap();
        assert_eq!(config.output, OutputTarget::File(PathBuf::from("out/all.json")));
    }

    #[test]
    fn test_missing_output_with_many_inputs() {
        let result =
            GenerateConfig::resolve(vec![PathBuf::from("a.go"), PathBuf::from("b.go")], None, None);
        assert!(matches!(result, Err(Error::MissingOutput { inputs: 2 })));
    }

    #[test]
    fn test_missing_output_for_directory_input() {
        let dir = TempDir::new().unwrap();
        let result = GenerateConfig::resolve(vec![dir.path().to_path_buf()], None, None);
        assert!(matches!(result, Err(Error::MissingOutput { inputs: 1 })));
    }
}
