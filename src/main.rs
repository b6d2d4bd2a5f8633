//! @ai:module:intent CLI entry point for goshape
//! @ai:module:layer presentation
//! @ai:module:public_api main
//! @ai:module:depends_on config, output

use clap::Parser;
use colored::Colorize;
use goshape::config::DEFAULT_KIND;
use goshape::{generate, GenerateConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "goshape")]
#[command(author, version, about = "Extract Go struct and interface shapes as JSON for code generators")]
struct Cli {
    /// Go source files or directories to read
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output path, "-" for stdout (defaults to <input>.json for a single file)
    #[arg(long, short)]
    out: Option<String>,

    /// Generator kind embedded in the document
    #[arg(long, default_value = DEFAULT_KIND)]
    kind: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("goshape=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> ExitCode {
    let result = GenerateConfig::resolve(cli.inputs, cli.out.as_deref(), Some(cli.kind))
        .and_then(|config| generate(&config));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("goshape").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_invalid_unit_exits_with_status_2() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.go");
        let bad = dir.path().join("bad.go");
        let out = dir.path().join("out.json");
        fs::write(&good, "package m\n\ntype Good struct{}\n").unwrap();
        fs::write(&bad, "package m\n\ntype Bad struct {\n").unwrap();

        let code = run(cli(&[
            good.to_str().unwrap(),
            bad.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ]));

        assert_eq!(code, ExitCode::from(2));
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_output_exits_with_status_2() {
        let code = run(cli(&["a.go", "b.go"]));
        assert_eq!(code, ExitCode::from(2));
    }

    #[test]
    fn test_valid_inputs_exit_successfully() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("user.go");
        fs::write(&input, "package m\n\ntype User struct{}\n").unwrap();

        let code = run(cli(&[input.to_str().unwrap()]));

        assert_eq!(code, ExitCode::SUCCESS);
        assert!(dir.path().join("user.json").exists());
    }

    #[test]
    fn test_kind_defaults_to_go() {
        assert_eq!(cli(&["a.go"]).kind, "go");
        assert!(Cli::try_parse_from(["goshape"]).is_err());
    }
}
