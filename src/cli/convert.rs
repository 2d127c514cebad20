//! `yaml-to-json`: convert a YAML data file into a JSON artifact
//!
//! The artifact is written twice, to the requested output path and next to
//! the sources, from a single rendered buffer.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use super::output::Output;
use crate::storage::{load_document, provenance_comment, render_artifact, write_artifact, ConvertConfig};

#[derive(Parser)]
#[command(name = "yaml-to-json")]
#[command(version, about = "Convert a YAML file to JSON in the build and source trees")]
pub struct ConvertCli {
    /// YAML file to read
    pub input: PathBuf,

    /// Directory that receives a copy of the output
    pub source_dir: PathBuf,

    /// JSON file to write
    pub output: PathBuf,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl ConvertCli {
    pub fn config(&self) -> ConvertConfig {
        ConvertConfig::new(&self.input, &self.source_dir, &self.output)
    }
}

/// Converts the input and writes both copies, returning the paths written
///
/// Nothing is written unless the input parses.
pub fn convert(config: &ConvertConfig, output: &Output) -> Result<Vec<PathBuf>> {
    let document = load_document(&config.input)?;
    output.verbose_ctx("convert", &format!("Parsed {}", config.input.display()));

    let comment = provenance_comment(&config.input);
    let destinations = config.destinations()?;
    let bytes = render_artifact(&comment, &document).context("Failed to render JSON")?;

    write_artifact(&bytes, &destinations)?;
    for path in &destinations {
        output.verbose_ctx("convert", &format!("Wrote {} ({} bytes)", path.display(), bytes.len()));
    }

    Ok(destinations.to_vec())
}

/// Entry point for `yaml-to-json`
pub fn run() -> Result<()> {
    let cli = ConvertCli::parse();
    let output = Output::new(cli.verbose);
    output.verbose("yaml-to-json starting");

    convert(&cli.config(), &output)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use tempfile::TempDir;

    fn setup(yaml: &str) -> (TempDir, ConvertConfig) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::create_dir_all(dir.path().join("build")).unwrap();

        let input = dir.path().join("src").join("keys.yaml");
        fs::write(&input, yaml).unwrap();

        let config = ConvertConfig::new(&input, dir.path().join("src"), dir.path().join("build").join("keys.json"));
        (dir, config)
    }

    #[test]
    fn writes_both_copies() {
        let (dir, config) = setup("a: 1\nb: [x, y]\n");

        let written = convert(&config, &Output::default()).unwrap();

        assert_eq!(written.len(), 2);
        let build = fs::read_to_string(dir.path().join("build/keys.json")).unwrap();
        let source = fs::read_to_string(dir.path().join("src/keys.json")).unwrap();
        assert_eq!(build, source);
        assert_eq!(
            build,
            "/* Automatically generated from keys.yaml, do not modify. */\n{\n    \"a\": 1,\n    \"b\": [\n        \"x\",\n        \"y\"\n    ]\n}"
        );
    }

    #[test]
    fn invalid_yaml_writes_nothing() {
        let (dir, config) = setup("a: [1, 2\n");
        fs::write(dir.path().join("src/keys.json"), "previous").unwrap();

        assert!(convert(&config, &Output::default()).is_err());

        assert!(!dir.path().join("build/keys.json").exists());
        assert_eq!(fs::read_to_string(dir.path().join("src/keys.json")).unwrap(), "previous");
    }

    #[test]
    fn parses_positional_arguments() {
        let cli = ConvertCli::try_parse_from(["yaml-to-json", "in.yaml", "src", "out/data.json"]).unwrap();
        let config = cli.config();

        assert_eq!(config.source_copy().unwrap(), PathBuf::from("src/data.json"));
    }

    #[test]
    fn requires_three_arguments() {
        assert!(ConvertCli::try_parse_from(["yaml-to-json", "in.yaml", "src"]).is_err());
    }
}
