use clap::Parser;

use crate::application::dto::OutputFormat;
use crate::sbom_generation::domain::SpecVersion;
use std::path::PathBuf;

/// Assemble CycloneDX BOMs from upstream scanner output
#[derive(Parser, Debug)]
#[command(name = "sbom-assembler")]
#[command(version)]
#[command(
    about = "Assemble one de-duplicated CycloneDX BOM from the output of one or more package scans",
    long_about = None
)]
pub struct Args {
    /// Scan-result JSON file. Repeat to assemble several scan passes into one BOM
    #[arg(short, long = "input", value_name = "SCAN", required = true)]
    pub input: Vec<PathBuf>,

    /// Path to the project directory (defaults to current directory)
    #[arg(short, long)]
    pub path: Option<PathBuf>,

    /// Output format: json or xml
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// CycloneDX schema version: 1.4, 1.5 or 1.6
    #[arg(long, value_name = "VERSION")]
    pub spec_version: Option<SpecVersion>,

    /// Drop optional and excluded components
    #[arg(long)]
    pub required_only: bool,

    /// Keep only components whose purl contains this string.
    /// Can be specified multiple times; every string must match
    #[arg(long, value_name = "STRING")]
    pub only: Vec<String>,

    /// Drop components whose purl or property values contain this string.
    /// Can be specified multiple times
    #[arg(long, value_name = "STRING")]
    pub filter: Vec<String>,

    /// Do not record an incomplete composition when filters removed components
    #[arg(long)]
    pub no_auto_compositions: bool,

    /// Container image metadata JSON used for oci:image:* header properties
    #[arg(long, value_name = "FILE")]
    pub image_metadata: Option<PathBuf>,

    /// Author name for the BOM header. Can be specified multiple times
    #[arg(long = "author", value_name = "NAME")]
    pub authors: Vec<String>,

    /// Path to a config file (defaults to sbom-assembler.config.yml in the project directory)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print diagnostic logs to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repeated_inputs_and_filters() {
        let args = Args::try_parse_from([
            "sbom-assembler",
            "-i",
            "npm.json",
            "-i",
            "pypi.json",
            "--filter",
            "@types",
            "--filter",
            "eslint",
            "--only",
            "pkg:npm",
        ])
        .unwrap();

        assert_eq!(
            args.input,
            vec![PathBuf::from("npm.json"), PathBuf::from("pypi.json")]
        );
        assert_eq!(args.filter, vec!["@types".to_string(), "eslint".to_string()]);
        assert_eq!(args.only, vec!["pkg:npm".to_string()]);
        assert!(args.format.is_none());
        assert!(!args.no_auto_compositions);
    }

    #[test]
    fn test_parse_format_and_spec_version() {
        let args = Args::try_parse_from([
            "sbom-assembler",
            "-i",
            "scan.json",
            "-f",
            "XML",
            "--spec-version",
            "1.4",
        ])
        .unwrap();
        assert_eq!(args.format, Some(OutputFormat::Xml));
        assert_eq!(args.spec_version, Some(SpecVersion::V1_4));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Args::try_parse_from(["sbom-assembler"]).is_err());
    }

    #[test]
    fn test_invalid_spec_version_rejected() {
        let result =
            Args::try_parse_from(["sbom-assembler", "-i", "s.json", "--spec-version", "2.0"]);
        assert!(result.is_err());
    }
}
