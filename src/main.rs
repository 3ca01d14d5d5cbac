use owo_colors::OwoColorize;
use sbom_assembler::adapters::outbound::console::StderrProgressReporter;
use sbom_assembler::adapters::outbound::filesystem::JsonScanReader;
use sbom_assembler::application::dto::SbomRequest;
use sbom_assembler::application::factories::{PresenterFactory, PresenterType};
use sbom_assembler::application::use_cases::GenerateSbomUseCase;
use sbom_assembler::cli::Args;
use sbom_assembler::config::{self, ConfigFile};
use sbom_assembler::sbom_generation::services::FilterCriteria;
use sbom_assembler::shared::{ExitCode, Result, SbomError};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse_args();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        let banner = "❌ An error occurred:";
        if std::io::stderr().is_terminal() {
            eprintln!("\n{}\n", banner.red().bold());
        } else {
            eprintln!("\n{}\n", banner);
        }
        eprintln!("{}", e);

        // Display error chain
        for cause in e.chain().skip(1) {
            eprintln!("\nCaused by: {}", cause);
        }

        eprintln!();
        let code = e
            .downcast_ref::<SbomError>()
            .map(SbomError::exit_code)
            .unwrap_or(ExitCode::ApplicationError);
        process::exit(code.as_i32());
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

fn run(args: Args) -> Result<()> {
    let project_path = args.path.clone().unwrap_or_else(|| PathBuf::from("."));
    validate_project_path(&project_path)?;

    let config = match args.config.as_deref() {
        Some(path) => Some(config::load_config_from_path(path)?),
        None => config::discover_config(&project_path)?,
    };
    let config = config.unwrap_or_default();

    let progress_reporter = if args.quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };
    let use_case = GenerateSbomUseCase::new(JsonScanReader::new(), progress_reporter);

    let output = args.output.clone();
    let request = build_request(args, &config, project_path)?;
    let response = use_case.execute(request)?;

    let presenter = PresenterFactory::create(PresenterType::from(output));
    presenter.present(&response.content)?;

    Ok(())
}

/// Merges command-line flags over config-file values
fn build_request(args: Args, config: &ConfigFile, project_path: PathBuf) -> Result<SbomRequest> {
    let format = match args.format {
        Some(format) => format,
        None => config.output_format()?.unwrap_or_default(),
    };
    let spec_version = match args.spec_version {
        Some(version) => version,
        None => config.spec_version()?.unwrap_or_default(),
    };

    let criteria = FilterCriteria {
        required_only: args.required_only || config.required_only.unwrap_or(false),
        only: prefer_cli(args.only, &config.only),
        filter: prefer_cli(args.filter, &config.filter),
        auto_compositions: !args.no_auto_compositions
            && config.auto_compositions.unwrap_or(true),
    };

    SbomRequest::builder()
        .scan_paths(args.input)
        .project_path(project_path)
        .format(format)
        .spec_version(spec_version)
        .criteria(criteria)
        .authors(prefer_cli(args.authors, &config.authors))
        .project(config.project_identity()?)
        .image_metadata(args.image_metadata)
        .build()
}

fn prefer_cli(cli: Vec<String>, config: &Option<Vec<String>>) -> Vec<String> {
    if cli.is_empty() {
        config.clone().unwrap_or_default()
    } else {
        cli
    }
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| SbomError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(SbomError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use sbom_assembler::application::dto::OutputFormat;
    use sbom_assembler::sbom_generation::domain::SpecVersion;
    use std::fs;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["sbom-assembler", "-i", "scan.json"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_validate_project_path_valid_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_project_path(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_validate_project_path_nonexistent() {
        let err = validate_project_path(Path::new("/nonexistent/path/that/does/not/exist"))
            .unwrap_err();
        assert!(format!("{}", err).contains("Directory does not exist"));
    }

    #[test]
    fn test_validate_project_path_file_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("test_file.txt");
        fs::write(&file_path, "test content").unwrap();

        let err = validate_project_path(&file_path).unwrap_err();
        assert!(format!("{}", err).contains("Not a directory"));
    }

    #[test]
    fn test_build_request_cli_overrides_config() {
        let config = ConfigFile {
            format: Some("xml".to_string()),
            spec_version: Some("1.4".to_string()),
            filter: Some(vec!["from-config".to_string()]),
            only: Some(vec!["pkg:npm".to_string()]),
            auto_compositions: Some(false),
            ..ConfigFile::default()
        };
        let request = build_request(
            args(&["-f", "json", "--filter", "from-cli"]),
            &config,
            PathBuf::from("."),
        )
        .unwrap();

        assert_eq!(request.format, OutputFormat::Json);
        assert_eq!(request.spec_version, SpecVersion::V1_4);
        assert_eq!(request.criteria.filter, vec!["from-cli".to_string()]);
        assert_eq!(request.criteria.only, vec!["pkg:npm".to_string()]);
        assert!(!request.criteria.auto_compositions);
    }

    #[test]
    fn test_build_request_defaults_without_config() {
        let request = build_request(args(&[]), &ConfigFile::default(), PathBuf::from(".")).unwrap();
        assert_eq!(request.format, OutputFormat::Json);
        assert_eq!(request.spec_version, SpecVersion::V1_6);
        assert!(request.criteria.auto_compositions);
        assert!(request.project.is_none());
    }
}
