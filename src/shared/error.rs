use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to tell an empty result apart from a
/// usage error or an application failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// BOM generated and written
    Success = 0,
    /// Generation produced an empty or unusable result set
    EmptyResult = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (unreadable scan, file I/O error, serialization error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::EmptyResult => write!(f, "Empty Result (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for BOM generation.
///
/// Malformed individual package records never end up here; they are
/// skipped inside the engine. These are the failures a caller must see.
#[derive(Debug, Error)]
pub enum SbomError {
    #[error("Scan result file not found: {path}\n\n💡 Hint: {suggestion}")]
    ScanFileNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse scan result: {path}\nDetails: {details}\n\n💡 Hint: A scan result is a JSON object with `ecosystem` and `packages` fields")]
    ScanParseError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid project directory")]
    InvalidProjectPath { path: PathBuf, reason: String },

    /// Validation error for requests and filter criteria
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    #[error("All {original_count} component(s) were removed by the provided filters. The BOM would be empty.\n\n💡 Hint: Please adjust --only, --filter or --required-only")]
    EmptyBom { original_count: usize },
}

impl SbomError {
    /// Exit code a CLI should use for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            SbomError::EmptyBom { .. } => ExitCode::EmptyResult,
            _ => ExitCode::ApplicationError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::EmptyResult.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(format!("{}", ExitCode::EmptyResult), "Empty Result (1)");
        assert_eq!(
            format!("{}", ExitCode::InvalidArguments),
            "Invalid Arguments (2)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_scan_file_not_found_display() {
        let error = SbomError::ScanFileNotFound {
            path: PathBuf::from("/scans/npm.json"),
            suggestion: "Run the npm parser first".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Scan result file not found"));
        assert!(display.contains("/scans/npm.json"));
        assert!(display.contains("💡 Hint:"));
        assert!(display.contains("Run the npm parser first"));
    }

    #[test]
    fn test_scan_parse_error_display() {
        let error = SbomError::ScanParseError {
            path: PathBuf::from("/scans/bad.json"),
            details: "expected value at line 1".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to parse scan result"));
        assert!(display.contains("/scans/bad.json"));
        assert!(display.contains("expected value at line 1"));
    }

    #[test]
    fn test_file_write_error_display() {
        let error = SbomError::FileWriteError {
            path: PathBuf::from("/test/bom.json"),
            details: "Permission denied".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Failed to write to file"));
        assert!(display.contains("Permission denied"));
    }

    #[test]
    fn test_security_error_display() {
        let error = SbomError::SecurityError {
            path: PathBuf::from("/test/symlink"),
            reason: "Symbolic links are not allowed".to_string(),
            hint: "Use a regular file instead".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Security violation"));
        assert!(display.contains("/test/symlink"));
        assert!(display.contains("Use a regular file instead"));
    }

    #[test]
    fn test_empty_bom_display_and_exit_code() {
        let error = SbomError::EmptyBom { original_count: 3 };
        assert!(error.to_string().contains("All 3 component(s) were removed"));
        assert_eq!(error.exit_code(), ExitCode::EmptyResult);

        let other = SbomError::Validation {
            message: "bad".to_string(),
        };
        assert_eq!(other.exit_code(), ExitCode::ApplicationError);
    }
}
