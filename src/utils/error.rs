use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Cannot read directory {path:?}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not launch '{program}': {source}")]
    ToolLaunchError {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration '{field}'")]
    MissingConfigError { field: String },

    #[error("Unknown preset '{name}'")]
    UnknownPresetError { name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Tool,
    Configuration,
    Serialization,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// Process exit code used by the binaries for an error of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl CompressError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompressError::IoError(_) | CompressError::DirectoryError { .. } => ErrorCategory::Io,
            CompressError::ToolLaunchError { .. } => ErrorCategory::Tool,
            CompressError::SerializationError(_) => ErrorCategory::Serialization,
            CompressError::TomlError(_)
            | CompressError::ConfigValidationError { .. }
            | CompressError::InvalidConfigValueError { .. }
            | CompressError::MissingConfigError { .. }
            | CompressError::UnknownPresetError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Serialization => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Tool => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            CompressError::DirectoryError { path, .. } => {
                format!("Check that {:?} exists and is readable", path)
            }
            CompressError::ToolLaunchError { program, .. } => format!(
                "Install '{}' (npm install -g gltf-pipeline) or pass --tool with its full path",
                program
            ),
            CompressError::UnknownPresetError { .. } => {
                "Use 'generic', 'player-model' or a preset defined under [presets]".to_string()
            }
            CompressError::TomlError(_) => "Make sure the file is valid TOML".to_string(),
            CompressError::ConfigValidationError { field, .. }
            | CompressError::InvalidConfigValueError { field, .. }
            | CompressError::MissingConfigError { field } => {
                format!("Fix the '{}' setting and run again", field)
            }
            CompressError::SerializationError(_) => {
                "Check that the report path is writable".to_string()
            }
            CompressError::IoError(_) => "Check file permissions and free disk space".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Io => format!("File system problem: {}", self),
            ErrorCategory::Tool => format!("Compression tool problem: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Serialization => format!("Could not write report: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressError>;
