use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::utils::error::CompressError;

/// Extension of an uncompressed source mesh.
pub const SOURCE_EXTENSION: &str = ".glb";
/// Doubled suffix marking an already compressed output.
pub const COMPRESSED_EXTENSION: &str = ".min.glb";

/// A source mesh found during one scan, identified by its base name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MeshSource {
    base: String,
}

impl MeshSource {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn input_name(&self) -> String {
        format!("{}{}", self.base, SOURCE_EXTENSION)
    }

    pub fn output_name(&self) -> String {
        format!("{}{}", self.base, COMPRESSED_EXTENSION)
    }
}

/// Draco parameters handed to the compression tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DracoSettings {
    pub compression_level: u8,
    pub quantize_position_bits: u8,
    pub quantize_texcoord_bits: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantize_normal_bits: Option<u8>,
    #[serde(default = "default_unified_quantization")]
    pub unified_quantization: bool,
}

fn default_unified_quantization() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Generic,
    PlayerModel,
}

impl Preset {
    pub fn settings(self) -> DracoSettings {
        match self {
            Preset::Generic => DracoSettings {
                compression_level: 8,
                quantize_position_bits: 15,
                quantize_texcoord_bits: 14,
                quantize_normal_bits: Some(4),
                unified_quantization: true,
            },
            Preset::PlayerModel => DracoSettings {
                compression_level: 7,
                quantize_position_bits: 16,
                quantize_texcoord_bits: 14,
                quantize_normal_bits: None,
                unified_quantization: true,
            },
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Generic => "generic",
            Preset::PlayerModel => "player-model",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = CompressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "generic" => Ok(Preset::Generic),
            "player-model" | "player_model" | "playermodel" | "player" => Ok(Preset::PlayerModel),
            _ => Err(CompressError::UnknownPresetError {
                name: s.to_string(),
            }),
        }
    }
}

/// Settings applied to every file of one batch, with the label they were selected by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedSettings {
    pub label: String,
    pub settings: DracoSettings,
}

impl From<Preset> for NamedSettings {
    fn from(preset: Preset) -> Self {
        Self {
            label: preset.name().to_string(),
            settings: preset.settings(),
        }
    }
}

/// One fully built call of the compression tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub input: String,
    pub output: String,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// How the tool process ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolStatus {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stderr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Compressed,
    ToolFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
    LaunchFailed {
        reason: String,
    },
    Skipped,
    Planned {
        command: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileOutcome {
    pub source: MeshSource,
    pub input: String,
    pub output: String,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl FileOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(
            self.status,
            OutcomeStatus::ToolFailed { .. } | OutcomeStatus::LaunchFailed { .. }
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub directory: PathBuf,
    pub preset: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn compressed(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Compressed))
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failure()).count()
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Skipped))
    }

    pub fn planned(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Planned { .. }))
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_names() {
        let source = MeshSource::new("x");
        assert_eq!(source.input_name(), "x.glb");
        assert_eq!(source.output_name(), "x.min.glb");
    }

    #[test]
    fn test_preset_table() {
        let generic = Preset::Generic.settings();
        assert_eq!(generic.compression_level, 8);
        assert_eq!(generic.quantize_position_bits, 15);
        assert_eq!(generic.quantize_texcoord_bits, 14);
        assert_eq!(generic.quantize_normal_bits, Some(4));
        assert!(generic.unified_quantization);

        let player = Preset::PlayerModel.settings();
        assert_eq!(player.compression_level, 7);
        assert_eq!(player.quantize_position_bits, 16);
        assert_eq!(player.quantize_texcoord_bits, 14);
        assert_eq!(player.quantize_normal_bits, None);
        assert!(player.unified_quantization);
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!("generic".parse::<Preset>().unwrap(), Preset::Generic);
        assert_eq!("Player-Model".parse::<Preset>().unwrap(), Preset::PlayerModel);
        assert!("playermodels".parse::<Preset>().is_err());
        assert_eq!("player".parse::<Preset>().unwrap(), Preset::PlayerModel);
    }

    #[test]
    fn test_invocation_display_quotes_whitespace() {
        let invocation = Invocation {
            program: "gltf-pipeline".to_string(),
            args: vec!["-i".to_string(), "my mesh.glb".to_string()],
            input: "my mesh.glb".to_string(),
            output: "my mesh.min.glb".to_string(),
        };
        assert_eq!(invocation.to_string(), "gltf-pipeline -i \"my mesh.glb\"");
    }

    #[test]
    fn test_report_counts() {
        let outcome = |base: &str, status: OutcomeStatus| FileOutcome {
            source: MeshSource::new(base),
            input: format!("{}.glb", base),
            output: format!("{}.min.glb", base),
            status,
        };
        let now = Utc::now();
        let report = BatchReport {
            directory: PathBuf::from("."),
            preset: "generic".to_string(),
            started_at: now,
            finished_at: now,
            outcomes: vec![
                outcome("a", OutcomeStatus::Compressed),
                outcome(
                    "b",
                    OutcomeStatus::ToolFailed {
                        exit_code: Some(1),
                        stderr: String::new(),
                    },
                ),
                outcome("c", OutcomeStatus::Skipped),
            ],
        };
        assert_eq!(report.compressed(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(!report.is_success());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"][1]["status"], "tool_failed");
        assert_eq!(json["outcomes"][1]["exit_code"], 1);
    }
}
