use crate::core::command::{CommandTemplate, DEFAULT_TOOL};
use crate::core::{ConfigProvider, NamedSettings, Preset, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "glb-compress")]
#[command(about = "Draco-compress every .glb in a directory into .min.glb siblings")]
pub struct CliConfig {
    /// Directory holding the source meshes (not searched recursively)
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Parameter preset: generic or player-model
    #[arg(short, long, default_value = "generic")]
    pub preset: Preset,

    /// Compression tool to run
    #[arg(long, default_value = DEFAULT_TOOL)]
    pub tool: String,

    /// Argument placed before the per-file arguments (repeatable)
    #[arg(long = "tool-arg", allow_hyphen_values = true)]
    pub tool_args: Vec<String>,

    /// Leave sources whose .min.glb already exists untouched
    #[arg(long)]
    pub skip_existing: bool,

    /// Print the commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with a non-zero code when any file fails
    #[arg(long)]
    pub strict: bool,

    /// Write a JSON report of the run to this path
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Log as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn template(&self) -> CommandTemplate {
        CommandTemplate::new(self.tool.clone()).with_extra_args(self.tool_args.iter().cloned())
    }
}

impl ConfigProvider for CliConfig {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn preset(&self) -> Result<NamedSettings> {
        Ok(self.preset.into())
    }

    fn skip_existing(&self) -> bool {
        self.skip_existing
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("directory", &self.directory.to_string_lossy())?;
        validate_non_empty_string("tool", &self.tool)?;
        self.preset.settings().validate()
    }
}
