use crate::domain::model::{DracoSettings, Invocation, MeshSource};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_TOOL: &str = "gltf-pipeline";

/// Fixed command shape for the compression tool: program, leading arguments
/// (for wrappers such as `npx`), then the per-file arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTemplate {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default)]
    pub extra_args: Vec<String>,
}

fn default_program() -> String {
    DEFAULT_TOOL.to_string()
}

impl Default for CommandTemplate {
    fn default() -> Self {
        Self {
            program: default_program(),
            extra_args: Vec::new(),
        }
    }
}

impl CommandTemplate {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            extra_args: Vec::new(),
        }
    }

    pub fn with_extra_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Anchors relative paths (`./bin/tool`) in the program and leading
    /// arguments to `base`, since the child runs inside the scanned directory.
    /// Bare names (`npx`) stay on `PATH`; flags are left alone.
    pub fn resolved_against(&self, base: &Path) -> Self {
        Self {
            program: resolve_path_like(&self.program, base),
            extra_args: self
                .extra_args
                .iter()
                .map(|arg| resolve_path_like(arg, base))
                .collect(),
        }
    }

    pub fn build(&self, source: &MeshSource, settings: &DracoSettings) -> Invocation {
        let input = source.input_name();
        let output = source.output_name();

        let mut args = self.extra_args.clone();
        args.extend([
            "-i".to_string(),
            input.clone(),
            "-o".to_string(),
            output.clone(),
            "-d".to_string(),
            "--draco.compressionLevel".to_string(),
            settings.compression_level.to_string(),
            "--draco.quantizePositionBits".to_string(),
            settings.quantize_position_bits.to_string(),
            "--draco.unifiedQuantization".to_string(),
            settings.unified_quantization.to_string(),
            "--draco.quantizeTexcoordBits".to_string(),
            settings.quantize_texcoord_bits.to_string(),
        ]);
        if let Some(bits) = settings.quantize_normal_bits {
            args.push("--draco.quantizeNormalBits".to_string());
            args.push(bits.to_string());
        }

        Invocation {
            program: self.program.clone(),
            args,
            input,
            output,
        }
    }
}

fn resolve_path_like(value: &str, base: &Path) -> String {
    let has_separator = value.contains('/') || value.contains(std::path::MAIN_SEPARATOR);
    let path = Path::new(value);
    if value.starts_with('-') || !has_separator || path.is_absolute() {
        return value.to_string();
    }
    base.join(path).to_string_lossy().into_owned()
}
