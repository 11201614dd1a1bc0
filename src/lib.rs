pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::ProcessCompressor;
pub use app::{ManifestOutcome, ManifestRunner};
pub use config::ManifestConfig;
pub use core::{batch::BatchCompressor, command::CommandTemplate};
pub use domain::model::{BatchReport, DracoSettings, Preset};
pub use utils::error::{CompressError, Result};
