pub mod manifest_runner;

pub use manifest_runner::{ManifestOutcome, ManifestRunner};
