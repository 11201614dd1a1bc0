pub mod batch;
pub mod command;
pub mod selection;

pub use crate::domain::model::{
    BatchReport, DracoSettings, FileOutcome, Invocation, MeshSource, NamedSettings, OutcomeStatus,
    Preset, ToolStatus,
};
pub use crate::domain::ports::{Compressor, ConfigProvider};
pub use crate::utils::error::Result;
