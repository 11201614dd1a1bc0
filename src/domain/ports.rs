use crate::domain::model::{Invocation, NamedSettings, ToolStatus};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// The external mesh compressor. `Err` means the tool could not be run at
/// all; a tool that ran and failed is reported through `ToolStatus`.
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(&self, working_dir: &Path, invocation: &Invocation) -> Result<ToolStatus>;
}

pub trait ConfigProvider: Send + Sync {
    fn directory(&self) -> &Path;
    fn preset(&self) -> Result<NamedSettings>;
    fn skip_existing(&self) -> bool;
    fn dry_run(&self) -> bool;
}
