use crate::core::command::CommandTemplate;
use crate::core::{ConfigProvider, DracoSettings, NamedSettings, Preset};
use crate::utils::error::{CompressError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_required_field, Validate,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A TOML file describing several directories to compress, each with its own preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Preset for jobs that do not name one.
    pub default_preset: Option<String>,
    #[serde(default)]
    pub tool: CommandTemplate,
    #[serde(default)]
    pub presets: HashMap<String, DracoSettings>,
    #[serde(default)]
    pub jobs: Vec<JobConfig>,
    /// Directory the manifest was loaded from; relative job directories resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: Option<String>,
    pub directory: PathBuf,
    pub preset: Option<String>,
    pub skip_existing: Option<bool>,
    pub enabled: Option<bool>,
}

impl JobConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.directory.display().to_string())
    }
}

/// A job with its preset and directory resolved, ready to hand to the batch engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedJob {
    pub name: String,
    pub directory: PathBuf,
    pub settings: NamedSettings,
    pub skip_existing: bool,
    pub dry_run: bool,
}

impl ConfigProvider for ResolvedJob {
    fn directory(&self) -> &Path {
        &self.directory
    }

    fn preset(&self) -> Result<NamedSettings> {
        Ok(self.settings.clone())
    }

    fn skip_existing(&self) -> bool {
        self.skip_existing
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

impl ManifestConfig {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;

        // 以設定檔所在目錄作為相對路徑基準
        let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.base_dir = if parent.is_absolute() {
            parent
        } else {
            std::env::current_dir()?.join(parent)
        };
        Ok(config)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed = Self::substitute_env_vars(content)?;
        Ok(toml::from_str(&processed)?)
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CompressError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// Looks a preset up among `[presets.*]` first, then the built-in ones.
    pub fn lookup_preset(&self, name: &str) -> Result<NamedSettings> {
        if let Some(settings) = self.presets.get(name) {
            return Ok(NamedSettings {
                label: name.to_string(),
                settings: settings.clone(),
            });
        }
        name.parse::<Preset>().map(NamedSettings::from)
    }

    fn job_preset(&self, job: &JobConfig) -> Result<NamedSettings> {
        let name = match &job.preset {
            Some(name) => name,
            None => validate_required_field(
                &format!("jobs.{}.preset", job.display_name()),
                &self.default_preset,
            )?,
        };
        self.lookup_preset(name)
    }

    pub fn resolve_directory(&self, directory: &Path) -> PathBuf {
        if directory.is_absolute() {
            directory.to_path_buf()
        } else {
            self.base_dir.join(directory)
        }
    }

    /// The `[tool]` table with relative tool paths anchored to the manifest location.
    pub fn tool_template(&self) -> CommandTemplate {
        self.tool.resolved_against(&self.base_dir)
    }

    /// Enabled jobs in file order.
    pub fn resolve_jobs(&self, dry_run: bool) -> Result<Vec<ResolvedJob>> {
        self.jobs
            .iter()
            .filter(|job| job.is_enabled())
            .map(|job| {
                Ok(ResolvedJob {
                    name: job.display_name(),
                    directory: self.resolve_directory(&job.directory),
                    settings: self.job_preset(job)?,
                    skip_existing: job.skip_existing.unwrap_or(false),
                    dry_run,
                })
            })
            .collect()
    }
}

impl Validate for ManifestConfig {
    fn validate(&self) -> Result<()> {
        // 驗證工具設定
        validate_non_empty_string("tool.program", &self.tool.program)?;

        if self.jobs.is_empty() {
            return Err(CompressError::ConfigValidationError {
                field: "jobs".to_string(),
                message: "at least one [[jobs]] entry is required".to_string(),
            });
        }

        // 驗證自訂預設參數
        for (name, settings) in &self.presets {
            settings.validate().map_err(|e| CompressError::ConfigValidationError {
                field: format!("presets.{}", name),
                message: e.to_string(),
            })?;
        }

        for job in &self.jobs {
            validate_path(
                &format!("jobs.{}.directory", job.display_name()),
                &job.directory.to_string_lossy(),
            )?;
            self.job_preset(job)?;
        }

        Ok(())
    }
}
