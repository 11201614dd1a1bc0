use crate::core::command::CommandTemplate;
use crate::core::selection::scan_directory;
use crate::domain::model::{BatchReport, FileOutcome, Invocation, MeshSource, OutcomeStatus};
use crate::domain::ports::{Compressor, ConfigProvider};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::Utc;
use std::path::Path;

/// Runs the compression tool over every source mesh of one directory, one
/// file at a time. A failing file is recorded and the batch moves on.
pub struct BatchCompressor<C: Compressor> {
    compressor: C,
    template: CommandTemplate,
}

impl<C: Compressor> BatchCompressor<C> {
    pub fn new(compressor: C, template: CommandTemplate) -> Self {
        Self {
            compressor,
            template,
        }
    }

    pub async fn run<P: ConfigProvider>(&self, config: &P) -> Result<BatchReport> {
        let directory = config.directory();

        // 驗證壓縮參數
        let preset = config.preset()?;
        preset.settings.validate()?;

        let started_at = Utc::now();
        tracing::info!(
            "🔍 Scanning {} (preset: {})",
            directory.display(),
            preset.label
        );
        let sources = scan_directory(directory)?;
        tracing::info!("Found {} source meshes", sources.len());

        let mut outcomes = Vec::with_capacity(sources.len());
        for source in sources {
            let invocation = self.template.build(&source, &preset.settings);
            // 先判斷是否略過，試跑結果才會與實際執行一致
            let status = if config.skip_existing() && directory.join(&invocation.output).exists() {
                tracing::info!("⏭️  {} already compressed, skipping", invocation.input);
                OutcomeStatus::Skipped
            } else if config.dry_run() {
                tracing::info!("📝 [dry run] {}", invocation);
                OutcomeStatus::Planned {
                    command: invocation.to_string(),
                }
            } else {
                self.execute(directory, &invocation).await
            };

            outcomes.push(outcome(source, invocation, status));
        }

        let report = BatchReport {
            directory: directory.to_path_buf(),
            preset: preset.label,
            started_at,
            finished_at: Utc::now(),
            outcomes,
        };

        tracing::info!(
            "📊 {}: {} compressed, {} failed, {} skipped, {} planned",
            directory.display(),
            report.compressed(),
            report.failed(),
            report.skipped(),
            report.planned()
        );

        Ok(report)
    }

    async fn execute(&self, directory: &Path, invocation: &Invocation) -> OutcomeStatus {
        tracing::debug!("Running: {}", invocation);

        match self.compressor.compress(directory, invocation).await {
            Ok(status) if status.success => {
                if !directory.join(&invocation.output).exists() {
                    tracing::warn!(
                        "⚠️  {} exited successfully but {} was not written",
                        invocation.program,
                        invocation.output
                    );
                }
                tracing::info!(
                    "✅ {} -> {} (exit code {})",
                    invocation.input,
                    invocation.output,
                    exit_code_label(status.exit_code)
                );
                OutcomeStatus::Compressed
            }
            Ok(status) => {
                tracing::warn!(
                    "❌ {} failed (exit code {}): {}",
                    invocation.input,
                    exit_code_label(status.exit_code),
                    status.stderr
                );
                OutcomeStatus::ToolFailed {
                    exit_code: status.exit_code,
                    stderr: status.stderr,
                }
            }
            Err(e) => {
                tracing::error!("❌ {}: {}", invocation.input, e);
                tracing::error!("💡 {}", e.recovery_suggestion());
                OutcomeStatus::LaunchFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn outcome(source: MeshSource, invocation: Invocation, status: OutcomeStatus) -> FileOutcome {
    FileOutcome {
        source,
        input: invocation.input,
        output: invocation.output,
        status,
    }
}

fn exit_code_label(code: Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none, killed by signal".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{NamedSettings, Preset, ToolStatus};
    use crate::utils::error::CompressError;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    struct TestConfig {
        directory: PathBuf,
        preset: Preset,
        skip_existing: bool,
        dry_run: bool,
    }

    impl TestConfig {
        fn new(directory: &Path, preset: Preset) -> Self {
            Self {
                directory: directory.to_path_buf(),
                preset,
                skip_existing: false,
                dry_run: false,
            }
        }
    }

    impl ConfigProvider for TestConfig {
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

    /// Records invocations; fails for any input listed in `failing`.
    #[derive(Clone, Default)]
    struct MockCompressor {
        calls: Arc<Mutex<Vec<Invocation>>>,
        failing: Vec<String>,
        unlaunchable: bool,
    }

    impl MockCompressor {
        fn calls(&self) -> Vec<Invocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Compressor for MockCompressor {
        async fn compress(&self, working_dir: &Path, invocation: &Invocation) -> Result<ToolStatus> {
            self.calls.lock().unwrap().push(invocation.clone());
            if self.unlaunchable {
                return Err(CompressError::ToolLaunchError {
                    program: invocation.program.clone(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            if self.failing.contains(&invocation.input) {
                return Ok(ToolStatus {
                    exit_code: Some(2),
                    success: false,
                    stderr: "bad mesh".to_string(),
                });
            }
            std::fs::write(working_dir.join(&invocation.output), b"draco")?;
            Ok(ToolStatus {
                exit_code: Some(0),
                success: true,
                stderr: String::new(),
            })
        }
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"glTF").unwrap();
    }

    #[tokio::test]
    async fn test_no_sources_no_invocations() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "notes.txt");
        let mock = MockCompressor::default();
        let engine = BatchCompressor::new(mock.clone(), CommandTemplate::default());

        let report = engine
            .run(&TestConfig::new(dir.path(), Preset::Generic))
            .await
            .unwrap();

        assert!(mock.calls().is_empty());
        assert!(report.outcomes.is_empty());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_one_preset_for_whole_directory() {
        let dir = TempDir::new().unwrap();
        for name in ["a.glb", "b.glb", "b.min.glb"] {
            touch(dir.path(), name);
        }
        let mock = MockCompressor::default();
        let engine = BatchCompressor::new(mock.clone(), CommandTemplate::default());

        let report = engine
            .run(&TestConfig::new(dir.path(), Preset::PlayerModel))
            .await
            .unwrap();

        let calls = mock.calls();
        let inputs: Vec<_> = calls.iter().map(|c| c.input.as_str()).collect();
        assert_eq!(inputs, vec!["a.glb", "b.glb"]);
        let expected = CommandTemplate::default()
            .build(&MeshSource::new("a"), &Preset::PlayerModel.settings());
        assert_eq!(&calls[0].args[4..], &expected.args[4..]);
        assert_eq!(&calls[1].args[4..], &expected.args[4..]);
        assert_eq!(report.preset, "player-model");
        assert_eq!(report.compressed(), 2);
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let dir = TempDir::new().unwrap();
        for name in ["a.glb", "b.glb", "c.glb"] {
            touch(dir.path(), name);
        }
        let mock = MockCompressor {
            failing: vec!["b.glb".to_string()],
            ..Default::default()
        };
        let engine = BatchCompressor::new(mock.clone(), CommandTemplate::default());

        let report = engine
            .run(&TestConfig::new(dir.path(), Preset::Generic))
            .await
            .unwrap();

        assert_eq!(mock.calls().len(), 3);
        assert_eq!(report.compressed(), 2);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.outcomes[1].status,
            OutcomeStatus::ToolFailed {
                exit_code: Some(2),
                stderr: "bad mesh".to_string()
            }
        );
        assert!(dir.path().join("c.min.glb").exists());
    }

    #[tokio::test]
    async fn test_missing_tool_recorded_per_file() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a.glb");
        touch(dir.path(), "b.glb");
        let mock = MockCompressor {
            unlaunchable: true,
            ..Default::default()
        };
        let engine = BatchCompressor::new(mock.clone(), CommandTemplate::default());

        let report = engine
            .run(&TestConfig::new(dir.path(), Preset::Generic))
            .await
            .unwrap();

        assert_eq!(mock.calls().len(), 2);
        assert_eq!(report.failed(), 2);
        assert!(matches!(
            report.outcomes[0].status,
            OutcomeStatus::LaunchFailed { .. }
        ));
    }

    #[tokio::test]
    async fn test_skip_existing() {
        let dir = TempDir::new().unwrap();
        for name in ["a.glb", "b.glb", "b.min.glb"] {
            touch(dir.path(), name);
        }
        let mock = MockCompressor::default();
        let engine = BatchCompressor::new(mock.clone(), CommandTemplate::default());
        let mut config = TestConfig::new(dir.path(), Preset::Generic);
        config.skip_existing = true;

        let report = engine.run(&config).await.unwrap();

        assert_eq!(mock.calls().len(), 1);
        assert_eq!(mock.calls()[0].input, "a.glb");
        assert_eq!(report.skipped(), 1);
    }

    #[tokio::test]
    async fn test_dry_run_spawns_nothing() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "x.glb");
        let mock = MockCompressor::default();
        let engine = BatchCompressor::new(mock.clone(), CommandTemplate::default());
        let mut config = TestConfig::new(dir.path(), Preset::Generic);
        config.dry_run = true;

        let report = engine.run(&config).await.unwrap();

        assert!(mock.calls().is_empty());
        assert_eq!(report.planned(), 1);
        match &report.outcomes[0].status {
            OutcomeStatus::Planned { command } => {
                assert!(command.starts_with("gltf-pipeline -i x.glb -o x.min.glb -d"))
            }
            other => panic!("unexpected status {:?}", other),
        }
        assert!(!dir.path().join("x.min.glb").exists());
    }

    #[tokio::test]
    async fn test_dry_run_previews_skips() {
        let dir = TempDir::new().unwrap();
        for name in ["a.glb", "b.glb", "b.min.glb"] {
            touch(dir.path(), name);
        }
        let mock = MockCompressor::default();
        let engine = BatchCompressor::new(mock.clone(), CommandTemplate::default());
        let mut config = TestConfig::new(dir.path(), Preset::Generic);
        config.skip_existing = true;
        config.dry_run = true;

        let report = engine.run(&config).await.unwrap();

        assert!(mock.calls().is_empty());
        assert_eq!(report.planned(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(matches!(
            report.outcomes[0].status,
            OutcomeStatus::Planned { .. }
        ));
        assert_eq!(report.outcomes[1].source.base(), "b");
        assert_eq!(report.outcomes[1].status, OutcomeStatus::Skipped);
    }

    #[tokio::test]
    async fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let engine = BatchCompressor::new(MockCompressor::default(), CommandTemplate::default());

        let result = engine
            .run(&TestConfig::new(&dir.path().join("gone"), Preset::Generic))
            .await;

        assert!(matches!(result, Err(CompressError::DirectoryError { .. })));
    }
}
