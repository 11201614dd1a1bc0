use crate::config::manifest::ResolvedJob;
use crate::core::batch::BatchCompressor;
use crate::core::{BatchReport, Compressor};
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: String,
    pub duration_ms: u64,
    pub report: BatchReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobFailure {
    pub job: String,
    pub error: String,
}

/// Everything a manifest run produced: one report per job that got to run,
/// one entry per job that could not start.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ManifestOutcome {
    pub jobs: Vec<JobReport>,
    pub failed_jobs: Vec<JobFailure>,
}

impl ManifestOutcome {
    pub fn failed_files(&self) -> usize {
        self.jobs.iter().map(|j| j.report.failed()).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failed_jobs.is_empty() && self.failed_files() == 0
    }

    pub fn summary(&self) -> serde_json::Value {
        let total = |f: fn(&BatchReport) -> usize| -> usize {
            self.jobs.iter().map(|j| f(&j.report)).sum()
        };
        serde_json::json!({
            "jobs_run": self.jobs.len(),
            "jobs_failed": self.failed_jobs.len(),
            "files_compressed": total(BatchReport::compressed),
            "files_failed": total(BatchReport::failed),
            "files_skipped": total(BatchReport::skipped),
            "files_planned": total(BatchReport::planned),
            "total_duration_ms": self.jobs.iter().map(|j| j.duration_ms).sum::<u64>(),
        })
    }
}

/// Runs manifest jobs one after another through a single batch engine.
pub struct ManifestRunner<C: Compressor> {
    engine: BatchCompressor<C>,
}

impl<C: Compressor> ManifestRunner<C> {
    pub fn new(engine: BatchCompressor<C>) -> Self {
        Self { engine }
    }

    pub async fn run(&self, jobs: &[ResolvedJob]) -> ManifestOutcome {
        let mut outcome = ManifestOutcome::default();

        for job in jobs {
            tracing::info!("🚀 Job '{}' ({})", job.name, job.directory.display());
            let start_time = Instant::now();

            match self.engine.run(job).await {
                Ok(report) => {
                    let duration = start_time.elapsed();
                    tracing::info!(
                        "✅ Job '{}' finished in {:?} ({} failed files)",
                        job.name,
                        duration,
                        report.failed()
                    );
                    outcome.jobs.push(JobReport {
                        job: job.name.clone(),
                        duration_ms: millis(duration),
                        report,
                    });
                }
                Err(e) => {
                    tracing::error!("❌ Job '{}' could not run: {}", job.name, e);
                    tracing::error!("💡 {}", e.recovery_suggestion());
                    outcome.failed_jobs.push(JobFailure {
                        job: job.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
