use anyhow::Context;
use clap::Parser;
use glb_compress::utils::{logger, validation::Validate};
use glb_compress::{BatchCompressor, ManifestConfig, ManifestRunner, ProcessCompressor};

#[derive(Parser)]
#[command(name = "manifest-compress")]
#[command(about = "Compress several mesh directories described by a TOML manifest")]
struct Args {
    /// Path to the TOML manifest
    #[arg(short, long, default_value = "compress.toml")]
    config: String,

    /// Print the commands without running them
    #[arg(long)]
    dry_run: bool,

    /// Exit with a non-zero code when any job or file fails
    #[arg(long)]
    strict: bool,

    /// Write the combined JSON report to this path
    #[arg(long)]
    report: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("📁 Loading manifest from: {}", args.config);

    // 載入 TOML 設定
    let config = match ManifestConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load manifest '{}': {}", args.config, e);
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.severity().exit_code().max(1));
        }
    };

    // 驗證設定
    if let Err(e) = config.validate() {
        tracing::error!("❌ Manifest validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.severity().exit_code().max(1));
    }

    let jobs = config.resolve_jobs(args.dry_run)?;
    tracing::info!("✅ Manifest loaded: {} enabled job(s)", jobs.len());
    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be compressed");
    }

    // 依序執行每個工作
    let engine = BatchCompressor::new(ProcessCompressor::new(), config.tool_template());
    let outcome = ManifestRunner::new(engine).run(&jobs).await;

    // 輸出合併報告
    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&outcome)?;
        std::fs::write(path, json).with_context(|| format!("writing report to {}", path))?;
        tracing::info!("📁 Report written to {}", path);
    }

    println!("📊 {}", outcome.summary());

    if args.strict && !outcome.is_success() {
        eprintln!(
            "❌ {} job(s) could not run, {} file(s) failed",
            outcome.failed_jobs.len(),
            outcome.failed_files()
        );
        std::process::exit(1);
    }

    Ok(())
}
