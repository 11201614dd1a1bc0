use clap::Parser;
use glb_compress::utils::{logger, validation::Validate};
use glb_compress::{BatchCompressor, BatchReport, CliConfig, CompressError, ProcessCompressor};
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting glb-compress");
    tracing::debug!("CLI config: {:?}", config);

    // 驗證配置
    if let Err(e) = config.validate() {
        fail(&e);
    }

    // 工具在掃描目錄中執行，相對路徑需先以目前目錄為基準
    let cwd = std::env::current_dir()?;
    let template = config.template().resolved_against(&cwd);
    let engine = BatchCompressor::new(ProcessCompressor::new(), template);

    // 逐一壓縮
    let report = match engine.run(&config).await {
        Ok(report) => report,
        Err(e) => fail(&e),
    };

    // 輸出報告
    if let Some(path) = &config.report {
        write_report(path, &report)?;
        tracing::info!("📁 Report written to {}", path.display());
    }

    println!(
        "✅ {} compressed, {} failed, {} skipped{}",
        report.compressed(),
        report.failed(),
        report.skipped(),
        if config.dry_run {
            format!(", {} planned (dry run)", report.planned())
        } else {
            String::new()
        }
    );

    // 嚴格模式下任何失敗都回傳非零退出碼
    if config.strict && !report.is_success() {
        eprintln!("❌ {} file(s) failed to compress", report.failed());
        std::process::exit(1);
    }

    Ok(())
}

fn write_report(path: &Path, report: &BatchReport) -> glb_compress::Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn fail(e: &CompressError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
    std::process::exit(e.severity().exit_code().max(1));
}
