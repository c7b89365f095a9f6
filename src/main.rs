use anyhow::{Context, Result};
use console::style;
use log::{error, info};
use media_queue_publisher::component::{JobOrchestrator, Transcriber, WhisperClient, open_store};
use media_queue_publisher::config::Config;
use media_queue_publisher::init;
use media_queue_publisher::signal::setup_shutdown_signal;
use std::process::ExitCode;

fn main() -> ExitCode {
    init::init();

    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e:#}");
            eprintln!("{} {e:#}", style("錯誤:").red().bold());
            ExitCode::FAILURE
        }
    }
}

/// 處理一次佇列，全部成功或略過時回傳 `true`
fn run() -> Result<bool> {
    let shutdown_signal = setup_shutdown_signal()?;

    let config = Config::from_env()?;
    rust_i18n::set_locale(&config.display_locale);
    info!(
        "儲存後端: {:?}, 佇列: {}, 工作目錄: {}",
        config.storage_backend,
        config.queue_prefix(),
        config.workspace_dir.display()
    );

    let store = open_store(&config)?;
    let transcriber = WhisperClient::from_config(&config)
        .context("無法建立轉錄客戶端")?
        .map(|client| Box::new(client) as Box<dyn Transcriber>);

    let orchestrator = JobOrchestrator::new(config, store, transcriber, shutdown_signal)?;
    let summary = orchestrator.run()?;
    summary.print();

    Ok(!summary.has_failures())
}
