//! Executive portal main entry point

use clap::Parser;
use execportal_api::start_server;
use execportal_config::Config;
use execportal_core::{DefaultErrorLogger, ErrorContext, ErrorLogger, Ledger};
use execportal_loader::DefaultCsvLoader;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tokio::sync::RwLock;

#[derive(Parser, Debug)]
#[command(name = "execportal")]
#[command(version = "0.1.0")]
#[command(about = "Financial statements and performance metrics from trial balance data", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e.into());
        }
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.to_lowercase()),
    )
    .init();

    log::info!(
        "Config loaded: data path={}, trial balance={}, metrics={}",
        config.data.path.display(),
        config.data.trial_balance_file,
        config.data.performance_metrics_file
    );

    let rt = Runtime::new()?;
    rt.block_on(async {
        let loader = Arc::new(DefaultCsvLoader);
        let ledger = Arc::new(RwLock::new(Ledger::new(config.clone(), loader)));

        {
            let mut ledger_guard = ledger.write().await;
            match ledger_guard.load().await {
                Ok(()) => log::info!("Ledger loaded successfully"),
                Err(e) => {
                    let context = ErrorContext::new("startup load")
                        .with_data("path", config.trial_balance_path().display().to_string().into());
                    DefaultErrorLogger.log_error(&e, &context);
                    log::warn!("Serving without data; POST /api/reload once the files are in place");
                }
            }
        }

        start_server(config, ledger).await
    })?;

    Ok(())
}
