use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use tracing::{debug, error, info};

use shortlinks::cli::{Cli, Commands};
use shortlinks::config::AppConfig;
use shortlinks::interfaces::cli::execute;
use shortlinks::interfaces::console::ConsoleRunner;
use shortlinks::runtime::lifetime::startup::AppContext;
use shortlinks::services::Reaper;
use shortlinks::system::logging::init_logging;
use shortlinks::system::{BrowserOpener, ConsoleNotifier, Notifier, SystemBrowser};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // config-gen 不需要加载配置
    if let Some(Commands::ConfigGen { path }) = &cli.command {
        return match path {
            Some(path) => match AppConfig::default().save_to_file(path) {
                Ok(()) => {
                    println!(
                        "{} Sample configuration written to {}",
                        "✓".bold().green(),
                        path.display().to_string().cyan()
                    );
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{} {:#}", "[ERROR]".bold().red(), e);
                    ExitCode::FAILURE
                }
            },
            None => {
                print!("{}", AppConfig::generate_sample_config());
                ExitCode::SUCCESS
            }
        };
    }

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    let _log_guard = match init_logging(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("{} {:#}", "[ERROR]".bold().red(), e);
            return ExitCode::FAILURE;
        }
    };
    debug!("Configuration loaded: {:?}", config);

    let notifier: Arc<dyn Notifier> = Arc::new(ConsoleNotifier);
    let browser: Arc<dyn BrowserOpener> = Arc::new(SystemBrowser);

    let ctx = match AppContext::build(&config, Arc::clone(&notifier), browser) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to open storage: {}", e);
            notifier.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };

    match cli.command.unwrap_or(Commands::Console) {
        Commands::Console => run_console(&ctx, &config, notifier),
        command => {
            if execute(&ctx, command, notifier.as_ref()) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run_console(ctx: &AppContext, config: &AppConfig, notifier: Arc<dyn Notifier>) -> ExitCode {
    let reaper = match Reaper::spawn(
        Arc::clone(&ctx.link_service),
        Arc::clone(&notifier),
        config.cleanup.interval(),
    ) {
        Ok(reaper) => reaper,
        Err(e) => {
            error!("Failed to start expiry reaper: {}", e);
            notifier.error(&format!("Failed to start expiry reaper: {}", e));
            return ExitCode::FAILURE;
        }
    };

    let result = ConsoleRunner::stdio(ctx, Arc::clone(&notifier)).run();

    // 等待正在进行的清理完成
    reaper.stop();
    info!("Console closed");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            notifier.error(&format!("Console I/O failed: {}", e));
            ExitCode::FAILURE
        }
    }
}
