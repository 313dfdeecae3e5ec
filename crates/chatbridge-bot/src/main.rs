//! Main entry point for the chatbridge bot.

use chatbridge_bot::bot::install_panic_hook;
use chatbridge_bot::{Args, ChatBridge};
use chatbridge_common::{init_logging, report_error, LoggingConfig};
use chatbridge_config::{load_dotenv, EnvLoader};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = load_dotenv();

    let env = EnvLoader::from_env();
    init_logging(&LoggingConfig::from(&env.logging_settings()))?;
    info!(tag = "setup", "Logger loaded!");

    let args = Args::from_env();
    install_panic_hook(args.dry_run);

    info!(tag = "setup", "Loading environment variables...");
    let config = match dotenv.and_then(|_| env.load()) {
        Ok(config) => config,
        Err(err) => {
            report_error(&err);
            std::process::exit(1);
        }
    };

    if let Err(err) = ChatBridge::new(args, config).run().await {
        report_error(&err);
        std::process::exit(1);
    }

    Ok(())
}
