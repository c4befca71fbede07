use anyhow::Result;
use clap::Parser;
use pedagent::cli::{self, Cli, Commands, RuntimeOptions};
use std::sync::Arc;
use tokio::runtime::Runtime;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let options = RuntimeOptions::from(&cli);

    // Routes all log::info!() etc. to the debug log file; stdout stays
    // reserved for the bridge protocol.
    // CLI --log-level takes precedence, then RUST_LOG, then config (applied below).
    pedagent::debug::init_log_bridge(options.log_level);

    let config = options.load_config()?;
    pedagent::debug::set_level(config.log_level);
    log::info!("Starting pedagent ({:?})", cli.command);

    match cli.command {
        Commands::Serve => {
            let backend = Arc::new(cli::chat_backend(&config)?);
            let runtime = Runtime::new()?;
            let result = runtime.block_on(pedagent::bridge::run_stdio(backend, config));
            runtime.shutdown_timeout(std::time::Duration::from_secs(2));
            result
        }
        Commands::Chat { message } => {
            let backend = cli::chat_backend(&config)?;
            let reply = cli::run_chat(&backend, &message)?;
            println!("{reply}");
            Ok(())
        }
        Commands::Config => {
            print!("{}", cli::render_config(&options.config_path(), &config)?);
            Ok(())
        }
    }
}
