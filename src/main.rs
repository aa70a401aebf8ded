use clap::Parser;
use tracing::debug;

use skinlens::bootstrap::{resolve_config, wire_dependencies};
use skinlens::cli::commands::{CliArgs, Commands};
use skinlens::cli::handlers::{handle_analyze, handle_boot, handle_latest};
use skinlens::VERSION;

const EXIT_CONFIG: i32 = 2;

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    if let Err(err) = skinlens::bootstrap::tracing::init_tracing_subscriber(args.verbose) {
        eprintln!("Failed to initialize tracing: {err}");
    }
    debug!("skinlens v{} starting", VERSION);

    let deps = match resolve_config(args.config.as_deref())
        .and_then(|config| wire_dependencies(&config).map_err(anyhow::Error::from))
    {
        Ok(deps) => deps,
        Err(err) => {
            eprintln!("{err:#}");
            std::process::exit(EXIT_CONFIG);
        }
    };

    let exit_code = match &args.command {
        Commands::Analyze(analyze_args) => handle_analyze(analyze_args, &deps).await,
        Commands::Latest => handle_latest(&deps).await,
        Commands::Boot(boot_args) => handle_boot(boot_args, &deps).await,
    };

    std::process::exit(exit_code);
}
