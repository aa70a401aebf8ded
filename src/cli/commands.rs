use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Skin analysis client core
#[derive(Parser, Debug)]
#[command(
    name = "skinlens",
    about = "Run skin analyses and the onboarding navigation core from the command line",
    version
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Config file (defaults to <config dir>/skinlens/config.toml)"
    )]
    pub config: Option<PathBuf>,

    #[arg(short = 'v', long, global = true, help = "Debug logging for skinlens crates")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Upload a photo and wait for its analysis",
        long_about = "Compresses and uploads the photo, polls until the backend finishes, \
                      validates the result and prints it as JSON. Ctrl-C cancels.\n\n\
                      Examples:\n  \
                      skinlens analyze face.jpg\n  \
                      skinlens analyze face.jpg --report --no-progress"
    )]
    Analyze(AnalyzeArgs),

    #[command(about = "Print the most recent analysis of the signed-in user")]
    Latest,

    #[command(
        about = "Run the splash bootstrap and print the screen it lands on",
        long_about = "Initializes the session, holds the splash screen, then leaves it the \
                      way the app does on cold start. The reactive guard runs alongside."
    )]
    Boot(BootArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct AnalyzeArgs {
    #[arg(value_name = "IMAGE", help = "Photo to analyze")]
    pub image: PathBuf,

    #[arg(long, help = "Include fallback-detection signals in the output")]
    pub report: bool,

    #[arg(long, help = "Do not draw progress on stderr")]
    pub no_progress: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct BootArgs {
    #[arg(
        long,
        value_name = "MS",
        default_value_t = 0,
        help = "Keep the guard running this long after splash before printing"
    )]
    pub linger_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_parses_image_and_flags() {
        let args = CliArgs::parse_from(["skinlens", "analyze", "face.jpg", "--report", "-v"]);
        assert!(args.verbose);
        match args.command {
            Commands::Analyze(analyze) => {
                assert_eq!(analyze.image, PathBuf::from("face.jpg"));
                assert!(analyze.report);
                assert!(!analyze.no_progress);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_is_accepted_after_subcommand() {
        let args = CliArgs::parse_from(["skinlens", "boot", "--config", "/tmp/c.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(args.command, Commands::Boot(BootArgs { linger_ms: 0 })));
    }
}
