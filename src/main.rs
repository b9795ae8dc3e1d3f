mod config;
mod countdown;
mod signals;

use clap::Parser;
use countdown::{Countdown, Outcome};
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// A timed confirmation gate for push workflows: print a warning, wait a
/// fixed window for SIGINT/SIGTERM, then exit 0 (proceed) or 1 (aborted)
/// so the calling script can branch on the result.
#[derive(Parser, Debug)]
#[command(name = "pushgate", version, about)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "pushgate.toml")]
    config: PathBuf,

    /// Abort window in milliseconds (overrides config)
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Poll quantum in milliseconds (overrides config)
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Validate config and print resolved settings, don't wait
    #[arg(long)]
    dry_run: bool,

    /// Extra logging on stderr (signal deliveries, loop checks)
    #[arg(short, long)]
    verbose: bool,
}

/// Exit code for invocation errors (bad config, handler installation),
/// distinct from the gate's own 0/1 so callers can tell them apart.
const EXIT_USAGE: i32 = 2;

fn print_banner(timeout: Duration) {
    let secs = timeout.as_millis() as f64 / 1000.0;
    println!(
        "\nYou have {} seconds to abort this process (Ctrl+C or send SIGTERM) if you want to stop the push workflow.",
        secs
    );
    println!("If you do nothing, the workflow will continue and your changes will be committed and pushed.");
    println!("If you abort, the workflow will stop and nothing will be pushed.\n");
    // Make the warning visible even if the process is interrupted right away
    let _ = std::io::stdout().flush();
}

fn finish(outcome: Outcome) -> ! {
    match outcome {
        Outcome::Aborted => println!("\nAborted by user. Exiting with code 1."),
        Outcome::Proceed => {
            println!("\nNo abort detected. Proceeding with the workflow. Exiting with code 0.")
        }
    }
    let _ = std::io::stdout().flush();
    std::process::exit(outcome.exit_code());
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| if cli.verbose { "debug" } else { "warn" }.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(?cli, "parsed CLI arguments");

    let mut config = match config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("pushgate: {}", e);
            std::process::exit(EXIT_USAGE);
        }
    };
    config.apply_overrides(cli.timeout_ms, cli.poll_interval_ms);
    if let Err(e) = config.validate() {
        eprintln!("pushgate: {}", e);
        std::process::exit(EXIT_USAGE);
    }
    tracing::debug!(?config, "resolved configuration");

    let timeout = Duration::from_millis(config.countdown.timeout_ms);
    let poll_interval = Duration::from_millis(config.countdown.poll_interval_ms);

    if cli.dry_run {
        println!("pushgate v{}", env!("CARGO_PKG_VERSION"));
        println!("Config file: {}", cli.config.display());
        println!("Abort window: {}ms", config.countdown.timeout_ms);
        println!("Poll quantum: {}ms", config.countdown.poll_interval_ms);
        println!("Dry run mode — config validated, not waiting.");
        return;
    }

    print_banner(timeout);

    let flag = signals::AbortFlag::new();
    if let Err(e) = signals::install(&flag) {
        eprintln!("pushgate: {}", e);
        std::process::exit(EXIT_USAGE);
    }

    let outcome = Countdown::new(timeout, poll_interval).run(&flag).await;
    finish(outcome);
}
