use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "focusquest", version, about = "FocusQuest CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a countdown in the foreground
    Run(commands::run::RunArgs),
    /// Show experience, level, coins and themes
    Status,
    /// Award experience directly
    Award {
        /// Experience points to add
        amount: u64,
    },
    /// Theme shop
    Shop {
        #[command(subcommand)]
        action: commands::shop::ShopAction,
    },
    /// Completed focus sessions, newest first
    History {
        /// Show at most this many sessions
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FOCUSQUEST_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Status => commands::status::run(),
        Commands::Award { amount } => commands::award::run(amount),
        Commands::Shop { action } => commands::shop::run(action),
        Commands::History { limit } => commands::history::run(limit),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
