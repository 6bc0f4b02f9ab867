use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tickerboard::cli::setup;
use tickerboard::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for tickerboard::AppCommand {
    fn from(cmd: Commands) -> tickerboard::AppCommand {
        use tickerboard::AppCommand;
        match cmd {
            Commands::SignIn { email, password } => AppCommand::SignIn { email, password },
            Commands::SignUp {
                name,
                email,
                password,
            } => AppCommand::SignUp {
                name,
                email,
                password,
            },
            Commands::VerifyEmail { email } => AppCommand::VerifyEmail { email },
            Commands::ResetPassword {
                new_password,
                confirm_password,
            } => AppCommand::ResetPassword {
                new_password,
                confirm_password,
            },
            Commands::Tickers => AppCommand::Tickers,
            Commands::AddTicker { ticker, name } => AppCommand::AddTicker { ticker, name },
            Commands::Overview { stock, tab } => AppCommand::Overview { stock, tab },
            Commands::Compare { ids } => AppCommand::Compare { ids },
            Commands::Filter { id, set } => AppCommand::Filter { id, sets: set },
            Commands::Zoom { stock, tab, export } => AppCommand::Zoom { stock, tab, export },
            Commands::Logout { yes } => AppCommand::Logout { yes },
            Commands::Shell => AppCommand::Shell,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Sign in to the dashboard
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    SignUp {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Request a password reset email
    VerifyEmail {
        #[arg(long)]
        email: String,
    },
    /// Choose a new password
    ResetPassword {
        #[arg(long)]
        new_password: String,
        #[arg(long)]
        confirm_password: String,
    },
    /// Show the add-ticker grid
    Tickers,
    /// Add a stock to the next open grid slot
    AddTicker {
        ticker: String,
        /// Display name, defaults to the ticker
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Show tracked stocks and the table of the selected one
    Overview {
        /// Stock id to select
        #[arg(short, long)]
        stock: Option<u32>,
        /// Overview tab, e.g. "Past Year"
        #[arg(short, long)]
        tab: Option<String>,
    },
    /// Compare stocks side by side
    Compare {
        /// Stock ids in column order
        #[arg(required = true)]
        ids: Vec<u32>,
    },
    /// Show or edit the valuation filter of a stock
    Filter {
        id: u32,
        /// Field assignment as key=value, repeatable
        #[arg(short, long)]
        set: Vec<String>,
    },
    /// Show a single table full size
    Zoom {
        #[arg(short, long)]
        stock: Option<u32>,
        #[arg(short, long)]
        tab: Option<String>,
        /// Write the table to a CSV file
        #[arg(short, long)]
        export: bool,
    },
    /// Log out and clear stored stocks
    Logout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Interactive session
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup::setup(),
        Some(cmd) => tickerboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
