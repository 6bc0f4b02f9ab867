pub mod cli;
pub mod core;
pub mod store;

use crate::core::auth::{
    AuthRequest, ResetPasswordForm, SignInForm, SignUpForm, SimulatedAuthService, VerifyEmailForm,
};
use crate::core::config::AppConfig;
use crate::core::provider::MockFinancialDataProvider;
use crate::core::stock::placeholder_slots;
use crate::core::{Route, Session};
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        name: String,
        email: String,
        password: String,
    },
    VerifyEmail {
        email: String,
    },
    ResetPassword {
        new_password: String,
        confirm_password: String,
    },
    Tickers,
    AddTicker {
        ticker: String,
        name: Option<String>,
    },
    Overview {
        stock: Option<u32>,
        tab: Option<String>,
    },
    Compare {
        ids: Vec<u32>,
    },
    Filter {
        id: u32,
        sets: Vec<String>,
    },
    Zoom {
        stock: Option<u32>,
        tab: Option<String>,
        export: bool,
    },
    Logout {
        yes: bool,
    },
    Shell,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Tickerboard starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let storage = store::open_storage(&config)?;
    let auth = SimulatedAuthService::new(config.auth.simulated_delay());
    let provider = MockFinancialDataProvider::new();
    let start = |route: Route| {
        Session::start(
            storage.clone(),
            placeholder_slots(config.placeholder_slots),
            &config.default_country,
            route,
        )
    };

    match command {
        AppCommand::SignIn { email, password } => {
            let request = AuthRequest::SignIn(SignInForm { email, password });
            cli::auth::run(&auth, &request).await
        }
        AppCommand::SignUp {
            name,
            email,
            password,
        } => {
            let request = AuthRequest::SignUp(SignUpForm {
                name,
                email,
                password,
            });
            cli::auth::run(&auth, &request).await
        }
        AppCommand::VerifyEmail { email } => {
            let request = AuthRequest::VerifyEmail(VerifyEmailForm { email });
            cli::auth::run(&auth, &request).await
        }
        AppCommand::ResetPassword {
            new_password,
            confirm_password,
        } => {
            let request = AuthRequest::ResetPassword(ResetPasswordForm {
                new_password,
                confirm_password,
            });
            cli::auth::run(&auth, &request).await
        }
        AppCommand::Tickers => cli::tickers::show(&start(Route::AddTicker)),
        AppCommand::AddTicker { ticker, name } => {
            let mut session = start(Route::AddTicker);
            cli::tickers::add(&mut session, &ticker, name.as_deref().unwrap_or_default())
        }
        AppCommand::Overview { stock, tab } => {
            let mut session = start(Route::Overview);
            cli::overview::run(&mut session, &provider, stock, tab.as_deref()).await
        }
        AppCommand::Compare { ids } => {
            let mut session = start(Route::Overview);
            cli::overview::compare(&mut session, &provider, &ids).await
        }
        AppCommand::Filter { id, sets } => {
            let mut session = start(Route::Overview);
            cli::filter::run(&mut session, id, &sets)
        }
        AppCommand::Zoom { stock, tab, export } => {
            let mut session = start(Route::Overview);
            let export_dir = export.then(|| config.export_path()).transpose()?;
            cli::zoom::run(&mut session, &provider, stock, tab.as_deref(), export_dir).await
        }
        AppCommand::Logout { yes } => {
            let mut session = start(Route::Overview);
            cli::logout::run(&mut session, yes)
        }
        AppCommand::Shell => {
            let session = start(Route::SignIn);
            cli::shell::run(session, &auth, &provider, &config).await
        }
    }
}
