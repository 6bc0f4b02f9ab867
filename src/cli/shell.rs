use super::{auth, filter, overview, tickers, ui, zoom};
use crate::core::auth::{
    AuthRequest, AuthService, ResetPasswordForm, SignInForm, SignUpForm, VerifyEmailForm,
};
use crate::core::config::AppConfig;
use crate::core::export::FileExportSink;
use crate::core::overview::ViewMode;
use crate::core::{FilterField, FinancialDataProvider, Intent, Route, Session};
use anyhow::{Context, Result, bail};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Pages:    go <path>   back   show   quit
Account:  signin <email> <password>   signup <name> <email> <password>
          verify <email>   reset <password> <confirm>
Tickers:  add <ticker> [name]   continue
Overview: click <id>   compare   tab <name>   zoom   export
Filter:   filter <id>   focus <key>   input <key> <value>   set <key> <value>
          blur   save   close
Logout:   logout   yes   no";

/// One line of shell input.
#[derive(Debug)]
pub enum ShellCommand {
    Help,
    Show,
    Quit,
    Export,
    Auth(AuthRequest),
    /// Focus, input and blur in one go.
    Set(FilterField, String),
    Intent(Intent),
}

fn arg<'a>(args: &[&'a str], index: usize, name: &str) -> Result<&'a str> {
    args.get(index)
        .copied()
        .with_context(|| format!("Missing argument: {name}"))
}

fn rest(args: &[&str], from: usize) -> String {
    args.get(from..).unwrap_or_default().join(" ")
}

/// Parses a line of input. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((command, args)) = words.split_first() else {
        return Ok(None);
    };

    let parsed = match command.to_lowercase().as_str() {
        "help" | "?" => ShellCommand::Help,
        "show" => ShellCommand::Show,
        "quit" | "exit" => ShellCommand::Quit,
        "export" => ShellCommand::Export,
        "go" => ShellCommand::Intent(Intent::Navigate(arg(args, 0, "path")?.parse()?)),
        "signin" => ShellCommand::Auth(AuthRequest::SignIn(SignInForm {
            email: arg(args, 0, "email")?.to_string(),
            password: arg(args, 1, "password")?.to_string(),
        })),
        "signup" => ShellCommand::Auth(AuthRequest::SignUp(SignUpForm {
            name: arg(args, 0, "name")?.to_string(),
            email: arg(args, 1, "email")?.to_string(),
            password: arg(args, 2, "password")?.to_string(),
        })),
        "verify" => ShellCommand::Auth(AuthRequest::VerifyEmail(VerifyEmailForm {
            email: arg(args, 0, "email")?.to_string(),
        })),
        "reset" => ShellCommand::Auth(AuthRequest::ResetPassword(ResetPasswordForm {
            new_password: arg(args, 0, "password")?.to_string(),
            confirm_password: arg(args, 1, "confirm")?.to_string(),
        })),
        "add" => ShellCommand::Intent(Intent::AddStock {
            ticker: arg(args, 0, "ticker")?.to_string(),
            name: rest(args, 1),
        }),
        "continue" => ShellCommand::Intent(Intent::Continue),
        "click" => ShellCommand::Intent(Intent::Click(arg(args, 0, "id")?.parse()?)),
        "compare" => ShellCommand::Intent(Intent::EnterCompare),
        "tab" => ShellCommand::Intent(Intent::SelectTab(rest(args, 0))),
        "zoom" => ShellCommand::Intent(Intent::Zoom),
        "filter" => ShellCommand::Intent(Intent::OpenFilter(arg(args, 0, "id")?.parse()?)),
        "focus" => ShellCommand::Intent(Intent::Focus(arg(args, 0, "key")?.parse()?)),
        "input" => ShellCommand::Intent(Intent::Input(
            arg(args, 0, "key")?.parse()?,
            rest(args, 1),
        )),
        "set" => ShellCommand::Set(arg(args, 0, "key")?.parse()?, rest(args, 1)),
        "blur" => ShellCommand::Intent(Intent::Blur),
        "save" => ShellCommand::Intent(Intent::SubmitFilter),
        "close" => ShellCommand::Intent(Intent::CloseFilter),
        "back" => ShellCommand::Intent(Intent::Back),
        "logout" => ShellCommand::Intent(Intent::Logout),
        "yes" => ShellCommand::Intent(Intent::ConfirmLogout),
        "no" => ShellCommand::Intent(Intent::CancelLogout),
        other => bail!("Unknown command '{}', try 'help'", other),
    };
    Ok(Some(parsed))
}

/// An interactive session bound to its services.
pub struct Shell<'a> {
    session: Session,
    auth: &'a dyn AuthService,
    provider: &'a dyn FinancialDataProvider,
    export_dir: PathBuf,
}

impl<'a> Shell<'a> {
    pub fn new(
        session: Session,
        auth: &'a dyn AuthService,
        provider: &'a dyn FinancialDataProvider,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            session,
            auth,
            provider,
            export_dir,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs a command and returns what to print.
    pub async fn execute(&mut self, command: ShellCommand) -> Result<String> {
        debug!(route = %self.session.route(), "Executing shell command");
        match command {
            ShellCommand::Help => return Ok(HELP.to_string()),
            ShellCommand::Show | ShellCommand::Quit => {}
            ShellCommand::Export => {
                if self.session.route() != Route::ZoomIn {
                    bail!("Zoom in on a table before exporting");
                }
                let sink = FileExportSink::new(&self.export_dir);
                let location = zoom::export(&self.session, self.provider, &sink).await?;
                return Ok(format!("Exported to {location}"));
            }
            ShellCommand::Auth(request) => {
                if self.session.route() != request.route() {
                    bail!("Go to {} first", request.route());
                }
                let next = auth::submit(self.auth, &request).await?;
                if next == request.route() {
                    bail!("Request failed, please try again");
                }
                self.session.dispatch(Intent::Navigate(next))?;
            }
            ShellCommand::Set(field, value) => {
                self.session.dispatch(Intent::Focus(field))?;
                self.session.dispatch(Intent::Input(field, value))?;
                self.session.dispatch(Intent::Blur)?;
            }
            ShellCommand::Intent(intent) => self.session.dispatch(intent)?,
        }
        self.render().await
    }

    /// Renders the current page with any open dialog.
    pub async fn render(&self) -> Result<String> {
        let session = &self.session;
        let mut output = match session.route() {
            Route::SignIn => page("Sign In", "signin <email> <password>, or go /signup"),
            Route::SignUp => page("Sign Up", "signup <name> <email> <password>"),
            Route::VerifyEmail => page("Forgot Password", "verify <email>"),
            Route::ResetPassword => page("Reset Password", "reset <password> <confirm>"),
            Route::AddTicker => tickers::render_grid(session),
            Route::Overview => match session.overview().mode() {
                ViewMode::Overview => overview::render(session, self.provider).await?,
                ViewMode::Compare => overview::render_compare(session, self.provider).await,
            },
            Route::ZoomIn => zoom::render(session, self.provider).await?,
        };

        if let Some(dialog) = session.filter() {
            output.push_str(&format!("\n\n{}", filter::render_dialog(dialog)));
        }
        if session.logout_pending() {
            output.push_str(&format!(
                "\n\n{}",
                ui::style_text(
                    "Log out and clear your stocks? Confirm with 'yes' or 'no'.",
                    ui::StyleType::Error
                )
            ));
        }
        Ok(output)
    }
}

fn page(title: &str, usage: &str) -> String {
    format!(
        "{}\n\n{}",
        ui::style_text(title, ui::StyleType::Title),
        ui::style_text(usage, ui::StyleType::Subtle)
    )
}

/// Reads commands from stdin until `quit` or end of input.
pub async fn run(
    session: Session,
    auth: &dyn AuthService,
    provider: &dyn FinancialDataProvider,
    config: &AppConfig,
) -> Result<()> {
    let mut shell = Shell::new(session, auth, provider, config.export_path()?);
    println!("{}\n\n{}", shell.render().await?, HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        ui::print_separator();
        print!("{} > ", shell.session().route());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_line(&line) {
            Ok(Some(ShellCommand::Quit)) => break,
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error));
                continue;
            }
        };
        match shell.execute(command).await {
            Ok(output) => println!("{output}"),
            Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
        }
    }
    Ok(())
}
