//! Campus marketplace CLI.

mod commands;
mod config;
mod handlers;
mod output;

use anyhow::Result;
use campusmart::UserSession;
use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{chat, product};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

rust_i18n::i18n!("src/locales", fallback = "en");

/// College marketplace CLI
#[derive(Parser)]
#[command(name = "campusmart")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "plain")]
    format: output::OutputFormat,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Language for output
    #[arg(short, long, global = true, default_value = "en")]
    lang: String,

    /// Data directory, overriding the config file
    #[arg(long, global = true, env = "CAMPUSMART_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the signed-in user
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },

    /// Product operations
    #[command(alias = "p")]
    Product {
        #[command(subcommand)]
        action: product::ProductAction,
    },

    /// Chat operations
    #[command(alias = "c")]
    Chat {
        #[command(subcommand)]
        action: chat::ChatAction,
    },

    /// Show or change configuration
    Config {
        /// Set the data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,
        /// Seed the demo catalog when nothing is stored
        #[arg(long)]
        seed_samples: Option<bool>,
        /// Delete all stored listings, chats and the session
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Sign in with a college email
    Login {
        /// User ID
        #[arg(short, long)]
        id: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// College email (username@collegename.edu.in)
        #[arg(short, long)]
        email: String,
        /// College ID
        #[arg(short, long)]
        college: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Status,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    rust_i18n::set_locale(&cli.lang);

    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = exit_code(&err);
            if code == EXIT_USAGE {
                eprintln!("{} {}", "error:".red().bold(), err);
            } else {
                eprintln!("{} {:?}", "error:".red().bold(), err);
            }
            ExitCode::from(code)
        }
    }
}

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

/// Requests the marketplace rejected exit with 2 and a one-line message.
/// Storage and IO failures exit with 1 and the full error chain.
fn exit_code(err: &anyhow::Error) -> u8 {
    let caller_error = err
        .chain()
        .find_map(|e| e.downcast_ref::<campusmart::Error>())
        .map_or(false, campusmart::Error::is_caller_error);
    if caller_error {
        EXIT_USAGE
    } else {
        EXIT_FAILURE
    }
}

async fn run(cli: Cli) -> Result<()> {
    let command = cli
        .command
        .ok_or_else(|| anyhow::anyhow!("{}", t!("no_command")))?;
    let data_dir = cli.data_dir.as_deref();

    tracing::debug!(data_dir = ?data_dir, "starting");

    match command {
        Commands::Auth { action } => handle_auth(action, data_dir).await,
        Commands::Product { action } => product::handle(action, cli.format, data_dir).await,
        Commands::Chat { action } => chat::handle(action, cli.format, data_dir).await,
        Commands::Config {
            set_data_dir,
            seed_samples,
            reset,
        } => handle_config(set_data_dir, seed_samples, reset, data_dir).await,
    }
}

async fn handle_auth(action: AuthAction, data_dir: Option<&Path>) -> Result<()> {
    let market = config::open_market(data_dir).await?;
    let sessions = market.session();

    match action {
        AuthAction::Login {
            id,
            name,
            email,
            college,
        } => {
            let mut user = UserSession::new(id, name, email);
            user.college_id = college;
            let user = sessions.login(user).await?;
            println!(
                "{}",
                t!("logged_in_as", name = &user.name, college = user.college_name())
            );
            Ok(())
        }
        AuthAction::Logout => {
            sessions.logout().await?;
            println!("{}", t!("logged_out"));
            Ok(())
        }
        AuthAction::Status => {
            match sessions.current().await? {
                Some(user) => println!(
                    "{}",
                    t!("logged_in_as", name = &user.name, college = user.college_name())
                ),
                None => println!("{}", t!("not_logged_in")),
            }
            Ok(())
        }
    }
}

async fn handle_config(
    set_data_dir: Option<PathBuf>,
    seed_samples: Option<bool>,
    reset: bool,
    data_dir: Option<&Path>,
) -> Result<()> {
    let mut cfg = config::load_config()?;

    if set_data_dir.is_some() || seed_samples.is_some() {
        if let Some(dir) = set_data_dir {
            cfg.data_dir = Some(dir);
        }
        if let Some(seed) = seed_samples {
            cfg.seed_samples = seed;
        }
        config::save_config(&cfg)?;
        println!("{}", t!("config_saved"));
    }

    println!(
        "{}",
        t!("config_file", path = config::config_path()?.display())
    );
    println!(
        "{}",
        t!("data_dir", path = cfg.data_dir(data_dir)?.display())
    );

    let mut market = config::open_market(data_dir).await?;
    if reset {
        market.reset().await?;
        println!("{}", t!("storage_reset"));
    }
    let logged_in = market.session().current().await?.is_some();
    println!("{}", t!("authenticated", status = logged_in));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_exit_code_for_caller_errors() {
        let err = anyhow::Error::new(campusmart::Error::not_found("product", "42"));
        assert_eq!(exit_code(&err), EXIT_USAGE);

        let wrapped: Result<()> = Err::<(), _>(campusmart::Error::InvalidSortKey("cheapest".into()))
            .context("browsing listings");
        assert_eq!(exit_code(&wrapped.unwrap_err()), EXIT_USAGE);
    }

    #[test]
    fn test_exit_code_for_environment_errors() {
        let err = anyhow::Error::new(campusmart::Error::Storage("disk full".into()));
        assert_eq!(exit_code(&err), EXIT_FAILURE);

        assert_eq!(exit_code(&anyhow::anyhow!("no command")), EXIT_FAILURE);
    }

    #[test]
    fn test_config_reset_flag() {
        let cli = Cli::try_parse_from(["campusmart", "config", "--reset"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Config { reset: true, .. })));
    }
}
