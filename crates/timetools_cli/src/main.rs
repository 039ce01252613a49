//! Command-line entry point over `timetools_core`.
//!
//! # Responsibility
//! - Drive the account vault and time tracker against one data directory.
//! - Keep output line-oriented and deterministic for scripting.
//!
//! # Usage
//!
//! ```bash
//! timetools -d ./data create-user -u alice -p secret
//! timetools -d ./data set-setting -u alice theme '"dark"'
//! TIMETOOLS_DATA_DIR=./data timetools add-time 90.5
//! ```

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use timetools_core::{
    core_version, default_log_level, init_logging, AppPaths, CredentialVault, Settings,
    TotalTimeTracker,
};

/// Account vault and usage-time tracker.
#[derive(Parser, Debug)]
#[command(
    name = "timetools",
    version,
    about = "Manage local accounts and accumulated usage time"
)]
struct Cli {
    /// Directory holding accounts.json, total_time.json and logs/.
    #[arg(
        short,
        long,
        env = "TIMETOOLS_DATA_DIR",
        default_value = ".",
        global = true
    )]
    data_dir: PathBuf,

    /// Diagnostic log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the core library version.
    Version,

    /// Create an account.
    CreateUser {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// Check a username/password pair; exits non-zero on mismatch.
    Verify {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        password: String,
    },

    /// List usernames in stored order.
    ListUsers,

    /// Print a user's id and settings.
    ShowUser {
        #[arg(short, long)]
        username: String,
    },

    /// Merge one setting into a user's settings.
    SetSetting {
        #[arg(short, long)]
        username: String,

        /// Setting name.
        key: String,

        /// JSON value; bare words are stored as strings.
        value: String,
    },

    /// Add seconds to the accumulated total and save it.
    AddTime {
        #[arg(value_parser = parse_seconds)]
        seconds: f64,
    },

    /// Print the accumulated total.
    TotalTime,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    if let Command::Version = cli.command {
        println!("timetools_core version={}", core_version());
        return Ok(());
    }

    let paths = AppPaths::new(absolute(&cli.data_dir)?);
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    if let Err(err) = init_logging(level, paths.log_dir()) {
        eprintln!("warning: logging disabled: {err}");
    }

    match cli.command {
        Command::Version => {}
        Command::CreateUser { username, password } => {
            let vault = CredentialVault::open(paths.accounts_file());
            let record = vault
                .try_create_user(&username, &password)
                .map_err(|err| err.to_string())?;
            println!("created {}", record.username);
        }
        Command::Verify { username, password } => {
            let vault = CredentialVault::open(paths.accounts_file());
            if !vault.verify(&username, &password) {
                return Err("invalid username or password".to_string());
            }
            println!("ok");
        }
        Command::ListUsers => {
            let vault = CredentialVault::open(paths.accounts_file());
            for username in vault.list_users() {
                println!("{username}");
            }
        }
        Command::ShowUser { username } => {
            let vault = CredentialVault::open(paths.accounts_file());
            let user = vault
                .get_user(&username)
                .ok_or_else(|| format!("unknown user: {username}"))?;
            println!("id={}", user.id);
            for (key, value) in &user.settings {
                println!("{key}={value}");
            }
        }
        Command::SetSetting {
            username,
            key,
            value,
        } => {
            let vault = CredentialVault::open(paths.accounts_file());
            if vault.get_user(&username).is_none() {
                return Err(format!("unknown user: {username}"));
            }
            let mut settings = Settings::new();
            settings.insert(key, parse_setting_value(&value));
            vault.update_settings(&username, settings);
            println!("updated {username}");
        }
        Command::AddTime { seconds } => {
            let tracker = TotalTimeTracker::with_persist_file(paths.total_time_file());
            tracker.load();
            let total = tracker.add_seconds(seconds);
            tracker.save().map_err(|err| err.to_string())?;
            println!("total_seconds={total}");
        }
        Command::TotalTime => {
            let tracker = TotalTimeTracker::with_persist_file(paths.total_time_file());
            tracker.load();
            println!("total_seconds={}", tracker.total_seconds());
        }
    }

    log::logger().flush();
    Ok(())
}

fn parse_seconds(raw: &str) -> Result<f64, String> {
    let seconds = raw
        .parse::<f64>()
        .map_err(|err| format!("invalid seconds `{raw}`: {err}"))?;
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(format!("seconds must be a non-negative number, got {raw}"));
    }
    Ok(seconds)
}

fn parse_setting_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

fn absolute(dir: &Path) -> Result<PathBuf, String> {
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(dir))
        .map_err(|err| format!("cannot resolve data directory `{}`: {err}", dir.display()))
}
