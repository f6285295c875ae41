//! Operator CLI for inkwell databases.
//!
//! # Responsibility
//! - Smoke-check `inkwell_core` linkage (`ping`, `version`).
//! - Recreate an empty database (`reset`).
//! - Print a user's word count and level (`stats`).

use clap::{Parser, Subcommand};
use inkwell_core::db::open_db;
use inkwell_core::{user_stats, SqliteUserRepository, UserRepository};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "inkwell", version, about = "inkwell database tools")]
struct Cli {
    /// Log level for stderr diagnostics
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Check that the core library responds
    Ping,
    /// Print the core library version
    Version,
    /// Delete the database file and recreate an empty schema
    Reset {
        #[arg(long, default_value = "inkwell.sqlite3")]
        db: PathBuf,
    },
    /// Show word count and level for a user
    Stats {
        #[arg(long, default_value = "inkwell.sqlite3")]
        db: PathBuf,
        #[arg(long)]
        user: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = inkwell_core::init_stderr_logging(&cli.log_level) {
        eprintln!("logging disabled: {err}");
    }

    match run(cli.command.unwrap_or(Command::Ping)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<String, String> {
    match command {
        Command::Ping => Ok(format!("inkwell_core ping={}", inkwell_core::ping())),
        Command::Version => Ok(format!("inkwell_core version={}", inkwell_core::core_version())),
        Command::Reset { db } => reset(&db),
        Command::Stats { db, user } => stats(&db, &user),
    }
}

fn reset(path: &Path) -> Result<String, String> {
    if path.exists() {
        std::fs::remove_file(path)
            .map_err(|err| format!("failed to remove {}: {err}", path.display()))?;
    }
    open_db(path).map_err(|err| format!("failed to create {}: {err}", path.display()))?;
    info!("event=db_reset module=cli status=ok");
    Ok(format!("database reset at {}", path.display()))
}

fn stats(path: &Path, username: &str) -> Result<String, String> {
    if !path.exists() {
        return Err(format!("database {} does not exist", path.display()));
    }
    let conn = open_db(path).map_err(|err| err.to_string())?;
    let user = SqliteUserRepository::new(&conn)
        .find_by_username(username.trim())
        .map_err(|err| err.to_string())?
        .ok_or_else(|| format!("no user named `{username}`"))?;
    let stats = user_stats(&user);
    Ok(format!(
        "{} words={} level={} next_level_words={}",
        stats.username, stats.word_count, stats.level, stats.next_level_words
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_core::User;

    #[test]
    fn no_subcommand_defaults_to_ping() {
        let cli = Cli::try_parse_from(["inkwell"]).unwrap();
        assert_eq!(cli.command, None);
        assert_eq!(run(Command::Ping).unwrap(), "inkwell_core ping=pong");
    }

    #[test]
    fn stats_requires_a_user() {
        assert!(Cli::try_parse_from(["inkwell", "stats"]).is_err());
        let cli = Cli::try_parse_from(["inkwell", "stats", "--user", "alice"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Stats {
                db: PathBuf::from("inkwell.sqlite3"),
                user: "alice".to_string(),
            })
        );
    }

    #[test]
    fn reset_recreates_an_empty_database() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reset.db");
        {
            let conn = open_db(&path).unwrap();
            SqliteUserRepository::new(&conn)
                .create_user(&User::new("alice", "h"))
                .unwrap();
        }

        reset(&path).unwrap();
        assert!(stats(&path, "alice").unwrap_err().contains("no user"));
    }

    #[test]
    fn stats_reports_level() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.db");
        {
            let conn = open_db(&path).unwrap();
            let user = User::new("alice", "h");
            let users = SqliteUserRepository::new(&conn);
            users.create_user(&user).unwrap();
            users.adjust_word_count(user.id, 1200).unwrap();
        }

        assert_eq!(
            stats(&path, "alice").unwrap(),
            "alice words=1200 level=1 next_level_words=2250"
        );
        assert!(stats(&dir.path().join("missing.db"), "alice").is_err());
    }
}
