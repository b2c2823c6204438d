// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strongbox - a local encrypted credential vault.
//!
//! This is the binary entry point. It loads configuration, initializes
//! tracing, and dispatches subcommands to the vault and browser crates.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod browser;
mod credentials;
mod output;

use std::io::IsTerminal;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use strongbox_config::StrongboxConfig;
use strongbox_core::StrongboxError;
use strongbox_vault::{master_password, master_password_with_confirm, VaultStore};
use tracing::debug;

use crate::credentials::NewCredential;
use crate::output::Output;

/// Strongbox - a local encrypted credential vault.
#[derive(Parser, Debug)]
#[command(name = "strongbox", version, about, long_about = None)]
struct Cli {
    /// Disable colored output.
    #[arg(long, global = true)]
    plain: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List browser credential files found on this system.
    Find,
    /// Back up browser credential files into the encrypted browser vault.
    Backup,
    /// Restore browser credential files from the encrypted browser vault.
    Restore,
    /// Securely delete browser credential files.
    Wipe {
        /// Treat deletion deferred until handle close or reboot as failure.
        #[arg(long)]
        immediate: bool,
    },
    /// Back up browser credential files, then securely delete them.
    Protect,
    /// Run the launch policy: protect on first run, otherwise restore if needed.
    Startup,
    /// Run the exit policy: back up, then delete requiring immediate removal.
    Exit,
    /// Generate a random password.
    Generate {
        /// Number of characters (minimum 8).
        #[arg(long, default_value_t = 20)]
        length: usize,
    },
    /// Estimate the strength of a password (read from stdin when omitted).
    Strength { value: Option<String> },
    /// List stored credentials, optionally filtered.
    List { query: Option<String> },
    /// Add a credential to the main vault.
    Add {
        #[arg(long)]
        service: String,
        #[arg(long, default_value = "")]
        username: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Store this password instead of generating one.
        #[arg(long)]
        password: Option<String>,
        /// Length of the generated password.
        #[arg(long, default_value_t = 20)]
        length: usize,
    },
    /// Remove a credential by id.
    Remove { id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match strongbox_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            strongbox_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.general.log_level);
    debug!(vault = %config.storage.vault_path().display(), "starting");
    let out = Output::new(!cli.plain && std::io::stderr().is_terminal());

    if let Err(err) = run(cli.command, &config, out).await {
        out.error(describe(&err));
        out.warnings(err.warnings());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &StrongboxConfig, out: Output) -> Result<(), StrongboxError> {
    let main_vault = VaultStore::new(config.storage.vault_path());

    match command {
        Commands::Find => {
            browser::run_find(config, out);
            Ok(())
        }
        Commands::Backup => browser::run_backup(config, &master_password()?, out).await,
        Commands::Restore => browser::run_restore(config, &master_password()?, out).await,
        Commands::Wipe { immediate } => browser::run_wipe(config, immediate, out).await,
        Commands::Protect => browser::run_protect(config, &master_password()?, out).await,
        Commands::Startup => {
            let password = if browser::is_first_run(config) {
                master_password_with_confirm()?
            } else {
                master_password()?
            };
            browser::run_startup(config, &password, out).await
        }
        Commands::Exit => browser::run_exit(config, &master_password()?, out).await,
        Commands::Generate { length } => credentials::run_generate(length, out),
        Commands::Strength { value } => {
            let value = match value {
                Some(value) => value,
                None => read_stdin_line()?,
            };
            credentials::run_strength(&value, out);
            Ok(())
        }
        Commands::List { query } => {
            credentials::run_list(&main_vault, &master_password()?, query.as_deref(), out).await
        }
        Commands::Add {
            service,
            username,
            category,
            notes,
            password,
            length,
        } => {
            let master = unlock_or_create(&main_vault)?;
            let new = NewCredential {
                service,
                username,
                category,
                notes,
                password,
                length,
            };
            credentials::run_add(&main_vault, &master, new, out)
                .await
                .map(|_| ())
        }
        Commands::Remove { id } => {
            credentials::run_remove(&main_vault, &master_password()?, &id, out).await
        }
    }
}

/// Confirm the master password when the vault is about to be created.
fn unlock_or_create(store: &VaultStore) -> Result<SecretString, StrongboxError> {
    if store.exists() {
        master_password()
    } else {
        master_password_with_confirm()
    }
}

fn read_stdin_line() -> Result<String, StrongboxError> {
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| StrongboxError::io("failed to read stdin", e))?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// User-facing message for each failure kind.
fn describe(err: &StrongboxError) -> String {
    match err {
        StrongboxError::Authentication => {
            "wrong master password, or the vault file has been tampered with".to_string()
        }
        StrongboxError::CorruptData(detail) => {
            format!("vault file is missing data or corrupt: {detail}")
        }
        StrongboxError::LockedFile { paths } => {
            let list: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            format!(
                "some browser files are locked; close your browsers and run `strongbox wipe --immediate`:\n    {}",
                list.join("\n    ")
            )
        }
        other => other.to_string(),
    }
}

/// Initialize the tracing subscriber with an env filter.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strongbox={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_wipe_immediate() {
        let cli = Cli::try_parse_from(["strongbox", "wipe", "--immediate"]).unwrap();
        assert!(matches!(cli.command, Commands::Wipe { immediate: true }));
    }

    #[test]
    fn cli_parses_add_with_defaults() {
        let cli = Cli::try_parse_from(["strongbox", "--plain", "add", "--service", "mail"]).unwrap();
        assert!(cli.plain);
        match cli.command {
            Commands::Add {
                service,
                username,
                password,
                length,
                ..
            } => {
                assert_eq!(service, "mail");
                assert!(username.is_empty());
                assert!(password.is_none());
                assert_eq!(length, 20);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn cli_requires_a_subcommand() {
        assert!(Cli::try_parse_from(["strongbox"]).is_err());
    }

    #[test]
    fn error_messages_distinguish_failure_kinds() {
        let auth = describe(&StrongboxError::Authentication);
        let corrupt = describe(&StrongboxError::CorruptData("short file".into()));
        let locked = describe(&StrongboxError::LockedFile {
            paths: vec![PathBuf::from("/p/key4.db")],
        });

        assert!(auth.contains("wrong master password"));
        assert!(corrupt.contains("corrupt"));
        assert!(locked.contains("close your browsers"));
        assert!(locked.contains("/p/key4.db"));
    }

    #[test]
    fn binary_loads_config_defaults() {
        let config = strongbox_config::load_and_validate_str("").expect("default config should be valid");
        assert_eq!(config.general.log_level, "info");
    }
}
