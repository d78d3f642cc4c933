//! Command-line interface definitions for the console.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use hotkeys::{Action, default_store_path};
use logging::LogArgs;

/// Command-line interface for the `console` binary.
#[derive(Parser, Debug)]
#[command(
    name = "console",
    about = "Operator shell for profile hotkeys",
    version
)]
pub struct Cli {
    /// Logging controls shared across binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Path to the JSON key-value store holding the hotkey list.
    /// Defaults to `$HOTKEYS_STORE`, then `~/.hotkeys/.app_storage.json`.
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// The store location after applying the flag and environment fallbacks.
    pub fn store_path(&self) -> PathBuf {
        self.store.clone().unwrap_or_else(default_store_path)
    }
}

/// Top-level console commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the effective bindings.
    Show,
    /// Bind an action to a combo and save.
    Set {
        /// Action id, e.g. `toggle-run`.
        action: Action,
        /// Key combo, e.g. `Ctrl+Shift+K`.
        combo: String,
    },
    /// Unbind an action and save.
    Clear {
        /// Action id.
        action: Action,
    },
    /// Save the built-in bindings, replacing the stored list.
    Reset,
    /// Print the canonical form of a combo.
    Normalize {
        /// Key combo to normalize.
        combo: String,
    },
    /// Open the interactive profile screen.
    Run(RunArgs),
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Profile whose scheduler the screen controls.
    #[arg(long, default_value = "default")]
    pub profile: String,

    /// Directory for exported logs. Defaults to the current directory.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_set_with_action_id() {
        let cli = Cli::try_parse_from(["console", "set", "export-log", "Ctrl+Shift+E"])
            .expect("parse");
        match cli.command {
            Commands::Set { action, combo } => {
                assert_eq!(action, Action::ExportLog);
                assert_eq!(combo, "Ctrl+Shift+E");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_action() {
        assert!(Cli::try_parse_from(["console", "clear", "launch-rockets"]).is_err());
    }

    #[test]
    fn store_flag_overrides_default() {
        let cli = Cli::try_parse_from(["console", "--store", "/tmp/s.json", "show"]).expect("parse");
        assert_eq!(cli.store_path(), PathBuf::from("/tmp/s.json"));
    }
}
