//! Command dispatch: bridges CLI args -> data source loads -> output formatting.

pub mod browse;
pub mod config_cmd;
pub mod get;
pub mod list;
pub mod util;

use crate::cli::Command;
use crate::config::Settings;
use crate::error::CliError;

/// Dispatch an archive-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, settings: &Settings) -> Result<(), CliError> {
    match cmd {
        Command::List(args) => list::handle_list(args, settings).await,
        Command::Search(args) => list::handle_search(args, settings).await,
        Command::Get(args) => get::handle(args, settings).await,
        Command::Browse(args) => browse::handle(args, settings).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "config and completions are handled before dispatch".into(),
        )),
    }
}
