//! Command dispatch: bridges CLI args -> router calls -> output formatting.

pub mod clients;
pub mod config_cmd;
pub mod login;
pub mod traffic;
pub mod watch;

use zyxctl_core::Router;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, router: &Router, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login => login::handle(router, global).await,
        Command::Traffic => traffic::handle(router, global).await,
        Command::Clients(args) => clients::handle(router, &args, global).await,
        Command::Watch(args) => watch::handle(router, &args, global).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "local command routed to the router dispatcher".into(),
        )),
    }
}
