// ABOUTME: Command module aggregator for the webbundle CLI.
// ABOUTME: Re-exports deploy, uninstall, and status command handlers.

mod deploy;
mod session;
mod status;
mod uninstall;

pub use deploy::deploy;
pub use status::status;
pub use uninstall::uninstall;
