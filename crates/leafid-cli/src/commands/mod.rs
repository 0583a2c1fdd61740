//! Command implementations for the leafid CLI.

mod chat;
mod check;
mod classify;
mod init;
mod species;

// Re-export all command functions
pub use chat::cmd_chat;
pub use check::cmd_check;
pub use classify::cmd_classify;
pub use init::cmd_init;
pub use species::{cmd_species_list, cmd_species_show};
