//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("History error: {0}")]
    History(#[from] crate::undo_stack::HistoryError),

    #[error("Interaction error: {0}")]
    Interaction(#[from] crate::interaction::InteractionError),

    #[error("Config error: {0}")]
    Config(#[from] crate::config::ConfigError),
}
