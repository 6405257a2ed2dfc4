use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tsetmc_core::ValidationError),

    #[error(transparent)]
    Client(#[from] tsetmc_core::TseError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Client(tsetmc_core::TseError::Validation(_)) => 2,
            Self::Client(tsetmc_core::TseError::Parse { .. }) => 3,
            Self::Client(tsetmc_core::TseError::Transport(_)) => 6,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
