pub mod app_config;
pub mod session;

pub use app_config::Config;
pub use session::{FileSessionBackend, MemorySessionBackend, SessionBackend, SessionStore};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session data is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for skyhold_core::CoreError {
    fn from(err: StoreError) -> Self {
        skyhold_core::CoreError::SessionError(err.to_string())
    }
}
