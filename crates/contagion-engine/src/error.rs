//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during engine startup and
//! simulation execution so `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: contagion_core::config::ConfigError,
    },

    /// The dataset could not be loaded.
    #[error("data provider error: {source}")]
    Provider {
        /// The underlying provider error.
        #[from]
        source: contagion_core::provider::ProviderError,
    },

    /// Building the initial state failed.
    #[error("initialization error: {source}")]
    Init {
        /// The underlying initialization error.
        #[from]
        source: contagion_core::state::InitError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: contagion_core::runner::RunnerError,
    },

    /// The log subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },
}
