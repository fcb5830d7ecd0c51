use thiserror::Error;

/// Setup-time registry errors.
///
/// These only surface while processors are being registered; once the
/// registry is sealed every operation reports through results instead.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A processor with the same name is already in the chain.
    #[error("processor {name} is already registered for {target}")]
    DuplicateRegistration { name: String, target: String },

    /// The registry no longer accepts registrations.
    #[error("registry is sealed; cannot register {name}")]
    Sealed { name: String },

    /// Configuration is invalid or cannot be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result alias for registry setup.
pub type RegistryResult<T> = Result<T, RegistryError>;
