use thiserror::Error;

#[derive(Error, Debug)]
pub enum AllocatorError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Preference store error: {0}")]
    Store(String),

    #[error("Unknown weapon: {0}")]
    UnknownWeapon(String),

    #[error("Invalid command: {0}")]
    Command(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config write error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, AllocatorError>;
