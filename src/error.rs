use thiserror::Error;

#[derive(Error, Debug)]
pub enum MintyError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Malformed row at line {line}: {reason}")]
    MalformedRow { line: usize, reason: String },

    #[error("Unsupported bank source: {0}")]
    UnsupportedSource(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, MintyError>;
