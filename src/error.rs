use thiserror::Error;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("hackerrank authentication failed for user `{0}`")]
    AuthFailed(String),
    #[error("another crawl holds the lock at {0}")]
    Locked(String),
    #[error("metadata store invalid or unreadable: {0}")]
    StateCorrupt(String),
    #[error("index document malformed: {0}")]
    IndexCorrupt(String),
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
    #[error("request to {url} failed with status {status}")]
    Transport { url: String, status: u16 },
}

impl CrawlError {
    pub fn code(&self) -> CrawlErrorCode {
        match self {
            Self::Locked(_) => CrawlErrorCode::E001Locked,
            Self::AuthFailed(_) => CrawlErrorCode::E002AuthFailed,
            Self::Transport { .. } => CrawlErrorCode::E003Transport,
            Self::StateCorrupt(_) => CrawlErrorCode::E004StateCorrupt,
            Self::IndexCorrupt(_) => CrawlErrorCode::E005IndexCorrupt,
            Self::InvalidConfig(_) => CrawlErrorCode::E006ConfigInvalid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlErrorCode {
    E001Locked,
    E002AuthFailed,
    E003Transport,
    E004StateCorrupt,
    E005IndexCorrupt,
    E006ConfigInvalid,
}

impl CrawlErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::E001Locked => "E001_LOCKED",
            Self::E002AuthFailed => "E002_AUTH_FAILED",
            Self::E003Transport => "E003_TRANSPORT",
            Self::E004StateCorrupt => "E004_STATE_CORRUPT",
            Self::E005IndexCorrupt => "E005_INDEX_CORRUPT",
            Self::E006ConfigInvalid => "E006_CONFIG_INVALID",
        }
    }
}

/// Stage of a crawl run; carried in error context so a failed run names
/// where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Config,
    Lock,
    Metadata,
    Login,
    List,
    Detail,
    Store,
    Index,
}

impl CrawlPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Lock => "lock",
            Self::Metadata => "metadata",
            Self::Login => "login",
            Self::List => "list",
            Self::Detail => "detail",
            Self::Store => "store",
            Self::Index => "index",
        }
    }

    pub fn context(self, what: impl std::fmt::Display) -> String {
        format!("phase={} {what}", self.as_str())
    }
}

/// Finds the first `CrawlError` in an error chain so reports can print its code.
pub fn error_code_of(err: &anyhow::Error) -> Option<CrawlErrorCode> {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<CrawlError>())
        .map(CrawlError::code)
}
