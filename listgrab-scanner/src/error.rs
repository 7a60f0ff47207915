use thiserror::Error;

/// Why a single page request failed. Every variant is recoverable from the
/// engine's point of view: it decides whether to retry, skip or give up.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("connection to {url} failed: {reason}")]
    Connection { url: String, reason: String },

    #[error("{url} returned HTTP {code}")]
    HttpStatus { url: String, code: u16 },

    #[error("{url} returned an empty body")]
    EmptyBody { url: String },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Timeout { url }
            | FetchError::Connection { url, .. }
            | FetchError::HttpStatus { url, .. }
            | FetchError::EmptyBody { url } => url,
        }
    }
}

/// Problems with a site definition or run options, raised before any request
/// is made.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("container selector is missing")]
    MissingContainerSelector,

    #[error("invalid selector for {context} '{selector}': {reason}")]
    InvalidSelector {
        context: String,
        selector: String,
        reason: String,
    },

    #[error("field '{field}' reads an attribute but names none")]
    MissingAttributeName { field: String },

    #[error("field '{field}' has an invalid regex: {reason}")]
    InvalidRegex { field: String, reason: String },

    #[error("field '{field}' is malformed: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    #[error("no fields configured")]
    NoFields,

    #[error("unknown field '{field}' requested")]
    UnknownField { field: String },

    #[error("page budget must be at least 1")]
    ZeroPageBudget,

    #[error("failed to read site definition: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse site definition: {0}")]
    Json(#[from] serde_json::Error),
}

/// Run-level failure. A run only fails outright when its configuration is
/// invalid or when the very first page cannot be fetched.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("first page {url} failed after {attempts} attempt(s): {source}")]
    FirstPage {
        url: String,
        attempts: u32,
        #[source]
        source: FetchError,
    },

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
