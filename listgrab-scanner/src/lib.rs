pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod field;
pub mod pagination;
pub mod result;

pub use config::{FieldDefinition, PaginationDefinition, SiteConfig, SiteDefinition};
pub use engine::{ExtractionEngine, ProgressCallback, RetryPolicy, RunOptions, RunState};
pub use error::{ConfigError, FetchError, ScanError};
pub use fetcher::{HttpFetcher, PageFetcher, RawDocument};
pub use result::{FieldValue, Record, RunResult, StopReason};
