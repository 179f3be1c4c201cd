pub mod fetcher;
pub mod registry;

pub use fetcher::{FetchError, MAX_IN_FLIGHT, fetch_all};
pub use registry::{FnSource, SourceError, SourceKey, SourceOp, SourceRegistry};
