//! Catalog data sources and the catalog cache.

mod bootstrap;
mod http;
mod repository;
mod static_source;

pub use bootstrap::BootstrapConferenceDataSource;
pub use http::HttpConferenceDataSource;
pub use repository::DefaultConferenceDataRepository;
pub use static_source::StaticConferenceDataSource;
