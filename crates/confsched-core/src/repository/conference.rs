//! Catalog sources and the catalog cache.

use crate::error::Result;
use crate::model::{ConferenceData, ConferenceDay};
use crate::observable::Observable;
use crate::result::DataResult;
use async_trait::async_trait;
use std::sync::Arc;

/// A provider of the published catalog document.
///
/// `Ok(None)` means the source has nothing to offer, which is not an error:
/// a bootstrap-only source has no remote copy, a network source may have no
/// offline copy yet.
#[async_trait]
pub trait ConferenceDataSource: Send + Sync {
    /// Fetches the latest catalog, typically over the network.
    async fn get_remote_conference_data(&self) -> Result<Option<ConferenceData>>;

    /// Returns a catalog that can be read without the network.
    async fn get_offline_conference_data(&self) -> Result<Option<ConferenceData>>;
}

/// Caches catalog snapshots and publishes the current one.
#[async_trait]
pub trait ConferenceDataRepository: Send + Sync {
    /// Returns the cached snapshot, loading an offline copy on first use.
    ///
    /// Lookup order: cache, the remote source's offline copy, bootstrap.
    async fn get_offline_conference_data(&self) -> Result<Arc<ConferenceData>>;

    /// Replaces the cache with a fresh remote snapshot and publishes it.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: a new version was cached
    /// - `Err(DataAccess)`: the remote source returned nothing
    /// - `Err(_)`: the remote fetch failed
    async fn refresh_cache_with_remote_conference_data(&self) -> Result<()>;

    /// Live catalog snapshot. Observing starts an offline load if none ran.
    fn observe_data(&self) -> Observable<DataResult<Arc<ConferenceData>>>;

    fn conference_days(&self) -> Vec<ConferenceDay>;

    /// Version of the cached snapshot, `0` before anything was loaded.
    fn current_version(&self) -> i64;
}
