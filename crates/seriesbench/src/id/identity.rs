//! The fixed universe of series written during one benchmark run.

use crate::{Error, RandSource, Result, SeriesId, Store, ThreadRandom};
use std::sync::Arc;

/// The set of series identifiers for a single run.
///
/// Identifiers are generated once and kept in generation order. The backing
/// slice is shared (`Arc`) with the producer, so handing it to a spawned task
/// never copies the identifiers.
#[derive(Clone, Debug)]
pub struct IdentitySet {
    ids: Arc<[SeriesId]>,
}

impl IdentitySet {
    /// Draws `count` identifiers from the thread-local RNG.
    pub fn generate(count: usize) -> Self {
        Self::generate_with(count, &ThreadRandom)
    }

    /// Draws `count` identifiers from `rng`.
    pub fn generate_with<R>(count: usize, rng: &R) -> Self
    where
        R: RandSource<u128>,
    {
        let ids: Vec<_> = (0..count)
            .map(|_| SeriesId::from_random(rng.rand()))
            .collect();
        Self { ids: ids.into() }
    }

    pub fn from_ids(ids: Vec<SeriesId>) -> Self {
        Self { ids: ids.into() }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[SeriesId] {
        &self.ids
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesId> {
        self.ids.iter()
    }

    pub(crate) fn shared(&self) -> Arc<[SeriesId]> {
        Arc::clone(&self.ids)
    }

    /// Persists every identifier, one `register_series` call at a time.
    ///
    /// Stops at the first failure. The error carries the position and value
    /// of the identifier that could not be registered; identifiers after it
    /// are never sent.
    #[tracing::instrument(skip_all, fields(count = self.len()))]
    pub async fn register<S>(&self, store: &S) -> Result<()>
    where
        S: Store + ?Sized,
    {
        for (index, &id) in self.ids.iter().enumerate() {
            store
                .register_series(id)
                .await
                .map_err(|source| Error::Registration { index, id, source })?;
        }
        tracing::debug!("Registered {} series", self.len());
        Ok(())
    }
}
