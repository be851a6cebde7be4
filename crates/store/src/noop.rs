//! No-op store — the lot lives only as long as the process.

use async_trait::async_trait;
use parkinglot_core::error::StoreError;
use parkinglot_core::store::{LotChange, LotSnapshot, LotStore};

/// A store that remembers nothing.
pub struct NoopStore;

#[async_trait]
impl LotStore for NoopStore {
    fn name(&self) -> &str { "none" }

    async fn load(&self) -> Result<Option<LotSnapshot>, StoreError> {
        Ok(None)
    }

    async fn apply(&self, _change: &LotChange) -> Result<(), StoreError> {
        Ok(())
    }
}
