use thiserror::Error;

use crate::lead::CanonicalLead;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence backend error: {0}")]
    Backend(String),
}

/// Narrow persistence surface consumed by the import driver.
///
/// The driver takes an implementation by value at construction time, so tests
/// run against an in-memory mock and production wires in the SQLite store.
#[allow(async_fn_in_trait)]
pub trait LeadStore {
    /// Number of leads already persisted for `owner_id` (the resume cursor).
    async fn count_leads(&self, owner_id: &str) -> Result<u64, StoreError>;

    /// Persist one batch of leads as a single atomic group.
    /// Returns the number of rows created.
    async fn create_leads(
        &self,
        owner_id: &str,
        leads: &[CanonicalLead],
    ) -> Result<u64, StoreError>;

    /// The subset of `candidates` that already exist as contact handles for
    /// `owner_id`, for duplicate detection.
    async fn list_existing_handles(
        &self,
        owner_id: &str,
        candidates: &[String],
    ) -> Result<Vec<String>, StoreError>;
}
