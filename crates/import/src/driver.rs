use std::collections::HashSet;

use funil_core::{CanonicalLead, LeadStore, StoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::batch::{number_chunks, plan};
use crate::csv::{parse_leads, ParseError};
use crate::mapper::{map_row, RowAudit};
use crate::sql;

#[derive(Debug, Clone, Serialize)]
pub struct ImportOptions {
    /// Account the imported leads belong to.
    pub owner_id: String,
    pub batch_size: usize,
    /// Assumed calendar year for the `DD/MM` contact dates.
    pub year: i32,
}

/// Run-level counts of normalization fallbacks, so data-quality recoveries
/// are reported rather than silently absorbed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizationStats {
    pub date_unparseable: usize,
    pub source_defaulted: usize,
    pub outcome_defaulted: usize,
    pub quality_unrecognized: usize,
}

impl NormalizationStats {
    fn absorb(&mut self, audit: &RowAudit) {
        self.date_unparseable += usize::from(audit.date_unparseable);
        self.source_defaulted += usize::from(audit.source_defaulted);
        self.outcome_defaulted += usize::from(audit.outcome_defaulted);
        self.quality_unrecognized += usize::from(audit.quality_unrecognized);
    }

    fn any(&self) -> bool {
        self.date_unparseable
            + self.source_defaulted
            + self.outcome_defaulted
            + self.quality_unrecognized
            > 0
    }
}

/// The batch that stopped the run, with the underlying persistence error.
#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub batch: usize,
    pub message: String,
}

/// Structured result of an online import run. A persistence failure is part
/// of the report: the committed batches stay committed and the counts say
/// how far the run got.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub total_rows: usize,
    pub created: u64,
    pub skipped_as_duplicate: usize,
    pub batches_planned: usize,
    pub batches_completed: usize,
    pub stats: NormalizationStats,
    pub failure: Option<BatchFailure>,
}

/// One rendered bulk-insert script.
#[derive(Debug, Clone, Serialize)]
pub struct SqlScript {
    pub batch: usize,
    pub sql: String,
}

/// Result of an offline export run.
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    pub total_rows: usize,
    pub scripts: Vec<SqlScript>,
    pub verification: String,
    pub stats: NormalizationStats,
}

#[derive(Debug, Error)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// A pre-flight store query (cursor or duplicate set) failed before any
    /// batch was submitted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates parse → map → duplicate split → batch plan → sequential
/// persistence. The store is injected at construction, so tests run against
/// an in-memory mock.
pub struct ImportDriver<S: LeadStore> {
    store: S,
    options: ImportOptions,
}

impl<S: LeadStore> ImportDriver<S> {
    pub fn new(store: S, options: ImportOptions) -> Self {
        Self { store, options }
    }

    /// Import the source text, persisting batches strictly sequentially.
    ///
    /// Records whose contact handle already exists for the owner are skipped
    /// and counted, which is what makes re-running after a partial failure
    /// safe. The persisted-count cursor is re-read from the store each run
    /// and carries the batch numbering forward, keeping batch identifiers
    /// non-overlapping across runs.
    pub async fn import(&self, text: &str) -> Result<ImportReport, ImportError> {
        let rows = parse_leads(text)?;
        let mut stats = NormalizationStats::default();
        let leads: Vec<CanonicalLead> = rows
            .iter()
            .map(|row| {
                let mapped = map_row(row, &self.options.owner_id, self.options.year);
                stats.absorb(&mapped.audit);
                mapped.lead
            })
            .collect();
        if stats.any() {
            warn!(
                date_unparseable = stats.date_unparseable,
                source_defaulted = stats.source_defaulted,
                outcome_defaulted = stats.outcome_defaulted,
                quality_unrecognized = stats.quality_unrecognized,
                "some fields were filled by fallback policy"
            );
        }

        let candidates: Vec<String> = leads
            .iter()
            .filter_map(|l| l.contact_handle.clone())
            .collect();
        let existing: HashSet<String> = self
            .store
            .list_existing_handles(&self.options.owner_id, &candidates)
            .await?
            .into_iter()
            .collect();

        let mut fresh = Vec::new();
        let mut skipped_as_duplicate = 0usize;
        for lead in leads {
            match &lead.contact_handle {
                Some(handle) if existing.contains(handle) => skipped_as_duplicate += 1,
                _ => fresh.push(lead),
            }
        }

        let already_persisted = self.store.count_leads(&self.options.owner_id).await? as usize;
        let first_batch = if self.options.batch_size == 0 {
            1
        } else {
            already_persisted / self.options.batch_size + 1
        };
        let batches = number_chunks(&fresh, self.options.batch_size, first_batch);

        let mut created = 0u64;
        let mut batches_completed = 0usize;
        let mut failure = None;
        for batch in &batches {
            info!(batch = batch.number, rows = batch.leads.len(), "submitting batch");
            match self
                .store
                .create_leads(&self.options.owner_id, &batch.leads)
                .await
            {
                Ok(n) => {
                    created += n;
                    batches_completed += 1;
                }
                Err(e) => {
                    error!(batch = batch.number, "halting import: {e}");
                    failure = Some(BatchFailure {
                        batch: batch.number,
                        message: e.to_string(),
                    });
                    break;
                }
            }
        }

        Ok(ImportReport {
            total_rows: rows.len(),
            created,
            skipped_as_duplicate,
            batches_planned: batches.len(),
            batches_completed,
            stats,
            failure,
        })
    }
}

/// Offline mode: render the batches as SQL scripts instead of persisting.
///
/// `already_persisted` is the explicit resume cursor (there is no store to
/// ask); pass 0 for a full export.
pub fn export(
    text: &str,
    options: &ImportOptions,
    already_persisted: usize,
) -> Result<ExportReport, ImportError> {
    let rows = parse_leads(text)?;
    let mut stats = NormalizationStats::default();
    let leads: Vec<CanonicalLead> = rows
        .iter()
        .map(|row| {
            let mapped = map_row(row, &options.owner_id, options.year);
            stats.absorb(&mapped.audit);
            mapped.lead
        })
        .collect();

    let batches = plan(&leads, options.batch_size, already_persisted);
    let scripts = batches
        .iter()
        .map(|batch| SqlScript {
            batch: batch.number,
            sql: sql::emit(batch),
        })
        .collect();

    Ok(ExportReport {
        total_rows: rows.len(),
        scripts,
        verification: sql::emit_verification(&options.owner_id),
        stats,
    })
}
