use funil_core::CanonicalLead;

/// A fixed-size slice of canonical leads with its 1-based batch number.
/// Purely a planning construct; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub number: usize,
    pub leads: Vec<CanonicalLead>,
}

/// Partition `records` into batches, resuming after `already_persisted`
/// records.
///
/// The first `already_persisted` records are skipped (the caller guarantees
/// the same stable order every run), the remainder is chunked into batches of
/// `batch_size` (the last may be shorter), and numbering continues from the
/// full batches the cursor already consumed, so a re-run yields
/// non-overlapping batch numbers. Deterministic: no clock, no randomness.
pub fn plan(records: &[CanonicalLead], batch_size: usize, already_persisted: usize) -> Vec<Batch> {
    if batch_size == 0 {
        return Vec::new();
    }
    let skip = already_persisted.min(records.len());
    number_chunks(&records[skip..], batch_size, already_persisted / batch_size + 1)
}

/// Chunk `records` without skipping, numbering batches from `first`.
pub fn number_chunks(records: &[CanonicalLead], batch_size: usize, first: usize) -> Vec<Batch> {
    if batch_size == 0 {
        return Vec::new();
    }
    records
        .chunks(batch_size)
        .enumerate()
        .map(|(i, chunk)| Batch {
            number: first + i,
            leads: chunk.to_vec(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use funil_core::{LeadSource, Outcome};

    fn lead(n: usize) -> CanonicalLead {
        CanonicalLead {
            owner_id: "acct-42".into(),
            contact_date: None,
            name: format!("Lead {n}"),
            contact_handle: Some(format!("@lead{n}")),
            source: LeadSource::Ad,
            budget_sent: false,
            outcome: Outcome::QuoteInProgress,
            contact_quality: None,
            closed_value: None,
            note: None,
        }
    }

    fn leads(n: usize) -> Vec<CanonicalLead> {
        (1..=n).map(lead).collect()
    }

    fn sizes(batches: &[Batch]) -> Vec<usize> {
        batches.iter().map(|b| b.leads.len()).collect()
    }

    fn numbers(batches: &[Batch]) -> Vec<usize> {
        batches.iter().map(|b| b.number).collect()
    }

    #[test]
    fn fresh_run_partitions_with_short_tail() {
        let batches = plan(&leads(11), 5, 0);
        assert_eq!(sizes(&batches), [5, 5, 1]);
        assert_eq!(numbers(&batches), [1, 2, 3]);
    }

    #[test]
    fn resume_covers_the_remainder_exactly_once() {
        let all = leads(11);
        let batches = plan(&all, 5, 5);
        assert_eq!(sizes(&batches), [5, 1]);
        assert_eq!(numbers(&batches), [2, 3]);

        let covered: Vec<&str> = batches
            .iter()
            .flat_map(|b| b.leads.iter().map(|l| l.name.as_str()))
            .collect();
        let expected: Vec<String> = (6..=11).map(|n| format!("Lead {n}")).collect();
        assert_eq!(covered, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn exact_multiple_has_no_tail() {
        let batches = plan(&leads(10), 5, 0);
        assert_eq!(sizes(&batches), [5, 5]);
    }

    #[test]
    fn cursor_at_or_past_the_end_plans_nothing() {
        assert!(plan(&leads(4), 5, 4).is_empty());
        assert!(plan(&leads(4), 5, 100).is_empty());
    }

    #[test]
    fn no_records_plans_nothing() {
        assert!(plan(&[], 5, 0).is_empty());
    }

    #[test]
    fn zero_batch_size_plans_nothing() {
        assert!(plan(&leads(3), 0, 0).is_empty());
    }

    #[test]
    fn planning_is_idempotent() {
        let all = leads(11);
        assert_eq!(plan(&all, 5, 5), plan(&all, 5, 5));
        assert_eq!(plan(&all, 4, 0), plan(&all, 4, 0));
    }

    #[test]
    fn number_chunks_starts_where_told() {
        let batches = number_chunks(&leads(6), 5, 3);
        assert_eq!(numbers(&batches), [3, 4]);
        assert_eq!(sizes(&batches), [5, 1]);
    }
}
