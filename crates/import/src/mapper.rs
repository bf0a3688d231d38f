use funil_core::CanonicalLead;
use serde::Serialize;

use crate::csv::RawRow;
use crate::normalize::{
    normalize_amount, normalize_date, normalize_outcome, normalize_quality, normalize_source,
    parse_budget_flag,
};

/// Display name substituted when the name column is empty.
pub const NAME_PLACEHOLDER: &str = "Nome não informado";

/// Which fields of a row were filled in by fallback policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowAudit {
    pub date_unparseable: bool,
    pub source_defaulted: bool,
    pub outcome_defaulted: bool,
    pub quality_unrecognized: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappedRow {
    pub lead: CanonicalLead,
    pub audit: RowAudit,
}

fn non_empty(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Build the canonical lead for one parsed row. Pure and deterministic:
/// each normalizer is applied to its column, nothing else.
pub fn map_row(row: &RawRow, owner_id: &str, year: i32) -> MappedRow {
    let contact_date = normalize_date(&row.contact_date, year);
    let source = normalize_source(&row.source);
    let outcome = normalize_outcome(&row.outcome);
    let quality = normalize_quality(&row.contact_quality);

    let name = match non_empty(&row.name) {
        Some(name) => name,
        None => NAME_PLACEHOLDER.to_string(),
    };

    let audit = RowAudit {
        date_unparseable: contact_date.is_none() && !row.contact_date.trim().is_empty(),
        source_defaulted: source.defaulted,
        outcome_defaulted: outcome.defaulted,
        quality_unrecognized: quality.defaulted,
    };

    MappedRow {
        lead: CanonicalLead {
            owner_id: owner_id.to_string(),
            contact_date,
            name,
            contact_handle: non_empty(&row.contact_handle),
            source: source.value,
            budget_sent: parse_budget_flag(&row.budget_sent),
            outcome: outcome.value,
            contact_quality: quality.value,
            closed_value: normalize_amount(&row.closed_value),
            note: non_empty(&row.note),
        },
        audit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use funil_core::{ContactQuality, LeadSource, Money, Outcome};

    const OWNER: &str = "acct-42";
    const YEAR: i32 = 2023;

    fn row() -> RawRow {
        RawRow {
            contact_date: "12/03".into(),
            name: "Maria".into(),
            contact_handle: "@maria".into(),
            source: "Indicação".into(),
            budget_sent: "Sim".into(),
            outcome: "Venda".into(),
            contact_quality: "Bom".into(),
            closed_value: "1.250,00".into(),
            note: "cliente antiga".into(),
        }
    }

    #[test]
    fn maps_every_column() {
        let mapped = map_row(&row(), OWNER, YEAR);
        let lead = &mapped.lead;
        assert_eq!(lead.owner_id, OWNER);
        assert_eq!(lead.contact_date, NaiveDate::from_ymd_opt(2023, 3, 12));
        assert_eq!(lead.name, "Maria");
        assert_eq!(lead.contact_handle.as_deref(), Some("@maria"));
        assert_eq!(lead.source, LeadSource::Referral);
        assert!(lead.budget_sent);
        assert_eq!(lead.outcome, Outcome::Sale);
        assert_eq!(lead.contact_quality, Some(ContactQuality::Good));
        assert_eq!(lead.closed_value, Some(Money::from_cents(125000)));
        assert_eq!(lead.note.as_deref(), Some("cliente antiga"));
        assert_eq!(mapped.audit, RowAudit::default());
    }

    #[test]
    fn empty_name_gets_placeholder() {
        let mut r = row();
        r.name = "".into();
        let mapped = map_row(&r, OWNER, YEAR);
        assert_eq!(mapped.lead.name, NAME_PLACEHOLDER);
    }

    #[test]
    fn empty_optionals_map_to_none() {
        let mut r = row();
        r.contact_handle = "".into();
        r.closed_value = "".into();
        r.note = "  ".into();
        let mapped = map_row(&r, OWNER, YEAR);
        assert_eq!(mapped.lead.contact_handle, None);
        assert_eq!(mapped.lead.closed_value, None);
        assert_eq!(mapped.lead.note, None);
    }

    #[test]
    fn empty_date_is_none_without_audit_flag() {
        let mut r = row();
        r.contact_date = "".into();
        let mapped = map_row(&r, OWNER, YEAR);
        assert_eq!(mapped.lead.contact_date, None);
        assert!(!mapped.audit.date_unparseable);
    }

    #[test]
    fn malformed_date_is_none_with_audit_flag() {
        let mut r = row();
        r.contact_date = "33/13".into();
        let mapped = map_row(&r, OWNER, YEAR);
        assert_eq!(mapped.lead.contact_date, None);
        assert!(mapped.audit.date_unparseable);
    }

    #[test]
    fn fallbacks_are_audited() {
        let mut r = row();
        r.source = "panfleto".into();
        r.outcome = "".into();
        r.contact_quality = "Ótimo".into();
        let mapped = map_row(&r, OWNER, YEAR);
        assert_eq!(mapped.lead.source, LeadSource::Ad);
        assert_eq!(mapped.lead.outcome, Outcome::QuoteInProgress);
        assert_eq!(mapped.lead.contact_quality, None);
        assert!(mapped.audit.source_defaulted);
        assert!(mapped.audit.outcome_defaulted);
        assert!(mapped.audit.quality_unrecognized);
    }

    #[test]
    fn budget_flag_requires_exact_token() {
        let mut r = row();
        r.budget_sent = "sim".into();
        assert!(!map_row(&r, OWNER, YEAR).lead.budget_sent);
    }

    #[test]
    fn deterministic() {
        let a = map_row(&row(), OWNER, YEAR);
        let b = map_row(&row(), OWNER, YEAR);
        assert_eq!(a, b);
    }
}
