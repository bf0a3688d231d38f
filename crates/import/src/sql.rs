use funil_core::CanonicalLead;

use crate::batch::Batch;

/// Target table of the emitted statements.
pub const TABLE: &str = "leads";

type Renderer = fn(&CanonicalLead) -> String;

/// Column names and their value producers, bound as one ordered table so the
/// statement header and the rendered values cannot drift apart.
const COLUMNS: [(&str, Renderer); 10] = [
    ("owner_id", |l| quoted(&l.owner_id)),
    ("contact_date", |l| match l.contact_date {
        Some(d) => quoted(&d.to_string()),
        None => NULL.to_string(),
    }),
    ("name", |l| quoted(&l.name)),
    ("contact_handle", |l| opt_text(l.contact_handle.as_deref())),
    ("source", |l| quoted(l.source.as_str())),
    ("budget_sent", |l| l.budget_sent.to_string()),
    ("outcome", |l| quoted(l.outcome.as_str())),
    ("contact_quality", |l| match l.contact_quality {
        Some(q) => quoted(q.as_str()),
        None => NULL.to_string(),
    }),
    ("closed_value", |l| match l.closed_value {
        Some(v) => format!("{:.2}", v.to_decimal()),
        None => NULL.to_string(),
    }),
    ("note", |l| opt_text(l.note.as_deref())),
];

const NULL: &str = "NULL";

/// Escape a string for a single-quoted SQL literal: double the single quotes
/// first, then escape backslashes. The order matters; reversing it would
/// double-escape the backslashes introduced by the first step.
pub fn escape_string(s: &str) -> String {
    s.replace('\'', "''").replace('\\', "\\\\")
}

fn quoted(s: &str) -> String {
    format!("'{}'", escape_string(s))
}

fn opt_text(v: Option<&str>) -> String {
    match v {
        Some(s) => quoted(s),
        None => NULL.to_string(),
    }
}

/// Render one batch as a self-contained bulk-insert statement.
pub fn emit(batch: &Batch) -> String {
    if batch.leads.is_empty() {
        return format!("-- batch {}: no rows\n", batch.number);
    }

    let header: Vec<&str> = COLUMNS.iter().map(|(name, _)| *name).collect();
    let rows: Vec<String> = batch
        .leads
        .iter()
        .map(|lead| {
            let values: Vec<String> = COLUMNS.iter().map(|(_, render)| render(lead)).collect();
            format!("  ({})", values.join(", "))
        })
        .collect();

    format!(
        "-- batch {}\nINSERT INTO {} ({}) VALUES\n{};\n",
        batch.number,
        TABLE,
        header.join(", "),
        rows.join(",\n"),
    )
}

/// Row-count check to run after all batch scripts have been applied.
pub fn emit_verification(owner_id: &str) -> String {
    format!(
        "SELECT COUNT(*) AS total FROM {} WHERE owner_id = {};\n",
        TABLE,
        quoted(owner_id),
    )
}
