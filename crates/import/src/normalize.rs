use chrono::NaiveDate;
use funil_core::{ContactQuality, LeadSource, Money, Outcome};
use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::OnceLock;

/// The affirmative token of the budget-sent flag. Exact, case-sensitive.
pub const AFFIRMATIVE: &str = "Sim";

/// A normalized value plus whether the fallback policy produced it,
/// so every default is independently observable in the run report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized<T> {
    pub value: T,
    pub defaulted: bool,
}

impl<T> Normalized<T> {
    fn hit(value: T) -> Self {
        Normalized { value, defaulted: false }
    }

    fn fallback(value: T) -> Self {
        Normalized { value, defaulted: true }
    }
}

/// Parse a `DD/MM` date against an explicitly supplied assumed year.
///
/// Empty input is `None`. Anything that does not parse as a real calendar
/// date in that year is also `None`; malformed input never yields a
/// fabricated date.
pub fn normalize_date(raw: &str, year: i32) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let mut parts = raw.split('/');
    let day = parts.next()?.trim().parse::<u32>().ok()?;
    let month = parts.next()?.trim().parse::<u32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

fn thousands_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // A dot is a grouping separator only when a group of exactly 3 digits
    // follows it.
    RE.get_or_init(|| Regex::new(r"\.(\d{3})\b").expect("grouping separator pattern"))
}

/// Parse a locale-formatted currency amount: `,` is the decimal separator,
/// `.` before a 3-digit group is a thousands separator, currency symbols and
/// whitespace are ignored. `"1.234,56"` is 1234.56; `"12,50"` is 12.5.
/// Empty or unparseable input is `None`.
pub fn normalize_amount(raw: &str) -> Option<Money> {
    let stripped: String = raw
        .replace("R$", "")
        .replace('$', "")
        .split_whitespace()
        .collect();
    if stripped.is_empty() {
        return None;
    }
    let ungrouped = thousands_re().replace_all(&stripped, "$1");
    let dotted = ungrouped.replace(',', ".");
    Decimal::from_str(&dotted).ok().map(Money::from_decimal)
}

/// Exact-match table over the known source tokens; anything else falls into
/// the `Ad` default bucket.
pub fn normalize_source(raw: &str) -> Normalized<LeadSource> {
    match raw.trim() {
        "Indicação" => Normalized::hit(LeadSource::Referral),
        "Orgânico" | "Perfil" | "Orgânico / Perfil" => Normalized::hit(LeadSource::OrganicProfile),
        "Anúncio" | "Anúncio Promoção" => Normalized::hit(LeadSource::Ad),
        "Cliente Antigo" => Normalized::hit(LeadSource::ReturningCustomer),
        _ => Normalized::fallback(LeadSource::Ad),
    }
}

/// Empty or unrecognized outcomes default to `QuoteInProgress`.
pub fn normalize_outcome(raw: &str) -> Normalized<Outcome> {
    match raw.trim() {
        "Venda" => Normalized::hit(Outcome::Sale),
        "Orçamento" | "Orçamento em Andamento" => Normalized::hit(Outcome::QuoteInProgress),
        "Não Venda" | "Sem Venda" => Normalized::hit(Outcome::NoSale),
        _ => Normalized::fallback(Outcome::QuoteInProgress),
    }
}

/// Blank quality is a normal `None`; an unrecognized token is `None` with the
/// `defaulted` flag set.
pub fn normalize_quality(raw: &str) -> Normalized<Option<ContactQuality>> {
    match raw.trim() {
        "Bom" => Normalized::hit(Some(ContactQuality::Good)),
        "Regular" => Normalized::hit(Some(ContactQuality::Regular)),
        "Ruim" => Normalized::hit(Some(ContactQuality::Poor)),
        "" => Normalized::hit(None),
        _ => Normalized::fallback(None),
    }
}

/// True only when the raw flag textually equals the affirmative token.
pub fn parse_budget_flag(raw: &str) -> bool {
    raw.trim() == AFFIRMATIVE
}
