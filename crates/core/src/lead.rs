use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Where a lead first reached the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeadSource {
    Referral,
    OrganicProfile,
    Ad,
    ReturningCustomer,
}

impl LeadSource {
    /// Canonical token stored in the database and emitted in SQL.
    pub fn as_str(self) -> &'static str {
        match self {
            LeadSource::Referral => "referral",
            LeadSource::OrganicProfile => "organic_profile",
            LeadSource::Ad => "ad",
            LeadSource::ReturningCustomer => "returning_customer",
        }
    }
}

impl fmt::Display for LeadSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal state of the sales conversation at import time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Sale,
    QuoteInProgress,
    NoSale,
}

impl Outcome {
    pub fn as_str(self) -> &'static str {
        match self {
            Outcome::Sale => "sale",
            Outcome::QuoteInProgress => "quote_in_progress",
            Outcome::NoSale => "no_sale",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactQuality {
    Good,
    Regular,
    Poor,
}

impl ContactQuality {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactQuality::Good => "good",
            ContactQuality::Regular => "regular",
            ContactQuality::Poor => "poor",
        }
    }
}

impl fmt::Display for ContactQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The normalized, persistence-ready lead record.
///
/// `owner_id` and `name` are always non-empty; `contact_date` is `None` only
/// when the source text was empty or did not parse as a real calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalLead {
    pub owner_id: String,
    pub contact_date: Option<NaiveDate>,
    pub name: String,
    pub contact_handle: Option<String>,
    pub source: LeadSource,
    pub budget_sent: bool,
    pub outcome: Outcome,
    pub contact_quality: Option<ContactQuality>,
    pub closed_value: Option<Money>,
    pub note: Option<String>,
}
