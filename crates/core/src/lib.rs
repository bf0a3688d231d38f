pub mod lead;
pub mod money;
pub mod store;

pub use lead::{CanonicalLead, ContactQuality, LeadSource, Outcome};
pub use money::Money;
pub use store::{LeadStore, StoreError};
