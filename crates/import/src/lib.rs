pub mod batch;
pub mod csv;
pub mod driver;
pub mod mapper;
pub mod normalize;
pub mod sql;

pub use batch::{number_chunks, plan, Batch};
pub use csv::{parse_leads, ParseError, RawRow};
pub use driver::{
    export, BatchFailure, ExportReport, ImportDriver, ImportError, ImportOptions, ImportReport,
    NormalizationStats, SqlScript,
};
pub use mapper::{map_row, MappedRow, RowAudit, NAME_PLACEHOLDER};
pub use normalize::{
    normalize_amount, normalize_date, normalize_outcome, normalize_quality, normalize_source,
    parse_budget_flag, Normalized,
};
