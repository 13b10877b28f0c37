//! Pure computation engines: pricing and daily aggregation.

pub mod pricing;
pub mod summary;

pub use pricing::{quote, Quote};
pub use summary::{summarize, summarize_by_date, DailySummary};
