pub mod http_sheet;

use crate::domain::error::Result;
use async_trait::async_trait;

pub use http_sheet::HttpSheetSource;

/// Value sent in the `Accept` header of every upstream fetch.
pub const CSV_ACCEPT: &str = "text/csv,*/*";

/// Where the schedule CSV comes from.
#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Fetch the whole CSV export as text.
    async fn fetch_csv(&self) -> Result<String>;
}
