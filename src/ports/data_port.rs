//! Market data port trait.
//!
//! The boundary to the external data collaborator: it supplies bars that
//! already carry their indicator columns, and snapshot records for the
//! advice engine. The core never fetches or computes market data itself.

use crate::domain::bar::EnrichedBar;
use crate::domain::error::StockpilotError;
use crate::domain::snapshot::IndicatorSnapshot;

/// One instrument row of a portfolio or screener file: the snapshot plus
/// the value currently held (0 for screening candidates).
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRecord {
    pub ticker: String,
    pub position_value: f64,
    pub snapshot: IndicatorSnapshot,
}

pub trait MarketDataPort {
    /// Ordered, gap-free daily bars for one instrument, oldest first.
    fn fetch_bars(&self, code: &str) -> Result<Vec<EnrichedBar>, StockpilotError>;

    /// Every instrument the adapter can serve bars for.
    fn list_symbols(&self) -> Result<Vec<String>, StockpilotError>;

    /// The snapshot records of a portfolio or screener file.
    fn fetch_snapshots(&self) -> Result<Vec<SnapshotRecord>, StockpilotError>;
}
