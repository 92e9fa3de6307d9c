//! @ai:module:intent Results tables: per-run writing and cross-run collection
//! @ai:module:layer infrastructure
//! @ai:module:public_api ResultWriter, ResultRow, RunContext, ResultCollector, CollectedTable

pub mod collector;
pub mod writer;

pub use collector::{CollectedTable, ResultCollector, TimingSummary};
pub use writer::{ResultRow, ResultWriter, RunContext};
