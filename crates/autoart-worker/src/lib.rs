//! Bulk generation driver: runs seeded generation units through the batch
//! executor and writes one record per unit.

pub mod generate;
pub mod telemetry;

pub use generate::{evaluate_text, generate_unit, run, unit_path, ChannelRecord, RunSummary, UnitRecord};
