// Public API exports
pub mod cycle;
pub mod db;
pub mod engine;
pub mod reference;
pub mod reminder;
pub mod settings;
pub mod telemetry;

// Re-export main types for convenience
pub use engine::{partition, units_overlapping, EngineError, Page, Segment};

pub use reference::mushaf::{juzs, surahs, MUSHAF_TOTAL_PAGES};
pub use reference::{
    DisplayNames, PageUnit, StructuralUnit, SubDivisionUnit, UnitTable, UnitTableBuilder,
};

pub use cycle::{current_month_key, month_key, CyclePlan, PlannedSegment};

pub use db::{Cycle, CycleDB, StoreError};

pub use reminder::{build_digests, is_reminder_day, Digest};

pub use settings::{Settings, SettingsError};
