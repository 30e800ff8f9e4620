pub mod mushaf;
mod table;
mod unit;


pub use table::{UnitTable, UnitTableBuilder};
pub use unit::{DisplayNames, StructuralUnit, SubDivisionUnit};

use crate::engine::Page;

/// Anything that occupies a run of pages starting at a fixed page
pub trait PageUnit {
    /// 1-based position of the unit within its table
    fn ordinal(&self) -> u32;
    /// Page on which the unit begins
    fn start_page(&self) -> Page;
}
