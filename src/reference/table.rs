use super::PageUnit;
use crate::engine::{EngineError, Page};

/// Immutable, validated table of units ordered by start page
#[derive(Debug, Clone)]
pub struct UnitTable<U> {
    units: Vec<U>,
    total_pages: Page,
}

/// Mutable builder for constructing a unit table
pub struct UnitTableBuilder<U> {
    units: Vec<U>,
    total_pages: Page,
}

impl<U: PageUnit> UnitTableBuilder<U> {
    /// Start a table for a document of `total_pages` pages
    pub fn new(total_pages: Page) -> Self {
        Self {
            units: Vec::new(),
            total_pages,
        }
    }

    /// Append the next unit.
    ///
    /// Ordinals must strictly increase. Start pages may repeat (several short
    /// surahs begin on the same Mushaf page) but never go backwards.
    pub fn push(&mut self, unit: U) -> Result<(), EngineError> {
        let start = unit.start_page();
        if start == 0 || start > self.total_pages {
            return Err(EngineError::invalid(format!(
                "unit {} starts on page {}, outside 1..={}",
                unit.ordinal(),
                start,
                self.total_pages
            )));
        }

        if let Some(prev) = self.units.last() {
            if unit.ordinal() <= prev.ordinal() {
                return Err(EngineError::invalid(format!(
                    "unit ordinal {} does not follow {}",
                    unit.ordinal(),
                    prev.ordinal()
                )));
            }
            if start < prev.start_page() {
                return Err(EngineError::invalid(format!(
                    "unit {} starts on page {}, before unit {} on page {}",
                    unit.ordinal(),
                    start,
                    prev.ordinal(),
                    prev.start_page()
                )));
            }
        } else if start != 1 {
            return Err(EngineError::invalid(format!(
                "first unit must start on page 1, not {}",
                start
            )));
        }

        self.units.push(unit);
        Ok(())
    }

    /// Chainable form of [`push`](Self::push)
    pub fn unit(mut self, unit: U) -> Result<Self, EngineError> {
        self.push(unit)?;
        Ok(self)
    }

    /// Freeze the table
    pub fn build(self) -> Result<UnitTable<U>, EngineError> {
        if self.units.is_empty() {
            return Err(EngineError::invalid("unit table is empty"));
        }

        Ok(UnitTable {
            units: self.units,
            total_pages: self.total_pages,
        })
    }
}

impl<U: PageUnit> UnitTable<U> {
    /// Build a table from units already in order
    pub fn from_units(
        total_pages: Page,
        units: impl IntoIterator<Item = U>,
    ) -> Result<Self, EngineError> {
        let mut builder = UnitTableBuilder::new(total_pages);
        for unit in units {
            builder.push(unit)?;
        }
        builder.build()
    }

    pub fn total_pages(&self) -> Page {
        self.total_pages
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Look up a unit by its ordinal
    pub fn by_ordinal(&self, ordinal: u32) -> Option<&U> {
        self.units
            .binary_search_by_key(&ordinal, |u| u.ordinal())
            .ok()
            .map(|i| &self.units[i])
    }

    /// Implicit last page of the unit at `index`: the page before the next
    /// unit starts, or the document end for the last unit.
    ///
    /// A unit that shares its start page with the next one ends the page
    /// before it starts, so it only matches queries that also include that
    /// earlier page.
    pub(crate) fn end_page(&self, index: usize) -> Page {
        match self.units.get(index + 1) {
            Some(next) => next.start_page() - 1,
            None => self.total_pages,
        }
    }

    /// Each unit paired with its implicit last page
    pub fn spans(&self) -> impl Iterator<Item = (&U, Page)> {
        self.units
            .iter()
            .enumerate()
            .map(move |(i, unit)| (unit, self.end_page(i)))
    }
}
