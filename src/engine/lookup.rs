use super::{EngineError, Page};
use crate::reference::{PageUnit, UnitTable};

/// Return the units of `table` whose page range intersects
/// `start_page..=end_page`, in table order.
///
/// A unit's range runs from its start page up to the page before the next
/// unit starts (the last unit runs to the end of the document). The scan
/// stops at the first unit starting after `end_page`.
pub fn units_overlapping<U: PageUnit>(
    table: &UnitTable<U>,
    start_page: Page,
    end_page: Page,
) -> Result<Vec<&U>, EngineError> {
    check_query(table.total_pages(), start_page, end_page)?;

    Ok(table
        .spans()
        .take_while(|(unit, _)| unit.start_page() <= end_page)
        .filter(|(_, unit_end)| *unit_end >= start_page)
        .map(|(unit, _)| unit)
        .collect())
}

fn check_query(total_pages: Page, start_page: Page, end_page: Page) -> Result<(), EngineError> {
    if start_page == 0 || end_page == 0 {
        return Err(EngineError::invalid("pages are numbered from 1"));
    }
    if start_page > end_page {
        return Err(EngineError::invalid(format!(
            "start page {} is after end page {}",
            start_page, end_page
        )));
    }
    if end_page > total_pages {
        return Err(EngineError::invalid(format!(
            "end page {} is beyond the last page {}",
            end_page, total_pages
        )));
    }
    Ok(())
}
