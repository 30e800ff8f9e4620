use serde::{Deserialize, Serialize};

use super::{EngineError, Page};

/// A contiguous page range handed out as one claimable piece of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    /// 0-based position within the cycle
    pub index: u32,
    /// First page (inclusive)
    pub start_page: Page,
    /// Last page (inclusive)
    pub end_page: Page,
}

impl Segment {
    /// Number of pages covered
    pub fn size(&self) -> u32 {
        self.end_page - self.start_page + 1
    }
}

/// Split pages `1..=total_pages` into `segment_count` contiguous segments.
///
/// Sizes differ by at most one page. The leftover pages of the integer
/// division go to the earliest segments, so `partition(604, 30)` yields four
/// 21-page segments followed by twenty-six 20-page ones. Stored cycles
/// depend on these boundaries staying stable.
pub fn partition(total_pages: Page, segment_count: u32) -> Result<Vec<Segment>, EngineError> {
    if total_pages == 0 {
        return Err(EngineError::invalid("total pages must be at least 1"));
    }
    if segment_count == 0 {
        return Err(EngineError::invalid("segment count must be at least 1"));
    }
    if segment_count > total_pages {
        return Err(EngineError::invalid(format!(
            "segment count {} exceeds total pages {}",
            segment_count, total_pages
        )));
    }

    let base = total_pages / segment_count;
    let remainder = total_pages % segment_count;

    let mut segments = Vec::with_capacity(segment_count as usize);
    let mut cursor = 1;

    for index in 0..segment_count {
        let size = if index < remainder { base + 1 } else { base };
        segments.push(Segment {
            index,
            start_page: cursor,
            end_page: cursor + size - 1,
        });
        cursor += size;
    }

    Ok(segments)
}
