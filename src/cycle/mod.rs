mod plan;

#[cfg(test)]
mod tests;

pub use plan::{
    current_month_key, layout_fingerprint, month_key, parse_month_key, ChapterSpan, CyclePlan,
    PlannedSegment, SubDivisionSpan,
};
