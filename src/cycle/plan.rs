use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::engine::{partition, units_overlapping, EngineError, Segment};
use crate::reference::{StructuralUnit, SubDivisionUnit, UnitTable};
use crate::settings::Settings;

/// Surah entry stored with a segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterSpan {
    pub number: u32,
    pub name: String,
    pub name_en: String,
    pub name_de: String,
}

impl From<&StructuralUnit> for ChapterSpan {
    fn from(unit: &StructuralUnit) -> Self {
        Self {
            number: unit.ordinal,
            name: unit.names.primary.clone(),
            name_en: unit.names.get("en").to_string(),
            name_de: unit.names.get("de").to_string(),
        }
    }
}

/// Juz entry stored with a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubDivisionSpan {
    pub number: u32,
}

impl From<&SubDivisionUnit> for SubDivisionSpan {
    fn from(unit: &SubDivisionUnit) -> Self {
        Self {
            number: unit.ordinal,
        }
    }
}

/// A segment together with the surahs and juz it touches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSegment {
    pub segment: Segment,
    pub chapters: Vec<ChapterSpan>,
    pub sub_divisions: Vec<SubDivisionSpan>,
}

/// Everything needed to persist one month's cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CyclePlan {
    pub month_key: String,
    pub fingerprint: String,
    pub segments: Vec<PlannedSegment>,
}

impl CyclePlan {
    /// Partition the document per `settings` and annotate every segment
    pub fn build(
        month_key: impl Into<String>,
        settings: &Settings,
        chapter_table: &UnitTable<StructuralUnit>,
        sub_division_table: &UnitTable<SubDivisionUnit>,
    ) -> Result<Self, EngineError> {
        for table_pages in [chapter_table.total_pages(), sub_division_table.total_pages()] {
            if table_pages != settings.total_pages {
                return Err(EngineError::InvalidArgument(format!(
                    "settings describe {} pages but the reference tables cover {}",
                    settings.total_pages, table_pages
                )));
            }
        }

        let month_key = month_key.into();
        parse_month_key(&month_key)?;

        let segments = partition(settings.total_pages, settings.segments_per_month)?;
        let fingerprint = layout_fingerprint(&segments);

        let segments = segments
            .into_iter()
            .map(|segment| -> Result<PlannedSegment, EngineError> {
                let (first, last) = (segment.start_page, segment.end_page);
                let chapters = units_overlapping(chapter_table, first, last)?
                    .into_iter()
                    .map(ChapterSpan::from)
                    .collect();
                let sub_divisions = units_overlapping(sub_division_table, first, last)?
                    .into_iter()
                    .map(SubDivisionSpan::from)
                    .collect();
                Ok(PlannedSegment {
                    segment,
                    chapters,
                    sub_divisions,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            month_key,
            fingerprint,
            segments,
        })
    }
}

/// `YYYY-MM` key identifying a monthly cycle
pub fn month_key(date: impl Datelike) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Key of the current month in UTC
pub fn current_month_key() -> String {
    month_key(Utc::now())
}

/// Validate a `YYYY-MM` key and return the first day of that month
pub fn parse_month_key(key: &str) -> Result<NaiveDate, EngineError> {
    if key.len() != 7 {
        return Err(EngineError::InvalidArgument(format!(
            "month key {:?} is not YYYY-MM",
            key
        )));
    }
    NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d").map_err(|_| {
        EngineError::InvalidArgument(format!("month key {:?} is not YYYY-MM", key))
    })
}

/// SHA-256 over the segment boundaries.
///
/// Two layouts share a fingerprint exactly when every segment starts and ends
/// on the same pages.
pub fn layout_fingerprint(segments: &[Segment]) -> String {
    let mut hasher = Sha256::new();
    for segment in segments {
        hasher.update(format!("{}-{};", segment.start_page, segment.end_page).as_bytes());
    }
    hex::encode(hasher.finalize())
}
