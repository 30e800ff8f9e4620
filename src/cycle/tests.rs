use super::*;
use crate::engine::{partition, EngineError};
use crate::reference::mushaf::{juzs, surahs};
use crate::settings::Settings;
use chrono::NaiveDate;

fn mushaf_plan(month: &str) -> CyclePlan {
    CyclePlan::build(month, &Settings::default(), surahs(), juzs()).unwrap()
}

#[test]
fn test_month_key_format() {
    let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();
    assert_eq!(month_key(date), "2026-03");

    let date = NaiveDate::from_ymd_opt(2026, 12, 1).unwrap();
    assert_eq!(month_key(date), "2026-12");
}

#[test]
fn test_parse_month_key() {
    assert_eq!(
        parse_month_key("2026-10").unwrap(),
        NaiveDate::from_ymd_opt(2026, 10, 1).unwrap()
    );
    assert!(parse_month_key("2026-13").is_err());
    assert!(parse_month_key("2026-1").is_err());
    assert!(parse_month_key("October").is_err());
}

#[test]
fn test_current_month_key_round_trips() {
    assert!(parse_month_key(&current_month_key()).is_ok());
}

#[test]
fn test_plan_annotates_every_segment() {
    let plan = mushaf_plan("2026-10");

    assert_eq!(plan.month_key, "2026-10");
    assert_eq!(plan.segments.len(), 30);

    let first = &plan.segments[0];
    assert_eq!((first.segment.start_page, first.segment.end_page), (1, 21));
    assert_eq!(first.chapters.len(), 2);
    assert_eq!(first.chapters[0].name_en, "Al-Fatihah");
    assert_eq!(first.chapters[1].name_de, "Die Kuh");
    assert_eq!(first.sub_divisions, vec![SubDivisionSpan { number: 1 }]);

    let last = plan.segments.last().unwrap();
    assert_eq!(last.segment.end_page, 604);
    assert_eq!(last.chapters.last().unwrap().number, 114);
    assert_eq!(last.sub_divisions.last().unwrap().number, 30);

    assert!(plan.segments.iter().all(|s| !s.chapters.is_empty()));
    assert!(plan.segments.iter().all(|s| !s.sub_divisions.is_empty()));
}

#[test]
fn test_plan_one_page_segments_follow_surah_ends() {
    let settings = Settings {
        segments_per_month: 604,
        ..Settings::default()
    };
    let plan = CyclePlan::build("2026-10", &settings, surahs(), juzs()).unwrap();
    assert_eq!(plan.segments.len(), 604);

    let numbers = |page: usize| -> Vec<u32> {
        plan.segments[page - 1]
            .chapters
            .iter()
            .map(|c| c.number)
            .collect()
    };
    // Al-Infitar and Al-Mutaffifin both start on page 587
    assert_eq!(numbers(586), vec![81]);
    assert_eq!(numbers(587), vec![83]);
    assert_eq!(numbers(604), vec![114]);
}

#[test]
fn test_plan_rejects_mismatched_page_count() {
    let settings = Settings {
        total_pages: 600,
        ..Settings::default()
    };
    let result = CyclePlan::build("2026-10", &settings, surahs(), juzs());
    assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
}

#[test]
fn test_plan_rejects_bad_month_key() {
    let result = CyclePlan::build("2026/10", &Settings::default(), surahs(), juzs());
    assert!(result.is_err());
}

#[test]
fn test_chapter_span_json_shape() {
    let plan = mushaf_plan("2026-10");
    let json = serde_json::to_value(&plan.segments[0].chapters[0]).unwrap();

    assert_eq!(json["number"], 1);
    assert_eq!(json["nameEn"], "Al-Fatihah");
    assert_eq!(json["nameDe"], "Die Eröffnung");
    assert_eq!(json["name"], "الفاتحة");
}

#[test]
fn test_fingerprint_tracks_boundaries() {
    let thirty = partition(604, 30).unwrap();
    let sixty = partition(604, 60).unwrap();

    assert_eq!(layout_fingerprint(&thirty), layout_fingerprint(&thirty));
    assert_ne!(layout_fingerprint(&thirty), layout_fingerprint(&sixty));
    assert_eq!(layout_fingerprint(&thirty).len(), 64);

    let plan = mushaf_plan("2026-10");
    assert_eq!(plan.fingerprint, layout_fingerprint(&thirty));
}
