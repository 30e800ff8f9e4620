use super::*;
use crate::reference::mushaf::{juzs, surahs, MUSHAF_TOTAL_PAGES};
use crate::reference::{PageUnit, SubDivisionUnit, UnitTable};

fn make_table(starts: &[u32], total_pages: u32) -> UnitTable<SubDivisionUnit> {
    let units = starts
        .iter()
        .zip(1..)
        .map(|(&start_page, ordinal)| SubDivisionUnit { ordinal, start_page });
    UnitTable::from_units(total_pages, units).unwrap()
}

fn ordinals<U: PageUnit>(units: &[&U]) -> Vec<u32> {
    units.iter().map(|u| u.ordinal()).collect()
}

#[test]
fn test_partition_mushaf_into_thirty() {
    let segments = partition(604, 30).unwrap();

    assert_eq!(segments.len(), 30);
    assert_eq!((segments[0].start_page, segments[0].end_page), (1, 21));
    assert_eq!((segments[1].start_page, segments[1].end_page), (22, 42));
    assert_eq!((segments[3].start_page, segments[3].end_page), (64, 84));
    assert_eq!((segments[4].start_page, segments[4].end_page), (85, 104));
    assert_eq!(segments[29].end_page, 604);

    // 604 = 30 * 20 + 4: the first four segments carry the extra page
    assert!(segments[..4].iter().all(|s| s.size() == 21));
    assert!(segments[4..].iter().all(|s| s.size() == 20));
}

#[test]
fn test_partition_covers_every_page_exactly_once() {
    for total in 1..=80 {
        for count in 1..=total {
            let segments = partition(total, count).unwrap();
            assert_eq!(segments.len(), count as usize);
            assert_eq!(segments[0].start_page, 1);
            assert_eq!(segments.last().unwrap().end_page, total);

            for pair in segments.windows(2) {
                assert_eq!(pair[1].start_page, pair[0].end_page + 1);
                assert_eq!(pair[1].index, pair[0].index + 1);
            }

            let pages: u32 = segments.iter().map(Segment::size).sum();
            assert_eq!(pages, total, "total={} count={}", total, count);
        }
    }
}

#[test]
fn test_partition_is_balanced() {
    for total in 1..=80 {
        for count in 1..=total {
            let segments = partition(total, count).unwrap();
            let max = segments.iter().map(Segment::size).max().unwrap();
            let min = segments.iter().map(Segment::size).min().unwrap();
            assert!(max - min <= 1, "total={} count={}", total, count);

            // Larger segments always come first
            let sizes: Vec<u32> = segments.iter().map(Segment::size).collect();
            assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
        }
    }
}

#[test]
fn test_partition_is_deterministic() {
    assert_eq!(partition(604, 30).unwrap(), partition(604, 30).unwrap());
    assert_eq!(partition(17, 5).unwrap(), partition(17, 5).unwrap());
}

#[test]
fn test_partition_single_segment_and_single_pages() {
    let whole = partition(604, 1).unwrap();
    assert_eq!(whole, vec![Segment { index: 0, start_page: 1, end_page: 604 }]);

    let pages = partition(5, 5).unwrap();
    assert!(pages.iter().all(|s| s.size() == 1));
    assert_eq!(pages[4].start_page, 5);
}

#[test]
fn test_partition_rejects_more_segments_than_pages() {
    let err = partition(10, 11).unwrap_err();
    assert!(matches!(err, EngineError::InvalidArgument(_)));
}

#[test]
fn test_partition_rejects_zero() {
    assert!(matches!(partition(0, 1), Err(EngineError::InvalidArgument(_))));
    assert!(matches!(partition(10, 0), Err(EngineError::InvalidArgument(_))));
}

#[test]
fn test_lookup_boundary_is_exact() {
    let table = make_table(&[1, 2, 50, 77], 100);

    let before = units_overlapping(&table, 49, 49).unwrap();
    assert_eq!(ordinals(&before), vec![2]);

    let at = units_overlapping(&table, 50, 50).unwrap();
    assert_eq!(ordinals(&at), vec![3]);

    // Ending right before the next unit's start page stays inside unit 3
    let up_to = units_overlapping(&table, 60, 76).unwrap();
    assert_eq!(ordinals(&up_to), vec![3]);
}

#[test]
fn test_lookup_inside_single_unit() {
    let table = make_table(&[1, 2, 50, 77], 100);
    let found = units_overlapping(&table, 60, 70).unwrap();
    assert_eq!(ordinals(&found), vec![3]);
}

#[test]
fn test_lookup_spanning_several_units() {
    let table = make_table(&[1, 2, 50, 77], 100);
    let found = units_overlapping(&table, 40, 80).unwrap();
    assert_eq!(ordinals(&found), vec![2, 3, 4]);
}

#[test]
fn test_lookup_last_unit_runs_to_document_end() {
    let table = make_table(&[1, 2, 50, 77], 100);
    let found = units_overlapping(&table, 100, 100).unwrap();
    assert_eq!(ordinals(&found), vec![4]);
}

#[test]
fn test_lookup_full_document_returns_whole_table() {
    let table = surahs();
    let found = units_overlapping(table, 1, MUSHAF_TOTAL_PAGES).unwrap();
    assert_eq!(found.len(), 114);
    assert_eq!(ordinals(&found), (1..=114).collect::<Vec<_>>());

    let found = units_overlapping(juzs(), 1, MUSHAF_TOTAL_PAGES).unwrap();
    assert_eq!(ordinals(&found), (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_lookup_first_page_is_fatihah_only() {
    let found = units_overlapping(surahs(), 1, 1).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].names.get("en"), "Al-Fatihah");
}

#[test]
fn test_lookup_mushaf_surah_boundaries() {
    let found = units_overlapping(surahs(), 60, 70).unwrap();
    assert_eq!(ordinals(&found), vec![3]);

    let found = units_overlapping(surahs(), 49, 49).unwrap();
    assert_eq!(ordinals(&found), vec![2]);

    let found = units_overlapping(surahs(), 50, 50).unwrap();
    assert_eq!(ordinals(&found), vec![3]);
}

#[test]
fn test_lookup_shared_start_pages() {
    // Surahs 112-114 all begin on the last page; only the last of them
    // covers it, the others end on the page before.
    let found = units_overlapping(surahs(), 604, 604).unwrap();
    assert_eq!(ordinals(&found), vec![114]);

    let found = units_overlapping(surahs(), 603, 603).unwrap();
    assert_eq!(ordinals(&found), vec![111]);

    // A range reaching back one page picks up every surah that starts on it
    let found = units_overlapping(surahs(), 603, 604).unwrap();
    assert_eq!(ordinals(&found), vec![111, 112, 113, 114]);

    let found = units_overlapping(surahs(), 587, 587).unwrap();
    assert_eq!(ordinals(&found), vec![83]);
}

#[test]
fn test_lookup_shared_start_on_small_table() {
    let table = make_table(&[1, 5, 5, 8], 10);

    assert_eq!(ordinals(&units_overlapping(&table, 5, 5).unwrap()), vec![3]);
    assert_eq!(ordinals(&units_overlapping(&table, 4, 5).unwrap()), vec![1, 2, 3]);
    assert_eq!(ordinals(&units_overlapping(&table, 8, 10).unwrap()), vec![4]);
}

#[test]
fn test_lookup_juz_for_first_segments() {
    let found = units_overlapping(juzs(), 1, 21).unwrap();
    assert_eq!(ordinals(&found), vec![1]);

    let found = units_overlapping(juzs(), 22, 42).unwrap();
    assert_eq!(ordinals(&found), vec![2, 3]);
}

#[test]
fn test_lookup_rejects_malformed_queries() {
    let table = make_table(&[1, 50], 100);

    for (start, end) in [(0, 5), (5, 0), (10, 9), (1, 101), (101, 101)] {
        let err = units_overlapping(&table, start, end).unwrap_err();
        assert!(
            matches!(err, EngineError::InvalidArgument(_)),
            "query {}..={} should be rejected",
            start,
            end
        );
    }
}

#[test]
fn test_lookup_every_page_hits_at_least_one_unit() {
    let table = surahs();
    for page in 1..=MUSHAF_TOTAL_PAGES {
        let found = units_overlapping(table, page, page).unwrap();
        assert!(!found.is_empty(), "page {} maps to no surah", page);
    }
}
