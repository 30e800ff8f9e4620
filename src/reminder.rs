use serde::Serialize;
use std::collections::HashMap;

use crate::db::{Member, OpenClaim, StoredSegment};

pub const REMINDER_SUBJECT: &str = "Khatm reminder: incomplete segments";

/// Reminders go out on the first of the month and on every day divisible
/// by the interval.
pub fn is_reminder_day(day_of_month: u32, interval_days: u32) -> bool {
    day_of_month == 1 || (interval_days > 0 && day_of_month % interval_days == 0)
}

/// One member's unfinished segments
#[derive(Debug, Clone, Serialize)]
pub struct Digest {
    pub member: Member,
    pub segments: Vec<StoredSegment>,
}

/// Group open claims by member, keeping the order members first appear in
pub fn build_digests(open_claims: Vec<OpenClaim>) -> Vec<Digest> {
    let mut digests: Vec<Digest> = Vec::new();
    let mut by_member: HashMap<String, usize> = HashMap::new();

    for open in open_claims {
        match by_member.get(&open.member.id) {
            Some(&i) => digests[i].segments.push(open.segment),
            None => {
                by_member.insert(open.member.id.clone(), digests.len());
                digests.push(Digest {
                    member: open.member,
                    segments: vec![open.segment],
                });
            }
        }
    }

    for digest in &mut digests {
        digest.segments.sort_by_key(|s| s.index);
    }
    digests
}

impl Digest {
    /// Plain-text reminder body
    pub fn render(&self, app_url: &str) -> String {
        let mut body = format!("Assalamu Alaikum {},\n\n", self.member.name);
        body.push_str("You have the following incomplete segments this month:\n\n");
        for segment in &self.segments {
            body.push_str("  - ");
            body.push_str(&segment_line(segment));
            body.push('\n');
        }
        body.push_str(&format!(
            "\nView your segments: {}/my-segments\n",
            app_url.trim_end_matches('/')
        ));
        body
    }
}

/// `Pages 1–21 (Al-Fatihah, Al-Baqarah | Juz 1)`
pub fn segment_line(segment: &StoredSegment) -> String {
    let surahs = segment
        .chapters
        .iter()
        .map(|c| c.name_en.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let juzs = segment
        .sub_divisions
        .iter()
        .map(|j| format!("Juz {}", j.number))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Pages {}–{} ({} | {})",
        segment.start_page, segment.end_page, surahs, juzs
    )
}
