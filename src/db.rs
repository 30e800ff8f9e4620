use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, Transaction};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cycle::{ChapterSpan, CyclePlan, SubDivisionSpan};
use crate::engine::Page;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Invalid span data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSegment {
    pub id: String,
    pub cycle_id: String,
    pub index: u32,
    pub start_page: Page,
    pub end_page: Page,
    pub chapters: Vec<ChapterSpan>,
    pub sub_divisions: Vec<SubDivisionSpan>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub id: String,
    pub member_id: String,
    pub member_name: String,
    pub segment_id: String,
    pub claimed_at: String,
    pub completed_at: Option<String>,
}

impl Claim {
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A segment of a cycle with everyone who claimed it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleSegment {
    pub segment: StoredSegment,
    pub claims: Vec<Claim>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cycle {
    pub id: String,
    pub month_key: String,
    pub fingerprint: String,
    pub created_at: String,
    pub segments: Vec<CycleSegment>,
}

/// A claim joined with its segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimedSegment {
    pub claim: Claim,
    pub segment: StoredSegment,
}

/// An unfinished claim joined with its member and segment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenClaim {
    pub member: Member,
    pub claim: Claim,
    pub segment: StoredSegment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleProgress {
    pub month_key: String,
    pub segment_count: u32,
    pub claimed_segments: u32,
    pub completed_segments: u32,
}

const SEGMENT_COLUMNS: &str =
    "s.id, s.cycle_id, s.idx, s.start_page, s.end_page, s.surah_span_json, s.juz_span_json";

const CLAIM_COLUMNS: &str =
    "c.id, c.member_id, m.name, c.segment_id, c.claimed_at, c.completed_at";

pub struct CycleDB {
    conn: Connection,
}

impl CycleDB {
    /// Create a new in-memory database
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    /// Open (or create) a database file
    pub fn open(path: &str) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        debug!(path, "opened cycle database");
        Ok(db)
    }

    fn init_schema(&self) -> StoreResult<()> {
        self.conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS members (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cycles (
                id TEXT PRIMARY KEY,
                month_key TEXT NOT NULL UNIQUE,
                fingerprint TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS segments (
                id TEXT PRIMARY KEY,
                cycle_id TEXT NOT NULL,
                idx INTEGER NOT NULL,
                start_page INTEGER NOT NULL,
                end_page INTEGER NOT NULL,
                surah_span_json TEXT NOT NULL,
                juz_span_json TEXT NOT NULL,
                UNIQUE (cycle_id, idx),
                FOREIGN KEY (cycle_id) REFERENCES cycles(id) ON DELETE CASCADE
            );

            CREATE TABLE IF NOT EXISTS claims (
                id TEXT PRIMARY KEY,
                member_id TEXT NOT NULL,
                segment_id TEXT NOT NULL,
                claimed_at TEXT NOT NULL,
                completed_at TEXT,
                UNIQUE (member_id, segment_id),
                FOREIGN KEY (member_id) REFERENCES members(id) ON DELETE CASCADE,
                FOREIGN KEY (segment_id) REFERENCES segments(id) ON DELETE CASCADE
            );

            CREATE INDEX IF NOT EXISTS idx_segments_cycle ON segments(cycle_id);
            CREATE INDEX IF NOT EXISTS idx_claims_segment ON claims(segment_id);
            CREATE INDEX IF NOT EXISTS idx_claims_member ON claims(member_id);
            "#,
        )?;
        Ok(())
    }

    /// Register a member; emails are compared case-insensitively
    pub fn add_member(&self, name: &str, email: &str) -> StoreResult<Member> {
        let email = email.trim().to_lowercase();
        if self.member_by_email(&email)?.is_some() {
            return Err(StoreError::Conflict(format!(
                "a member with email {} already exists",
                email
            )));
        }

        let member = Member {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email,
            created_at: Utc::now().to_rfc3339(),
        };
        self.insert_member(&member)?;

        info!(member_id = %member.id, "member added");
        Ok(member)
    }

    pub fn get_member(&self, id: &str) -> StoreResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                "SELECT id, name, email, created_at FROM members WHERE id = ?1",
                params![id],
                member_from_row,
            )
            .optional()?;
        Ok(member)
    }

    pub fn member_by_email(&self, email: &str) -> StoreResult<Option<Member>> {
        let member = self
            .conn
            .query_row(
                "SELECT id, name, email, created_at FROM members WHERE email = ?1",
                params![email.trim().to_lowercase()],
                member_from_row,
            )
            .optional()?;
        Ok(member)
    }

    /// Store a new cycle; fails if the month already has one
    pub fn create_cycle(&self, plan: &CyclePlan) -> StoreResult<Cycle> {
        let tx = self.conn.unchecked_transaction()?;
        if cycle_id_for_month(&tx, &plan.month_key)?.is_some() {
            return Err(StoreError::Conflict(format!(
                "cycle {} already exists",
                plan.month_key
            )));
        }
        insert_cycle(&tx, plan)?;
        tx.commit()?;

        info!(
            month = %plan.month_key,
            segments = plan.segments.len(),
            "cycle created"
        );
        self.require_cycle(&plan.month_key)
    }

    /// Return the month's cycle, creating it from `plan` if missing.
    ///
    /// The flag is `true` when a new cycle was written.
    pub fn ensure_cycle(&self, plan: &CyclePlan) -> StoreResult<(Cycle, bool)> {
        match self.cycle_by_month(&plan.month_key)? {
            Some(cycle) => {
                debug!(month = %plan.month_key, "cycle already exists");
                Ok((cycle, false))
            }
            None => Ok((self.create_cycle(plan)?, true)),
        }
    }

    /// Replace the month's cycle. Existing segments and claims are dropped.
    pub fn regenerate_cycle(&self, plan: &CyclePlan) -> StoreResult<Cycle> {
        let tx = self.conn.unchecked_transaction()?;
        let removed = tx.execute(
            "DELETE FROM cycles WHERE month_key = ?1",
            params![plan.month_key],
        )?;
        insert_cycle(&tx, plan)?;
        tx.commit()?;

        let replaced = removed > 0;
        info!(
            month = %plan.month_key,
            replaced,
            segments = plan.segments.len(),
            "cycle regenerated"
        );
        self.require_cycle(&plan.month_key)
    }

    /// Load a cycle with its segments (by index) and their claims
    pub fn cycle_by_month(&self, month_key: &str) -> StoreResult<Option<Cycle>> {
        let header = self
            .conn
            .query_row(
                "SELECT id, month_key, fingerprint, created_at FROM cycles WHERE month_key = ?1",
                params![month_key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, month_key, fingerprint, created_at)) = header else {
            return Ok(None);
        };

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM segments s WHERE s.cycle_id = ?1 ORDER BY s.idx",
            SEGMENT_COLUMNS
        ))?;
        let segments = stmt
            .query_map(params![id], |row| segment_from_row(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM claims c
             JOIN members m ON m.id = c.member_id
             JOIN segments s ON s.id = c.segment_id
             WHERE s.cycle_id = ?1
             ORDER BY c.claimed_at, c.id",
            CLAIM_COLUMNS
        ))?;
        let claims = stmt
            .query_map(params![id], |row| claim_from_row(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;

        let segments = segments
            .into_iter()
            .map(|segment| {
                let claims = claims
                    .iter()
                    .filter(|c| c.segment_id == segment.id)
                    .cloned()
                    .collect();
                CycleSegment { segment, claims }
            })
            .collect();

        Ok(Some(Cycle {
            id,
            month_key,
            fingerprint,
            created_at,
            segments,
        }))
    }

    fn insert_member(&self, member: &Member) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO members (id, name, email, created_at) VALUES (?1, ?2, ?3, ?4)",
                params![member.id, member.name, member.email, member.created_at],
            )
            .map_err(|e| {
                conflict_on_constraint(e, || {
                    format!("a member with email {} already exists", member.email)
                })
            })?;
        Ok(())
    }

    fn insert_claim(&self, claim: &Claim) -> StoreResult<()> {
        self.conn
            .execute(
                "INSERT INTO claims (id, member_id, segment_id, claimed_at) VALUES (?1, ?2, ?3, ?4)",
                params![claim.id, claim.member_id, claim.segment_id, claim.claimed_at],
            )
            .map_err(|e| {
                conflict_on_constraint(e, || "you already claimed this segment".to_string())
            })?;
        Ok(())
    }

    fn require_cycle(&self, month_key: &str) -> StoreResult<Cycle> {
        self.cycle_by_month(month_key)?
            .ok_or_else(|| StoreError::NotFound(format!("cycle {}", month_key)))
    }

    pub fn get_segment(&self, segment_id: &str) -> StoreResult<Option<StoredSegment>> {
        let segment = self
            .conn
            .query_row(
                &format!("SELECT {} FROM segments s WHERE s.id = ?1", SEGMENT_COLUMNS),
                params![segment_id],
                |row| segment_from_row(row, 0),
            )
            .optional()?;
        Ok(segment)
    }

    /// Find a segment by its position within a month's cycle
    pub fn segment_by_index(
        &self,
        month_key: &str,
        index: u32,
    ) -> StoreResult<Option<StoredSegment>> {
        let segment = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM segments s
                     JOIN cycles cy ON cy.id = s.cycle_id
                     WHERE cy.month_key = ?1 AND s.idx = ?2",
                    SEGMENT_COLUMNS
                ),
                params![month_key, index],
                |row| segment_from_row(row, 0),
            )
            .optional()?;
        Ok(segment)
    }

    /// Claim a segment for a member. Several members may claim one segment.
    pub fn claim_segment(&self, member_id: &str, segment_id: &str) -> StoreResult<Claim> {
        let member = self
            .get_member(member_id)?
            .ok_or_else(|| StoreError::NotFound(format!("member {}", member_id)))?;
        if self.get_segment(segment_id)?.is_none() {
            return Err(StoreError::NotFound(format!("segment {}", segment_id)));
        }

        let existing: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM claims WHERE member_id = ?1 AND segment_id = ?2",
                params![member_id, segment_id],
                |row| row.get(0),
            )
            .optional()?;
        if existing.is_some() {
            return Err(StoreError::Conflict(
                "you already claimed this segment".to_string(),
            ));
        }

        let claim = Claim {
            id: Uuid::new_v4().to_string(),
            member_id: member.id,
            member_name: member.name,
            segment_id: segment_id.to_string(),
            claimed_at: Utc::now().to_rfc3339(),
            completed_at: None,
        };
        self.insert_claim(&claim)?;

        debug!(claim_id = %claim.id, segment_id, "segment claimed");
        Ok(claim)
    }

    /// Mark a member's own claim as read
    pub fn complete_claim(&self, member_id: &str, claim_id: &str) -> StoreResult<Claim> {
        let mut claim = self
            .get_claim(claim_id)?
            .ok_or_else(|| StoreError::NotFound(format!("claim {}", claim_id)))?;

        if claim.member_id != member_id {
            return Err(StoreError::Forbidden("not your claim".to_string()));
        }
        if claim.is_complete() {
            return Err(StoreError::Conflict("already completed".to_string()));
        }

        let completed_at = Utc::now().to_rfc3339();
        self.conn.execute(
            "UPDATE claims SET completed_at = ?1 WHERE id = ?2",
            params![completed_at, claim_id],
        )?;
        claim.completed_at = Some(completed_at);

        debug!(claim_id, "claim completed");
        Ok(claim)
    }

    pub fn get_claim(&self, claim_id: &str) -> StoreResult<Option<Claim>> {
        let claim = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM claims c JOIN members m ON m.id = c.member_id WHERE c.id = ?1",
                    CLAIM_COLUMNS
                ),
                params![claim_id],
                |row| claim_from_row(row, 0),
            )
            .optional()?;
        Ok(claim)
    }

    /// A member's claims in a month, ordered by segment index
    pub fn member_claims(
        &self,
        member_id: &str,
        month_key: &str,
    ) -> StoreResult<Vec<ClaimedSegment>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}, {} FROM claims c
             JOIN members m ON m.id = c.member_id
             JOIN segments s ON s.id = c.segment_id
             JOIN cycles cy ON cy.id = s.cycle_id
             WHERE c.member_id = ?1 AND cy.month_key = ?2
             ORDER BY s.idx",
            CLAIM_COLUMNS, SEGMENT_COLUMNS
        ))?;
        let claims = stmt
            .query_map(params![member_id, month_key], |row| {
                Ok(ClaimedSegment {
                    claim: claim_from_row(row, 0)?,
                    segment: segment_from_row(row, 6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(claims)
    }

    /// Every unfinished claim of a month, with member and segment
    pub fn incomplete_claims(&self, month_key: &str) -> StoreResult<Vec<OpenClaim>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {}, {}, m.email, m.created_at FROM claims c
             JOIN members m ON m.id = c.member_id
             JOIN segments s ON s.id = c.segment_id
             JOIN cycles cy ON cy.id = s.cycle_id
             WHERE cy.month_key = ?1 AND c.completed_at IS NULL
             ORDER BY c.claimed_at, c.id",
            CLAIM_COLUMNS, SEGMENT_COLUMNS
        ))?;
        let claims = stmt
            .query_map(params![month_key], |row| {
                let claim = claim_from_row(row, 0)?;
                let segment = segment_from_row(row, 6)?;
                let member = Member {
                    id: claim.member_id.clone(),
                    name: claim.member_name.clone(),
                    email: row.get(13)?,
                    created_at: row.get(14)?,
                };
                Ok(OpenClaim {
                    member,
                    claim,
                    segment,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(claims)
    }

    /// Claimed and completed segment counts for a month
    pub fn cycle_progress(&self, month_key: &str) -> StoreResult<Option<CycleProgress>> {
        let progress = self
            .conn
            .query_row(
                "SELECT
                    (SELECT COUNT(*) FROM segments s WHERE s.cycle_id = cy.id),
                    (SELECT COUNT(DISTINCT c.segment_id) FROM claims c
                        JOIN segments s ON s.id = c.segment_id
                        WHERE s.cycle_id = cy.id),
                    (SELECT COUNT(DISTINCT c.segment_id) FROM claims c
                        JOIN segments s ON s.id = c.segment_id
                        WHERE s.cycle_id = cy.id AND c.completed_at IS NOT NULL)
                 FROM cycles cy WHERE cy.month_key = ?1",
                params![month_key],
                |row| {
                    Ok(CycleProgress {
                        month_key: month_key.to_string(),
                        segment_count: row.get(0)?,
                        claimed_segments: row.get(1)?,
                        completed_segments: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(progress)
    }
}

fn cycle_id_for_month(tx: &Transaction<'_>, month_key: &str) -> StoreResult<Option<String>> {
    let id = tx
        .query_row(
            "SELECT id FROM cycles WHERE month_key = ?1",
            params![month_key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(id)
}

fn insert_cycle(tx: &Transaction<'_>, plan: &CyclePlan) -> StoreResult<String> {
    let cycle_id = Uuid::new_v4().to_string();
    tx.execute(
        "INSERT INTO cycles (id, month_key, fingerprint, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            cycle_id,
            plan.month_key,
            plan.fingerprint,
            Utc::now().to_rfc3339()
        ],
    )?;

    let mut stmt = tx.prepare(
        "INSERT INTO segments (id, cycle_id, idx, start_page, end_page, surah_span_json, juz_span_json)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;
    for planned in &plan.segments {
        stmt.execute(params![
            Uuid::new_v4().to_string(),
            cycle_id,
            planned.segment.index,
            planned.segment.start_page,
            planned.segment.end_page,
            serde_json::to_string(&planned.chapters)?,
            serde_json::to_string(&planned.sub_divisions)?,
        ])?;
    }

    Ok(cycle_id)
}

/// A UNIQUE clash that slipped past the duplicate check is still a conflict
fn conflict_on_constraint(err: rusqlite::Error, message: impl FnOnce() -> String) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            StoreError::Conflict(message())
        }
        other => StoreError::Sqlite(other),
    }
}

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Reads the seven `SEGMENT_COLUMNS` starting at `offset`
fn segment_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<StoredSegment> {
    Ok(StoredSegment {
        id: row.get(offset)?,
        cycle_id: row.get(offset + 1)?,
        index: row.get(offset + 2)?,
        start_page: row.get(offset + 3)?,
        end_page: row.get(offset + 4)?,
        chapters: json_column(row, offset + 5)?,
        sub_divisions: json_column(row, offset + 6)?,
    })
}

/// Reads the six `CLAIM_COLUMNS` starting at `offset`
fn claim_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Claim> {
    Ok(Claim {
        id: row.get(offset)?,
        member_id: row.get(offset + 1)?,
        member_name: row.get(offset + 2)?,
        segment_id: row.get(offset + 3)?,
        claimed_at: row.get(offset + 4)?,
        completed_at: row.get(offset + 5)?,
    })
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}
