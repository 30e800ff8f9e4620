use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

use khatm::cycle::parse_month_key;
use khatm::db::{ClaimedSegment, Cycle};
use khatm::reminder::{segment_line, REMINDER_SUBJECT};
use khatm::{
    build_digests, current_month_key, is_reminder_day, juzs, partition, surahs, telemetry,
    units_overlapping, CycleDB, CyclePlan, PageUnit, Settings,
};

#[derive(Parser)]
#[command(name = "khatm", version, about = "Plan and track a shared monthly Mushaf reading")]
struct Cli {
    /// SQLite database holding cycles, members and claims
    #[arg(long, global = true, default_value = "khatm.sqlite")]
    db: String,

    /// JSON settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: SettingsOverrides,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SettingsOverrides {
    #[arg(long, global = true)]
    segments_per_month: Option<u32>,

    #[arg(long, global = true)]
    reminder_interval_days: Option<u32>,

    #[arg(long, global = true)]
    app_url: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Split a page count into near-equal segments
    Partition { total_pages: u32, segments: u32 },

    /// List the surahs and juz a page range touches
    Lookup {
        start_page: u32,
        end_page: u32,
        /// Language for surah names (en, de, or ar for the Arabic name)
        #[arg(long, default_value = "en")]
        lang: String,
    },

    /// Manage monthly cycles
    Cycle {
        #[command(subcommand)]
        action: CycleAction,
    },

    /// Manage members
    Member {
        #[command(subcommand)]
        action: MemberAction,
    },

    /// Claim a segment of a cycle
    Claim {
        email: String,
        index: u32,
        #[arg(long)]
        month: Option<String>,
    },

    /// Mark a claimed segment as read
    Complete {
        email: String,
        index: u32,
        #[arg(long)]
        month: Option<String>,
    },

    /// Show a member's claims
    Mine {
        email: String,
        #[arg(long)]
        month: Option<String>,
    },

    /// Print reminder digests for incomplete claims
    Reminders {
        #[arg(long)]
        month: Option<String>,
        /// Ignore the reminder interval and produce digests today
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
enum CycleAction {
    /// Compute a cycle without storing it
    Plan {
        #[arg(long)]
        month: Option<String>,
    },
    /// Create the month's cycle if it does not exist yet
    Generate {
        #[arg(long)]
        month: Option<String>,
    },
    /// Replace the month's cycle, dropping all claims
    Regenerate {
        #[arg(long)]
        month: Option<String>,
    },
    /// Show a stored cycle with its claims
    Show {
        #[arg(long)]
        month: Option<String>,
    },
    /// Progress counts and layout check for a stored cycle
    Status {
        #[arg(long)]
        month: Option<String>,
    },
}

#[derive(Subcommand)]
enum MemberAction {
    Add { name: String, email: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing(cli.verbose)?;
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Partition {
            total_pages,
            segments,
        } => {
            let segments = partition(*total_pages, *segments)?;
            if cli.json {
                return print_json(&segments);
            }
            for s in &segments {
                println!(
                    "#{:<3} pages {:>4}–{:<4} ({} pages)",
                    s.index,
                    s.start_page,
                    s.end_page,
                    s.size()
                );
            }
        }

        Command::Lookup {
            start_page,
            end_page,
            lang,
        } => {
            let found_surahs = units_overlapping(surahs(), *start_page, *end_page)?;
            let found_juzs = units_overlapping(juzs(), *start_page, *end_page)?;
            if cli.json {
                #[derive(Serialize)]
                struct Lookup<'a> {
                    surahs: Vec<&'a khatm::StructuralUnit>,
                    juzs: Vec<&'a khatm::SubDivisionUnit>,
                }
                return print_json(&Lookup {
                    surahs: found_surahs,
                    juzs: found_juzs,
                });
            }
            println!("Pages {}–{}", start_page, end_page);
            for surah in found_surahs {
                let name = if lang == "ar" {
                    surah.names.primary.as_str()
                } else {
                    surah.names.get(lang)
                };
                println!("  Surah {:>3}  {}", surah.ordinal(), name);
            }
            let juz_list = found_juzs
                .iter()
                .map(|j| j.ordinal().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            println!("  Juz {}", juz_list);
        }

        Command::Cycle { action } => run_cycle(cli, action)?,

        Command::Member {
            action: MemberAction::Add { name, email },
        } => {
            let db = open_db(cli)?;
            let member = db.add_member(name, email)?;
            if cli.json {
                return print_json(&member);
            }
            println!("Added {} <{}> ({})", member.name, member.email, member.id);
        }

        Command::Claim {
            email,
            index,
            month,
        } => {
            let month = resolve_month(month.as_deref())?;
            let db = open_db(cli)?;
            let member = db
                .member_by_email(email)?
                .with_context(|| format!("No member with email {}", email))?;
            let segment = db
                .segment_by_index(&month, *index)?
                .with_context(|| format!("Cycle {} has no segment #{}", month, index))?;
            let claim = db.claim_segment(&member.id, &segment.id)?;
            if cli.json {
                return print_json(&claim);
            }
            println!("Claimed #{} {}", segment.index, segment_line(&segment));
        }

        Command::Complete {
            email,
            index,
            month,
        } => {
            let month = resolve_month(month.as_deref())?;
            let db = open_db(cli)?;
            let member = db
                .member_by_email(email)?
                .with_context(|| format!("No member with email {}", email))?;
            let claimed = db
                .member_claims(&member.id, &month)?
                .into_iter()
                .find(|c| c.segment.index == *index)
                .with_context(|| format!("{} has not claimed #{} in {}", email, index, month))?;
            let claim = db.complete_claim(&member.id, &claimed.claim.id)?;
            if cli.json {
                return print_json(&claim);
            }
            println!(
                "Completed #{} {}",
                claimed.segment.index,
                segment_line(&claimed.segment)
            );
        }

        Command::Mine { email, month } => {
            let month = resolve_month(month.as_deref())?;
            let db = open_db(cli)?;
            let member = db
                .member_by_email(email)?
                .with_context(|| format!("No member with email {}", email))?;
            let claims = db.member_claims(&member.id, &month)?;
            if cli.json {
                return print_json(&claims);
            }
            print_member_claims(&month, &claims);
        }

        Command::Reminders { month, force } => {
            let settings = load_settings(cli)?;
            let month = resolve_month(month.as_deref())?;
            let today = Utc::now().day();
            if !force && !is_reminder_day(today, settings.reminder_interval_days) {
                info!(
                    day = today,
                    interval = settings.reminder_interval_days,
                    "not a reminder day"
                );
                return Ok(());
            }

            let db = open_db(cli)?;
            let digests = build_digests(db.incomplete_claims(&month)?);
            info!(count = digests.len(), month = %month, "reminder digests built");
            if cli.json {
                return print_json(&digests);
            }
            for digest in &digests {
                println!("To: {} <{}>", digest.member.name, digest.member.email);
                println!("Subject: {}\n", REMINDER_SUBJECT);
                println!("{}", digest.render(&settings.app_url));
            }
        }
    }

    Ok(())
}

fn run_cycle(cli: &Cli, action: &CycleAction) -> Result<()> {
    match action {
        CycleAction::Plan { month } => {
            let plan = build_plan(&load_settings(cli)?, month.as_deref())?;
            if cli.json {
                return print_json(&plan);
            }
            println!("Cycle {} (layout {})", plan.month_key, &plan.fingerprint[..12]);
            for planned in &plan.segments {
                let s = &planned.segment;
                let names = planned
                    .chapters
                    .iter()
                    .map(|c| c.name_en.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                println!("#{:<3} pages {:>4}–{:<4} {}", s.index, s.start_page, s.end_page, names);
            }
        }

        CycleAction::Generate { month } => {
            let plan = build_plan(&load_settings(cli)?, month.as_deref())?;
            let db = open_db(cli)?;
            let (cycle, created) = db.ensure_cycle(&plan)?;
            if !created {
                warn!(month = %cycle.month_key, "cycle already exists, leaving it untouched");
            }
            if cli.json {
                return print_json(&cycle);
            }
            print_cycle(&cycle);
        }

        CycleAction::Regenerate { month } => {
            let plan = build_plan(&load_settings(cli)?, month.as_deref())?;
            let db = open_db(cli)?;
            let cycle = db.regenerate_cycle(&plan)?;
            if cli.json {
                return print_json(&cycle);
            }
            print_cycle(&cycle);
        }

        CycleAction::Show { month } => {
            let month = resolve_month(month.as_deref())?;
            let db = open_db(cli)?;
            let cycle = db
                .cycle_by_month(&month)?
                .with_context(|| format!("No cycle found for {}", month))?;
            if cli.json {
                return print_json(&cycle);
            }
            print_cycle(&cycle);
        }

        CycleAction::Status { month } => {
            let month = resolve_month(month.as_deref())?;
            let db = open_db(cli)?;
            let cycle = db
                .cycle_by_month(&month)?
                .with_context(|| format!("No cycle found for {}", month))?;
            let progress = db
                .cycle_progress(&month)?
                .with_context(|| format!("No cycle found for {}", month))?;
            let plan = build_plan(&load_settings(cli)?, Some(&month))?;
            let layout_current = plan.fingerprint == cycle.fingerprint;

            if cli.json {
                #[derive(Serialize)]
                struct Status<'a> {
                    #[serde(flatten)]
                    progress: &'a khatm::db::CycleProgress,
                    layout_current: bool,
                }
                return print_json(&Status {
                    progress: &progress,
                    layout_current,
                });
            }
            println!("Cycle {}", progress.month_key);
            println!("  Segments:  {}", progress.segment_count);
            println!("  Claimed:   {}", progress.claimed_segments);
            println!("  Completed: {}", progress.completed_segments);
            if !layout_current {
                println!("  Settings now produce different segment boundaries;");
                println!("  run `khatm cycle regenerate` to apply them (drops claims).");
            }
        }
    }

    Ok(())
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = Settings::load_or_default(cli.config.as_deref())?;
    if let Some(n) = cli.overrides.segments_per_month {
        settings.segments_per_month = n;
    }
    if let Some(days) = cli.overrides.reminder_interval_days {
        settings.reminder_interval_days = days;
    }
    if let Some(url) = &cli.overrides.app_url {
        settings.app_url = url.clone();
    }
    settings.validate().context("Invalid settings")?;
    Ok(settings)
}

fn open_db(cli: &Cli) -> Result<CycleDB> {
    CycleDB::open(&cli.db).with_context(|| format!("Failed to open database at {}", cli.db))
}

fn resolve_month(month: Option<&str>) -> Result<String> {
    let month = month.map(str::to_string).unwrap_or_else(current_month_key);
    parse_month_key(&month)?;
    Ok(month)
}

fn build_plan(settings: &Settings, month: Option<&str>) -> Result<CyclePlan> {
    let month = resolve_month(month)?;
    let plan = CyclePlan::build(month, settings, surahs(), juzs())?;
    Ok(plan)
}

fn print_cycle(cycle: &Cycle) {
    println!("Cycle {} ({} segments)", cycle.month_key, cycle.segments.len());
    for entry in &cycle.segments {
        let readers = entry
            .claims
            .iter()
            .map(|c| {
                if c.is_complete() {
                    format!("{} ✓", c.member_name)
                } else {
                    c.member_name.clone()
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        println!(
            "#{:<3} {}{}",
            entry.segment.index,
            segment_line(&entry.segment),
            if readers.is_empty() {
                String::new()
            } else {
                format!("  [{}]", readers)
            }
        );
    }
}

fn print_member_claims(month: &str, claims: &[ClaimedSegment]) {
    if claims.is_empty() {
        println!("No claims in {}", month);
        return;
    }
    for claimed in claims {
        let status = if claimed.claim.is_complete() { "done" } else { "open" };
        println!(
            "#{:<3} [{}] {}",
            claimed.segment.index,
            status,
            segment_line(&claimed.segment)
        );
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn bad_config() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"segments_per_month": 0}}"#).unwrap();
        file
    }

    fn cli(config: &NamedTempFile, args: &[&str]) -> Cli {
        let path = config.path().to_str().unwrap();
        let mut argv = vec!["khatm", "--config", path];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_bad_config_does_not_block_engine_commands() {
        let config = bad_config();

        assert!(run(&cli(&config, &["partition", "604", "30"])).is_ok());
        assert!(run(&cli(&config, &["lookup", "1", "21"])).is_ok());
    }

    #[test]
    fn test_bad_config_rejected_where_settings_are_read() {
        let config = bad_config();

        let err = run(&cli(&config, &["cycle", "plan", "--month", "2026-10"])).unwrap_err();
        assert!(err.to_string().contains("Invalid settings"));

        let result = run(&cli(&config, &["reminders", "--force", "--month", "2026-10"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_fix_bad_config() {
        let config = bad_config();
        let cli = cli(&config, &["--segments-per-month", "60", "cycle", "plan"]);

        let settings = load_settings(&cli).unwrap();
        assert_eq!(settings.segments_per_month, 60);
    }
}
