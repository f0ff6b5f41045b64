//! studywrapped - Study Year in Review CLI
//!
//! Generate Spotify Wrapped-style summaries of a student's year on the
//! exam-prep platform.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;

use studywrapped_core::qbank::QBankClient;
use studywrapped_core::stats::{demo_statistics, generate_recap, RandomSelector};
use studywrapped_core::types::ConsolidatedStatistics;
use studywrapped_core::{decode_token, Config, StudyStore};

const TOKEN_ENV: &str = "STUDYWRAPPED_TOKEN";

#[derive(Parser, Debug)]
#[command(name = "studywrapped")]
#[command(about = "Study Wrapped - Your Year in Review")]
#[command(version)]
struct Args {
    /// Bearer token for the reports API (or set STUDYWRAPPED_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Year to generate the recap for (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Print fixed demo statistics instead of querying real sources
    #[arg(long)]
    demo: bool,

    /// Export format (json)
    #[arg(long)]
    export: Option<String>,

    /// Path to the activity store (default: per-user data directory)
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Keep the user-visible failure surface to its two classes
            let message = match err.downcast_ref::<studywrapped_core::Error>() {
                Some(core_err) => core_err.user_message().to_string(),
                None => format!("{:#}", err),
            };
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = studywrapped_core::logging::init(&config.logging).ok();

    // Precedence: flag, then config, then the current year
    let year = args.year.unwrap_or_else(|| {
        if config.stats.year > 0 {
            config.stats.year
        } else {
            chrono::Utc::now().year()
        }
    });

    let stats = if args.demo {
        demo_statistics(year)
    } else {
        let token = args
            .token
            .or_else(|| std::env::var(TOKEN_ENV).ok())
            .context("no token provided (use --token or STUDYWRAPPED_TOKEN)")?;
        let identity = decode_token(&token)?;
        let client = QBankClient::new(&config.api, &token, year)?;

        // A store that cannot be opened is the degraded path, not fatal
        let db_path = args.db.unwrap_or_else(Config::store_path);
        let store = match StudyStore::open(&db_path) {
            Ok(store) => match store.migrate() {
                Ok(()) => Some(store),
                Err(err) => {
                    tracing::warn!(error = %err, "store migration failed, continuing without it");
                    None
                }
            },
            Err(err) => {
                tracing::warn!(path = %db_path.display(), error = %err, "could not open store");
                None
            }
        };

        generate_recap(
            &client,
            store.as_ref(),
            &config.stats,
            identity.id,
            year,
            &mut RandomSelector,
        )
        .await?
    };

    match args.export.as_deref() {
        Some("json") => print_json(&stats)?,
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'json'", other),
        None => print_terminal(&stats),
    }

    Ok(())
}

fn print_terminal(stats: &ConsolidatedStatistics) {
    let title = format!("🎉 YOUR {} STUDY WRAPPED 🎉", stats.year);

    // Header
    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if stats.questions.total == 0 && stats.flashcards.total == 0 && stats.videos.watched == 0 {
        println!("  No activity found for this year.");
        println!();
        return;
    }

    if stats.degraded {
        println!("  ⚠ Some sources were unavailable; parts of this recap show zeros.");
        println!();
    }

    println!("📊 THE NUMBERS");
    println!(
        "   Questions:  {:<10} Correct: {} ({:.1}%)",
        stats.questions.total, stats.questions.correct, stats.questions.accuracy_rate
    );
    println!(
        "   Flashcards: {:<10} Videos: {} ({} finished)",
        stats.flashcards.total, stats.videos.watched, stats.videos.finished
    );
    println!(
        "   Study time: {:.1}h total, {:.2}h per active day",
        stats.study_time.total_hours, stats.study_time.average_hours_per_day
    );
    println!();

    let dist = &stats.flashcards.score_distribution;
    if dist.total() > 0 {
        println!("🧠 FLASHCARD SCORES");
        println!(
            "   Easy: {}  Good: {}  Hard: {}  Forgot: {}",
            dist.easy, dist.good, dist.hard, dist.forgot
        );
        println!();
    }

    if !stats.top_specialties.is_empty() {
        println!("🏆 TOP SPECIALTIES");
        for specialty in &stats.top_specialties {
            let rank = match specialty.rank {
                1 => "🥇".to_string(),
                2 => "🥈".to_string(),
                3 => "🥉".to_string(),
                n => format!("{}.", n),
            };
            println!("   {} {:<24} {}", rank, specialty.title, specialty.value);
        }
        println!();
    }

    println!("🔥 CONSISTENCY");
    println!(
        "   Longest streak: {} day{}",
        stats.best_streak,
        if stats.best_streak == 1 { "" } else { "s" }
    );
    println!("   Days studied:   {}", stats.total_days_studied);
    if let Some(record) = &stats.daily_record {
        println!(
            "   Biggest day:    {} activities on {}",
            record.count, record.date
        );
    }
    if let Some(month) = &stats.best_month {
        println!("   Best month:     {} ({} activities)", month.name, month.count);
    }
    println!("   Peak hour:      {}h", stats.peak_study_hour);
    println!();

    if let Some(peak) = &stats.videos.peak_day {
        println!("🎬 VIDEO MARATHON");
        println!("   {:.1} hours of lessons on {}", peak.hours, peak.date);
        println!();
    }

    println!("🎭 YOUR PERSONALITY: {}", stats.personality.archetype);
    println!("   \"{}\"", stats.personality.description);
    println!();
    println!("✨ {}", stats.fun_fact);
    println!();
}

fn print_json(stats: &ConsolidatedStatistics) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(stats)?);
    Ok(())
}
