use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use chess_club_standings::batch::{run_batch, PodiumState, ProcessOptions};
use chess_club_standings::category::{process_file, ColumnLabels};
use chess_club_standings::podium::MAX_PODIUM;
use chess_club_standings::render;
use chess_club_standings::session::{record_visit, Admission, CsvAuditLog, SessionGate};
use chess_club_standings::sheet::{
    category_name, closest_header, locate_header, map_columns, read_raw_sheet,
};
use chess_club_standings::xlsx;

#[derive(Parser)]
#[command(name = "club-standings")]
#[command(about = "Combine chess category standings into club totals and a podium", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Header labels to look for in each standings sheet
#[derive(Args, Clone)]
struct LabelArgs {
    /// Rank column header
    #[arg(long, default_value = "Rank", value_parser = NonEmptyStringValueParser::new())]
    rank_label: String,

    /// Player name column header
    #[arg(long, default_value = "Name", value_parser = NonEmptyStringValueParser::new())]
    name_label: String,

    /// Club column header
    #[arg(long, default_value = "Club", value_parser = NonEmptyStringValueParser::new())]
    club_label: String,
}

impl LabelArgs {
    fn column_labels(&self) -> Result<ColumnLabels> {
        let labels = ColumnLabels {
            rank: self.rank_label.clone(),
            name: self.name_label.clone(),
            club: self.club_label.clone(),
        };
        labels.validate()?;
        Ok(labels)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Score category files and rank the clubs
    Score {
        /// Category standings files (xlsx, xls, ods or csv); the file name is the category
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Write the full report to an Excel workbook
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Your name, recorded in the audit log
        #[arg(long)]
        name: Option<String>,

        /// Your school or club, recorded in the audit log
        #[arg(long)]
        affiliation: Option<String>,

        /// Password required to run; unset means no check
        #[arg(long, env = "CLUB_STANDINGS_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Password supplied by the user
        #[arg(long, env = "CLUB_STANDINGS_SECRET", hide_env_values = true)]
        secret: Option<String>,

        /// CSV file that receives one row per admitted run
        #[arg(long, env = "CLUB_STANDINGS_AUDIT_LOG")]
        audit_log: Option<PathBuf>,

        /// Number of podium places
        #[arg(long, default_value_t = MAX_PODIUM as u8, value_parser = clap::value_parser!(u8).range(1..=5))]
        podium_size: u8,

        #[command(flatten)]
        labels: LabelArgs,
    },

    /// Display the header and column mapping found in a file
    Info {
        /// Input file to inspect
        input: PathBuf,

        #[command(flatten)]
        labels: LabelArgs,
    },

    /// Check that files can be scored, without aggregating them
    Validate {
        /// Input files to validate
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        labels: LabelArgs,
    },
}

struct ScoreArgs {
    files: Vec<PathBuf>,
    output: Option<PathBuf>,
    name: Option<String>,
    affiliation: Option<String>,
    password: Option<String>,
    secret: Option<String>,
    audit_log: Option<PathBuf>,
    options: ProcessOptions,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            files,
            output,
            name,
            affiliation,
            password,
            secret,
            audit_log,
            podium_size,
            labels,
        } => {
            score(ScoreArgs {
                files,
                output,
                name,
                affiliation,
                password,
                secret,
                audit_log,
                options: ProcessOptions {
                    labels: labels.column_labels()?,
                    podium_size: podium_size as usize,
                },
            })?;
        }
        Commands::Info { input, labels } => {
            info(&input, &labels.column_labels()?)?;
        }
        Commands::Validate { files, labels } => {
            validate(&files, &labels.column_labels()?)?;
        }
    }

    Ok(())
}

fn score(args: ScoreArgs) -> Result<()> {
    let gate = SessionGate::new(args.password);
    let session = match gate.admit(
        args.name.as_deref(),
        args.affiliation.as_deref(),
        args.secret.as_deref(),
    ) {
        Admission::Admitted(session) => session,
        Admission::Rejected => anyhow::bail!("Incorrect password"),
    };
    println!("{}", session.welcome());

    if let Some(path) = &args.audit_log {
        let mut audit = CsvAuditLog::new(path);
        if let Some(warning) = record_visit(&mut audit, &session) {
            println!("Warning: {}", warning);
        }
    }
    println!();

    let report = run_batch(&args.files, &args.options, session);

    for outcome in &report.outcomes {
        match (outcome.standings(), outcome.error()) {
            (Some(standings), _) => println!(
                "✅ {} processed ({} players)",
                standings.category,
                standings.len()
            ),
            (None, Some(error)) => println!("❌ Error reading {}: {}", outcome.path().display(), error),
            (None, None) => {}
        }
    }
    println!();

    if report.processed_count() == 0 {
        println!("No file could be processed; nothing to rank.");
        return Ok(());
    }

    for standings in report.categories() {
        println!("Category {}", standings.category);
        println!("{}", render::category_table(standings));
        println!();
    }

    println!("Club Leaderboard");
    println!("{}", render::totals_table(&report.totals));
    println!();

    match &report.podium {
        PodiumState::Full(podium) => {
            println!("Podium");
            println!("{}", render::podium_chart(podium));
        }
        PodiumState::Degraded { podium, reason } => {
            println!("Warning: {}", reason);
            if !podium.is_empty() {
                println!("Podium (partial)");
                println!("{}", render::podium_chart(podium));
            }
        }
        PodiumState::Unavailable => {}
    }

    if let Some(output) = &args.output {
        println!("Writing Excel file: {}", output.display());
        xlsx::write_report_to_xlsx(&report, output).context("Failed to write Excel file")?;
    }

    println!("Done!");
    Ok(())
}

fn info(input: &Path, labels: &ColumnLabels) -> Result<()> {
    let sheet = read_raw_sheet(input).context("Failed to read standings file")?;
    let spec = labels.header_spec();

    println!("File: {}", input.display());
    println!("Category: {}", category_name(input));
    println!("Rows: {}", sheet.len());
    println!();

    let Some(header_row) = locate_header(&sheet, &spec) else {
        match closest_header(&sheet, &spec) {
            Some(partial) => {
                println!("Header: not found (closest is row {})", partial.row + 1);
                println!("  Found: {}", partial.found.join(", "));
                println!("  Missing: {}", partial.missing.join(", "));
            }
            None => println!("Header: not found"),
        }
        return Ok(());
    };

    println!("Header: row {}", header_row + 1);
    let header = sheet.row(header_row).unwrap_or_default();
    match map_columns(header, &spec) {
        Ok(mapping) => {
            for binding in mapping.in_spec_order(&spec) {
                println!("  {} -> column {} ('{}')", binding.label, binding.column + 1, binding.name);
            }
        }
        Err(e) => println!("  Missing columns: {}", e.missing.join(", ")),
    }
    println!();

    let standings = process_file(input, labels).context("Failed to process standings file")?;
    let unranked = standings.records.iter().filter(|r| r.rank.is_none()).count();
    println!("Players: {}", standings.len());
    if unranked > 0 {
        println!("  {} without a usable rank", unranked);
    }
    println!("Points awarded: {}", standings.total_points());

    Ok(())
}

fn validate(files: &[PathBuf], labels: &ColumnLabels) -> Result<()> {
    let mut failed = 0;

    for path in files {
        match process_file(path, labels) {
            Ok(standings) => {
                println!("{} is valid", path.display());
                println!("  header on row {}", standings.header_row + 1);
                println!("  {} players", standings.len());
            }
            Err(e) => {
                failed += 1;
                println!("{} is invalid", path.display());
                println!("  {}", e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} files failed validation", failed, files.len());
    }
    Ok(())
}
