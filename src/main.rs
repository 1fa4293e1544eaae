use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use rdbstat::{AnalysisError, AnalysisResult, Analyzer, DecodeError, ExpireBucket, Record, RecordKind};

#[derive(Parser, Debug)]
#[command(name = "rdbstat", about = "Aggregate statistics over decoded RDB key dumps")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print totals, type breakdown, and the expiration histogram.
    Summary {
        /// Decoded record file (tab-separated: db, key, type, size,
        /// elements, optional expire unix seconds).
        file: PathBuf,
    },
    /// Print the largest keys and key-name prefixes.
    Top {
        /// Decoded record file.
        file: PathBuf,
        /// How many entries of each ranking to show.
        #[arg(long, short = 'n', default_value_t = 20)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Summary { file } => {
            let result = analyze_file(&file)?;
            print_summary(result);
        }
        Commands::Top { file, limit } => {
            let result = analyze_file(&file)?;
            print_rankings(result, limit);
        }
    }
    Ok(())
}

/// Open a decoded-record file and run one analysis pass over it.
///
/// This is the stand-in for the external dump decoder: the library itself
/// never touches the filesystem.
fn analyze_file(path: &Path) -> Result<AnalysisResult> {
    let source_id = path.display().to_string();
    let file = File::open(path).map_err(|source| AnalysisError::SourceUnavailable {
        path: source_id.clone(),
        source,
    })?;
    let reader = BufReader::new(file);

    let records = reader.lines().enumerate().filter_map(|(number, line)| {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                return Some(Err(DecodeError::new(format!(
                    "line {}: {err}",
                    number + 1
                ))))
            }
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }
        Some(parse_line(trimmed).map_err(|reason| {
            DecodeError::new(format!("line {}: {reason}", number + 1))
        }))
    });

    let mut analyzer = Analyzer::new();
    // The store owns the result; clone it out for printing.
    let result = analyzer
        .analyze_source(&source_id, records)
        .with_context(|| format!("analyzing {source_id}"))?
        .clone();
    Ok(result)
}

/// Parse one tab-separated record line:
/// `db <TAB> key <TAB> type <TAB> size <TAB> elements [<TAB> expire-unix-secs]`.
fn parse_line(line: &str) -> Result<Record, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if !(5..=6).contains(&fields.len()) {
        return Err(format!("expected 5 or 6 fields, got {}", fields.len()));
    }
    let db = fields[0]
        .parse::<u64>()
        .map_err(|_| format!("bad db index {:?}", fields[0]))?;
    let size = fields[3]
        .parse::<u64>()
        .map_err(|_| format!("bad size {:?}", fields[3]))?;
    let elements = fields[4]
        .parse::<u64>()
        .map_err(|_| format!("bad element count {:?}", fields[4]))?;
    let expiration = match fields.get(5) {
        Some(raw) => {
            let secs = raw
                .parse::<i64>()
                .map_err(|_| format!("bad expire timestamp {raw:?}"))?;
            Some(
                Utc.timestamp_opt(secs, 0)
                    .single()
                    .ok_or_else(|| format!("expire timestamp {secs} out of range"))?,
            )
        }
        None => None,
    };
    Ok(Record {
        db,
        key: fields[1].to_string(),
        type_tag: fields[2].to_string(),
        size,
        elements,
        expiration,
    })
}

fn print_summary(result: AnalysisResult) {
    println!("source:       {}", result.source_id);
    println!(
        "total keys:   {}  ({} total memory)",
        result.total_keys, result.total_memory_readable
    );
    println!();
    println!("type breakdown:");
    for kind in RecordKind::ALL {
        let stat = result.type_stat(kind);
        println!("  {:<8} {:>10} keys  {:>12} bytes", kind, stat.count, stat.memory);
    }
    println!();
    println!("expiration histogram:");
    for bucket in ExpireBucket::ALL {
        let stat = result.expire_stat(bucket);
        println!(
            "  {:<11} {:>10} keys  {:>12} bytes",
            bucket, stat.count, stat.memory
        );
    }
}

fn print_rankings(result: AnalysisResult, limit: usize) {
    println!("largest keys:");
    for info in result.top_keys.iter().take(limit) {
        println!(
            "  db{:<3} {:<10} {:>10}  {:<40} {}",
            info.db, info.type_tag, info.readable_size, info.key, info.expire
        );
    }
    println!();
    println!("largest prefixes:");
    for info in result.top_prefixes.iter().take(limit) {
        println!(
            "  {:>10}  {:>10} elements  {}",
            info.readable_size, info.elements, info.key
        );
    }
}
