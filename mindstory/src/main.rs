//! mindstory-date - render MindStory relative date labels
//!
//! Labels each timestamp the way entry, challenge and feed views show it:
//! "Today", "Yesterday", "N days ago" or a long-form date.

use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use mindstory_core::config::parse_utc_offset;
use mindstory_core::{parse_timestamp, Config, DateLabelOverrides, RelativeDateFormatter};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "mindstory-date")]
#[command(about = "Render relative date labels for timestamps")]
#[command(version)]
struct Args {
    /// Timestamps to label; read one per line from stdin when omitted
    timestamps: Vec<String>,

    /// Reference instant to measure against (default: now)
    #[arg(long)]
    now: Option<String>,

    /// Label for timestamps less than a day away
    #[arg(long)]
    today: Option<String>,

    /// Label for timestamps one to two days away
    #[arg(long)]
    yesterday: Option<String>,

    /// Suffix for "N days ago"
    #[arg(long)]
    days_ago: Option<String>,

    /// UTC offset for long-form dates, e.g. +02:00
    #[arg(long, allow_hyphen_values = true)]
    utc_offset: Option<String>,

    /// Print this label for invalid timestamps instead of failing
    #[arg(long)]
    placeholder: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Config file (default: ~/.config/mindstory/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// One labeled input, as emitted by `--format json`.
#[derive(Debug, Serialize)]
struct LabelRecord {
    input: String,
    label: Option<String>,
    error: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;

    // Initialize logging (to file; stdout carries the labels)
    let _log_guard = mindstory_core::logging::init(&config.logging).ok();

    // Flags take precedence over the config file
    let offset = match &args.utc_offset {
        Some(value) => parse_utc_offset(value)?,
        None => config.display.offset()?,
    };
    let overrides = DateLabelOverrides {
        today: args.today.clone(),
        yesterday: args.yesterday.clone(),
        days_ago: args.days_ago.clone(),
    };
    let formatter = RelativeDateFormatter::new(config.labels.clone().with_overrides(&overrides))
        .with_offset(offset);

    // Reference instant
    let reference = match &args.now {
        Some(now) => parse_timestamp(now, offset).context("invalid --now")?,
        None => Utc::now(),
    };
    let placeholder = args.placeholder.clone().or(config.display.placeholder.clone());

    let inputs = if args.timestamps.is_empty() {
        read_stdin()?
    } else {
        args.timestamps.clone()
    };
    tracing::info!(count = inputs.len(), %reference, "Labeling timestamps");

    // Label everything before printing so text output is all-or-nothing
    let records = label_all(&formatter, &inputs, reference, placeholder.as_deref());
    let first_invalid = records
        .iter()
        .find(|r| r.label.is_none())
        .map(|r| r.input.clone());

    match args.format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Text => {
            if first_invalid.is_none() {
                print_text(&records);
            }
        }
    }

    if let Some(input) = first_invalid {
        anyhow::bail!("invalid timestamp: {:?}", input);
    }
    Ok(())
}

fn read_stdin() -> Result<Vec<String>> {
    let mut inputs = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read stdin")?;
        if !line.trim().is_empty() {
            inputs.push(line);
        }
    }
    Ok(inputs)
}

fn label_all(
    formatter: &RelativeDateFormatter,
    inputs: &[String],
    reference: DateTime<Utc>,
    placeholder: Option<&str>,
) -> Vec<LabelRecord> {
    inputs
        .iter()
        .map(|input| match formatter.format_at(input, reference) {
            Ok(label) => LabelRecord {
                input: input.clone(),
                label: Some(label),
                error: None,
            },
            Err(e) => {
                tracing::warn!(error = %e, "Skipping invalid timestamp");
                LabelRecord {
                    input: input.clone(),
                    label: placeholder.map(str::to_string),
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

fn print_text(records: &[LabelRecord]) {
    for record in records {
        if let Some(label) = &record.label {
            println!("{}", label);
        }
    }
}

fn print_json(records: &[LabelRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("failed to serialize labels")?;
    println!("{}", json);
    Ok(())
}
