//! Output formatting: table, cards, JSON, YAML, plain.
//!
//! Renders records in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one name per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};

use holocron_core::{ListingState, Record};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

fn label(text: &str, color: bool) -> String {
    if color {
        text.bright_yellow().bold().to_string()
    } else {
        text.to_owned()
    }
}

fn dim(text: &str, color: bool) -> String {
    if color {
        text.dimmed().to_string()
    } else {
        text.to_owned()
    }
}

// ── Table row ────────────────────────────────────────────────────────

#[derive(Tabled)]
pub struct CharacterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Height")]
    height: String,
    #[tabled(rename = "Mass")]
    mass: String,
    #[tabled(rename = "Birth Year")]
    birth_year: String,
    #[tabled(rename = "Gender")]
    gender: String,
    #[tabled(rename = "Eyes")]
    eye_color: String,
}

impl From<&Record> for CharacterRow {
    fn from(r: &Record) -> Self {
        Self {
            id: r.uid().unwrap_or_default().to_owned(),
            name: r.name.clone(),
            height: r.height.clone(),
            mass: r.mass.clone(),
            birth_year: r.birth_year.clone(),
            gender: r.gender.clone(),
            eye_color: r.eye_color.clone(),
        }
    }
}

/// Multi-line card for a single record.
pub fn character_card(r: &Record, color: bool) -> String {
    let fields = [
        ("Height", r.height.as_str()),
        ("Mass", r.mass.as_str()),
        ("Hair", r.hair_color.as_str()),
        ("Skin", r.skin_color.as_str()),
        ("Eyes", r.eye_color.as_str()),
        ("Born", r.birth_year.as_str()),
        ("Gender", r.gender.as_str()),
        ("Homeworld", r.homeworld.as_str()),
    ];

    let mut lines = vec![format!(
        "{} {}",
        label(&r.name, color),
        dim(&format!("#{}", r.uid().unwrap_or("?")), color)
    )];
    lines.extend(
        fields
            .iter()
            .map(|(name, value)| format!("  {:<10} {value}", format!("{name}:"))),
    );
    lines.push(dim(
        &format!("  edited {}", r.edited.format("%Y-%m-%d %H:%M UTC")),
        color,
    ));
    lines.join("\n")
}

/// One-line paging summary shown under a listing.
pub fn page_footer(state: &ListingState, color: bool) -> String {
    let mut parts = vec![format!(
        "page {} of {}",
        state.page,
        state.total_pages().max(1)
    )];
    parts.push(format!("{} records", state.count));
    if let Some(ref sort) = state.sort {
        parts.push(format!("sorted by {sort}"));
    }
    if !state.search.is_empty() {
        parts.push(format!("matching '{}'", state.search));
    }
    dim(&parts.join(" · "), color)
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render records in the chosen format. `cards` swaps the table for one
/// card per record.
pub fn render_records(
    format: OutputFormat,
    records: &[Record],
    cards: bool,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table if cards => Ok(records
            .iter()
            .map(|r| character_card(r, color))
            .collect::<Vec<_>>()
            .join("\n\n")),
        _ => render_list(format, records, |r| CharacterRow::from(r), |r| r.name.clone()),
    }
}

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single items are shown as a card.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: serde::Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}
