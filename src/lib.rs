use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

pub mod csv_io;
pub mod diagnostics;
pub mod dictionary;
pub mod document;
pub mod format;
pub mod logging;
pub mod settings;
pub mod substitute;
pub mod table;
pub mod unit;

pub use diagnostics::Warning;
pub use dictionary::{Lookup, LookupEntry, SplitMode, prepare_lookups};
pub use format::{ContentFormat, FormatPolicy, Translated, translate};
pub use substitute::substitute;
pub use table::{LineContent, Table, classify_line, translate_cell, translate_table};
pub use unit::{FieldUnitKind, UnitKind, translate_unit, translate_unit_nested};

#[derive(Debug, Clone)]
pub struct Config {
    pub content: String,
    pub dictionary: String,
    pub format: Option<String>,
    pub autosplit: Option<bool>,
    pub escape_chars: Option<String>,
    pub quote_char: Option<String>,
    pub encoding: Option<String>,
    pub output: Option<String>,
    pub settings_path: Option<String>,
}

/// What the content file holds, decided by extension.
enum ContentKind {
    Table,
    Document,
    Fragment,
}

pub fn run(config: Config) -> Result<String> {
    let settings = settings::load_settings(config.settings_path.as_deref().map(Path::new))?;

    let format: ContentFormat = config
        .format
        .as_deref()
        .unwrap_or(&settings.format)
        .parse()?;
    let encoding: csv_io::OutputEncoding = config
        .encoding
        .as_deref()
        .unwrap_or(&settings.encoding)
        .parse()?;
    let autosplit = config.autosplit.unwrap_or(settings.autosplit);
    let chars_to_escape =
        parse_escape_chars(config.escape_chars.as_deref().unwrap_or(&settings.escape_chars));
    let quote_char = parse_quote_char(config.quote_char.as_deref().unwrap_or(&settings.quote_char));

    let content_path = Path::new(&config.content);
    let dictionary = csv_io::read_table(Path::new(&config.dictionary))?;
    if dictionary.is_empty() {
        return Err(anyhow!("dictionary is empty"));
    }

    let policy = FormatPolicy::new(format, &dictionary, autosplit, chars_to_escape);
    debug!(
        "translating {} with a {}-column dictionary",
        content_path.display(),
        dictionary[0].len()
    );

    let (outputs, warnings) = match content_kind(content_path, format) {
        ContentKind::Table => {
            let content = csv_io::read_table(content_path)?;
            let translated = format::translate(&content, &dictionary, &policy);
            let outputs = translated
                .tables
                .iter()
                .map(|table| csv_io::write_table(table, quote_char))
                .collect::<Result<Vec<_>>>()?;
            (outputs, translated.warnings)
        }
        ContentKind::Document => {
            let content = read_content(content_path)?;
            let translated = document::translate_document(&content, &dictionary, &policy)?;
            (translated.documents, translated.warnings)
        }
        ContentKind::Fragment => {
            // A lone fragment (e.g. an HTML file) is a one-cell table whose
            // translated cell is written back out verbatim.
            let content = read_content(content_path)?;
            let translated = format::translate(&[vec![content]], &dictionary, &policy);
            let outputs = translated
                .tables
                .iter()
                .map(|table| {
                    table
                        .first()
                        .and_then(|row| row.first())
                        .cloned()
                        .unwrap_or_default()
                })
                .collect();
            (outputs, translated.warnings)
        }
    };

    let encoded: Vec<Vec<u8>> = outputs
        .iter()
        .map(|data| csv_io::encode_output(data, encoding))
        .collect();
    let written = csv_io::write_outputs(
        &encoded,
        content_path,
        config.output.as_deref().map(Path::new),
    )?;

    Ok(summary(&written, outputs.len(), &warnings))
}

fn read_content(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read content: {}", path.display()))
}

fn content_kind(path: &Path, format: ContentFormat) -> ContentKind {
    let extension = path
        .extension()
        .and_then(|extension| extension.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "csv" => ContentKind::Table,
        "json" if format == ContentFormat::CraftCms => ContentKind::Document,
        _ => ContentKind::Fragment,
    }
}

/// The escape set arrives as one string split on `|`, falling back to the
/// full-width `｜` when no ASCII pipe is present; only single-character
/// items count.
fn parse_escape_chars(value: &str) -> Vec<char> {
    let trimmed = value.trim();
    let mut items: Vec<&str> = trimmed.split('|').filter(|item| !item.is_empty()).collect();
    if items.len() == 1 && items[0] == trimmed {
        items = trimmed.split('｜').filter(|item| !item.is_empty()).collect();
    }
    items
        .into_iter()
        .filter(|item| item.chars().count() == 1)
        .filter_map(|item| item.chars().next())
        .collect()
}

/// CSV output accepts any single ASCII quote character; anything else falls
/// back to the double quote.
fn parse_quote_char(value: &str) -> u8 {
    let bytes = value.as_bytes();
    if bytes.len() == 1 && bytes[0].is_ascii() {
        bytes[0]
    } else {
        b'"'
    }
}

fn summary(path: &Path, output_count: usize, warnings: &[Warning]) -> String {
    let mut message = if output_count > 1 {
        format!("wrote {} translated files to {}", output_count, path.display())
    } else {
        format!("wrote {}", path.display())
    };
    if !warnings.is_empty() {
        message.push_str(&format!(" ({} warnings)", warnings.len()));
    }
    message
}
