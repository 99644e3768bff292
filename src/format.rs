use std::str::FromStr;

use anyhow::{Error, anyhow};

use crate::diagnostics::{Diagnostics, Warning};
use crate::dictionary::{self, SplitMode};
use crate::table::{self, Table};

/// Supported content formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentFormat {
    #[default]
    Standard,
    PowerCms,
    CraftCms,
}

impl ContentFormat {
    /// Rows passed through before translation starts; PowerCMS exports
    /// carry a header row.
    pub fn start_index(self) -> usize {
        match self {
            ContentFormat::PowerCms => 1,
            ContentFormat::Standard | ContentFormat::CraftCms => 0,
        }
    }
}

impl FromStr for ContentFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "standard" => Ok(ContentFormat::Standard),
            "powercms" => Ok(ContentFormat::PowerCms),
            "craftcms" => Ok(ContentFormat::CraftCms),
            _ => Err(anyhow!(
                "unknown content format '{}' (expected standard, powercms or craftcms)",
                value
            )),
        }
    }
}

/// Per-run policy: how the dictionary splits, which rows are skipped, and
/// how lookup entries are prepared.
#[derive(Debug, Clone)]
pub struct FormatPolicy {
    pub split_mode: SplitMode,
    pub start_index: usize,
    pub autosplit: bool,
    pub chars_to_escape: Vec<char>,
}

impl FormatPolicy {
    pub fn new(
        format: ContentFormat,
        dictionary: &[Vec<String>],
        autosplit: bool,
        chars_to_escape: Vec<char>,
    ) -> Self {
        Self {
            split_mode: SplitMode::from_dictionary(dictionary),
            start_index: format.start_index(),
            autosplit,
            chars_to_escape,
        }
    }
}

/// Result of a table translation run: one table per target language plus
/// the warnings collected along the way.
#[derive(Debug)]
pub struct Translated {
    pub tables: Vec<Table>,
    pub warnings: Vec<Warning>,
}

/// Core entry point: prepare the lookups and translate the table once per
/// target language. Never fails; malformed cell content degrades to
/// pass-through and a warning.
pub fn translate(
    table: &[Vec<String>],
    dictionary: &[Vec<String>],
    policy: &FormatPolicy,
) -> Translated {
    let mut diagnostics = Diagnostics::new();
    let lookups = dictionary::prepare_lookups(
        dictionary,
        policy.split_mode,
        policy.autosplit,
        &policy.chars_to_escape,
        &mut diagnostics,
    );
    let tables = table::translate_table(table, &lookups, policy.start_index, &mut diagnostics);
    Translated {
        tables,
        warnings: diagnostics.into_warnings(),
    }
}
