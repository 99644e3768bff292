use std::cmp::Reverse;
use std::sync::OnceLock;

use regex::Regex;

use crate::diagnostics::{Diagnostics, Warning};

/// One (source, target) pair for a single target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupEntry {
    pub source: String,
    pub target: String,
}

impl LookupEntry {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Ordered lookup list for one target language.
///
/// Entries are sorted by descending source length, ties keeping their
/// original relative order. The substitutor relies on this ordering so that
/// a longer source is never pre-empted by one of its own substrings.
#[derive(Debug, Clone, Default)]
pub struct Lookup {
    entries: Vec<LookupEntry>,
}

impl Lookup {
    pub fn new(entries: Vec<LookupEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[LookupEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How raw dictionary rows map onto lookup lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitMode {
    /// Columns 0 and 1 form the only lookup.
    #[default]
    SingleTarget,
    /// One lookup per target column 1..N.
    MultiTarget,
}

impl SplitMode {
    /// Any dictionary wider than two columns is multi-language.
    pub fn from_dictionary(rows: &[Vec<String>]) -> Self {
        match rows.first() {
            Some(row) if row.len() > 2 => SplitMode::MultiTarget,
            _ => SplitMode::SingleTarget,
        }
    }
}

fn line_break_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\r\n]+").expect("static pattern"))
}

/// Build one lookup list per target language from raw dictionary rows.
///
/// Rows missing the target column for a language are dropped from that
/// language's lookup. Autosplit appends line pairs without removing the
/// unsplit entry; a line-count mismatch skips the split and records a
/// warning instead.
pub fn prepare_lookups(
    rows: &[Vec<String>],
    split_mode: SplitMode,
    autosplit: bool,
    chars_to_escape: &[char],
    diagnostics: &mut Diagnostics,
) -> Vec<Lookup> {
    let language_count = match split_mode {
        SplitMode::SingleTarget => 1,
        SplitMode::MultiTarget => rows
            .first()
            .map(|row| row.len().saturating_sub(1))
            .unwrap_or(0),
    };

    let mut lookups = Vec::with_capacity(language_count);
    for language in 0..language_count {
        let mut entries: Vec<LookupEntry> = rows
            .iter()
            .filter_map(|row| {
                let source = row.first()?;
                let target = row.get(language + 1)?;
                Some(LookupEntry::new(source.clone(), target.clone()))
            })
            .collect();

        if autosplit {
            // New pairs go into a separate accumulator so the scan never
            // walks entries it appended itself.
            let mut split_entries = Vec::new();
            for (index, entry) in entries.iter().enumerate() {
                let sources: Vec<&str> = line_break_runs().split(&entry.source).collect();
                if sources.len() < 2 {
                    continue;
                }
                let targets: Vec<&str> = line_break_runs().split(&entry.target).collect();
                if sources.len() == targets.len() {
                    for (source, target) in sources.iter().zip(&targets) {
                        split_entries.push(LookupEntry::new(source.trim(), target.trim()));
                    }
                } else {
                    diagnostics.push(Warning::AutosplitMismatch {
                        row: index + 1,
                        column: language + 2,
                    });
                }
            }
            entries.extend(split_entries);
        }

        if !chars_to_escape.is_empty() {
            for entry in &mut entries {
                strip_leading_escape(&mut entry.source, chars_to_escape);
                strip_leading_escape(&mut entry.target, chars_to_escape);
            }
        }

        entries.sort_by_key(|entry| Reverse(entry.source.chars().count()));

        lookups.push(Lookup::new(entries));
    }
    lookups
}

fn strip_leading_escape(value: &mut String, chars_to_escape: &[char]) {
    if let Some(first) = value.chars().next()
        && chars_to_escape.contains(&first)
    {
        value.drain(..first.len_utf8());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    #[test]
    fn single_target_builds_one_lookup() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["Hello", "Bonjour"], &["World", "Monde"]]),
            SplitMode::SingleTarget,
            false,
            &[],
            &mut diagnostics,
        );
        assert_eq!(lookups.len(), 1);
        assert_eq!(lookups[0].len(), 2);
    }

    #[test]
    fn multi_target_builds_one_lookup_per_column() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["Hello", "Bonjour", "Hallo"], &["World", "Monde", "Welt"]]),
            SplitMode::MultiTarget,
            false,
            &[],
            &mut diagnostics,
        );
        assert_eq!(lookups.len(), 2);
        assert_eq!(lookups[0].entries()[0].target, "Bonjour");
        assert_eq!(lookups[1].entries()[0].target, "Hallo");
    }

    #[test]
    fn entries_sort_longest_source_first() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["ab", "1"], &["abcd", "2"], &["abc", "3"]]),
            SplitMode::SingleTarget,
            false,
            &[],
            &mut diagnostics,
        );
        let sources: Vec<&str> = lookups[0]
            .entries()
            .iter()
            .map(|entry| entry.source.as_str())
            .collect();
        assert_eq!(sources, vec!["abcd", "abc", "ab"]);
    }

    #[test]
    fn equal_length_sources_keep_dictionary_order() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["aa", "1"], &["bb", "2"], &["cc", "3"]]),
            SplitMode::SingleTarget,
            false,
            &[],
            &mut diagnostics,
        );
        let targets: Vec<&str> = lookups[0]
            .entries()
            .iter()
            .map(|entry| entry.target.as_str())
            .collect();
        assert_eq!(targets, vec!["1", "2", "3"]);
    }

    #[test]
    fn leading_escape_character_is_stripped() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["|abc", "xyz"]]),
            SplitMode::SingleTarget,
            false,
            &['|'],
            &mut diagnostics,
        );
        assert_eq!(lookups[0].entries()[0], LookupEntry::new("abc", "xyz"));
    }

    #[test]
    fn escape_only_applies_to_the_first_character() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["a|bc", "x|yz"]]),
            SplitMode::SingleTarget,
            false,
            &['|'],
            &mut diagnostics,
        );
        assert_eq!(lookups[0].entries()[0], LookupEntry::new("a|bc", "x|yz"));
    }

    #[test]
    fn autosplit_appends_trimmed_line_pairs_and_keeps_original() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["one \ntwo", "un\r\n deux"]]),
            SplitMode::SingleTarget,
            true,
            &[],
            &mut diagnostics,
        );
        let entries = lookups[0].entries();
        assert_eq!(entries.len(), 3);
        assert!(entries.contains(&LookupEntry::new("one \ntwo", "un\r\n deux")));
        assert!(entries.contains(&LookupEntry::new("one", "un")));
        assert!(entries.contains(&LookupEntry::new("two", "deux")));
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn autosplit_mismatch_warns_and_skips_the_split() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["one\ntwo\nthree", "un\ndeux"]]),
            SplitMode::SingleTarget,
            true,
            &[],
            &mut diagnostics,
        );
        assert_eq!(lookups[0].len(), 1);
        assert_eq!(
            diagnostics.warnings(),
            &[Warning::AutosplitMismatch { row: 1, column: 2 }]
        );
    }

    #[test]
    fn rows_missing_a_target_column_are_dropped_for_that_language() {
        let mut diagnostics = Diagnostics::new();
        let lookups = prepare_lookups(
            &rows(&[&["Hello", "Bonjour", "Hallo"], &["World", "Monde"]]),
            SplitMode::MultiTarget,
            false,
            &[],
            &mut diagnostics,
        );
        assert_eq!(lookups[0].len(), 2);
        assert_eq!(lookups[1].len(), 1);
    }
}
