use crate::dictionary::Lookup;

/// CJK sentences carry no space after the ideographic full stop, so one is
/// inserted when a replaced source ends at this character.
const IDEOGRAPHIC_FULL_STOP: char = '。';

/// Ordered find-and-replace of dictionary sources within `value`.
///
/// The lookup is walked in its length-descending order. A value that exactly
/// equals an entry's source is replaced wholesale and the scan stops; a
/// partial match replaces the first occurrence and the scan continues
/// against the updated string, so a target introduced by an earlier
/// replacement can itself match a later, shorter entry. Values with no
/// matching entry pass through unchanged.
pub fn substitute(value: &str, lookup: &Lookup) -> String {
    if value.is_empty() {
        return String::new();
    }

    let mut result = value.to_string();
    for entry in lookup.entries() {
        if entry.source.is_empty() {
            continue;
        }
        if result == entry.source {
            return entry.target.clone();
        }
        if result.contains(&entry.source) {
            let replacement = if entry.source.ends_with(IDEOGRAPHIC_FULL_STOP) {
                format!("{} ", entry.target)
            } else {
                entry.target.clone()
            };
            result = result.replacen(&entry.source, &replacement, 1);
        }
    }
    result
}
