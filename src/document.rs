use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crate::diagnostics::{Diagnostics, Warning};
use crate::dictionary::{self, Lookup};
use crate::format::FormatPolicy;
use crate::substitute::substitute;
use crate::unit::translate_unit_nested;

/// Entry property holding the unit map in CraftCMS exports.
const UNIT_PROPERTY: &str = "tipunit";

/// Translated copies of a CraftCMS JSON document, one per target language.
#[derive(Debug)]
pub struct TranslatedDocument {
    pub documents: Vec<String>,
    pub warnings: Vec<Warning>,
}

/// Translate a CraftCMS export: a JSON array of entry objects. String
/// properties are substituted directly; the `tipunit` object is translated
/// per-unit with the nested `fields` dispatch. A document that is not a
/// top-level array is the caller handing us the wrong format, which is the
/// one fatal condition here.
pub fn translate_document(
    content: &str,
    dictionary: &[Vec<String>],
    policy: &FormatPolicy,
) -> Result<TranslatedDocument> {
    let parsed: Value =
        serde_json::from_str(content).with_context(|| "failed to parse content as JSON")?;
    let Value::Array(entries) = parsed else {
        return Err(anyhow!("expected a top-level JSON array of entries"));
    };

    let mut diagnostics = Diagnostics::new();
    let lookups = dictionary::prepare_lookups(
        dictionary,
        policy.split_mode,
        policy.autosplit,
        &policy.chars_to_escape,
        &mut diagnostics,
    );

    let mut documents = Vec::with_capacity(lookups.len());
    for lookup in &lookups {
        let translated: Vec<Value> = entries
            .iter()
            .map(|entry| translate_entry(entry, lookup))
            .collect();
        documents.push(
            serde_json::to_string(&translated)
                .with_context(|| "failed to serialize translated document")?,
        );
    }

    Ok(TranslatedDocument {
        documents,
        warnings: diagnostics.into_warnings(),
    })
}

fn translate_entry(entry: &Value, lookup: &Lookup) -> Value {
    let mut translated = entry.clone();
    let Some(map) = translated.as_object_mut() else {
        return translated;
    };
    for (key, value) in map.iter_mut() {
        match value {
            Value::String(text) => {
                let replaced = substitute(text, lookup);
                *value = Value::String(replaced);
            }
            Value::Object(units) if key == UNIT_PROPERTY => {
                for unit in units.values_mut() {
                    *unit = translate_unit_nested(unit, lookup);
                }
            }
            _ => {}
        }
    }
    translated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::ContentFormat;

    fn rows(raw: &[&[&str]]) -> Vec<Vec<String>> {
        raw.iter()
            .map(|row| row.iter().map(|cell| cell.to_string()).collect())
            .collect()
    }

    fn policy(dictionary: &[Vec<String>]) -> FormatPolicy {
        FormatPolicy::new(ContentFormat::CraftCms, dictionary, false, Vec::new())
    }

    #[test]
    fn string_properties_and_units_are_translated() {
        let dictionary = rows(&[&["Hello", "Bonjour"], &["World", "Monde"]]);
        let content = r#"[{
            "title": "Hello",
            "count": 3,
            "tipunit": {
                "unit1": {"type": "headline", "fields": {"headline_text": "World"}}
            }
        }]"#;
        let translated = translate_document(content, &dictionary, &policy(&dictionary)).unwrap();
        assert_eq!(translated.documents.len(), 1);
        let parsed: Value = serde_json::from_str(&translated.documents[0]).unwrap();
        assert_eq!(parsed[0]["title"], "Bonjour");
        assert_eq!(parsed[0]["count"], 3);
        assert_eq!(
            parsed[0]["tipunit"]["unit1"]["fields"]["headline_text"],
            "Monde"
        );
    }

    #[test]
    fn non_unit_objects_pass_through() {
        let dictionary = rows(&[&["Hello", "Bonjour"]]);
        let content = r#"[{"meta": {"slug": "Hello"}}]"#;
        let translated = translate_document(content, &dictionary, &policy(&dictionary)).unwrap();
        let parsed: Value = serde_json::from_str(&translated.documents[0]).unwrap();
        assert_eq!(parsed[0]["meta"]["slug"], "Hello");
    }

    #[test]
    fn multi_column_dictionary_yields_one_document_per_language() {
        let dictionary = rows(&[&["Hello", "Bonjour", "Hallo"]]);
        let content = r#"[{"title": "Hello"}]"#;
        let translated = translate_document(content, &dictionary, &policy(&dictionary)).unwrap();
        assert_eq!(translated.documents.len(), 2);
        let first: Value = serde_json::from_str(&translated.documents[0]).unwrap();
        let second: Value = serde_json::from_str(&translated.documents[1]).unwrap();
        assert_eq!(first[0]["title"], "Bonjour");
        assert_eq!(second[0]["title"], "Hallo");
    }

    #[test]
    fn non_array_document_is_rejected() {
        let dictionary = rows(&[&["Hello", "Bonjour"]]);
        assert!(translate_document(r#"{"title":"Hello"}"#, &dictionary, &policy(&dictionary)).is_err());
        assert!(translate_document("not json", &dictionary, &policy(&dictionary)).is_err());
    }
}
