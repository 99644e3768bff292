use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::diagnostics::{Diagnostics, Warning};
use crate::dictionary::Lookup;
use crate::substitute::substitute;

/// Known unit types with top-level text fields. Anything else is carried
/// through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitKind {
    Text,
    Headline,
    Image,
    Link,
    Html,
    RichText,
    Accordion,
    Table,
    Unknown,
}

impl UnitKind {
    pub fn from_type(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "text" => UnitKind::Text,
            "headline" => UnitKind::Headline,
            "image" => UnitKind::Image,
            "link" => UnitKind::Link,
            "html" => UnitKind::Html,
            "rich-text" => UnitKind::RichText,
            "accordion" => UnitKind::Accordion,
            "table" => UnitKind::Table,
            _ => UnitKind::Unknown,
        }
    }
}

/// Unit types whose translatable text sits one level down under `fields`,
/// as exported by CraftCMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUnitKind {
    Headline,
    Link,
    Html,
    RichText,
    ImageText,
    Unknown,
}

impl FieldUnitKind {
    pub fn from_type(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "headline" => FieldUnitKind::Headline,
            "link" => FieldUnitKind::Link,
            "html" => FieldUnitKind::Html,
            "richtext" => FieldUnitKind::RichText,
            "image_text" => FieldUnitKind::ImageText,
            _ => FieldUnitKind::Unknown,
        }
    }
}

fn unit_kind(unit: &Value) -> UnitKind {
    unit.get("type")
        .and_then(Value::as_str)
        .map(UnitKind::from_type)
        .unwrap_or(UnitKind::Unknown)
}

/// Translate the known text-bearing fields of a unit, returning a patched
/// deep copy; the input is never mutated. Unknown types and table units
/// (whose cell content has no translation mapping yet) pass through as-is.
pub fn translate_unit(unit: &Value, lookup: &Lookup, diagnostics: &mut Diagnostics) -> Value {
    let mut translated = unit.clone();
    match unit_kind(unit) {
        UnitKind::Text => substitute_field(&mut translated, "content", lookup),
        UnitKind::Headline => substitute_field(&mut translated, "headline-text", lookup),
        UnitKind::Image => translate_media_content(
            &mut translated,
            "image",
            &["alt", "description", "title"],
            lookup,
            diagnostics,
        ),
        UnitKind::Link => translate_media_content(
            &mut translated,
            "link",
            &["description", "title"],
            lookup,
            diagnostics,
        ),
        UnitKind::Html | UnitKind::RichText => {
            strip_breaks_and_substitute_field(&mut translated, "content", lookup)
        }
        UnitKind::Accordion => {
            substitute_field(&mut translated, "accordion-title", lookup);
            strip_breaks_and_substitute_field(&mut translated, "accordion-body", lookup);
        }
        UnitKind::Table | UnitKind::Unknown => {}
    }
    translated
}

/// CraftCMS-style counterpart of [`translate_unit`]: the same dispatch, one
/// level down under the unit's `fields` object. Units without a `fields`
/// object pass through unchanged.
pub fn translate_unit_nested(unit: &Value, lookup: &Lookup) -> Value {
    let mut translated = unit.clone();
    let kind = unit
        .get("type")
        .and_then(Value::as_str)
        .map(FieldUnitKind::from_type)
        .unwrap_or(FieldUnitKind::Unknown);

    let Some(fields) = translated.get_mut("fields") else {
        return translated;
    };
    match kind {
        FieldUnitKind::Headline => substitute_field(fields, "headline_text", lookup),
        FieldUnitKind::Link => substitute_field(fields, "link_text", lookup),
        FieldUnitKind::Html => strip_breaks_and_substitute_field(fields, "html_text", lookup),
        FieldUnitKind::RichText => {
            strip_breaks_and_substitute_field(fields, "richtext_text", lookup)
        }
        FieldUnitKind::ImageText => {
            strip_breaks_and_substitute_field(fields, "image_text_text", lookup)
        }
        FieldUnitKind::Unknown => {}
    }
    translated
}

fn substitute_field(unit: &mut Value, field: &str, lookup: &Lookup) {
    if let Some(value) = unit.get_mut(field)
        && let Some(text) = value.as_str()
    {
        let replaced = substitute(text, lookup);
        *value = Value::String(replaced);
    }
}

fn strip_breaks_and_substitute_field(unit: &mut Value, field: &str, lookup: &Lookup) {
    if let Some(value) = unit.get_mut(field)
        && let Some(text) = value.as_str()
    {
        let replaced = substitute(&strip_html_breaks(text), lookup);
        *value = Value::String(replaced);
    }
}

fn html_breaks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<br>\n?").expect("static pattern"))
}

fn strip_html_breaks(text: &str) -> String {
    html_breaks().replace_all(text, "").into_owned()
}

/// Image and link units keep their texts inside a JSON-encoded array in
/// `content`. Each element is patched field-wise and the array re-encoded;
/// anything that does not decode to a non-empty array leaves the unit
/// unmodified and records a warning.
fn translate_media_content(
    unit: &mut Value,
    unit_type: &str,
    fields: &[&str],
    lookup: &Lookup,
    diagnostics: &mut Diagnostics,
) {
    let content = unit
        .get("content")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let Some(content) = content else {
        diagnostics.push(Warning::UnitContentDecode {
            unit_type: unit_type.to_string(),
            payload: unit.to_string(),
        });
        return;
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Array(items)) if !items.is_empty() => {
            let translated: Vec<Value> = items
                .into_iter()
                .map(|mut item| {
                    for field in fields {
                        substitute_field(&mut item, field, lookup);
                    }
                    item
                })
                .collect();
            if let Ok(encoded) = serde_json::to_string(&translated) {
                unit["content"] = Value::String(encoded);
            }
        }
        _ => diagnostics.push(Warning::UnitContentDecode {
            unit_type: unit_type.to_string(),
            payload: content,
        }),
    }
}
