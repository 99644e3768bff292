use serde_json::Value;

use crate::diagnostics::Diagnostics;
use crate::dictionary::Lookup;
use crate::substitute::substitute;
use crate::unit::translate_unit;

/// Rows of cells; column positions are significant and preserved.
pub type Table = Vec<Vec<String>>;

/// Shape of a single cell line, decided at translation time.
#[derive(Debug, Clone, PartialEq)]
pub enum LineContent {
    Empty,
    /// JSON array whose elements are all objects carrying a string `type`.
    UnitArray(Vec<Value>),
    /// JSON object, treated as a single unit.
    SingleUnit(Value),
    /// JSON that decodes but matches no known shape; passed through as-is.
    OpaqueJson,
    PlainText,
}

/// Total classifier: never fails. Unparseable text and JSON scalars are
/// plain text; arrays with any non-unit element are opaque.
pub fn classify_line(line: &str) -> LineContent {
    if line.is_empty() {
        return LineContent::Empty;
    }
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Array(items)) => {
            let unit_shaped = items
                .iter()
                .all(|item| item.is_object() && item.get("type").is_some_and(Value::is_string));
            if unit_shaped {
                LineContent::UnitArray(items)
            } else {
                LineContent::OpaqueJson
            }
        }
        Ok(value @ Value::Object(_)) => LineContent::SingleUnit(value),
        Ok(_) | Err(_) => LineContent::PlainText,
    }
}

fn translate_line(line: &str, lookup: &Lookup, diagnostics: &mut Diagnostics) -> String {
    match classify_line(line) {
        LineContent::Empty => String::new(),
        LineContent::UnitArray(units) => {
            let translated: Vec<Value> = units
                .iter()
                .map(|unit| translate_unit(unit, lookup, diagnostics))
                .collect();
            encode_json(&Value::Array(translated), line)
        }
        LineContent::SingleUnit(unit) => {
            encode_json(&translate_unit(&unit, lookup, diagnostics), line)
        }
        LineContent::OpaqueJson => line.to_string(),
        LineContent::PlainText => substitute(line, lookup),
    }
}

fn encode_json(value: &Value, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

/// Translate one cell. Multi-line cells are split, each line classified and
/// translated independently, and rejoined with the original separator.
pub fn translate_cell(cell: &str, lookup: &Lookup, diagnostics: &mut Diagnostics) -> String {
    if cell.is_empty() {
        return String::new();
    }
    if !cell.contains('\n') {
        return translate_line(cell, lookup, diagnostics);
    }
    cell.split('\n')
        .map(|line| translate_line(line, lookup, diagnostics))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Translate `table` once per lookup, producing one output table per target
/// language. Rows before `start_index` pass through verbatim; when more
/// than one lookup is in play, the first column of every data row is the
/// shared key and is copied untranslated into every output.
pub fn translate_table(
    table: &[Vec<String>],
    lookups: &[Lookup],
    start_index: usize,
    diagnostics: &mut Diagnostics,
) -> Vec<Table> {
    let keep_key_column = lookups.len() > 1;
    lookups
        .iter()
        .map(|lookup| {
            let mut translated: Table = table.iter().take(start_index).cloned().collect();
            for row in table.iter().skip(start_index) {
                let mut out_row = Vec::with_capacity(row.len());
                for (column, cell) in row.iter().enumerate() {
                    if keep_key_column && column == 0 {
                        out_row.push(cell.clone());
                    } else {
                        out_row.push(translate_cell(cell, lookup, diagnostics));
                    }
                }
                translated.push(out_row);
            }
            translated
        })
        .collect()
}
