use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Error, Result, anyhow};
use zip::ZipWriter;
use zip::write::FileOptions;

/// Encodings supported for translated output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEncoding {
    #[default]
    Utf8,
    ShiftJis,
}

impl FromStr for OutputEncoding {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(OutputEncoding::Utf8),
            "sjis" | "shift-jis" | "shift_jis" => Ok(OutputEncoding::ShiftJis),
            _ => Err(anyhow!(
                "unknown output encoding '{}' (expected utf-8 or sjis)",
                value
            )),
        }
    }
}

/// Read a CSV file into rows of cells. Rows may have uneven widths; no
/// header inference is applied.
pub fn read_table(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("failed to open csv: {}", path.display()))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("failed to parse csv: {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Serialize a table back to CSV text, quoting only where needed.
pub fn write_table(table: &[Vec<String>], quote_char: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .quote(quote_char)
        .flexible(true)
        .from_writer(Vec::new());
    for row in table {
        writer
            .write_record(row)
            .with_context(|| "failed to serialize csv row")?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("failed to flush csv output: {}", err))?;
    String::from_utf8(bytes).with_context(|| "csv output is not valid utf-8")
}

/// Encode translated text for the output file. UTF-8 output carries a BOM
/// so spreadsheet tools pick up the encoding.
pub fn encode_output(data: &str, encoding: OutputEncoding) -> Vec<u8> {
    match encoding {
        OutputEncoding::Utf8 => {
            let mut bytes = Vec::with_capacity(data.len() + 3);
            bytes.extend_from_slice("\u{feff}".as_bytes());
            bytes.extend_from_slice(data.as_bytes());
            bytes
        }
        OutputEncoding::ShiftJis => {
            let (encoded, _, _) = encoding_rs::SHIFT_JIS.encode(data);
            encoded.into_owned()
        }
    }
}

/// Write the translated outputs next to the content file (or to an explicit
/// path): a single output becomes `<stem>_TRANSLATED.<ext>`, several become
/// one zip with a numbered member per target language.
pub fn write_outputs(
    outputs: &[Vec<u8>],
    content_path: &Path,
    output_path: Option<&Path>,
) -> Result<PathBuf> {
    let stem = file_stem(content_path);
    let extension = file_extension(content_path);

    if outputs.len() == 1 {
        let path = output_path.map(Path::to_path_buf).unwrap_or_else(|| {
            content_path.with_file_name(format!("{}_TRANSLATED.{}", stem, extension))
        });
        fs::write(&path, &outputs[0])
            .with_context(|| format!("failed to write output: {}", path.display()))?;
        return Ok(path);
    }

    let path = output_path.map(Path::to_path_buf).unwrap_or_else(|| {
        content_path.with_file_name(format!("{}.{}.TRANSLATED.zip", stem, extension))
    });
    let file = fs::File::create(&path)
        .with_context(|| format!("failed to create output: {}", path.display()))?;
    let mut writer = ZipWriter::new(file);
    for (index, data) in outputs.iter().enumerate() {
        let name = format!("{}_TRANSLATED_{}.{}", stem, index + 1, extension);
        writer
            .start_file(name, FileOptions::default())
            .with_context(|| "failed to add zip entry")?;
        writer
            .write_all(data)
            .with_context(|| "failed to write zip entry")?;
    }
    writer.finish().with_context(|| "failed to finish zip")?;
    Ok(path)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("content")
        .to_string()
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|extension| extension.to_str())
        .unwrap_or("csv")
        .to_string()
}
