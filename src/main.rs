use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "csv-translator-rust",
    version,
    about = "Translate CSV/JSON content with a CSV dictionary"
)]
struct Cli {
    /// Content file to translate (csv, json or any text fragment)
    content: String,

    /// Dictionary CSV: source column first, one or more target columns
    #[arg(short = 'd', long = "dictionary")]
    dictionary: String,

    /// Content format (standard, powercms, craftcms)
    #[arg(short = 'F', long = "format")]
    format: Option<String>,

    /// Expand multi-line dictionary cells into one entry per line pair
    #[arg(short = 'a', long = "autosplit")]
    autosplit: bool,

    /// Characters stripped from the first position of dictionary cells, separated by | or ｜
    #[arg(short = 'e', long = "escape-chars")]
    escape_chars: Option<String>,

    /// Quote character for CSV output
    #[arg(short = 'q', long = "quote-char")]
    quote_char: Option<String>,

    /// Output encoding (utf-8, sjis)
    #[arg(short = 'E', long = "encoding")]
    encoding: Option<String>,

    /// Output path (defaults to <content>_TRANSLATED.<ext>, or a zip for multi-language dictionaries)
    #[arg(short = 'o', long = "output")]
    output: Option<String>,

    /// Read extra settings from a local TOML file
    #[arg(short = 'r', long = "read-settings")]
    read_settings: Option<String>,

    /// Enable verbose logging
    #[arg(long = "verbose")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    csv_translator_rust::logging::init(cli.verbose);

    let output = csv_translator_rust::run(csv_translator_rust::Config {
        content: cli.content,
        dictionary: cli.dictionary,
        format: cli.format,
        autosplit: cli.autosplit.then_some(true),
        escape_chars: cli.escape_chars,
        quote_char: cli.quote_char,
        encoding: cli.encoding,
        output: cli.output,
        settings_path: cli.read_settings,
    })?;

    println!("{}", output);
    Ok(())
}
