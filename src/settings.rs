use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

/// Resolved defaults for a translation run; CLI flags override these.
#[derive(Debug, Clone)]
pub struct Settings {
    pub format: String,
    pub autosplit: bool,
    pub escape_chars: String,
    pub encoding: String,
    pub quote_char: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            format: "standard".to_string(),
            autosplit: false,
            escape_chars: String::new(),
            encoding: "utf-8".to_string(),
            quote_char: "\"".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    translation: Option<TranslationSettings>,
    output: Option<OutputSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct TranslationSettings {
    format: Option<String>,
    autosplit: Option<bool>,
    escape_chars: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OutputSettings {
    encoding: Option<String>,
    quote_char: Option<String>,
}

/// Load settings from the working directory, the home directory and an
/// optional extra file, later files overriding earlier ones.
pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    ensure_home_settings_file()?;

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(translation) = incoming.translation {
            if let Some(format) = translation.format
                && !format.trim().is_empty()
            {
                self.format = format;
            }
            if let Some(autosplit) = translation.autosplit {
                self.autosplit = autosplit;
            }
            if let Some(chars) = translation.escape_chars {
                self.escape_chars = chars;
            }
        }
        if let Some(output) = incoming.output {
            if let Some(encoding) = output.encoding
                && !encoding.trim().is_empty()
            {
                self.encoding = encoding;
            }
            if let Some(quote) = output.quote_char
                && !quote.is_empty()
            {
                self.quote_char = quote;
            }
        }
    }
}

fn ensure_home_settings_file() -> Result<()> {
    let Some(home) = home_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".csv-translator-rust"))
        }
    })
}
