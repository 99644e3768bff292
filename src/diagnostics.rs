use std::fmt;

use tracing::warn;

/// Non-fatal conditions surfaced during a translation run. None of these
/// interrupt processing; the affected value passes through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A multi-line dictionary cell whose source and target split into a
    /// different number of lines. Row and column are 1-based spreadsheet
    /// coordinates (column 1 is the source column).
    AutosplitMismatch { row: usize, column: usize },
    /// An image/link unit whose `content` field did not decode to a
    /// non-empty JSON array.
    UnitContentDecode { unit_type: String, payload: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::AutosplitMismatch { row, column } => write!(
                f,
                "autosplit: could not split multi-line cell on column {} row {} of the dictionary",
                column, row
            ),
            Warning::UnitContentDecode { unit_type, payload } => {
                write!(f, "failed to parse content of '{}' unit: {}", unit_type, payload)
            }
        }
    }
}

/// Collects warnings for the caller and mirrors them to the log.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn autosplit_warning_uses_spreadsheet_coordinates() {
        let warning = Warning::AutosplitMismatch { row: 3, column: 2 };
        assert_eq!(
            warning.to_string(),
            "autosplit: could not split multi-line cell on column 2 row 3 of the dictionary"
        );
    }

    #[test]
    fn collected_warnings_keep_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(Warning::AutosplitMismatch { row: 1, column: 2 });
        diagnostics.push(Warning::UnitContentDecode {
            unit_type: "image".to_string(),
            payload: "not json".to_string(),
        });
        assert_eq!(diagnostics.warnings().len(), 2);
        assert!(matches!(
            diagnostics.warnings()[0],
            Warning::AutosplitMismatch { row: 1, column: 2 }
        ));
    }
}
