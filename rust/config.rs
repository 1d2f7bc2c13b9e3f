use std::env;

const PDFTOTEXT_BIN_ENV_VAR: &str = "PDFTOTEXT_BIN";
const DEFAULT_PDFTOTEXT_BIN: &str = "pdftotext";

/// Settings for the default converter, resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    pub pdftotext_bin: String,
}

impl ConverterConfig {
    pub fn from_env() -> Self {
        Self {
            pdftotext_bin: pdftotext_bin(),
        }
    }
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            pdftotext_bin: DEFAULT_PDFTOTEXT_BIN.to_string(),
        }
    }
}

fn pdftotext_bin() -> String {
    env::var(PDFTOTEXT_BIN_ENV_VAR)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PDFTOTEXT_BIN.to_string())
}
