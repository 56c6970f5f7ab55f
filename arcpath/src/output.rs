//! Output formatting for CLI commands.
//!
//! Provides abstraction layer for outputting results in text or JSON format.

use anyhow::Result;
use arcpath_core::FileChecksum;
use serde::Serialize;
use std::io::{self, Write};

/// Output format selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Writer for command output with format abstraction.
pub struct OutputWriter {
    format: OutputFormat,
    stdout: io::Stdout,
}

impl OutputWriter {
    /// Create a new OutputWriter.
    pub fn new(json: bool) -> Self {
        Self {
            format: if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            stdout: io::stdout(),
        }
    }

    /// Write output using the configured format.
    ///
    /// The `data` parameter must be a serializable struct that includes
    /// `success: bool` and `result_code: u8` fields.
    ///
    /// The `text_fn` closure is called only in text mode to generate the
    /// human-readable output.
    pub fn write<T: Serialize>(&self, data: &T, text_fn: impl FnOnce() -> String) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(data)?;
                writeln!(&self.stdout, "{}", json)?;
            }
            OutputFormat::Text => {
                let text = text_fn();
                if !text.is_empty() {
                    write!(&self.stdout, "{}", text)?;
                }
            }
        }
        Ok(())
    }

    /// Write an error message to stderr.
    ///
    /// In JSON mode, writes a JSON error object with success=false.
    /// In text mode, writes the error message directly.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        match self.format {
            OutputFormat::Json => {
                let error_output = ErrorOutput {
                    success: false,
                    result_code,
                    error: format!("{:#}", error),
                };
                if let Ok(json) = serde_json::to_string_pretty(&error_output) {
                    let _ = writeln!(io::stderr(), "{}", json);
                }
            }
            OutputFormat::Text => {
                let _ = writeln!(io::stderr(), "Error: {:#}", error);
            }
        }
    }
}

// ============================================================================
// Data Transfer Objects (DTOs) for JSON output
// ============================================================================

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub result_code: u8,
    pub error: String,
}

/// Output for `resolve` command.
#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    pub success: bool,
    pub result_code: u8,
    pub input: String,
    pub resolved: String,
}

/// Output for `combine` command.
#[derive(Debug, Serialize)]
pub struct CombineOutput {
    pub success: bool,
    pub result_code: u8,
    pub path: String,
}

/// Output for `filename` command.
#[derive(Debug, Serialize)]
pub struct FilenameOutput {
    pub success: bool,
    pub result_code: u8,
    pub path: String,
    pub filename: String,
}

/// Output for `parent` command.
#[derive(Debug, Serialize)]
pub struct ParentOutput {
    pub success: bool,
    pub result_code: u8,
    pub path: String,
    pub parent: String,
}

/// Output for `mkdir` command.
#[derive(Debug, Serialize)]
pub struct MkdirOutput {
    pub success: bool,
    pub result_code: u8,
    pub directories: Vec<String>,
}

/// Output for `crc` command.
#[derive(Debug, Serialize)]
pub struct CrcOutput {
    pub success: bool,
    pub result_code: u8,
    pub files: Vec<FileChecksum>,
}

/// Output for `verify` command.
#[derive(Debug, Serialize)]
pub struct VerifyOutput {
    pub success: bool,
    pub result_code: u8,
    pub path: String,
    pub crc32: String,
}

/// Output for `prepare` command.
#[derive(Debug, Serialize)]
pub struct PrepareOutput {
    pub success: bool,
    pub result_code: u8,
    pub entry: String,
    pub path: String,
}
