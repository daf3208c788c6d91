//! Decode command implementation
//!
//! Looks up engine status codes in the diagnostic tables. Human output is
//! colored by category; `--json` prints a single object for scripts.

use colored::Colorize;
use rdhost_core::error::RdhostError;
use rdhost_core::session::diagnostics::{
    describe_disconnect, describe_fatal_error, describe_warning, disconnect_category,
    warning_category, DisconnectCategory,
};
use serde::Serialize;

/// Which table a code belongs to
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeKind {
    Disconnect,
    Warning,
    Fatal,
}

#[derive(Debug, Serialize)]
struct CodeReport {
    kind: CodeKind,
    code: i32,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    category: Option<String>,
    known: bool,
}

impl CodeReport {
    fn new(kind: CodeKind, code: i32) -> Self {
        let (description, category) = match kind {
            CodeKind::Disconnect => (
                describe_disconnect(code),
                Some(disconnect_category(code).to_string()),
            ),
            CodeKind::Warning => (
                describe_warning(code),
                Some(warning_category(code).to_string()),
            ),
            CodeKind::Fatal => (describe_fatal_error(code), None),
        };

        // Placeholders are built on demand, table entries are borrowed
        let known = matches!(description, std::borrow::Cow::Borrowed(_));

        Self {
            kind,
            code,
            description: description.into_owned(),
            category,
            known,
        }
    }
}

/// Run the decode command
pub fn run_decode(kind: CodeKind, code: i32, json: bool) -> Result<(), RdhostError> {
    let report = CodeReport::new(kind, code);

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| RdhostError::Io(e.into()))?;
        println!("{}", rendered);
        return Ok(());
    }

    let description = if report.known {
        report.description.normal()
    } else {
        report.description.yellow()
    };
    println!("{} {}", format!("[{}]", code).bold(), description);

    if let Some(category) = &report.category {
        let label = match (kind, disconnect_category(code)) {
            (CodeKind::Disconnect, DisconnectCategory::Benign) => category.green(),
            (CodeKind::Disconnect, DisconnectCategory::Unknown) => category.yellow(),
            (CodeKind::Disconnect, _) => category.red(),
            _ => category.normal(),
        };
        println!("Category: {}", label);
    }

    Ok(())
}
