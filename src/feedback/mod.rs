//! Diagnostics channel
//!
//! Provides:
//! - Numbered diagnostic codes with message templates
//! - A collecting sink with `-w` style suppression
//! - Text and JSON rendering

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::utils::TokenPos;

// ==================== Diagnostic Codes ====================

/// Diagnostic codes produced by the symbol table core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagCode {
    UndefinedSymbol,
    SymbolAlreadyDefined,
    OperatorResultTag,
    SymbolNeverUsed,
    UnusedAssignment,
    ShadowedSymbol,
}

impl DiagCode {
    pub const ALL: [DiagCode; 6] = [
        DiagCode::UndefinedSymbol,
        DiagCode::SymbolAlreadyDefined,
        DiagCode::OperatorResultTag,
        DiagCode::SymbolNeverUsed,
        DiagCode::UnusedAssignment,
        DiagCode::ShadowedSymbol,
    ];

    /// Numeric code as printed to the user
    pub fn number(&self) -> u32 {
        match self {
            DiagCode::UndefinedSymbol => 17,
            DiagCode::SymbolAlreadyDefined => 21,
            DiagCode::OperatorResultTag => 63,
            DiagCode::SymbolNeverUsed => 203,
            DiagCode::UnusedAssignment => 204,
            DiagCode::ShadowedSymbol => 219,
        }
    }

    pub fn from_number(n: u32) -> Option<DiagCode> {
        Self::ALL.iter().copied().find(|c| c.number() == n)
    }

    /// Codes below 200 are errors, the rest are warnings
    pub fn default_severity(&self) -> Severity {
        if self.number() >= 200 {
            Severity::Warning
        } else {
            Severity::Error
        }
    }

    /// Message template; each `{}` is filled by the next argument
    fn template(&self) -> &'static str {
        match self {
            DiagCode::UndefinedSymbol => "undefined symbol \"{}\"",
            DiagCode::SymbolAlreadyDefined => "symbol already defined: \"{}\"",
            DiagCode::OperatorResultTag => "operator \"{}\" requires a \"{}\" result tag",
            DiagCode::SymbolNeverUsed => "symbol is never used: \"{}\"",
            DiagCode::UnusedAssignment => "symbol is assigned a value that is never used: \"{}\"",
            DiagCode::ShadowedSymbol => "local variable \"{}\" shadows a variable at a preceding level",
        }
    }

    pub fn format(&self, args: &[String]) -> String {
        let mut out = String::new();
        let mut args = args.iter();
        let mut pieces = self.template().split("{}").peekable();
        while let Some(piece) = pieces.next() {
            out.push_str(piece);
            if pieces.peek().is_some() {
                out.push_str(args.next().map(String::as_str).unwrap_or(""));
            }
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

// ==================== Diagnostic ====================

/// A recorded diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub code: DiagCode,
    /// Numeric code, duplicated for consumers of the JSON form
    pub number: u32,
    pub severity: Severity,
    pub pos: TokenPos,
    pub args: Vec<String>,
    pub message: String,
}

impl Diagnostic {
    /// Render as `file(line) : warning 219: message`
    pub fn render(&self, file_name: &str) -> String {
        format!(
            "{}({}) : {} {:03}: {}",
            file_name, self.pos.line, self.severity, self.number, self.message
        )
    }
}

// ==================== Options ====================

/// Reporting options, filled from the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Warning numbers that are never recorded
    pub disabled_warnings: Vec<u32>,
    /// Record every warning as an error
    pub warnings_as_errors: bool,
}

// ==================== Sink ====================

/// Collects diagnostics for one compilation unit
#[derive(Debug, Default)]
pub struct Diagnostics {
    reports: Vec<Diagnostic>,
    options: Options,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: Options) -> Self {
        Self {
            reports: Vec::new(),
            options,
        }
    }

    /// Start a report. The diagnostic is recorded when the returned builder
    /// is dropped, so `report(pos, code).arg(name);` is a complete statement.
    pub fn report(&mut self, pos: TokenPos, code: DiagCode) -> Report<'_> {
        Report {
            sink: self,
            pos,
            code,
            args: Vec::new(),
        }
    }

    fn push(&mut self, pos: TokenPos, code: DiagCode, args: Vec<String>) {
        let mut severity = code.default_severity();
        if severity == Severity::Warning {
            if self.options.disabled_warnings.contains(&code.number()) {
                log::trace!("suppressed warning {} at {}", code.number(), pos);
                return;
            }
            if self.options.warnings_as_errors {
                severity = Severity::Error;
            }
        }
        let message = code.format(&args);
        log::debug!("{} {} at {}: {}", severity, code.number(), pos, message);
        self.reports.push(Diagnostic {
            code,
            number: code.number(),
            severity,
            pos,
            args,
            message,
        });
    }

    pub fn all(&self) -> &[Diagnostic] {
        &self.reports
    }

    pub fn has_errors(&self) -> bool {
        self.reports.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.reports.len() - self.error_count()
    }

    /// Diagnostics carrying `code`, in report order
    pub fn with_code(&self, code: DiagCode) -> Vec<&Diagnostic> {
        self.reports.iter().filter(|d| d.code == code).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Output as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.reports).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Builder returned by [`Diagnostics::report`]
pub struct Report<'a> {
    sink: &'a mut Diagnostics,
    pos: TokenPos,
    code: DiagCode,
    args: Vec<String>,
}

impl Report<'_> {
    pub fn arg(mut self, arg: impl fmt::Display) -> Self {
        self.args.push(arg.to_string());
        self
    }
}

impl Drop for Report<'_> {
    fn drop(&mut self) {
        let args = std::mem::take(&mut self.args);
        self.sink.push(self.pos, self.code, args);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_on_drop() {
        let mut diags = Diagnostics::new();
        diags
            .report(TokenPos::new(0, 3, 1), DiagCode::SymbolAlreadyDefined)
            .arg("MAX");
        assert_eq!(diags.len(), 1);
        let d = &diags.all()[0];
        assert_eq!(d.number, 21);
        assert_eq!(d.severity, Severity::Error);
        assert_eq!(d.message, "symbol already defined: \"MAX\"");
    }

    #[test]
    fn test_two_argument_template() {
        let msg = DiagCode::OperatorResultTag.format(&["operator<".to_string(), "bool:".to_string()]);
        assert_eq!(msg, "operator \"operator<\" requires a \"bool:\" result tag");
    }

    #[test]
    fn test_disabled_warning_is_dropped() {
        let mut diags = Diagnostics::with_options(Options {
            disabled_warnings: vec![219],
            warnings_as_errors: false,
        });
        diags.report(TokenPos::dummy(), DiagCode::ShadowedSymbol).arg("x");
        diags.report(TokenPos::dummy(), DiagCode::SymbolAlreadyDefined).arg("x");
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.all()[0].code, DiagCode::SymbolAlreadyDefined);
    }

    #[test]
    fn test_errors_cannot_be_disabled() {
        let mut diags = Diagnostics::with_options(Options {
            disabled_warnings: vec![21],
            warnings_as_errors: false,
        });
        diags.report(TokenPos::dummy(), DiagCode::SymbolAlreadyDefined).arg("x");
        assert!(diags.has_errors());
    }

    #[test]
    fn test_warnings_as_errors() {
        let mut diags = Diagnostics::with_options(Options {
            disabled_warnings: vec![],
            warnings_as_errors: true,
        });
        diags.report(TokenPos::dummy(), DiagCode::SymbolNeverUsed).arg("x");
        assert_eq!(diags.error_count(), 1);
        assert_eq!(diags.warning_count(), 0);
    }

    #[test]
    fn test_render() {
        let mut diags = Diagnostics::new();
        diags
            .report(TokenPos::new(0, 12, 5), DiagCode::ShadowedSymbol)
            .arg("total");
        assert_eq!(
            diags.all()[0].render("main.sp"),
            "main.sp(12) : warning 219: local variable \"total\" shadows a variable at a preceding level"
        );
    }

    #[test]
    fn test_code_numbers_round_trip() {
        for code in DiagCode::ALL {
            assert_eq!(DiagCode::from_number(code.number()), Some(code));
        }
        assert_eq!(DiagCode::from_number(999), None);
    }
}
