//! Check files: named values paired with constraint expressions

use serde::Deserialize;
use std::fs;
use std::path::Path;
use tenet_constraint::{evaluate, Evaluation, Value};
use tenet_core::Result;
use tenet_expr::parse_constraint;

/// Optional `[settings]` table of a check file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Stop at the first check that does not pass
    #[serde(default)]
    pub fail_fast: bool,
}

impl Settings {
    /// A command-line choice, when given, wins over the file
    pub fn fail_fast_with(&self, flag: Option<bool>) -> bool {
        flag.unwrap_or(self.fail_fast)
    }
}

/// One `[[check]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct CheckDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// The subject. TOML has no null, so an omitted value means null.
    #[serde(default)]
    pub value: Option<toml::Value>,
    /// Constraint expression in tenet-expr syntax
    pub expect: String,
}

impl CheckDef {
    pub fn subject(&self) -> Value {
        self.value.clone().map(Value::from).unwrap_or(Value::Null)
    }
}

/// TOML file format for checks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckFile {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub check: Vec<CheckDef>,
}

impl CheckFile {
    /// Load checks from a TOML file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::load_string(&content)
    }

    /// Load checks from a TOML string
    pub fn load_string(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn len(&self) -> usize {
        self.check.len()
    }

    pub fn is_empty(&self) -> bool {
        self.check.is_empty()
    }
}

/// How a single check ended
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Pass,
    /// The value did not satisfy the expectation
    Fail(String),
    /// The expectation could not be parsed or applied
    Error(String),
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Pass => "pass",
            Outcome::Fail(_) => "fail",
            Outcome::Error(_) => "error",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Pass => None,
            Outcome::Fail(m) | Outcome::Error(m) => Some(m),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub description: Option<String>,
    pub expect: String,
    pub outcome: Outcome,
}

/// Results of running a check file
#[derive(Debug, Default)]
pub struct CheckReport {
    pub results: Vec<CheckResult>,
    /// Checks left unrun because of fail-fast
    pub skipped: usize,
}

impl CheckReport {
    pub fn passed_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Pass))
    }

    pub fn failed_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Fail(_)))
    }

    pub fn error_count(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Error(_)))
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// True if nothing failed or errored
    pub fn is_success(&self) -> bool {
        self.results.iter().all(|r| r.outcome == Outcome::Pass)
    }

    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} check(s): {} passed, {} failed, {} errored",
            self.results.len(),
            self.passed_count(),
            self.failed_count(),
            self.error_count(),
        );
        if self.skipped > 0 {
            summary.push_str(&format!(", {} skipped", self.skipped));
        }
        summary
    }
}

/// Evaluate one expectation against one value
pub fn run_check(expect: &str, value: &Value) -> Outcome {
    let constraint = match parse_constraint(expect) {
        Ok(c) => c,
        Err(e) => return Outcome::Error(format!("invalid expression: {}", e)),
    };

    match evaluate(&constraint, value) {
        Ok(Evaluation::Passed) => Outcome::Pass,
        Ok(Evaluation::Failed(failure)) => Outcome::Fail(failure.message()),
        Err(usage) => Outcome::Error(usage.to_string()),
    }
}

/// Run every check in file order
pub fn run_checks(file: &CheckFile, fail_fast: bool) -> CheckReport {
    let mut report = CheckReport::default();

    for (index, def) in file.check.iter().enumerate() {
        let outcome = run_check(&def.expect, &def.subject());
        tracing::debug!(check = %def.name, outcome = outcome.label(), "check evaluated");

        let stop = fail_fast && outcome != Outcome::Pass;
        report.results.push(CheckResult {
            name: def.name.clone(),
            description: def.description.clone(),
            expect: def.expect.clone(),
            outcome,
        });

        if stop {
            report.skipped = file.check.len() - index - 1;
            tracing::info!(skipped = report.skipped, "stopping at first unsuccessful check");
            break;
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenet_core::TenetError;

    fn sample_toml() -> &'static str {
        r#"
[[check]]
name = "greeting"
value = "Hello Test Driven Development!"
expect = 'starts with "HELLO" ignoring case'

[[check]]
name = "quotes"
value = ["Never say never", "It's never too late", "Nevermore!"]
expect = 'all matches "never" ignoring case'

[[check]]
name = "missing"
description = "Omitted values are null"
expect = "is null"
"#
    }

    #[test]
    fn test_load_from_string() {
        let file = CheckFile::load_string(sample_toml()).unwrap();
        assert_eq!(file.len(), 3);
        assert!(!file.settings.fail_fast);
        assert_eq!(file.check[0].name, "greeting");
        assert!(file.check[2].subject().is_null());
        assert_eq!(
            file.check[2].description.as_deref(),
            Some("Omitted values are null")
        );
    }

    #[test]
    fn test_load_settings() {
        let file = CheckFile::load_string("[settings]\nfail_fast = true\n").unwrap();
        assert!(file.settings.fail_fast);
        assert!(file.is_empty());
    }

    #[test]
    fn test_flag_overrides_file_fail_fast() {
        let file = CheckFile::load_string("[settings]\nfail_fast = true\n").unwrap();
        assert!(file.settings.fail_fast_with(None));
        assert!(!file.settings.fail_fast_with(Some(false)));
        assert!(Settings::default().fail_fast_with(Some(true)));
        assert!(!Settings::default().fail_fast_with(None));
    }

    #[test]
    fn test_load_rejects_missing_expect() {
        let err = CheckFile::load_string("[[check]]\nname = 'x'\nvalue = 1\n").unwrap_err();
        assert!(matches!(err, TenetError::TomlParseError(_)));
    }

    #[test]
    fn test_all_sample_checks_pass() {
        let file = CheckFile::load_string(sample_toml()).unwrap();
        let report = run_checks(&file, false);
        assert!(report.is_success());
        assert_eq!(report.passed_count(), 3);
        assert_eq!(report.summary(), "3 check(s): 3 passed, 0 failed, 0 errored");
    }

    #[test]
    fn test_bundled_check_file_passes() {
        let file = CheckFile::load_string(include_str!("../../../checks/assert_syntax.toml")).unwrap();
        let report = run_checks(&file, false);
        for result in &report.results {
            assert_eq!(result.outcome, Outcome::Pass, "check `{}`", result.name);
        }
        assert_eq!(report.results.len(), file.len());
    }

    #[test]
    fn test_outcome_kinds() {
        assert_eq!(run_check("is empty", &Value::from("")), Outcome::Pass);

        let fail = run_check("is empty", &Value::from("nonempty"));
        assert_eq!(fail.label(), "fail");
        assert!(fail.message().unwrap().contains("length 8"));

        let misuse = run_check("is nan", &Value::from("not a number"));
        assert_eq!(misuse.label(), "error");

        let bad = run_check("is sort of null", &Value::Null);
        assert!(bad.message().unwrap().starts_with("invalid expression"));
    }

    #[test]
    fn test_fail_fast_skips_rest() {
        let toml = r#"
[[check]]
name = "first"
value = 1
expect = "is null"

[[check]]
name = "second"
value = 1
expect = "> 0"
"#;
        let file = CheckFile::load_string(toml).unwrap();

        let report = run_checks(&file, true);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.skipped, 1);
        assert!(!report.is_success());
        assert!(report.summary().ends_with(", 1 skipped"));

        let report = run_checks(&file, false);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.failed_count(), 1);
    }
}
