//! Field-level validation reporting.

use std::fmt;
use std::ops::RangeInclusive;

/// One rule broken by one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Dotted path of the offending field, e.g. `listData[2].title`
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// A payload failed its schema. No request was sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Creates an error from a non-empty list of violations.
    #[must_use]
    pub const fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Creates an error for a single field.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![Violation {
            field: field.into(),
            message: message.into(),
        }])
    }

    /// Every violation found.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns true if any violation concerns `field` (exact path match).
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Invalid payload: ")?;
        for (i, violation) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Collects violations while walking a payload.
#[derive(Debug, Default)]
pub struct Report {
    scope: String,
    violations: Vec<Violation>,
}

impl Report {
    fn path(&self, field: &str) -> String {
        if self.scope.is_empty() {
            field.to_string()
        } else {
            format!("{}.{field}", self.scope)
        }
    }

    /// Records a violation for `field` in the current scope.
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        let field = self.path(field);
        self.violations.push(Violation {
            field,
            message: message.into(),
        });
    }

    /// Runs `f` with `scope` appended to the field path.
    pub fn scoped(&mut self, scope: &str, f: impl FnOnce(&mut Self)) {
        let outer = std::mem::take(&mut self.scope);
        self.scope = if outer.is_empty() {
            scope.to_string()
        } else {
            format!("{outer}.{scope}")
        };
        f(self);
        self.scope = outer;
    }

    /// Re-records the violations of a nested check under `scope`.
    pub fn nest(&mut self, scope: &str, error: ValidationError) {
        self.scoped(scope, |r| {
            for violation in error.violations {
                r.push(&violation.field, violation.message);
            }
        });
    }

    /// Checks the character count of a string.
    pub fn length(&mut self, field: &str, value: &str, range: RangeInclusive<usize>) {
        let len = value.chars().count();
        if len < *range.start() {
            self.push(
                field,
                format!("must be at least {} character(s)", range.start()),
            );
        } else if len > *range.end() {
            self.push(
                field,
                format!("must be at most {} characters, got {len}", range.end()),
            );
        }
    }

    /// Checks the character count of an optional string, if present.
    pub fn optional_length(&mut self, field: &str, value: Option<&str>, range: RangeInclusive<usize>) {
        if let Some(value) = value {
            self.length(field, value, range);
        }
    }

    /// Checks the number of items in a list.
    pub fn count(&mut self, field: &str, len: usize, range: RangeInclusive<usize>) {
        if !range.contains(&len) {
            let message = if *range.end() == usize::MAX {
                format!("must contain at least {} item(s), got {len}", range.start())
            } else {
                format!(
                    "must contain between {} and {} items, got {len}",
                    range.start(),
                    range.end()
                )
            };
            self.push(field, message);
        }
    }

    /// Checks that a string is an absolute URL.
    pub fn url(&mut self, field: &str, value: &str) {
        if let Err(e) = url::Url::parse(value) {
            self.push(field, format!("must be a valid URL ({e})"));
        }
    }

    /// Converts the collected violations into a result.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if anything was recorded.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }
}

/// A value with structural rules beyond what its type enforces.
pub trait Validate {
    /// Records every broken rule into `report`.
    fn check(&self, report: &mut Report);

    /// Runs [`check`](Self::check) on a fresh report.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every violation found.
    fn validate(&self) -> Result<(), ValidationError> {
        let mut report = Report::default();
        self.check(&mut report);
        report.finish()
    }
}
