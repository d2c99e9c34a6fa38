//! Best-effort validation of candidate entities.
//!
//! Candidates are partitioned into valid ones, which get persisted, and rejections, which are
//! logged and reported back to the caller. A rejection never fails the batch it was part of.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("{field} can't be blank")]
    Blank { field: &'static str },
    #[error("{field} is too long (maximum is {max} characters)")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Collects violations of a single candidate.
#[derive(Debug, Default)]
pub struct Checks(Vec<Violation>);

impl Checks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present(mut self, field: &'static str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.0.push(Violation::Blank { field });
        }
        self
    }

    pub fn max_len(mut self, field: &'static str, value: Option<&str>, max: usize) -> Self {
        if value.is_some_and(|value| value.chars().count() > max) {
            self.0.push(Violation::TooLong { field, max });
        }
        self
    }

    pub fn invalid(mut self, field: &'static str, reason: impl Into<String>) -> Self {
        self.0.push(Violation::Invalid {
            field,
            reason: reason.into(),
        });
        self
    }

    pub fn finish(self) -> Vec<Violation> {
        self.0
    }
}

/// A candidate entity which can be checked before persisting it.
pub trait Validate {
    /// The entity class, used in diagnostics.
    const CLASS: &'static str;

    /// Fields identifying the candidate in diagnostics.
    fn identity(&self) -> BTreeMap<&'static str, String>;

    fn violations(&self) -> Vec<Violation>;
}

/// A candidate that was excluded from persistence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub class: &'static str,
    pub identity: BTreeMap<&'static str, String>,
    pub errors: Vec<Violation>,
}

impl Rejection {
    /// A rejection of a candidate which could not even be read. Logs it right away.
    pub fn unreadable(
        class: &'static str,
        identity: BTreeMap<&'static str, String>,
        field: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        let rejection = Self {
            class,
            identity,
            errors: vec![Violation::Invalid {
                field,
                reason: reason.into(),
            }],
        };
        rejection.log();
        rejection
    }

    fn log(&self) {
        let errors = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        tracing::warn!(
            class = self.class,
            identity = ?self.identity,
            errors = ?errors,
            "invalid {} excluded from ingestion",
            self.class
        );
    }
}

#[derive(Debug)]
pub struct Partitioned<T> {
    pub valid: Vec<T>,
    pub rejected: Vec<Rejection>,
}

impl<T> Default for Partitioned<T> {
    fn default() -> Self {
        Self {
            valid: vec![],
            rejected: vec![],
        }
    }
}

/// Split candidates into valid ones and rejections, logging every rejection.
pub fn partition<T, I>(candidates: I) -> Partitioned<T>
where
    T: Validate,
    I: IntoIterator<Item = T>,
{
    let mut valid = Vec::new();
    let mut rejected = Vec::new();

    for candidate in candidates {
        let errors = candidate.violations();
        if errors.is_empty() {
            valid.push(candidate);
        } else {
            let rejection = Rejection {
                class: T::CLASS,
                identity: candidate.identity(),
                errors,
            };
            rejection.log();
            rejected.push(rejection);
        }
    }

    Partitioned { valid, rejected }
}
