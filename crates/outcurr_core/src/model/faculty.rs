//! Faculty domain model and name policy.
//!
//! # Responsibility
//! - Define the canonical faculty record returned to API callers.
//! - Own the allowed-name policy applied before any persistence.
//! - Validate import batches as a whole (all-or-nothing).
//!
//! # Invariants
//! - `fac_id` is assigned by storage and never changes afterwards.
//! - A `FacultyName` value always satisfies the name policy.
//! - A batch either parses completely or yields exactly one error.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned faculty identifier.
pub type FacultyId = i64;

/// Upper bound on normalized name length, counted in chars.
pub const FACULTY_NAME_MAX_CHARS: usize = 120;

// Letters (any script), combining marks, spaces and the punctuation commonly
// found in institution names. Must start with a letter.
static FACULTY_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\p{L}[\p{L}\p{M} .,'&()\-]*$").expect("valid faculty name regex")
});
static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Persisted faculty record.
///
/// Wire names follow the external contract (`facId`, `facName`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faculty {
    /// Stable numeric id, never reused after deletion.
    pub fac_id: FacultyId,
    /// Normalized display name.
    pub fac_name: String,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

/// Single-name policy violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Name is empty after whitespace normalization.
    Empty,
    /// Name exceeds `FACULTY_NAME_MAX_CHARS`.
    TooLong { max: usize },
    /// Name contains digits or symbols outside the allowed set.
    DisallowedCharacters,
}

impl Display for NameRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "name must not be empty"),
            Self::TooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::DisallowedCharacters => write!(
                f,
                "name must start with a letter and contain only letters, spaces and . , ' - & ( )"
            ),
        }
    }
}

/// Batch validation error for faculty imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacultyValidationError {
    /// The batch has no names at all.
    EmptyBatch,
    /// One name violates the name policy.
    InvalidName {
        index: usize,
        name: String,
        rule: NameRule,
    },
    /// Two names in the batch collide ignoring ASCII case.
    DuplicateName { index: usize, name: String },
}

impl Display for FacultyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyBatch => write!(f, "faculty name list must not be empty"),
            Self::InvalidName { index, name, rule } => {
                write!(f, "invalid faculty name at position {index} (`{name}`): {rule}")
            }
            Self::DuplicateName { index, name } => {
                write!(f, "duplicate faculty name at position {index}: `{name}`")
            }
        }
    }
}

impl Error for FacultyValidationError {}

/// Faculty name that passed normalization and the name policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FacultyName(String);

impl FacultyName {
    /// Normalizes and validates one candidate name.
    ///
    /// Normalization trims the value and collapses inner whitespace runs to a
    /// single space before the policy is checked.
    pub fn parse(raw: &str) -> Result<Self, NameRule> {
        let collapsed = WHITESPACE_RE.replace_all(raw.trim(), " ");
        if collapsed.is_empty() {
            return Err(NameRule::Empty);
        }
        if collapsed.chars().count() > FACULTY_NAME_MAX_CHARS {
            return Err(NameRule::TooLong {
                max: FACULTY_NAME_MAX_CHARS,
            });
        }
        if !FACULTY_NAME_RE.is_match(&collapsed) {
            return Err(NameRule::DisallowedCharacters);
        }
        Ok(Self(collapsed.into_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for case-insensitive uniqueness, matching SQLite `NOCASE`.
    fn folded(&self) -> String {
        self.0.to_ascii_lowercase()
    }
}

impl Display for FacultyName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validates a whole import batch.
///
/// Returns names in submission order, or the first violation found.
pub fn parse_name_batch(names: &[String]) -> Result<Vec<FacultyName>, FacultyValidationError> {
    if names.is_empty() {
        return Err(FacultyValidationError::EmptyBatch);
    }

    let mut seen = HashSet::with_capacity(names.len());
    let mut parsed = Vec::with_capacity(names.len());
    for (index, raw) in names.iter().enumerate() {
        let name = FacultyName::parse(raw).map_err(|rule| FacultyValidationError::InvalidName {
            index,
            name: raw.clone(),
            rule,
        })?;
        if !seen.insert(name.folded()) {
            return Err(FacultyValidationError::DuplicateName {
                index,
                name: name.0,
            });
        }
        parsed.push(name);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::{parse_name_batch, FacultyName, FacultyValidationError, NameRule};

    #[test]
    fn parse_collapses_whitespace() {
        let name = FacultyName::parse("  Ciencias   de la\tSalud ").unwrap();
        assert_eq!(name.as_str(), "Ciencias de la Salud");
    }

    #[test]
    fn parse_accepts_diacritics_and_punctuation() {
        for raw in [
            "Facultad de Ingeniería, Diseño y Ciencias Aplicadas",
            "Law & Political Science",
            "Escuela de Ciencias de la Educación (Sede Pance)",
            "O'Neill School",
            "Bio-Engineering",
        ] {
            assert!(FacultyName::parse(raw).is_ok(), "{raw} should be accepted");
        }
    }

    #[test]
    fn parse_rejects_symbols_and_digits() {
        assert_eq!(
            FacultyName::parse("Invalid Faculty Name 123!@#"),
            Err(NameRule::DisallowedCharacters)
        );
        assert_eq!(
            FacultyName::parse("Faculty 2"),
            Err(NameRule::DisallowedCharacters)
        );
        assert_eq!(
            FacultyName::parse("-Leading dash"),
            Err(NameRule::DisallowedCharacters)
        );
    }

    #[test]
    fn parse_rejects_blank_and_oversized_names() {
        assert_eq!(FacultyName::parse("   "), Err(NameRule::Empty));
        let long = "a".repeat(121);
        assert!(matches!(
            FacultyName::parse(&long),
            Err(NameRule::TooLong { max: 120 })
        ));
    }

    #[test]
    fn batch_reports_position_of_first_invalid_name() {
        let names = vec![
            "Ciencias de la Salud".to_string(),
            "Bad!".to_string(),
            "Also bad #".to_string(),
        ];
        let err = parse_name_batch(&names).unwrap_err();
        assert!(matches!(
            err,
            FacultyValidationError::InvalidName { index: 1, .. }
        ));
    }

    #[test]
    fn batch_rejects_case_insensitive_duplicates() {
        let names = vec!["Ciencias".to_string(), "CIENCIAS".to_string()];
        let err = parse_name_batch(&names).unwrap_err();
        assert!(matches!(
            err,
            FacultyValidationError::DuplicateName { index: 1, .. }
        ));
    }
}
