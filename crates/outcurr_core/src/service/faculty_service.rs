//! Faculty use-case service.
//!
//! # Responsibility
//! - Validate import batches before touching storage.
//! - Provide list, page and delete entry points with stable error semantics.
//!
//! # Invariants
//! - An import either creates every submitted name or nothing.
//! - Page size defaults to 10, clamps to 100, and `0` is rejected.
//! - Deleting an absent id reports `FacultyNotFound` without side effects.

use crate::model::faculty::{parse_name_batch, Faculty, FacultyId, FacultyValidationError};
use crate::repo::faculty_repo::{FacultyListQuery, FacultyRepository, RepoError};
use log::{info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const FACULTY_PAGE_DEFAULT_SIZE: u32 = 10;
pub const FACULTY_PAGE_MAX_SIZE: u32 = 100;

pub type ServiceResult<T> = Result<T, FacultyServiceError>;

/// Service error for faculty use-cases.
#[derive(Debug)]
pub enum FacultyServiceError {
    /// Import batch failed validation; nothing was written.
    Validation(FacultyValidationError),
    /// Page parameters are unusable.
    InvalidPage(String),
    /// A submitted name already exists in storage; nothing was written.
    NameTaken(String),
    /// Target faculty does not exist.
    FacultyNotFound(FacultyId),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for FacultyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidPage(message) => write!(f, "invalid page request: {message}"),
            Self::NameTaken(name) => write!(f, "faculty already exists: `{name}`"),
            Self::FacultyNotFound(id) => write!(f, "faculty not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FacultyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FacultyValidationError> for FacultyServiceError {
    fn from(value: FacultyValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for FacultyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::FacultyNotFound(id),
            RepoError::DuplicateName(name) => Self::NameTaken(name),
            other => Self::Repo(other),
        }
    }
}

/// One page of faculties in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyPage {
    pub content: Vec<Faculty>,
    /// Zero-based page index that was requested.
    pub page: u32,
    /// Effective page size after normalization.
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

/// Faculty service facade over repository implementations.
pub struct FacultyService<R: FacultyRepository> {
    repo: R,
}

impl<R: FacultyRepository> FacultyService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and imports a batch of faculty names.
    ///
    /// # Contract
    /// - Empty batch, policy violation or in-batch duplicate: `Validation`.
    /// - Name already stored: `NameTaken`.
    /// - Success: created faculties in submission order.
    pub fn import_faculties(&mut self, names: &[String]) -> ServiceResult<Vec<Faculty>> {
        let parsed = parse_name_batch(names).map_err(|err| {
            warn!(
                "event=faculty_import module=service status=rejected reason=validation batch_size={}",
                names.len()
            );
            FacultyServiceError::from(err)
        })?;

        let created = self.repo.insert_faculties(&parsed).map_err(|err| {
            warn!(
                "event=faculty_import module=service status=error batch_size={} error={}",
                parsed.len(),
                err
            );
            FacultyServiceError::from(err)
        })?;

        info!(
            "event=faculty_import module=service status=ok created={}",
            created.len()
        );
        Ok(created)
    }

    /// Lists every faculty in insertion order.
    pub fn list_faculties(&self) -> ServiceResult<Vec<Faculty>> {
        Ok(self.repo.list_faculties(&FacultyListQuery::default())?)
    }

    /// Returns one zero-based page of faculties.
    pub fn page_faculties(&self, page: Option<u32>, size: Option<u32>) -> ServiceResult<FacultyPage> {
        let page = page.unwrap_or(0);
        let size = normalize_page_size(size)?;
        let query = FacultyListQuery {
            limit: Some(size),
            offset: u64::from(page) * u64::from(size),
        };

        let total_elements = self.repo.count_faculties()?;
        let content = if query.offset >= total_elements {
            Vec::new()
        } else {
            self.repo.list_faculties(&query)?
        };

        Ok(FacultyPage {
            content,
            page,
            size,
            total_elements,
            total_pages: total_elements.div_ceil(u64::from(size)),
        })
    }

    /// Deletes one faculty by id.
    pub fn delete_faculty(&self, id: FacultyId) -> ServiceResult<()> {
        self.repo.delete_faculty(id)?;
        info!("event=faculty_delete module=service status=ok fac_id={id}");
        Ok(())
    }
}

/// Normalizes a requested page size.
///
/// `None` maps to the default, values above the maximum are clamped, and `0`
/// is rejected.
pub fn normalize_page_size(size: Option<u32>) -> ServiceResult<u32> {
    match size {
        None => Ok(FACULTY_PAGE_DEFAULT_SIZE),
        Some(0) => Err(FacultyServiceError::InvalidPage(
            "size must be at least 1".to_string(),
        )),
        Some(value) => Ok(value.min(FACULTY_PAGE_MAX_SIZE)),
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_page_size, FacultyServiceError, FACULTY_PAGE_MAX_SIZE};

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(normalize_page_size(None).unwrap(), 10);
        assert_eq!(normalize_page_size(Some(25)).unwrap(), 25);
        assert_eq!(
            normalize_page_size(Some(5_000)).unwrap(),
            FACULTY_PAGE_MAX_SIZE
        );
    }

    #[test]
    fn page_size_zero_is_rejected() {
        let err = normalize_page_size(Some(0)).unwrap_err();
        assert!(matches!(err, FacultyServiceError::InvalidPage(_)));
    }
}
