//! Core domain logic for outcome curriculum management.
//! This crate is the single source of truth for faculty invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::faculty::{
    parse_name_batch, Faculty, FacultyId, FacultyName, FacultyValidationError, NameRule,
};
pub use repo::faculty_repo::{
    FacultyListQuery, FacultyRepository, RepoError, RepoResult, SqliteFacultyRepository,
};
pub use service::faculty_service::{
    FacultyPage, FacultyService, FacultyServiceError, ServiceResult,
};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
