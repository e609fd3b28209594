//! Faculty repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide batch insert, read, list and delete over `faculties` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - A batch insert runs in one immediate transaction: all rows or none.
//! - Listing order is insertion order (`id ASC`).
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::faculty::{Faculty, FacultyId, FacultyName};
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, ErrorCode, OptionalExtension, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const FACULTY_SELECT_SQL: &str = "SELECT id, name, created_at FROM faculties";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for faculty persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(FacultyId),
    /// A faculty with this name (ignoring ASCII case) already exists.
    DuplicateName(String),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "faculty not found: {id}"),
            Self::DuplicateName(name) => write!(f, "faculty already exists: `{name}`"),
            Self::InvalidData(message) => write!(f, "invalid persisted faculty data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing faculties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FacultyListQuery {
    /// Maximum rows to return; `None` means unbounded.
    pub limit: Option<u32>,
    /// Number of rows to skip.
    pub offset: u64,
}

/// Repository interface for faculty operations.
pub trait FacultyRepository {
    /// Inserts all names atomically and returns the created rows in order.
    fn insert_faculties(&mut self, names: &[FacultyName]) -> RepoResult<Vec<Faculty>>;
    fn get_faculty(&self, id: FacultyId) -> RepoResult<Option<Faculty>>;
    fn list_faculties(&self, query: &FacultyListQuery) -> RepoResult<Vec<Faculty>>;
    fn count_faculties(&self) -> RepoResult<u64>;
    /// Hard-deletes one faculty; `NotFound` when the id is absent.
    fn delete_faculty(&self, id: FacultyId) -> RepoResult<()>;
}

/// SQLite-backed faculty repository.
pub struct SqliteFacultyRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteFacultyRepository<'conn> {
    /// Wraps a migrated connection obtained from `open_db*`.
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }
}

impl FacultyRepository for SqliteFacultyRepository<'_> {
    fn insert_faculties(&mut self, names: &[FacultyName]) -> RepoResult<Vec<Faculty>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut created = Vec::with_capacity(names.len());

        for name in names {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM faculties WHERE name = ?1 COLLATE NOCASE);",
                [name.as_str()],
                |row| row.get(0),
            )?;
            if exists {
                return Err(RepoError::DuplicateName(name.to_string()));
            }

            let faculty = tx
                .query_row(
                    "INSERT INTO faculties (name) VALUES (?1)
                     RETURNING id, name, created_at;",
                    [name.as_str()],
                    |row| Ok(parse_faculty_row(row)),
                )
                .map_err(|err| map_unique_violation(err, name))??;
            created.push(faculty);
        }

        tx.commit()?;
        Ok(created)
    }

    fn get_faculty(&self, id: FacultyId) -> RepoResult<Option<Faculty>> {
        let row = self
            .conn
            .query_row(
                &format!("{FACULTY_SELECT_SQL} WHERE id = ?1;"),
                [id],
                |row| Ok(parse_faculty_row(row)),
            )
            .optional()?;
        row.transpose()
    }

    fn list_faculties(&self, query: &FacultyListQuery) -> RepoResult<Vec<Faculty>> {
        let mut sql = format!("{FACULTY_SELECT_SQL} ORDER BY id ASC");
        let mut bind_values: Vec<Value> = Vec::new();
        let offset = i64::try_from(query.offset)
            .map_err(|_| RepoError::InvalidData(format!("offset {} out of range", query.offset)))?;

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
            if offset > 0 {
                sql.push_str(" OFFSET ?");
                bind_values.push(Value::Integer(offset));
            }
        } else if offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            bind_values.push(Value::Integer(offset));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut faculties = Vec::new();

        while let Some(row) = rows.next()? {
            faculties.push(parse_faculty_row(row)?);
        }

        Ok(faculties)
    }

    fn count_faculties(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM faculties;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative faculty count {count}")))
    }

    fn delete_faculty(&self, id: FacultyId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM faculties WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }
}

fn parse_faculty_row(row: &Row<'_>) -> RepoResult<Faculty> {
    let fac_id: FacultyId = row.get("id")?;
    let stored_name: String = row.get("name")?;
    let name = FacultyName::parse(&stored_name).map_err(|rule| {
        RepoError::InvalidData(format!(
            "faculty {fac_id} has invalid name `{stored_name}`: {rule}"
        ))
    })?;

    Ok(Faculty {
        fac_id,
        fac_name: name.as_str().to_string(),
        created_at: row.get("created_at")?,
    })
}

// Unique index hit; the EXISTS probe normally reports duplicates first.
fn map_unique_violation(err: rusqlite::Error, name: &FacultyName) -> RepoError {
    if let rusqlite::Error::SqliteFailure(failure, _) = &err {
        if failure.code == ErrorCode::ConstraintViolation {
            return RepoError::DuplicateName(name.to_string());
        }
    }
    err.into()
}
