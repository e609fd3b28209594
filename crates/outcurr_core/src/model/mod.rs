//! Domain model for curriculum management records.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep input policies next to the types they protect.
//!
//! # Invariants
//! - Every faculty is identified by a storage-assigned `FacultyId`.
//! - Deletion is a hard delete; ids are never handed out twice.

pub mod faculty;
