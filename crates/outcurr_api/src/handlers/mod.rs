//! Request handlers bound by the route table.

pub mod faculties;
pub mod health;
