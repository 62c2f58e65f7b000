//! Service layer providing activity CRUD on top of models.
//! - Separates business rules (validation, id parsing, pagination) from data access.
//! - Reuses entity definitions and validators from the `models` crate.
//! - Exposes a repository trait with SeaORM and in-memory implementations.

pub mod activity;
pub mod db;
pub mod errors;
pub mod pagination;
#[cfg(test)]
pub mod test_support;
