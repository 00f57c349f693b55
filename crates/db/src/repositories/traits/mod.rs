//! Store traits abstracting the relational engine.
//!
//! The service layer depends on these traits only; the Postgres
//! implementations live next door, and tests substitute in-memory fakes.

mod project;
mod release;
mod tag;

pub use project::ProjectStore;
pub use release::ReleaseStore;
pub use tag::TagStore;
