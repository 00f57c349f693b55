//! Domain services.
//!
//! Services enforce the catalogue invariants (uniqueness, existence,
//! scoping, defaults) on top of the store traits, and are shared by the
//! REST handlers and the gRPC services.

mod project;
mod release;
mod tag;

pub use project::ProjectService;
pub use release::ReleaseService;
pub use tag::TagService;

#[cfg(test)]
pub(crate) mod testing;

use depot_core::error::CoreError;
use depot_db::StoreError;

/// Lift a store failure into the domain taxonomy.
///
/// Unique-constraint violations become conflicts: the uniqueness pre-checks
/// race with concurrent writers, and the partial unique indexes are the
/// backstop that still has to surface as a 409.
pub(crate) fn store_error(err: StoreError) -> CoreError {
    match err {
        StoreError::UniqueViolation { constraint } => CoreError::Conflict(format!(
            "Duplicate value violates unique constraint: {constraint}"
        )),
        StoreError::Database(err) => CoreError::Internal(err.to_string()),
    }
}

pub(crate) fn validation_error(err: validator::ValidationErrors) -> CoreError {
    CoreError::Validation(err.to_string())
}
