//! Database repositories.
//!
//! Each repository holds a shared connection handle and pairs a pure
//! query builder with the async call that executes it.

mod post;
mod report;
mod user;

pub use post::{PostRepository, PostWithRelations, posts_query};
pub use report::{
    PostSummary, ReportFilter, ReportRepository, ReportWithRelations, ReporterSummary,
    reports_query, status_update,
};
pub use user::{UserFilter, UserRepository, users_query};

use moddesk_common::AppError;
use sea_orm::DbErr;
use tracing::error;

/// Log a read-path database error and wrap it as [`AppError::Query`].
pub(crate) fn query_failure(operation: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |e| {
        error!(operation, error = %e, "Database query failed");
        AppError::Query(e.to_string())
    }
}

/// Log a write-path database error and wrap it as [`AppError::Update`].
pub(crate) fn update_failure(operation: &'static str) -> impl FnOnce(DbErr) -> AppError {
    move |e| {
        error!(operation, error = %e, "Database update failed");
        AppError::Update(e.to_string())
    }
}
