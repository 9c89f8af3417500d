//! Report repository.

use std::sync::Arc;

use crate::entities::{
    Report, post,
    report::{self, ReportStatus},
    user,
};
use crate::query::{Page, RowRange, WithRowRange};
use moddesk_common::AppResult;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, QueryTrait, RelationTrait, Select, Set,
    prelude::DateTimeWithTimeZone,
};
use serde::Serialize;

use super::{query_failure, update_failure};

/// Filters accepted by the admin report listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    /// Exact status match.
    pub status: Option<ReportStatus>,
}

/// The reported post, reduced to what the report list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    /// Post id.
    pub id: String,
    /// Post title.
    pub title: String,
}

/// The reporting user, reduced to what the report list shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReporterSummary {
    /// User id.
    pub id: String,
    /// Display name.
    pub nickname: String,
}

/// A report with its post and reporter projections.
///
/// Either projection is `None` when the referenced row is gone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportWithRelations {
    /// The report row itself.
    #[serde(flatten)]
    pub report: report::Model,
    /// Reported post, if it still exists.
    pub post: Option<PostSummary>,
    /// Reporting user, if they still exist.
    pub reporter: Option<ReporterSummary>,
}

/// Flat row produced by [`reports_query`].
#[derive(Debug, FromQueryResult)]
struct ReportRow {
    id: String,
    post_id: Option<String>,
    reporter_id: Option<String>,
    reason: String,
    description: Option<String>,
    status: ReportStatus,
    resolver_admin_id: Option<String>,
    resolved_at: Option<DateTimeWithTimeZone>,
    created_at: DateTimeWithTimeZone,
    joined_post_id: Option<String>,
    post_title: Option<String>,
    joined_reporter_id: Option<String>,
    reporter_nickname: Option<String>,
}

impl From<ReportRow> for ReportWithRelations {
    fn from(row: ReportRow) -> Self {
        let post = row
            .joined_post_id
            .zip(row.post_title)
            .map(|(id, title)| PostSummary { id, title });
        let reporter = row
            .joined_reporter_id
            .zip(row.reporter_nickname)
            .map(|(id, nickname)| ReporterSummary { id, nickname });

        Self {
            report: report::Model {
                id: row.id,
                post_id: row.post_id,
                reporter_id: row.reporter_id,
                reason: row.reason,
                description: row.description,
                status: row.status,
                resolver_admin_id: row.resolver_admin_id,
                resolved_at: row.resolved_at,
                created_at: row.created_at,
            },
            post,
            reporter,
        }
    }
}

/// Build the report listing query, newest first.
///
/// Post and reporter are left-joined so reports outlive the rows they point at.
#[must_use]
pub fn reports_query(filter: ReportFilter) -> Select<report::Entity> {
    Report::find()
        .join(JoinType::LeftJoin, report::Relation::Post.def())
        .join(JoinType::LeftJoin, report::Relation::Reporter.def())
        .column_as(post::Column::Id, "joined_post_id")
        .column_as(post::Column::Title, "post_title")
        .column_as(user::Column::Id, "joined_reporter_id")
        .column_as(user::Column::Nickname, "reporter_nickname")
        .apply_if(filter.status, |query, status| {
            query.filter(report::Column::Status.eq(status))
        })
        .order_by_desc(report::Column::CreatedAt)
}

/// Partial update moving a report to `status` on behalf of `admin_id`.
///
/// `resolved_at` is stamped with `now` for resolved/dismissed and cleared otherwise.
#[must_use]
pub fn status_update(
    status: ReportStatus,
    admin_id: &str,
    now: DateTimeWithTimeZone,
) -> report::ActiveModel {
    report::ActiveModel {
        status: Set(status),
        resolver_admin_id: Set(Some(admin_id.to_string())),
        resolved_at: Set(status.is_terminal().then_some(now)),
        ..Default::default()
    }
}

/// Report repository for database operations.
#[derive(Clone)]
pub struct ReportRepository {
    db: Arc<DatabaseConnection>,
}

impl ReportRepository {
    /// Create a new report repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List one page of reports matching `filter` plus the total match count.
    pub async fn list(
        &self,
        filter: ReportFilter,
        range: RowRange,
    ) -> AppResult<Page<ReportWithRelations>> {
        let query = reports_query(filter);

        let rows = query
            .clone()
            .with_row_range(range)
            .into_model::<ReportRow>()
            .all(self.db.as_ref())
            .await
            .map_err(query_failure("list_reports"))?;

        let count = query
            .count(self.db.as_ref())
            .await
            .map_err(query_failure("list_reports"))?;

        Ok(Page {
            items: rows.into_iter().map(ReportWithRelations::from).collect(),
            count,
        })
    }

    /// Apply [`status_update`] to the report with `id`.
    ///
    /// Returns the number of rows the database reports as changed.
    pub async fn update_status(
        &self,
        id: &str,
        status: ReportStatus,
        admin_id: &str,
    ) -> AppResult<u64> {
        let result = Report::update_many()
            .set(status_update(status, admin_id, chrono::Utc::now().into()))
            .filter(report::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(update_failure("update_report_status"))?;

        Ok(result.rows_affected)
    }

    /// Count reports still waiting for a moderator.
    pub async fn count_pending(&self) -> AppResult<u64> {
        Report::find()
            .filter(report::Column::Status.eq(ReportStatus::Pending))
            .count(self.db.as_ref())
            .await
            .map_err(query_failure("count_pending_reports"))
    }
}
