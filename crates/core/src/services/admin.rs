//! Admin service for listing users, posts and reports and moving report status.

use std::sync::Arc;

use moddesk_common::{AppError, AppResult};
use moddesk_db::{
    entities::user,
    query::{Pagination, total_pages},
    repositories::{
        PostRepository, PostWithRelations, ReportFilter, ReportRepository, ReportWithRelations,
        UserFilter, UserRepository,
    },
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub use moddesk_db::entities::{
    post::PostStatus,
    report::ReportStatus,
    user::{MembershipTier, UserRole},
};

/// Parameters for [`AdminService::list_users`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ListUsersParams {
    /// 1-indexed page; missing or zero means the first page.
    pub page: Option<u64>,
    /// Rows per page; missing means 10, zero means 1, capped at `i64::MAX`.
    pub limit: Option<u64>,
    /// Matched against nickname or email, case-insensitively.
    pub search: Option<String>,
    /// Only users with this role.
    pub role: Option<UserRole>,
    /// Only users on this membership tier.
    pub tier: Option<MembershipTier>,
}

/// Parameters for [`AdminService::list_posts`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListPostsParams {
    /// 1-indexed page; missing or zero means the first page.
    pub page: Option<u64>,
    /// Rows per page; missing means 10, zero means 1, capped at `i64::MAX`.
    pub limit: Option<u64>,
}

/// Parameters for [`AdminService::list_reports`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ListReportsParams {
    /// 1-indexed page; missing or zero means the first page.
    pub page: Option<u64>,
    /// Rows per page; missing means 10, zero means 1, capped at `i64::MAX`.
    pub limit: Option<u64>,
    /// Only reports in this status.
    pub status: Option<ReportStatus>,
}

/// A page of users and the total number matching the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserList {
    /// Users in the requested page, newest first.
    pub users: Vec<user::Model>,
    /// Rows matching the filter across all pages.
    pub count: u64,
}

/// A page of posts and the total number of listable posts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostList {
    /// Posts in the requested page, newest first.
    pub posts: Vec<PostWithRelations>,
    /// Rows matching the filter across all pages.
    pub count: u64,
}

/// A page of reports and the total number matching the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportList {
    /// Reports in the requested page, newest first.
    pub reports: Vec<ReportWithRelations>,
    /// Rows matching the filter across all pages.
    pub count: u64,
}

macro_rules! impl_total_pages {
    ($($list:ty),*) => {$(
        impl $list {
            /// Pages needed to show every matching row at `limit` per page.
            #[must_use]
            pub const fn total_pages(&self, limit: u64) -> u64 {
                total_pages(self.count, limit)
            }
        }
    )*};
}

impl_total_pages!(UserList, PostList, ReportList);

/// Outcome of a status mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub success: bool,
}

impl StatusUpdate {
    const SUCCESS: Self = Self { success: true };
}

/// Admin service backing the moderation dashboard.
#[derive(Clone)]
pub struct AdminService {
    user_repo: UserRepository,
    post_repo: PostRepository,
    report_repo: ReportRepository,
}

impl AdminService {
    /// Create a new admin service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        post_repo: PostRepository,
        report_repo: ReportRepository,
    ) -> Self {
        Self {
            user_repo,
            post_repo,
            report_repo,
        }
    }

    /// Create an admin service whose repositories share `db`.
    #[must_use]
    pub fn from_connection(db: Arc<DatabaseConnection>) -> Self {
        Self::new(
            UserRepository::new(db.clone()),
            PostRepository::new(db.clone()),
            ReportRepository::new(db),
        )
    }

    // ========== Reads ==========

    /// List users, newest first.
    pub async fn list_users(&self, params: ListUsersParams) -> AppResult<UserList> {
        let pagination = Pagination::new(params.page, params.limit);
        let range = pagination.row_range();
        debug!(
            page = pagination.page(),
            limit = pagination.limit(),
            start = range.start(),
            end = range.end(),
            "Listing users"
        );

        let filter = UserFilter {
            search: params.search,
            role: params.role,
            tier: params.tier,
        };
        let page = self.user_repo.list(&filter, range).await?;

        Ok(UserList {
            users: page.items,
            count: page.count,
        })
    }

    /// List posts of every status with owner and tags, newest first.
    pub async fn list_posts(&self, params: ListPostsParams) -> AppResult<PostList> {
        let pagination = Pagination::new(params.page, params.limit);
        let range = pagination.row_range();
        debug!(
            page = pagination.page(),
            limit = pagination.limit(),
            start = range.start(),
            end = range.end(),
            "Listing posts"
        );

        let page = self.post_repo.list(range).await?;

        Ok(PostList {
            posts: page.items,
            count: page.count,
        })
    }

    /// List reports with post and reporter projections, newest first.
    pub async fn list_reports(&self, params: ListReportsParams) -> AppResult<ReportList> {
        let pagination = Pagination::new(params.page, params.limit);
        let range = pagination.row_range();
        debug!(
            page = pagination.page(),
            limit = pagination.limit(),
            start = range.start(),
            end = range.end(),
            status = ?params.status,
            "Listing reports"
        );

        let page = self
            .report_repo
            .list(
                ReportFilter {
                    status: params.status,
                },
                range,
            )
            .await?;

        Ok(ReportList {
            reports: page.items,
            count: page.count,
        })
    }

    /// Count reports still waiting for a moderator.
    pub async fn count_pending_reports(&self) -> AppResult<u64> {
        self.report_repo.count_pending().await
    }

    // ========== Writes ==========

    /// Move a report to `status`, recording `admin_id` as the resolver.
    ///
    /// Fails with [`AppError::NotFound`] when no report has `report_id`.
    pub async fn update_report_status(
        &self,
        report_id: &str,
        status: ReportStatus,
        admin_id: &str,
    ) -> AppResult<StatusUpdate> {
        if report_id.trim().is_empty() {
            return Err(AppError::NotFound("Report id is empty".to_string()));
        }

        let affected = self
            .report_repo
            .update_status(report_id, status, admin_id)
            .await?;

        if affected == 0 {
            return Err(AppError::NotFound(format!("Report {report_id} not found")));
        }

        info!(report_id, ?status, admin_id, "Report status updated");
        Ok(StatusUpdate::SUCCESS)
    }

    /// Acknowledge a post status change without persisting it.
    pub async fn update_post_status(
        &self,
        post_id: &str,
        status: PostStatus,
    ) -> AppResult<StatusUpdate> {
        // TODO: write `posts.status` once the post review workflow is signed off.
        warn!(post_id, ?status, "Post status update acknowledged but not persisted");
        Ok(StatusUpdate::SUCCESS)
    }
}
