//! User repository.

use std::sync::Arc;

use crate::entities::{
    User,
    user::{self, MembershipTier, UserRole},
};
use crate::query::{Page, RowRange, WithRowRange};
use moddesk_common::AppResult;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QueryTrait, Select,
    sea_query::{Expr, Func},
};

use super::query_failure;

/// Filters accepted by the admin user listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// Case-insensitive substring matched against nickname or email.
    pub search: Option<String>,
    /// Exact role match.
    pub role: Option<UserRole>,
    /// Exact membership tier match.
    pub tier: Option<MembershipTier>,
}

/// Build the user listing query for `filter`, newest first.
///
/// The search group is ORed internally and ANDed with the role and tier filters.
#[must_use]
pub fn users_query(filter: &UserFilter) -> Select<user::Entity> {
    User::find()
        .apply_if(search_condition(filter.search.as_deref()), |query, condition| {
            query.filter(condition)
        })
        .apply_if(filter.role, |query, role| {
            query.filter(user::Column::Role.eq(role))
        })
        .apply_if(filter.tier, |query, tier| {
            query.filter(user::Column::Tier.eq(tier))
        })
        .order_by_desc(user::Column::CreatedAt)
}

fn search_condition(search: Option<&str>) -> Option<Condition> {
    let search = search.map(str::trim).filter(|s| !s.is_empty())?;
    let pattern = like_pattern(search);

    Some(
        Condition::any()
            .add(lower(user::Column::Nickname).like(pattern.clone()))
            .add(lower(user::Column::Email).like(pattern)),
    )
}

fn lower(column: user::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col((User, column))))
}

/// `%needle%` over the lowercased input, with LIKE wildcards escaped.
fn like_pattern(search: &str) -> String {
    let escaped = search
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
}

impl UserRepository {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List one page of users matching `filter` plus the total match count.
    pub async fn list(&self, filter: &UserFilter, range: RowRange) -> AppResult<Page<user::Model>> {
        let query = users_query(filter);

        let items = query
            .clone()
            .with_row_range(range)
            .all(self.db.as_ref())
            .await
            .map_err(query_failure("list_users"))?;

        let count = query
            .count(self.db.as_ref())
            .await
            .map_err(query_failure("list_users"))?;

        Ok(Page { items, count })
    }
}
