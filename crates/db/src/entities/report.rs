//! Report entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Report status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "resolved")]
    Resolved,
    #[sea_orm(string_value = "dismissed")]
    Dismissed,
}

impl ReportStatus {
    /// Whether a report in this status is closed and carries a resolution time.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Resolved | Self::Dismissed)
    }
}

/// Report model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// The reported post; null once the post is deleted.
    pub post_id: Option<String>,
    /// The user who submitted the report.
    pub reporter_id: Option<String>,
    /// Short reason category.
    pub reason: String,
    /// Free-form details from the reporter.
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// Current status of the report.
    pub status: ReportStatus,
    /// Admin who last changed the status.
    pub resolver_admin_id: Option<String>,
    /// When the report reached a terminal status.
    pub resolved_at: Option<DateTimeWithTimeZone>,
    /// When the report was created.
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::post::Entity",
        from = "Column::PostId",
        to = "super::post::Column::Id",
        on_delete = "SetNull"
    )]
    Post,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ReporterId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ResolverAdminId",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Resolver,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(ReportStatus::Resolved.is_terminal());
        assert!(ReportStatus::Dismissed.is_terminal());
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(!ReportStatus::Processing.is_terminal());
    }
}
