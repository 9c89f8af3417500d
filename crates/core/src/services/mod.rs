//! Service layer.

pub mod admin;

pub use admin::{
    AdminService, ListPostsParams, ListReportsParams, ListUsersParams, MembershipTier, PostList,
    PostStatus, ReportList, ReportStatus, StatusUpdate, UserList, UserRole,
};
