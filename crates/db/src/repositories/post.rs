//! Post repository.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Post, PostTag, Tag, User, post, post_tag, tag, user};
use crate::query::{Page, RowRange, WithRowRange};
use moddesk_common::AppResult;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use serde::Serialize;

use super::query_failure;

/// A post with its owner and tags embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostWithRelations {
    /// The post row itself.
    #[serde(flatten)]
    pub post: post::Model,
    /// Author of the post.
    pub owner: user::Model,
    /// Empty when the post has no tags.
    pub tags: Vec<tag::Model>,
}

/// Build the post listing query, newest first.
///
/// Owners are inner-joined, so posts whose owner row is missing never match.
/// Every status is included.
#[must_use]
pub fn posts_query() -> Select<post::Entity> {
    Post::find()
        .join(JoinType::InnerJoin, post::Relation::Owner.def())
        .order_by_desc(post::Column::CreatedAt)
}

/// Post repository for database operations.
#[derive(Clone)]
pub struct PostRepository {
    db: Arc<DatabaseConnection>,
}

impl PostRepository {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// List one page of posts with owners and tags, plus the total count.
    pub async fn list(&self, range: RowRange) -> AppResult<Page<PostWithRelations>> {
        let query = posts_query();

        let rows = query
            .clone()
            .select_also(User)
            .with_row_range(range)
            .all(self.db.as_ref())
            .await
            .map_err(query_failure("list_posts"))?;

        let count = query
            .count(self.db.as_ref())
            .await
            .map_err(query_failure("list_posts"))?;

        let post_ids: Vec<String> = rows.iter().map(|(post, _)| post.id.clone()).collect();
        let mut tags = self.tags_by_post(post_ids).await?;

        let items = rows
            .into_iter()
            .filter_map(|(post, owner)| {
                let owner = owner?;
                let tags = tags.remove(&post.id).unwrap_or_default();
                Some(PostWithRelations { post, owner, tags })
            })
            .collect();

        Ok(Page { items, count })
    }

    /// Tags for each of `post_ids`, alphabetical within a post.
    async fn tags_by_post(
        &self,
        post_ids: Vec<String>,
    ) -> AppResult<HashMap<String, Vec<tag::Model>>> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let links = PostTag::find()
            .filter(post_tag::Column::PostId.is_in(post_ids))
            .find_also_related(Tag)
            .order_by_asc(tag::Column::Name)
            .all(self.db.as_ref())
            .await
            .map_err(query_failure("list_posts"))?;

        let mut by_post: HashMap<String, Vec<tag::Model>> = HashMap::new();
        for (link, tag) in links {
            if let Some(tag) = tag {
                by_post.entry(link.post_id).or_default().push(tag);
            }
        }

        Ok(by_post)
    }
}
