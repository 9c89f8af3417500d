//! Admin query integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test admin_queries -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `moddesk_test`)
//!   `TEST_DB_PASSWORD` (default: `moddesk_test`)

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{Duration, Utc};
use moddesk_db::{
    entities::{
        post::{self, PostStatus},
        post_tag,
        report::{self, ReportStatus},
        tag,
        user::{self, MembershipTier, UserRole},
    },
    query::Pagination,
    repositories::{
        PostRepository, ReportFilter, ReportRepository, UserFilter, UserRepository,
    },
    test_utils::TestDatabase,
};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, Statement};

async fn insert_user(
    db: &DatabaseConnection,
    id: &str,
    nickname: &str,
    email: &str,
    role: UserRole,
    age_minutes: i64,
) {
    user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(email.to_string()),
        nickname: Set(nickname.to_string()),
        role: Set(role),
        tier: Set(MembershipTier::Free),
        avatar_url: Set(None),
        created_at: Set((Utc::now() - Duration::minutes(age_minutes)).into()),
    }
    .insert(db)
    .await
    .expect("insert user");
}

async fn insert_post(db: &DatabaseConnection, id: &str, user_id: &str, status: PostStatus) {
    post::ActiveModel {
        id: Set(id.to_string()),
        user_id: Set(user_id.to_string()),
        title: Set(format!("Title {id}")),
        content: Set("Body".to_string()),
        status: Set(status),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    }
    .insert(db)
    .await
    .expect("insert post");
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_user_filters_compose() {
    let db = TestDatabase::create_unique().await.expect("create database");
    let conn = db.connection();

    insert_user(conn, "u1", "Annabel", "a@example.com", UserRole::Admin, 1).await;
    insert_user(conn, "u2", "bob", "JoANNe@example.com", UserRole::Member, 2).await;
    insert_user(conn, "u3", "carol", "c@example.com", UserRole::Admin, 3).await;

    let repo = UserRepository::new(db.shared());
    let range = Pagination::default().row_range();

    let by_search = repo
        .list(
            &UserFilter {
                search: Some("ann".to_string()),
                ..Default::default()
            },
            range,
        )
        .await
        .unwrap();
    let ids: Vec<_> = by_search.items.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, ["u1", "u2"]);
    assert_eq!(by_search.count, 2);

    let admins_named_ann = repo
        .list(
            &UserFilter {
                search: Some("ann".to_string()),
                role: Some(UserRole::Admin),
                ..Default::default()
            },
            range,
        )
        .await
        .unwrap();
    assert_eq!(admins_named_ann.count, 1);
    assert_eq!(admins_named_ann.items[0].id, "u1");

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_count_is_independent_of_page() {
    let db = TestDatabase::create_unique().await.expect("create database");
    let conn = db.connection();

    for i in 0..7 {
        let id = format!("u{i}");
        let email = format!("{i}@example.com");
        insert_user(conn, &id, &id, &email, UserRole::Member, i).await;
    }

    let repo = UserRepository::new(db.shared());
    let first = repo
        .list(&UserFilter::default(), Pagination::new(Some(1), Some(5)).row_range())
        .await
        .unwrap();
    let second = repo
        .list(&UserFilter::default(), Pagination::new(Some(2), Some(5)).row_range())
        .await
        .unwrap();

    assert_eq!(first.count, 7);
    assert_eq!(second.count, 7);
    assert_eq!(first.items.len(), 5);
    assert_eq!(second.items.len(), 2);
    assert!(
        first
            .items
            .iter()
            .all(|u| second.items.iter().all(|v| v.id != u.id))
    );

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_out_of_range_pages_return_empty() {
    let db = TestDatabase::create_unique().await.expect("create database");
    let conn = db.connection();

    insert_user(conn, "u1", "ann", "a@example.com", UserRole::Member, 0).await;
    insert_post(conn, "p1", "u1", PostStatus::Pending).await;

    let users = UserRepository::new(db.shared());
    let posts = PostRepository::new(db.shared());
    let reports = ReportRepository::new(db.shared());

    let everything = Pagination::new(Some(1), Some(u64::MAX)).row_range();
    let all_users = users.list(&UserFilter::default(), everything).await.unwrap();
    assert_eq!(all_users.items.len(), 1);
    assert_eq!(all_users.count, 1);

    for pagination in [
        Pagination::new(Some(u64::MAX / 5), Some(10)),
        Pagination::new(Some(u64::MAX), Some(u64::MAX)),
    ] {
        let range = pagination.row_range();

        let page = users.list(&UserFilter::default(), range).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.count, 1);

        let page = posts.list(range).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.count, 1);

        let page = reports.list(ReportFilter::default(), range).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.count, 0);
    }

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_posts_require_owner_and_keep_tagless() {
    let db = TestDatabase::create_unique().await.expect("create database");
    let conn = db.connection();

    insert_user(conn, "u1", "ann", "a@example.com", UserRole::Member, 0).await;
    insert_post(conn, "p1", "u1", PostStatus::Approved).await;
    insert_post(conn, "p2", "u1", PostStatus::NeedsRevision).await;

    tag::ActiveModel {
        id: Set("t1".to_string()),
        name: Set("rust".to_string()),
    }
    .insert(conn)
    .await
    .unwrap();
    post_tag::ActiveModel {
        post_id: Set("p1".to_string()),
        tag_id: Set("t1".to_string()),
    }
    .insert(conn)
    .await
    .unwrap();

    // Orphan a post by dropping the owner FK and pointing it at a missing user.
    conn.execute(Statement::from_string(
        conn.get_database_backend(),
        r"DO $$ DECLARE c text; BEGIN
            FOR c IN SELECT conname FROM pg_constraint
                WHERE conrelid = 'posts'::regclass AND contype = 'f'
            LOOP EXECUTE format('ALTER TABLE posts DROP CONSTRAINT %I', c); END LOOP;
        END $$"
            .to_string(),
    ))
    .await
    .unwrap();
    insert_post(conn, "p3", "ghost", PostStatus::Pending).await;

    let repo = PostRepository::new(db.shared());
    let page = repo.list(Pagination::default().row_range()).await.unwrap();

    let ids: Vec<_> = page.items.iter().map(|p| p.post.id.as_str()).collect();
    assert!(!ids.contains(&"p3"));
    assert_eq!(page.count, 2);

    let p1 = page.items.iter().find(|p| p.post.id == "p1").unwrap();
    assert_eq!(p1.tags.len(), 1);
    let p2 = page.items.iter().find(|p| p.post.id == "p2").unwrap();
    assert!(p2.tags.is_empty());

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_report_status_lifecycle() {
    let db = TestDatabase::create_unique().await.expect("create database");
    let conn = db.connection();

    insert_user(conn, "admin", "root", "root@example.com", UserRole::Admin, 0).await;
    insert_user(conn, "u1", "ann", "a@example.com", UserRole::Member, 0).await;
    insert_post(conn, "p1", "u1", PostStatus::Approved).await;

    report::ActiveModel {
        id: Set("r1".to_string()),
        post_id: Set(Some("p1".to_string())),
        reporter_id: Set(Some("u1".to_string())),
        reason: Set("spam".to_string()),
        description: Set(None),
        status: Set(ReportStatus::Pending),
        resolver_admin_id: Set(None),
        resolved_at: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await
    .unwrap();

    let repo = ReportRepository::new(db.shared());
    assert_eq!(repo.count_pending().await.unwrap(), 1);

    assert_eq!(
        repo.update_status("r1", ReportStatus::Resolved, "admin")
            .await
            .unwrap(),
        1
    );
    let resolved = repo
        .list(ReportFilter::default(), Pagination::default().row_range())
        .await
        .unwrap();
    let r1 = &resolved.items[0];
    assert!(r1.report.resolved_at.is_some());
    assert_eq!(r1.report.resolver_admin_id.as_deref(), Some("admin"));
    assert_eq!(r1.post.as_ref().map(|p| p.title.as_str()), Some("Title p1"));
    assert_eq!(r1.reporter.as_ref().map(|r| r.nickname.as_str()), Some("ann"));

    repo.update_status("r1", ReportStatus::Processing, "admin")
        .await
        .unwrap();
    let processing = repo
        .list(
            ReportFilter {
                status: Some(ReportStatus::Processing),
            },
            Pagination::default().row_range(),
        )
        .await
        .unwrap();
    assert_eq!(processing.count, 1);
    assert!(processing.items[0].report.resolved_at.is_none());

    assert_eq!(
        repo.update_status("missing", ReportStatus::Resolved, "admin")
            .await
            .unwrap(),
        0
    );

    db.drop_database().await.unwrap();
}
