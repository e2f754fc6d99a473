//! Comment pipeline: moderation, sanitising and notifications

use blog_core::{Comment, CommentType};
use blog_service::{
    CommentService, CreateCommentRequest, ServiceError, COMMENT_REMINDER_SUBJECT,
    MODERATION_REMINDER_SUBJECT,
};
use chrono::Utc;
use integration_tests::{
    article_comment, website_config, TestHarness, ADMIN_EMAIL, ADMIN_ID, WEBSITE_URL,
};

const AUTHOR_ID: i64 = 20;
const COMMENTER_ID: i64 = 30;

fn harness_with_article(comment_review: bool) -> TestHarness {
    let harness = TestHarness::builder()
        .website_config(website_config(comment_review, false, true))
        .build();
    harness.directory.add_article(7, AUTHOR_ID);
    harness.directory.add_user(AUTHOR_ID, Some("author@example.com"));
    harness.directory.add_user(COMMENTER_ID, Some("reader@example.com"));
    harness
}

fn published_comment(comment_type: CommentType, reply_user_id: Option<i64>, topic_id: Option<i64>) -> Comment {
    Comment {
        id: 100,
        user_id: COMMENTER_ID,
        reply_user_id,
        topic_id,
        parent_id: None,
        comment_type,
        content: "hello".to_string(),
        is_review: true,
        created_at: Utc::now(),
        updated_at: None,
    }
}

#[tokio::test]
async fn test_review_enabled_saves_unpublished() {
    let harness = harness_with_article(true);

    let saved = CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "first!"))
        .await
        .unwrap();

    assert!(!saved.is_review);
    assert!(!harness.comments.all()[0].is_review);
}

#[tokio::test]
async fn test_review_disabled_saves_published() {
    let harness = harness_with_article(false);

    let saved = CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "first!"))
        .await
        .unwrap();

    assert!(saved.is_review);
    assert_eq!(saved.user_id, COMMENTER_ID);
    assert_eq!(saved.comment_type, CommentType::Article);
}

#[tokio::test]
async fn test_publish_failure_does_not_fail_submission() {
    let harness = TestHarness::builder()
        .failing_publisher()
        .website_config(website_config(false, false, true))
        .build();
    harness.directory.add_article(7, AUTHOR_ID);
    harness.directory.add_user(AUTHOR_ID, Some("author@example.com"));

    let saved = CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "still saved"))
        .await
        .unwrap();

    assert_eq!(saved.content, "still saved");
    harness.wait_for_notifications().await;
    assert_eq!(harness.failing_publisher.attempts(), 1);
    assert_eq!(harness.ctx().notifications().stats().failed, 1);
    assert_eq!(harness.comments.all().len(), 1);
}

#[tokio::test]
async fn test_published_comment_notifies_article_author() {
    let harness = harness_with_article(false);

    CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "nice post"))
        .await
        .unwrap();
    harness.wait_for_notifications().await;

    let published = harness.publisher.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].exchange, "email_exchange");
    assert_eq!(published[0].routing_key, "email");

    let job = published[0].job();
    assert_eq!(job.email, "author@example.com");
    assert_eq!(job.subject, COMMENT_REMINDER_SUBJECT);
    assert!(job.content.contains(&format!("{WEBSITE_URL}/articles/7")));
}

#[tokio::test]
async fn test_pending_comment_notifies_admin() {
    let harness = harness_with_article(true);

    CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "needs review"))
        .await
        .unwrap();
    harness.wait_for_notifications().await;

    let jobs = harness.publisher.jobs();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].email, ADMIN_EMAIL);
    assert_eq!(jobs[0].subject, MODERATION_REMINDER_SUBJECT);
}

#[tokio::test]
async fn test_email_notice_disabled_publishes_nothing() {
    let harness = TestHarness::builder()
        .website_config(website_config(false, false, false))
        .build();
    harness.directory.add_article(7, AUTHOR_ID);
    harness.directory.add_user(AUTHOR_ID, Some("author@example.com"));

    CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "quiet"))
        .await
        .unwrap();
    harness.wait_for_notifications().await;

    assert!(harness.publisher.published().is_empty());
}

#[tokio::test]
async fn test_reply_target_wins_for_every_type() {
    let harness = harness_with_article(false);
    harness.directory.add_user(42, Some("replied@example.com"));
    harness.directory.add_talk(3, AUTHOR_ID);
    let dispatcher = harness.ctx().dispatcher();

    for (comment_type, topic) in [
        (CommentType::Article, Some(7)),
        (CommentType::Talk, Some(3)),
        (CommentType::Link, None),
        (CommentType::Article, Some(404)),
    ] {
        let comment = published_comment(comment_type, Some(42), topic);
        assert_eq!(dispatcher.resolve_recipient(&comment).await.unwrap(), 42);

        let job = dispatcher.build_job(&comment).await.unwrap();
        assert_eq!(job.email, "replied@example.com");
    }
}

#[tokio::test]
async fn test_zero_reply_user_falls_back_to_author() {
    let harness = harness_with_article(false);
    harness.directory.add_talk(3, 55);

    let dispatcher = harness.ctx().dispatcher();
    let comment = published_comment(CommentType::Talk, Some(0), Some(3));
    assert_eq!(dispatcher.resolve_recipient(&comment).await.unwrap(), 55);
}

#[tokio::test]
async fn test_link_comment_without_reply_is_unsupported() {
    let harness = harness_with_article(false);
    let dispatcher = harness.ctx().dispatcher();

    let err = dispatcher
        .notify(&published_comment(CommentType::Link, None, None))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::UnsupportedCommentType(CommentType::Link)));
    assert!(harness.publisher.published().is_empty());
}

#[tokio::test]
async fn test_recipient_without_email() {
    let harness = harness_with_article(false);
    harness.directory.add_user(42, None);

    let err = harness
        .ctx()
        .dispatcher()
        .build_job(&published_comment(CommentType::Article, Some(42), Some(7)))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NoRecipientEmail { user_id: Some(42) }));
}

#[tokio::test]
async fn test_missing_article_has_no_recipient() {
    let harness = harness_with_article(false);

    let err = harness
        .ctx()
        .dispatcher()
        .resolve_recipient(&published_comment(CommentType::Article, None, Some(404)))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::NoRecipientEmail { user_id: None }));
}

#[tokio::test]
async fn test_content_is_sanitised_before_storage() {
    let harness = harness_with_article(false);

    let saved = CommentService::new(harness.ctx())
        .submit_comment(
            Some(COMMENTER_ID),
            article_comment(
                7,
                r#"hi<script>alert(1)</script><img src="https://cdn.example.com/a.png" onerror="alert(1)">"#,
            ),
        )
        .await
        .unwrap();

    assert!(!saved.content.contains("<script"));
    assert!(!saved.content.contains("onerror"));
    assert_eq!(saved.content, r#"hi<img src="https://cdn.example.com/a.png">"#);
}

#[tokio::test]
async fn test_sensitive_words_are_masked() {
    let harness = TestHarness::builder().sensitive_words(&["spam"]).build();
    harness.directory.add_article(7, AUTHOR_ID);

    let saved = CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "buy SPAM now"))
        .await
        .unwrap();

    assert_eq!(saved.content, "buy **** now");
}

#[tokio::test]
async fn test_markup_only_comment_is_rejected() {
    let harness = harness_with_article(false);

    let err = CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "<script>x</script>"))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(harness.comments.all().is_empty());
}

#[tokio::test]
async fn test_anonymous_comment_is_rejected() {
    let harness = harness_with_article(false);

    let err = CommentService::new(harness.ctx())
        .submit_comment(None, article_comment(7, "who am I"))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Unauthenticated));
    assert!(harness.comments.all().is_empty());
}

#[tokio::test]
async fn test_article_comment_requires_topic() {
    let harness = harness_with_article(false);
    let request = CreateCommentRequest {
        topic_id: None,
        ..article_comment(7, "orphan")
    };

    let err = CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), request)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), 400);
}

#[tokio::test]
async fn test_database_outage_propagates() {
    let harness = harness_with_article(false);
    harness.comments.set_failing(true);

    let err = CommentService::new(harness.ctx())
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "lost"))
        .await
        .unwrap_err();

    assert!(err.is_store_unavailable());
    harness.wait_for_notifications().await;
    assert!(harness.publisher.published().is_empty());
}

#[tokio::test]
async fn test_admin_review_and_delete() {
    let harness = harness_with_article(true);
    let service = CommentService::new(harness.ctx());

    let first = service
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "one"))
        .await
        .unwrap();
    let second = service
        .submit_comment(Some(COMMENTER_ID), article_comment(7, "two"))
        .await
        .unwrap();

    let err = service
        .review_comments(Some(COMMENTER_ID), &[first.id], true)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied(_)));

    let affected = service
        .review_comments(Some(ADMIN_ID), &[first.id, first.id, second.id], true)
        .await
        .unwrap();
    assert_eq!(affected, 2);
    assert!(harness.comments.all().iter().all(|c| c.is_review));

    let removed = service
        .remove_comments(Some(ADMIN_ID), &[second.id, 999])
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(harness.comments.all().len(), 1);

    let err = service.remove_comments(Some(ADMIN_ID), &[]).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}
