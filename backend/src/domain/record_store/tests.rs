//! Tests for the record store.

use std::collections::HashSet;

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockCollectionMedium;
use crate::domain::{Tweet, TweetBody, TweetContent, TweetDraft, TweetPatch, UserId};
use crate::test_support::clock::MutableClock;
use crate::test_support::medium::FlakyMedium;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp")
}

#[fixture]
fn medium() -> Arc<FlakyMedium> {
    Arc::new(FlakyMedium::default())
}

fn store_over(medium: Arc<dyn CollectionMedium>, now: DateTime<Utc>) -> RecordStore<Tweet> {
    RecordStore::new("tweets", medium, Arc::new(MutableClock::new(now)))
}

fn draft(content: &str) -> TweetDraft {
    let body = TweetBody {
        content: TweetContent::new(content).expect("valid content"),
    };
    TweetDraft::new(body, UserId::generate())
}

#[rstest]
#[tokio::test]
async fn append_then_get_returns_equal_record(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium, now);

    let stored = store.append(draft("hello")).await.expect("append");
    let fetched = store.get(stored.tweet_id()).await.expect("get");

    assert_eq!(fetched, stored);
    assert_eq!(stored.content().as_ref(), "hello");
    assert_eq!(stored.created_at(), now);
    assert!(stored.updated_at().is_none());
}

#[rstest]
#[tokio::test]
async fn list_all_preserves_insertion_order(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium, now);
    let mut expected = Vec::new();
    for n in 0..5 {
        let stored = store.append(draft(&format!("tweet {n}"))).await.expect("append");
        expected.push(stored);
    }

    assert_eq!(store.list_all().await.expect("list"), expected);
}

#[rstest]
#[tokio::test]
async fn empty_or_blank_medium_reads_as_empty_collection(now: DateTime<Utc>) {
    for contents in [b"".as_slice(), b"  \n\t".as_slice(), b"[]".as_slice()] {
        let medium = Arc::new(FlakyMedium::with_contents(contents.to_vec()));
        let store = store_over(medium, now);
        assert!(store.list_all().await.expect("list").is_empty());
    }
}

#[rstest]
#[tokio::test]
async fn retrying_an_append_creates_a_second_record(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium, now);
    let first = store.append(draft("same")).await.expect("append");
    let second = store.append(draft("same")).await.expect("append");

    assert_ne!(first.tweet_id(), second.tweet_id());
    assert_eq!(store.list_all().await.expect("list").len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_appends_are_all_kept_with_distinct_ids(
    medium: Arc<FlakyMedium>,
    now: DateTime<Utc>,
) {
    let store = Arc::new(store_over(medium, now));
    let handles: Vec<_> = (0..32)
        .map(|n| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.append(draft(&format!("tweet {n}"))).await })
        })
        .collect();

    for handle in handles {
        handle.await.expect("task joins").expect("append");
    }

    let stored = store.list_all().await.expect("list");
    let ids: HashSet<_> = stored.iter().map(|tweet| *tweet.tweet_id()).collect();
    assert_eq!(stored.len(), 32);
    assert_eq!(ids.len(), 32);
}

#[rstest]
#[tokio::test]
async fn failed_write_leaves_collection_unchanged(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium.clone(), now);
    let kept = store.append(draft("kept")).await.expect("append");
    let before = medium.contents();

    medium.fail_writes(true);
    let err = store.append(draft("lost")).await.expect_err("write fails");

    assert!(matches!(err, RecordStoreError::Storage { .. }));
    assert_eq!(medium.contents(), before);
    assert_eq!(store.list_all().await.expect("list"), vec![kept]);
}

#[rstest]
#[tokio::test]
async fn get_unknown_identity_is_not_found(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium, now);
    store.append(draft("hello")).await.expect("append");

    let missing = crate::domain::TweetId::generate();
    let err = store.get(&missing).await.expect_err("unknown id");
    assert_eq!(err, RecordStoreError::not_found("tweet", missing.to_string()));
}

#[rstest]
#[tokio::test]
async fn update_stamps_updated_at_and_keeps_created_at(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium.clone(), now);
    let stored = store.append(draft("hello")).await.expect("append");

    let later = now + chrono::Duration::minutes(10);
    let editor: RecordStore<Tweet> =
        RecordStore::new("tweets", medium, Arc::new(MutableClock::new(later)));
    let patch = TweetPatch {
        content: Some(TweetContent::new("edited").expect("valid content")),
    };
    let updated = editor.update(stored.tweet_id(), patch).await.expect("update");

    assert_eq!(updated.created_at(), now);
    assert_eq!(updated.updated_at(), Some(later));
    assert_eq!(editor.get(stored.tweet_id()).await.expect("get"), updated);
}

#[rstest]
#[tokio::test]
async fn update_and_remove_report_not_found(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium, now);
    let missing = crate::domain::TweetId::generate();

    let update = store.update(&missing, TweetPatch::default()).await;
    let delete = store.delete(&missing).await;

    assert!(matches!(update, Err(RecordStoreError::NotFound { .. })));
    assert!(matches!(delete, Err(RecordStoreError::NotFound { .. })));
}

#[rstest]
#[tokio::test]
async fn remove_returns_record_and_drops_it(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium, now);
    let first = store.append(draft("first")).await.expect("append");
    let second = store.append(draft("second")).await.expect("append");

    let removed = store.remove(first.tweet_id()).await.expect("remove");

    assert_eq!(removed, first);
    assert_eq!(store.list_all().await.expect("list"), vec![second]);
}

#[rstest]
#[tokio::test]
async fn checked_append_can_refuse(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium, now);
    store.append(draft("taken")).await.expect("append");

    let err = store
        .append_checked(draft("taken"), |records, draft| {
            if records.iter().any(|t| t.content() == &draft.content) {
                Err(RecordStoreError::conflict("duplicate content"))
            } else {
                Ok(())
            }
        })
        .await
        .expect_err("duplicate refused");

    assert_eq!(err, RecordStoreError::conflict("duplicate content"));
    assert_eq!(store.list_all().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn find_and_remove_where_use_predicates(medium: Arc<FlakyMedium>, now: DateTime<Utc>) {
    let store = store_over(medium, now);
    store.append(draft("alpha")).await.expect("append");
    store.append(draft("beta")).await.expect("append");
    store.append(draft("alpha")).await.expect("append");

    let found = store
        .find(|t| t.content().as_ref() == "beta")
        .await
        .expect("find");
    assert!(found.is_some());

    let removed = store
        .remove_where(|t| t.content().as_ref() == "alpha")
        .await
        .expect("remove");
    assert_eq!(removed.len(), 2);
    assert_eq!(store.list_all().await.expect("list").len(), 1);
}

#[rstest]
#[tokio::test]
async fn remove_where_without_matches_skips_write(now: DateTime<Utc>) {
    let mut medium = MockCollectionMedium::new();
    medium.expect_read().returning(|| Ok(b"[]".to_vec()));
    medium.expect_replace().never();
    let store = store_over(Arc::new(medium), now);

    let removed = store.remove_where(|_| true).await.expect("nothing to remove");
    assert!(removed.is_empty());
}

#[rstest]
#[case::missing(Err(CollectionMediumError::missing("tweets.json")))]
#[case::io(Err(CollectionMediumError::io("tweets.json", "permission denied")))]
#[case::malformed(Ok(b"{\"not\": \"an array\"}".to_vec()))]
#[case::bad_record(Ok(b"[{\"tweet_id\": 7}]".to_vec()))]
#[tokio::test]
async fn medium_faults_surface_as_storage_failures(
    #[case] read: Result<Vec<u8>, CollectionMediumError>,
    now: DateTime<Utc>,
) {
    let mut medium = MockCollectionMedium::new();
    medium.expect_read().return_once(move || read);
    medium.expect_replace().never();
    let store = store_over(Arc::new(medium), now);

    let err = store.append(draft("hello")).await.expect_err("fault");
    assert!(matches!(err, RecordStoreError::Storage { ref collection, .. } if collection == "tweets"));
}

#[rstest]
#[tokio::test]
async fn reinstate_restores_removed_records_verbatim(
    medium: Arc<FlakyMedium>,
    now: DateTime<Utc>,
) {
    let store = store_over(medium, now);
    let kept = store.append(draft("kept")).await.expect("append");
    let gone = store.append(draft("gone")).await.expect("append");

    let removed = store.remove_where(|t| t == &gone).await.expect("remove");
    store.reinstate(removed.clone()).await.expect("reinstate");
    store.reinstate(removed).await.expect("second reinstate is a no-op");

    assert_eq!(store.list_all().await.expect("list"), vec![kept, gone]);
}

#[rstest]
#[tokio::test]
async fn panicking_worker_surfaces_as_storage_failure(now: DateTime<Utc>) {
    let mut medium = MockCollectionMedium::new();
    medium
        .expect_read()
        .return_once(|| panic!("simulated worker crash"));
    let store = store_over(Arc::new(medium), now);

    let err = store.list_all().await.expect_err("worker failed");
    assert!(matches!(err, RecordStoreError::Storage { .. }));
}

#[rstest]
#[case(RecordStoreError::not_found("tweet", "abc"), ErrorCode::NotFound)]
#[case(RecordStoreError::conflict("email already registered"), ErrorCode::Conflict)]
#[case(RecordStoreError::storage("tweets", "disk full"), ErrorCode::InternalError)]
fn maps_into_domain_errors(#[case] err: RecordStoreError, #[case] expected: ErrorCode) {
    assert_eq!(Error::from(err).code(), expected);
}

#[rstest]
fn storage_errors_do_not_leak_medium_details() {
    let error = Error::from(RecordStoreError::storage("tweets", "/srv/secret/path"));
    assert!(!error.message().contains("/srv/secret/path"));
}
