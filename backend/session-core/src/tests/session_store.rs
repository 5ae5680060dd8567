use super::helpers::{ReadOnlyStore, UnreadableStore, memory_session};
use crate::session::{FALLBACK_INITIALS, SESSION_TOKEN_KEY, SESSION_USER_KEY, SessionStore};
use crate::storage::{KeyValueStore, MemoryKeyValueStore};

use common::RedactedToken;

use std::sync::Arc;

/// **VALUE**: Verifies `commit(t, u)` followed by `get()` returns exactly `{t, u}`.
///
/// **WHY THIS MATTERS**: The guard and the request authorizer trust whatever
/// `get()`/`token()` return.
#[tokio::test]
async fn given_commit_when_get_then_returns_same_session() {
    let session = memory_session();

    session
        .commit(RedactedToken::new("tok-77"), "John Watson")
        .await
        .unwrap();

    let stored = session.get().await.unwrap().expect("session committed");
    assert_eq!(stored.token.as_str(), "tok-77");
    assert_eq!(stored.user_display_name, "John Watson");
    assert_eq!(session.token().await.unwrap().unwrap().as_str(), "tok-77");
}

#[tokio::test]
async fn given_nothing_committed_when_get_then_absent() {
    let session = memory_session();

    assert!(session.get().await.unwrap().is_none());
    assert!(session.token().await.unwrap().is_none());
    assert_eq!(session.current_user(), "");
}

/// **VALUE**: Verifies a second commit replaces the first as a whole.
///
/// **BUG THIS CATCHES**: Would catch a commit that only overwrites the token
/// and leaves the previous user name behind.
#[tokio::test]
async fn given_existing_session_when_commit_again_then_overwritten() {
    let session = memory_session();
    session.commit(RedactedToken::new("tok-1"), "Mary Morstan").await.unwrap();

    session.commit(RedactedToken::new("tok-2"), "Irene Adler").await.unwrap();

    let stored = session.get().await.unwrap().unwrap();
    assert_eq!(stored.token.as_str(), "tok-2");
    assert_eq!(stored.user_display_name, "Irene Adler");
    assert_eq!(session.current_user(), "Irene Adler");
}

/// **VALUE**: Verifies `clear()` removes both keys and resets the current user,
/// and that clearing twice equals clearing once.
///
/// **WHY THIS MATTERS**: Logout may be triggered from several places; a second
/// clear must not fail or change anything.
#[tokio::test]
async fn given_session_when_cleared_twice_then_absent_and_no_error() {
    let store = Arc::new(MemoryKeyValueStore::new());
    let session = SessionStore::new(store.clone());
    session.commit(RedactedToken::new("tok-77"), "John Watson").await.unwrap();

    session.clear().await.unwrap();
    let after_once = store.get_many(&[SESSION_TOKEN_KEY, SESSION_USER_KEY]).await.unwrap();
    session.clear().await.unwrap();
    let after_twice = store.get_many(&[SESSION_TOKEN_KEY, SESSION_USER_KEY]).await.unwrap();

    assert_eq!(after_once, vec![None, None]);
    assert_eq!(after_once, after_twice);
    assert!(session.get().await.unwrap().is_none());
    assert_eq!(session.current_user(), "");
    assert_eq!(session.user_initials(), FALLBACK_INITIALS);
}

/// **VALUE**: Verifies an empty stored token counts as no session.
///
/// **BUG THIS CATCHES**: Would catch the guard letting a user in because the
/// token key exists with an empty value.
#[tokio::test]
async fn given_empty_token_in_storage_when_get_then_absent() {
    let store = Arc::new(MemoryKeyValueStore::new());
    store.set(SESSION_TOKEN_KEY, "").await.unwrap();
    store.set(SESSION_USER_KEY, "Ghost").await.unwrap();
    let session = SessionStore::new(store);

    assert!(session.get().await.unwrap().is_none());
    assert!(session.token().await.unwrap().is_none());
}

#[tokio::test]
async fn given_token_without_user_when_get_then_session_with_empty_name() {
    let store = Arc::new(MemoryKeyValueStore::new());
    store.set(SESSION_TOKEN_KEY, "tok-9").await.unwrap();
    let session = SessionStore::new(store);

    let stored = session.get().await.unwrap().unwrap();

    assert_eq!(stored.token.as_str(), "tok-9");
    assert_eq!(stored.user_display_name, "");
}

/// **VALUE**: Verifies `init_session_user` restores the display name from
/// storage without a commit.
///
/// **WHY THIS MATTERS**: After a restart the header must show the signed-in
/// user before any screen re-reads the session.
#[tokio::test]
async fn given_persisted_user_when_init_session_user_then_current_user_restored() {
    let store = Arc::new(MemoryKeyValueStore::new());
    store.set(SESSION_TOKEN_KEY, "tok-77").await.unwrap();
    store.set(SESSION_USER_KEY, "John Watson").await.unwrap();
    let session = SessionStore::new(store);
    assert_eq!(session.current_user(), "");

    session.init_session_user().await.unwrap();

    assert_eq!(session.current_user(), "John Watson");
    assert_eq!(session.user_initials(), "JW");
}

#[tokio::test]
async fn given_subscriber_when_commit_then_notified_of_user() {
    let session = memory_session();
    let mut rx = session.subscribe_current_user();

    session.commit(RedactedToken::new("tok-12"), "Mary Morstan").await.unwrap();

    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), "Mary Morstan");
}

/// **VALUE**: Verifies a failed write is returned to the caller and leaves the
/// current user untouched.
///
/// **BUG THIS CATCHES**: Would catch the actor updating the current user before
/// knowing the write succeeded.
#[tokio::test]
async fn given_failing_store_when_commit_then_error_and_no_user() {
    let session = SessionStore::new(Arc::new(ReadOnlyStore::default()));

    let result = session.commit(RedactedToken::new("tok-77"), "John Watson").await;

    assert!(result.is_err());
    assert_eq!(session.current_user(), "");
    assert!(session.get().await.unwrap().is_none());
}

#[tokio::test]
async fn given_unreadable_store_when_get_then_error_propagated() {
    let session = SessionStore::new(Arc::new(UnreadableStore));

    assert!(session.get().await.is_err());
    assert!(session.token().await.is_err());
}

/// **VALUE**: Verifies clones share the same actor and storage.
#[tokio::test]
async fn given_clone_when_commit_then_original_sees_session() {
    let session = memory_session();
    let other = session.clone();

    other.commit(RedactedToken::new("tok-5"), "Greg Lestrade").await.unwrap();

    assert_eq!(session.current_user(), "Greg Lestrade");
    assert!(session.get().await.unwrap().is_some());
}
