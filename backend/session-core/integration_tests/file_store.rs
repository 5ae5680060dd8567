use session_core::session::{SESSION_TOKEN_KEY, SESSION_USER_KEY, SessionStore};
use session_core::storage::{FileKeyValueStore, KeyValueStore};

use common::RedactedToken;

use std::sync::Arc;

/// **VALUE**: A committed session survives reopening the store.
///
/// **WHY THIS MATTERS**: Staff stay signed in across app restarts until they
/// log out.
#[tokio::test]
async fn given_committed_session_when_store_reopened_then_session_restored() {
    // GIVEN: A session committed through a file-backed store
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("preferences.json");
    {
        let store = FileKeyValueStore::open(&path).await.unwrap();
        let session = SessionStore::new(Arc::new(store));
        session
            .commit(RedactedToken::new("tok-77"), "John Watson")
            .await
            .unwrap();
    }

    // WHEN: Reopening the same file in a fresh session store
    let session = SessionStore::new(Arc::new(FileKeyValueStore::open(&path).await.unwrap()));
    session.init_session_user().await.unwrap();

    // THEN: Both halves of the session are back
    let restored = session.get().await.unwrap().expect("session persisted");
    assert_eq!(restored.token.as_str(), "tok-77");
    assert_eq!(restored.user_display_name, "John Watson");
    assert_eq!(session.current_user(), "John Watson");
}

/// **VALUE**: A cleared session stays cleared after reopening, and unrelated
/// keys are kept.
///
/// **BUG THIS CATCHES**: Would catch clear() rewriting the file as empty and
/// dropping other preferences.
#[tokio::test]
async fn given_cleared_session_when_store_reopened_then_absent_and_other_keys_kept() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");
    {
        let store = Arc::new(FileKeyValueStore::open(&path).await.unwrap());
        store.set("theme", "dark").await.unwrap();
        let session = SessionStore::new(store);
        session
            .commit(RedactedToken::new("tok-77"), "John Watson")
            .await
            .unwrap();
        session.clear().await.unwrap();
    }

    let store = FileKeyValueStore::open(&path).await.unwrap();

    assert_eq!(
        store
            .get_many(&[SESSION_TOKEN_KEY, SESSION_USER_KEY])
            .await
            .unwrap(),
        vec![None, None]
    );
    assert_eq!(store.get("theme").await.unwrap().as_deref(), Some("dark"));
}

/// **VALUE**: Readers racing a commit see the whole old session or the whole
/// new one, never a token from one and a user from the other.
#[tokio::test]
async fn given_concurrent_reads_when_commits_alternate_then_never_half_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FileKeyValueStore::open(dir.path().join("prefs.json")).await.unwrap());
    let session = SessionStore::new(store);
    session.commit(RedactedToken::new("tok-a"), "User A").await.unwrap();

    let writer = {
        let session = session.clone();
        tokio::spawn(async move {
            for i in 0..20 {
                let (token, user) = if i % 2 == 0 {
                    ("tok-b", "User B")
                } else {
                    ("tok-a", "User A")
                };
                session.commit(RedactedToken::new(token), user).await.unwrap();
            }
        })
    };

    for _ in 0..50 {
        let current = session.get().await.unwrap().unwrap();
        let expected_user = match current.token.as_str() {
            "tok-a" => "User A",
            "tok-b" => "User B",
            other => panic!("unexpected token {}", other),
        };
        assert_eq!(current.user_display_name, expected_user);
        tokio::task::yield_now().await;
    }

    writer.await.unwrap();
}
