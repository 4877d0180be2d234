// tests for the encrypted conversation store

use serena::{ConversationStore, Emotion, Exchange, KEY_LEN, StoreData};
use std::fs;
use tempfile::TempDir;

fn open(dir: &TempDir) -> ConversationStore {
    ConversationStore::open(dir.path().join("chat_data.enc"), &dir.path().join("secret.key")).unwrap()
}

#[test]
fn test_open_creates_key_and_empty_store() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    assert!(store.path().exists());
    let key = fs::read(dir.path().join("secret.key")).unwrap();
    assert_eq!(key.len(), KEY_LEN);
    assert_eq!(store.load(), StoreData::default());
}

#[test]
fn test_open_creates_missing_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deeper").join("chat_data.enc");

    let store = ConversationStore::open(&path, &dir.path().join("secret.key")).unwrap();
    assert!(store.path().exists());
}

#[test]
fn test_add_then_history() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    store
        .add_message("alice", Exchange::new("hi", "hello", Some(Emotion::Neutral)))
        .unwrap();
    store
        .add_message("alice", Exchange::new("I'm sad", "I'm here", Some(Emotion::Sad)))
        .unwrap();

    let history = store.history("alice");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].user_msg, "hi");
    assert_eq!(history[1].bot_msg, "I'm here");
    assert_eq!(history[1].emotion, Some(Emotion::Sad));
    assert!(!history[1].timestamp.is_empty());
}

#[test]
fn test_unknown_user_has_no_history() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    assert!(store.history("nobody").is_empty());
}

#[test]
fn test_reopen_with_same_key() {
    let dir = TempDir::new().unwrap();
    {
        let store = open(&dir);
        store.add_message("bob", Exchange::new("one", "two", None)).unwrap();
    }

    let store = open(&dir);
    let history = store.history("bob");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_msg, "one");
    assert_eq!(history[0].emotion, None);
}

#[test]
fn test_file_is_not_plaintext() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store
        .add_message("carol", Exchange::new("a secret message", "ok", None))
        .unwrap();

    let raw = fs::read(store.path()).unwrap();
    let text = String::from_utf8_lossy(&raw);
    assert!(!text.contains("users"));
    assert!(!text.contains("a secret message"));
    assert!(!text.contains("carol"));
}

#[test]
fn test_wrong_key_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let data = dir.path().join("chat_data.enc");
    {
        let store = ConversationStore::open(&data, &dir.path().join("first.key")).unwrap();
        store.add_message("dave", Exchange::new("hi", "hey", None)).unwrap();
    }

    let store = ConversationStore::open(&data, &dir.path().join("second.key")).unwrap();
    assert!(store.history("dave").is_empty());
}

#[test]
fn test_corrupt_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add_message("erin", Exchange::new("hi", "hey", None)).unwrap();

    fs::write(store.path(), b"definitely not ciphertext").unwrap();
    assert_eq!(store.load(), StoreData::default());

    // the next write starts over cleanly
    store.add_message("erin", Exchange::new("again", "hello", None)).unwrap();
    assert_eq!(store.history("erin").len(), 1);
}

#[test]
fn test_empty_or_missing_file_reads_as_empty() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    fs::write(store.path(), b"").unwrap();
    assert_eq!(store.load(), StoreData::default());

    fs::remove_file(store.path()).unwrap();
    assert_eq!(store.load(), StoreData::default());
}

#[test]
fn test_clear_user_leaves_others() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add_message("frank", Exchange::new("a", "b", None)).unwrap();
    store.add_message("grace", Exchange::new("c", "d", None)).unwrap();

    assert!(store.clear_user("frank").unwrap());
    assert!(store.history("frank").is_empty());
    assert_eq!(store.history("grace").len(), 1);
}

#[test]
fn test_clear_unknown_user() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add_message("heidi", Exchange::new("a", "b", None)).unwrap();

    assert!(!store.clear_user("ivan").unwrap());
    assert_eq!(store.users(), vec!["heidi".to_string()]);
}

#[test]
fn test_clear_all() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    store.add_message("judy", Exchange::new("a", "b", None)).unwrap();
    store.add_message("mallory", Exchange::new("c", "d", None)).unwrap();

    store.clear_all().unwrap();
    assert!(store.users().is_empty());
}

#[test]
fn test_users_are_sorted() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);
    for user in ["zoe", "adam", "mia"] {
        store.add_message(user, Exchange::new("hi", "hello", None)).unwrap();
    }
    assert_eq!(store.users(), vec!["adam", "mia", "zoe"]);
}

#[test]
fn test_concurrent_appends_are_not_lost() {
    let dir = TempDir::new().unwrap();
    let store = open(&dir);

    std::thread::scope(|s| {
        for t in 0..4 {
            let store = &store;
            s.spawn(move || {
                for i in 0..5 {
                    let msg = format!("thread {t} message {i}");
                    store.add_message("shared", Exchange::new(&msg, "ok", None)).unwrap();
                }
            });
        }
    });

    assert_eq!(store.history("shared").len(), 20);
}
