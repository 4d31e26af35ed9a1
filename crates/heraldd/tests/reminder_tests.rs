//! Reminder scheduling: validation, delivery, rehydration, cancellation.
//!
//! Uses the paused tokio clock so delay waits are deterministic; the
//! requested times come from the wall clock with a couple of minutes of
//! slack so minute-granularity parsing never lands in the past.

use chrono::{Duration as ChronoDuration, Local};
use herald_common::{HeraldConfig, KnowledgeStore, ReminderStatus};
use heraldd::nlp::{EntityRecognizer, HeuristicNlp, SentenceSegmenter};
use heraldd::notify::Notifier;
use heraldd::reminder::REMIND_TIME_FORMAT;
use heraldd::Assistant;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::tempdir;

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, group_id: &str, text: &str) {
        self.sent
            .lock()
            .unwrap()
            .push((group_id.to_string(), text.to_string()));
    }
}

fn test_assistant_with(
    store: Arc<KnowledgeStore>,
) -> (Assistant, Arc<RecordingNotifier>) {
    let recognizer: Arc<dyn EntityRecognizer> = Arc::new(HeuristicNlp);
    let segmenter: Arc<dyn SentenceSegmenter> = Arc::new(HeuristicNlp);
    let notifier = Arc::new(RecordingNotifier::default());
    let notifier_dyn: Arc<dyn Notifier> = notifier.clone();
    let assistant = Assistant::new(
        store,
        &HeraldConfig::default(),
        recognizer,
        segmenter,
        notifier_dyn,
    );
    (assistant, notifier)
}

fn test_assistant() -> (Assistant, Arc<KnowledgeStore>, Arc<RecordingNotifier>, tempfile::TempDir)
{
    let dir = tempdir().unwrap();
    let store = Arc::new(KnowledgeStore::open(&dir.path().join("test.db")).unwrap());
    let (assistant, notifier) = test_assistant_with(Arc::clone(&store));
    (assistant, store, notifier, dir)
}

/// A wall-clock time comfortably in the future, in request format.
fn future_time_str(minutes: i64) -> String {
    (Local::now().naive_local() + ChronoDuration::minutes(minutes))
        .format(REMIND_TIME_FORMAT)
        .to_string()
}

/// Let the paused clock run past every scheduled delay.
async fn run_clock_past_all_delays() {
    tokio::time::sleep(Duration::from_secs(600)).await;
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn past_time_is_rejected_and_persists_nothing() {
    let (assistant, store, notifier, _dir) = test_assistant();

    let reply = assistant
        .handle_set_reminder("42", 7, "team sync | 2020-01-01 00:00")
        .await
        .unwrap();
    assert_eq!(reply, "Reminder time must be in the future.");
    assert!(store.pending_reminders().unwrap().is_empty());
    assert!(notifier.sent().is_empty());
}

#[tokio::test]
async fn unparsable_time_is_rejected_and_persists_nothing() {
    let (assistant, store, _notifier, _dir) = test_assistant();

    let reply = assistant
        .handle_set_reminder("42", 7, "team sync | tomorrow")
        .await
        .unwrap();
    assert_eq!(reply, "Invalid format. Use: /setreminder message | YYYY-MM-DD HH:MM");
    assert!(store.pending_reminders().unwrap().is_empty());
}

#[tokio::test]
async fn missing_separator_returns_usage() {
    let (assistant, store, _notifier, _dir) = test_assistant();

    let reply = assistant
        .handle_set_reminder("42", 7, "team sync at noon")
        .await
        .unwrap();
    assert_eq!(reply, "Usage: /setreminder message | YYYY-MM-DD HH:MM");
    assert!(store.pending_reminders().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn scheduled_reminder_fires_exactly_once() {
    let (assistant, store, notifier, _dir) = test_assistant();

    let time_str = future_time_str(2);
    let reply = assistant
        .handle_set_reminder("42", 7, &format!("team sync | {time_str}"))
        .await
        .unwrap();
    assert_eq!(reply, format!("Reminder set for 'team sync' at {time_str}"));

    let pending = store.pending_reminders().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].content, "team sync");

    run_clock_past_all_delays().await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "42");
    assert!(sent[0].1.contains("team sync"));
    assert_eq!(
        store.get_reminder(pending[0].id).unwrap().unwrap().status,
        ReminderStatus::Delivered
    );

    // No repeat delivery
    run_clock_past_all_delays().await;
    assert_eq!(notifier.sent().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn pending_rows_rehydrate_and_fire_after_restart() {
    let dir = tempdir().unwrap();
    let store = Arc::new(KnowledgeStore::open(&dir.path().join("test.db")).unwrap());
    let when = Local::now().naive_local() + ChronoDuration::minutes(5);
    let id = store.insert_reminder("42", 7, "standup", when).unwrap();

    // "Restart": a fresh assistant over the same store
    let (assistant, notifier) = test_assistant_with(Arc::clone(&store));
    assert_eq!(assistant.rehydrate().await.unwrap(), 1);

    run_clock_past_all_delays().await;

    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("standup"));
    assert_eq!(
        store.get_reminder(id).unwrap().unwrap().status,
        ReminderStatus::Delivered
    );
}

#[tokio::test(start_paused = true)]
async fn past_due_rows_fire_immediately_on_rehydration() {
    let dir = tempdir().unwrap();
    let store = Arc::new(KnowledgeStore::open(&dir.path().join("test.db")).unwrap());
    let when = Local::now().naive_local() - ChronoDuration::hours(1);
    store.insert_reminder("42", 7, "missed sync", when).unwrap();

    let (assistant, notifier) = test_assistant_with(Arc::clone(&store));
    assert_eq!(assistant.rehydrate().await.unwrap(), 1);

    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
    let sent = notifier.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].1.contains("missed sync"));
}

#[tokio::test(start_paused = true)]
async fn delivered_rows_do_not_rehydrate() {
    let dir = tempdir().unwrap();
    let store = Arc::new(KnowledgeStore::open(&dir.path().join("test.db")).unwrap());
    let when = Local::now().naive_local() + ChronoDuration::minutes(5);
    let id = store.insert_reminder("42", 7, "standup", when).unwrap();
    store.mark_reminder_delivered(id).unwrap();

    let (assistant, notifier) = test_assistant_with(Arc::clone(&store));
    assert_eq!(assistant.rehydrate().await.unwrap(), 0);

    run_clock_past_all_delays().await;
    assert!(notifier.sent().is_empty());
}

#[tokio::test(start_paused = true)]
async fn canceled_reminder_never_delivers() {
    let (assistant, store, notifier, _dir) = test_assistant();

    let time_str = future_time_str(2);
    assistant
        .handle_set_reminder("42", 7, &format!("team sync | {time_str}"))
        .await
        .unwrap();
    let id = store.pending_reminders().unwrap()[0].id;

    assert!(assistant.cancel_reminder(id).await.unwrap());
    assert_eq!(
        store.get_reminder(id).unwrap().unwrap().status,
        ReminderStatus::Canceled
    );

    run_clock_past_all_delays().await;
    assert!(notifier.sent().is_empty());

    // Canceling again is a no-op
    assert!(!assistant.cancel_reminder(id).await.unwrap());
}
