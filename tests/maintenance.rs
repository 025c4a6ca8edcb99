use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use pooper_scooper::birthday::{self, BirthdayRecord};
use pooper_scooper::gametime::{GameTimes, GameTracker};
use pooper_scooper::maintenance::idle;
use pooper_scooper::music::{self, Song};
use pooper_scooper::poll::{self, PollOption, PollRecord, POLL_LIFETIME_SECS};
use pooper_scooper::queue::worker::TaskExecutor;
use pooper_scooper::queue::{Origin, SessionStatus, Task};
use pooper_scooper::store::RecordStore;
use pooper_scooper::Error;
use serenity::model::id::{ChannelId, GuildId, UserId};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_birthday_check_announces_once_per_day() {
    let dir = TempDir::new().unwrap();
    let mut store = RecordStore::open(dir.path().join("birthdays.json")).unwrap();
    store.upsert("1", BirthdayRecord::new(5, 17, Some(1990), 42).unwrap());
    store.upsert("2", BirthdayRecord::new(12, 1, None, 42).unwrap());

    let first = birthday::check(&mut store, date(2026, 5, 17));
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].user_id, 1);
    assert_eq!(first[0].guild_id, 42);
    assert_eq!(first[0].age, Some(36));

    assert!(birthday::check(&mut store, date(2026, 5, 17)).is_empty());

    // Any other day clears the flag so next year announces again.
    assert!(birthday::check(&mut store, date(2026, 5, 18)).is_empty());
    assert!(!store.get("1").unwrap().birthday_announced);
    assert_eq!(birthday::check(&mut store, date(2027, 5, 17)).len(), 1);
}

#[test]
fn test_birthday_flags_survive_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("birthdays.json");

    let mut store = RecordStore::open(&path).unwrap();
    store.upsert("1", BirthdayRecord::new(2, 29, None, 42).unwrap());
    assert_eq!(birthday::check(&mut store, date(2027, 2, 28)).len(), 1);
    store.dump().unwrap();

    let mut reopened: RecordStore<BirthdayRecord> = RecordStore::open(&path).unwrap();
    assert!(reopened.get("1").unwrap().birthday_announced);
    assert!(birthday::check(&mut reopened, date(2027, 2, 28)).is_empty());
}

fn poll_record(created: i64) -> PollRecord {
    PollRecord {
        guild_id: 1,
        channel_id: 2,
        requester_id: 3,
        date_created: created,
        question: "tacos?".to_string(),
        options: vec![
            PollOption {
                emoji: "👍".to_string(),
                label: "Yes".to_string(),
            },
            PollOption {
                emoji: "👎".to_string(),
                label: "No".to_string(),
            },
        ],
    }
}

#[test]
fn test_take_expired_removes_only_old_polls() {
    let dir = TempDir::new().unwrap();
    let mut store = RecordStore::open(dir.path().join("polls.json")).unwrap();
    let now = 1_800_000_000;

    store.upsert("10", poll_record(now - POLL_LIFETIME_SECS - 1));
    store.upsert("11", poll_record(now - POLL_LIFETIME_SECS));
    store.upsert("12", poll_record(now - 60));

    let expired = poll::take_expired(&mut store, now);
    let ids: Vec<&str> = expired.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, ["10"]);
    assert_eq!(store.len(), 2);
    assert!(store.get("11").is_some());
    assert!(store.get("12").is_some());

    assert!(poll::take_expired(&mut store, now).is_empty());
}

#[test]
fn test_gametime_accrues_per_tick_and_saves_on_threshold() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("gametime.json");
    let start = Instant::now();

    let store = RecordStore::open(&path).unwrap();
    let mut tracker = GameTracker::new(
        store,
        Duration::from_secs(60),
        Duration::from_secs(2000),
        start,
    );

    let user = UserId::new(5);
    let samples = vec![(user, vec!["Factorio".to_string(), "Celeste".to_string()])];
    for _ in 0..3 {
        tracker.record_tick(&samples);
    }
    tracker.record_tick(&[(user, vec!["Factorio".to_string()])]);

    assert_eq!(tracker.seconds_played(user, "Factorio"), 240);
    assert_eq!(tracker.seconds_played(user, "Celeste"), 180);
    assert_eq!(
        tracker.played(user).unwrap(),
        [("Factorio".to_string(), 240), ("Celeste".to_string(), 180)]
    );

    assert!(!tracker.maybe_save(start + Duration::from_secs(1999), false).unwrap());
    let on_disk: RecordStore<GameTimes> = RecordStore::open(&path).unwrap();
    assert!(on_disk.is_empty());

    assert!(tracker.maybe_save(start + Duration::from_secs(2000), false).unwrap());
    let on_disk: RecordStore<GameTimes> = RecordStore::open(&path).unwrap();
    assert_eq!(on_disk.get("5").unwrap().get("Factorio"), Some(&240));

    // The threshold restarts from the last write.
    assert!(!tracker.maybe_save(start + Duration::from_secs(2100), false).unwrap());
    assert!(tracker.maybe_save(start + Duration::from_secs(2100), true).unwrap());
}

struct Idle;

#[async_trait]
impl TaskExecutor for Idle {
    async fn execute(&self, _task: &Task) -> Result<(), Error> {
        Ok(())
    }

    async fn report_failure(&self, _task: &Task, _error: &Error) {}
}

/// Holds each task long enough for the rest of the queue to stay pending.
struct Lingering;

#[async_trait]
impl TaskExecutor for Lingering {
    async fn execute(&self, _task: &Task) -> Result<(), Error> {
        tokio::time::sleep(Duration::from_millis(300)).await;
        Ok(())
    }

    async fn report_failure(&self, _task: &Task, _error: &Error) {}
}

fn song(title: &str) -> Task {
    Task::play(
        Origin {
            guild_id: Some(GuildId::new(1)),
            channel_id: ChannelId::new(100),
            message_id: None,
            requester_id: UserId::new(7),
            requester: "scooper".to_string(),
        },
        Song {
            title: title.to_string(),
            url: format!("https://youtube.com/watch?v={title}"),
            duration: None,
        },
    )
}

#[tokio::test]
async fn test_idle_sweep_clears_the_abandoned_queue() {
    let sessions = music::new_sessions();
    let guild = GuildId::new(1);
    let session = music::get_or_open(&sessions, guild, &Arc::new(Lingering)).await;

    for title in ["a", "b", "c"] {
        session.queue.enqueue(song(title)).await;
    }
    tokio::time::timeout(Duration::from_secs(1), async {
        while session.queue.status().await != SessionStatus::Playing {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert_eq!(session.queue.len().await, 2);

    assert_eq!(idle::sweep(&sessions, &HashMap::from([(guild, 0)])).await, [guild]);

    let (current, pending) = session.queue.snapshot().await;
    assert!(current.is_none());
    assert!(pending.is_empty());
    assert_eq!(session.queue.status().await, SessionStatus::TornDown);
    assert!(music::get(&sessions, guild).await.is_none());
}

#[tokio::test]
async fn test_idle_sweep_closes_empty_channels_only() {
    let sessions = music::new_sessions();
    let executor = Arc::new(Idle);
    let lonely = GuildId::new(1);
    let busy = GuildId::new(2);
    let unknown = GuildId::new(3);

    let lonely_session = music::get_or_open(&sessions, lonely, &executor).await;
    let busy_session = music::get_or_open(&sessions, busy, &executor).await;
    let unknown_session = music::get_or_open(&sessions, unknown, &executor).await;

    let listeners = HashMap::from([(lonely, 0), (busy, 2)]);
    let mut closed = idle::sweep(&sessions, &listeners).await;
    closed.sort();
    assert_eq!(closed, [lonely, unknown]);

    assert_eq!(lonely_session.queue.status().await, SessionStatus::TornDown);
    assert_eq!(unknown_session.queue.status().await, SessionStatus::TornDown);
    assert_ne!(busy_session.queue.status().await, SessionStatus::TornDown);
    assert!(music::get(&sessions, busy).await.is_some());

    // Nothing left to close on a second pass.
    assert!(idle::sweep(&sessions, &HashMap::from([(busy, 1)])).await.is_empty());
}
