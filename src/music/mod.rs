pub mod player;
pub mod source;

use std::collections::HashMap;
use std::sync::Arc;

use serenity::model::id::GuildId;
use songbird::tracks::TrackHandle;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::queue::worker::{self, TaskExecutor};
use crate::queue::TaskQueue;

pub const DEFAULT_VOLUME: f32 = 0.4;

#[derive(Clone, Debug)]
pub struct Song {
    pub title: String,
    pub url: String,
    pub duration: Option<String>,
}

struct PlayerState {
    track: Option<TrackHandle>,
    volume: f32,
}

/// The live binding between the bot and one guild's voice channel.
pub struct Session {
    pub queue: Arc<TaskQueue>,
    player: Mutex<PlayerState>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            queue: Arc::new(TaskQueue::new()),
            player: Mutex::new(PlayerState {
                track: None,
                volume: DEFAULT_VOLUME,
            }),
        }
    }

    pub async fn track(&self) -> Option<TrackHandle> {
        self.player.lock().await.track.clone()
    }

    pub async fn set_track(&self, track: Option<TrackHandle>) {
        self.player.lock().await.track = track;
    }

    pub async fn volume(&self) -> f32 {
        self.player.lock().await.volume
    }

    /// Stores the volume and applies it to the playing track, if any.
    pub async fn set_volume(&self, volume: f32) {
        let mut player = self.player.lock().await;
        player.volume = volume;
        if let Some(track) = &player.track {
            let _ = track.set_volume(volume);
        }
    }
}

pub type Sessions = Arc<RwLock<HashMap<GuildId, Arc<Session>>>>;

pub fn new_sessions() -> Sessions {
    Arc::new(RwLock::new(HashMap::new()))
}

pub async fn get(sessions: &Sessions, guild_id: GuildId) -> Option<Arc<Session>> {
    sessions.read().await.get(&guild_id).cloned()
}

/// Returns the guild's session, opening one and spawning its worker if needed.
pub async fn get_or_open<E>(sessions: &Sessions, guild_id: GuildId, executor: &Arc<E>) -> Arc<Session>
where
    E: TaskExecutor + ?Sized,
{
    let mut sessions = sessions.write().await;
    if let Some(session) = sessions.get(&guild_id) {
        return session.clone();
    }

    let session = Arc::new(Session::new());
    worker::spawn(session.queue.clone(), executor.clone());
    sessions.insert(guild_id, session.clone());
    info!("opened voice session (guild: {guild_id})");
    session
}

/// Tears the guild's session down and forgets it. Returns whether one existed.
///
/// Queued songs that have not started are dropped. The song playing now is
/// stopped and its task ends normally, after which the worker exits.
pub async fn close(sessions: &Sessions, guild_id: GuildId) -> bool {
    let session = sessions.write().await.remove(&guild_id);
    match session {
        Some(session) => {
            let dropped = session.queue.clear().await;
            if let Some(track) = session.track().await {
                let _ = track.stop();
            }
            session.queue.teardown().await;
            info!("closed voice session (guild: {guild_id}, dropped {dropped} queued)");
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_default() {
        let s = Session::new();
        assert!(s.queue.is_empty().await);
        assert!(s.track().await.is_none());
        assert!((s.volume().await - DEFAULT_VOLUME).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_set_volume_without_track() {
        let s = Session::new();
        s.set_volume(0.8).await;
        assert!((s.volume().await - 0.8).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn test_close_unknown_guild() {
        let sessions = new_sessions();
        assert!(!close(&sessions, GuildId::new(9)).await);
    }
}
