use std::sync::atomic::{AtomicU64, Ordering};

use serenity::model::id::{ChannelId, GuildId, MessageId, UserId};

use crate::imagegen::ImageRequest;
use crate::music::Song;

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Where a task came from and where its replies go.
#[derive(Clone, Debug)]
pub struct Origin {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    /// The invoking message, for prefix commands. Slash commands have none.
    pub message_id: Option<MessageId>,
    pub requester_id: UserId,
    pub requester: String,
}

#[derive(Clone, Debug)]
pub enum TaskKind {
    Play(Song),
    Image(ImageRequest),
}

/// One unit of queued work.
#[derive(Clone, Debug)]
pub struct Task {
    pub id: u64,
    pub origin: Origin,
    pub kind: TaskKind,
}

impl Task {
    pub fn new(origin: Origin, kind: TaskKind) -> Self {
        Self {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            origin,
            kind,
        }
    }

    pub fn play(origin: Origin, song: Song) -> Self {
        Self::new(origin, TaskKind::Play(song))
    }

    pub fn image(origin: Origin, request: ImageRequest) -> Self {
        Self::new(origin, TaskKind::Image(request))
    }

    /// Human readable label used in queue listings and logs.
    pub fn title(&self) -> &str {
        match &self.kind {
            TaskKind::Play(song) => &song.title,
            TaskKind::Image(request) => &request.prompt,
        }
    }

    pub fn song(&self) -> Option<&Song> {
        match &self.kind {
            TaskKind::Play(song) => Some(song),
            TaskKind::Image(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imagegen::ImageStyle;

    fn origin() -> Origin {
        Origin {
            guild_id: Some(GuildId::new(1)),
            channel_id: ChannelId::new(2),
            message_id: None,
            requester_id: UserId::new(3),
            requester: "scooper".to_string(),
        }
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = Task::image(origin(), ImageRequest::new("a cat", ImageStyle::Plain));
        let b = Task::image(origin(), ImageRequest::new("a dog", ImageStyle::Plain));
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_title_follows_kind() {
        let image = Task::image(origin(), ImageRequest::new("a cat", ImageStyle::Waifu));
        assert_eq!(image.title(), "a cat");
        assert!(image.song().is_none());
    }
}
