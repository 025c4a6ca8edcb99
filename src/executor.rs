use std::sync::Arc;

use async_trait::async_trait;
use serenity::builder::{CreateAttachment, CreateEmbed, CreateMessage};
use serenity::http::Http;
use songbird::Songbird;
use tracing::warn;

use crate::imagegen::{GeminiClient, ImageRequest};
use crate::music::{self, player, Sessions, Song};
use crate::queue::worker::TaskExecutor;
use crate::queue::{Origin, Task, TaskKind};
use crate::utils::embed;
use crate::Error;

/// Executes queued tasks against the voice driver and the image backend.
pub struct TaskRunner {
    http: Arc<Http>,
    voice: Arc<Songbird>,
    sessions: Sessions,
    http_client: reqwest::Client,
    images: Option<GeminiClient>,
}

impl TaskRunner {
    pub fn new(
        http: Arc<Http>,
        voice: Arc<Songbird>,
        sessions: Sessions,
        http_client: reqwest::Client,
        images: Option<GeminiClient>,
    ) -> Self {
        Self {
            http,
            voice,
            sessions,
            http_client,
            images,
        }
    }

    async fn reply(&self, origin: &Origin, message: CreateMessage) -> Result<(), Error> {
        let message = match origin.message_id {
            Some(message_id) => message.reference_message((origin.channel_id, message_id)),
            None => message,
        };
        origin.channel_id.send_message(&self.http, message).await?;
        Ok(())
    }

    async fn play(&self, task: &Task, song: &Song) -> Result<(), Error> {
        let guild_id = task.origin.guild_id.ok_or("music only works in a server")?;
        let call = self
            .voice
            .get(guild_id)
            .ok_or("not connected to a voice channel")?;
        let session = music::get(&self.sessions, guild_id)
            .await
            .ok_or("the voice session has ended")?;

        let announce = CreateMessage::new().embed(embed::now_playing(song, &task.origin.requester));
        if let Err(e) = task.origin.channel_id.send_message(&self.http, announce).await {
            warn!("could not announce {}: {e}", song.title);
        }

        player::play(&session, &call, &self.http_client, song).await
    }

    async fn generate(&self, task: &Task, request: &ImageRequest) -> Result<(), Error> {
        let backend = self
            .images
            .as_ref()
            .ok_or("image generation is not configured")?;
        let image = backend.generate(&request.backend_prompt()).await?;

        let message = CreateMessage::new()
            .content(format!("🎨 **{}**", request.prompt))
            .add_file(CreateAttachment::bytes(image, request.file_name()));
        self.reply(&task.origin, message).await
    }
}

#[async_trait]
impl TaskExecutor for TaskRunner {
    async fn execute(&self, task: &Task) -> Result<(), Error> {
        match &task.kind {
            TaskKind::Play(song) => self.play(task, song).await,
            TaskKind::Image(request) => self.generate(task, request).await,
        }
    }

    async fn report_failure(&self, task: &Task, error: &Error) {
        let notice: CreateEmbed = embed::error(&format!("Couldn't finish **{}**: {error}", task.title()));
        if let Err(e) = self.reply(&task.origin, CreateMessage::new().embed(notice)).await {
            warn!("could not report failure of task {}: {e}", task.id);
        }
    }
}
