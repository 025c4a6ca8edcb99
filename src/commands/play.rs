use poise::serenity_prelude::GuildId;
use poise::CreateReply;
use tracing::info;

use super::origin;
use crate::music::{self, source};
use crate::queue::Task;
use crate::utils::embed;
use crate::{Context, Error};

/// Joins (or moves to) the author's voice channel.
async fn connect(ctx: Context<'_>) -> Result<Option<GuildId>, Error> {
    let guild_id = ctx.guild_id().ok_or("this command only works in a server")?;

    let channel_id = {
        let guild = ctx.guild().ok_or("could not read the server from the cache")?;
        guild
            .voice_states
            .get(&ctx.author().id)
            .and_then(|vs| vs.channel_id)
    };

    let Some(channel_id) = channel_id else {
        ctx.send(CreateReply::default().embed(embed::error("Join a voice channel first!")))
            .await?;
        return Ok(None);
    };

    ctx.data().voice.join(guild_id, channel_id).await?;
    info!("joined voice channel {channel_id} (guild: {guild_id})");
    Ok(Some(guild_id))
}

async fn play_impl(ctx: Context<'_>, query: String) -> Result<(), Error> {
    let Some(guild_id) = connect(ctx).await? else {
        return Ok(());
    };

    ctx.defer().await?;

    let song = match source::get_song_info(&query).await {
        Ok(s) => s,
        Err(e) => {
            ctx.send(
                CreateReply::default().embed(embed::error(&format!("Couldn't find that song: {e}"))),
            )
            .await?;
            return Ok(());
        }
    };

    let session = music::get_or_open(&ctx.data().sessions, guild_id, &ctx.data().executor).await;
    let position = session
        .queue
        .enqueue(Task::play(origin(ctx), song.clone()))
        .await;

    ctx.send(CreateReply::default().embed(embed::added_to_queue(&song, position)))
        .await?;

    Ok(())
}

/// Joins your voice channel
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn join(ctx: Context<'_>) -> Result<(), Error> {
    let Some(guild_id) = connect(ctx).await? else {
        return Ok(());
    };
    music::get_or_open(&ctx.data().sessions, guild_id, &ctx.data().executor).await;
    ctx.say("👋 Ready to scoop some tunes.").await?;
    Ok(())
}

/// Plays a song from a URL or search terms
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn play(
    ctx: Context<'_>,
    #[rest]
    #[description = "Song title or URL"]
    query: String,
) -> Result<(), Error> {
    play_impl(ctx, query).await
}

/// Plays a song (short for /play)
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn p(
    ctx: Context<'_>,
    #[rest]
    #[description = "Song title or URL"]
    query: String,
) -> Result<(), Error> {
    play_impl(ctx, query).await
}
