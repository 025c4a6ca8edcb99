use poise::CreateReply;
use tracing::warn;

use crate::music;
use crate::utils::embed;
use crate::{Context, Error};

async fn stop_impl(ctx: Context<'_>) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("this command only works in a server")?;
    let voice = &ctx.data().voice;

    let had_session = music::close(&ctx.data().sessions, guild_id).await;
    if voice.get(guild_id).is_none() && !had_session {
        ctx.send(CreateReply::default().embed(embed::error("I'm not in a voice channel.")))
            .await?;
        return Ok(());
    }

    if let Err(e) = voice.remove(guild_id).await {
        warn!("could not leave voice (guild: {guild_id}): {e}");
    }

    ctx.say("⏹️ Stopped the music and left the channel.").await?;
    Ok(())
}

/// Stops the music, clears the queue and leaves
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn stop(ctx: Context<'_>) -> Result<(), Error> {
    stop_impl(ctx).await
}

/// Stops the music (short for /stop)
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn st(ctx: Context<'_>) -> Result<(), Error> {
    stop_impl(ctx).await
}
