use poise::CreateReply;

use super::active_session;
use crate::utils::embed;
use crate::{Context, Error};

/// Pauses or resumes the playing track.
async fn toggle(ctx: Context<'_>, pause: bool) -> Result<(), Error> {
    let Some((_, session)) = active_session(ctx).await? else {
        return Ok(());
    };

    let Some(track) = session.track().await else {
        ctx.send(CreateReply::default().embed(embed::error("Nothing is playing right now.")))
            .await?;
        return Ok(());
    };

    let title = session
        .queue
        .current()
        .await
        .map_or_else(|| "the song".to_string(), |t| t.title().to_string());

    if pause {
        track.pause()?;
        ctx.say(format!("⏸️ Paused **{title}**")).await?;
    } else {
        track.play()?;
        ctx.say(format!("▶️ Resumed **{title}**")).await?;
    }
    Ok(())
}

/// Pauses the current song
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn pause(ctx: Context<'_>) -> Result<(), Error> {
    toggle(ctx, true).await
}

/// Resumes the paused song
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn resume(ctx: Context<'_>) -> Result<(), Error> {
    toggle(ctx, false).await
}
