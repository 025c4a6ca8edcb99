use poise::CreateReply;

use super::active_session;
use crate::utils::embed;
use crate::{Context, Error};

async fn skip_impl(ctx: Context<'_>) -> Result<(), Error> {
    let Some((_, session)) = active_session(ctx).await? else {
        return Ok(());
    };

    let (Some(current), Some(track)) = (session.queue.current().await, session.track().await) else {
        ctx.send(CreateReply::default().embed(embed::error("Nothing is playing right now.")))
            .await?;
        return Ok(());
    };

    // The worker moves on once the stopped track reports its end.
    session.queue.skip().await;
    track.stop()?;

    ctx.say(format!("⏭️ Skipped **{}**", current.title())).await?;
    Ok(())
}

/// Skips the current song
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn skip(ctx: Context<'_>) -> Result<(), Error> {
    skip_impl(ctx).await
}

/// Skips the current song (short for /skip)
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn s(ctx: Context<'_>) -> Result<(), Error> {
    skip_impl(ctx).await
}
