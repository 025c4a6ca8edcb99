use poise::CreateReply;

use super::active_session;
use crate::utils::embed;
use crate::{Context, Error};

async fn nowplaying_impl(ctx: Context<'_>) -> Result<(), Error> {
    let Some((_, session)) = active_session(ctx).await? else {
        return Ok(());
    };

    let current = session.queue.current().await;
    match current.as_ref().and_then(|task| task.song().map(|song| (task, song))) {
        Some((task, song)) => {
            let embed = embed::now_playing(song, &task.origin.requester)
                .field("Loop", session.queue.loop_mode().await.to_string(), true)
                .field(
                    "Volume",
                    format!("{}%", (session.volume().await * 100.0).round()),
                    true,
                );
            ctx.send(CreateReply::default().embed(embed)).await?;
        }
        None => {
            ctx.send(CreateReply::default().embed(embed::error("Nothing is playing right now.")))
                .await?;
        }
    }
    Ok(())
}

/// Shows the song that is playing
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn nowplaying(ctx: Context<'_>) -> Result<(), Error> {
    nowplaying_impl(ctx).await
}

/// Shows the song that is playing (short for /nowplaying)
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn np(ctx: Context<'_>) -> Result<(), Error> {
    nowplaying_impl(ctx).await
}
