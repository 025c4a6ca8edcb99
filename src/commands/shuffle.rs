use poise::CreateReply;

use super::active_session;
use crate::utils::embed;
use crate::{Context, Error};

/// Shuffles the upcoming songs
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn shuffle(ctx: Context<'_>) -> Result<(), Error> {
    let Some((_, session)) = active_session(ctx).await? else {
        return Ok(());
    };

    let count = session.queue.shuffle().await;
    if count == 0 {
        ctx.send(CreateReply::default().embed(embed::error("The queue is empty.")))
            .await?;
    } else {
        ctx.say(format!("🔀 Shuffled {count} songs")).await?;
    }
    Ok(())
}
