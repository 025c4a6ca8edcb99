use poise::CreateReply;

use super::active_session;
use crate::utils::embed;
use crate::{Context, Error};

async fn remove_impl(ctx: Context<'_>, position: usize) -> Result<(), Error> {
    let Some((_, session)) = active_session(ctx).await? else {
        return Ok(());
    };

    match session.queue.remove_at(position).await {
        Some(task) => {
            ctx.say(format!("🗑️ Removed **{}** from the queue", task.title()))
                .await?;
        }
        None => {
            ctx.send(CreateReply::default().embed(embed::error(&format!(
                "There is no song at position {position}."
            ))))
            .await?;
        }
    }
    Ok(())
}

/// Removes a song from the queue
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "Position in the queue"] position: usize,
) -> Result<(), Error> {
    remove_impl(ctx, position).await
}

/// Removes a song from the queue (short for /remove)
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn rm(
    ctx: Context<'_>,
    #[description = "Position in the queue"] position: usize,
) -> Result<(), Error> {
    remove_impl(ctx, position).await
}
