use poise::CreateReply;

use super::active_session;
use crate::utils::embed;
use crate::{Context, Error};

async fn queue_impl(ctx: Context<'_>, page: Option<usize>) -> Result<(), Error> {
    let Some((_, session)) = active_session(ctx).await? else {
        return Ok(());
    };

    let (current, tasks) = session.queue.snapshot().await;
    let embed = embed::queue_list(current.as_ref(), &tasks, page.unwrap_or(1));

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Shows the song queue
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn queue(
    ctx: Context<'_>,
    #[description = "Page number"] page: Option<usize>,
) -> Result<(), Error> {
    queue_impl(ctx, page).await
}

/// Shows the song queue (short for /queue)
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn q(
    ctx: Context<'_>,
    #[description = "Page number"] page: Option<usize>,
) -> Result<(), Error> {
    queue_impl(ctx, page).await
}
