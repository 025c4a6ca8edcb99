use poise::CreateReply;

use super::active_session;
use crate::queue::LoopMode;
use crate::utils::embed;
use crate::{Context, Error};

async fn loop_impl(ctx: Context<'_>, mode: String) -> Result<(), Error> {
    let Ok(mode) = mode.parse::<LoopMode>() else {
        ctx.send(CreateReply::default().embed(embed::error(
            "Pick a mode: `off`, `song` or `queue`",
        )))
        .await?;
        return Ok(());
    };

    let Some((_, session)) = active_session(ctx).await? else {
        return Ok(());
    };

    let mode = session.queue.set_loop_mode(mode).await;
    let emoji = match mode {
        LoopMode::Off => "➡️",
        LoopMode::Song => "🔂",
        LoopMode::Queue => "🔁",
    };

    ctx.say(format!("{emoji} Loop mode: **{mode}**")).await?;
    Ok(())
}

/// Sets the loop mode
#[poise::command(prefix_command, slash_command, guild_only, rename = "loop")]
pub async fn loop_cmd(
    ctx: Context<'_>,
    #[description = "Loop mode (off/song/queue)"] mode: String,
) -> Result<(), Error> {
    loop_impl(ctx, mode).await
}

/// Sets the loop mode (short for /loop)
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn l(
    ctx: Context<'_>,
    #[description = "Loop mode (off/song/queue)"] mode: String,
) -> Result<(), Error> {
    loop_impl(ctx, mode).await
}
