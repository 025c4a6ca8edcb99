use poise::CreateReply;

use super::active_session;
use crate::utils::embed;
use crate::{Context, Error};

async fn volume_impl(ctx: Context<'_>, level: u32) -> Result<(), Error> {
    if level > 100 {
        ctx.send(CreateReply::default().embed(embed::error("Volume goes from 0 to 100.")))
            .await?;
        return Ok(());
    }

    let Some((_, session)) = active_session(ctx).await? else {
        return Ok(());
    };

    session.set_volume(level as f32 / 100.0).await;
    ctx.say(format!("🔊 Volume: **{level}%**")).await?;
    Ok(())
}

/// Sets the playback volume
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn volume(
    ctx: Context<'_>,
    #[description = "Volume (0-100)"] level: u32,
) -> Result<(), Error> {
    volume_impl(ctx, level).await
}

/// Sets the playback volume (short for /volume)
#[poise::command(prefix_command, slash_command, guild_only)]
pub async fn v(
    ctx: Context<'_>,
    #[description = "Volume (0-100)"] level: u32,
) -> Result<(), Error> {
    volume_impl(ctx, level).await
}
