use chrono::Utc;
use poise::CreateReply;

use crate::gametime::format_duration;
use crate::utils::embed;
use crate::{Context, Error, VERSION};

/// Shows how long the bot has been online
#[poise::command(prefix_command, slash_command)]
pub async fn uptime(ctx: Context<'_>) -> Result<(), Error> {
    let elapsed = (Utc::now() - ctx.data().started_at).num_seconds().max(0) as u64;
    ctx.say(format!("Uptime: **{}**", format_duration(elapsed)))
        .await?;
    Ok(())
}

/// Information about the bot
#[poise::command(prefix_command, slash_command)]
pub async fn about(ctx: Context<'_>) -> Result<(), Error> {
    ctx.send(CreateReply::default().embed(embed::about(VERSION)))
        .await?;
    Ok(())
}
