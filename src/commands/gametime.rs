use std::time::Instant;

use poise::CreateReply;
use tracing::info;

use crate::utils::embed::{self, FIELDS_PER_EMBED};
use crate::{Context, Error};

/// Shows how long you've played each game, most played first
#[poise::command(prefix_command, slash_command)]
pub async fn played(ctx: Context<'_>) -> Result<(), Error> {
    let games = ctx.data().gametime.lock().await.played(ctx.author().id);

    let Some(games) = games.filter(|g| !g.is_empty()) else {
        ctx.say("I scooped a lot but couldn't find any of your data!").await?;
        return Ok(());
    };

    let pages = games.len().div_ceil(FIELDS_PER_EMBED);
    for (i, chunk) in games.chunks(FIELDS_PER_EMBED).enumerate() {
        ctx.send(CreateReply::default().embed(embed::game_times(chunk, i + 1, pages)))
            .await?;
    }
    Ok(())
}

/// Saves the game time data right now
#[poise::command(prefix_command, slash_command)]
pub async fn save(ctx: Context<'_>) -> Result<(), Error> {
    ctx.data()
        .gametime
        .lock()
        .await
        .maybe_save(Instant::now(), true)?;
    info!("gametime force saved by {}", ctx.author().name);

    match ctx {
        poise::Context::Prefix(prefix) => {
            prefix.msg.react(ctx.serenity_context(), '👍').await?;
        }
        _ => {
            ctx.send(CreateReply::default().content("👍").ephemeral(true))
                .await?;
        }
    }
    Ok(())
}
