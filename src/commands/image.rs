use poise::CreateReply;
use tracing::info;

use super::origin;
use crate::imagegen::{ImageRequest, ImageStyle};
use crate::queue::Task;
use crate::utils::embed;
use crate::{Context, Error};

async fn enqueue_image(ctx: Context<'_>, prompt: String, style: ImageStyle) -> Result<(), Error> {
    if !ctx.data().config.image_generation_enabled() {
        ctx.send(
            CreateReply::default()
                .embed(embed::error("Image generation isn't set up on this bot."))
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }
    if prompt.trim().is_empty() {
        ctx.send(CreateReply::default().embed(embed::error("Tell me what to draw.")))
            .await?;
        return Ok(());
    }

    let position = ctx
        .data()
        .images
        .enqueue(Task::image(origin(ctx), ImageRequest::new(prompt, style)))
        .await;
    info!("queued image request from {} at position {position}", ctx.author().name);

    match ctx {
        poise::Context::Prefix(prefix) => {
            prefix.msg.react(ctx.serenity_context(), '👍').await?;
        }
        _ => {
            ctx.say(format!("👍 You're #{position} in the image queue")).await?;
        }
    }
    Ok(())
}

/// Draws an anime style picture of the prompt
#[poise::command(prefix_command, slash_command)]
pub async fn waifu(
    ctx: Context<'_>,
    #[rest]
    #[description = "What to draw"]
    prompt: String,
) -> Result<(), Error> {
    enqueue_image(ctx, prompt, ImageStyle::Waifu).await
}

/// Draws a picture of the prompt
#[poise::command(prefix_command, slash_command)]
pub async fn imagine(
    ctx: Context<'_>,
    #[rest]
    #[description = "What to draw"]
    prompt: String,
) -> Result<(), Error> {
    enqueue_image(ctx, prompt, ImageStyle::Plain).await
}
