pub mod grammar;
pub mod reaction_roles;

use poise::serenity_prelude as serenity;
use tracing::info;

use crate::{Data, Error};

pub async fn handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("logged in as {} ({})", data_about_bot.user.name, data_about_bot.user.id);
            ctx.set_activity(Some(serenity::ActivityData::watching("humans scoop 💩")));
        }
        serenity::FullEvent::Message { new_message } => {
            grammar::handle(ctx, new_message, data).await?;
        }
        serenity::FullEvent::ReactionAdd { add_reaction } => {
            reaction_roles::handle(ctx, add_reaction, true, data).await?;
        }
        serenity::FullEvent::ReactionRemove { removed_reaction } => {
            reaction_roles::handle(ctx, removed_reaction, false, data).await?;
        }
        _ => {}
    }
    Ok(())
}
