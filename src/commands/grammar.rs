use poise::serenity_prelude as serenity;
use poise::CreateReply;

use crate::utils::embed;
use crate::{Context, Error};

/// Shows how many your/you're mistakes someone has made
#[poise::command(prefix_command, slash_command, rename = "grammar-errors")]
pub async fn grammar_errors(
    ctx: Context<'_>,
    #[description = "Whose errors to count (defaults to you)"] user: Option<serenity::User>,
) -> Result<(), Error> {
    let user = user.as_ref().unwrap_or_else(|| ctx.author());

    let errors = {
        let mut store = ctx.data().grammar.lock().await;
        store.reload()?;
        store.get(&user.id.to_string()).copied()
    };

    let description = match errors {
        Some(count) => format!("{}'s Your vs You're Error Count: {count}", user.name),
        None => format!("{} hasn't made an error yet!", user.name),
    };

    ctx.send(CreateReply::default().embed(embed::grammar_police(&description)))
        .await?;
    Ok(())
}
