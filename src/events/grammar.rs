use poise::serenity_prelude::{self as serenity, CreateMessage};
use tracing::{debug, warn};

use crate::grammar;
use crate::utils::embed;
use crate::{Data, Error};

pub async fn handle(
    ctx: &serenity::Context,
    msg: &serenity::Message,
    data: &Data,
) -> Result<(), Error> {
    if msg.author.bot || !data.config.grammar.watched_users.contains(&msg.author.id.get()) {
        return Ok(());
    }
    if !grammar::mentions_your(&msg.content) {
        return Ok(());
    }

    let matches = match grammar::check(&data.http_client, &msg.content.to_lowercase()).await {
        Ok(m) => m,
        Err(e) => {
            warn!("grammar check failed: {e}");
            return Ok(());
        }
    };
    if matches.is_empty() {
        return Ok(());
    }

    let total = {
        let mut store = data.grammar.lock().await;
        if let Err(e) = store.reload() {
            warn!("could not reload grammar errors: {e}");
        }
        let total = grammar::increment(&mut store, msg.author.id.get(), matches.len() as u64);
        if let Err(e) = store.dump() {
            warn!("could not save grammar errors: {e}");
        }
        total
    };
    debug!("{} now has {total} grammar errors", msg.author.name);

    msg.react(ctx, '❌').await?;
    for m in &matches {
        msg.channel_id
            .send_message(
                ctx,
                CreateMessage::new()
                    .embed(embed::grammar_police(&m.message))
                    .reference_message(msg),
            )
            .await?;
    }

    Ok(())
}
