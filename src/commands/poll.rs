use chrono::Utc;
use poise::serenity_prelude::{self as serenity, ReactionType};
use poise::CreateReply;
use tracing::info;

use crate::poll::{self, PollRecord};
use crate::utils::embed;
use crate::{Context, Error};

/// Creates a new poll. Leave the choices empty for a yes/no poll.
#[poise::command(slash_command, guild_only)]
pub async fn poll(
    ctx: Context<'_>,
    #[description = "What are we voting on?"] question: String,
    #[description = "Choice 1"] choice_1: Option<String>,
    #[description = "Choice 2"] choice_2: Option<String>,
    #[description = "Choice 3"] choice_3: Option<String>,
    #[description = "Choice 4"] choice_4: Option<String>,
    #[description = "Choice 5"] choice_5: Option<String>,
    #[description = "Choice 6"] choice_6: Option<String>,
    #[description = "Choice 7"] choice_7: Option<String>,
    #[description = "Choice 8"] choice_8: Option<String>,
    #[description = "Choice 9"] choice_9: Option<String>,
    #[description = "Choice 10"] choice_10: Option<String>,
    #[description = "Choice 11"] choice_11: Option<String>,
    #[description = "Choice 12"] choice_12: Option<String>,
    #[description = "Choice 13"] choice_13: Option<String>,
) -> Result<(), Error> {
    let guild_id = ctx.guild_id().ok_or("this command only works in a server")?;

    let choices: Vec<String> = [
        choice_1, choice_2, choice_3, choice_4, choice_5, choice_6, choice_7, choice_8, choice_9,
        choice_10, choice_11, choice_12, choice_13,
    ]
    .into_iter()
    .flatten()
    .filter(|c| !c.trim().is_empty())
    .collect();

    let options = poll::build_options(&choices);
    let mut reply = CreateReply::default().content(format!("📋 **{question}**"));
    if !choices.is_empty() {
        reply = reply.embed(embed::poll_choices(&options));
    }

    let handle = ctx.send(reply).await?;
    let message = handle.message().await?;
    for option in &options {
        message
            .react(ctx.serenity_context(), ReactionType::Unicode(option.emoji.clone()))
            .await?;
    }

    let record = PollRecord {
        guild_id: guild_id.get(),
        channel_id: message.channel_id.get(),
        requester_id: ctx.author().id.get(),
        date_created: Utc::now().timestamp(),
        question,
        options,
    };
    {
        let mut store = ctx.data().polls.lock().await;
        store.reload()?;
        store.upsert(message.id.to_string(), record);
        store.dump()?;
    }
    info!("opened poll {} for {}", message.id, ctx.author().name);
    Ok(())
}

/// Closes a poll you created and posts the results
#[poise::command(context_menu_command = "Close Poll", guild_only)]
pub async fn close_poll(ctx: Context<'_>, message: serenity::Message) -> Result<(), Error> {
    let key = message.id.to_string();

    let closing = {
        let mut store = ctx.data().polls.lock().await;
        store.reload()?;
        match store.get(&key).map(|record| record.requester_id) {
            None => Err("That message isn't an open poll."),
            Some(owner) if owner != ctx.author().id.get() => {
                Err("Only the person who started the poll can close it.")
            }
            Some(_) => {
                let record = store.remove(&key);
                store.dump()?;
                record.ok_or("That message isn't an open poll.")
            }
        }
    };

    let record = match closing {
        Ok(record) => record,
        Err(reason) => {
            ctx.send(CreateReply::default().content(reason).ephemeral(true))
                .await?;
            return Ok(());
        }
    };

    poll::close(&ctx.serenity_context().http, message.id, &record).await?;
    ctx.send(CreateReply::default().content("Poll closed").ephemeral(true))
        .await?;
    Ok(())
}
