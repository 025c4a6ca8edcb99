mod birthday;
mod gametime;
mod general;
mod grammar;
mod help;
mod image;
mod loop_cmd;
mod nowplaying;
mod pause;
mod play;
mod poll;
mod queue;
mod remove;
mod shuffle;
mod skip;
mod stop;
mod volume;

use std::sync::Arc;

use poise::serenity_prelude::GuildId;
use poise::CreateReply;

use crate::music::{self, Session};
use crate::queue::Origin;
use crate::utils::embed;
use crate::{Context, Data, Error};

pub fn all() -> Vec<poise::Command<Data, Error>> {
    vec![
        help::help(),
        general::uptime(),
        general::about(),
        play::join(),
        play::play(),
        play::p(),
        skip::skip(),
        skip::s(),
        stop::stop(),
        stop::st(),
        queue::queue(),
        queue::q(),
        pause::pause(),
        pause::resume(),
        nowplaying::nowplaying(),
        nowplaying::np(),
        loop_cmd::loop_cmd(),
        loop_cmd::l(),
        shuffle::shuffle(),
        remove::remove(),
        remove::rm(),
        volume::volume(),
        volume::v(),
        image::waifu(),
        image::imagine(),
        gametime::played(),
        gametime::save(),
        birthday::birthday_add(),
        birthday::birthday_delete(),
        poll::poll(),
        poll::close_poll(),
        grammar::grammar_errors(),
    ]
}

/// Who invoked the command and where replies to its queued work should go.
pub(crate) fn origin(ctx: Context<'_>) -> Origin {
    let message_id = match ctx {
        poise::Context::Prefix(prefix) => Some(prefix.msg.id),
        _ => None,
    };
    Origin {
        guild_id: ctx.guild_id(),
        channel_id: ctx.channel_id(),
        message_id,
        requester_id: ctx.author().id,
        requester: ctx.author().name.clone(),
    }
}

/// The guild's live music session. Replies with an error embed when there is none.
pub(crate) async fn active_session(
    ctx: Context<'_>,
) -> Result<Option<(GuildId, Arc<Session>)>, Error> {
    let guild_id = ctx.guild_id().ok_or("this command only works in a server")?;
    match music::get(&ctx.data().sessions, guild_id).await {
        Some(session) => Ok(Some((guild_id, session))),
        None => {
            ctx.send(CreateReply::default().embed(embed::error("Nothing is playing right now.")))
                .await?;
            Ok(None)
        }
    }
}
