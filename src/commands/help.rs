use poise::serenity_prelude::CreateEmbed;
use poise::CreateReply;

use crate::{Context, Error};

async fn help_impl(ctx: Context<'_>) -> Result<(), Error> {
    let prefix = &ctx.data().config.prefix;

    let music_cmds = format!(
        "\
`{prefix}join`: join your voice channel
`{prefix}play` (`{prefix}p`): play a song or add it to the queue
`{prefix}skip` (`{prefix}s`): skip the current song
`{prefix}stop` (`{prefix}st`): stop, clear the queue and leave
`{prefix}queue` (`{prefix}q`): show the queue
`{prefix}pause` / `{prefix}resume`: pause or resume
`{prefix}nowplaying` (`{prefix}np`): the song that is playing
`{prefix}loop` (`{prefix}l`): loop mode (off/song/queue)
`{prefix}shuffle`: shuffle the queue
`{prefix}remove` (`{prefix}rm`): remove a song from the queue
`{prefix}volume` (`{prefix}v`): volume (0-100)"
    );

    let fun_cmds = format!(
        "\
`{prefix}imagine`: draw a picture of the prompt
`{prefix}waifu`: draw an anime picture of the prompt
`{prefix}played`: your time played per game
`{prefix}save`: save game time now
`{prefix}grammar-errors`: your vs you're error count
`/poll`: start a poll, close it from the message menu
`/birthday-add` / `/birthday-delete`: birthday reminders"
    );

    let general_cmds = format!(
        "\
`{prefix}uptime`: how long I've been scooping
`{prefix}about`: about me
`{prefix}help`: this message"
    );

    let embed = CreateEmbed::new()
        .title("PooperScooper help")
        .field("Music", music_cmds, false)
        .field("Fun", fun_cmds, false)
        .field("General", general_cmds, false)
        .color(0x3498DB);

    ctx.send(CreateReply::default().embed(embed)).await?;
    Ok(())
}

/// Lists the bot's commands
#[poise::command(prefix_command, slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    help_impl(ctx).await
}
