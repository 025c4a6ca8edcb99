use std::collections::HashMap;

use poise::serenity_prelude as serenity;
use serenity::GuildId;
use songbird::Songbird;
use tracing::{info, warn};

use crate::music::{self, Sessions};

/// Tears down every session whose channel has no listeners left and returns
/// the affected guilds. Guilds missing from `listeners` count as empty.
pub async fn sweep(sessions: &Sessions, listeners: &HashMap<GuildId, usize>) -> Vec<GuildId> {
    let guilds: Vec<GuildId> = sessions.read().await.keys().copied().collect();
    let mut closed = Vec::new();

    for guild_id in guilds {
        if listeners.get(&guild_id).copied().unwrap_or(0) > 0 {
            continue;
        }
        if music::close(sessions, guild_id).await {
            closed.push(guild_id);
        }
    }

    closed
}

/// Non-bot members in the given voice channel.
fn count_listeners(cache: &serenity::Cache, guild_id: GuildId, channel: u64) -> usize {
    let Some(guild) = cache.guild(guild_id) else {
        return 0;
    };

    guild
        .voice_states
        .values()
        .filter(|vs| vs.channel_id.is_some_and(|ch| ch.get() == channel))
        .filter(|vs| {
            let is_bot = vs
                .member
                .as_ref()
                .map(|m| m.user.bot)
                .or_else(|| guild.members.get(&vs.user_id).map(|m| m.user.bot))
                .unwrap_or(false);
            !is_bot
        })
        .count()
}

pub async fn run(ctx: &serenity::Context, sessions: &Sessions, voice: &Songbird) {
    let guilds: Vec<GuildId> = sessions.read().await.keys().copied().collect();
    let mut listeners = HashMap::new();

    for guild_id in guilds {
        let channel = match voice.get(guild_id) {
            Some(call) => call.lock().await.current_channel(),
            None => None,
        };
        let count = match channel {
            Some(ch) => count_listeners(&ctx.cache, guild_id, ch.0.get()),
            None => 0,
        };
        listeners.insert(guild_id, count);
    }

    for guild_id in sweep(sessions, &listeners).await {
        info!("nobody left listening, leaving voice (guild: {guild_id})");
        if let Err(e) = voice.remove(guild_id).await {
            warn!("failed to leave voice channel (guild: {guild_id}): {e}");
        }
    }
}
