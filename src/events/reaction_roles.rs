use poise::serenity_prelude::{self as serenity, ReactionType, RoleId};
use tracing::info;

use crate::config::RolesConfig;
use crate::{Data, Error};

fn emoji_name(emoji: &ReactionType) -> Option<&str> {
    match emoji {
        ReactionType::Unicode(s) => Some(s.as_str()),
        ReactionType::Custom { name, .. } => name.as_deref(),
        _ => None,
    }
}

/// Role mapped to a reaction in the role-selection channel, if any.
pub fn role_for(
    roles: &RolesConfig,
    guild_id: Option<u64>,
    channel_id: u64,
    emoji: &ReactionType,
) -> Option<RoleId> {
    if guild_id != Some(roles.guild_id) || channel_id != roles.channel_id {
        return None;
    }
    emoji_name(emoji)
        .and_then(|name| roles.reactions.get(name))
        .map(|id| RoleId::new(*id))
}

pub async fn handle(
    ctx: &serenity::Context,
    reaction: &serenity::Reaction,
    added: bool,
    data: &Data,
) -> Result<(), Error> {
    let Some(roles) = &data.config.roles else {
        return Ok(());
    };
    let (Some(guild_id), Some(user_id)) = (reaction.guild_id, reaction.user_id) else {
        return Ok(());
    };
    let Some(role_id) = role_for(
        roles,
        Some(guild_id.get()),
        reaction.channel_id.get(),
        &reaction.emoji,
    ) else {
        return Ok(());
    };

    let reason = format!("User reacted with {}", reaction.emoji);
    if added {
        ctx.http
            .add_member_role(guild_id, user_id, role_id, Some(reason.as_str()))
            .await?;
        info!("granted role {role_id} to {user_id}");
    } else {
        ctx.http
            .remove_member_role(guild_id, user_id, role_id, Some(reason.as_str()))
            .await?;
        info!("removed role {role_id} from {user_id}");
    }

    Ok(())
}
