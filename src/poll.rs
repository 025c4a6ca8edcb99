//! Reaction polls and their 24 hour auto-close.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serenity::builder::EditMessage;
use serenity::http::Http;
use serenity::model::channel::{MessageReaction, ReactionType};
use serenity::model::id::{ChannelId, MessageId};
use tracing::{debug, info, warn};

use crate::store::{RecordStore, SharedStore};
use crate::utils::embed;
use crate::Error;

pub const POLL_LIFETIME_SECS: i64 = 24 * 60 * 60;
pub const MAX_CHOICES: usize = 13;

const LETTER_EMOJIS: [&str; 26] = [
    "🇦", "🇧", "🇨", "🇩", "🇪", "🇫", "🇬", "🇭", "🇮", "🇯", "🇰", "🇱", "🇲", "🇳", "🇴", "🇵",
    "🇶", "🇷", "🇸", "🇹", "🇺", "🇻", "🇼", "🇽", "🇾", "🇿",
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PollOption {
    pub emoji: String,
    pub label: String,
}

/// An open poll, keyed by its message id in the poll store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PollRecord {
    pub guild_id: u64,
    pub channel_id: u64,
    pub requester_id: u64,
    /// Unix seconds.
    pub date_created: i64,
    pub question: String,
    pub options: Vec<PollOption>,
}

impl PollRecord {
    pub fn is_expired(&self, now: i64) -> bool {
        now - self.date_created > POLL_LIFETIME_SECS
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tally {
    pub option: PollOption,
    pub votes: u64,
}

const VARIATION_SELECTOR: char = '\u{FE0F}';
const ZERO_WIDTH_JOINER: char = '\u{200D}';
const KEYCAP: char = '\u{20E3}';

fn is_emoji(c: char) -> bool {
    matches!(c as u32, 0x1F300..=0x1FAFF | 0x2600..=0x27BF | 0x2B00..=0x2BFF)
}

fn is_regional_indicator(c: char) -> bool {
    matches!(c as u32, 0x1F1E6..=0x1F1FF)
}

fn is_skin_tone(c: char) -> bool {
    matches!(c as u32, 0x1F3FB..=0x1F3FF)
}

/// Splits the emoji a choice starts with from the rest of it. Keeps variation
/// selectors, skin tones, keycaps, flags and joined sequences together.
fn leading_emoji(choice: &str) -> Option<(&str, &str)> {
    let chars: Vec<char> = choice.chars().collect();
    let first = *chars.first()?;
    let mut len = 1;

    if first.is_ascii_digit() || first == '#' || first == '*' {
        if chars.get(len) == Some(&VARIATION_SELECTOR) {
            len += 1;
        }
        if chars.get(len) != Some(&KEYCAP) {
            return None;
        }
        len += 1;
    } else if is_regional_indicator(first) {
        if !chars.get(1).is_some_and(|&c| is_regional_indicator(c)) {
            return None;
        }
        len = 2;
    } else if is_emoji(first) {
        while let Some(&c) = chars.get(len) {
            if c == VARIATION_SELECTOR || c == KEYCAP || is_skin_tone(c) {
                len += 1;
            } else if c == ZERO_WIDTH_JOINER && chars.get(len + 1).is_some() {
                len += 2;
            } else {
                break;
            }
        }
    } else {
        return None;
    }

    let end: usize = chars[..len].iter().map(|c| c.len_utf8()).sum();
    Some(choice.split_at(end))
}

/// Reactions are matched with variation selectors ignored, since clients
/// disagree on whether to send them.
fn emoji_key(emoji: &str) -> String {
    emoji.chars().filter(|&c| c != VARIATION_SELECTOR).collect()
}

/// Options for a poll. No choices means a yes/no poll; a choice that starts
/// with an emoji votes with that emoji, the rest get letters in order.
pub fn build_options(choices: &[String]) -> Vec<PollOption> {
    if choices.is_empty() {
        return vec![
            PollOption {
                emoji: "👍".to_string(),
                label: "Yes".to_string(),
            },
            PollOption {
                emoji: "👎".to_string(),
                label: "No".to_string(),
            },
        ];
    }

    choices
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let choice = choice.trim();
            match leading_emoji(choice) {
                Some((emoji, rest)) => {
                    let label = rest.trim();
                    PollOption {
                        emoji: emoji.to_string(),
                        label: if label.is_empty() { choice.to_string() } else { label.to_string() },
                    }
                }
                None => PollOption {
                    emoji: LETTER_EMOJIS[i % LETTER_EMOJIS.len()].to_string(),
                    label: choice.to_string(),
                },
            }
        })
        .collect()
}

/// Votes per emoji, not counting the bot's own seed reaction.
pub fn reaction_counts(reactions: &[MessageReaction]) -> HashMap<String, u64> {
    reactions
        .iter()
        .filter_map(|r| {
            let key = match &r.reaction_type {
                ReactionType::Unicode(s) => s.clone(),
                ReactionType::Custom { name, .. } => name.clone()?,
                _ => return None,
            };
            let votes = r.count.saturating_sub(u64::from(r.me));
            Some((emoji_key(&key), votes))
        })
        .collect()
}

pub fn tally(options: &[PollOption], counts: &HashMap<String, u64>) -> Vec<Tally> {
    options
        .iter()
        .map(|option| Tally {
            option: option.clone(),
            votes: counts.get(&emoji_key(&option.emoji)).copied().unwrap_or(0),
        })
        .collect()
}

/// Removes every poll older than a day from the store and returns them.
pub fn take_expired(store: &mut RecordStore<PollRecord>, now: i64) -> Vec<(String, PollRecord)> {
    let expired: Vec<String> = store
        .iter()
        .filter(|(_, poll)| poll.is_expired(now))
        .map(|(id, _)| id.clone())
        .collect();

    expired
        .into_iter()
        .filter_map(|id| store.remove(&id).map(|poll| (id, poll)))
        .collect()
}

/// Tallies the reactions on a poll message and edits the results in.
pub async fn close(http: &Arc<Http>, message_id: MessageId, poll: &PollRecord) -> Result<(), Error> {
    let channel = ChannelId::new(poll.channel_id);
    let message = channel.message(http, message_id).await?;
    let results = tally(&poll.options, &reaction_counts(&message.reactions));

    channel
        .edit_message(
            http,
            message_id,
            EditMessage::new()
                .content(format!("📋 **{}** (closed)", poll.question))
                .embed(embed::poll_results(&poll.question, &results)),
        )
        .await?;

    debug!("closed poll {message_id}");
    Ok(())
}

/// One auto-close pass over the poll store.
pub async fn auto_close(http: &Arc<Http>, store: &SharedStore<PollRecord>, now: i64) {
    info!("checking for polls to auto close");
    let mut store = store.lock().await;
    if let Err(e) = store.reload() {
        warn!("could not reload polls: {e}");
        return;
    }

    for (id, poll) in take_expired(&mut store, now) {
        let Ok(message_id) = id.parse::<u64>() else {
            warn!("dropping poll with malformed id {id}");
            continue;
        };
        if let Err(e) = close(http, MessageId::new(message_id), &poll).await {
            warn!("failed to close poll {id}: {e}");
        }
    }

    if let Err(e) = store.dump() {
        warn!("could not save polls: {e}");
    }
    info!("finished auto closing polls");
}
