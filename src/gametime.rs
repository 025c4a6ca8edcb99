//! Time-played tracking from member presences.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::time::{Duration, Instant};

use serenity::cache::Cache;
use serenity::model::gateway::ActivityType;
use serenity::model::id::UserId;
use tracing::debug;

use crate::store::{RecordStore, StoreError};

pub const TICK: Duration = Duration::from_secs(60);
pub const SAVE_EVERY: Duration = Duration::from_secs(2000);

/// Game name to seconds played, for one user.
pub type GameTimes = BTreeMap<String, u64>;

pub struct GameTracker {
    store: RecordStore<GameTimes>,
    tick: Duration,
    save_every: Duration,
    last_save: Instant,
}

impl GameTracker {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Ok(Self::new(RecordStore::open(path)?, TICK, SAVE_EVERY, Instant::now()))
    }

    pub fn new(store: RecordStore<GameTimes>, tick: Duration, save_every: Duration, now: Instant) -> Self {
        Self {
            store,
            tick,
            save_every,
            last_save: now,
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn increment(&mut self, user_id: UserId, game: &str, seconds: u64) {
        let played = self
            .store
            .get_or_default(&user_id.to_string())
            .entry(game.to_string())
            .or_default();
        *played += seconds;
    }

    /// Credits one tick of play time to every sampled (user, games) pair.
    pub fn record_tick(&mut self, samples: &[(UserId, Vec<String>)]) {
        let seconds = self.tick.as_secs();
        for (user_id, games) in samples {
            for game in games {
                self.increment(*user_id, game, seconds);
            }
        }
        debug!("recorded gametime for {} members", samples.len());
    }

    /// Writes the store when the save threshold has passed or `force` is set.
    /// Returns whether a write happened.
    pub fn maybe_save(&mut self, now: Instant, force: bool) -> Result<bool, StoreError> {
        if !force && now.duration_since(self.last_save) < self.save_every {
            return Ok(false);
        }
        debug!("saving gametime data to storage");
        self.store.dump()?;
        self.last_save = now;
        Ok(true)
    }

    /// The user's games, most played first.
    pub fn played(&self, user_id: UserId) -> Option<Vec<(String, u64)>> {
        let games = self.store.get(&user_id.to_string())?;
        let mut games: Vec<(String, u64)> = games.iter().map(|(g, s)| (g.clone(), *s)).collect();
        games.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Some(games)
    }

    pub fn seconds_played(&self, user_id: UserId, game: &str) -> u64 {
        self.store
            .get(&user_id.to_string())
            .and_then(|games| games.get(game))
            .copied()
            .unwrap_or(0)
    }
}

/// Games currently being played by non-bot members, each member counted once
/// even when they share several guilds with the bot.
pub fn sample_playing(cache: &Cache) -> Vec<(UserId, Vec<String>)> {
    let mut seen = HashSet::new();
    let mut samples = Vec::new();

    for guild_id in cache.guilds() {
        let Some(guild) = cache.guild(guild_id) else {
            continue;
        };

        for (user_id, presence) in &guild.presences {
            if seen.contains(user_id) {
                continue;
            }
            let is_bot = presence
                .user
                .bot
                .or_else(|| guild.members.get(user_id).map(|m| m.user.bot))
                .unwrap_or(false);
            if is_bot {
                continue;
            }

            let games: Vec<String> = presence
                .activities
                .iter()
                .filter(|a| a.kind == ActivityType::Playing)
                .map(|a| a.name.clone())
                .collect();
            if !games.is_empty() {
                seen.insert(*user_id);
                samples.push((*user_id, games));
            }
        }
    }

    samples
}

/// "2 days, 3 hours, 4 minutes, and 5 seconds"; days are left out when zero.
pub fn format_duration(total_secs: u64) -> String {
    let (minutes, seconds) = (total_secs / 60, total_secs % 60);
    let (hours, minutes) = (minutes / 60, minutes % 60);
    let (days, hours) = (hours / 24, hours % 24);

    if days > 0 {
        format!("{days} days, {hours} hours, {minutes} minutes, and {seconds} seconds")
    } else {
        format!("{hours} hours, {minutes} minutes, and {seconds} seconds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0 hours, 0 minutes, and 0 seconds");
        assert_eq!(format_duration(3_725), "1 hours, 2 minutes, and 5 seconds");
        assert_eq!(
            format_duration(2 * 86_400 + 3 * 3_600 + 4 * 60 + 5),
            "2 days, 3 hours, 4 minutes, and 5 seconds"
        );
    }

    #[test]
    fn test_played_sorted_most_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("gametime.json")).unwrap();
        let mut tracker = GameTracker::new(store, TICK, SAVE_EVERY, Instant::now());
        let user = UserId::new(1);

        tracker.increment(user, "Squad", 60);
        tracker.increment(user, "Phasmophobia", 600);
        tracker.increment(user, "Jackbox", 120);

        let played = tracker.played(user).unwrap();
        let names: Vec<&str> = played.iter().map(|(g, _)| g.as_str()).collect();
        assert_eq!(names, ["Phasmophobia", "Jackbox", "Squad"]);
        assert!(tracker.played(UserId::new(2)).is_none());
    }
}
