//! Birthday records and the daily announcement check.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serenity::cache::Cache;
use serenity::http::Http;
use serenity::model::id::GuildId;
use tracing::{debug, info, warn};

use crate::store::{RecordStore, SharedStore};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BirthdayRecord {
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub birthday_announced: bool,
    /// Guild the birthday was registered in; announcements go there.
    pub server_requested: u64,
}

impl BirthdayRecord {
    pub fn new(month: u32, day: u32, year: Option<i32>, guild_id: u64) -> Result<Self, String> {
        // 2000 is a leap year, so Feb 29 validates when no year is given
        if NaiveDate::from_ymd_opt(year.unwrap_or(2000), month, day).is_none() {
            return Err(format!("{month}/{day} is not a real date"));
        }
        Ok(Self {
            month,
            day,
            year,
            birthday_announced: false,
            server_requested: guild_id,
        })
    }

    /// Feb 29 birthdays fall on Feb 28 in common years.
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        if self.month == date.month() && self.day == date.day() {
            return true;
        }
        let leap = NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some();
        self.month == 2 && self.day == 29 && !leap && date.month() == 2 && date.day() == 28
    }

    pub fn age_on(&self, date: NaiveDate) -> Option<i32> {
        self.year.map(|year| date.year() - year)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Announcement {
    pub user_id: u64,
    pub guild_id: u64,
    pub age: Option<i32>,
}

impl Announcement {
    pub fn message(&self) -> String {
        match self.age {
            Some(age) if age > 0 => {
                format!("🎂 Happy birthday <@{}>! Scooping {age} years of poop 🎉", self.user_id)
            }
            _ => format!("🎂 Happy birthday <@{}>! 🎉", self.user_id),
        }
    }
}

/// Marks today's birthdays as announced and resets everyone else's flag.
/// Running it again on the same day yields nothing new.
pub fn check(store: &mut RecordStore<BirthdayRecord>, today: NaiveDate) -> Vec<Announcement> {
    let mut due = Vec::new();

    for (user_id, record) in store.iter_mut() {
        if !record.falls_on(today) {
            record.birthday_announced = false;
            continue;
        }
        if record.birthday_announced {
            continue;
        }

        let Ok(user_id) = user_id.parse::<u64>() else {
            warn!("skipping birthday with malformed user id {user_id}");
            continue;
        };
        record.birthday_announced = true;
        due.push(Announcement {
            user_id,
            guild_id: record.server_requested,
            age: record.age_on(today),
        });
    }

    due
}

/// One birthday pass: reload, check, persist, announce.
pub async fn announce(http: &Arc<Http>, cache: &Arc<Cache>, store: &SharedStore<BirthdayRecord>, today: NaiveDate) {
    let due = {
        let mut store = store.lock().await;
        if let Err(e) = store.reload() {
            warn!("could not reload birthdays: {e}");
            return;
        }
        let due = check(&mut store, today);
        if let Err(e) = store.dump() {
            warn!("could not save birthdays: {e}");
        }
        due
    };
    debug!("{} birthdays to announce", due.len());

    for announcement in due {
        let channel = cache
            .guild(GuildId::new(announcement.guild_id))
            .and_then(|guild| guild.system_channel_id);

        let Some(channel) = channel else {
            warn!("no announcement channel in guild {}", announcement.guild_id);
            continue;
        };
        match channel.say(http, announcement.message()).await {
            Ok(_) => info!("announced birthday of {}", announcement.user_id),
            Err(e) => warn!("failed to announce birthday of {}: {e}", announcement.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(BirthdayRecord::new(2, 30, None, 1).is_err());
        assert!(BirthdayRecord::new(13, 1, None, 1).is_err());
        assert!(BirthdayRecord::new(2, 29, Some(2001), 1).is_err());
        assert!(BirthdayRecord::new(2, 29, None, 1).is_ok());
    }

    #[test]
    fn test_leap_day_birthday_in_common_year() {
        let record = BirthdayRecord::new(2, 29, None, 1).unwrap();
        assert!(record.falls_on(date(2023, 2, 28)));
        assert!(!record.falls_on(date(2024, 2, 28)));
        assert!(record.falls_on(date(2024, 2, 29)));
    }

    #[test]
    fn test_message_mentions_age() {
        let a = Announcement {
            user_id: 7,
            guild_id: 1,
            age: Some(30),
        };
        assert!(a.message().contains("<@7>"));
        assert!(a.message().contains("30 years"));
    }
}
