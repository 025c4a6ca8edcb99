//! Fixed-interval background passes.

pub mod idle;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, Utc};
use poise::serenity_prelude as serenity;
use songbird::Songbird;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant as TokioInstant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::birthday::{self, BirthdayRecord};
use crate::gametime::{self, GameTracker};
use crate::music::Sessions;
use crate::poll::{self, PollRecord};
use crate::store::SharedStore;

pub const IDLE_SWEEP_EVERY: Duration = Duration::from_secs(30);
pub const BIRTHDAY_CHECK_EVERY: Duration = Duration::from_secs(8 * 3600);
pub const POLL_CHECK_EVERY: Duration = Duration::from_secs(3600);

/// When a timer runs its first pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirstPass {
    Immediately,
    /// One full period after start, for passes that account for elapsed time.
    AfterPeriod,
}

pub fn ticker(period: Duration, first: FirstPass) -> Interval {
    let mut interval = match first {
        FirstPass::Immediately => tokio::time::interval(period),
        FirstPass::AfterPeriod => tokio::time::interval_at(TokioInstant::now() + period, period),
    };
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval
}

/// Runs `pass` every `period`. A pass handles and logs its own failures so the
/// loop never stops.
pub fn spawn_every<F, Fut>(
    name: &'static str,
    period: Duration,
    first: FirstPass,
    mut pass: F,
) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut interval = ticker(period, first);
        info!("{name} timer started (every {}s)", period.as_secs());
        loop {
            interval.tick().await;
            debug!("{name} pass");
            pass().await;
        }
    })
}

/// Everything the timers touch.
pub struct Handles {
    pub sessions: Sessions,
    pub voice: Arc<Songbird>,
    pub birthdays: SharedStore<BirthdayRecord>,
    pub polls: SharedStore<PollRecord>,
    pub gametime: Arc<Mutex<GameTracker>>,
}

pub fn start(ctx: serenity::Context, handles: Handles) -> Vec<JoinHandle<()>> {
    let Handles {
        sessions,
        voice,
        birthdays,
        polls,
        gametime,
    } = handles;

    let idle = {
        let ctx = ctx.clone();
        spawn_every("idle sweep", IDLE_SWEEP_EVERY, FirstPass::Immediately, move || {
            let ctx = ctx.clone();
            let sessions = sessions.clone();
            let voice = voice.clone();
            async move { idle::run(&ctx, &sessions, &voice).await }
        })
    };

    let birthdays = {
        let ctx = ctx.clone();
        spawn_every("birthday", BIRTHDAY_CHECK_EVERY, FirstPass::Immediately, move || {
            let ctx = ctx.clone();
            let store = birthdays.clone();
            async move {
                let today = Local::now().date_naive();
                birthday::announce(&ctx.http, &ctx.cache, &store, today).await;
            }
        })
    };

    let polls = {
        let ctx = ctx.clone();
        spawn_every("poll auto-close", POLL_CHECK_EVERY, FirstPass::Immediately, move || {
            let ctx = ctx.clone();
            let store = polls.clone();
            async move { poll::auto_close(&ctx.http, &store, Utc::now().timestamp()).await }
        })
    };

    let gametime = {
        let period = gametime::TICK;
        spawn_every("gametime", period, FirstPass::AfterPeriod, move || {
            let ctx = ctx.clone();
            let tracker = gametime.clone();
            async move {
                let samples = gametime::sample_playing(&ctx.cache);
                let mut tracker = tracker.lock().await;
                tracker.record_tick(&samples);
                if let Err(e) = tracker.maybe_save(Instant::now(), false) {
                    warn!("could not save gametime: {e}");
                }
            }
        })
    };

    vec![idle, birthdays, polls, gametime]
}
