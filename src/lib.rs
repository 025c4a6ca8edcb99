pub mod birthday;
pub mod commands;
pub mod config;
pub mod events;
pub mod executor;
pub mod gametime;
pub mod grammar;
pub mod imagegen;
pub mod maintenance;
pub mod music;
pub mod poll;
pub mod queue;
pub mod store;
pub mod utils;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use songbird::Songbird;
use tokio::sync::Mutex;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub struct Data {
    pub config: Arc<config::Config>,
    pub voice: Arc<Songbird>,
    pub sessions: music::Sessions,
    /// The one global image generation queue.
    pub images: Arc<queue::TaskQueue>,
    pub executor: Arc<executor::TaskRunner>,
    pub http_client: reqwest::Client,
    pub birthdays: store::SharedStore<birthday::BirthdayRecord>,
    pub polls: store::SharedStore<poll::PollRecord>,
    pub grammar: store::SharedStore<u64>,
    pub gametime: Arc<Mutex<gametime::GameTracker>>,
    pub started_at: DateTime<Utc>,
}
