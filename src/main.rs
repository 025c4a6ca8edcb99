use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use clap::Parser;
use poise::serenity_prelude as serenity;
use pooper_scooper::birthday::BirthdayRecord;
use pooper_scooper::config::{Cli, Config};
use pooper_scooper::executor::TaskRunner;
use pooper_scooper::gametime::GameTracker;
use pooper_scooper::imagegen::GeminiClient;
use pooper_scooper::poll::PollRecord;
use pooper_scooper::store::RecordStore;
use pooper_scooper::{commands, events, maintenance, music, queue, Data};
use songbird::{SerenityInit, Songbird};
use tokio::sync::Mutex;
use tracing::{error, info, warn, Level};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_logging(data_dir: &Path, debug: bool) -> Option<WorkerGuard> {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    let filter = || {
        EnvFilter::builder()
            .with_default_directive(level.into())
            .from_env_lossy()
    };
    let stdout = tracing_subscriber::fmt::layer().with_filter(filter());

    let log_file = std::fs::create_dir_all(data_dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(data_dir.join("pooperscooper.log"))
    });

    match log_file {
        Ok(file) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::registry()
                .with(stdout)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false)
                        .with_filter(filter()),
                )
                .init();
            Some(guard)
        }
        Err(e) => {
            tracing_subscriber::registry().with(stdout).init();
            warn!("logging to stdout only, log file unavailable: {e}");
            None
        }
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::load(&cli.credentials) {
        Ok(c) => Arc::new(c),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let _log_guard = init_logging(&config.data_dir, cli.debug);
    if cli.debug {
        tracing::debug!("enabling debug level logging");
    }

    let opened = (
        RecordStore::<BirthdayRecord>::open_shared(config.data_file("birthdays.json")),
        RecordStore::<PollRecord>::open_shared(config.data_file("polls.json")),
        RecordStore::<u64>::open_shared(config.data_file("grammarpolice.json")),
        GameTracker::open(config.data_file("gametime.json")),
    );
    let (birthdays, polls, grammar, gametime) = match opened {
        (Ok(b), Ok(p), Ok(g), Ok(t)) => (b, p, g, Arc::new(Mutex::new(t))),
        (b, p, g, t) => {
            for e in [b.err(), p.err(), g.err(), t.err()].into_iter().flatten() {
                error!("{e}");
            }
            std::process::exit(1);
        }
    };

    let http_client = reqwest::Client::new();
    let voice = Songbird::serenity();
    let sessions = music::new_sessions();
    let images = Arc::new(queue::TaskQueue::new());

    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_PRESENCES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = {
        let config = config.clone();
        let voice = voice.clone();
        let gametime = gametime.clone();

        poise::Framework::builder()
            .options(poise::FrameworkOptions {
                commands: commands::all(),
                prefix_options: poise::PrefixFrameworkOptions {
                    prefix: Some(config.prefix.clone()),
                    ..Default::default()
                },
                event_handler: |ctx, event, framework, data| {
                    Box::pin(events::handler(ctx, event, framework, data))
                },
                ..Default::default()
            })
            .setup(move |ctx, _ready, framework| {
                Box::pin(async move {
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;

                    let image_backend = match &config.gemini_api_key {
                        Some(key) if config.image_generation_enabled() => {
                            Some(GeminiClient::new(http_client.clone(), key.clone()))
                        }
                        _ => {
                            warn!("no gemini_api_key configured, image generation disabled");
                            None
                        }
                    };

                    if config.roles.is_none() {
                        info!("no reaction roles configured, role assignment disabled");
                    }

                    let executor = Arc::new(TaskRunner::new(
                        ctx.http.clone(),
                        voice.clone(),
                        sessions.clone(),
                        http_client.clone(),
                        image_backend,
                    ));
                    queue::worker::spawn(images.clone(), executor.clone());

                    maintenance::start(
                        ctx.clone(),
                        maintenance::Handles {
                            sessions: sessions.clone(),
                            voice: voice.clone(),
                            birthdays: birthdays.clone(),
                            polls: polls.clone(),
                            gametime: gametime.clone(),
                        },
                    );

                    info!("PooperScooper is ready to scoop");
                    Ok(Data {
                        config,
                        voice,
                        sessions,
                        images,
                        executor,
                        http_client,
                        birthdays,
                        polls,
                        grammar,
                        gametime,
                        started_at: Utc::now(),
                    })
                })
            })
            .build()
    };

    let mut client = match serenity::ClientBuilder::new(&config.token, intents)
        .framework(framework)
        .register_songbird_with(voice)
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!("failed to create client: {e}");
            std::process::exit(1);
        }
    };

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("could not listen for ctrl-c: {e}");
            return;
        }
        info!("shutting down");
        if let Err(e) = gametime.lock().await.maybe_save(Instant::now(), true) {
            error!("could not save gametime on shutdown: {e}");
        }
        shard_manager.shutdown_all().await;
    });

    if let Err(e) = client.start().await {
        error!("client error: {e}");
    }
}
