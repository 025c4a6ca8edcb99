use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use songbird::events::{Event, EventContext, EventHandler, TrackEvent};
use songbird::input::YoutubeDl;
use songbird::tracks::PlayMode;
use songbird::Call;
use tokio::sync::{oneshot, Mutex};
use tracing::{debug, info};

use super::{Session, Song};
use crate::Error;

type Completion = Arc<StdMutex<Option<oneshot::Sender<Result<(), String>>>>>;

/// Resolves the playback future when the track ends or errors.
struct TrackEndNotifier {
    done: Completion,
}

#[async_trait]
impl EventHandler for TrackEndNotifier {
    async fn act(&self, ctx: &EventContext<'_>) -> Option<Event> {
        let outcome = match ctx {
            EventContext::Track(tracks) => match tracks.first().map(|(state, _)| &state.playing) {
                Some(PlayMode::Errored(e)) => Err(format!("{e:?}")),
                _ => Ok(()),
            },
            _ => Ok(()),
        };

        let sender = self.done.lock().ok().and_then(|mut done| done.take());
        if let Some(sender) = sender {
            let _ = sender.send(outcome);
        }

        Some(Event::Cancel)
    }
}

/// Plays `song` on `call` and waits until the track has finished.
pub async fn play(
    session: &Session,
    call: &Arc<Mutex<Call>>,
    http_client: &reqwest::Client,
    song: &Song,
) -> Result<(), Error> {
    let src = YoutubeDl::new(http_client.clone(), song.url.clone());
    let volume = session.volume().await;

    let (tx, rx) = oneshot::channel();
    let done: Completion = Arc::new(StdMutex::new(Some(tx)));

    let track = {
        let mut handler = call.lock().await;
        let track = handler.play_only(src.into());
        let _ = track.set_volume(volume);

        track.add_event(
            Event::Track(TrackEvent::End),
            TrackEndNotifier { done: done.clone() },
        )?;
        track.add_event(Event::Track(TrackEvent::Error), TrackEndNotifier { done })?;

        track
    }; // handler lock dropped here

    session.set_track(Some(track)).await;
    info!("playing: {}", song.title);

    let outcome = rx.await;
    session.set_track(None).await;

    match outcome {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(format!("playback of **{}** failed: {e}", song.title).into()),
        // The driver went away with the call, so the song is over.
        Err(_) => {
            debug!("voice driver dropped during {}", song.title);
            Ok(())
        }
    }
}
