//! Audio transport driver.
//!
//! Wires the pure [`PlaybackController`] state machine to a rodio sink.
//! User intents go through the controller first; the returned transport
//! commands are then executed against the sink, so the controller is the
//! single owner of "what is playing" and the sink never disagrees with it.
//!
//! A background tick task polls the sink while a track is loaded, feeds
//! elapsed/duration into the controller, detects end-of-track, and
//! publishes state snapshots through a watch channel for observers.

use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use relabel_core::{PlaybackController, PlaybackError, PlaybackState, TransportCommand};

use crate::api::ApiClient;

/// How often the tick task samples the sink position while playing.
const TICK_PERIOD: Duration = Duration::from_millis(200);

struct PlayerShared {
    controller: Mutex<PlaybackController>,
    sink: Mutex<Option<Sink>>,
    duration: Mutex<Option<Duration>>,
    snapshot: watch::Sender<PlaybackState>,
}

impl PlayerShared {
    fn publish(&self) {
        let state = self.controller.lock().unwrap().state().clone();
        self.snapshot.send_replace(state);
    }

    fn drop_sink(&self) {
        if let Some(sink) = self.sink.lock().unwrap().take() {
            sink.stop();
        }
        *self.duration.lock().unwrap() = None;
    }
}

/// Single-output audio player for the one active track.
pub struct AudioPlayer {
    shared: Arc<PlayerShared>,
    handle: OutputStreamHandle,
    ticker: JoinHandle<()>,
    snapshot_rx: watch::Receiver<PlaybackState>,
}

impl AudioPlayer {
    /// Open the default audio output. Fails when the host has no usable
    /// device; the viewer then runs without playback.
    pub fn new() -> Result<Self, PlaybackError> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| PlaybackError::OutputUnavailable {
                message: e.to_string(),
            })?;
        // The stream must outlive every sink; the sink only holds a weak
        // reference to it internally.
        std::mem::forget(stream);

        let (snapshot, snapshot_rx) = watch::channel(PlaybackState::Idle);
        let shared = Arc::new(PlayerShared {
            controller: Mutex::new(PlaybackController::new()),
            sink: Mutex::new(None),
            duration: Mutex::new(None),
            snapshot,
        });
        let ticker = tokio::spawn(tick_loop(Arc::clone(&shared)));

        Ok(Self {
            shared,
            handle,
            ticker,
            snapshot_rx,
        })
    }

    /// Current playback state.
    pub fn state(&self) -> PlaybackState {
        self.shared.controller.lock().unwrap().state().clone()
    }

    /// Watch channel of state snapshots, updated on every transition and
    /// progress tick.
    pub fn subscribe(&self) -> watch::Receiver<PlaybackState> {
        self.snapshot_rx.clone()
    }

    /// Play/pause intent for a track. On a load failure the controller
    /// returns to idle and the error propagates to the caller.
    pub async fn toggle(&self, track: &str, api: &ApiClient) -> Result<(), PlaybackError> {
        let commands = self.shared.controller.lock().unwrap().toggle(track);
        for command in commands {
            if let Err(e) = self.execute(command, api).await {
                self.shared.controller.lock().unwrap().on_ended();
                self.shared.drop_sink();
                self.shared.publish();
                return Err(e);
            }
        }
        self.shared.publish();
        Ok(())
    }

    /// Stop intent. No-op when nothing is loaded.
    pub fn stop(&self) {
        if self.shared.controller.lock().unwrap().stop().is_some() {
            self.shared.drop_sink();
            self.shared.publish();
        }
    }

    /// Seek intent, as a fraction of total duration.
    pub fn seek(&self, fraction: f64) {
        let command = self.shared.controller.lock().unwrap().seek(fraction);
        match command {
            Some(TransportCommand::Stop) => self.shared.drop_sink(),
            Some(TransportCommand::SeekTo(fraction)) => {
                let duration = *self.shared.duration.lock().unwrap();
                if let (Some(sink), Some(duration)) =
                    (self.shared.sink.lock().unwrap().as_ref(), duration)
                {
                    if let Err(e) = sink.try_seek(duration.mul_f64(fraction)) {
                        tracing::warn!("Seek failed: {e}");
                    }
                }
            }
            _ => return,
        }
        self.shared.publish();
    }

    /// Stop playback and the tick task.
    pub fn shutdown(&self) {
        self.ticker.abort();
        self.shared.drop_sink();
    }

    async fn execute(&self, command: TransportCommand, api: &ApiClient) -> Result<(), PlaybackError> {
        match command {
            TransportCommand::Start(track) => self.start_track(&track, api).await,
            TransportCommand::Pause => {
                if let Some(sink) = self.shared.sink.lock().unwrap().as_ref() {
                    sink.pause();
                }
                Ok(())
            }
            TransportCommand::Resume => {
                if let Some(sink) = self.shared.sink.lock().unwrap().as_ref() {
                    sink.play();
                }
                Ok(())
            }
            TransportCommand::Stop => {
                self.shared.drop_sink();
                Ok(())
            }
            TransportCommand::SeekTo(_) => Ok(()),
        }
    }

    async fn start_track(&self, track: &str, api: &ApiClient) -> Result<(), PlaybackError> {
        let bytes = api.fetch_media(track).await?;
        let source =
            Decoder::new(Cursor::new(bytes)).map_err(|e| PlaybackError::DecodeFailed {
                message: e.to_string(),
            })?;
        let duration = source.total_duration();

        let sink = Sink::try_new(&self.handle).map_err(|e| PlaybackError::OutputUnavailable {
            message: e.to_string(),
        })?;
        sink.append(source);
        sink.play();

        *self.shared.duration.lock().unwrap() = duration;
        *self.shared.sink.lock().unwrap() = Some(sink);
        Ok(())
    }
}

async fn tick_loop(shared: Arc<PlayerShared>) {
    let mut ticker = tokio::time::interval(TICK_PERIOD);
    loop {
        ticker.tick().await;

        let mut ended = false;
        let mut progressed = false;
        {
            let sink = shared.sink.lock().unwrap();
            match sink.as_ref() {
                Some(sink) if sink.empty() => ended = true,
                Some(sink) if !sink.is_paused() => {
                    let elapsed = sink.get_pos().as_secs_f64();
                    let duration = shared
                        .duration
                        .lock()
                        .unwrap()
                        .map(|d| d.as_secs_f64())
                        .unwrap_or(0.0);
                    shared.controller.lock().unwrap().on_progress(elapsed, duration);
                    progressed = true;
                }
                _ => {}
            }
        }

        if ended {
            shared.controller.lock().unwrap().on_ended();
            shared.drop_sink();
        }
        if ended || progressed {
            shared.publish();
        }
    }
}
