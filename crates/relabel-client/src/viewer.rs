//! Viewer facade.
//!
//! Owns the shared state (row store, edit session, notices), the background
//! sync tasks, and the audio player, and exposes the user intents the
//! presentation layer issues: edit, save, cancel, play, pause, stop, seek.

use std::sync::{Arc, Mutex, RwLock};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use relabel_core::{
    effective_rows, CommitError, Editor, Notice, NoticeQueue, PlaybackError, PlaybackState, Row,
    RowId, RowStore,
};

use crate::api::ApiClient;
use crate::audio::AudioPlayer;
use crate::config::{ConfigError, ViewerConfig};
use crate::{push, refresh};

/// State shared between the viewer facade and its background tasks.
///
/// The row store is the only state with more than one mutating source
/// (poll, push, post-commit refresh — all via the scheduler task); the
/// editor and notices are mutated by user intents only.
pub struct ViewerState {
    rows: RwLock<RowStore>,
    editor: RwLock<Editor>,
    notices: Mutex<NoticeQueue>,
}

impl ViewerState {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(RowStore::new()),
            editor: RwLock::new(Editor::new()),
            notices: Mutex::new(NoticeQueue::new()),
        }
    }

    /// Replace the row snapshot. Called by the refresh scheduler; the edit
    /// session is intentionally untouched.
    pub fn replace_rows(&self, rows: Vec<Row>) {
        self.rows.write().unwrap().replace(rows);
    }

    /// The display listing: latest snapshot with the edit draft shadowing
    /// its row.
    pub fn effective_rows(&self) -> Vec<Row> {
        let store = self.rows.read().unwrap();
        let editor = self.editor.read().unwrap();
        effective_rows(&store, &editor)
    }

    pub fn row_count(&self) -> usize {
        self.rows.read().unwrap().len()
    }

    /// Start editing the row with `id`. Returns `false` when the row is not
    /// in the current snapshot.
    pub fn begin_edit(&self, id: RowId) -> bool {
        let store = self.rows.read().unwrap();
        match store.find(id) {
            Some(row) => {
                self.editor.write().unwrap().begin(row);
                true
            }
            None => false,
        }
    }

    pub fn update_field(&self, name: &str, value: impl Into<String>) -> bool {
        self.editor.write().unwrap().update_field(name, value)
    }

    pub fn cancel_edit(&self) {
        self.editor.write().unwrap().cancel();
    }

    pub fn clear_edit(&self) {
        self.editor.write().unwrap().clear();
    }

    pub fn editing_id(&self) -> Option<RowId> {
        self.editor.read().unwrap().session().map(|s| s.row_id())
    }

    /// Clone of the current edit draft, if a session is active.
    pub fn draft_row(&self) -> Option<Row> {
        self.editor.read().unwrap().draft().cloned()
    }

    pub fn draft_field(&self, name: &str) -> Option<String> {
        self.editor
            .read()
            .unwrap()
            .draft()
            .and_then(|draft| draft.field(name).map(str::to_string))
    }

    pub fn push_notice(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().drain()
    }
}

impl Default for ViewerState {
    fn default() -> Self {
        Self::new()
    }
}

/// The assembled viewer: sync tasks, shared state, and audio.
pub struct Viewer {
    config: ViewerConfig,
    api: Arc<ApiClient>,
    state: Arc<ViewerState>,
    trigger: mpsc::Sender<()>,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    player: Option<AudioPlayer>,
}

impl Viewer {
    /// Validate the configuration and start the background sync tasks.
    /// Must run inside a tokio runtime. The refresh scheduler performs the
    /// initial fetch immediately.
    pub fn start(config: ViewerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let ws_url = config.ws_url()?;

        let api = Arc::new(ApiClient::new(config.clone()));
        let state = Arc::new(ViewerState::new());
        let (trigger, trigger_rx) = mpsc::channel(16);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let tasks = vec![
            tokio::spawn(refresh::run(
                Arc::clone(&api),
                Arc::clone(&state),
                config.poll_interval(),
                trigger_rx,
                shutdown_rx.clone(),
            )),
            tokio::spawn(push::run(
                ws_url,
                Arc::clone(&state),
                trigger.clone(),
                shutdown_rx,
            )),
        ];

        let player = match AudioPlayer::new() {
            Ok(player) => Some(player),
            Err(e) => {
                tracing::warn!("Audio playback disabled: {e}");
                None
            }
        };

        Ok(Self {
            config,
            api,
            state,
            trigger,
            shutdown,
            tasks,
            player,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn state(&self) -> &Arc<ViewerState> {
        &self.state
    }

    /// The display listing (snapshot with edit-draft shadowing).
    pub fn rows(&self) -> Vec<Row> {
        self.state.effective_rows()
    }

    pub fn begin_edit(&self, id: RowId) -> bool {
        self.state.begin_edit(id)
    }

    pub fn update_field(&self, name: &str, value: impl Into<String>) -> bool {
        self.state.update_field(name, value)
    }

    pub fn cancel_edit(&self) {
        self.state.cancel_edit();
    }

    pub fn editing_id(&self) -> Option<RowId> {
        self.state.editing_id()
    }

    pub fn draft_field(&self, name: &str) -> Option<String> {
        self.state.draft_field(name)
    }

    /// Commit the active edit session: `PUT` the full draft row.
    ///
    /// Success clears the session, surfaces a success notice, and forces
    /// one immediate refresh so the server-confirmed state becomes visible.
    /// Failure preserves the session for retry and surfaces a blocking
    /// notice with the error detail. Without an active session this is a
    /// no-op.
    pub async fn commit_edit(&self) -> Result<(), CommitError> {
        let Some(draft) = self.state.draft_row() else {
            tracing::debug!("Commit requested with no active edit session");
            return Ok(());
        };

        match self.api.update_row(&draft).await {
            Ok(()) => {
                // The write is durable server-side; clear the session even
                // if the forced refresh below should fail.
                self.state.clear_edit();
                self.state
                    .push_notice(Notice::info(format!("Row {} updated", draft.id)));
                let _ = self.trigger.send(()).await;
                Ok(())
            }
            Err(e) => {
                self.state.push_notice(Notice::blocking_error(format!(
                    "Row {} update failed: {e}",
                    draft.id
                )));
                Err(e)
            }
        }
    }

    /// Ask the scheduler for an immediate refresh.
    pub fn request_refresh(&self) {
        let _ = self.trigger.try_send(());
    }

    pub fn drain_notices(&self) -> Vec<Notice> {
        self.state.drain_notices()
    }

    /// Current playback state; idle when audio is disabled.
    pub fn playback(&self) -> PlaybackState {
        self.player
            .as_ref()
            .map(AudioPlayer::state)
            .unwrap_or(PlaybackState::Idle)
    }

    /// Watch channel of playback snapshots, when audio is available.
    pub fn subscribe_playback(&self) -> Option<watch::Receiver<PlaybackState>> {
        self.player.as_ref().map(AudioPlayer::subscribe)
    }

    /// Play/pause intent for a row's audio asset. Failures surface as a
    /// non-blocking notice and leave playback idle.
    pub async fn toggle_playback(&self, audio_file_path: &str) -> Result<(), PlaybackError> {
        let Some(player) = &self.player else {
            let e = PlaybackError::OutputUnavailable {
                message: "no audio output device".to_string(),
            };
            self.state.push_notice(Notice::error(e.to_string()));
            return Err(e);
        };

        match player.toggle(audio_file_path, &self.api).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state
                    .push_notice(Notice::error(format!("Playback failed: {e}")));
                Err(e)
            }
        }
    }

    pub fn stop_playback(&self) {
        if let Some(player) = &self.player {
            player.stop();
        }
    }

    pub fn seek_playback(&self, fraction: f64) {
        if let Some(player) = &self.player {
            player.seek(fraction);
        }
    }

    /// Tear down the viewer: cancel the poll timer and push listener
    /// together and stop playback. Fetches still in flight are dropped,
    /// not applied.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(player) = self.player.take() {
            player.shutdown();
        }
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        tracing::debug!("Viewer torn down");
    }
}
