//! Playback state machine
//!
//! State transitions:
//! ```text
//! Idle → Loaded(Playing) ↔ Loaded(Paused)
//!   ↑         ↓
//!   └── stop / end-of-track / seek past end
//! ```
//!
//! At most one track is loaded at a time; toggling a different track stops
//! whatever is active first. The machine is pure: each operation returns the
//! [`TransportCommand`]s the audio backend must execute, so every transition
//! is explicit and unit-testable without a real audio device.

use serde::{Deserialize, Serialize};

/// Transport status of a loaded track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Track is playing; progress updates stream to observers
    Playing,
    /// Track is paused; progress is frozen at its current value
    Paused,
}

/// Current playback state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track loaded
    Idle,
    /// A track is loaded, playing or paused, at `progress` of its duration
    Loaded {
        /// Audio asset path of the loaded track
        track: String,
        transport: Transport,
        /// Position as a fraction of total duration, in `[0, 1]`
        progress: f64,
    },
}

impl PlaybackState {
    pub fn is_idle(&self) -> bool {
        matches!(self, PlaybackState::Idle)
    }

    pub fn is_playing(&self) -> bool {
        matches!(
            self,
            PlaybackState::Loaded {
                transport: Transport::Playing,
                ..
            }
        )
    }

    pub fn is_paused(&self) -> bool {
        matches!(
            self,
            PlaybackState::Loaded {
                transport: Transport::Paused,
                ..
            }
        )
    }

    /// The loaded track, if any.
    pub fn track(&self) -> Option<&str> {
        match self {
            PlaybackState::Idle => None,
            PlaybackState::Loaded { track, .. } => Some(track),
        }
    }

    /// Progress fraction; 0 when idle.
    pub fn progress(&self) -> f64 {
        match self {
            PlaybackState::Idle => 0.0,
            PlaybackState::Loaded { progress, .. } => *progress,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::Idle
    }
}

impl std::fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackState::Idle => write!(f, "idle"),
            PlaybackState::Loaded {
                track,
                transport: Transport::Playing,
                ..
            } => write!(f, "playing {track}"),
            PlaybackState::Loaded {
                track,
                transport: Transport::Paused,
                ..
            } => write!(f, "paused {track}"),
        }
    }
}

/// Effect the audio backend must execute after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
    /// Load `track` from the start and begin playing
    Start(String),
    /// Pause the active track, keeping its position
    Pause,
    /// Resume the active track from its current position
    Resume,
    /// Halt and unload the active track
    Stop,
    /// Move the active track to this fraction of its duration
    SeekTo(f64),
}

/// Single-owner controller of the one active track.
#[derive(Debug, Clone, Default)]
pub struct PlaybackController {
    state: PlaybackState,
}

impl PlaybackController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Play/pause intent for `track`.
    ///
    /// No track or a different track loaded: stop whatever is active and
    /// start `track` from progress 0. Same track playing: pause. Same track
    /// paused: resume without resetting progress.
    pub fn toggle(&mut self, track: &str) -> Vec<TransportCommand> {
        match &mut self.state {
            PlaybackState::Loaded {
                track: current,
                transport,
                ..
            } if current.as_str() == track => match transport {
                Transport::Playing => {
                    *transport = Transport::Paused;
                    vec![TransportCommand::Pause]
                }
                Transport::Paused => {
                    *transport = Transport::Playing;
                    vec![TransportCommand::Resume]
                }
            },
            PlaybackState::Loaded { .. } => {
                self.state = PlaybackState::Loaded {
                    track: track.to_string(),
                    transport: Transport::Playing,
                    progress: 0.0,
                };
                vec![
                    TransportCommand::Stop,
                    TransportCommand::Start(track.to_string()),
                ]
            }
            PlaybackState::Idle => {
                self.state = PlaybackState::Loaded {
                    track: track.to_string(),
                    transport: Transport::Playing,
                    progress: 0.0,
                };
                vec![TransportCommand::Start(track.to_string())]
            }
        }
    }

    /// Stop intent: unload the active track. No-op when idle.
    pub fn stop(&mut self) -> Option<TransportCommand> {
        if self.state.is_idle() {
            return None;
        }
        self.state = PlaybackState::Idle;
        Some(TransportCommand::Stop)
    }

    /// Seek intent, valid only while a track is loaded.
    ///
    /// `fraction` is clamped to `[0, 1]`. Seeking to or past the end is
    /// identical to natural end-of-track; otherwise progress moves and the
    /// current transport status is kept.
    pub fn seek(&mut self, fraction: f64) -> Option<TransportCommand> {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0)
        } else {
            return None;
        };
        match &mut self.state {
            PlaybackState::Idle => None,
            PlaybackState::Loaded { .. } if fraction >= 1.0 => {
                self.state = PlaybackState::Idle;
                Some(TransportCommand::Stop)
            }
            PlaybackState::Loaded { progress, .. } => {
                *progress = fraction;
                Some(TransportCommand::SeekTo(fraction))
            }
        }
    }

    /// Progress tick from the transport. Only applied while playing; a zero
    /// or unknown duration reports progress 0 rather than dividing by zero.
    pub fn on_progress(&mut self, elapsed_secs: f64, duration_secs: f64) {
        if let PlaybackState::Loaded {
            transport: Transport::Playing,
            progress,
            ..
        } = &mut self.state
        {
            *progress = if duration_secs > 0.0 {
                (elapsed_secs / duration_secs).clamp(0.0, 1.0)
            } else {
                0.0
            };
        }
    }

    /// Natural end-of-track from the transport. The track is finished, not
    /// paused at the end.
    pub fn on_ended(&mut self) {
        self.state = PlaybackState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_from_idle_starts_playing() {
        let mut controller = PlaybackController::new();
        let commands = controller.toggle("clips/a.wav");

        assert_eq!(commands, vec![TransportCommand::Start("clips/a.wav".into())]);
        assert!(controller.state().is_playing());
        assert_eq!(controller.state().track(), Some("clips/a.wav"));
        assert_eq!(controller.state().progress(), 0.0);
    }

    #[test]
    fn test_toggle_same_track_pauses_then_resumes() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");
        controller.on_progress(3.0, 10.0);

        let commands = controller.toggle("clips/a.wav");
        assert_eq!(commands, vec![TransportCommand::Pause]);
        assert!(controller.state().is_paused());
        // Progress is frozen at the value reached.
        assert_eq!(controller.state().progress(), 0.3);

        let commands = controller.toggle("clips/a.wav");
        assert_eq!(commands, vec![TransportCommand::Resume]);
        assert!(controller.state().is_playing());
        // Resume does not reset to 0.
        assert_eq!(controller.state().progress(), 0.3);
    }

    #[test]
    fn test_toggle_other_track_supersedes_active_one() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");
        controller.on_progress(5.0, 10.0);

        let commands = controller.toggle("clips/b.wav");
        assert_eq!(
            commands,
            vec![
                TransportCommand::Stop,
                TransportCommand::Start("clips/b.wav".into()),
            ]
        );
        assert!(controller.state().is_playing());
        assert_eq!(controller.state().track(), Some("clips/b.wav"));
        assert_eq!(controller.state().progress(), 0.0);
    }

    #[test]
    fn test_toggle_other_track_while_paused() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");
        controller.toggle("clips/a.wav"); // pause

        let commands = controller.toggle("clips/b.wav");
        assert_eq!(commands.len(), 2);
        assert!(controller.state().is_playing());
        assert_eq!(controller.state().track(), Some("clips/b.wav"));
    }

    #[test]
    fn test_stop_unloads_track() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");
        controller.on_progress(5.0, 10.0);

        assert_eq!(controller.stop(), Some(TransportCommand::Stop));
        assert!(controller.state().is_idle());
        assert_eq!(controller.state().progress(), 0.0);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut controller = PlaybackController::new();
        assert_eq!(controller.stop(), None);
        assert!(controller.state().is_idle());
    }

    #[test]
    fn test_seek_clamps_low_and_keeps_transport() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");
        controller.toggle("clips/a.wav"); // pause
        controller.seek(0.5);

        let command = controller.seek(-0.3);
        assert_eq!(command, Some(TransportCommand::SeekTo(0.0)));
        assert!(controller.state().is_paused());
        assert_eq!(controller.state().progress(), 0.0);
    }

    #[test]
    fn test_seek_past_end_behaves_like_end_of_track() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");

        let command = controller.seek(1.1);
        assert_eq!(command, Some(TransportCommand::Stop));
        assert!(controller.state().is_idle());
        assert_eq!(controller.state().progress(), 0.0);
    }

    #[test]
    fn test_seek_midway_while_playing() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");

        let command = controller.seek(0.25);
        assert_eq!(command, Some(TransportCommand::SeekTo(0.25)));
        assert!(controller.state().is_playing());
        assert_eq!(controller.state().progress(), 0.25);
    }

    #[test]
    fn test_seek_when_idle_is_invalid() {
        let mut controller = PlaybackController::new();
        assert_eq!(controller.seek(0.5), None);
    }

    #[test]
    fn test_natural_end_resets_to_idle_not_paused() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");
        controller.on_progress(10.0, 10.0);

        controller.on_ended();
        assert!(controller.state().is_idle());
        assert!(!controller.state().is_paused());
        assert_eq!(controller.state().progress(), 0.0);
    }

    #[test]
    fn test_progress_ignored_while_paused() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");
        controller.on_progress(2.0, 10.0);
        controller.toggle("clips/a.wav"); // pause

        controller.on_progress(8.0, 10.0);
        assert_eq!(controller.state().progress(), 0.2);
    }

    #[test]
    fn test_zero_or_unknown_duration_reports_zero_progress() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");

        controller.on_progress(3.0, 0.0);
        assert_eq!(controller.state().progress(), 0.0);

        // Duration becomes known; progress follows.
        controller.on_progress(3.0, 12.0);
        assert_eq!(controller.state().progress(), 0.25);
    }

    #[test]
    fn test_progress_clamped_to_unit_interval() {
        let mut controller = PlaybackController::new();
        controller.toggle("clips/a.wav");
        controller.on_progress(15.0, 10.0);
        assert_eq!(controller.state().progress(), 1.0);
    }

    #[test]
    fn test_state_display() {
        let mut controller = PlaybackController::new();
        assert_eq!(controller.state().to_string(), "idle");

        controller.toggle("clips/a.wav");
        assert_eq!(controller.state().to_string(), "playing clips/a.wav");

        controller.toggle("clips/a.wav");
        assert_eq!(controller.state().to_string(), "paused clips/a.wav");
    }
}
