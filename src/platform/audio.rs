use std::fs::File;
use std::future::Future;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use crate::error::AudioError;
use crate::events::PlayerEvent;
use crate::tasks::audio::MuteBridge;

/// Delay before a player that exited with an error is reported idle, so a
/// broken asset does not respawn the player in a tight loop.
const FAILED_EXIT_BACKOFF: Duration = Duration::from_secs(1);

/// Playback side of the audio engine.
///
/// Implementations report state changes through a [`PlayerEventSink`] handed
/// to them at construction, never by calling back into the caller.
pub trait AudioEngine: Send {
    /// Opens `asset` and begins playing it, replacing any current playback.
    fn open_and_play(
        &mut self,
        asset: &Path,
    ) -> impl Future<Output = Result<(), AudioError>> + Send;
}

/// Notification callback registered with the audio engine.
///
/// `notify` only enqueues, so it is safe to call from any thread, including
/// from inside the engine while a play request is being serviced.
#[derive(Debug, Clone)]
pub struct PlayerEventSink {
    tx: mpsc::UnboundedSender<PlayerEvent>,
}

impl PlayerEventSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PlayerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn notify(&self, event: PlayerEvent) {
        if self.tx.send(event).is_err() {
            debug!(?event, "audio event dropped; controller gone");
        }
    }
}

/// Plays the asset by piping it into an external player process.
///
/// Reports `Playing` once the process is spawned and `Idle` when it exits.
/// Starting a new playback kills the previous process without reporting it
/// idle.
pub struct CommandAudioEngine {
    command: Vec<String>,
    events: PlayerEventSink,
    mute: Option<MuteBridge>,
    current: Option<oneshot::Sender<()>>,
}

impl CommandAudioEngine {
    pub fn new(command: Vec<String>, events: PlayerEventSink, mute: Option<MuteBridge>) -> Self {
        Self {
            command,
            events,
            mute,
            current: None,
        }
    }

    fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

impl AudioEngine for CommandAudioEngine {
    async fn open_and_play(&mut self, asset: &Path) -> Result<(), AudioError> {
        let file = File::open(asset).map_err(|source| AudioError::AssetUnavailable {
            path: asset.to_path_buf(),
            source,
        })?;

        let Some((program, args)) = self.command.split_first() else {
            return Err(AudioError::Spawn {
                command: String::new(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty player command"),
            });
        };

        if let Some(stop) = self.current.take() {
            let _ = stop.send(());
        }

        // the player starts from a muted codec; unmuting restores the gain too
        if let Some(mute) = &self.mute {
            mute.set_mute(false).await?;
        }

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::from(file))
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| AudioError::Spawn {
                command: self.command_line(),
                source,
            })?;
        info!(pid = child.id(), asset = %asset.display(), "audio player started");
        self.events.notify(PlayerEvent::Playing);

        let (stop_tx, stop_rx) = oneshot::channel();
        self.current = Some(stop_tx);
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                status = child.wait() => {
                    match status {
                        Ok(status) if status.success() => debug!("audio player finished"),
                        Ok(status) => {
                            warn!(code = status.code(), "audio player exited with failure");
                            tokio::time::sleep(FAILED_EXIT_BACKOFF).await;
                        }
                        Err(err) => {
                            warn!("failed waiting on audio player: {err}");
                            tokio::time::sleep(FAILED_EXIT_BACKOFF).await;
                        }
                    }
                    events.notify(PlayerEvent::Idle);
                }
                _ = stop_rx => {
                    if let Err(err) = child.kill().await {
                        warn!("failed to stop audio player: {err}");
                    }
                    debug!("audio player superseded");
                }
            }
        });
        Ok(())
    }
}
