use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tokio::select;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{AudioError, CodecError};
use crate::events::PlayerEvent;
use crate::platform::audio::AudioEngine;
use crate::platform::codec::Codec;

/// Serialised access to the codec's mute switch and gain.
///
/// Shared by the audio engine and the mute button; each `set_mute` holds the
/// codec for the whole mute + volume sequence. Codec commands run on the
/// blocking pool so a slow card never occupies a runtime worker.
#[derive(Clone)]
pub struct MuteBridge {
    codec: Arc<Mutex<dyn Codec>>,
    volume_level: u8,
}

impl MuteBridge {
    pub fn new<C: Codec + 'static>(codec: C, volume_level: u8) -> Self {
        Self {
            codec: Arc::new(Mutex::new(codec)),
            volume_level,
        }
    }

    pub fn volume_level(&self) -> u8 {
        self.volume_level
    }

    /// Unmuting also re-applies the configured volume.
    pub async fn set_mute(&self, muted: bool) -> Result<(), CodecError> {
        let codec = Arc::clone(&self.codec);
        let volume_level = self.volume_level;
        task::spawn_blocking(move || -> Result<(), CodecError> {
            let mut codec = codec.lock().map_err(|_| CodecError::Poisoned)?;
            codec.set_mute(muted)?;
            if !muted {
                codec.set_volume(volume_level)?;
            }
            Ok(())
        })
        .await??;
        debug!(muted, volume = self.volume_level, "codec mute updated");
        Ok(())
    }
}

/// Keeps one asset looping: every time the engine reports idle, the same
/// asset is requested again.
pub struct AudioLoop<E> {
    engine: E,
    asset: PathBuf,
    events: UnboundedReceiver<PlayerEvent>,
}

impl<E: AudioEngine> AudioLoop<E> {
    pub fn new(
        engine: E,
        asset: impl Into<PathBuf>,
        events: UnboundedReceiver<PlayerEvent>,
    ) -> Self {
        Self {
            engine,
            asset: asset.into(),
            events,
        }
    }

    pub fn asset(&self) -> &Path {
        &self.asset
    }

    /// Requests playback of the asset.
    ///
    /// A missing asset or a player that cannot be started is logged and
    /// skipped; the next idle notification tries again. Codec failures are
    /// returned.
    pub async fn start(&mut self) -> Result<(), CodecError> {
        match self.engine.open_and_play(&self.asset).await {
            Ok(()) => {
                debug!(asset = %self.asset.display(), "audio playback requested");
                Ok(())
            }
            Err(AudioError::Codec(err)) => Err(err),
            Err(err) => {
                error!(asset = %self.asset.display(), "audio playback not started: {err}");
                Ok(())
            }
        }
    }

    pub async fn on_player_event(&mut self, event: PlayerEvent) -> Result<(), CodecError> {
        info!(?event, "audio event");
        match event {
            PlayerEvent::Idle => self.start().await,
            PlayerEvent::Playing => Ok(()),
        }
    }

    /// Consumes engine notifications until cancelled. The first `start()` is
    /// issued by the caller before spawning this.
    #[instrument(skip_all, fields(asset = %self.asset.display()))]
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        loop {
            select! {
                _ = cancel.cancelled() => break,
                maybe_event = self.events.recv() => match maybe_event {
                    Some(event) => self
                        .on_player_event(event)
                        .await
                        .context("codec failure while restarting audio")?,
                    None => {
                        warn!("audio engine notification channel closed");
                        break;
                    }
                },
            }
        }
        Ok(())
    }
}
