use anyhow::{Context, Result};
use tokio::select;
use tokio::sync::mpsc::Receiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::error::CodecError;
use crate::events::ButtonEvent;
use crate::tasks::audio::MuteBridge;

/// Mute is held exactly while the button is down.
pub fn mute_requested(event: ButtonEvent) -> bool {
    matches!(event, ButtonEvent::PressDown)
}

/// Button callback: forwards the press state straight to the codec.
pub async fn handle_button_event(
    mute: &MuteBridge,
    event: ButtonEvent,
) -> Result<(), CodecError> {
    let muted = mute_requested(event);
    debug!(?event, muted, "mute button");
    mute.set_mute(muted).await
}

pub struct MuteButton {
    events: Receiver<ButtonEvent>,
    mute: MuteBridge,
}

impl MuteButton {
    pub fn new(events: Receiver<ButtonEvent>, mute: MuteBridge) -> Self {
        Self { events, mute }
    }

    #[instrument(skip_all)]
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        loop {
            select! {
                _ = cancel.cancelled() => break,
                maybe_event = self.events.recv() => match maybe_event {
                    Some(event) => handle_button_event(&self.mute, event)
                        .await
                        .context("codec failure while applying mute button")?,
                    None => {
                        info!("mute button input closed");
                        break;
                    }
                },
            }
        }
        Ok(())
    }
}
