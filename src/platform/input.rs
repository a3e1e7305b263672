use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use evdev::{Device, EventSummary, KeyCode};
use tokio::sync::mpsc::Sender;
use tracing::{debug, info, warn};

use crate::config::MuteButtonOptions;
use crate::error::InputError;
use crate::events::ButtonEvent;

const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_RETRY_DELAY: Duration = Duration::from_secs(30);

pub fn parse_key(code: &str) -> Result<KeyCode, InputError> {
    KeyCode::from_str(code.trim()).map_err(|_| InputError::UnknownKey(code.to_string()))
}

/// Maps an evdev key value to a button transition. Auto-repeat (2) is dropped
/// so holding the key keeps the codec muted.
pub fn button_event(value: i32) -> Option<ButtonEvent> {
    match value {
        1 => Some(ButtonEvent::PressDown),
        0 => Some(ButtonEvent::PressUp),
        _ => None,
    }
}

/// Starts a reader thread forwarding `key` transitions to `tx`.
///
/// The device is reopened with exponential back-off while it is missing. The
/// thread ends once the receiving side is dropped.
pub fn spawn_reader(options: &MuteButtonOptions, tx: Sender<ButtonEvent>) -> Result<()> {
    let key = parse_key(&options.key_code)?;
    let device_path = options.device.clone();
    thread::Builder::new()
        .name("mute-button".to_string())
        .spawn(move || {
            let mut delay = INITIAL_RETRY_DELAY;
            loop {
                let (device, path) = match open_device(device_path.as_ref(), key) {
                    Ok(found) => found,
                    Err(err) => {
                        warn!(
                            "mute button unavailable: {err}; retrying in {}s",
                            delay.as_secs()
                        );
                        thread::sleep(delay);
                        delay = (delay * 2).min(MAX_RETRY_DELAY);
                        continue;
                    }
                };
                delay = INITIAL_RETRY_DELAY;
                info!(device = %path.display(), key = ?key, "listening for mute button");
                match forward_events(device, key, &tx) {
                    Ok(()) => return,
                    Err(err) => {
                        warn!(device = %path.display(), "mute button read failed: {err:#}");
                        thread::sleep(delay);
                    }
                }
            }
        })
        .context("failed to spawn mute button reader")?;
    Ok(())
}

fn open_device(path: Option<&PathBuf>, key: KeyCode) -> Result<(Device, PathBuf), InputError> {
    if let Some(path) = path {
        let device = Device::open(path).map_err(|source| InputError::Open {
            path: path.clone(),
            source,
        })?;
        return Ok((device, path.clone()));
    }

    for (path, device) in evdev::enumerate() {
        let supported = device
            .supported_keys()
            .is_some_and(|keys| keys.contains(key));
        if supported {
            return Ok((device, path));
        }
    }
    Err(InputError::NoDevice(format!("{key:?}")))
}

/// Blocks on the device; returns `Ok` when the receiver hung up.
fn forward_events(mut device: Device, key: KeyCode, tx: &Sender<ButtonEvent>) -> Result<()> {
    loop {
        let events = device
            .fetch_events()
            .context("failed reading input events")?;
        for event in events {
            let EventSummary::Key(_, code, value) = event.destructure() else {
                continue;
            };
            if code != key {
                continue;
            }
            let Some(button) = button_event(value) else {
                continue;
            };
            if tx.blocking_send(button).is_err() {
                debug!("mute button receiver closed");
                return Ok(());
            }
        }
    }
}
