#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use media_kiosk::error::{AudioError, CodecError};
use media_kiosk::platform::audio::AudioEngine;
use media_kiosk::platform::codec::Codec;
use media_kiosk::platform::display::Screen;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drawn {
    Image(String),
    Text(String),
}

/// Forwards everything drawn to a channel.
pub struct RecordingScreen(pub mpsc::UnboundedSender<Drawn>);

impl RecordingScreen {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Drawn>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self(tx), rx)
    }
}

impl Screen for RecordingScreen {
    fn show_image(&mut self, path: &str) {
        let _ = self.0.send(Drawn::Image(path.to_string()));
    }

    fn show_text(&mut self, message: &str) {
        let _ = self.0.send(Drawn::Text(message.to_string()));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineBehavior {
    Play,
    MissingAsset,
    CodecFault,
}

/// Records every play request; its answer is controlled by `behavior`.
pub struct RecordingEngine {
    pub requests: mpsc::UnboundedSender<PathBuf>,
    pub behavior: Arc<Mutex<EngineBehavior>>,
}

impl RecordingEngine {
    pub fn new(
        behavior: EngineBehavior,
    ) -> (Self, mpsc::UnboundedReceiver<PathBuf>, Arc<Mutex<EngineBehavior>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let behavior = Arc::new(Mutex::new(behavior));
        (
            Self {
                requests: tx,
                behavior: Arc::clone(&behavior),
            },
            rx,
            behavior,
        )
    }
}

impl AudioEngine for RecordingEngine {
    async fn open_and_play(&mut self, asset: &Path) -> Result<(), AudioError> {
        let _ = self.requests.send(asset.to_path_buf());
        match *self.behavior.lock().unwrap() {
            EngineBehavior::Play => Ok(()),
            EngineBehavior::MissingAsset => Err(AudioError::AssetUnavailable {
                path: asset.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
            EngineBehavior::CodecFault => Err(AudioError::Codec(codec_fault())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecCall {
    Mute(bool),
    Volume(u8),
}

/// Appends each codec command to a shared log.
#[derive(Clone, Default)]
pub struct RecordingCodec {
    pub calls: Arc<Mutex<Vec<CodecCall>>>,
    pub fail: bool,
}

impl RecordingCodec {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<CodecCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Codec for RecordingCodec {
    fn set_mute(&mut self, muted: bool) -> Result<(), CodecError> {
        if self.fail {
            return Err(codec_fault());
        }
        self.calls.lock().unwrap().push(CodecCall::Mute(muted));
        Ok(())
    }

    fn set_volume(&mut self, level: u8) -> Result<(), CodecError> {
        if self.fail {
            return Err(codec_fault());
        }
        self.calls.lock().unwrap().push(CodecCall::Volume(level));
        Ok(())
    }
}

/// A codec whose every command takes `delay` to complete.
pub struct SlowCodec {
    pub delay: Duration,
}

impl Codec for SlowCodec {
    fn set_mute(&mut self, _muted: bool) -> Result<(), CodecError> {
        thread::sleep(self.delay);
        Ok(())
    }

    fn set_volume(&mut self, _level: u8) -> Result<(), CodecError> {
        thread::sleep(self.delay);
        Ok(())
    }
}

pub fn codec_fault() -> CodecError {
    CodecError::Command {
        command: "amixer -q sset Master mute".to_string(),
        code: 1,
        stderr: "Unable to find simple control".to_string(),
    }
}
