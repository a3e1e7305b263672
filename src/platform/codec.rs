use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::CodecOptions;
use crate::error::CodecError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Mute switch and output gain of the audio codec. The two are independent
/// registers; changing one leaves the other untouched.
///
/// Calls may block; async callers go through
/// [`MuteBridge`](crate::tasks::audio::MuteBridge), which runs them on the
/// blocking pool.
pub trait Codec: Send {
    fn set_mute(&mut self, muted: bool) -> Result<(), CodecError>;
    fn set_volume(&mut self, level: u8) -> Result<(), CodecError>;
}

/// Drives an ALSA simple mixer control through `amixer`.
#[derive(Debug, Clone)]
pub struct MixerCodec {
    control: String,
    card: Option<String>,
    timeout: Duration,
}

impl MixerCodec {
    pub fn new(options: &CodecOptions) -> Self {
        Self {
            control: options.mixer_control.clone(),
            card: options.card.clone(),
            timeout: options.command_timeout,
        }
    }

    fn args(&self, value: &str) -> Vec<String> {
        let mut args = vec!["-q".to_string()];
        if let Some(card) = &self.card {
            args.push("-c".to_string());
            args.push(card.clone());
        }
        args.push("sset".to_string());
        args.push(self.control.clone());
        args.push(value.to_string());
        args
    }

    fn run(&self, value: &str) -> Result<(), CodecError> {
        run_with_timeout("amixer", &self.args(value), self.timeout)
    }
}

impl Codec for MixerCodec {
    fn set_mute(&mut self, muted: bool) -> Result<(), CodecError> {
        self.run(if muted { "mute" } else { "unmute" })
    }

    fn set_volume(&mut self, level: u8) -> Result<(), CodecError> {
        self.run(&format!("{}%", level.min(100)))
    }
}

/// Runs `program` to completion, killing it once `timeout` has passed.
fn run_with_timeout(program: &str, args: &[String], timeout: Duration) -> Result<(), CodecError> {
    let command = format!("{program} {}", args.join(" "));
    debug!(%command, "codec command");
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| CodecError::Spawn {
            command: command.clone(),
            source,
        })?;

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                if let Err(err) = child.kill() {
                    warn!(%command, "failed to kill mixer command: {err}");
                }
                let _ = child.wait();
                return Err(CodecError::Timeout { command, timeout });
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(source) => return Err(CodecError::Spawn { command, source }),
        }
    };

    if status.success() {
        return Ok(());
    }
    let mut stderr = String::new();
    if let Some(mut pipe) = child.stderr.take() {
        let _ = pipe.read_to_string(&mut stderr);
    }
    Err(CodecError::Command {
        command,
        code: status.code().unwrap_or(-1),
        stderr: stderr.trim().to_string(),
    })
}
