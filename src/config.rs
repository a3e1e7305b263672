use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Result, ensure};
use serde::Deserialize;

use crate::filter::{EntryFilter, HIDDEN_PREFIX, IMAGE_SUFFIX};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Configuration {
    /// Directory enumerated once at startup for images.
    pub library_path: PathBuf,
    /// Prefix the display collaborator expects in front of a base name.
    /// Defaults to `library-path` followed by a separator.
    #[serde(default)]
    pub display_path_prefix: Option<String>,
    #[serde(default = "Configuration::default_image_suffix")]
    pub image_suffix: String,
    #[serde(default = "Configuration::default_hidden_prefix")]
    pub hidden_prefix: String,
    #[serde(default)]
    pub slideshow: SlideshowOptions,
    #[serde(default)]
    pub audio: AudioOptions,
    #[serde(default)]
    pub codec: CodecOptions,
    /// Hardware mute button; absent means no button is wired.
    #[serde(default)]
    pub mute_button: Option<MuteButtonOptions>,
}

impl Configuration {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&s)?)
    }

    fn default_image_suffix() -> String {
        IMAGE_SUFFIX.to_string()
    }

    fn default_hidden_prefix() -> String {
        HIDDEN_PREFIX.to_string()
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(!self.image_suffix.is_empty(), "image-suffix must not be empty");
        // an empty prefix would mark every name hidden
        ensure!(
            !self.hidden_prefix.is_empty(),
            "hidden-prefix must not be empty"
        );
        self.slideshow.validate()?;
        self.audio.validate()?;
        self.codec.validate()?;
        if let Some(button) = &self.mute_button {
            ensure!(
                !button.key_code.trim().is_empty(),
                "mute-button.key-code must not be blank"
            );
        }
        Ok(self)
    }

    pub fn entry_filter(&self) -> EntryFilter {
        EntryFilter::new(self.image_suffix.clone(), self.hidden_prefix.clone())
    }

    pub fn display_prefix(&self) -> String {
        match &self.display_path_prefix {
            Some(prefix) => prefix.clone(),
            None => {
                let mut prefix = self.library_path.to_string_lossy().into_owned();
                if !prefix.ends_with('/') {
                    prefix.push('/');
                }
                prefix
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SlideshowOptions {
    /// How long each image stays on screen.
    #[serde(with = "humantime_serde", default = "SlideshowOptions::default_dwell")]
    pub dwell: Duration,
    /// Back-off after a lap without any displayable entry.
    #[serde(
        with = "humantime_serde",
        default = "SlideshowOptions::default_empty_retry"
    )]
    pub empty_retry: Duration,
    #[serde(default = "SlideshowOptions::default_empty_message")]
    pub empty_message: String,
}

impl SlideshowOptions {
    fn default_dwell() -> Duration {
        Duration::from_secs(5)
    }

    fn default_empty_retry() -> Duration {
        Duration::from_secs(10)
    }

    fn default_empty_message() -> String {
        "No image found".to_string()
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.dwell.is_zero(), "slideshow.dwell must be greater than zero");
        ensure!(
            !self.empty_retry.is_zero(),
            "slideshow.empty-retry must be greater than zero"
        );
        Ok(())
    }
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self {
            dwell: Self::default_dwell(),
            empty_retry: Self::default_empty_retry(),
            empty_message: Self::default_empty_message(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AudioOptions {
    /// The single asset looped for as long as the kiosk runs.
    #[serde(default = "AudioOptions::default_asset")]
    pub asset: PathBuf,
    /// Volume re-applied to the codec whenever it is unmuted (0-100).
    #[serde(default = "AudioOptions::default_volume_level")]
    pub volume_level: u8,
    /// Player program and arguments. The opened asset is piped to its stdin.
    #[serde(default = "AudioOptions::default_player_command")]
    pub player_command: Vec<String>,
}

impl AudioOptions {
    fn default_asset() -> PathBuf {
        PathBuf::from("/spiffs/Canon.mp3")
    }

    fn default_volume_level() -> u8 {
        60
    }

    fn default_player_command() -> Vec<String> {
        vec!["mpg123".to_string(), "-q".to_string(), "-".to_string()]
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.volume_level <= 100,
            "audio.volume-level must be between 0 and 100"
        );
        ensure!(
            self.player_command
                .first()
                .is_some_and(|program| !program.trim().is_empty()),
            "audio.player-command must name a program"
        );
        Ok(())
    }
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            asset: Self::default_asset(),
            volume_level: Self::default_volume_level(),
            player_command: Self::default_player_command(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CodecOptions {
    /// ALSA simple mixer control carrying both the mute switch and the gain.
    #[serde(default = "CodecOptions::default_mixer_control")]
    pub mixer_control: String,
    #[serde(default)]
    pub card: Option<String>,
    /// Upper bound on a single mixer command. A command still running at the
    /// deadline is killed and reported as a codec failure.
    #[serde(
        with = "humantime_serde",
        default = "CodecOptions::default_command_timeout"
    )]
    pub command_timeout: Duration,
}

impl CodecOptions {
    fn default_mixer_control() -> String {
        "Master".to_string()
    }

    fn default_command_timeout() -> Duration {
        Duration::from_secs(2)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            !self.mixer_control.trim().is_empty(),
            "codec.mixer-control must not be blank"
        );
        ensure!(
            !self.command_timeout.is_zero(),
            "codec.command-timeout must be greater than zero"
        );
        Ok(())
    }
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            mixer_control: Self::default_mixer_control(),
            card: None,
            command_timeout: Self::default_command_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MuteButtonOptions {
    /// evdev node; auto-detected from `/dev/input` when omitted.
    #[serde(default)]
    pub device: Option<PathBuf>,
    #[serde(default = "MuteButtonOptions::default_key_code")]
    pub key_code: String,
}

impl MuteButtonOptions {
    fn default_key_code() -> String {
        "KEY_MUTE".to_string()
    }
}
