//! Binary entrypoint for the media kiosk.
//!
//! Wires host collaborators into the library crate and supervises its tasks.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

use media_kiosk::config::Configuration;
use media_kiosk::events::ButtonEvent;
use media_kiosk::kiosk::{self, Kiosk};
use media_kiosk::platform::audio::{CommandAudioEngine, PlayerEventSink};
use media_kiosk::platform::codec::MixerCodec;
use media_kiosk::platform::display::LogScreen;
use media_kiosk::platform::input;
use media_kiosk::platform::storage::FsStorage;
use media_kiosk::tasks::audio::{AudioLoop, MuteBridge};
use media_kiosk::tasks::button::MuteButton;
use media_kiosk::tasks::slideshow::{self, SlidePicker, SlideState, Slideshow};

#[derive(Debug, Parser)]
#[command(
    name = "media-kiosk",
    version,
    about = "Looping image slideshow with background audio"
)]
struct Args {
    /// Path to YAML config
    #[arg(value_name = "CONFIG")]
    config: PathBuf,
    /// Print the next N slideshow cycles without starting the kiosk
    #[arg(long = "plan", value_name = "ITERATIONS")]
    plan: Option<usize>,
    /// Override the per-image dwell time (e.g. "2s", "500ms")
    #[arg(long = "dwell", value_name = "DURATION", value_parser = humantime::parse_duration)]
    dwell: Option<Duration>,
    /// Run the slideshow without the background audio loop
    #[arg(long = "no-audio")]
    no_audio: bool,
    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if verbosity > 0 {
        let level = if verbosity == 1 {
            Level::DEBUG
        } else {
            Level::TRACE
        };
        filter = filter.add_directive(
            format!("media_kiosk={level}")
                .parse()
                .context("invalid log directive")?,
        );
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let Args {
        config,
        plan,
        dwell,
        no_audio,
        verbose,
    } = Args::parse();
    init_tracing(verbose)?;

    let mut cfg = Configuration::from_yaml_file(&config)
        .with_context(|| format!("failed to load configuration from {}", config.display()))?
        .validated()
        .context("invalid configuration values")?;
    if let Some(dwell) = dwell {
        cfg.slideshow.dwell = dwell;
    }
    info!("Loaded configuration from {}:\n{:#?}", config.display(), cfg);

    let selector = kiosk::snapshot(&FsStorage, &cfg.library_path);
    let mut picker = SlidePicker::new(selector, cfg.entry_filter(), cfg.display_prefix());
    info!(
        entries = picker.selector().len(),
        qualifying = picker.qualifying_count(),
        "library scanned"
    );

    if let Some(iterations) = plan {
        print_plan(&cfg, &mut picker, iterations);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let mute = MuteBridge::new(MixerCodec::new(&cfg.codec), cfg.audio.volume_level);

    let audio = if no_audio {
        None
    } else {
        let (sink, events) = PlayerEventSink::channel();
        let engine =
            CommandAudioEngine::new(cfg.audio.player_command.clone(), sink, Some(mute.clone()));
        Some(AudioLoop::new(engine, cfg.audio.asset.clone(), events))
    };

    let mute_button = match &cfg.mute_button {
        Some(options) => {
            let (tx, rx) = mpsc::channel::<ButtonEvent>(16); // Input thread -> MuteButton
            input::spawn_reader(options, tx).context("failed to start mute button input")?;
            Some(MuteButton::new(rx, mute.clone()))
        }
        None => None,
    };

    let kiosk = Kiosk {
        slideshow: Slideshow::new(picker, cfg.slideshow.clone(), LogScreen::default()),
        audio,
        mute_button,
    };

    let mut tasks = JoinSet::new();
    kiosk.launch(&mut tasks, &cancel).await?;

    let mut failure = None;
    while let Some(res) = tasks.join_next().await {
        match res {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                error!("task error: {e:?}");
                cancel.cancel();
                failure.get_or_insert(e);
            }
            Err(e) => {
                error!("join error: {e}");
                cancel.cancel();
            }
        }
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

fn print_plan(cfg: &Configuration, picker: &mut SlidePicker, iterations: usize) {
    println!(
        "# slideshow plan\n# library: {}\n# entries: {}\n# qualifying: {}\n# iterations: {}\n",
        cfg.library_path.display(),
        picker.selector().len(),
        picker.qualifying_count(),
        iterations
    );
    for (idx, state) in slideshow::plan(picker, iterations).iter().enumerate() {
        match state {
            SlideState::Showing(path) => println!("  {:>4}: {}", idx + 1, path),
            SlideState::Empty => println!("  {:>4}: ({})", idx + 1, cfg.slideshow.empty_message),
        }
    }
}
