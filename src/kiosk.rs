use std::path::Path;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::platform::audio::AudioEngine;
use crate::platform::display::Screen;
use crate::platform::storage::Storage;
use crate::selector::FileSelector;
use crate::tasks::audio::AudioLoop;
use crate::tasks::button::MuteButton;
use crate::tasks::slideshow::Slideshow;

/// Enumerates the library once. An unreadable library yields an empty
/// snapshot, which the slideshow reports as "no image".
pub fn snapshot(storage: &impl Storage, path: &Path) -> FileSelector {
    match storage.list_directory(path) {
        Ok(names) => {
            info!(path = %path.display(), entries = names.len(), "library snapshot taken");
            FileSelector::new(names)
        }
        Err(err) => {
            error!(path = %path.display(), "failed to enumerate library: {err:#}");
            FileSelector::default()
        }
    }
}

/// Everything the kiosk runs, assembled from its collaborators.
pub struct Kiosk<S, E> {
    pub slideshow: Slideshow<S>,
    pub audio: Option<AudioLoop<E>>,
    pub mute_button: Option<MuteButton>,
}

impl<S, E> Kiosk<S, E>
where
    S: Screen + Send + 'static,
    E: AudioEngine + 'static,
{
    /// Spawns the slideshow, requests the first playback, then hands the
    /// audio loop and the mute button their own tasks.
    ///
    /// Call once storage and display are ready. Only a codec failure during
    /// the first playback request is returned.
    pub async fn launch(
        self,
        tasks: &mut JoinSet<Result<()>>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let Kiosk {
            slideshow,
            audio,
            mute_button,
        } = self;

        tasks.spawn({
            let cancel = cancel.clone();
            async move { slideshow.run(cancel).await.context("slideshow task failed") }
        });

        if let Some(mut audio) = audio {
            audio
                .start()
                .await
                .context("codec failure while starting audio")?;
            tasks.spawn({
                let cancel = cancel.clone();
                async move { audio.run(cancel).await.context("audio task failed") }
            });
        } else {
            info!("audio loop disabled");
        }

        if let Some(button) = mute_button {
            tasks.spawn({
                let cancel = cancel.clone();
                async move { button.run(cancel).await.context("mute button task failed") }
            });
        }

        Ok(())
    }
}
