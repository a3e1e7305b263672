use std::time::Duration;

use anyhow::Result;
use tokio::select;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::config::SlideshowOptions;
use crate::filter::EntryFilter;
use crate::platform::display::Screen;
use crate::selector::FileSelector;

/// Outcome of one slideshow cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlideState {
    /// A qualifying entry was found; holds the path handed to the screen.
    Showing(String),
    /// A full lap of the snapshot found nothing to show.
    Empty,
}

/// Picks the next displayable entry and turns it into a screen path.
#[derive(Debug, Clone)]
pub struct SlidePicker {
    selector: FileSelector,
    filter: EntryFilter,
    prefix: String,
}

impl SlidePicker {
    pub fn new(selector: FileSelector, filter: EntryFilter, prefix: impl Into<String>) -> Self {
        Self {
            selector,
            filter,
            prefix: prefix.into(),
        }
    }

    pub fn selector(&self) -> &FileSelector {
        &self.selector
    }

    pub fn qualifying_count(&self) -> usize {
        self.selector
            .entries()
            .iter()
            .filter(|name| self.filter.qualifies(name))
            .count()
    }

    pub fn next_slide(&mut self) -> SlideState {
        match self.selector.next_qualifying(&self.filter) {
            Some(name) => SlideState::Showing(self.display_path(&name)),
            None => SlideState::Empty,
        }
    }

    /// Prefix + base name with the matched suffix replaced by the configured one.
    pub fn display_path(&self, name: &str) -> String {
        let suffix = self.filter.suffix();
        let stem = name
            .len()
            .checked_sub(suffix.len())
            .and_then(|cut| name.get(..cut))
            .unwrap_or(name);
        let mut path = String::with_capacity(self.prefix.len() + stem.len() + suffix.len());
        path.push_str(&self.prefix);
        path.push_str(stem);
        path.push_str(suffix);
        path
    }
}

/// The next `iterations` cycles the slideshow would run, without drawing.
pub fn plan(picker: &mut SlidePicker, iterations: usize) -> Vec<SlideState> {
    (0..iterations).map(|_| picker.next_slide()).collect()
}

/// Endless show loop: draw the next image and dwell, or show the fallback
/// text and back off when nothing qualifies.
pub struct Slideshow<S> {
    picker: SlidePicker,
    options: SlideshowOptions,
    screen: S,
}

impl<S: Screen> Slideshow<S> {
    pub fn new(picker: SlidePicker, options: SlideshowOptions, screen: S) -> Self {
        Self {
            picker,
            options,
            screen,
        }
    }

    /// Runs one cycle and returns how long to wait before the next.
    pub fn step(&mut self) -> (SlideState, Duration) {
        let state = self.picker.next_slide();
        let wait = match &state {
            SlideState::Showing(path) => {
                debug!(%path, "slideshow showing");
                self.screen.show_image(path);
                self.options.dwell
            }
            SlideState::Empty => {
                warn!(
                    entries = self.picker.selector().len(),
                    retry = %humantime::format_duration(self.options.empty_retry),
                    "no displayable image"
                );
                self.screen.show_text(&self.options.empty_message);
                self.options.empty_retry
            }
        };
        (state, wait)
    }

    #[instrument(skip_all, fields(entries = self.picker.selector().len()))]
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        info!(
            dwell = %humantime::format_duration(self.options.dwell),
            qualifying = self.picker.qualifying_count(),
            "slideshow started"
        );
        loop {
            let (_, wait) = self.step();
            select! {
                _ = cancel.cancelled() => break,
                _ = sleep(wait) => {}
            }
        }
        Ok(())
    }
}
