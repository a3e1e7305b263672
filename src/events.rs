/// State changes reported by the audio engine's notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    /// Playback finished or the player exited; nothing is playing.
    Idle,
    Playing,
}

/// Button transitions delivered by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    PressDown,
    /// Release, or any transition other than a press.
    PressUp,
}
