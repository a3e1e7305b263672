pub mod config;
pub mod error;
pub mod events;
pub mod filter;
pub mod kiosk;
pub mod selector;
pub mod platform {
    pub mod audio;
    pub mod codec;
    pub mod display;
    pub mod input;
    pub mod storage;
}
pub mod tasks {
    pub mod audio;
    pub mod button;
    pub mod slideshow;
}
