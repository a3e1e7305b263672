use media_kiosk::config::Configuration;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::tempdir;

fn parse(yaml: &str) -> Configuration {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn minimal_config_uses_device_defaults() {
    let cfg = parse("library-path: /sdcard\n").validated().unwrap();
    assert_eq!(cfg.library_path, PathBuf::from("/sdcard"));
    assert_eq!(cfg.image_suffix, ".png");
    assert_eq!(cfg.hidden_prefix, ".");
    assert_eq!(cfg.slideshow.dwell, Duration::from_secs(5));
    assert_eq!(cfg.slideshow.empty_retry, Duration::from_secs(10));
    assert_eq!(cfg.slideshow.empty_message, "No image found");
    assert_eq!(cfg.audio.asset, PathBuf::from("/spiffs/Canon.mp3"));
    assert_eq!(cfg.audio.volume_level, 60);
    assert_eq!(cfg.audio.player_command, ["mpg123", "-q", "-"]);
    assert_eq!(cfg.codec.mixer_control, "Master");
    assert!(cfg.codec.card.is_none());
    assert_eq!(cfg.codec.command_timeout, Duration::from_secs(2));
    assert!(cfg.mute_button.is_none());
    assert_eq!(cfg.display_prefix(), "/sdcard/");
}

#[test]
fn parse_kebab_case_sections() {
    let yaml = r#"
library-path: /sdcard
display-path-prefix: "S:/sdcard/"
slideshow:
  dwell: 250ms
  empty-retry: 1s
  empty-message: "Insert card"
audio:
  asset: /spiffs/loop.mp3
  volume-level: 80
  player-command: ["aplay", "-q"]
codec:
  mixer-control: Speaker
  card: "1"
  command-timeout: 500ms
mute-button:
  key-code: KEY_F1
"#;
    let cfg = parse(yaml).validated().unwrap();
    assert_eq!(cfg.display_prefix(), "S:/sdcard/");
    assert_eq!(cfg.slideshow.dwell, Duration::from_millis(250));
    assert_eq!(cfg.slideshow.empty_retry, Duration::from_secs(1));
    assert_eq!(cfg.slideshow.empty_message, "Insert card");
    assert_eq!(cfg.audio.asset, PathBuf::from("/spiffs/loop.mp3"));
    assert_eq!(cfg.audio.volume_level, 80);
    assert_eq!(cfg.audio.player_command, ["aplay", "-q"]);
    assert_eq!(cfg.codec.mixer_control, "Speaker");
    assert_eq!(cfg.codec.card.as_deref(), Some("1"));
    assert_eq!(cfg.codec.command_timeout, Duration::from_millis(500));
    let button = cfg.mute_button.unwrap();
    assert_eq!(button.key_code, "KEY_F1");
    assert!(button.device.is_none());
}

#[test]
fn mute_button_block_defaults_key_code() {
    let yaml = "library-path: /sdcard\nmute-button:\n  device: /dev/input/event3\n";
    let button = parse(yaml).validated().unwrap().mute_button.unwrap();
    assert_eq!(button.key_code, "KEY_MUTE");
    assert_eq!(button.device, Some(PathBuf::from("/dev/input/event3")));
}

#[test]
fn display_prefix_keeps_existing_separator() {
    let cfg = parse("library-path: /media/card/\n");
    assert_eq!(cfg.display_prefix(), "/media/card/");
}

#[test]
fn custom_suffix_flows_into_entry_filter() {
    let cfg = parse("library-path: /sdcard\nimage-suffix: .bmp\nhidden-prefix: _\n");
    let filter = cfg.entry_filter();
    assert!(filter.qualifies("logo.BMP"));
    assert!(!filter.qualifies("_logo.bmp"));
    assert!(!filter.qualifies("logo.png"));
}

#[test]
fn rejects_unknown_keys() {
    let yaml = "library-path: /sdcard\nshuffle: true\n";
    assert!(serde_yaml::from_str::<Configuration>(yaml).is_err());
}

#[test]
fn rejects_missing_library_path() {
    assert!(serde_yaml::from_str::<Configuration>("image-suffix: .png\n").is_err());
}

#[test]
fn rejects_out_of_range_volume() {
    let cfg = parse("library-path: /sdcard\naudio:\n  volume-level: 120\n");
    assert!(cfg.validated().is_err());
}

#[test]
fn rejects_zero_intervals() {
    let cfg = parse("library-path: /sdcard\nslideshow:\n  dwell: 0s\n");
    assert!(cfg.validated().is_err());
    let cfg = parse("library-path: /sdcard\nslideshow:\n  empty-retry: 0s\n");
    assert!(cfg.validated().is_err());
}

#[test]
fn rejects_empty_player_command() {
    let cfg = parse("library-path: /sdcard\naudio:\n  player-command: []\n");
    assert!(cfg.validated().is_err());
}

#[test]
fn rejects_empty_hidden_prefix() {
    let cfg = parse("library-path: /sdcard\nhidden-prefix: \"\"\n");
    let err = cfg.validated().unwrap_err();
    assert!(err.to_string().contains("hidden-prefix"), "got {err}");
}

#[test]
fn empty_hidden_prefix_would_hide_every_image() {
    // the filter alone treats "" as a prefix of everything
    let cfg = parse("library-path: /sdcard\nhidden-prefix: \"\"\n");
    assert!(!cfg.entry_filter().qualifies("a.png"));
    let cfg = parse("library-path: /sdcard\n").validated().unwrap();
    assert!(cfg.entry_filter().qualifies("a.png"));
}

#[test]
fn rejects_zero_command_timeout() {
    let cfg = parse("library-path: /sdcard\ncodec:\n  command-timeout: 0s\n");
    assert!(cfg.validated().is_err());
}

#[test]
fn rejects_empty_suffix_and_blank_key_code() {
    let cfg = parse("library-path: /sdcard\nimage-suffix: \"\"\n");
    assert!(cfg.validated().is_err());
    let cfg = parse("library-path: /sdcard\nmute-button:\n  key-code: \" \"\n");
    assert!(cfg.validated().is_err());
}

#[test]
fn loads_from_yaml_file() {
    let tmp = tempdir().unwrap();
    let path = tmp.path().join("kiosk.yaml");
    fs::write(&path, "library-path: /sdcard\nslideshow:\n  dwell: 2s\n").unwrap();

    let cfg = Configuration::from_yaml_file(&path)
        .unwrap()
        .validated()
        .unwrap();
    assert_eq!(cfg.slideshow.dwell, Duration::from_secs(2));
    assert!(Configuration::from_yaml_file(tmp.path().join("missing.yaml")).is_err());
}
