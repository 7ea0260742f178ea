use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::defaults::*;

/// Application settings. Every field falls back to its default when missing from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    // Capture window
    #[serde(default = "default_capture_width")]
    pub capture_width: u32,
    #[serde(default = "default_capture_height")]
    pub capture_height: u32,

    // Timing
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    // Line grouping
    #[serde(default = "default_vertical_tolerance")]
    pub vertical_tolerance: i32,
    #[serde(default = "default_gap_tolerance")]
    pub gap_tolerance: i32,
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f32,
    #[serde(default = "default_min_line_chars")]
    pub min_line_chars: usize,

    /// Smallest committed rectangle side, physical pixels (exclusive).
    #[serde(default = "default_min_rect_size")]
    pub min_rect_size: i32,

    // Translator
    #[serde(default = "default_target_language")]
    pub target_language: String,
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_translator_endpoint")]
    pub translator_endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default = "default_translation_workers")]
    pub translation_workers: usize,

    // OCR
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            capture_width: default_capture_width(),
            capture_height: default_capture_height(),

            debounce_ms: default_debounce_ms(),
            refresh_interval_ms: default_refresh_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),

            vertical_tolerance: default_vertical_tolerance(),
            gap_tolerance: default_gap_tolerance(),
            confidence_floor: default_confidence_floor(),
            min_line_chars: default_min_line_chars(),
            min_rect_size: default_min_rect_size(),

            target_language: default_target_language(),
            source_language: default_source_language(),
            translator_endpoint: default_translator_endpoint(),
            api_key: String::new(),
            request_timeout_ms: default_request_timeout_ms(),
            translation_workers: default_translation_workers(),

            ocr_language: default_ocr_language(),
            models_dir: default_models_dir(),
        }
    }
}

impl Settings {
    fn settings_dir() -> PathBuf {
        home_dir().join(".screen_translate")
    }

    /// `$HOME/.screen_translate/settings.json`.
    pub fn default_path() -> PathBuf {
        Self::settings_dir().join("settings.json")
    }

    /// Load settings from `path`, falling back to defaults.
    ///
    /// A missing file is created with the defaults; an unreadable one is left untouched.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str::<Settings>(&content) {
                Ok(settings) => return settings.validated(),
                Err(e) => {
                    log::warn!("ignoring malformed settings {}: {e}", path.display());
                    return Self::default();
                }
            },
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                log::warn!("cannot read settings {}: {e}", path.display());
                return Self::default();
            }
            Err(_) => {}
        }

        let default_settings = Self::default();
        if let Err(e) = default_settings.save_to(path) {
            log::warn!("cannot persist default settings: {e}");
        }
        default_settings
    }

    /// Replace out-of-range tunables with their defaults, warning for each one.
    pub fn validated(mut self) -> Self {
        fn reset<T: std::fmt::Debug>(name: &str, value: &mut T, fallback: T) {
            log::warn!("settings: {name} = {value:?} is out of range, using {fallback:?}");
            *value = fallback;
        }

        if self.capture_width == 0 {
            reset("capture_width", &mut self.capture_width, default_capture_width());
        }
        if self.capture_height == 0 {
            reset("capture_height", &mut self.capture_height, default_capture_height());
        }
        if self.refresh_interval_ms == 0 {
            reset(
                "refresh_interval_ms",
                &mut self.refresh_interval_ms,
                default_refresh_interval_ms(),
            );
        }
        if self.request_timeout_ms == 0 {
            reset(
                "request_timeout_ms",
                &mut self.request_timeout_ms,
                default_request_timeout_ms(),
            );
        }
        if self.vertical_tolerance <= 0 {
            reset(
                "vertical_tolerance",
                &mut self.vertical_tolerance,
                default_vertical_tolerance(),
            );
        }
        if self.gap_tolerance <= 0 {
            reset("gap_tolerance", &mut self.gap_tolerance, default_gap_tolerance());
        }
        if !(0.0..=1.0).contains(&self.confidence_floor) {
            reset(
                "confidence_floor",
                &mut self.confidence_floor,
                default_confidence_floor(),
            );
        }
        if self.min_rect_size < 0 {
            reset("min_rect_size", &mut self.min_rect_size, default_min_rect_size());
        }
        if self.target_language.trim().is_empty() {
            reset(
                "target_language",
                &mut self.target_language,
                default_target_language(),
            );
        }
        self
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    #[inline]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    #[inline]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    #[inline]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[inline]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
