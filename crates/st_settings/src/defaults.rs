use std::path::PathBuf;

// Capture window (logical pixels)
pub fn default_capture_width() -> u32 {
    500
}

pub fn default_capture_height() -> u32 {
    300
}

// Timing
pub fn default_debounce_ms() -> u64 {
    700
}

pub fn default_refresh_interval_ms() -> u64 {
    2000
}

pub fn default_settle_delay_ms() -> u64 {
    250
}

// Line grouping
pub fn default_vertical_tolerance() -> i32 {
    10
}

pub fn default_gap_tolerance() -> i32 {
    30
}

pub fn default_confidence_floor() -> f32 {
    0.3
}

pub fn default_min_line_chars() -> usize {
    2
}

pub fn default_min_rect_size() -> i32 {
    10
}

// Translator
pub fn default_target_language() -> String {
    "es".to_string()
}

pub fn default_source_language() -> String {
    "auto".to_string()
}

pub fn default_translator_endpoint() -> String {
    "http://localhost:5000".to_string()
}

pub fn default_request_timeout_ms() -> u64 {
    10_000
}

/// Zero means one worker per available CPU.
pub fn default_translation_workers() -> usize {
    0
}

// OCR
pub fn default_ocr_language() -> String {
    "latin".to_string()
}

pub fn default_models_dir() -> String {
    home_dir()
        .join(".screen_translate")
        .join("models")
        .to_string_lossy()
        .to_string()
}

/// User home directory, falling back to the program directory and then the cwd.
pub fn home_dir() -> PathBuf {
    if let Ok(home_dir) = std::env::var("HOME") {
        return PathBuf::from(home_dir);
    }
    if let Ok(home_dir) = std::env::var("USERPROFILE") {
        return PathBuf::from(home_dir);
    }

    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.to_path_buf();
    }

    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
