use std::path::PathBuf;

use st_app::Config;
use st_ocr::{GroupingParams, OcrConfig};
use st_settings::Settings;
use st_translate::{ClientOptions, OrchestratorOptions};

/// Everything the host needs, derived from persisted [`Settings`].
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub controller: Config,
    pub grouping: GroupingParams,
    pub orchestrator: OrchestratorOptions,
    pub client: ClientOptions,
    pub ocr: OcrConfig,
}

impl HostConfig {
    /// Out-of-range tunables are replaced by their defaults first.
    pub fn from_settings(settings: &Settings) -> Self {
        let settings = &settings.clone().validated();
        Self {
            controller: Config {
                capture_width: settings.capture_width,
                capture_height: settings.capture_height,
                debounce: settings.debounce(),
                refresh_interval: settings.refresh_interval(),
                settle_delay: settings.settle_delay(),
                min_rect_size: settings.min_rect_size,
            },
            grouping: GroupingParams {
                confidence_floor: settings.confidence_floor,
                vertical_tolerance: settings.vertical_tolerance,
                gap_tolerance: settings.gap_tolerance,
                min_chars: settings.min_line_chars,
            },
            orchestrator: OrchestratorOptions {
                target_language: settings.target_language.clone(),
                workers: settings.translation_workers,
            },
            client: ClientOptions {
                endpoint: settings.translator_endpoint.clone(),
                source_language: settings.source_language.clone(),
                target_language: settings.target_language.clone(),
                api_key: settings.api_key.clone(),
                timeout: settings.request_timeout(),
            },
            ocr: OcrConfig::new(PathBuf::from(&settings.models_dir), &settings.ocr_language),
        }
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}
