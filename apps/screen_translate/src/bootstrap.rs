//! Backend construction and the stdin driver.

use std::sync::Arc;

use st_capture::{CaptureSession, ScreenSource};
use st_host::{Controller, ControllerHandle, HostConfig, HostError, HostResult, Pipeline};
use st_ocr::{OcrConfig, Recognizer};
use st_settings::Settings;
use st_translate::{LibreTranslateClient, Orchestrator};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::commands::parse_command;
use crate::console::ConsoleRenderer;

pub type DynScreen = Box<dyn ScreenSource>;
pub type DynRecognizer = Box<dyn Recognizer>;
pub type AppController =
    Controller<DynScreen, DynRecognizer, LibreTranslateClient, ConsoleRenderer<std::io::Stdout>>;

#[cfg(feature = "paddle")]
pub fn build_recognizer(config: &OcrConfig) -> HostResult<DynRecognizer> {
    let recognizer = st_ocr::PaddleRecognizer::new(config)
        .map_err(|e| HostError::Startup(format!("{e:#}")))?;
    Ok(Box::new(recognizer))
}

#[cfg(not(feature = "paddle"))]
pub fn build_recognizer(config: &OcrConfig) -> HostResult<DynRecognizer> {
    Err(HostError::Startup(format!(
        "no OCR backend compiled in (models dir {}); rebuild with `--features paddle`",
        config.models_dir.display()
    )))
}

#[cfg(feature = "xcap")]
pub fn build_screen() -> HostResult<DynScreen> {
    Ok(Box::new(st_capture::XcapScreen::new()))
}

#[cfg(not(feature = "xcap"))]
pub fn build_screen() -> HostResult<DynScreen> {
    Err(HostError::Startup(
        "no screen capture backend compiled in; rebuild with `--features xcap`".to_string(),
    ))
}

/// Build every backend from `settings` and return a controller ready to run.
///
/// Any failure here is fatal: nothing has been shown yet.
pub fn start(settings: &Settings) -> HostResult<AppController> {
    let config = HostConfig::from_settings(settings);

    let screen = build_screen()?;
    let display = screen.primary_display()?;
    let recognizer = build_recognizer(&config.ocr)?;
    let translator = LibreTranslateClient::new(config.client.clone())?;

    log::info!(
        "display {:?} at scale {}, translating to {} via {}",
        display.bounds,
        display.scale_factor,
        config.orchestrator.target_language,
        config.client.endpoint
    );

    let session = CaptureSession::new(Arc::new(screen), Arc::new(recognizer));
    let orchestrator = Orchestrator::new(Arc::new(translator), &config.orchestrator);
    let pipeline = Pipeline::new(session, orchestrator, config.grouping, display);

    Ok(Controller::new(
        config.controller,
        pipeline,
        ConsoleRenderer::stdout(),
    ))
}

/// Feed commands read from `reader` to the controller. End of input quits.
pub async fn drive<Rd>(reader: Rd, handle: ControllerHandle)
where
    Rd: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => match parse_command(&line) {
                Ok(Some(action)) => {
                    if !handle.send(action) {
                        return;
                    }
                }
                Ok(None) => {}
                Err(e) => log::warn!("{e}"),
            },
            Ok(None) => break,
            Err(e) => {
                log::error!("cannot read commands: {e}");
                break;
            }
        }
    }
    handle.quit();
}

#[cfg(all(test, not(feature = "xcap")))]
mod tests {
    use st_host::HostError;
    use st_settings::Settings;

    use super::start;

    #[test]
    fn missing_backends_fail_startup_with_a_diagnostic() {
        match start(&Settings::default()) {
            Err(HostError::Startup(message)) => assert!(message.contains("rebuild with")),
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("startup should fail without backends"),
        }
    }
}
