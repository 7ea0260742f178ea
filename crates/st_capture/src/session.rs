use std::sync::Arc;

use image::{DynamicImage, RgbaImage};
use st_app::Region;
use st_ocr::{Detection, Recognizer};

use crate::error::CaptureError;
use crate::source::ScreenSource;

/// Grayscale conversion applied before recognition.
pub fn preprocess(image: RgbaImage) -> DynamicImage {
    DynamicImage::ImageRgba8(image).grayscale()
}

/// One capture provider call followed by one recognizer call.
///
/// Stateless per invocation and blocking; hosts run it off their control thread.
pub struct CaptureSession<S, R> {
    source: Arc<S>,
    recognizer: Arc<R>,
}

impl<S, R> Clone for CaptureSession<S, R> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            recognizer: Arc::clone(&self.recognizer),
        }
    }
}

impl<S: ScreenSource, R: Recognizer> CaptureSession<S, R> {
    pub fn new(source: Arc<S>, recognizer: Arc<R>) -> Self {
        Self { source, recognizer }
    }

    /// Capture `region` and return the raw detections in region-local pixels.
    pub fn run(&self, region: Region) -> Result<Vec<Detection>, CaptureError> {
        if !region.is_well_formed() {
            return Err(CaptureError::InvalidRegion(region));
        }

        let image = self.source.capture(region)?;
        if image.width() == 0 || image.height() == 0 {
            return Err(CaptureError::Capture(format!(
                "provider returned an empty image for {region:?}"
            )));
        }

        let detections = self.recognizer.recognize(&preprocess(image))?;
        log::debug!(
            "recognized {} fragments in {}x{} region",
            detections.len(),
            region.width(),
            region.height()
        );
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use image::{DynamicImage, RgbaImage};
    use parking_lot::Mutex;
    use st_app::{Display, Region};
    use st_ocr::{Detection, Recognizer};

    use super::CaptureSession;
    use crate::{CaptureError, ScreenSource};

    #[derive(Default)]
    struct FakeScreen {
        captured: Mutex<Vec<Region>>,
    }

    impl ScreenSource for FakeScreen {
        fn primary_display(&self) -> Result<Display, CaptureError> {
            Ok(Display::new(Region::new(0, 0, 800, 600), 1.0))
        }

        fn capture(&self, region: Region) -> Result<RgbaImage, CaptureError> {
            self.captured.lock().push(region);
            Ok(RgbaImage::new(region.width() as u32, region.height() as u32))
        }
    }

    struct GrayOnly;

    impl Recognizer for GrayOnly {
        fn recognize(&self, image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
            anyhow::ensure!(!image.color().has_color(), "expected a grayscale image");
            Ok(vec![Detection::from_rect(1, 2, 30, 10, "Hola", 0.9)])
        }
    }

    struct Broken;

    impl Recognizer for Broken {
        fn recognize(&self, _image: &DynamicImage) -> anyhow::Result<Vec<Detection>> {
            anyhow::bail!("model crashed")
        }
    }

    #[test]
    fn captures_then_recognizes_grayscale() {
        let screen = Arc::new(FakeScreen::default());
        let session = CaptureSession::new(Arc::clone(&screen), Arc::new(GrayOnly));

        let region = Region::new(10, 10, 110, 60);
        let dets = session.run(region).unwrap();

        assert_eq!(dets.len(), 1);
        assert_eq!(dets[0].text, "Hola");
        assert_eq!(*screen.captured.lock(), vec![region]);
    }

    #[test]
    fn malformed_region_is_rejected_before_capture() {
        let screen = Arc::new(FakeScreen::default());
        let session = CaptureSession::new(Arc::clone(&screen), Arc::new(GrayOnly));

        let err = session.run(Region::new(10, 10, 10, 60)).unwrap_err();
        assert!(matches!(err, CaptureError::InvalidRegion(_)));
        assert!(screen.captured.lock().is_empty());
    }

    #[test]
    fn recognizer_failure_is_reported() {
        let session = CaptureSession::new(Arc::new(FakeScreen::default()), Arc::new(Broken));
        let err = session.run(Region::new(0, 0, 50, 50)).unwrap_err();
        assert!(matches!(err, CaptureError::Recognition(_)));
    }
}
