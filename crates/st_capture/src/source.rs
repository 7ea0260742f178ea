use image::RgbaImage;
use st_app::{Display, Region};

use crate::error::CaptureError;

/// Screen capture provider.
///
/// Regions are absolute physical pixels on the primary display.
pub trait ScreenSource: Send + Sync {
    /// Bounds and scale factor of the primary display.
    fn primary_display(&self) -> Result<Display, CaptureError>;

    /// Grab the pixels inside `region`.
    fn capture(&self, region: Region) -> Result<RgbaImage, CaptureError>;
}

impl<S: ScreenSource + ?Sized> ScreenSource for Box<S> {
    fn primary_display(&self) -> Result<Display, CaptureError> {
        (**self).primary_display()
    }

    fn capture(&self, region: Region) -> Result<RgbaImage, CaptureError> {
        (**self).capture(region)
    }
}
