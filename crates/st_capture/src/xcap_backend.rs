//! Screen capture via the `xcap` crate.
//!
//! Captures the primary monitor and crops to the requested region. Region coordinates are
//! absolute and must lie on the primary monitor.

use image::RgbaImage;
use st_app::{Display, Region};
use xcap::Monitor;

use crate::error::CaptureError;
use crate::source::ScreenSource;

#[derive(Debug, Default, Clone, Copy)]
pub struct XcapScreen;

impl XcapScreen {
    pub fn new() -> Self {
        Self
    }

    fn primary_monitor() -> Result<Monitor, CaptureError> {
        let monitors = Monitor::all().map_err(|e| CaptureError::Display(e.to_string()))?;

        let mut first = None;
        for monitor in monitors {
            if monitor.is_primary().unwrap_or(false) {
                return Ok(monitor);
            }
            first.get_or_insert(monitor);
        }
        first.ok_or_else(|| CaptureError::Display("no monitors detected".to_string()))
    }

    fn bounds(monitor: &Monitor) -> Result<Region, CaptureError> {
        let err = |e: xcap::XCapError| CaptureError::Display(e.to_string());
        Ok(Region::from_origin_size(
            monitor.x().map_err(err)?,
            monitor.y().map_err(err)?,
            monitor.width().map_err(err)? as i32,
            monitor.height().map_err(err)? as i32,
        ))
    }
}

impl ScreenSource for XcapScreen {
    fn primary_display(&self) -> Result<Display, CaptureError> {
        let monitor = Self::primary_monitor()?;
        let scale = monitor
            .scale_factor()
            .map_err(|e| CaptureError::Display(e.to_string()))?;
        Ok(Display::new(Self::bounds(&monitor)?, f64::from(scale)))
    }

    fn capture(&self, region: Region) -> Result<RgbaImage, CaptureError> {
        let monitor = Self::primary_monitor()?;
        let bounds = Self::bounds(&monitor)?;
        let local = region
            .intersect(&bounds)
            .ok_or(CaptureError::InvalidRegion(region))?;

        let screen = monitor
            .capture_image()
            .map_err(|e| CaptureError::Capture(e.to_string()))?;

        Ok(image::imageops::crop_imm(
            &screen,
            (local.left - bounds.left) as u32,
            (local.top - bounds.top) as u32,
            local.width() as u32,
            local.height() as u32,
        )
        .to_image())
    }
}
