pub mod error;
pub mod session;
pub mod source;

#[cfg(feature = "xcap")]
pub mod xcap_backend;

pub use error::CaptureError;
pub use session::{CaptureSession, preprocess};
pub use source::ScreenSource;

#[cfg(feature = "xcap")]
pub use xcap_backend::XcapScreen;
