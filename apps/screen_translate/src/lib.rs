pub mod bootstrap;
pub mod commands;
pub mod console;

pub use bootstrap::{drive, start};
pub use commands::{CommandError, parse_command};
pub use console::ConsoleRenderer;

// Component crates, re-exported for embedders and tests.
pub use st_app as app;
pub use st_capture as capture;
pub use st_host as host;
pub use st_ocr as ocr;
pub use st_settings as settings;
pub use st_translate as translate;
