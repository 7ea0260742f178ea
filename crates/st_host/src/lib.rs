pub mod config;
pub mod controller;
pub mod error;
pub mod pipeline;
pub mod renderer;
pub mod timer;

pub use config::HostConfig;
pub use controller::{Controller, ControllerHandle};
pub use error::{HostError, HostResult};
pub use pipeline::Pipeline;
pub use renderer::{ChannelRenderer, RenderEvent, Renderer};
pub use timer::Timers;
