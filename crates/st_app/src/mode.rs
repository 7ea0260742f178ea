use crate::geometry::{Point, Region};

/// Interaction mode selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Translate text around the pointer once it comes to rest.
    Pointer,
    /// Translate the whole primary display once.
    FullScreen,
    /// Translate a user-drawn rectangle and keep it refreshed.
    RectSelect,
}

impl Mode {
    pub fn name(self) -> &'static str {
        match self {
            Mode::Pointer => "pointer",
            Mode::FullScreen => "fullscreen",
            Mode::RectSelect => "rect_select",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "pointer" => Some(Mode::Pointer),
            "fullscreen" | "full_screen" => Some(Mode::FullScreen),
            "rect_select" | "rect" => Some(Mode::RectSelect),
            _ => None,
        }
    }
}

/// Sub-state of [`Mode::RectSelect`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RectPhase {
    /// Waiting for a drag to start.
    #[default]
    Idle,
    /// A drag is in progress.
    Selecting { start: Point, current: Point },
    /// A rectangle was committed and is refreshed periodically.
    Committed { region: Region },
}

/// Controller phase: the active mode plus its mode-specific data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Pointer,
    FullScreen,
    RectSelect(RectPhase),
}

impl Phase {
    pub fn mode(&self) -> Mode {
        match self {
            Phase::Pointer => Mode::Pointer,
            Phase::FullScreen => Mode::FullScreen,
            Phase::RectSelect(_) => Mode::RectSelect,
        }
    }

    /// Entry phase for `mode`.
    pub fn entering(mode: Mode) -> Self {
        match mode {
            Mode::Pointer => Phase::Pointer,
            Mode::FullScreen => Phase::FullScreen,
            Mode::RectSelect => Phase::RectSelect(RectPhase::Idle),
        }
    }

    /// The committed rectangle, if any.
    pub fn committed_region(&self) -> Option<Region> {
        match self {
            Phase::RectSelect(RectPhase::Committed { region }) => Some(*region),
            _ => None,
        }
    }
}
