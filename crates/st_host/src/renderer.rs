use st_app::{AnnotationEvent, Region};
use tokio::sync::mpsc::UnboundedSender;

/// Consumer of the controller's presentation effects.
///
/// Implementations must treat a remove for an unknown key as a no-op.
pub trait Renderer: Send {
    fn apply(&mut self, event: AnnotationEvent);

    /// Live or committed selection rectangle, `None` hides it.
    fn show_selection(&mut self, _selection: Option<Region>) {}

    /// Start or stop system-wide pointer tracking.
    fn set_pointer_tracking(&mut self, _enabled: bool) {}
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn apply(&mut self, event: AnnotationEvent) {
        (**self).apply(event)
    }

    fn show_selection(&mut self, selection: Option<Region>) {
        (**self).show_selection(selection)
    }

    fn set_pointer_tracking(&mut self, enabled: bool) {
        (**self).set_pointer_tracking(enabled)
    }
}

/// Everything a [`Renderer`] can be asked to do, as a message.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderEvent {
    Annotation(AnnotationEvent),
    Selection(Option<Region>),
    PointerTracking(bool),
}

/// Forwards render calls to another task or thread, e.g. a UI event loop.
pub struct ChannelRenderer {
    tx: UnboundedSender<RenderEvent>,
}

impl ChannelRenderer {
    pub fn new(tx: UnboundedSender<RenderEvent>) -> Self {
        Self { tx }
    }

    fn forward(&self, event: RenderEvent) {
        if self.tx.send(event).is_err() {
            log::trace!("render receiver dropped");
        }
    }
}

impl Renderer for ChannelRenderer {
    fn apply(&mut self, event: AnnotationEvent) {
        self.forward(RenderEvent::Annotation(event));
    }

    fn show_selection(&mut self, selection: Option<Region>) {
        self.forward(RenderEvent::Selection(selection));
    }

    fn set_pointer_tracking(&mut self, enabled: bool) {
        self.forward(RenderEvent::PointerTracking(enabled));
    }
}
