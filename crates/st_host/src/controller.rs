//! Controller event loop.
//!
//! A single task owns the [`Model`] and drains one action queue. User input, timer fires and
//! pipeline results all arrive as [`Action`]s on that queue, so the model is never mutated
//! from anywhere else. Effects returned by the model are executed in order.

use std::sync::Arc;

use st_app::{Action, Config, Display, Effect, Mode, Model, Point, TimerKind};
use st_capture::ScreenSource;
use st_ocr::Recognizer;
use st_translate::Translator;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::pipeline::Pipeline;
use crate::renderer::Renderer;
use crate::timer::Timers;

/// Cloneable sender side of the controller queue.
#[derive(Clone)]
pub struct ControllerHandle {
    tx: UnboundedSender<Action>,
}

impl ControllerHandle {
    /// Post `action`; false once the controller has stopped.
    pub fn send(&self, action: Action) -> bool {
        self.tx.send(action).is_ok()
    }

    pub fn select_mode(&self, mode: Mode) -> bool {
        self.send(Action::SelectMode(mode))
    }

    pub fn pointer_moved(&self, x: i32, y: i32) -> bool {
        self.send(Action::PointerMoved(Point::new(x, y)))
    }

    pub fn clear(&self) -> bool {
        self.send(Action::Clear)
    }

    pub fn quit(&self) -> bool {
        self.send(Action::Quit)
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Controller<S, R, T, V> {
    model: Model,
    pipeline: Arc<Pipeline<S, R, T>>,
    renderer: V,
    timers: Timers,
    tx: UnboundedSender<Action>,
    rx: UnboundedReceiver<Action>,
}

impl<S, R, T, V> Controller<S, R, T, V>
where
    S: ScreenSource + 'static,
    R: Recognizer + 'static,
    T: Translator,
    V: Renderer,
{
    pub fn new(config: Config, pipeline: Pipeline<S, R, T>, renderer: V) -> Self {
        let display: Display = pipeline.display();
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            model: Model::new(config, display),
            pipeline: Arc::new(pipeline),
            renderer,
            timers: Timers::new(tx.clone()),
            tx,
            rx,
        }
    }

    pub fn handle(&self) -> ControllerHandle {
        ControllerHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run until [`Action::Quit`]. Returns the final model.
    pub async fn run(mut self) -> Model {
        log::info!("controller started in {} mode", self.model.mode().name());
        let initial = self.model.start();
        self.execute(initial);

        while let Some(action) = self.rx.recv().await {
            log_stale(&self.model, &action);
            let effects = self.model.reduce(action);
            if let Flow::Quit = self.execute(effects) {
                break;
            }
        }

        self.timers.cancel_all();
        log::info!("controller stopped");
        self.model
    }

    fn execute(&mut self, effects: Vec<Effect>) -> Flow {
        for effect in effects {
            match effect {
                Effect::TrackPointer(enabled) => self.renderer.set_pointer_tracking(enabled),
                Effect::ScheduleTimer {
                    kind,
                    ticket,
                    delay,
                } => self.timers.schedule(kind, ticket, delay),
                Effect::StartRefresh { ticket, interval } => {
                    self.timers
                        .start_periodic(TimerKind::Refresh, ticket, interval)
                }
                Effect::CancelTimer(kind) => self.timers.cancel(kind),
                Effect::RunPipeline(request) => {
                    let pipeline = Arc::clone(&self.pipeline);
                    let tx = self.tx.clone();
                    tokio::spawn(async move { pipeline.run(request, tx).await });
                }
                Effect::Render(event) => self.renderer.apply(event),
                Effect::ShowSelection(selection) => self.renderer.show_selection(selection),
                Effect::Quit => return Flow::Quit,
            }
        }
        Flow::Continue
    }
}

fn log_stale(model: &Model, action: &Action) {
    let generation = match action {
        Action::AnnotationReady { generation, .. } | Action::BatchReady { generation, .. } => {
            *generation
        }
        _ => return,
    };
    if !model.is_current(generation) {
        log::debug!(
            "discarding results of generation {generation} (current {})",
            model.generation()
        );
    }
}
