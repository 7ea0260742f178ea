use std::time::Duration;

pub mod annotations;
pub mod geometry;
pub mod mode;

pub use annotations::{
    Annotation, AnnotationEvent, AnnotationKey, AnnotationMap, AnnotationSet, Reconciliation,
    reconcile,
};
pub use geometry::{Display, Point, Region};
pub use mode::{Mode, Phase, RectPhase};

/// Monotonically increasing tag of one pipeline run.
pub type Generation = u64;

/// Identity of one scheduled timer; a fire carrying a stale ticket is discarded.
pub type Ticket = u64;

/// Timer slots owned by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Pointer-rest debounce (one-shot, cancel-and-restart).
    Debounce,
    /// Full-screen settle delay (one-shot).
    Settle,
    /// Committed-rectangle refresh (periodic).
    Refresh,
}

impl TimerKind {
    pub const ALL: [TimerKind; 3] = [TimerKind::Debounce, TimerKind::Settle, TimerKind::Refresh];

    fn slot(self) -> usize {
        match self {
            TimerKind::Debounce => 0,
            TimerKind::Settle => 1,
            TimerKind::Refresh => 2,
        }
    }
}

/// How the results of a run reach the annotation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Emit each annotation as soon as its translation completes.
    Streaming,
    /// Wait for the whole generation and reconcile once.
    Batch,
}

/// One capture+OCR+translate run requested by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineRequest {
    pub generation: Generation,
    pub region: Region,
    pub delivery: Delivery,
}

/// Controller timing and geometry rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Pointer window size in logical pixels.
    pub capture_width: u32,
    pub capture_height: u32,
    pub debounce: Duration,
    pub refresh_interval: Duration,
    pub settle_delay: Duration,
    /// A dragged rectangle must exceed this in both dimensions (physical pixels).
    pub min_rect_size: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capture_width: 500,
            capture_height: 300,
            debounce: Duration::from_millis(700),
            refresh_interval: Duration::from_millis(2000),
            settle_delay: Duration::from_millis(250),
            min_rect_size: 10,
        }
    }
}

/// Controller inputs: user events, timer fires and pipeline results.
#[derive(Debug, Clone)]
pub enum Action {
    SelectMode(Mode),
    PointerMoved(Point),
    DragStart(Point),
    DragMove(Point),
    DragEnd(Point),
    /// Remove all annotations without touching mode or region.
    Clear,
    Quit,

    TimerElapsed { kind: TimerKind, ticket: Ticket },

    /// One streamed annotation.
    AnnotationReady {
        generation: Generation,
        annotation: Annotation,
    },
    /// Complete result set of a batch run.
    BatchReady {
        generation: Generation,
        results: AnnotationMap,
    },
    /// The run settled (successfully or not).
    PipelineFinished { generation: Generation },
}

/// Effects requested by the controller (executed by the host).
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Start or stop system-wide pointer tracking.
    TrackPointer(bool),
    /// Schedule a one-shot timer, replacing any pending one of the same kind.
    ScheduleTimer {
        kind: TimerKind,
        ticket: Ticket,
        delay: Duration,
    },
    /// Start a periodic timer, replacing any running one of the same kind.
    StartRefresh { ticket: Ticket, interval: Duration },
    CancelTimer(TimerKind),
    RunPipeline(PipelineRequest),
    Render(AnnotationEvent),
    /// Live or committed selection rectangle (or none).
    ShowSelection(Option<Region>),
    Quit,
}

#[derive(Debug, Default)]
struct Tickets {
    next: Ticket,
    armed: [Option<Ticket>; 3],
}

impl Tickets {
    fn arm(&mut self, kind: TimerKind) -> Ticket {
        self.next += 1;
        self.armed[kind.slot()] = Some(self.next);
        self.next
    }

    fn disarm(&mut self, kind: TimerKind) {
        self.armed[kind.slot()] = None;
    }

    fn is_armed(&self, kind: TimerKind, ticket: Ticket) -> bool {
        self.armed[kind.slot()] == Some(ticket)
    }
}

/// Interaction mode controller.
///
/// Single writer of the mode, the active region and the annotation set. Every input is
/// funneled through [`Model::reduce`]; the host executes the returned effects.
#[derive(Debug)]
pub struct Model {
    config: Config,
    display: Display,
    phase: Phase,
    pointer: Option<Point>,
    generation: Generation,
    in_flight: Option<Generation>,
    annotations: AnnotationSet,
    tickets: Tickets,
    quit: bool,
}

impl Model {
    pub fn new(config: Config, display: Display) -> Self {
        Self {
            config,
            display,
            phase: Phase::default(),
            pointer: None,
            generation: 0,
            in_flight: None,
            annotations: AnnotationSet::new(),
            tickets: Tickets::default(),
            quit: false,
        }
    }

    /// Effects for the initial `Pointer` state.
    pub fn start(&self) -> Vec<Effect> {
        vec![Effect::TrackPointer(true)]
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn mode(&self) -> Mode {
        self.phase.mode()
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation == self.generation
    }

    pub fn in_flight(&self) -> Option<Generation> {
        self.in_flight
    }

    pub fn annotations(&self) -> &AnnotationSet {
        &self.annotations
    }

    pub fn display(&self) -> &Display {
        &self.display
    }

    pub fn has_quit(&self) -> bool {
        self.quit
    }

    /// Capture window centered on `pointer`, clamped to the display.
    pub fn pointer_region(&self, pointer: Point) -> Option<Region> {
        let width = self.display.to_physical(self.config.capture_width);
        let height = self.display.to_physical(self.config.capture_height);
        Region::centered_at(pointer, width, height).intersect(&self.display.bounds)
    }

    pub fn reduce(&mut self, action: Action) -> Vec<Effect> {
        if self.quit {
            return Vec::new();
        }

        match action {
            Action::SelectMode(mode) => {
                let mut effects = self.leave_phase();
                self.phase = Phase::entering(mode);

                match mode {
                    Mode::Pointer => effects.push(Effect::TrackPointer(true)),
                    Mode::FullScreen => {
                        effects.push(Effect::TrackPointer(false));
                        effects.push(Effect::ScheduleTimer {
                            kind: TimerKind::Settle,
                            ticket: self.tickets.arm(TimerKind::Settle),
                            delay: self.config.settle_delay,
                        });
                    }
                    Mode::RectSelect => effects.push(Effect::TrackPointer(false)),
                }
                effects
            }

            Action::PointerMoved(point) => {
                // Pointer tracking is off outside of pointer mode.
                if self.phase != Phase::Pointer {
                    return Vec::new();
                }

                self.pointer = Some(point);
                self.invalidate();

                let mut effects = self.clear_annotations();
                effects.push(Effect::ScheduleTimer {
                    kind: TimerKind::Debounce,
                    ticket: self.tickets.arm(TimerKind::Debounce),
                    delay: self.config.debounce,
                });
                effects
            }

            Action::TimerElapsed { kind, ticket } => {
                if !self.tickets.is_armed(kind, ticket) {
                    return Vec::new();
                }

                match kind {
                    TimerKind::Debounce => {
                        self.tickets.disarm(kind);
                        if self.phase != Phase::Pointer {
                            return Vec::new();
                        }
                        let region = self.pointer.and_then(|p| self.pointer_region(p));
                        match region {
                            Some(region) => self.start_run(region, Delivery::Streaming),
                            None => Vec::new(),
                        }
                    }
                    TimerKind::Settle => {
                        self.tickets.disarm(kind);
                        if self.phase != Phase::FullScreen || !self.display.bounds.is_well_formed()
                        {
                            return Vec::new();
                        }
                        self.start_run(self.display.bounds, Delivery::Streaming)
                    }
                    TimerKind::Refresh => {
                        let Some(region) = self.phase.committed_region() else {
                            return Vec::new();
                        };
                        // Skip this tick while the previous refresh is still running.
                        if self.in_flight.is_some() {
                            return Vec::new();
                        }
                        self.start_run(region, Delivery::Batch)
                    }
                }
            }

            Action::DragStart(point) => {
                let Phase::RectSelect(rect_phase) = self.phase else {
                    return Vec::new();
                };

                let mut effects = Vec::new();
                if let RectPhase::Committed { .. } = rect_phase {
                    // A new rectangle replaces the committed one.
                    effects.push(Effect::CancelTimer(TimerKind::Refresh));
                    self.tickets.disarm(TimerKind::Refresh);
                    self.invalidate();
                    effects.extend(self.clear_annotations());
                    effects.push(Effect::ShowSelection(None));
                }

                self.phase = Phase::RectSelect(RectPhase::Selecting {
                    start: point,
                    current: point,
                });
                effects
            }

            Action::DragMove(point) => {
                if let Phase::RectSelect(RectPhase::Selecting { start, current }) = &mut self.phase
                {
                    *current = point;
                    let live = Region::from_points(*start, point);
                    return vec![Effect::ShowSelection(Some(live))];
                }
                Vec::new()
            }

            Action::DragEnd(point) => {
                let Phase::RectSelect(RectPhase::Selecting { start, .. }) = self.phase else {
                    return Vec::new();
                };

                let committed = Region::from_points(start, point)
                    .intersect(&self.display.bounds)
                    .filter(|r| r.exceeds_min_size(self.config.min_rect_size));

                match committed {
                    Some(region) => {
                        self.phase = Phase::RectSelect(RectPhase::Committed { region });

                        let mut effects = vec![Effect::ShowSelection(Some(region))];
                        effects.extend(self.start_run(region, Delivery::Batch));
                        effects.push(Effect::StartRefresh {
                            ticket: self.tickets.arm(TimerKind::Refresh),
                            interval: self.config.refresh_interval,
                        });
                        effects
                    }
                    None => {
                        self.phase = Phase::RectSelect(RectPhase::Idle);
                        vec![Effect::ShowSelection(None)]
                    }
                }
            }

            Action::Clear => {
                self.invalidate();
                self.clear_annotations()
            }

            Action::Quit => {
                let mut effects = self.cancel_timers();
                self.invalidate();
                effects.extend(self.clear_annotations());
                effects.push(Effect::Render(AnnotationEvent::ClearAll));
                effects.push(Effect::Quit);
                self.quit = true;
                effects
            }

            Action::AnnotationReady {
                generation,
                annotation,
            } => {
                if !self.is_current(generation) {
                    return Vec::new();
                }
                self.annotations
                    .insert(annotation)
                    .map(Effect::Render)
                    .into_iter()
                    .collect()
            }

            Action::BatchReady {
                generation,
                results,
            } => {
                if !self.is_current(generation) {
                    return Vec::new();
                }
                self.annotations
                    .replace(results)
                    .into_iter()
                    .map(Effect::Render)
                    .collect()
            }

            Action::PipelineFinished { generation } => {
                if self.in_flight == Some(generation) {
                    self.in_flight = None;
                }
                Vec::new()
            }
        }
    }

    fn start_run(&mut self, region: Region, delivery: Delivery) -> Vec<Effect> {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        vec![Effect::RunPipeline(PipelineRequest {
            generation: self.generation,
            region,
            delivery,
        })]
    }

    /// Supersede any in-flight run: its results will fail the generation check.
    fn invalidate(&mut self) {
        self.generation += 1;
        self.in_flight = None;
    }

    fn clear_annotations(&mut self) -> Vec<Effect> {
        self.annotations
            .clear()
            .into_iter()
            .map(Effect::Render)
            .collect()
    }

    fn cancel_timers(&mut self) -> Vec<Effect> {
        TimerKind::ALL
            .into_iter()
            .map(|kind| {
                self.tickets.disarm(kind);
                Effect::CancelTimer(kind)
            })
            .collect()
    }

    fn leave_phase(&mut self) -> Vec<Effect> {
        let mut effects = self.cancel_timers();
        self.invalidate();
        effects.extend(self.clear_annotations());

        if let Phase::RectSelect(RectPhase::Selecting { .. } | RectPhase::Committed { .. }) =
            self.phase
        {
            effects.push(Effect::ShowSelection(None));
        }
        effects
    }
}
