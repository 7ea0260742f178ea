//! One capture → group → translate run, executed off the controller loop.

use st_app::{Action, Delivery, Display, PipelineRequest, Region};
use st_capture::{CaptureSession, ScreenSource};
use st_ocr::{GroupingParams, Recognizer, TextLine, group_lines};
use st_translate::{Orchestrator, TranslationTask, Translator};
use tokio::sync::mpsc::UnboundedSender;

use crate::error::HostResult;

pub struct Pipeline<S, R, T> {
    session: CaptureSession<S, R>,
    orchestrator: Orchestrator<T>,
    grouping: GroupingParams,
    display: Display,
}

impl<S, R, T> Pipeline<S, R, T>
where
    S: ScreenSource + 'static,
    R: Recognizer + 'static,
    T: Translator,
{
    pub fn new(
        session: CaptureSession<S, R>,
        orchestrator: Orchestrator<T>,
        grouping: GroupingParams,
        display: Display,
    ) -> Self {
        Self {
            session,
            orchestrator,
            grouping,
            display,
        }
    }

    pub fn display(&self) -> Display {
        self.display
    }

    /// Capture and recognize `region` on the blocking pool, then group into lines.
    pub async fn recognize_lines(&self, region: Region) -> HostResult<Vec<TextLine>> {
        let session = self.session.clone();
        let detections = tokio::task::spawn_blocking(move || session.run(region)).await??;
        Ok(group_lines(&detections, &self.grouping))
    }

    /// Execute `request`, posting results and a final [`Action::PipelineFinished`] to `tx`.
    ///
    /// Capture or recognition failures end the run without results; prior annotations stay.
    pub async fn run(&self, request: PipelineRequest, tx: UnboundedSender<Action>) {
        let generation = request.generation;
        log::debug!(
            "generation {generation}: {:?} run over {:?}",
            request.delivery,
            request.region
        );

        match self.recognize_lines(request.region).await {
            Ok(lines) => {
                log::debug!("generation {generation}: {} lines", lines.len());
                let tasks = TranslationTask::for_region(lines, request.region, self.display);

                match request.delivery {
                    Delivery::Streaming => {
                        let delivered = self
                            .orchestrator
                            .translate_streaming(tasks, |annotation| {
                                let _ = tx.send(Action::AnnotationReady {
                                    generation,
                                    annotation,
                                });
                            })
                            .await;
                        log::debug!("generation {generation}: streamed {delivered} annotations");
                    }
                    Delivery::Batch => {
                        let results = self.orchestrator.translate_batch(tasks).await;
                        log::debug!("generation {generation}: {} annotations", results.len());
                        let _ = tx.send(Action::BatchReady {
                            generation,
                            results,
                        });
                    }
                }
            }
            Err(e) => log::warn!("generation {generation}: capture failed: {e}"),
        }

        let _ = tx.send(Action::PipelineFinished { generation });
    }
}
