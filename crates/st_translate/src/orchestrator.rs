//! Concurrent per-line translation.
//!
//! Lines are dispatched to a bounded worker pool. Each worker drops lines already in the
//! target language, translates the rest, and drops failures and no-op translations. Results
//! are delivered either all at once as an [`AnnotationMap`] or one by one as they complete.

use std::sync::Arc;

use st_app::{Annotation, AnnotationMap, Display, Point, Region};
use st_ocr::TextLine;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::translator::Translator;

/// Orchestrator tunables.
#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub target_language: String,
    /// Concurrent translations. Zero means one per available CPU.
    pub workers: usize,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            target_language: "es".to_string(),
            workers: 0,
        }
    }
}

impl OrchestratorOptions {
    pub fn effective_workers(&self) -> usize {
        if self.workers > 0 {
            self.workers
        } else {
            std::thread::available_parallelism().map_or(4, |n| n.get())
        }
    }
}

/// One line to translate plus what is needed to place its annotation on screen.
#[derive(Debug, Clone)]
pub struct TranslationTask {
    pub line: TextLine,
    /// Physical top-left of the captured region the line was found in.
    pub origin: Point,
    pub display: Display,
}

impl TranslationTask {
    /// Tasks for every line recognized inside `region`, in reading order.
    pub fn for_region(lines: Vec<TextLine>, region: Region, display: Display) -> Vec<Self> {
        lines
            .into_iter()
            .map(|line| Self {
                line,
                origin: region.origin(),
                display,
            })
            .collect()
    }

    /// Absolute top-left of the line in logical screen pixels.
    pub fn logical_position(&self) -> Point {
        let bounds = self.line.bounds;
        Point::new(
            self.display.to_logical(self.origin.x + bounds.left),
            self.display.to_logical(self.origin.y + bounds.top),
        )
    }

    pub fn annotation(&self, translated: String) -> Annotation {
        Annotation {
            source: self.line.text.clone(),
            translated,
            position: self.logical_position(),
            box_width: self.display.to_logical(self.line.bounds.width()),
        }
    }
}

/// Language codes match when their primary subtags match, ignoring case
/// (`"en-US"` matches `"en"`).
pub fn same_language(a: &str, b: &str) -> bool {
    fn primary(code: &str) -> &str {
        code.trim().split(['-', '_']).next().unwrap_or_default()
    }
    let (a, b) = (primary(a), primary(b));
    !a.is_empty() && a.eq_ignore_ascii_case(b)
}

pub struct Orchestrator<T> {
    translator: Arc<T>,
    target_language: Arc<str>,
    permits: Arc<Semaphore>,
}

impl<T> Clone for Orchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            translator: Arc::clone(&self.translator),
            target_language: Arc::clone(&self.target_language),
            permits: Arc::clone(&self.permits),
        }
    }
}

impl<T: Translator> Orchestrator<T> {
    pub fn new(translator: Arc<T>, options: &OrchestratorOptions) -> Self {
        Self {
            translator,
            target_language: Arc::from(options.target_language.as_str()),
            permits: Arc::new(Semaphore::new(options.effective_workers())),
        }
    }

    /// Translate every task and return the keyed result set.
    ///
    /// Lines sharing a source text keep the first one in reading order.
    pub async fn translate_batch(&self, tasks: Vec<TranslationTask>) -> AnnotationMap {
        let mut workers = self.dispatch(tasks);
        let mut done: Vec<(usize, Annotation)> = Vec::new();

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, Some(annotation))) => done.push((index, annotation)),
                Ok((_, None)) => {}
                Err(e) => log::warn!("translation worker failed: {e}"),
            }
        }

        done.sort_by_key(|(index, _)| *index);
        let mut map = AnnotationMap::new();
        for (_, annotation) in done {
            map.entry(annotation.source.clone()).or_insert(annotation);
        }
        map
    }

    /// Translate every task, handing each annotation to `on_ready` as soon as it completes.
    ///
    /// Returns the number of annotations delivered.
    pub async fn translate_streaming<F>(&self, tasks: Vec<TranslationTask>, mut on_ready: F) -> usize
    where
        F: FnMut(Annotation),
    {
        let mut workers = self.dispatch(tasks);
        let mut delivered = 0;

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((_, Some(annotation))) => {
                    delivered += 1;
                    on_ready(annotation);
                }
                Ok((_, None)) => {}
                Err(e) => log::warn!("translation worker failed: {e}"),
            }
        }
        delivered
    }

    fn dispatch(&self, tasks: Vec<TranslationTask>) -> JoinSet<(usize, Option<Annotation>)> {
        let mut workers = JoinSet::new();
        for (index, task) in tasks.into_iter().enumerate() {
            let translator = Arc::clone(&self.translator);
            let target = Arc::clone(&self.target_language);
            let permits = Arc::clone(&self.permits);

            workers.spawn(async move {
                // The semaphore is never closed.
                let Ok(_permit) = permits.acquire_owned().await else {
                    return (index, None);
                };
                (index, translate_line(&*translator, &target, task).await)
            });
        }
        workers
    }
}

async fn translate_line<T: Translator>(
    translator: &T,
    target: &str,
    task: TranslationTask,
) -> Option<Annotation> {
    let text = task.line.text.trim();
    if text.is_empty() {
        return None;
    }

    match translator.detect_language(text).await {
        Ok(language) if same_language(&language, target) => {
            log::debug!("{text:?} is already {language}, skipping");
            return None;
        }
        Ok(_) => {}
        // Undetectable text is still worth a translation attempt.
        Err(e) => log::debug!("language detection failed for {text:?}: {e}"),
    }

    let translated = match translator.translate(text).await {
        Ok(translated) => translated,
        Err(e) => {
            log::debug!("translation of {text:?} failed: {e}");
            return None;
        }
    };

    let translated = translated.trim();
    if translated.is_empty() || translated.to_lowercase() == text.to_lowercase() {
        return None;
    }
    Some(task.annotation(translated.to_string()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use st_app::{Display, Point, Region};
    use st_ocr::{Detection, GroupingParams, TextLine, group_lines};

    use super::{Orchestrator, OrchestratorOptions, TranslationTask, same_language};
    use crate::{TranslateError, Translator};

    /// Dictionary translator. Unknown words fail; `langs` drives detection.
    #[derive(Default)]
    struct Dictionary {
        words: HashMap<&'static str, &'static str>,
        langs: HashMap<&'static str, &'static str>,
        delay_first: Option<Duration>,
        calls: AtomicUsize,
        active: AtomicUsize,
        peak: AtomicUsize,
        step: Duration,
    }

    impl Dictionary {
        fn new(words: &[(&'static str, &'static str)]) -> Self {
            Self {
                words: words.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn with_langs(mut self, langs: &[(&'static str, &'static str)]) -> Self {
            self.langs = langs.iter().copied().collect();
            self
        }
    }

    impl Translator for Dictionary {
        async fn translate(&self, text: &str) -> Result<String, TranslateError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);

            let delay = match self.delay_first {
                Some(delay) if call == 0 => delay,
                _ => self.step,
            };
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            self.active.fetch_sub(1, Ordering::SeqCst);

            self.words
                .get(text)
                .map(|t| t.to_string())
                .ok_or_else(|| TranslateError::Failed(format!("no entry for {text}")))
        }

        async fn detect_language(&self, text: &str) -> Result<String, TranslateError> {
            self.langs
                .get(text)
                .map(|l| l.to_string())
                .ok_or(TranslateError::Undetermined)
        }
    }

    fn line(x: i32, y: i32, text: &str) -> TextLine {
        let dets = [Detection::from_rect(x, y, 60, 20, text, 0.9)];
        group_lines(&dets, &GroupingParams::default()).remove(0)
    }

    fn display() -> Display {
        Display::new(Region::new(0, 0, 1920, 1080), 1.0)
    }

    fn options(workers: usize) -> OrchestratorOptions {
        OrchestratorOptions {
            target_language: "en".to_string(),
            workers,
        }
    }

    #[test]
    fn language_codes_compare_on_primary_subtag() {
        assert!(same_language("en", "en"));
        assert!(same_language("en-US", "EN"));
        assert!(same_language("pt_BR", "pt"));
        assert!(!same_language("es", "en"));
        assert!(!same_language("", ""));
    }

    #[test]
    fn positions_are_absolute_and_logical() {
        let task = TranslationTask {
            line: line(10, 20, "Salir"),
            origin: Point::new(400, 300),
            display: Display::new(Region::new(0, 0, 3840, 2160), 2.0),
        };
        let annotation = task.annotation("Exit".to_string());
        assert_eq!(annotation.position, Point::new(205, 160));
        assert_eq!(annotation.box_width, 30);
        assert_eq!(annotation.key(), "Salir");
    }

    #[tokio::test]
    async fn batch_drops_target_language_failures_and_no_ops() {
        let translator = Dictionary::new(&[("Salir", "Exit"), ("OK", "ok"), ("Abrir", "Open")])
            .with_langs(&[("Settings", "en-GB"), ("Salir", "es")]);
        let orchestrator = Orchestrator::new(Arc::new(translator), &options(4));

        let lines = vec![
            line(0, 0, "Salir"),
            line(0, 40, "Settings"),
            line(0, 80, "OK"),
            line(0, 120, "Cerrar"),
            line(0, 160, "Abrir"),
        ];
        let region = Region::from_origin_size(100, 50, 500, 300);
        let map = orchestrator
            .translate_batch(TranslationTask::for_region(lines, region, display()))
            .await;

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["Abrir", "Salir"]);
        assert_eq!(map["Salir"].translated, "Exit");
        assert_eq!(map["Salir"].position, Point::new(100, 50));
        assert_eq!(map["Abrir"].position, Point::new(100, 210));
    }

    #[tokio::test(start_paused = true)]
    async fn batch_keeps_first_duplicate_in_reading_order() {
        let mut translator = Dictionary::new(&[("Salir", "Exit")]);
        translator.delay_first = Some(Duration::from_millis(50));
        let orchestrator = Orchestrator::new(Arc::new(translator), &options(4));

        let lines = vec![line(0, 0, "Salir"), line(0, 100, "Salir")];
        let map = orchestrator
            .translate_batch(TranslationTask::for_region(
                lines,
                Region::new(0, 0, 500, 300),
                display(),
            ))
            .await;

        assert_eq!(map.len(), 1);
        assert_eq!(map["Salir"].position, Point::new(0, 0));
    }

    #[tokio::test]
    async fn streaming_delivers_each_completed_line() {
        let translator = Dictionary::new(&[("Salir", "Exit"), ("Abrir", "Open")]);
        let orchestrator = Orchestrator::new(Arc::new(translator), &options(2));

        let lines = vec![line(0, 0, "Salir"), line(0, 40, "Cerrar"), line(0, 80, "Abrir")];
        let mut seen = Vec::new();
        let delivered = orchestrator
            .translate_streaming(
                TranslationTask::for_region(lines, Region::new(0, 0, 500, 300), display()),
                |annotation| seen.push(annotation.translated),
            )
            .await;

        seen.sort();
        assert_eq!(delivered, 2);
        assert_eq!(seen, vec!["Exit", "Open"]);
    }

    #[tokio::test(start_paused = true)]
    async fn worker_pool_bounds_concurrency() {
        let mut translator = Dictionary::new(&[("one", "uno")]);
        translator.step = Duration::from_millis(10);
        let translator = Arc::new(translator);
        let orchestrator = Orchestrator::new(Arc::clone(&translator), &options(2));

        let lines = (0..8).map(|i| line(0, i * 40, "one")).collect();
        orchestrator
            .translate_batch(TranslationTask::for_region(
                lines,
                Region::new(0, 0, 500, 400),
                display(),
            ))
            .await;

        assert_eq!(translator.calls.load(Ordering::SeqCst), 8);
        assert_eq!(translator.peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let orchestrator = Orchestrator::new(Arc::new(Dictionary::default()), &options(1));
        assert!(orchestrator.translate_batch(Vec::new()).await.is_empty());
        assert_eq!(orchestrator.translate_streaming(Vec::new(), |_| {}).await, 0);
    }
}
