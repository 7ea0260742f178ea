use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io::{self, Write};

use st_app::{AnnotationEvent, AnnotationKey, Region};
use st_host::Renderer;

/// Prints annotation events as tab-separated lines:
///
/// ```text
/// add     <source>  <translated>  <x>,<y>  <width>
/// remove  <source>
/// clear
/// select  <left>,<top>,<right>,<bottom> | none
/// ```
///
/// Text fields escape backslash, tab, newline and carriage return as `\\`, `\t`, `\n` and `\r`,
/// so every event stays on one line. Removes for keys that are not on screen are ignored.
pub struct ConsoleRenderer<W> {
    out: W,
    shown: BTreeSet<AnnotationKey>,
}

impl ConsoleRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ConsoleRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown: BTreeSet::new(),
        }
    }

    pub fn shown(&self) -> impl Iterator<Item = &str> {
        self.shown.iter().map(String::as_str)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            log::warn!("cannot write annotation output: {e}");
        }
    }
}

impl<W: Write + Send> Renderer for ConsoleRenderer<W> {
    fn apply(&mut self, event: AnnotationEvent) {
        match event {
            AnnotationEvent::Add(a) => {
                self.emit(format_args!(
                    "add\t{}\t{}\t{},{}\t{}",
                    escape(&a.source),
                    escape(&a.translated),
                    a.position.x,
                    a.position.y,
                    a.box_width
                ));
                self.shown.insert(a.source);
            }
            AnnotationEvent::Remove(key) => {
                if self.shown.remove(&key) {
                    self.emit(format_args!("remove\t{}", escape(&key)));
                }
            }
            AnnotationEvent::ClearAll => {
                self.shown.clear();
                self.emit(format_args!("clear"));
            }
        }
    }

    fn show_selection(&mut self, selection: Option<Region>) {
        match selection {
            Some(r) => self.emit(format_args!(
                "select\t{},{},{},{}",
                r.left, r.top, r.right, r.bottom
            )),
            None => self.emit(format_args!("select\tnone")),
        }
    }

    fn set_pointer_tracking(&mut self, enabled: bool) {
        log::debug!("pointer tracking {}", if enabled { "on" } else { "off" });
    }
}

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['\\', '\t', '\n', '\r']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 4);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
