//! Annotation identity and reconciliation.
//!
//! Annotations are keyed by their source text. Reconciliation is a pure set difference:
//! `remove = previous - next`, `add = next - previous`; keys present in both stay untouched.

use std::collections::BTreeMap;

use crate::geometry::Point;

/// Identity of an annotation within one capture session: the original source text.
pub type AnnotationKey = String;

/// One rendered translation overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    /// Original text; also the identity key.
    pub source: AnnotationKey,
    /// Translated text shown to the user.
    pub translated: String,
    /// Absolute top-left position in logical screen pixels.
    pub position: Point,
    /// Width of the source line's box in logical pixels.
    pub box_width: i32,
}

impl Annotation {
    pub fn key(&self) -> &str {
        &self.source
    }
}

/// Keyed result of one pipeline run.
pub type AnnotationMap = BTreeMap<AnnotationKey, Annotation>;

/// Event consumed by the renderer.
///
/// Renderers must treat a `Remove` for an unknown key as a no-op.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationEvent {
    Add(Annotation),
    Remove(AnnotationKey),
    ClearAll,
}

/// Minimal delta between two annotation sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub remove: Vec<AnnotationKey>,
    pub add: Vec<Annotation>,
}

impl Reconciliation {
    pub fn is_empty(&self) -> bool {
        self.remove.is_empty() && self.add.is_empty()
    }

    /// Removes first, then adds.
    pub fn into_events(self) -> Vec<AnnotationEvent> {
        self.remove
            .into_iter()
            .map(AnnotationEvent::Remove)
            .chain(self.add.into_iter().map(AnnotationEvent::Add))
            .collect()
    }
}

/// Diff `previous` keys against the `next` result mapping.
pub fn reconcile<'a>(
    previous: impl IntoIterator<Item = &'a AnnotationKey>,
    next: &AnnotationMap,
) -> Reconciliation {
    let mut remove = Vec::new();
    let mut kept = std::collections::BTreeSet::new();

    for key in previous {
        if next.contains_key(key) {
            kept.insert(key.as_str());
        } else {
            remove.push(key.clone());
        }
    }

    let add = next
        .values()
        .filter(|a| !kept.contains(a.key()))
        .cloned()
        .collect();

    Reconciliation { remove, add }
}

/// The authoritative set of annotations currently on screen.
///
/// Only the controller model mutates it.
#[derive(Debug, Default)]
pub struct AnnotationSet {
    items: AnnotationMap,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.items.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Annotation> {
        self.items.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &AnnotationKey> {
        self.items.keys()
    }

    /// Insert a single annotation (streaming delivery).
    ///
    /// Returns the add event, or `None` when the key is already shown.
    pub fn insert(&mut self, annotation: Annotation) -> Option<AnnotationEvent> {
        if self.items.contains_key(annotation.key()) {
            return None;
        }
        self.items
            .insert(annotation.source.clone(), annotation.clone());
        Some(AnnotationEvent::Add(annotation))
    }

    /// Replace the set with `next`, returning the delta events (removes before adds).
    pub fn replace(&mut self, next: AnnotationMap) -> Vec<AnnotationEvent> {
        let delta = reconcile(self.items.keys(), &next);
        for key in &delta.remove {
            self.items.remove(key);
        }
        for annotation in &delta.add {
            self.items
                .insert(annotation.source.clone(), annotation.clone());
        }
        delta.into_events()
    }

    /// Empty the set through the reconciler.
    pub fn clear(&mut self) -> Vec<AnnotationEvent> {
        self.replace(AnnotationMap::new())
    }
}

#[cfg(test)]
mod tests {
    use super::{Annotation, AnnotationEvent, AnnotationMap, AnnotationSet, reconcile};
    use crate::geometry::Point;

    fn ann(source: &str, translated: &str) -> Annotation {
        Annotation {
            source: source.to_string(),
            translated: translated.to_string(),
            position: Point::new(0, 0),
            box_width: 10,
        }
    }

    fn map(items: &[(&str, &str)]) -> AnnotationMap {
        items
            .iter()
            .map(|(s, t)| (s.to_string(), ann(s, t)))
            .collect()
    }

    #[test]
    fn keeps_existing_and_adds_new_only() {
        let previous = vec!["Hola".to_string()];
        let next = map(&[("Hola", "Hello"), ("Mundo", "World")]);

        let delta = reconcile(&previous, &next);
        assert!(delta.remove.is_empty());
        assert_eq!(delta.add, vec![ann("Mundo", "World")]);
    }

    #[test]
    fn removes_missing_keys_before_adding() {
        let previous = vec!["a1".to_string(), "b2".to_string()];
        let next = map(&[("b2", "B"), ("c3", "C")]);

        let events = reconcile(&previous, &next).into_events();
        assert_eq!(
            events,
            vec![
                AnnotationEvent::Remove("a1".to_string()),
                AnnotationEvent::Add(ann("c3", "C")),
            ]
        );
    }

    #[test]
    fn delta_is_exact_set_difference() {
        let cases: [(&[&str], &[&str]); 4] = [
            (&[], &[]),
            (&["x", "y"], &[]),
            (&[], &["x", "y"]),
            (&["x", "y", "z"], &["y", "z", "w"]),
        ];

        for (prev, next) in cases {
            let previous: Vec<String> = prev.iter().map(|s| s.to_string()).collect();
            let next_map = map(&next.iter().map(|s| (*s, "t")).collect::<Vec<_>>());
            let delta = reconcile(&previous, &next_map);

            let mut expected_remove: Vec<String> = prev
                .iter()
                .filter(|k| !next.contains(*k))
                .map(|s| s.to_string())
                .collect();
            let mut expected_add: Vec<String> = next
                .iter()
                .filter(|k| !prev.contains(*k))
                .map(|s| s.to_string())
                .collect();
            expected_remove.sort();
            expected_add.sort();

            let mut removed = delta.remove.clone();
            removed.sort();
            let mut added: Vec<String> = delta.add.iter().map(|a| a.source.clone()).collect();
            added.sort();

            assert_eq!(removed, expected_remove);
            assert_eq!(added, expected_add);
            assert!(removed.iter().all(|k| !added.contains(k)));
        }
    }

    #[test]
    fn replace_leaves_stable_keys_untouched() {
        let mut set = AnnotationSet::new();
        set.replace(map(&[("Hola", "Hello")]));

        let events = set.replace(map(&[("Hola", "Hi"), ("Mundo", "World")]));
        assert_eq!(events, vec![AnnotationEvent::Add(ann("Mundo", "World"))]);
        // The existing entry is not re-rendered with the new translation.
        assert_eq!(set.get("Hola").map(|a| a.translated.as_str()), Some("Hello"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn clear_twice_is_idempotent() {
        let mut set = AnnotationSet::new();
        set.replace(map(&[("uno", "one"), ("dos", "two")]));

        let first = set.clear();
        assert_eq!(first.len(), 2);
        assert!(set.is_empty());

        let second = set.clear();
        assert!(second.is_empty());
        assert!(set.is_empty());
    }

    #[test]
    fn insert_ignores_duplicate_key() {
        let mut set = AnnotationSet::new();
        assert!(set.insert(ann("Hola", "Hello")).is_some());
        assert!(set.insert(ann("Hola", "Hi")).is_none());
        assert_eq!(set.get("Hola").map(|a| a.translated.as_str()), Some("Hello"));
    }
}
