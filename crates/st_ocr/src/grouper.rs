//! Spatial grouping of OCR fragments into text lines.
//!
//! Recognizers emit word or sub-word fragments. Fragments are sorted top-to-bottom then
//! left-to-right and chained into a line while each next fragment sits on (almost) the same
//! baseline and starts a short, positive distance after the previous one ends. Thresholds are
//! heuristics and come from configuration.

use st_app::Region;

use crate::types::{Detection, TextLine};

/// Grouping thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupingParams {
    /// Detections below this confidence are dropped before grouping.
    pub confidence_floor: f32,
    /// Maximum top-left Y offset between consecutive members (exclusive).
    pub vertical_tolerance: i32,
    /// Maximum horizontal gap between consecutive members (exclusive).
    pub gap_tolerance: i32,
    /// Lines with fewer trimmed characters are noise.
    pub min_chars: usize,
}

impl Default for GroupingParams {
    fn default() -> Self {
        Self {
            confidence_floor: 0.3,
            vertical_tolerance: 10,
            gap_tolerance: 30,
            min_chars: 2,
        }
    }
}

/// Same-line adjacency between the last member of a line and the next candidate.
///
/// A zero or negative gap means overlap (likely recognizer noise) and never joins.
pub fn is_same_line(prev: &Detection, next: &Detection, params: &GroupingParams) -> bool {
    let dy = (next.top_left().y - prev.top_left().y).abs();
    let gap = next.left() - prev.right();
    dy < params.vertical_tolerance && gap > 0 && gap < params.gap_tolerance
}

/// True for text that is near-certainly OCR noise: too short, or digits only.
pub fn is_noise(text: &str, min_chars: usize) -> bool {
    let text = text.trim();
    text.chars().count() < min_chars
        || text
            .chars()
            .filter(|c| !c.is_whitespace())
            .all(char::is_numeric)
}

/// Group `detections` into lines in reading order.
pub fn group_lines(detections: &[Detection], params: &GroupingParams) -> Vec<TextLine> {
    let mut sorted: Vec<&Detection> = detections
        .iter()
        .filter(|d| d.confidence >= params.confidence_floor && !d.text.trim().is_empty())
        .collect();
    sorted.sort_by_key(|d| (d.top_left().y, d.top_left().x));

    let mut chains: Vec<Vec<&Detection>> = Vec::new();
    for detection in sorted {
        match chains.last_mut() {
            Some(chain)
                if chain
                    .last()
                    .is_some_and(|prev| is_same_line(prev, detection, params)) =>
            {
                chain.push(detection)
            }
            _ => chains.push(vec![detection]),
        }
    }

    chains
        .into_iter()
        .filter_map(|chain| build_line(chain, params))
        .collect()
}

fn build_line(mut members: Vec<&Detection>, params: &GroupingParams) -> Option<TextLine> {
    members.sort_by_key(|d| d.left());

    let text = members
        .iter()
        .map(|d| d.text.trim())
        .collect::<Vec<_>>()
        .join(" ");
    if is_noise(&text, params.min_chars) {
        log::trace!("dropping noise line {text:?}");
        return None;
    }

    let bounds = Region::envelope(members.iter().flat_map(|d| d.quad.iter()))?;
    let confidence = members.iter().map(|d| d.confidence).sum::<f32>() / members.len() as f32;

    Some(TextLine {
        text,
        bounds,
        confidence,
        members: members.into_iter().cloned().collect(),
    })
}
