use st_app::{Point, Region};

/// One raw recognizer output.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Corners in image-local pixels, clockwise from top-left.
    pub quad: [Point; 4],
    pub text: String,
    /// Recognizer confidence in `0.0..=1.0`.
    pub confidence: f32,
}

impl Detection {
    pub fn new(quad: [Point; 4], text: impl Into<String>, confidence: f32) -> Self {
        Self {
            quad,
            text: text.into(),
            confidence,
        }
    }

    /// Axis-aligned detection, for backends that only report rectangles.
    pub fn from_rect(
        x: i32,
        y: i32,
        width: i32,
        height: i32,
        text: impl Into<String>,
        confidence: f32,
    ) -> Self {
        Self::new(
            Region::from_origin_size(x, y, width, height).corners(),
            text,
            confidence,
        )
    }

    #[inline]
    pub fn top_left(&self) -> Point {
        self.quad[0]
    }

    /// Leftmost x over all corners.
    pub fn left(&self) -> i32 {
        self.quad.iter().map(|p| p.x).min().unwrap_or_default()
    }

    /// Rightmost x over all corners.
    pub fn right(&self) -> i32 {
        self.quad.iter().map(|p| p.x).max().unwrap_or_default()
    }
}

/// A group of detections merged into one semantic line.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Member texts joined by single spaces, left to right.
    pub text: String,
    /// Min/max envelope of all member corners.
    pub bounds: Region,
    /// Mean member confidence.
    pub confidence: f32,
    /// Members in left-to-right order.
    pub members: Vec<Detection>,
}
