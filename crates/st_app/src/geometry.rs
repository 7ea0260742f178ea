/// Integer point in physical screen pixels (or image-local pixels for OCR output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in physical pixels.
///
/// `right`/`bottom` are exclusive, so `width() == right - left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Region {
    #[inline]
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Construct from an origin and a size. Edges saturate at the `i32` range.
    #[inline]
    pub fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(
            left,
            top,
            left.saturating_add(width),
            top.saturating_add(height),
        )
    }

    /// Construct a normalized rectangle from two points.
    #[inline]
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    /// A `width`×`height` window centered on `center`.
    pub fn centered_at(center: Point, width: i32, height: i32) -> Self {
        let left = center.x.saturating_sub(width / 2);
        let top = center.y.saturating_sub(height / 2);
        Self::from_origin_size(left, top, width, height)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.right.saturating_sub(self.left)
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bottom.saturating_sub(self.top)
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Non-zero width and height. Required before any capture is attempted.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// True if both width and height are strictly greater than `min_size`.
    #[inline]
    pub fn exceeds_min_size(&self, min_size: i32) -> bool {
        self.width() > min_size && self.height() > min_size
    }

    /// Intersection with `other`; `None` when they do not overlap.
    pub fn intersect(&self, other: &Region) -> Option<Region> {
        let r = Region {
            left: self.left.max(other.left),
            top: self.top.max(other.top),
            right: self.right.min(other.right),
            bottom: self.bottom.min(other.bottom),
        };
        r.is_well_formed().then_some(r)
    }

    /// Corners clockwise from top-left.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    /// Smallest region containing all `points`.
    pub fn envelope<'a>(points: impl IntoIterator<Item = &'a Point>) -> Option<Region> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut r = Region::new(first.x, first.y, first.x, first.y);
        for p in iter {
            r.left = r.left.min(p.x);
            r.top = r.top.min(p.y);
            r.right = r.right.max(p.x);
            r.bottom = r.bottom.max(p.y);
        }
        Some(r)
    }
}

/// Primary display description: absolute bounds in physical pixels plus the
/// logical-to-physical scale factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Display {
    pub bounds: Region,
    pub scale_factor: f64,
}

impl Display {
    pub fn new(bounds: Region, scale_factor: f64) -> Self {
        Self {
            bounds,
            scale_factor,
        }
    }

    /// Scale a logical length to physical pixels.
    #[inline]
    pub fn to_physical(&self, logical: u32) -> i32 {
        (f64::from(logical) * self.scale()).round() as i32
    }

    /// Scale a physical coordinate back to logical pixels.
    #[inline]
    pub fn to_logical(&self, physical: i32) -> i32 {
        (f64::from(physical) / self.scale()).round() as i32
    }

    // Guard against a zero/negative factor reported by a broken backend.
    fn scale(&self) -> f64 {
        if self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        }
    }
}
