use rand::Rng;

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Rectangle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rectangle {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn left(&self) -> f32 {
        self.x
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Finite, non-negative width and height.
    pub fn is_valid(&self) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width >= 0.0
            && self.height >= 0.0
    }

    /// Same size, new top-left corner.
    pub fn at(&self, x: f32, y: f32) -> Rectangle {
        Rectangle::new(x, y, self.width, self.height)
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rectangle {
        self.at(self.x + dx, self.y + dy)
    }

    // Edges count as inside.
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.left() && x <= self.right() && y >= self.top() && y <= self.bottom()
    }

    // Check that `other` lies fully inside this rectangle, edges included.
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        self.left() <= other.left()
            && self.right() >= other.right()
            && self.top() <= other.top()
            && self.bottom() >= other.bottom()
    }

    /// Inclusive intersection test: rectangles that only share an edge intersect.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        !(self.left() > other.right()
            || self.right() < other.left()
            || self.top() > other.bottom()
            || self.bottom() < other.top())
    }

    /// Strict overlap test: the shared area must be non-empty.
    pub fn overlaps(&self, other: &Rectangle) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Split into four equal quadrants in NW, NE, SW, SE order.
    pub fn quadrants(&self) -> [Rectangle; 4] {
        let half_width = self.width / 2.0;
        let half_height = self.height / 2.0;
        let mid_x = self.x + half_width;
        let mid_y = self.y + half_height;
        [
            Rectangle::new(self.x, self.y, half_width, half_height),
            Rectangle::new(mid_x, self.y, half_width, half_height),
            Rectangle::new(self.x, mid_y, half_width, half_height),
            Rectangle::new(mid_x, mid_y, half_width, half_height),
        ]
    }

    /// Random rectangle of the given size lying fully inside this one.
    pub fn get_random_rect_inside<R: Rng>(&self, width: f32, height: f32, rng: &mut R) -> Rectangle {
        Rectangle::new(
            self._safe_randf32(rng, self.left(), self.right() - width),
            self._safe_randf32(rng, self.top(), self.bottom() - height),
            width,
            height,
        )
    }

    fn _safe_randf32<R: Rng>(&self, rng: &mut R, min: f32, max: f32) -> f32 {
        if min > max {
            return min;
        }
        rng.gen_range(min..=max)
    }
}
