/// Axis-aligned face box in frame pixel coordinates (`x2`/`y2` exclusive).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub confidence: f64,
}

impl BoundingBox {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64, confidence: f64) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
        }
    }

    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Fraction of a `frame_width` x `frame_height` frame covered by this box,
    /// after clipping the box to the frame.
    pub fn area_ratio(&self, frame_width: u32, frame_height: u32) -> f64 {
        let frame_area = frame_width as f64 * frame_height as f64;
        if frame_area <= 0.0 {
            return 0.0;
        }
        self.clamped(frame_width, frame_height).area() / frame_area
    }

    pub fn clamped(&self, frame_width: u32, frame_height: u32) -> BoundingBox {
        let fw = frame_width as f64;
        let fh = frame_height as f64;
        BoundingBox {
            x1: self.x1.clamp(0.0, fw),
            y1: self.y1.clamp(0.0, fh),
            x2: self.x2.clamp(0.0, fw),
            y2: self.y2.clamp(0.0, fh),
            confidence: self.confidence,
        }
    }

    pub fn iou(&self, other: &BoundingBox) -> f64 {
        let ix1 = self.x1.max(other.x1);
        let iy1 = self.y1.max(other.y1);
        let ix2 = self.x2.min(other.x2);
        let iy2 = self.y2.min(other.y2);

        let inter = (ix2 - ix1).max(0.0) * (iy2 - iy1).max(0.0);
        if inter == 0.0 {
            return 0.0;
        }
        inter / (self.area() + other.area() - inter)
    }
}
