use ndarray::ArrayView3;

/// A single decoded video frame or still image: contiguous RGB bytes in
/// row-major order, tagged with its index in the source stream.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn area(&self) -> f64 {
        self.width as f64 * self.height as f64
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Returns a copy resized by `factor` on both axes (bilinear), keeping the index.
    ///
    /// A factor of 1.0 (or a non-RGB frame) returns an unscaled clone.
    pub fn scaled(&self, factor: f64) -> Frame {
        let new_w = ((self.width as f64 * factor).round() as u32).max(1);
        let new_h = ((self.height as f64 * factor).round() as u32).max(1);
        if (new_w == self.width && new_h == self.height) || self.channels != 3 {
            return self.clone();
        }
        let Some(img) = image::RgbImage::from_raw(self.width, self.height, self.data.clone())
        else {
            return self.clone();
        };
        let resized =
            image::imageops::resize(&img, new_w, new_h, image::imageops::FilterType::Triangle);
        Frame::new(resized.into_raw(), new_w, new_h, 3, self.index)
    }

    /// Copies out the pixels inside `[x1, y1, x2, y2)`, clamped to the frame.
    ///
    /// Returns `None` when the clamped rectangle is empty.
    pub fn crop(&self, x1: i64, y1: i64, x2: i64, y2: i64) -> Option<Frame> {
        let x1 = x1.clamp(0, self.width as i64) as usize;
        let y1 = y1.clamp(0, self.height as i64) as usize;
        let x2 = x2.clamp(0, self.width as i64) as usize;
        let y2 = y2.clamp(0, self.height as i64) as usize;
        if x2 <= x1 || y2 <= y1 {
            return None;
        }

        let channels = self.channels as usize;
        let row_len = self.width as usize * channels;
        let mut data = Vec::with_capacity((x2 - x1) * (y2 - y1) * channels);
        for row in y1..y2 {
            let start = row * row_len + x1 * channels;
            let end = row * row_len + x2 * channels;
            data.extend_from_slice(&self.data[start..end]);
        }
        Some(Frame::new(
            data,
            (x2 - x1) as u32,
            (y2 - y1) as u32,
            self.channels,
            self.index,
        ))
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
