pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

// index = x + y * WIDTH
pub struct FrameBuffer {
    bit_buffer: Vec<bool>,
    dirty: bool,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: vec![false; WIDTH * HEIGHT],
            dirty: false,
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer.fill(false);
        self.dirty = true;
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.bit_buffer[(y % HEIGHT) * WIDTH + (x % WIDTH)]
    }

    pub fn pixels(&self) -> &[bool] {
        &self.bit_buffer
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // MSB first, wraps on both axes; true if a lit pixel went dark
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = (y as usize + i) % HEIGHT;
            for j in 0..8 {
                if (row >> (7 - j)) & 1 == 0 {
                    continue;
                }
                let nx = (x as usize + j) % WIDTH;
                let index = ny * WIDTH + nx;
                if self.bit_buffer[index] {
                    vf = true;
                }
                self.bit_buffer[index] ^= true;
            }
        }
        self.dirty = true;
        vf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOX: [u8; 3] = [0xE0, 0xA0, 0xE0];

    #[test]
    fn paint_into_clear_area_has_no_collision() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.paint(4, 2, &BOX));
        assert!(fb.pixel(4, 2));
        assert!(fb.pixel(6, 2));
        assert!(!fb.pixel(5, 3));
        assert!(fb.consume_dirty());
        assert!(!fb.consume_dirty());
    }

    #[test]
    fn overlap_reports_collision() {
        let mut fb = FrameBuffer::new();
        fb.paint(0, 0, &[0x80]);
        assert!(fb.paint(0, 0, &[0xC0]));
        assert!(!fb.pixel(0, 0));
        assert!(fb.pixel(1, 0));
    }

    #[test]
    fn painting_twice_erases() {
        let mut fb = FrameBuffer::new();
        fb.paint(10, 10, &BOX);
        fb.paint(10, 10, &BOX);
        assert!(fb.pixels().iter().all(|&p| !p));
    }

    #[test]
    fn wraps_horizontally_and_vertically() {
        let mut fb = FrameBuffer::new();
        fb.paint(63, 31, &[0xC0, 0xC0]);
        assert!(fb.pixel(63, 31));
        assert!(fb.pixel(0, 31));
        assert!(fb.pixel(63, 0));
        assert!(fb.pixel(0, 0));
    }

    #[test]
    fn start_coordinates_wrap() {
        let mut fb = FrameBuffer::new();
        fb.paint(64 + 3, 32 + 1, &[0x80]);
        assert!(fb.pixel(3, 1));
    }

    #[test]
    fn clear_marks_dirty() {
        let mut fb = FrameBuffer::new();
        fb.paint(0, 0, &[0xFF]);
        fb.consume_dirty();
        fb.clear_buffer();
        assert!(fb.is_dirty());
        assert!(!fb.pixel(0, 0));
    }
}
