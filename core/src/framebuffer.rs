use embedded_graphics::{
    Pixel,
    pixelcolor::BinaryColor,
    prelude::{DrawTarget, OriginDimensions, Size},
};

pub const WIDTH: usize = 800;
pub const HEIGHT: usize = 480;
pub const BUFFER_SIZE: usize = WIDTH * HEIGHT / 8;

/// Panel orientation applied when plotting pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    /// Landscape, 800x480
    Rotate0,
    /// 90° clockwise (portrait, 480x800)
    Rotate90,
    /// Landscape upside-down
    Rotate180,
    /// 270° clockwise (portrait, 480x800)
    Rotate270,
}

/// Two 1-bpp planes: the active plane receives draw calls, the other holds
/// the last flushed frame so displays can refresh differentially.
pub struct ScreenBuffers {
    active: [u8; BUFFER_SIZE],
    previous: [u8; BUFFER_SIZE],
    rotation: Rotation,
}

impl ScreenBuffers {
    pub fn new() -> Self {
        // 1 = white; panels boot to a white screen
        Self {
            active: [0xFF; BUFFER_SIZE],
            previous: [0xFF; BUFFER_SIZE],
            rotation: Rotation::Rotate0,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    pub fn active(&self) -> &[u8; BUFFER_SIZE] {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut [u8; BUFFER_SIZE] {
        &mut self.active
    }

    pub fn previous(&self) -> &[u8; BUFFER_SIZE] {
        &self.previous
    }

    pub fn copy_active_to_previous(&mut self) {
        self.previous.copy_from_slice(&self.active);
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, color: BinaryColor) {
        let size = self.size();
        if x < 0 || y < 0 || x as u32 >= size.width || y as u32 >= size.height {
            return;
        }
        let (px, py) = match self.rotation {
            Rotation::Rotate0 => (x as usize, y as usize),
            Rotation::Rotate90 => (y as usize, HEIGHT - 1 - x as usize),
            Rotation::Rotate180 => (WIDTH - 1 - x as usize, HEIGHT - 1 - y as usize),
            Rotation::Rotate270 => (WIDTH - 1 - y as usize, x as usize),
        };
        let index = py * WIDTH + px;
        let byte = index / 8;
        let bit = 7 - (index % 8);
        match color {
            BinaryColor::On => self.active_mut()[byte] |= 1 << bit,
            BinaryColor::Off => self.active_mut()[byte] &= !(1 << bit),
        }
    }
}

impl Default for ScreenBuffers {
    fn default() -> Self {
        Self::new()
    }
}

impl OriginDimensions for ScreenBuffers {
    fn size(&self) -> Size {
        match self.rotation {
            Rotation::Rotate0 | Rotation::Rotate180 => Size::new(WIDTH as u32, HEIGHT as u32),
            Rotation::Rotate90 | Rotation::Rotate270 => Size::new(HEIGHT as u32, WIDTH as u32),
        }
    }
}

impl DrawTarget for ScreenBuffers {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }
}
