use finch_core::{
    display::{Display, RefreshMode},
    framebuffer::{HEIGHT, ScreenBuffers, WIDTH},
    input::{Button, ButtonState},
};

/// Window size matches the portrait orientation the application renders in.
pub const LOGICAL_WIDTH: usize = HEIGHT;
pub const LOGICAL_HEIGHT: usize = WIDTH;

/// Simulated e-paper panel in a minifb window.
///
/// Keys: arrows navigate, Enter confirms, Backspace is Back, P is the
/// power button, Escape closes the window.
pub struct MinifbDisplay {
    window: minifb::Window,
    buttons: ButtonState,
    frame: Vec<u32>,
}

impl MinifbDisplay {
    pub fn new(mut window: minifb::Window) -> Self {
        window.set_target_fps(60);
        Self {
            window,
            buttons: ButtonState::new(),
            frame: vec![0xFFFFFFFF; LOGICAL_WIDTH * LOGICAL_HEIGHT],
        }
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(minifb::Key::Escape)
    }

    pub fn update(&mut self, elapsed_ms: u32) {
        self.window.update();
        let mut mask = 0u8;
        if self.window.is_key_down(minifb::Key::Left) {
            mask |= 1 << (Button::Left as u8);
        }
        if self.window.is_key_down(minifb::Key::Right) {
            mask |= 1 << (Button::Right as u8);
        }
        if self.window.is_key_down(minifb::Key::Up) {
            mask |= 1 << (Button::Up as u8);
        }
        if self.window.is_key_down(minifb::Key::Down) {
            mask |= 1 << (Button::Down as u8);
        }
        if self.window.is_key_down(minifb::Key::Enter) {
            mask |= 1 << (Button::Confirm as u8);
        }
        if self.window.is_key_down(minifb::Key::Backspace) {
            mask |= 1 << (Button::Back as u8);
        }
        if self.window.is_key_down(minifb::Key::P) {
            mask |= 1 << (Button::Power as u8);
        }
        self.buttons.update(mask, elapsed_ms);
    }

    pub fn buttons(&self) -> &ButtonState {
        &self.buttons
    }
}

impl Display for MinifbDisplay {
    fn flush(&mut self, buffers: &mut ScreenBuffers, _mode: RefreshMode) {
        // The panel stores pixels in landscape; the UI draws rotated 90°
        // clockwise, so undo that here to show the portrait frame upright.
        let plane = buffers.active();
        for y in 0..LOGICAL_HEIGHT {
            for x in 0..LOGICAL_WIDTH {
                let index = (HEIGHT - 1 - x) * WIDTH + y;
                let white = plane[index / 8] & (1 << (7 - index % 8)) != 0;
                self.frame[y * LOGICAL_WIDTH + x] =
                    if white { 0xFFFFFFFF } else { 0xFF000000 };
            }
        }
        self.window
            .update_with_buffer(&self.frame, LOGICAL_WIDTH, LOGICAL_HEIGHT)
            .unwrap();
        buffers.copy_active_to_previous();
    }
}
