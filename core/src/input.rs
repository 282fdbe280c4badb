//! Button sampling and the logical navigation events derived from it.

/// Logical buttons after the front-button layout remap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Button {
    Back,
    Confirm,
    Left,
    Right,
    Up,
    Down,
    Power,
}

/// Order of the four front keys, user-configurable in settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ButtonLayout {
    BackConfirmLeftRight,
    LeftRightBackConfirm,
    LeftBackConfirmRight,
    BackConfirmRightLeft,
}

impl ButtonLayout {
    pub fn from_index(index: u8) -> Self {
        match index {
            1 => ButtonLayout::LeftRightBackConfirm,
            2 => ButtonLayout::LeftBackConfirmRight,
            3 => ButtonLayout::BackConfirmRightLeft,
            _ => ButtonLayout::BackConfirmLeftRight,
        }
    }

    fn roles(self) -> [Button; 4] {
        match self {
            ButtonLayout::BackConfirmLeftRight => {
                [Button::Back, Button::Confirm, Button::Left, Button::Right]
            }
            ButtonLayout::LeftRightBackConfirm => {
                [Button::Left, Button::Right, Button::Back, Button::Confirm]
            }
            ButtonLayout::LeftBackConfirmRight => {
                [Button::Left, Button::Back, Button::Confirm, Button::Right]
            }
            ButtonLayout::BackConfirmRightLeft => {
                [Button::Back, Button::Confirm, Button::Right, Button::Left]
            }
        }
    }
}

/// Builds the logical bitmask for one sample. `front` holds the four front
/// keys in physical order, remapped through `layout`.
pub fn logical_mask(layout: ButtonLayout, front: [bool; 4], up: bool, down: bool, power: bool) -> u8 {
    let mut mask = 0u8;
    for (pressed, role) in front.into_iter().zip(layout.roles()) {
        if pressed {
            mask |= 1 << role as u8;
        }
    }
    if up {
        mask |= 1 << Button::Up as u8;
    }
    if down {
        mask |= 1 << Button::Down as u8;
    }
    if power {
        mask |= 1 << Button::Power as u8;
    }
    mask
}

/// Debounced button sample pair with edge queries and hold duration.
#[derive(Clone, Copy, Default)]
pub struct ButtonState {
    current: u8,
    previous: u8,
    held_ms: u32,
}

impl ButtonState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, current: u8, elapsed_ms: u32) {
        self.previous = self.current;
        if current != 0 {
            if current == self.current {
                self.held_ms = self.held_ms.saturating_add(elapsed_ms);
            } else {
                self.held_ms = 0;
            }
        }
        // Releases keep the accumulated time so release handlers can still
        // read how long the press lasted.
        self.current = current;
    }

    fn mask(button: Button) -> u8 {
        1 << button as u8
    }

    pub fn is_down(&self, button: Button) -> bool {
        self.current & Self::mask(button) != 0
    }

    pub fn is_pressed(&self, button: Button) -> bool {
        (self.current & !self.previous) & Self::mask(button) != 0
    }

    pub fn is_released(&self, button: Button) -> bool {
        (!self.current & self.previous) & Self::mask(button) != 0
    }

    pub fn is_held(&self, button: Button) -> bool {
        (self.current & self.previous) & Self::mask(button) != 0
    }

    /// Time the current combination has been held. A release keeps the
    /// accumulated value until the next press.
    pub fn held_ms(&self) -> u32 {
        self.held_ms
    }

    pub fn any_activity(&self) -> bool {
        self.current != 0 || self.previous != 0
    }
}

/// Direction-normalized events: Up and Left both mean `Previous`, Down and
/// Right both mean `Next`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEvent {
    Previous,
    Next,
    Confirm,
    Back,
}

/// Event for this frame's press edges, if any.
pub fn nav_pressed(buttons: &ButtonState) -> Option<NavEvent> {
    if buttons.is_pressed(Button::Up) || buttons.is_pressed(Button::Left) {
        Some(NavEvent::Previous)
    } else if buttons.is_pressed(Button::Down) || buttons.is_pressed(Button::Right) {
        Some(NavEvent::Next)
    } else if buttons.is_pressed(Button::Confirm) {
        Some(NavEvent::Confirm)
    } else if buttons.is_pressed(Button::Back) {
        Some(NavEvent::Back)
    } else {
        None
    }
}

/// Event for this frame's release edges; used where hold duration matters
/// (page skip, long-press back), since the duration is only known then.
pub fn nav_released(buttons: &ButtonState) -> Option<NavEvent> {
    if buttons.is_released(Button::Up) || buttons.is_released(Button::Left) {
        Some(NavEvent::Previous)
    } else if buttons.is_released(Button::Down) || buttons.is_released(Button::Right) {
        Some(NavEvent::Next)
    } else if buttons.is_released(Button::Confirm) {
        Some(NavEvent::Confirm)
    } else if buttons.is_released(Button::Back) {
        Some(NavEvent::Back)
    } else {
        None
    }
}
