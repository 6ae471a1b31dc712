use crate::math::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    W,
    A,
    S,
    D,
    Enter,
    Space,
    Escape,
}

const KEY_COUNT: usize = 11;

impl Key {
    pub const ALL: [Key; KEY_COUNT] = [
        Key::Up,
        Key::Down,
        Key::Left,
        Key::Right,
        Key::W,
        Key::A,
        Key::S,
        Key::D,
        Key::Enter,
        Key::Space,
        Key::Escape,
    ];

    const fn index(self) -> usize {
        match self {
            Key::Up => 0,
            Key::Down => 1,
            Key::Left => 2,
            Key::Right => 3,
            Key::W => 4,
            Key::A => 5,
            Key::S => 6,
            Key::D => 7,
            Key::Enter => 8,
            Key::Space => 9,
            Key::Escape => 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
}

const BUTTON_COUNT: usize = 2;

impl MouseButton {
    const fn index(self) -> usize {
        match self {
            MouseButton::Left => 0,
            MouseButton::Right => 1,
        }
    }
}

/// Keyboard and mouse state for one frame.
///
/// Backends write the current state through the setters while polling; the
/// game loop calls [`InputState::update`] once at the end of every frame so
/// that "just pressed" means "down now, up at the end of the previous frame".
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: [bool; KEY_COUNT],
    keys_prev: [bool; KEY_COUNT],
    buttons_down: [bool; BUTTON_COUNT],
    buttons_prev: [bool; BUTTON_COUNT],
    mouse_position: Vec2,
}

impl InputState {
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.keys_down[key.index()]
    }

    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.keys_down[key.index()] && !self.keys_prev[key.index()]
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_down[button.index()]
    }

    pub fn is_mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons_down[button.index()] && !self.buttons_prev[button.index()]
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn set_key(&mut self, key: Key, is_down: bool) {
        self.keys_down[key.index()] = is_down;
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, is_down: bool) {
        self.buttons_down[button.index()] = is_down;
    }

    pub fn set_mouse_position(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    /// Latches the current state as the previous frame's state.
    pub fn update(&mut self) {
        self.keys_prev = self.keys_down;
        self.buttons_prev = self.buttons_down;
    }

    /// Releases everything, e.g. after the window loses focus.
    pub fn release_all(&mut self) {
        self.keys_down = [false; KEY_COUNT];
        self.buttons_down = [false; BUTTON_COUNT];
    }
}
