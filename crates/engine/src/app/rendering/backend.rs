use std::fmt;

use crate::app::input::InputState;
use crate::math::Color;

/// Immediate-mode drawing surface plus the window's event source.
///
/// Coordinates are in arena pixels with the origin at the top-left corner.
pub trait RenderBackend {
    fn begin_frame(&mut self);
    fn end_frame(&mut self);
    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color);
    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, segments: u32, color: Color);
    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color);
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn poll_events(&mut self, input: &mut InputState);
    fn should_close(&self) -> bool;
    fn cleanup(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    BeginFrame,
    EndFrame,
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Color,
    },
    Circle {
        x: f32,
        y: f32,
        radius: f32,
        segments: u32,
        color: Color,
    },
    Text {
        x: f32,
        y: f32,
        text: String,
        color: Color,
    },
}

impl DrawCommand {
    pub fn rect_origin(&self) -> Option<(f32, f32)> {
        match self {
            DrawCommand::Rect { x, y, .. } => Some((*x, *y)),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            DrawCommand::Text { text, .. } => Some(text),
            _ => None,
        }
    }
}

/// Windowless backend that records every call.
///
/// `begin_frame` drops the previous frame's commands, so after a frame the
/// log holds exactly what that frame drew. Closing can be scripted after a
/// number of polls, and input can be scripted per poll.
#[derive(Default)]
pub struct HeadlessBackend {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    frames: u64,
    polls: u64,
    close_after_polls: Option<u64>,
    close_requested: bool,
    cleanup_calls: u32,
    scripted_input: Vec<Box<dyn FnMut(u64, &mut InputState)>>,
}

impl fmt::Debug for HeadlessBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessBackend")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("commands", &self.commands.len())
            .field("frames", &self.frames)
            .field("polls", &self.polls)
            .field("close_requested", &self.close_requested)
            .finish_non_exhaustive()
    }
}

impl HeadlessBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn close_after_polls(mut self, polls: u64) -> Self {
        self.close_after_polls = Some(polls);
        self
    }

    /// Registers a hook run on every poll with the 1-based poll number.
    pub fn with_input_script(
        mut self,
        script: impl FnMut(u64, &mut InputState) + 'static,
    ) -> Self {
        self.scripted_input.push(Box::new(script));
        self
    }

    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn texts(&self) -> Vec<&str> {
        self.commands.iter().filter_map(DrawCommand::text).collect()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn polls(&self) -> u64 {
        self.polls
    }

    pub fn cleanup_calls(&self) -> u32 {
        self.cleanup_calls
    }
}

impl RenderBackend for HeadlessBackend {
    fn begin_frame(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::BeginFrame);
    }

    fn end_frame(&mut self) {
        self.frames = self.frames.saturating_add(1);
        self.commands.push(DrawCommand::EndFrame);
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, segments: u32, color: Color) {
        self.commands.push(DrawCommand::Circle {
            x,
            y,
            radius,
            segments,
            color,
        });
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            text: text.to_string(),
            color,
        });
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn poll_events(&mut self, input: &mut InputState) {
        self.polls = self.polls.saturating_add(1);
        let poll = self.polls;
        for script in &mut self.scripted_input {
            script(poll, input);
        }
        if self.close_after_polls.is_some_and(|limit| poll >= limit) {
            self.close_requested = true;
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn cleanup(&mut self) {
        self.cleanup_calls = self.cleanup_calls.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Key;

    #[test]
    fn begin_frame_resets_command_log() {
        let mut backend = HeadlessBackend::new(800, 600);
        backend.begin_frame();
        backend.draw_rect(1.0, 2.0, 3.0, 4.0, Color::WHITE);
        backend.end_frame();
        backend.begin_frame();
        backend.draw_text(0.0, 0.0, "HI", Color::WHITE);
        backend.end_frame();

        assert_eq!(backend.frames(), 2);
        assert_eq!(backend.texts(), vec!["HI"]);
        assert!(backend.commands().iter().all(|c| c.rect_origin().is_none()));
    }

    #[test]
    fn scripted_close_and_input_follow_poll_count() {
        let mut backend = HeadlessBackend::new(800, 600)
            .close_after_polls(2)
            .with_input_script(|poll, input| input.set_key(Key::Enter, poll == 1));
        let mut input = InputState::default();

        backend.poll_events(&mut input);
        assert!(input.is_key_pressed(Key::Enter));
        assert!(!backend.should_close());

        backend.poll_events(&mut input);
        assert!(!input.is_key_pressed(Key::Enter));
        assert!(backend.should_close());
    }
}
