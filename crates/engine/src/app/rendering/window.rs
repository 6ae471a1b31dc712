use std::sync::Arc;
use std::time::Duration;

use pixels::{Pixels, SurfaceTexture};
use thiserror::Error;
use tracing::{info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, MouseButton as WinitMouseButton, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowBuilder};

use crate::app::input::{InputState, Key, MouseButton};
use crate::math::{Color, Vec2};

use super::backend::RenderBackend;
use super::raster::Frame;

const CLEAR_COLOR: [u8; 4] = [0, 0, 0, 255];

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize frame buffer: {0}")]
    CreateFrameBuffer(#[source] pixels::Error),
}

/// Window backed by a winit event loop and a `pixels` frame buffer.
///
/// The frame buffer keeps the arena size; the surface follows the window so
/// resizing scales the picture instead of changing the arena.
pub struct PixelsBackend {
    event_loop: EventLoop<()>,
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    close_requested: bool,
    cleaned_up: bool,
}

impl PixelsBackend {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, BackendError> {
        let event_loop = EventLoop::new().map_err(BackendError::CreateEventLoop)?;
        let window = Arc::new(
            WindowBuilder::new()
                .with_title(title)
                .with_inner_size(LogicalSize::new(width as f64, height as f64))
                .with_resizable(true)
                .build(&event_loop)
                .map_err(BackendError::CreateWindow)?,
        );
        let surface_size = window.inner_size();
        let surface = SurfaceTexture::new(
            surface_size.width.max(1),
            surface_size.height.max(1),
            Arc::clone(&window),
        );
        let pixels =
            Pixels::new(width, height, surface).map_err(BackendError::CreateFrameBuffer)?;
        info!(width, height, "window_created");

        Ok(Self {
            event_loop,
            window,
            pixels,
            width,
            height,
            close_requested: false,
            cleaned_up: false,
        })
    }

    fn frame(&mut self) -> Frame<'_> {
        Frame::new(self.pixels.frame_mut(), self.width, self.height)
    }
}

impl RenderBackend for PixelsBackend {
    fn begin_frame(&mut self) {
        self.frame().clear(CLEAR_COLOR);
    }

    fn end_frame(&mut self) {
        if let Err(error) = self.pixels.render() {
            warn!(error = %error, "renderer_draw_failed");
            self.close_requested = true;
        }
    }

    fn draw_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.frame().fill_rect(x, y, width, height, color.to_rgba8());
    }

    fn draw_circle(&mut self, x: f32, y: f32, radius: f32, _segments: u32, color: Color) {
        self.frame().fill_circle(x, y, radius, color.to_rgba8());
    }

    fn draw_text(&mut self, x: f32, y: f32, text: &str, color: Color) {
        self.frame().draw_text(x, y, text, color.to_rgba8());
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn poll_events(&mut self, input: &mut InputState) {
        let window_id = self.window.id();
        let pixels = &mut self.pixels;
        let close_requested = &mut self.close_requested;
        let status = self
            .event_loop
            .pump_events(Some(Duration::ZERO), |event, window_target| {
                let Event::WindowEvent { window_id: id, event } = event else {
                    return;
                };
                if id != window_id {
                    return;
                }
                match event {
                    WindowEvent::CloseRequested => {
                        info!(reason = "window_close", "shutdown_requested");
                        *close_requested = true;
                        window_target.exit();
                    }
                    WindowEvent::Resized(size) => {
                        if size.width == 0 || size.height == 0 {
                            return;
                        }
                        if let Err(error) = pixels.resize_surface(size.width, size.height) {
                            warn!(error = %error, "renderer_resize_failed");
                            *close_requested = true;
                        }
                    }
                    WindowEvent::Focused(false) => input.release_all(),
                    WindowEvent::KeyboardInput { event, .. } => {
                        if let Some(key) = map_key(event.physical_key) {
                            input.set_key(key, event.state == ElementState::Pressed);
                        }
                    }
                    WindowEvent::MouseInput { state, button, .. } => {
                        if let Some(button) = map_mouse_button(button) {
                            input.set_mouse_button(button, state == ElementState::Pressed);
                        }
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        let (x, y) = pixels
                            .window_pos_to_pixel((position.x as f32, position.y as f32))
                            .unwrap_or_else(|clamped| pixels.clamp_pixel_pos(clamped));
                        input.set_mouse_position(Vec2::new(x as f32, y as f32));
                    }
                    _ => {}
                }
            });
        if let PumpStatus::Exit(code) = status {
            info!(code, "event_loop_exited");
            self.close_requested = true;
        }
    }

    fn should_close(&self) -> bool {
        self.close_requested
    }

    fn cleanup(&mut self) {
        if self.cleaned_up {
            return;
        }
        self.cleaned_up = true;
        self.window.set_visible(false);
        info!("window_closed");
    }
}

fn map_key(key: PhysicalKey) -> Option<Key> {
    let PhysicalKey::Code(code) = key else {
        return None;
    };
    Some(match code {
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Space => Key::Space,
        KeyCode::Escape => Key::Escape,
        _ => return None,
    })
}

fn map_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_and_arrow_keys_map_to_distinct_keys() {
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyW)), Some(Key::W));
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::ArrowUp)), Some(Key::Up));
        assert_eq!(
            map_key(PhysicalKey::Code(KeyCode::NumpadEnter)),
            Some(Key::Enter)
        );
        assert_eq!(map_key(PhysicalKey::Code(KeyCode::KeyQ)), None);
    }

    #[test]
    fn only_left_and_right_buttons_are_tracked() {
        assert_eq!(
            map_mouse_button(WinitMouseButton::Left),
            Some(MouseButton::Left)
        );
        assert_eq!(map_mouse_button(WinitMouseButton::Middle), None);
    }
}
