use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app::{
    InputState, Key, MouseButton, RenderBackend, Scene, SceneCommand, SceneKey, TEXT_ADVANCE_PX,
};
use crate::math::{Color, Vec2};
use crate::recording::{list_recordings, RecordingEntry};
use crate::sim::SceneWorld;

use super::keyframe::load_keyframes;
use super::playback::Timeline;
use super::reconstruct::Reconstruction;

const BACKGROUND_COLOR: Color = Color::rgb(0.05, 0.2, 0.3);
const TITLE_COLOR: Color = Color::WHITE;
const HIGHLIGHT_TEXT_COLOR: Color = Color::rgb(1.0, 1.0, 0.0);
const DIM_TEXT_COLOR: Color = Color::rgb(0.8, 0.8, 0.8);
const HINT_COLOR: Color = Color::rgb(0.6, 0.6, 0.6);
const ERROR_COLOR: Color = Color::rgb(1.0, 0.0, 0.0);
const EMPTY_LIST_COLOR: Color = Color::rgb(1.0, 0.5, 0.5);
const BUTTON_COLOR: Color = Color::new(0.2, 0.2, 0.3, 0.5);
const BUTTON_SELECTED_COLOR: Color = Color::new(0.4, 0.6, 0.8, 0.9);
const ROW_SELECTED_COLOR: Color = Color::new(0.3, 0.5, 0.7, 0.8);

const BUTTON_WIDTH: f32 = 300.0;
const BUTTON_HEIGHT: f32 = 50.0;
const BUTTON_OFFSET_Y: f32 = 40.0;
const LIST_START_Y: f32 = 100.0;
const LIST_ROW_HEIGHT: f32 = 30.0;

const MENU_ITEMS: [&str; 2] = ["SAVE", "RETURN"];
const MENU_SAVE: usize = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayState {
    SubMenu,
    FileSelect,
    Playing,
}

/// Browses recorded sessions and plays one back by interpolating keyframes.
pub struct ReplayScene {
    state: ReplayState,
    start_path: Option<PathBuf>,
    recordings_dir: PathBuf,
    menu_index: usize,
    files: Option<Vec<RecordingEntry>>,
    file_index: usize,
    current: Option<PathBuf>,
    timeline: Timeline,
    reconstruction: Reconstruction,
    error: Option<String>,
}

impl ReplayScene {
    /// `path` skips the menus and plays that log directly.
    pub fn new(path: Option<PathBuf>, recordings_dir: impl Into<PathBuf>) -> Self {
        Self {
            state: ReplayState::SubMenu,
            start_path: path,
            recordings_dir: recordings_dir.into(),
            menu_index: 0,
            files: None,
            file_index: 0,
            current: None,
            timeline: Timeline::default(),
            reconstruction: Reconstruction::new(),
            error: None,
        }
    }

    pub fn state(&self) -> ReplayState {
        self.state
    }

    pub fn current_recording(&self) -> Option<&Path> {
        self.current.as_deref()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn files(&mut self) -> &[RecordingEntry] {
        let dir = &self.recordings_dir;
        self.files.get_or_insert_with(|| list_recordings(dir))
    }

    fn play(&mut self, path: PathBuf, world: &mut SceneWorld) {
        self.reconstruction.clear();
        world.retain(|_| false);
        self.state = ReplayState::Playing;
        match load_keyframes(&path) {
            Ok(keyframes) => {
                info!(
                    path = %path.display(),
                    keyframes = keyframes.len(),
                    "replay_loaded"
                );
                self.timeline = Timeline::new(keyframes);
                self.error = None;
            }
            Err(error) => {
                warn!(error = %error, "replay_load_failed");
                self.timeline = Timeline::default();
                self.error = Some(error.to_string());
            }
        }
        self.current = Some(path);
    }

    fn update_sub_menu(&mut self, input: &InputState, world: &mut SceneWorld) -> SceneCommand {
        let count = MENU_ITEMS.len();
        if just_pressed_up(input) {
            self.menu_index = (self.menu_index + count - 1) % count;
        }
        if just_pressed_down(input) {
            self.menu_index = (self.menu_index + 1) % count;
        }
        let mut chosen = just_pressed_confirm(input).then_some(self.menu_index);
        if input.is_mouse_button_just_pressed(MouseButton::Left) {
            let center = viewport_center(world);
            let mouse = input.mouse_position();
            chosen = (0..count)
                .find(|&index| button_contains(mouse, center.x, button_center_y(center.y, index)))
                .or(chosen);
        }
        match chosen {
            Some(MENU_SAVE) => {
                self.files();
                self.file_index = 0;
                self.state = ReplayState::FileSelect;
                SceneCommand::None
            }
            // RETURN
            Some(_) => SceneCommand::switch_to(SceneKey::MainMenu),
            None => SceneCommand::None,
        }
    }

    fn update_file_select(&mut self, input: &InputState, world: &mut SceneWorld) {
        let count = self.files().len();
        if count == 0 {
            return;
        }
        if just_pressed_up(input) {
            self.file_index = (self.file_index + count - 1) % count;
        }
        if just_pressed_down(input) {
            self.file_index = (self.file_index + 1) % count;
        }
        let mut chosen = just_pressed_confirm(input).then_some(self.file_index);
        if input.is_mouse_button_just_pressed(MouseButton::Left) {
            let y = input.mouse_position().y;
            chosen = (0..count)
                .find(|&index| {
                    let top = row_top(index);
                    y >= top && y < top + LIST_ROW_HEIGHT
                })
                .or(chosen);
        }
        let path = chosen.and_then(|index| self.files().get(index).map(|entry| entry.path.clone()));
        if let Some(path) = path {
            self.play(path, world);
        }
    }

    fn update_playing(&mut self, dt: f32, world: &mut SceneWorld) {
        let Some(sample) = self.timeline.advance(f64::from(dt)) else {
            return;
        };
        match self
            .reconstruction
            .reconcile(sample.a, sample.b, sample.u, world)
        {
            Ok(_) => {}
            Err(error) => {
                warn!(error = %error, "replay_reconcile_failed");
                self.error = Some(error.to_string());
                self.reconstruction.clear();
                world.retain(|_| false);
            }
        }
        world.remove_inactive();
    }

    fn render_sub_menu(&self, renderer: &mut dyn RenderBackend) {
        let width = renderer.width() as f32;
        let height = renderer.height() as f32;
        let center = Vec2::new(width / 2.0, height / 2.0);

        let title = "REPLAY OPTIONS";
        renderer.draw_text(
            center.x - text_width(title) / 2.0,
            center.y - 120.0,
            title,
            TITLE_COLOR,
        );
        for (index, label) in MENU_ITEMS.iter().enumerate() {
            draw_button(
                renderer,
                label,
                Vec2::new(center.x, button_center_y(center.y, index)),
                index == self.menu_index,
            );
        }
        let hint = "UP/DOWN Select, ENTER Confirm";
        renderer.draw_text(
            center.x - text_width(hint) / 2.0,
            height - 50.0,
            hint,
            HINT_COLOR,
        );
    }

    fn render_file_select(&self, renderer: &mut dyn RenderBackend) {
        let width = renderer.width() as f32;
        let height = renderer.height() as f32;
        renderer.draw_text(20.0, 20.0, "SELECT RECORDING (ESC Back)", TITLE_COLOR);

        let files = self.files.as_deref().unwrap_or_default();
        if files.is_empty() {
            renderer.draw_text(
                width / 2.0 - 100.0,
                height / 2.0,
                "NO FILES FOUND",
                EMPTY_LIST_COLOR,
            );
            return;
        }
        for (index, entry) in files.iter().enumerate() {
            let y = row_top(index);
            if y > height - LIST_ROW_HEIGHT {
                break;
            }
            let name = entry.file_name();
            if index == self.file_index {
                renderer.draw_rect(40.0, y, width - 80.0, LIST_ROW_HEIGHT, ROW_SELECTED_COLOR);
                renderer.draw_text(50.0, y + 5.0, &format!("> {name}"), HIGHLIGHT_TEXT_COLOR);
            } else {
                renderer.draw_text(50.0, y + 5.0, &format!("  {name}"), DIM_TEXT_COLOR);
            }
        }
    }

    fn render_playing(&self, world: &SceneWorld, renderer: &mut dyn RenderBackend) {
        world.render(renderer);
        renderer.draw_text(10.0, 10.0, "PLAYING (ESC to Exit)", HIGHLIGHT_TEXT_COLOR);
        if !self.timeline.is_empty() {
            let clock = format!(
                "{:.2} / {:.2}",
                self.timeline.time(),
                self.timeline.duration()
            );
            renderer.draw_text(10.0, 30.0, &clock, DIM_TEXT_COLOR);
            if self.timeline.is_finished() {
                renderer.draw_text(10.0, 70.0, "END", HIGHLIGHT_TEXT_COLOR);
            }
        }
        if let Some(error) = &self.error {
            renderer.draw_text(10.0, 50.0, "RENDER ERROR", ERROR_COLOR);
            renderer.draw_text(10.0, 90.0, error, HINT_COLOR);
        }
    }
}

impl Scene for ReplayScene {
    fn load(&mut self, world: &mut SceneWorld) {
        self.menu_index = 0;
        match self.start_path.clone() {
            Some(path) => self.play(path, world),
            None => self.state = ReplayState::SubMenu,
        }
    }

    fn update(&mut self, dt: f32, input: &InputState, world: &mut SceneWorld) -> SceneCommand {
        if input.is_key_just_pressed(Key::Escape) {
            return SceneCommand::switch_to(SceneKey::MainMenu);
        }
        match self.state {
            ReplayState::SubMenu => self.update_sub_menu(input, world),
            ReplayState::FileSelect => {
                self.update_file_select(input, world);
                SceneCommand::None
            }
            ReplayState::Playing => {
                self.update_playing(dt, world);
                SceneCommand::None
            }
        }
    }

    fn render(&mut self, world: &SceneWorld, renderer: &mut dyn RenderBackend) {
        let width = renderer.width() as f32;
        let height = renderer.height() as f32;
        renderer.draw_rect(0.0, 0.0, width, height, BACKGROUND_COLOR);
        match self.state {
            ReplayState::SubMenu => self.render_sub_menu(renderer),
            ReplayState::FileSelect => self.render_file_select(renderer),
            ReplayState::Playing => self.render_playing(world, renderer),
        }
    }

    fn unload(&mut self, _world: &mut SceneWorld) {
        self.reconstruction.clear();
        self.files = None;
    }
}

fn just_pressed_up(input: &InputState) -> bool {
    input.is_key_just_pressed(Key::Up) || input.is_key_just_pressed(Key::W)
}

fn just_pressed_down(input: &InputState) -> bool {
    input.is_key_just_pressed(Key::Down) || input.is_key_just_pressed(Key::S)
}

fn just_pressed_confirm(input: &InputState) -> bool {
    input.is_key_just_pressed(Key::Enter) || input.is_key_just_pressed(Key::Space)
}

fn viewport_center(world: &SceneWorld) -> Vec2 {
    let arena = world.arena();
    Vec2::new(arena.width / 2.0, arena.height / 2.0)
}

/// Buttons are stacked `2 * BUTTON_OFFSET_Y` apart, centered on `center_y`.
fn button_center_y(center_y: f32, index: usize) -> f32 {
    center_y - BUTTON_OFFSET_Y + index as f32 * 2.0 * BUTTON_OFFSET_Y
}

fn button_contains(point: Vec2, center_x: f32, center_y: f32) -> bool {
    (point.x - center_x).abs() <= BUTTON_WIDTH / 2.0
        && (point.y - center_y).abs() <= BUTTON_HEIGHT / 2.0
}

fn row_top(index: usize) -> f32 {
    LIST_START_Y + index as f32 * LIST_ROW_HEIGHT
}

fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * TEXT_ADVANCE_PX
}

fn draw_button(renderer: &mut dyn RenderBackend, label: &str, center: Vec2, selected: bool) {
    let x = center.x - BUTTON_WIDTH / 2.0;
    let y = center.y - BUTTON_HEIGHT / 2.0;
    let (fill, text_color) = if selected {
        (BUTTON_SELECTED_COLOR, HIGHLIGHT_TEXT_COLOR)
    } else {
        (BUTTON_COLOR, DIM_TEXT_COLOR)
    };
    renderer.draw_rect(x, y, BUTTON_WIDTH, BUTTON_HEIGHT, fill);
    renderer.draw_text(
        center.x - text_width(label) / 2.0,
        y + 15.0,
        label,
        text_color,
    );
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::app::HeadlessBackend;
    use crate::sim::Arena;

    fn write_log(dir: &Path, name: &str, keyframes: &[serde_json::Value]) -> PathBuf {
        let mut text = json!({"type": "header", "version": 1, "w": 800, "h": 600}).to_string();
        text.push('\n');
        for keyframe in keyframes {
            text.push_str(&keyframe.to_string());
            text.push('\n');
        }
        let path = dir.join(name);
        fs::write(&path, text).expect("write log");
        path
    }

    fn two_keyframe_log(dir: &Path) -> PathBuf {
        write_log(
            dir,
            "session_1.jsonl",
            &[
                json!({"type": "keyframe", "t": 0.0, "entities": [
                    {"uid": 1, "id": "Enemy", "x": 0.0, "y": 0.0}
                ]}),
                json!({"type": "keyframe", "t": 1.0, "entities": [
                    {"uid": 1, "id": "Enemy", "x": 100.0, "y": 0.0}
                ]}),
            ],
        )
    }

    fn world() -> SceneWorld {
        SceneWorld::new("Replay", Arena::default())
    }

    fn x_of_only_entity(world: &SceneWorld) -> f32 {
        assert_eq!(world.entity_count(), 1);
        world.entities()[0].position().expect("position").x
    }

    fn pressed(key: Key) -> InputState {
        let mut input = InputState::default();
        input.set_key(key, true);
        input
    }

    #[test]
    fn explicit_path_plays_and_interpolates() {
        let dir = TempDir::new().expect("temp dir");
        let path = two_keyframe_log(dir.path());
        let mut scene = ReplayScene::new(Some(path.clone()), dir.path());
        let mut world = world();
        let idle = InputState::default();

        scene.load(&mut world);
        assert_eq!(scene.state(), ReplayState::Playing);
        assert_eq!(scene.current_recording(), Some(path.as_path()));

        scene.update(0.5, &idle, &mut world);
        assert_eq!(x_of_only_entity(&world), 50.0);

        scene.update(1.0, &idle, &mut world);
        assert_eq!(x_of_only_entity(&world), 100.0);
        assert!(scene.timeline().is_finished());

        let mut backend = HeadlessBackend::new(800, 600);
        backend.begin_frame();
        scene.render(&world, &mut backend);
        let texts = backend.texts();
        assert!(texts.contains(&"PLAYING (ESC to Exit)"));
        assert!(texts.contains(&"END"));
    }

    #[test]
    fn vanished_uid_is_removed_from_world() {
        let dir = TempDir::new().expect("temp dir");
        let path = write_log(
            dir.path(),
            "session_2.jsonl",
            &[
                json!({"type": "keyframe", "t": 0.0, "entities": [
                    {"uid": 1, "x": 0.0, "y": 0.0}, {"uid": 2, "x": 5.0, "y": 5.0}
                ]}),
                json!({"type": "keyframe", "t": 1.0, "entities": [
                    {"uid": 1, "x": 10.0, "y": 0.0}
                ]}),
                json!({"type": "keyframe", "t": 2.0, "entities": [
                    {"uid": 1, "x": 20.0, "y": 0.0}
                ]}),
            ],
        );
        let mut scene = ReplayScene::new(Some(path), dir.path());
        let mut world = world();
        let idle = InputState::default();
        scene.load(&mut world);

        scene.update(0.5, &idle, &mut world);
        assert_eq!(world.entity_count(), 2);
        scene.update(1.0, &idle, &mut world);
        assert_eq!(x_of_only_entity(&world), 15.0);
    }

    #[test]
    fn missing_log_shows_error_frame() {
        let dir = TempDir::new().expect("temp dir");
        let mut scene = ReplayScene::new(Some(dir.path().join("gone.jsonl")), dir.path());
        let mut world = world();
        scene.load(&mut world);
        scene.update(0.1, &InputState::default(), &mut world);
        assert!(scene.error().is_some());

        let mut backend = HeadlessBackend::new(800, 600);
        backend.begin_frame();
        scene.render(&world, &mut backend);
        assert!(backend.texts().contains(&"RENDER ERROR"));
    }

    #[test]
    fn escape_returns_to_main_menu_from_any_state() {
        let dir = TempDir::new().expect("temp dir");
        let mut scene = ReplayScene::new(None, dir.path());
        let mut world = world();
        scene.load(&mut world);
        assert_eq!(scene.state(), ReplayState::SubMenu);
        assert_eq!(
            scene.update(0.016, &pressed(Key::Escape), &mut world),
            SceneCommand::switch_to(SceneKey::MainMenu)
        );
    }

    #[test]
    fn sub_menu_return_goes_to_main_menu() {
        let dir = TempDir::new().expect("temp dir");
        let mut scene = ReplayScene::new(None, dir.path());
        let mut world = world();
        scene.load(&mut world);
        scene.update(0.016, &pressed(Key::Down), &mut world);
        assert_eq!(
            scene.update(0.016, &pressed(Key::Enter), &mut world),
            SceneCommand::switch_to(SceneKey::MainMenu)
        );
    }

    #[test]
    fn empty_directory_lists_no_files() {
        let dir = TempDir::new().expect("temp dir");
        let mut scene = ReplayScene::new(None, dir.path().join("missing"));
        let mut world = world();
        scene.load(&mut world);
        scene.update(0.016, &pressed(Key::Enter), &mut world);
        assert_eq!(scene.state(), ReplayState::FileSelect);

        let mut backend = HeadlessBackend::new(800, 600);
        backend.begin_frame();
        scene.render(&world, &mut backend);
        assert!(backend.texts().contains(&"NO FILES FOUND"));
    }

    #[test]
    fn file_select_plays_clicked_row() {
        let dir = TempDir::new().expect("temp dir");
        two_keyframe_log(dir.path());
        let mut scene = ReplayScene::new(None, dir.path());
        let mut world = world();
        scene.load(&mut world);

        let mut click = InputState::default();
        click.set_mouse_position(Vec2::new(400.0, 260.0));
        click.set_mouse_button(MouseButton::Left, true);
        scene.update(0.016, &click, &mut world);
        assert_eq!(scene.state(), ReplayState::FileSelect);

        let mut backend = HeadlessBackend::new(800, 600);
        backend.begin_frame();
        scene.render(&world, &mut backend);
        assert!(backend.texts().contains(&"> session_1.jsonl"));

        let mut row = InputState::default();
        row.set_mouse_position(Vec2::new(100.0, 110.0));
        row.set_mouse_button(MouseButton::Left, true);
        scene.update(0.016, &row, &mut world);
        assert_eq!(scene.state(), ReplayState::Playing);
        assert_eq!(scene.timeline().keyframes().len(), 2);
    }
}
