use engine::{
    Color, InputState, Key, MouseButton, RecordingPolicy, RenderBackend, Scene, SceneCommand,
    SceneKey, SceneWorld, Vec2, TEXT_ADVANCE_PX,
};
use tracing::info;

const BACKGROUND_COLOR: Color = Color::rgb(0.08, 0.08, 0.12);
const TITLE_COLOR: Color = Color::rgb(1.0, 0.6, 0.1);
const BUTTON_COLOR: Color = Color::new(0.2, 0.2, 0.3, 0.5);
const BUTTON_SELECTED_COLOR: Color = Color::new(0.4, 0.6, 0.8, 0.9);
const TEXT_COLOR: Color = Color::rgb(0.8, 0.8, 0.8);
const SELECTED_TEXT_COLOR: Color = Color::rgb(1.0, 1.0, 0.0);
const HINT_COLOR: Color = Color::rgb(0.6, 0.6, 0.6);

const TITLE: &str = "EMBER ARENA";
const HINT: &str = "UP/DOWN Select, ENTER Confirm, ESC Quit";
const BUTTON_WIDTH: f32 = 300.0;
const BUTTON_HEIGHT: f32 = 50.0;
const BUTTON_SPACING: f32 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    StartGame,
    Replay,
    Exit,
}

impl MenuItem {
    const ALL: [MenuItem; 3] = [MenuItem::StartGame, MenuItem::Replay, MenuItem::Exit];

    fn label(self) -> &'static str {
        match self {
            MenuItem::StartGame => "START GAME",
            MenuItem::Replay => "REPLAY",
            MenuItem::Exit => "EXIT",
        }
    }

    fn command(self) -> SceneCommand {
        match self {
            MenuItem::StartGame => SceneCommand::SwitchTo {
                key: SceneKey::Game,
                recording: RecordingPolicy::Start,
            },
            MenuItem::Replay => SceneCommand::switch_to(SceneKey::Replay(None)),
            MenuItem::Exit => SceneCommand::Quit,
        }
    }
}

/// Title screen: start a recorded game, browse replays or quit.
#[derive(Debug, Default)]
pub(crate) struct MenuScene {
    selected: usize,
}

impl MenuScene {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

fn button_center(viewport: Vec2, index: usize) -> Vec2 {
    let count = MenuItem::ALL.len() as f32;
    let first = viewport.y / 2.0 - (count - 1.0) * BUTTON_SPACING / 2.0;
    Vec2::new(viewport.x / 2.0, first + index as f32 * BUTTON_SPACING)
}

fn button_contains(center: Vec2, point: Vec2) -> bool {
    (point.x - center.x).abs() <= BUTTON_WIDTH / 2.0
        && (point.y - center.y).abs() <= BUTTON_HEIGHT / 2.0
}

fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * TEXT_ADVANCE_PX
}

impl Scene for MenuScene {
    fn load(&mut self, _world: &mut SceneWorld) {
        self.selected = 0;
    }

    fn update(&mut self, _dt: f32, input: &InputState, world: &mut SceneWorld) -> SceneCommand {
        if input.is_key_just_pressed(Key::Escape) {
            return SceneCommand::Quit;
        }
        let count = MenuItem::ALL.len();
        if input.is_key_just_pressed(Key::Up) || input.is_key_just_pressed(Key::W) {
            self.selected = (self.selected + count - 1) % count;
        }
        if input.is_key_just_pressed(Key::Down) || input.is_key_just_pressed(Key::S) {
            self.selected = (self.selected + 1) % count;
        }

        let mut chosen = None;
        if input.is_key_just_pressed(Key::Enter) || input.is_key_just_pressed(Key::Space) {
            chosen = Some(MenuItem::ALL[self.selected]);
        }
        if input.is_mouse_button_just_pressed(MouseButton::Left) {
            let arena = world.arena();
            let viewport = Vec2::new(arena.width, arena.height);
            let mouse = input.mouse_position();
            if let Some(index) = (0..count)
                .find(|&index| button_contains(button_center(viewport, index), mouse))
            {
                self.selected = index;
                chosen = Some(MenuItem::ALL[index]);
            }
        }

        match chosen {
            Some(item) => {
                info!(item = item.label(), "menu_selected");
                item.command()
            }
            None => SceneCommand::None,
        }
    }

    fn render(&mut self, _world: &SceneWorld, renderer: &mut dyn RenderBackend) {
        let viewport = Vec2::new(renderer.width() as f32, renderer.height() as f32);
        renderer.draw_rect(0.0, 0.0, viewport.x, viewport.y, BACKGROUND_COLOR);
        renderer.draw_text(
            (viewport.x - text_width(TITLE)) / 2.0,
            viewport.y / 4.0,
            TITLE,
            TITLE_COLOR,
        );

        for (index, item) in MenuItem::ALL.iter().enumerate() {
            let center = button_center(viewport, index);
            let selected = index == self.selected;
            let (fill, text_color) = if selected {
                (BUTTON_SELECTED_COLOR, SELECTED_TEXT_COLOR)
            } else {
                (BUTTON_COLOR, TEXT_COLOR)
            };
            renderer.draw_rect(
                center.x - BUTTON_WIDTH / 2.0,
                center.y - BUTTON_HEIGHT / 2.0,
                BUTTON_WIDTH,
                BUTTON_HEIGHT,
                fill,
            );
            let label = item.label();
            renderer.draw_text(
                center.x - text_width(label) / 2.0,
                center.y - 5.0,
                label,
                text_color,
            );
        }

        renderer.draw_text(
            (viewport.x - text_width(HINT)) / 2.0,
            viewport.y - 50.0,
            HINT,
            HINT_COLOR,
        );
    }
}

#[cfg(test)]
mod tests {
    use engine::{Arena, HeadlessBackend};

    use super::*;

    fn world() -> SceneWorld {
        SceneWorld::new("MainMenu", Arena::default())
    }

    fn pressed(keys: &[Key]) -> InputState {
        let mut input = InputState::default();
        for key in keys {
            input.set_key(*key, true);
        }
        input
    }

    #[test]
    fn enter_on_first_item_starts_a_recorded_game() {
        let mut menu = MenuScene::new();
        let mut world = world();
        menu.load(&mut world);
        assert_eq!(
            menu.update(0.016, &pressed(&[Key::Enter]), &mut world),
            SceneCommand::SwitchTo {
                key: SceneKey::Game,
                recording: RecordingPolicy::Start,
            }
        );
    }

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut menu = MenuScene::new();
        let mut world = world();
        menu.update(0.016, &pressed(&[Key::Up]), &mut world);
        assert_eq!(menu.selected, 2);
        menu.update(0.016, &pressed(&[Key::S]), &mut world);
        assert_eq!(menu.selected, 0);
        menu.update(0.016, &pressed(&[Key::Down]), &mut world);
        assert_eq!(
            menu.update(0.016, &pressed(&[Key::Space]), &mut world),
            SceneCommand::switch_to(SceneKey::Replay(None))
        );
    }

    #[test]
    fn escape_and_exit_quit() {
        let mut menu = MenuScene::new();
        let mut world = world();
        assert_eq!(
            menu.update(0.016, &pressed(&[Key::Escape]), &mut world),
            SceneCommand::Quit
        );
        menu.selected = 2;
        assert_eq!(
            menu.update(0.016, &pressed(&[Key::Enter]), &mut world),
            SceneCommand::Quit
        );
    }

    #[test]
    fn clicking_a_button_selects_it() {
        let mut menu = MenuScene::new();
        let mut world = world();
        let mut click = InputState::default();
        click.set_mouse_position(button_center(Vec2::new(800.0, 600.0), 1));
        click.set_mouse_button(MouseButton::Left, true);
        assert_eq!(
            menu.update(0.016, &click, &mut world),
            SceneCommand::switch_to(SceneKey::Replay(None))
        );
        assert_eq!(menu.selected, 1);
    }

    #[test]
    fn renders_every_item() {
        let mut menu = MenuScene::new();
        let world = world();
        let mut backend = HeadlessBackend::new(800, 600);
        backend.begin_frame();
        menu.render(&world, &mut backend);
        let texts = backend.texts();
        for item in MenuItem::ALL {
            assert!(texts.contains(&item.label()));
        }
        assert!(texts.contains(&TITLE));
    }
}
