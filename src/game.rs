//! Host-independent frame loop
//!
//! Hosts own a `Game`, forward input events to it and call `frame` once per
//! display refresh (browser) or simulated step (headless). Each frame is
//! input → update → render, in that order, on one thread.

use std::collections::HashMap;

use crate::renderer::{Renderer, TextureError, TextureHandle, draw_state};
use crate::scene::SceneConfig;
use crate::settings::Settings;
use crate::sim::{FrameClock, GameState, InputEvent, TickInput, tick};

pub struct Game<R: Renderer> {
    state: GameState,
    clock: FrameClock,
    input: TickInput,
    settings: Settings,
    renderer: R,
    /// One handle per entity, parallel to `state.entities`
    textures: Vec<TextureHandle>,
    title: String,
}

impl<R: Renderer> Game<R> {
    /// Load every sprite the scene uses and build its initial state
    ///
    /// Fails on the first sprite that cannot be loaded.
    pub fn new(scene: &SceneConfig, settings: Settings, mut renderer: R) -> Result<Self, TextureError> {
        renderer.set_projection(scene.play_field.projection());

        let mut loaded: HashMap<&str, TextureHandle> = HashMap::new();
        let mut textures = Vec::with_capacity(scene.entities.len());
        for entity in &scene.entities {
            let handle = match loaded.get(entity.sprite.as_str()) {
                Some(handle) => *handle,
                None => {
                    let handle = renderer.load_texture(&entity.sprite)?;
                    loaded.insert(&entity.sprite, handle);
                    handle
                }
            };
            textures.push(handle);
        }

        let state = GameState::new(scene).with_collision_factor(settings.collision_factor);
        let mut input = TickInput::default();
        settings.autopilot.apply(&mut input);

        log::info!(
            "Scene '{}' ready: {} entities, {} textures",
            scene.name,
            scene.entities.len(),
            loaded.len()
        );

        Ok(Self {
            state,
            clock: FrameClock::new(),
            input,
            settings,
            renderer,
            textures,
            title: scene.title.clone(),
        })
    }

    /// Apply one host input event
    pub fn handle_event(&mut self, event: InputEvent) {
        self.input.keys.apply(event);
        for _ in 0..self.input.keys.take_quit_toggles() {
            self.state.toggle_running();
            log::info!("Running: {}", self.state.running);
        }
    }

    /// Anchor frame timing at host time `now_ms`
    ///
    /// Hosts whose counter starts well before the first frame (the browser's
    /// page-load origin) call this once so the first delta covers one frame,
    /// not the start-up time.
    pub fn start(&mut self, now_ms: f64) {
        self.clock.prime(now_ms);
        log::debug!("Frame clock started at {:.1}ms", now_ms);
    }

    /// Run one loop iteration at host time `now_ms`
    ///
    /// Returns whether the host should keep looping.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        let dt = self.settings.clamp_delta(self.clock.tick(now_ms));
        tick(&mut self.state, &self.input, dt);
        draw_state(&mut self.renderer, &self.state, &self.textures);
        self.state.running
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::FrameRecorder;
    use crate::settings::Autopilot;
    use crate::sim::{Entity, Key, MatchState, Side};
    use glam::Vec3;

    fn pong(settings: Settings) -> Game<FrameRecorder> {
        Game::new(&SceneConfig::pong(), settings, FrameRecorder::new()).unwrap()
    }

    #[test]
    fn test_textures_loaded_once_per_path() {
        let mut scene = SceneConfig::orchard();
        scene.entities.push(Entity::new(
            "second_apple",
            "sprites/apple.png",
            Vec3::new(1.0, 3.0, 0.0),
            Vec3::splat(0.75),
        ));
        let game = Game::new(&scene, Settings::default(), FrameRecorder::new()).unwrap();
        assert_eq!(game.renderer().texture_count(), 3);
        assert_eq!(game.textures[2], game.textures[3]);
    }

    #[test]
    fn test_missing_sprite_is_fatal() {
        let mut scene = SceneConfig::pong();
        scene.entities[0].sprite = "sprites/does_not_exist.png".to_owned();
        let result = Game::new(&scene, Settings::default(), FrameRecorder::new());
        assert!(matches!(result, Err(TextureError::Io { .. })));
    }

    #[test]
    fn test_quit_key_stops_loop() {
        let mut game = pong(Settings::default());
        assert!(game.frame(16.0));

        game.handle_event(InputEvent::KeyDown(Key::Q));
        assert!(!game.frame(32.0));
        assert!(!game.is_running());

        // A second press toggles back
        game.handle_event(InputEvent::KeyUp(Key::Q));
        game.handle_event(InputEvent::KeyDown(Key::Q));
        assert!(game.frame(48.0));
    }

    #[test]
    fn test_window_close_stops_loop() {
        let mut game = pong(Settings::default());
        game.handle_event(InputEvent::Quit);
        assert!(!game.frame(16.0));
        // The frame still rendered
        assert_eq!(game.renderer().frames(), 1);
    }

    #[test]
    fn test_held_keys_move_paddle() {
        let mut game = pong(Settings::default());
        game.frame(0.0);
        game.handle_event(InputEvent::KeyDown(Key::S));
        game.frame(100.0);
        let y = game.state().paddle(Side::Left).unwrap().displacement.y;
        assert!((y + 0.3).abs() < 1e-4);

        game.handle_event(InputEvent::KeyUp(Key::S));
        game.frame(200.0);
        let y2 = game.state().paddle(Side::Left).unwrap().displacement.y;
        assert_eq!(y, y2);
    }

    #[test]
    fn test_max_frame_delta_clamps_first_frame() {
        let settings = Settings {
            max_frame_delta: Some(0.05),
            ..Default::default()
        };
        let mut game = pong(settings);
        game.frame(1500.0);
        assert!((game.state().elapsed - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_first_frame_delta_is_unclamped_by_default() {
        let mut game = Game::new(&SceneConfig::orchard(), Settings::default(), FrameRecorder::new()).unwrap();
        game.frame(1500.0);
        assert!((game.state().elapsed - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_started_game_survives_late_first_frame() {
        // Sprites took seconds to load before the first animation frame
        let mut game = pong(Settings::default());
        game.start(4000.0);
        assert!(game.frame(4016.0));
        assert_eq!(game.state().match_state, MatchState::Running);
        assert!((game.state().elapsed - 0.016).abs() < 1e-5);
        assert_eq!(game.frames(), 1);
    }

    #[test]
    fn test_headless_match_ends_and_keeps_rendering() {
        let settings = Settings {
            autopilot: Autopilot::only(Side::Left),
            ..Default::default()
        };
        let step = settings.headless_step_ms;
        let mut game = pong(settings);

        let mut now = 0.0;
        while game.state().match_state.is_running() && game.frames() < 3600 {
            now += step;
            game.frame(now);
        }
        assert_eq!(game.state().match_state, MatchState::Ended(Side::Left));

        // Ended: frames still render, now with the left banner first
        now += step;
        game.frame(now);
        let frame = game.renderer().last_frame().unwrap();
        assert_eq!(frame.draws.len(), 7);
        assert_eq!(game.renderer().texture_path(frame.draws[0].texture), Some("sprites/p1_win.png"));
    }

    #[test]
    fn test_title_from_scene() {
        let game = Game::new(&SceneConfig::orchard(), Settings::default(), FrameRecorder::new()).unwrap();
        assert_eq!(game.title(), "Orchard");
        assert_eq!(game.settings().scene, crate::scene::SceneKind::Pong);
    }
}
