//! Per-frame simulation update
//!
//! One call advances every entity by `dt` seconds in a fixed order:
//! reset transforms and sample input, move paddles and scripted entities,
//! resolve drops, resolve balls, then rebuild transforms.

use glam::Vec3;

use super::collision::{
    Axis, is_out_of_horizontal_bound, is_out_of_vertical_bound, overlaps, reflect_on_collision,
};
use super::entity::{Behavior, Entity};
use super::input::{Key, KeyboardState, sample_intent};
use super::state::{GameState, Side};

/// Autopilot ignores height differences smaller than this
const AUTOPILOT_DEADZONE: f32 = 0.1;

/// Input for a single update
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Keys held this frame
    pub keys: KeyboardState,
    /// Demo mode for the left paddle
    pub autopilot_left: bool,
    /// Demo mode for the right paddle
    pub autopilot_right: bool,
}

impl TickInput {
    pub fn from_keys(keys: KeyboardState) -> Self {
        Self {
            keys,
            ..Default::default()
        }
    }

    fn autopilot(&self, side: Side) -> bool {
        match side {
            Side::Left => self.autopilot_left,
            Side::Right => self.autopilot_right,
        }
    }
}

/// Bounding box snapshot used while another entity is borrowed mutably
#[derive(Debug, Clone, Copy)]
struct Bounds {
    anchor: Vec3,
    displacement: Vec3,
    extent: Vec3,
}

impl Bounds {
    fn of(entity: &Entity) -> Self {
        Self {
            anchor: entity.anchor,
            displacement: entity.displacement,
            extent: entity.extent,
        }
    }

    fn overlaps(&self, other: &Bounds, collision_factor: f32) -> bool {
        overlaps(
            self.displacement,
            other.displacement,
            self.anchor,
            other.anchor,
            self.extent,
            other.extent,
            collision_factor,
        )
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    log::trace!(
        "frame {} dt {:.4} match {:?}",
        state.frame_count,
        dt,
        state.match_state
    );

    // Rendering continues after the match ends, physics does not
    if !state.match_state.is_running() {
        return;
    }

    state.frame_count += 1;
    state.elapsed += dt;

    let keys = autopilot_keys(state, input);

    // Reset transforms and sample intents
    for entity in &mut state.entities {
        entity.begin_frame();
        if let Behavior::Paddle { up, down, .. } = entity.behavior {
            entity.intent = sample_intent(&keys, up, down);
        }
    }

    // Paddles and scripted motion
    let field = state.play_field;
    for entity in &mut state.entities {
        if matches!(entity.behavior, Behavior::Paddle { .. }) {
            entity.step_guarded(&field, dt);
            continue;
        }
        match &mut entity.behavior {
            Behavior::Patrol { axis, patrol } => {
                let value = patrol.advance(dt);
                match axis {
                    Axis::X => entity.displacement.x = value,
                    Axis::Y => entity.displacement.y = value,
                }
            }
            Behavior::Pulse { pulse } => {
                entity.scale = pulse.advance(dt);
            }
            Behavior::Drop { sway, .. } => {
                entity.displacement.y -= entity.speed * dt;
                if let Some(sway) = sway {
                    entity.displacement.x = sway.advance(dt);
                }
            }
            Behavior::Static | Behavior::Paddle { .. } | Behavior::Ball { .. } => {}
        }
    }

    resolve_drops(state);

    if let Some(winner) = resolve_balls(state, dt) {
        if state.match_state.end(winner) {
            log::info!(
                "Score! {} player wins after {:.2}s",
                winner.as_str(),
                state.elapsed
            );
        }
    }

    for entity in &mut state.entities {
        entity.finish_frame(dt);
    }
}

/// Held keys plus whatever the autopilot presses for its paddles
fn autopilot_keys(state: &GameState, input: &TickInput) -> KeyboardState {
    let mut keys = input.keys.clone();
    let Some(ball) = state.ball() else {
        return keys;
    };
    let target = ball.world_position().y;

    for side in [Side::Left, Side::Right] {
        if !input.autopilot(side) {
            continue;
        }
        let Some(paddle) = state.paddle(side) else {
            continue;
        };
        let Behavior::Paddle { up, down, .. } = paddle.behavior else {
            continue;
        };

        let offset = target - paddle.world_position().y;
        if offset > AUTOPILOT_DEADZONE {
            keys.press(up);
        } else if offset < -AUTOPILOT_DEADZONE {
            keys.press(down);
        }
    }

    keys
}

/// Respawn dropping entities that hit their floor or were caught
fn resolve_drops(state: &mut GameState) {
    let catchers: Vec<(String, Bounds)> = state
        .entities
        .iter()
        .map(|e| (e.name.clone(), Bounds::of(e)))
        .collect();
    let factor = state.collision_factor;

    for entity in &mut state.entities {
        let Behavior::Drop { floor, catcher, .. } = &entity.behavior else {
            continue;
        };

        let fell = entity.anchor.y + entity.displacement.y <= *floor;
        let current = Bounds::of(entity);
        let caught = catcher.as_deref().is_some_and(|name| {
            catchers
                .iter()
                .any(|(n, bounds)| n == name && bounds.overlaps(&current, factor))
        });

        if fell || caught {
            log::debug!(
                "{} respawned ({})",
                entity.name,
                if caught { "caught" } else { "fell" }
            );
            entity.displacement.y = 0.0;
        }
    }
}

/// Move balls and apply the wall/paddle policy; returns the winner on a score
///
/// Priority per ball: side wall (score), paddle (reflect x), top/bottom
/// wall (reflect y), otherwise keep the move.
fn resolve_balls(state: &mut GameState, dt: f32) -> Option<Side> {
    let paddles: Vec<Bounds> = state
        .entities
        .iter()
        .filter(|e| matches!(e.behavior, Behavior::Paddle { .. }))
        .map(Bounds::of)
        .collect();
    let field = state.play_field;
    let factor = state.collision_factor;
    let mut winner = None;

    for entity in &mut state.entities {
        let Behavior::Ball { velocity } = &mut entity.behavior else {
            continue;
        };

        let step = entity.speed * dt;
        entity.displacement += *velocity * step;

        if is_out_of_horizontal_bound(&field, entity.anchor, entity.displacement, entity.extent) {
            // The side farther from the crossed wall wins
            let world_x = entity.anchor.x + entity.displacement.x;
            let side = if world_x < 0.0 { Side::Right } else { Side::Left };
            winner.get_or_insert(side);
            continue;
        }

        let hit_paddle = paddles.iter().any(|p| {
            overlaps(
                entity.displacement,
                p.displacement,
                entity.anchor,
                p.anchor,
                entity.extent,
                p.extent,
                factor,
            )
        });

        if hit_paddle {
            let (displacement, reflected) =
                reflect_on_collision(entity.displacement, *velocity, step, Axis::X);
            entity.displacement = displacement;
            *velocity = reflected;
        } else if is_out_of_vertical_bound(&field, entity.anchor, entity.displacement, entity.extent)
        {
            let (displacement, reflected) =
                reflect_on_collision(entity.displacement, *velocity, step, Axis::Y);
            entity.displacement = displacement;
            *velocity = reflected;
        }
    }

    winner
}

/// Logical keys bound to a side's paddle in the two-player layout
pub fn default_binding(side: Side) -> (Key, Key) {
    match side {
        Side::Left => (Key::W, Key::S),
        Side::Right => (Key::Up, Key::Down),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneConfig;
    use crate::sim::collision::PlayField;
    use crate::sim::entity::compose_transform;
    use crate::sim::state::MatchState;
    use proptest::prelude::*;

    fn pong() -> GameState {
        GameState::new(&SceneConfig::pong())
    }

    fn set_ball(state: &mut GameState, displacement: Vec3, direction: Vec3) {
        let ball = state.entity_mut("ball").unwrap();
        ball.displacement = displacement;
        ball.behavior = Behavior::Ball {
            velocity: direction,
        };
    }

    fn ball_velocity(state: &GameState) -> Vec3 {
        match state.ball().unwrap().behavior {
            Behavior::Ball { velocity } => velocity,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_ball_at_right_limit_scores_for_left() {
        let mut state = pong();
        set_ball(&mut state, Vec3::new(4.75, 0.0, 0.0), Vec3::X);
        tick(&mut state, &TickInput::default(), 0.016);
        assert_eq!(state.match_state, MatchState::Ended(Side::Left));
    }

    #[test]
    fn test_ball_past_left_wall_scores_for_right() {
        let mut state = pong();
        set_ball(&mut state, Vec3::new(-4.7, 0.0, 0.0), -Vec3::X);
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.match_state, MatchState::Ended(Side::Right));
    }

    #[test]
    fn test_ended_match_freezes_physics() {
        let mut state = pong();
        set_ball(&mut state, Vec3::new(4.75, 0.0, 0.0), Vec3::X);
        tick(&mut state, &TickInput::default(), 0.016);
        let frozen = state.ball().unwrap().displacement;
        let frames = state.frame_count;

        let mut keys = KeyboardState::new();
        keys.press(Key::W);
        tick(&mut state, &TickInput::from_keys(keys), 0.5);

        assert_eq!(state.ball().unwrap().displacement, frozen);
        assert_eq!(state.paddle(Side::Left).unwrap().displacement, Vec3::ZERO);
        assert_eq!(state.frame_count, frames);
        assert_eq!(state.match_state.winner(), Some(Side::Left));
    }

    #[test]
    fn test_paddle_hit_reflects_without_tunneling() {
        let mut state = pong();
        // One step of 0.25 carries the ball from -2.3 into the left paddle
        set_ball(&mut state, Vec3::new(-2.3, 0.0, 0.0), -Vec3::X);
        tick(&mut state, &TickInput::default(), 0.1);

        assert!(ball_velocity(&state).x > 0.0);
        let ball = state.ball().unwrap();
        let paddle = state.paddle(Side::Left).unwrap();
        assert!(!overlaps(
            ball.displacement,
            paddle.displacement,
            ball.anchor,
            paddle.anchor,
            ball.extent,
            paddle.extent,
            state.collision_factor,
        ));
        assert!((ball.displacement.x - (-2.05)).abs() < 1e-5);
    }

    fn overlaps_paddle(state: &GameState, side: Side) -> bool {
        let ball = state.ball().unwrap();
        let paddle = state.paddle(side).unwrap();
        overlaps(
            ball.displacement,
            paddle.displacement,
            ball.anchor,
            paddle.anchor,
            ball.extent,
            paddle.extent,
            state.collision_factor,
        )
    }

    #[test]
    fn test_ball_inside_left_paddle_escapes() {
        let mut state = pong();
        // Already 0.025 deep in the left paddle before the step
        set_ball(&mut state, Vec3::new(-2.4, 0.0, 0.0), -Vec3::X);
        assert!(overlaps_paddle(&state, Side::Left));

        tick(&mut state, &TickInput::default(), 0.1);

        assert!(ball_velocity(&state).x > 0.0);
        assert!(!overlaps_paddle(&state, Side::Left));
        assert!((state.ball().unwrap().displacement.x - (-2.15)).abs() < 1e-5);
        assert!(state.match_state.is_running());
    }

    #[test]
    fn test_right_paddle_hit_reflects() {
        let mut state = pong();
        set_ball(&mut state, Vec3::new(2.3, 0.0, 0.0), Vec3::X);
        tick(&mut state, &TickInput::default(), 0.1);

        assert!(ball_velocity(&state).x < 0.0);
        assert!(!overlaps_paddle(&state, Side::Right));
        assert!((state.ball().unwrap().displacement.x - 2.05).abs() < 1e-5);
        assert!(state.match_state.is_running());
    }

    #[test]
    fn test_bottom_wall_reflects_vertical() {
        let mut state = pong();
        set_ball(&mut state, Vec3::new(0.0, -3.4, 0.0), Vec3::new(0.0, -1.0, 0.0));
        tick(&mut state, &TickInput::default(), 0.1);

        assert!(ball_velocity(&state).y > 0.0);
        assert_eq!(ball_velocity(&state).x, 0.0);
        assert!((state.ball().unwrap().displacement.y - (-3.15)).abs() < 1e-5);
        assert!(state.match_state.is_running());
    }

    #[test]
    fn test_top_wall_reflects_vertical() {
        let mut state = pong();
        // Ball limit is 3.75 - 0.25 = 3.5
        set_ball(&mut state, Vec3::new(0.0, 3.4, 0.0), Vec3::new(0.0, 1.0, 0.0));
        tick(&mut state, &TickInput::default(), 0.1);

        assert!(ball_velocity(&state).y < 0.0);
        assert!((state.ball().unwrap().displacement.y - 3.15).abs() < 1e-5);
        assert!(state.match_state.is_running());
    }

    #[test]
    fn test_side_wall_beats_paddle_contact() {
        let mut state = pong();
        state.entity_mut("right_paddle").unwrap().anchor = Vec3::new(4.5, 0.0, 0.0);
        set_ball(&mut state, Vec3::new(4.7, 0.0, 0.0), Vec3::X);
        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.match_state, MatchState::Ended(Side::Left));
    }

    #[test]
    fn test_paddle_rejects_move_past_band() {
        let mut state = pong();
        let mut keys = KeyboardState::new();
        keys.press(Key::W);
        // speed 3.0 for 1s would put the paddle at y = 3.0
        tick(&mut state, &TickInput::from_keys(keys), 1.0);
        assert_eq!(state.paddle(Side::Left).unwrap().displacement.y, 0.0);
    }

    #[test]
    fn test_paddle_follows_keys() {
        let mut state = pong();
        let mut keys = KeyboardState::new();
        keys.press(Key::Down);
        tick(&mut state, &TickInput::from_keys(keys), 0.1);
        let right = state.paddle(Side::Right).unwrap();
        assert!((right.displacement.y + 0.3).abs() < 1e-5);
        assert_eq!(right.intent, Vec3::ZERO);
        assert_eq!(state.paddle(Side::Left).unwrap().displacement, Vec3::ZERO);
    }

    #[test]
    fn test_ball_spins() {
        let mut state = pong();
        tick(&mut state, &TickInput::default(), 0.5);
        assert!((state.ball().unwrap().rotation() - 22.5).abs() < 1e-4);
    }

    #[test]
    fn test_autopilot_tracks_ball() {
        let mut state = pong();
        set_ball(&mut state, Vec3::new(0.0, 1.5, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let input = TickInput {
            autopilot_left: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.1);
        assert!(state.paddle(Side::Left).unwrap().displacement.y > 0.0);
        assert_eq!(state.paddle(Side::Right).unwrap().displacement.y, 0.0);
    }

    #[test]
    fn test_autopilot_left_wins_against_idle_right() {
        let mut state = pong();
        let input = TickInput {
            autopilot_left: true,
            ..Default::default()
        };
        for _ in 0..3000 {
            tick(&mut state, &input, 1.0 / 60.0);
            if !state.match_state.is_running() {
                break;
            }
        }
        assert_eq!(state.match_state, MatchState::Ended(Side::Left));
    }

    #[test]
    fn test_drop_respawns_at_floor() {
        let mut state = GameState::new(&SceneConfig::orchard());
        let apple = state.entity_mut("apple").unwrap();
        apple.displacement.y = -7.9;
        let floor = match apple.behavior {
            Behavior::Drop { floor, .. } => floor,
            _ => unreachable!(),
        };
        assert!(apple.anchor.y - 7.9 > floor);

        tick(&mut state, &TickInput::default(), 0.1);
        assert_eq!(state.entity("apple").unwrap().displacement.y, 0.0);
    }

    #[test]
    fn test_drop_respawns_when_caught() {
        let mut state = GameState::new(&SceneConfig::orchard());
        let boy = state.entity("basket_boy").unwrap().world_position();
        let apple = state.entity_mut("apple").unwrap();
        // Park the apple right on the basket
        apple.displacement.y = boy.y - apple.anchor.y;
        apple.anchor.x = boy.x;
        apple.behavior = Behavior::Drop {
            floor: -5.0,
            sway: None,
            catcher: Some("basket_boy".to_owned()),
        };

        tick(&mut state, &TickInput::default(), 0.01);
        assert_eq!(state.entity("apple").unwrap().displacement.y, 0.0);
    }

    #[test]
    fn test_orchard_never_ends() {
        let mut state = GameState::new(&SceneConfig::orchard());
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), 1.0 / 60.0);
        }
        assert!(state.match_state.is_running());
        let sun = state.entity("sun").unwrap();
        assert!((1.0..=1.25).contains(&sun.scale));
        let boy = state.entity("basket_boy").unwrap();
        assert!((0.0..=4.0).contains(&boy.displacement.x));
    }

    #[test]
    fn test_default_binding() {
        assert_eq!(default_binding(Side::Left), (Key::W, Key::S));
        assert_eq!(default_binding(Side::Right), (Key::Up, Key::Down));
    }

    proptest! {
        #[test]
        fn prop_transforms_rebuild_from_state(
            frames in prop::collection::vec((0.0f32..0.1, 0u8..4), 1..60)
        ) {
            let mut state = pong();
            for (dt, pressed) in frames {
                let mut keys = KeyboardState::new();
                match pressed {
                    0 => keys.press(Key::W),
                    1 => keys.press(Key::S),
                    2 => keys.press(Key::Up),
                    _ => keys.press(Key::Down),
                }
                tick(&mut state, &TickInput::from_keys(keys), dt);
            }
            for entity in &state.entities {
                let expected = compose_transform(
                    entity.anchor,
                    entity.displacement,
                    entity.spin.map(|s| s.angle),
                    entity.extent * entity.scale,
                );
                prop_assert!(entity.transform().abs_diff_eq(expected, 1e-4));
            }
        }

        #[test]
        fn prop_paddles_stay_in_band(
            frames in prop::collection::vec((0.0f32..1.5, prop::bool::ANY), 1..80)
        ) {
            let mut state = pong();
            let field = PlayField::default();
            for (dt, up) in frames {
                let mut keys = KeyboardState::new();
                keys.press(if up { Key::Up } else { Key::Down });
                keys.press(if up { Key::W } else { Key::S });
                tick(&mut state, &TickInput::from_keys(keys), dt);
                for side in [Side::Left, Side::Right] {
                    let p = state.paddle(side).unwrap();
                    prop_assert!(!is_out_of_vertical_bound(&field, p.anchor, p.displacement, p.extent));
                }
            }
        }
    }
}
