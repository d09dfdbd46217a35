//! Scene presets
//!
//! A scene is plain data: play field, clear color and an ordered entity list.
//! The same frame loop runs every scene; behaviors decide what moves.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::{BALL_SPEED, BALL_SPIN, PADDLE_OFFSET_X, PADDLE_SPEED};
use crate::sim::{Axis, Behavior, Entity, Oscillator, PlayField, Side, Visibility, default_binding};

/// Built-in scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Two-player sprite Pong
    #[default]
    Pong,
    /// Animated sun, basket boy and falling apple
    Orchard,
}

impl SceneKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SceneKind::Pong => "pong",
            SceneKind::Orchard => "orchard",
        }
    }

    /// Parse a scene name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "pong" => Some(SceneKind::Pong),
            "orchard" | "simple_2d" => Some(SceneKind::Orchard),
            _ => None,
        }
    }
}

/// Everything needed to build a `GameState`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    /// Window / document title
    pub title: String,
    /// Clear color (RGBA)
    pub background: [f32; 4],
    pub play_field: PlayField,
    /// Draw order is list order
    pub entities: Vec<Entity>,
}

impl SceneConfig {
    pub fn from_kind(kind: SceneKind) -> Self {
        match kind {
            SceneKind::Pong => Self::pong(),
            SceneKind::Orchard => Self::orchard(),
        }
    }

    /// Competitive two-paddle scene
    pub fn pong() -> Self {
        let banner = Vec3::new(3.0, 3.0, 1.0);
        let label = Vec3::new(2.0, 1.0, 1.0);
        let paddle = Vec3::new(1.75, 3.5, 1.0);

        let mut entities = vec![
            Entity::new("p1_win", "sprites/p1_win.png", Vec3::ZERO, banner)
                .with_visibility(Visibility::WhenWon(Side::Left)),
            Entity::new("p2_win", "sprites/p2_win.png", Vec3::ZERO, banner)
                .with_visibility(Visibility::WhenWon(Side::Right)),
            Entity::new("line", "sprites/dotted_line.png", Vec3::ZERO, Vec3::new(0.1, 7.5, 1.0)),
            Entity::new("p1", "sprites/player_1.png", Vec3::new(-2.5, 3.0, 0.0), label),
            Entity::new("p2", "sprites/player_2.png", Vec3::new(2.5, 3.0, 0.0), label),
        ];

        for (side, name, x) in [
            (Side::Left, "left_paddle", -PADDLE_OFFSET_X),
            (Side::Right, "right_paddle", PADDLE_OFFSET_X),
        ] {
            let (up, down) = default_binding(side);
            entities.push(
                Entity::new(name, &format!("sprites/{name}.png"), Vec3::new(x, 0.0, 0.0), paddle)
                    .with_speed(PADDLE_SPEED)
                    .with_behavior(Behavior::Paddle { side, up, down }),
            );
        }

        entities.push(
            Entity::new("ball", "sprites/ball.png", Vec3::ZERO, Vec3::splat(0.5))
                .with_speed(BALL_SPEED)
                .with_spin(BALL_SPIN)
                .with_behavior(Behavior::Ball {
                    velocity: Vec3::new(-1.0, -0.5, 0.0),
                }),
        );

        Self {
            name: SceneKind::Pong.as_str().to_owned(),
            title: "Pong".to_owned(),
            background: [1.0, 1.0, 1.0, 1.0],
            play_field: PlayField::default(),
            entities,
        }
    }

    /// Non-competitive animated scene; never ends
    pub fn orchard() -> Self {
        let entities = vec![
            Entity::new("sun", "sprites/sun.png", Vec3::new(3.5, 2.5, 0.0), Vec3::splat(1.5))
                .with_spin(90.0)
                .with_behavior(Behavior::Pulse {
                    pulse: Oscillator::new(1.0, 1.25, 0.25),
                }),
            Entity::new("basket_boy", "sprites/basket_boy.png", Vec3::new(-2.0, -1.5, 0.0), Vec3::splat(3.5))
                .with_behavior(Behavior::Patrol {
                    axis: Axis::X,
                    patrol: Oscillator::new(0.0, 4.0, 2.0),
                }),
            Entity::new("apple", "sprites/apple.png", Vec3::new(-3.0, 3.0, 0.0), Vec3::splat(0.75))
                .with_speed(2.0)
                .with_behavior(Behavior::Drop {
                    floor: -5.0,
                    sway: Some(Oscillator::new(0.0, 4.0, 2.0)),
                    catcher: Some("basket_boy".to_owned()),
                }),
        ];

        Self {
            name: SceneKind::Orchard.as_str().to_owned(),
            title: "Orchard".to_owned(),
            background: [0.410, 0.686, 0.985, 1.0],
            play_field: PlayField::default(),
            entities,
        }
    }

    /// Distinct sprite paths in first-use order
    pub fn sprites(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for entity in &self.entities {
            if !paths.contains(&entity.sprite.as_str()) {
                paths.push(&entity.sprite);
            }
        }
        paths
    }
}
