//! Example component definitions for the demo systems.
//!
//! Components are plain data; anything `Send + Sync + 'static` that names
//! itself through [`Component::type_name`] can be attached to a game object.
//! These also derive serde so scenes can be written out or loaded as JSON.

use engine_component::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A 2D position in world units.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position(pub Vec2);

impl Position {
    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "Position"
    }
}

/// A 2D velocity in world units per second.
///
/// Only its magnitude is used for movement; the heading comes from
/// [`Direction`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub const ZERO: Self = Self(Vec2::ZERO);

    #[must_use]
    pub fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Speed in world units per second.
    #[must_use]
    pub fn speed(&self) -> f32 {
        self.0.length()
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// The heading an object moves along.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit vector of the heading, with +y up.
    #[must_use]
    pub fn unit(self) -> Vec2 {
        match self {
            Self::Up => Vec2::Y,
            Self::Down => Vec2::NEG_Y,
            Self::Left => Vec2::NEG_X,
            Self::Right => Vec2::X,
        }
    }

    /// The opposite heading.
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl Component for Direction {
    fn type_name() -> &'static str {
        "Direction"
    }
}

/// A display name, used in logs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Name {
    pub value: String,
}

impl Name {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.value)
    }
}

impl Component for Name {
    fn type_name() -> &'static str {
        "Name"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_units() {
        assert_eq!(Direction::Right.unit(), Vec2::new(1.0, 0.0));
        assert_eq!(Direction::Up.unit(), Vec2::new(0.0, 1.0));
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            assert_eq!(dir.reversed().unit(), -dir.unit());
            assert_eq!(dir.reversed().reversed(), dir);
        }
    }

    #[test]
    fn test_velocity_speed() {
        assert_eq!(Velocity::new(3.0, 4.0).speed(), 5.0);
        assert_eq!(Velocity::ZERO.speed(), 0.0);
    }

    #[test]
    fn test_components_have_distinct_type_ids() {
        let ids = [
            Position::component_type_id(),
            Velocity::component_type_id(),
            Direction::component_type_id(),
            Name::component_type_id(),
        ];
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_string(&Direction::Left).unwrap();
        assert_eq!(json, r#""left""#);
        let position: Position = serde_json::from_str("[1.5,-2.0]").unwrap();
        assert_eq!(position, Position::new(1.5, -2.0));
        let name: Name = serde_json::from_str(r#"{"value":"Player"}"#).unwrap();
        assert_eq!(name.to_string(), "Player");
    }
}
