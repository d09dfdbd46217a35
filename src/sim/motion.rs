//! Motion policies for scripted scene entities
//!
//! Replaces per-entity direction booleans with an explicit oscillation policy.

use serde::{Deserialize, Serialize};

/// Which bound an oscillator is currently moving toward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Heading {
    #[default]
    TowardMax,
    TowardMin,
}

/// A value that bounces between two bounds at a fixed rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillator {
    pub min: f32,
    pub max: f32,
    /// Units per second
    pub rate: f32,
    pub value: f32,
    #[serde(default)]
    pub heading: Heading,
}

impl Oscillator {
    /// Start at `min`, heading toward `max`
    pub fn new(min: f32, max: f32, rate: f32) -> Self {
        debug_assert!(min <= max);
        Self {
            min,
            max,
            rate,
            value: min,
            heading: Heading::TowardMax,
        }
    }

    /// Advance by `dt` seconds and return the new value
    ///
    /// Reaching a bound clamps to it and reverses the heading; the overshoot
    /// is dropped rather than reflected.
    pub fn advance(&mut self, dt: f32) -> f32 {
        match self.heading {
            Heading::TowardMax => {
                self.value += self.rate * dt;
                if self.value >= self.max {
                    self.value = self.max;
                    self.heading = Heading::TowardMin;
                }
            }
            Heading::TowardMin => {
                self.value -= self.rate * dt;
                if self.value <= self.min {
                    self.value = self.min;
                    self.heading = Heading::TowardMax;
                }
            }
        }
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_oscillator_reverses_at_bounds() {
        let mut osc = Oscillator::new(0.0, 2.0, 2.0);
        assert!((osc.advance(0.5) - 1.0).abs() < 1e-6);
        assert_eq!(osc.heading, Heading::TowardMax);

        assert_eq!(osc.advance(0.75), 2.0);
        assert_eq!(osc.heading, Heading::TowardMin);

        assert!((osc.advance(0.25) - 1.5).abs() < 1e-6);
        assert_eq!(osc.advance(5.0), 0.0);
        assert_eq!(osc.heading, Heading::TowardMax);
    }

    proptest! {
        #[test]
        fn prop_oscillator_stays_in_bounds(steps in prop::collection::vec(0.0f32..0.5, 1..200)) {
            let mut osc = Oscillator::new(1.0, 1.25, 0.25);
            for dt in steps {
                let v = osc.advance(dt);
                prop_assert!((1.0..=1.25).contains(&v));
            }
        }
    }
}
