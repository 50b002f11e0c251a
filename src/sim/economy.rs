//! Distance accumulation and distance milestones
//!
//! Coins are awarded every `coin_interval` meters and speed rises every
//! `speed_interval` meters. Markers always snap to the highest multiple of
//! the interval not above the current distance, and one award is made for
//! every multiple crossed, so a large tick neither skips nor repeats a band.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Distance covered in one tick: speed * dt * scale
#[inline]
pub fn distance_delta(speed: f32, dt: f32, tuning: &Tuning) -> f32 {
    speed * dt * tuning.distance_scale
}

/// Milestone markers for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Milestones {
    /// Distance at which coins were last awarded
    pub last_coin: f32,
    /// Distance at which speed was last increased
    pub last_speed: f32,
}

/// Awards earned by one milestone check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilestoneAwards {
    /// Coin bands crossed (each worth `coin_reward`)
    pub coin_bands: u32,
    /// Speed bands crossed (each worth `speed_step`)
    pub speed_bands: u32,
}

impl Milestones {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check both milestone kinds against the current distance
    pub fn check(&mut self, distance: f32, tuning: &Tuning) -> MilestoneAwards {
        MilestoneAwards {
            coin_bands: crossed_bands(&mut self.last_coin, distance, tuning.coin_interval),
            speed_bands: crossed_bands(&mut self.last_speed, distance, tuning.speed_interval),
        }
    }
}

/// Advance `marker` to the floor multiple of `interval` and report how many
/// multiples lay between the old and new marker.
fn crossed_bands(marker: &mut f32, distance: f32, interval: f32) -> u32 {
    if !distance.is_finite() || distance < *marker + interval {
        return 0;
    }
    let floor = (distance / interval).floor() * interval;
    let bands = ((floor - *marker) / interval).round().max(1.0) as u32;
    *marker = floor;
    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_scales_with_speed() {
        let tuning = Tuning::default();
        assert_eq!(distance_delta(360.0, 0.25, &tuning), 9.0);
        assert!(distance_delta(720.0, 0.25, &tuning) > distance_delta(360.0, 0.25, &tuning));
    }

    #[test]
    fn coin_awarded_once_at_500() {
        let tuning = Tuning::default();
        let mut m = Milestones::default();
        assert_eq!(m.check(499.9, &tuning).coin_bands, 0);
        assert_eq!(m.check(500.1, &tuning).coin_bands, 1);
        assert_eq!(m.last_coin, 500.0);
        assert_eq!(m.check(500.2, &tuning).coin_bands, 0);
        assert_eq!(m.check(999.0, &tuning).coin_bands, 0);
    }

    #[test]
    fn exact_multiple_triggers() {
        let tuning = Tuning::default();
        let mut m = Milestones::default();
        let awards = m.check(1000.0, &tuning);
        assert_eq!(awards.coin_bands, 2);
        assert_eq!(awards.speed_bands, 1);
        assert_eq!(m.last_coin, 1000.0);
        assert_eq!(m.last_speed, 1000.0);
    }

    #[test]
    fn large_jump_awards_each_band_once() {
        let tuning = Tuning::default();
        let mut m = Milestones::default();
        // 0 -> 1750 in one tick crosses 500, 1000 and 1500
        let awards = m.check(1750.0, &tuning);
        assert_eq!(awards.coin_bands, 3);
        assert_eq!(awards.speed_bands, 1);
        assert_eq!(m.last_coin, 1500.0);
        // Nothing more until 2000
        assert_eq!(m.check(1999.0, &tuning), MilestoneAwards::default());
        let awards = m.check(2000.0, &tuning);
        assert_eq!(awards.coin_bands, 1);
        assert_eq!(awards.speed_bands, 1);
    }

    #[test]
    fn markers_never_decrease() {
        let tuning = Tuning::default();
        let mut m = Milestones::default();
        m.check(1200.0, &tuning);
        let before = m;
        m.check(10.0, &tuning);
        assert_eq!(m, before);
    }

    #[test]
    fn non_finite_distance_awards_nothing() {
        let tuning = Tuning::default();
        let mut m = Milestones::default();
        assert_eq!(m.check(f32::INFINITY, &tuning), MilestoneAwards::default());
        assert_eq!(m.check(f32::NAN, &tuning), MilestoneAwards::default());
        assert_eq!(m, Milestones::default());
    }
}
