//! Forest Survivors - simulation core for a top-down arena survival game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, AI, hazards, game state)
//! - `level`: Static level geometry (world bounds + obstacles)
//! - `tuning`: Data-driven game balance

pub mod level;
pub mod sim;
pub mod tuning;

pub use level::{Level, LevelError};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per presented frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the runner will feed the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Slack used when comparing accumulated timers against durations
    pub const TIMER_EPSILON: f32 = 1e-4;
}

/// True once an accumulated `elapsed` has reached `duration`.
///
/// Timers are summed from per-tick `dt` values, so the comparison tolerates
/// the float drift of many small additions.
#[inline]
pub fn timer_elapsed(elapsed: f32, duration: f32) -> bool {
    elapsed + consts::TIMER_EPSILON >= duration
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_elapsed_tolerates_drift() {
        let mut elapsed = 0.0f32;
        for _ in 0..60 {
            elapsed += consts::SIM_DT;
        }
        assert!(timer_elapsed(elapsed, 1.0));

        let mut early = 0.0f32;
        for _ in 0..59 {
            early += consts::SIM_DT;
        }
        assert!(!timer_elapsed(early, 1.0));
    }
}
