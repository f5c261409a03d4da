//! Anger and glitch escalation.
//!
//! Both levels are a pure function of the number of user messages in the
//! active conversation; they are never stored or mutated on their own.

use madchat_types::chat::Levels;

pub use madchat_types::chat::MESSAGE_CAP;

/// Message count at which glitching starts.
const GLITCH_THRESHOLD: u32 = 10;

/// Glitch level at the threshold, in tenths.
const GLITCH_BASE_TENTHS: u32 = 3;

/// Glitch ceiling, in tenths.
const GLITCH_MAX_TENTHS: u32 = 7;

/// Compute anger and glitch levels for a user message count.
///
/// - anger: `min(100, floor(count / 2) * 10)`
/// - glitch: `0` below ten messages, then `min(0.7, 0.3 + floor((count - 10) / 2) * 0.1)`
///
/// Glitch is computed in whole tenths so results compare exactly
/// against literals like `0.3` and `0.6`.
pub fn compute_levels(user_message_count: u32) -> Levels {
    let anger = (user_message_count / 2).saturating_mul(10).min(100) as u8;

    let glitch = if user_message_count < GLITCH_THRESHOLD {
        0.0
    } else {
        let steps = (user_message_count - GLITCH_THRESHOLD) / 2;
        let tenths = GLITCH_BASE_TENTHS.saturating_add(steps).min(GLITCH_MAX_TENTHS);
        f64::from(tenths) / 10.0
    };

    Levels { anger, glitch }
}
