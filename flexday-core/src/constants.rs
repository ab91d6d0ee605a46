//! Balance and tuning constants for the Flexday state machine.
//!
//! Adjusted in code only; catalog JSON carries missions, never balance.

use std::time::Duration;

// Progression --------------------------------------------------------------
pub const EXPERIENCE_CAP: u32 = 100;
pub const COMPLETED_EXPERIENCE: u32 = 15;
pub const ATTEMPTED_EXPERIENCE: u32 = 8;
pub const STARTING_LEVEL: u32 = 1;
pub const LEVEL_UP_ANNOUNCE_DELAY: Duration = Duration::from_millis(1_500);

// Achievements -------------------------------------------------------------
pub const CONSISTENCY_STREAK: u32 = 3;
pub const GROWTH_LEVEL: u32 = 5;

// Reports ------------------------------------------------------------------
pub const GROWTH_PRAISE_THRESHOLD: usize = 5;

// Selector -----------------------------------------------------------------
pub const DEFAULT_ALTERNATIVES: usize = 2;

// Storage keys -------------------------------------------------------------
pub const KEY_USER_PROFILE: &str = "userProfile";
pub const KEY_USER_TYPE_COMPLETED: &str = "userTypeCompleted";
pub const KEY_SESSION: &str = "session";

// Rotation -----------------------------------------------------------------
pub(crate) const ROTATION_DOMAIN: &[u8] = b"flexday.rotation";
