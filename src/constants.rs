// --- Game Constants ---
pub const SHIP_SPEED: f64 = 0.8; // Cells per frame
pub const SHIP_WIDTH: f64 = 3.0;
pub const SHIP_HEIGHT: f64 = 3.0;
pub const SHIP_LEFT_MARGIN: f64 = 1.0;

pub const BULLET_SPEED: f64 = 1.5;
pub const BULLET_WIDTH: f64 = 2.0;
pub const BULLET_HEIGHT: f64 = 1.0;
pub const BULLETS_ALLOWED: usize = 3;
pub const BULLET_CHAR: char = '-';

pub const TARGET_SPEED: f64 = 0.4;
pub const TARGET_WIDTH: f64 = 4.0;
pub const TARGET_HEIGHT: f64 = 7.0;
pub const TARGET_CHAR: char = '#';

pub const MISS_LIMIT: u32 = 3;
pub const LEVELUP_HITS: u32 = 5;
pub const SPEEDUP_SCALE: f64 = 1.1;

pub const BUTTON_WIDTH: u16 = 12;
pub const BUTTON_HEIGHT: u16 = 3;
pub const BUTTON_LABEL: &str = "Play";

pub const EVENT_POLL_MS: u64 = 33; // Frame pacing, roughly 30 FPS
