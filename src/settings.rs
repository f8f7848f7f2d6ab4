use log::info;

use crate::constants::*;

/// Tuning values for a single run of the game. Built once from the measured
/// terminal size and handed to entities by reference; the only mutation
/// after startup is the level-up speed ramp.
#[derive(Debug, Clone)]
pub struct Settings {
    pub screen_width: f64,
    pub screen_height: f64,

    pub ship_speed: f64,

    pub bullet_speed: f64,
    pub bullet_width: f64,
    pub bullet_height: f64,
    pub bullets_allowed: usize,

    pub target_speed: f64,

    pub miss_limit: u32,
    pub levelup_hits: u32,
    pub speedup_scale: f64,
}

impl Settings {
    pub fn new(screen_width: u16, screen_height: u16) -> Self {
        Settings {
            screen_width: screen_width as f64,
            screen_height: screen_height as f64,
            ship_speed: SHIP_SPEED,
            bullet_speed: BULLET_SPEED,
            bullet_width: BULLET_WIDTH,
            bullet_height: BULLET_HEIGHT,
            bullets_allowed: BULLETS_ALLOWED,
            target_speed: TARGET_SPEED,
            miss_limit: MISS_LIMIT,
            levelup_hits: LEVELUP_HITS,
            speedup_scale: SPEEDUP_SCALE,
        }
    }

    /// Ramp the difficulty: ship, bullets and target all speed up by the
    /// same factor. There is no upper bound on the ramp.
    pub fn increase_speed(&mut self) {
        self.ship_speed *= self.speedup_scale;
        self.bullet_speed *= self.speedup_scale;
        self.target_speed *= self.speedup_scale;
        info!(
            "Level up: ship speed {:.2}, bullet speed {:.2}, target speed {:.2}",
            self.ship_speed, self.bullet_speed, self.target_speed
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increase_speed_scales_all_three_speeds() {
        let mut settings = Settings::new(80, 24);
        let (ship, bullet, target) = (
            settings.ship_speed,
            settings.bullet_speed,
            settings.target_speed,
        );

        settings.increase_speed();

        assert!((settings.ship_speed - ship * SPEEDUP_SCALE).abs() < 1e-9);
        assert!((settings.bullet_speed - bullet * SPEEDUP_SCALE).abs() < 1e-9);
        assert!((settings.target_speed - target * SPEEDUP_SCALE).abs() < 1e-9);
    }

    #[test]
    fn increase_speed_compounds_without_cap() {
        let mut settings = Settings::new(80, 24);
        let base = settings.bullet_speed;
        for _ in 0..20 {
            settings.increase_speed();
        }
        assert!((settings.bullet_speed - base * SPEEDUP_SCALE.powi(20)).abs() < 1e-6);
    }
}
