use crate::constants::*;
use crate::rendering::GameGrid;
use crate::settings::Settings;
use crate::types::{Rect, Vector2D};

/// Player ship, pinned to the left edge and free to slide vertically.
/// Vertical intent is a pair of held-key flags; their net decides the
/// direction each frame.
pub struct Ship {
    pub position: Vector2D,
    pub moving_up: bool,
    pub moving_down: bool,
}

impl Ship {
    pub fn new(settings: &Settings) -> Self {
        let mut ship = Ship {
            position: Vector2D::new(0.0, 0.0),
            moving_up: false,
            moving_down: false,
        };
        ship.center(settings);
        ship
    }

    /// Park the ship vertically centered at the left edge.
    pub fn center(&mut self, settings: &Settings) {
        self.position = Vector2D::new(
            SHIP_LEFT_MARGIN + SHIP_WIDTH / 2.0,
            settings.screen_height / 2.0,
        );
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.position.x, self.position.y, SHIP_WIDTH, SHIP_HEIGHT)
    }

    pub fn update(&mut self, settings: &Settings) {
        let mut dy = 0.0;
        if self.moving_up {
            dy -= settings.ship_speed;
        }
        if self.moving_down {
            dy += settings.ship_speed;
        }

        // Saturate at the screen edges, keeping the full hull visible.
        let top_bound = SHIP_HEIGHT / 2.0;
        let bottom_bound = settings.screen_height - SHIP_HEIGHT / 2.0;
        self.position.y = (self.position.y + dy).clamp(top_bound, bottom_bound);
    }

    pub fn draw(&self, game_grid: &mut GameGrid) {
        let hull: [(f64, f64, char); 5] = [
            (-1.0, -1.0, '\\'),
            (-1.0, 0.0, '='),
            (0.0, 0.0, '='),
            (1.0, 0.0, '>'),
            (-1.0, 1.0, '/'),
        ];
        for &(dx, dy, c) in &hull {
            let draw_x = (self.position.x + dx).round() as u16;
            let draw_y = (self.position.y + dy).round() as u16;
            game_grid.set_char(draw_x, draw_y, c);
        }
    }
}

// --- Bullet struct ---
pub struct Bullet {
    pub position: Vector2D,
    pub width: f64,
    pub height: f64,
}

impl Bullet {
    /// Spawn at the ship's nose, already clear of the hull.
    pub fn new(settings: &Settings, ship: &Ship) -> Self {
        Bullet {
            position: Vector2D::new(
                ship.rect().right() + settings.bullet_width / 2.0,
                ship.position.y,
            ),
            width: settings.bullet_width,
            height: settings.bullet_height,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.position.x, self.position.y, self.width, self.height)
    }

    /// Speed is read from the live settings, so a level-up accelerates
    /// bullets already in flight.
    pub fn update(&mut self, settings: &Settings) {
        self.position.x += settings.bullet_speed;
    }

    pub fn draw(&self, game_grid: &mut GameGrid) {
        game_grid.fill_rect(&self.rect(), BULLET_CHAR);
    }
}

/// The practice target: a block on the right edge patrolling up and down,
/// reflecting off the screen bounds.
pub struct Target {
    pub position: Vector2D,
    pub direction: f64, // +1.0 down, -1.0 up
}

impl Target {
    pub fn new(settings: &Settings) -> Self {
        let mut target = Target {
            position: Vector2D::new(0.0, 0.0),
            direction: 1.0,
        };
        target.center(settings);
        target
    }

    /// Park the target vertically centered, flush against the right edge.
    pub fn center(&mut self, settings: &Settings) {
        self.position = Vector2D::new(
            settings.screen_width - TARGET_WIDTH / 2.0,
            settings.screen_height / 2.0,
        );
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.position.x, self.position.y, TARGET_WIDTH, TARGET_HEIGHT)
    }

    pub fn update(&mut self, settings: &Settings) {
        self.position.y += settings.target_speed * self.direction;

        // Elastic bounce: clamp to the bound on the frame it is reached,
        // then reverse. No overshoot is ever visible.
        let top_bound = TARGET_HEIGHT / 2.0;
        let bottom_bound = settings.screen_height - TARGET_HEIGHT / 2.0;
        if self.position.y <= top_bound {
            self.position.y = top_bound;
            self.direction = 1.0;
        } else if self.position.y >= bottom_bound {
            self.position.y = bottom_bound;
            self.direction = -1.0;
        }
    }

    pub fn draw(&self, game_grid: &mut GameGrid) {
        game_grid.fill_rect(&self.rect(), TARGET_CHAR);
    }
}
