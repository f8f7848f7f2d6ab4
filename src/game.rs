use std::io::{self, Write};
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use log::{error, info};
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::button::Button;
use crate::constants::EVENT_POLL_MS;
use crate::entities::{Bullet, Ship, Target};
use crate::rendering::{GameGrid, OutputTarget};
use crate::settings::Settings;
use crate::stats::GameStats;
use crate::terminal_io::InputTape;

/// The two states of the session: sitting in the menu with the Play button
/// up, or an active round. Simulation and scoring only run while Playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Menu,
    Playing,
}

/// All mutable game state, kept apart from the terminal so a round can be
/// driven headless.
pub struct Session {
    pub settings: Settings,
    pub stats: GameStats,
    pub phase: Phase,
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub target: Target,
    pub play_button: Button,
    rng: ThreadRng,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let ship = Ship::new(&settings);
        let target = Target::new(&settings);
        let play_button = Button::new(&settings);
        Session {
            stats: GameStats::new(),
            phase: Phase::Menu,
            ship,
            bullets: Vec::new(),
            target,
            play_button,
            rng: rand::thread_rng(),
            settings,
        }
    }

    /// A left press only matters in the menu, and only on the Play button.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        if self.phase == Phase::Menu && self.play_button.contains(column, row) {
            self.start_game();
        }
    }

    /// Begin a fresh round. Always resets fully, whatever state preceded it.
    pub fn start_game(&mut self) {
        self.stats.reset();
        self.bullets.clear();
        self.ship.center(&self.settings);
        self.target.center(&self.settings);
        self.target.direction = if self.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        self.phase = Phase::Playing;
        info!("New game started.");
    }

    /// No-op once the magazine is full.
    pub fn fire_bullet(&mut self) {
        if self.bullets.len() < self.settings.bullets_allowed {
            self.bullets.push(Bullet::new(&self.settings, &self.ship));
        }
    }

    /// One simulation frame. Gated on the phase, so a finished round can
    /// never keep scoring.
    pub fn step(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.ship.update(&self.settings);
        self.update_bullets();
        self.target.update(&self.settings);
    }

    fn update_bullets(&mut self) {
        for bullet in &mut self.bullets {
            bullet.update(&self.settings);
        }

        // Cull bullets whose rect has fully left the screen; each is a miss.
        let screen_right = self.settings.screen_width;
        let mut misses = 0;
        self.bullets.retain(|bullet| {
            if bullet.rect().left >= screen_right {
                misses += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..misses {
            self.record_miss();
        }

        // Every bullet overlapping the target dies and scores exactly once.
        let target_rect = self.target.rect();
        let live_before = self.bullets.len();
        self.bullets
            .retain(|bullet| !bullet.rect().intersects(&target_rect));
        let hits = live_before - self.bullets.len();
        for _ in 0..hits {
            self.record_hit();
        }
    }

    fn record_miss(&mut self) {
        // Guarded so num_misses can never pass the limit, even when two
        // bullets leave the screen on the same frame.
        if self.phase != Phase::Playing {
            return;
        }
        self.stats.num_misses += 1;
        if self.stats.num_misses >= self.settings.miss_limit {
            self.phase = Phase::Menu;
            info!(
                "Miss limit reached ({} misses). Back to the menu.",
                self.stats.num_misses
            );
        }
    }

    fn record_hit(&mut self) {
        self.stats.num_hits += 1;
        // One ramp check per increment: a multi-hit frame can cross a
        // threshold at most once per hit, never skipping one.
        if self.stats.num_hits % self.settings.levelup_hits == 0 {
            self.settings.increase_speed();
        }
    }
}

/// Owns the session plus the terminal side: event polling, the frame grid
/// and the output target.
pub struct Game {
    session: Session,
    stdout_target: OutputTarget,
    input_tape: Option<InputTape>,
    max_frames: Option<u64>,
    grid: GameGrid,
}

impl Game {
    pub fn new(
        settings: Settings,
        stdout_target: OutputTarget,
        input_tape: Option<InputTape>,
        max_frames: Option<u64>,
    ) -> Self {
        let grid = GameGrid::new(settings.screen_width as u16, settings.screen_height as u16);
        Game {
            session: Session::new(settings),
            stdout_target,
            input_tape,
            max_frames,
            grid,
        }
    }

    pub fn run(&mut self) -> io::Result<()> {
        let mut running = true;
        let mut frame_count: u64 = 0;

        while running && self.max_frames.is_none_or(|max| frame_count < max) {
            let phase_before = self.session.phase;

            for event in self.poll_events(frame_count)? {
                self.handle_event(event, &mut running);
            }

            self.session.step();
            self.sync_mouse_capture(phase_before)?;
            self.render()?;

            frame_count += 1;
        }

        info!("Game loop ended after {frame_count} frames.");
        Ok(())
    }

    /// Drain everything pending this frame. The first poll carries the
    /// frame-pacing timeout; the rest are non-blocking.
    fn poll_events(&mut self, frame_count: u64) -> io::Result<Vec<Event>> {
        if let Some(tape) = &mut self.input_tape {
            return Ok(tape.next_events(frame_count));
        }

        let mut events = Vec::new();
        if event::poll(Duration::from_millis(EVENT_POLL_MS)).map_err(|e| {
            error!("Failed to poll event: {e}");
            e
        })? {
            events.push(event::read().map_err(|e| {
                error!("Failed to read event: {e}");
                e
            })?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }
        Ok(events)
    }

    fn handle_event(&mut self, event: Event, running: &mut bool) {
        match event {
            Event::Key(key) => match key.kind {
                KeyEventKind::Press => match key.code {
                    KeyCode::Char('q') => {
                        info!("Quit key pressed.");
                        *running = false;
                    }
                    // Raw mode swallows the interrupt signal; treat it as quit.
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        info!("Interrupted.");
                        *running = false;
                    }
                    KeyCode::Up => self.session.ship.moving_up = true,
                    KeyCode::Down => self.session.ship.moving_down = true,
                    KeyCode::Char(' ') => self.session.fire_bullet(),
                    _ => {}
                },
                KeyEventKind::Release => match key.code {
                    KeyCode::Up => self.session.ship.moving_up = false,
                    KeyCode::Down => self.session.ship.moving_down = false,
                    _ => {}
                },
                KeyEventKind::Repeat => {}
            },
            Event::Mouse(mouse) => {
                if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                    self.session.handle_click(mouse.column, mouse.row);
                }
            }
            _ => {}
        }
    }

    /// The pointer is captured (and so clickable) only while the Play
    /// button is up, mirroring the hidden-cursor rule of the active round.
    fn sync_mouse_capture(&mut self, phase_before: Phase) -> io::Result<()> {
        if phase_before == self.session.phase {
            return Ok(());
        }
        match self.session.phase {
            Phase::Playing => self.stdout_target.execute_other_command(DisableMouseCapture),
            Phase::Menu => self.stdout_target.execute_other_command(EnableMouseCapture),
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.grid.clear();

        self.session.ship.draw(&mut self.grid);
        for bullet in &self.session.bullets {
            bullet.draw(&mut self.grid);
        }
        self.session.target.draw(&mut self.grid);

        let hud = format!(
            "Hits: {}   Misses: {}/{}",
            self.session.stats.num_hits,
            self.session.stats.num_misses,
            self.session.settings.miss_limit
        );
        self.grid.draw_text(1, 0, &hud);

        if self.session.phase == Phase::Menu {
            self.session.play_button.draw(&mut self.grid);
            let help = "Click Play to start | Up/Down: move  Space: fire  q: quit";
            let help_x = (self.grid.width.saturating_sub(help.len() as u16)) / 2;
            let help_y = self.grid.height.saturating_sub(1);
            self.grid.draw_text(help_x, help_y, help);
        }

        self.grid.render(&mut self.stdout_target)?;
        self.stdout_target.flush()?;

        if let OutputTarget::ScreenBuffer(sb) = &self.stdout_target {
            sb.print_to_log();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::ScreenBuffer;
    use crate::terminal_io::demo_tape;

    fn session() -> Session {
        Session::new(Settings::new(80, 24))
    }

    /// Park the most recently fired bullet so that the next step lands its
    /// center at `x`, at height `y`.
    fn park_last_bullet(session: &mut Session, x: f64, y: f64) {
        let speed = session.settings.bullet_speed;
        let bullet = session.bullets.last_mut().unwrap();
        bullet.position.x = x - speed;
        bullet.position.y = y;
    }

    #[test]
    fn live_bullets_never_exceed_the_magazine() {
        let mut session = session();
        session.start_game();

        for _ in 0..10 {
            session.fire_bullet();
        }

        assert_eq!(session.bullets.len(), session.settings.bullets_allowed);
    }

    #[test]
    fn offscreen_bullet_counts_one_miss_and_is_removed() {
        let mut session = session();
        session.start_game();
        session.fire_bullet();
        let offscreen = session.settings.screen_width + 2.0;
        park_last_bullet(&mut session, offscreen, 2.0);

        session.step();

        assert_eq!(session.stats.num_misses, 1);
        assert_eq!(session.stats.num_hits, 0);
        assert!(session.bullets.is_empty());
    }

    #[test]
    fn three_misses_end_the_round_exactly_on_the_third() {
        let mut session = session();
        assert_eq!(session.settings.miss_limit, 3);
        session.start_game();

        let offscreen = session.settings.screen_width + 2.0;
        for miss in 1..=3 {
            session.fire_bullet();
            park_last_bullet(&mut session, offscreen, 2.0);
            session.step();

            assert_eq!(session.stats.num_misses, miss);
            if miss < 3 {
                assert_eq!(session.phase, Phase::Playing);
            } else {
                assert_eq!(session.phase, Phase::Menu);
            }
        }

        // Once over, nothing accrues any more.
        session.step();
        assert_eq!(session.stats.num_misses, 3);
    }

    #[test]
    fn each_overlapping_bullet_scores_exactly_one_hit() {
        let mut session = session();
        session.start_game();
        let (tx, ty) = (session.target.position.x, session.target.position.y);

        session.fire_bullet();
        park_last_bullet(&mut session, tx, ty);
        session.fire_bullet();
        park_last_bullet(&mut session, tx, ty - 1.0);

        session.step();

        assert_eq!(session.stats.num_hits, 2);
        assert_eq!(session.stats.num_misses, 0);
        assert!(session.bullets.is_empty());
    }

    #[test]
    fn two_hits_crossing_a_threshold_trigger_exactly_one_levelup() {
        let mut session = session();
        session.start_game();
        session.stats.num_hits = session.settings.levelup_hits - 1;
        let speed_before = session.settings.bullet_speed;
        let scale = session.settings.speedup_scale;
        let (tx, ty) = (session.target.position.x, session.target.position.y);

        session.fire_bullet();
        park_last_bullet(&mut session, tx, ty);
        session.fire_bullet();
        park_last_bullet(&mut session, tx, ty - 1.0);

        session.step();

        assert_eq!(session.stats.num_hits, session.settings.levelup_hits + 1);
        assert!((session.settings.bullet_speed - speed_before * scale).abs() < 1e-9);
    }

    #[test]
    fn five_cumulative_hits_speed_up_once() {
        let mut session = session();
        assert_eq!(session.settings.levelup_hits, 5);
        session.start_game();
        let ship_speed_before = session.settings.ship_speed;
        let scale = session.settings.speedup_scale;

        for hit in 1..=5 {
            session.fire_bullet();
            let (tx, ty) = (session.target.position.x, session.target.position.y);
            park_last_bullet(&mut session, tx, ty);
            session.step();
            assert_eq!(session.stats.num_hits, hit);
        }

        assert!((session.settings.ship_speed - ship_speed_before * scale).abs() < 1e-9);
    }

    #[test]
    fn start_game_resets_everything_regardless_of_prior_state() {
        let mut session = session();
        session.fire_bullet();
        session.stats.num_hits = 7;
        session.stats.num_misses = 2;
        session.ship.position.y = 3.0;
        session.target.position.y = 5.0;

        session.start_game();

        assert_eq!(session.phase, Phase::Playing);
        assert_eq!(session.stats.num_hits, 0);
        assert_eq!(session.stats.num_misses, 0);
        assert!(session.bullets.is_empty());
        assert_eq!(session.ship.position.y, session.settings.screen_height / 2.0);
        assert_eq!(
            session.target.position.y,
            session.settings.screen_height / 2.0
        );
        assert!(session.target.direction == 1.0 || session.target.direction == -1.0);
    }

    #[test]
    fn click_on_play_starts_only_from_the_menu() {
        let mut session = session();
        let (col, row) = (40, 12);
        assert!(session.play_button.contains(col, row));

        session.handle_click(0, 0);
        assert_eq!(session.phase, Phase::Menu);

        session.handle_click(col, row);
        assert_eq!(session.phase, Phase::Playing);

        // A click mid-round must not restart and wipe the tally.
        session.stats.num_hits = 3;
        session.handle_click(col, row);
        assert_eq!(session.phase, Phase::Playing);
        assert_eq!(session.stats.num_hits, 3);
    }

    #[test]
    fn menu_phase_freezes_the_simulation() {
        let mut session = session();
        session.fire_bullet();
        let x = session.bullets[0].position.x;

        session.step();

        assert_eq!(session.bullets[0].position.x, x);
        assert_eq!(session.stats.num_misses, 0);
    }

    #[test]
    fn scripted_debug_run_completes() {
        let settings = Settings::new(80, 24);
        let mut game = Game::new(
            settings,
            OutputTarget::ScreenBuffer(ScreenBuffer::new(80, 24)),
            Some(demo_tape(80, 24)),
            Some(200),
        );

        game.run().unwrap();

        let session = &game.session;
        assert!(session.stats.num_misses <= session.settings.miss_limit);
        assert!(session.bullets.len() <= session.settings.bullets_allowed);
    }
}
