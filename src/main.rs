use std::env;
use std::io;

use crossterm::{
    cursor::{Hide, Show},
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        Clear, ClearType, disable_raw_mode, enable_raw_mode, size, supports_keyboard_enhancement,
    },
};
use log::{error, info, warn};

mod button;
mod constants;
mod entities;
mod game;
mod rendering;
mod settings;
mod stats;
mod terminal_io;
mod types;

use game::Game;
use rendering::{OutputTarget, ScreenBuffer};
use settings::Settings;
use terminal_io::demo_tape;

fn main() -> io::Result<()> {
    simple_logging::log_to_file("target-practice.log", log::LevelFilter::Info)?;
    info!("Starting Target Practice.");

    let args: Vec<String> = env::args().collect();
    let debug_mode_active = args.len() > 1 && args[1] == "--debug";

    if debug_mode_active {
        // Headless run: scripted input, frames dumped to the log.
        let width = args.get(2).and_then(|a| a.parse().ok()).unwrap_or(80);
        let height = args.get(3).and_then(|a| a.parse().ok()).unwrap_or(24);
        let max_frames = args.get(4).and_then(|a| a.parse().ok()).unwrap_or(200);
        info!("Debug mode: {width}x{height}, up to {max_frames} frames.");

        let mut game = Game::new(
            Settings::new(width, height),
            OutputTarget::ScreenBuffer(ScreenBuffer::new(width, height)),
            Some(demo_tape(width, height)),
            Some(max_frames),
        );
        return game.run();
    }

    enable_raw_mode().map_err(|e| {
        error!("Failed to enable raw mode: {e}");
        e
    })?;
    let (width, height) = size().map_err(|e| {
        error!("Failed to get terminal size: {e}");
        e
    })?;
    info!("Terminal size: {width}x{height}");

    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), Hide, EnableMouseCapture)?;

    let key_release_supported = supports_keyboard_enhancement().unwrap_or(false);
    if key_release_supported {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    } else {
        warn!("Terminal does not report key releases; movement keys stay held until quit.");
    }

    let mut game = Game::new(
        Settings::new(width, height),
        OutputTarget::Stdout(stdout),
        None,
        None,
    );
    let result = game.run();

    let restored = restore_terminal(key_release_supported);
    info!("Exiting.");
    result.and(restored)
}

fn restore_terminal(key_release_supported: bool) -> io::Result<()> {
    let mut stdout = io::stdout();
    if key_release_supported {
        execute!(stdout, PopKeyboardEnhancementFlags)?;
    }
    execute!(stdout, DisableMouseCapture, Show, Clear(ClearType::All))?;
    disable_raw_mode()
}
