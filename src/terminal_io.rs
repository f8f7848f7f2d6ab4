use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

/// Scripted input for --debug runs: a tape of (frame, event) pairs replayed
/// in place of the real terminal.
pub struct InputTape {
    events: Vec<(u64, Event)>,
}

impl InputTape {
    pub fn new(mut events: Vec<(u64, Event)>) -> Self {
        events.sort_by_key(|&(frame, _)| frame);
        InputTape { events }
    }

    /// Drain every event scheduled for `frame`.
    pub fn next_events(&mut self, frame: u64) -> Vec<Event> {
        let mut due = Vec::new();
        self.events.retain(|&(event_frame, ref event)| {
            if event_frame == frame {
                due.push(event.clone());
                false
            } else {
                true
            }
        });
        due
    }
}

fn press(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn release(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new_with_kind(
        code,
        KeyModifiers::NONE,
        KeyEventKind::Release,
    ))
}

fn left_click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

/// The canned session used by --debug: click Play, wander up and down,
/// fire a few rounds, quit.
pub fn demo_tape(screen_width: u16, screen_height: u16) -> InputTape {
    InputTape::new(vec![
        (2, left_click(screen_width / 2, screen_height / 2)),
        (4, press(KeyCode::Up)),
        (8, press(KeyCode::Char(' '))),
        (18, release(KeyCode::Up)),
        (20, press(KeyCode::Down)),
        (26, press(KeyCode::Char(' '))),
        (44, release(KeyCode::Down)),
        (60, press(KeyCode::Char(' '))),
        (120, press(KeyCode::Char('q'))),
    ])
}
