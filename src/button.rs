use crate::constants::*;
use crate::rendering::GameGrid;
use crate::settings::Settings;
use crate::types::Rect;

/// The Play button: a fixed centered box that is only drawn, and only
/// clickable, while no game is running.
pub struct Button {
    pub rect: Rect,
    pub label: &'static str,
}

impl Button {
    pub fn new(settings: &Settings) -> Self {
        Button {
            rect: Rect::centered(
                settings.screen_width / 2.0,
                settings.screen_height / 2.0,
                BUTTON_WIDTH as f64,
                BUTTON_HEIGHT as f64,
            ),
            label: BUTTON_LABEL,
        }
    }

    /// Hit-test a mouse press, given in cell coordinates.
    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.rect.contains(column as f64, row as f64)
    }

    pub fn draw(&self, game_grid: &mut GameGrid) {
        let left = self.rect.left.round() as u16;
        let top = self.rect.top.round() as u16;
        let width = self.rect.width.round() as u16;
        let height = self.rect.height.round() as u16;

        for col in 0..width {
            game_grid.set_char(left + col, top, '-');
            game_grid.set_char(left + col, top + height - 1, '-');
        }
        for row in 0..height {
            game_grid.set_char(left, top + row, '|');
            game_grid.set_char(left + width - 1, top + row, '|');
        }
        for &(col, row) in &[(0, 0), (width - 1, 0), (0, height - 1), (width - 1, height - 1)] {
            game_grid.set_char(left + col, top + row, '+');
        }

        let label_x = left + (width.saturating_sub(self.label.len() as u16)) / 2;
        let label_y = top + height / 2;
        game_grid.draw_text(label_x, label_y, self.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_accepts_center_and_rejects_outside() {
        let settings = Settings::new(80, 24);
        let button = Button::new(&settings);

        assert!(button.contains(40, 12));
        assert!(!button.contains(0, 0));
        assert!(!button.contains(79, 23));
    }

    #[test]
    fn contains_tracks_the_button_edges() {
        let settings = Settings::new(80, 24);
        let button = Button::new(&settings);

        let left = button.rect.left as u16;
        let right = button.rect.right() as u16;
        let row = button.rect.top as u16 + 1;

        assert!(button.contains(left, row));
        assert!(!button.contains(right, row));
    }
}
