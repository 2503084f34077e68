use ratatui::style::Color;

use crate::diff::FileStatus;
use crate::domain::Tone;

// Backgrounds
pub const BG_DARK: Color = Color::Rgb(13, 13, 23);
pub const BG_BAR: Color = Color::Rgb(17, 17, 30);
pub const BG_SURFACE: Color = Color::Rgb(22, 22, 38);
pub const BG_HIGHLIGHT: Color = Color::Rgb(30, 30, 58);

// Primary accent
pub const INDIGO: Color = Color::Rgb(99, 102, 241);

// Text
pub const TEXT: Color = Color::Rgb(220, 220, 230);
pub const TEXT_DIM: Color = Color::Rgb(130, 130, 155);
pub const TEXT_MUTED: Color = Color::Rgb(75, 75, 100);

// Semantic
pub const GREEN: Color = Color::Rgb(52, 211, 153);
pub const BLUE: Color = Color::Rgb(96, 165, 250);
pub const RED: Color = Color::Rgb(248, 113, 113);
pub const YELLOW: Color = Color::Rgb(251, 191, 36);

// Diff
pub const OLD_VALUE: Color = RED;
pub const NEW_VALUE: Color = GREEN;

pub fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => GREEN,
        Tone::Neutral => BLUE,
        Tone::Negative => RED,
    }
}

pub fn file_status_color(status: FileStatus) -> Color {
    match status {
        FileStatus::Removed => RED,
        FileStatus::Added => GREEN,
        FileStatus::Kept => TEXT_DIM,
    }
}
