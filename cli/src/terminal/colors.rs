use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::BrightYellow;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;

pub const ADDRESS: Color = Color::BrightCyan;
pub const RESOLUTION: Color = Color::BrightMagenta;
pub const STREAM_URI: Color = Color::BrightBlue;
pub const MISSING: Color = Color::Red;
