use colored::Color;

pub const PRIMARY: Color = Color::BrightGreen;
pub const ACCENT: Color = Color::Cyan;
pub const SEPARATOR: Color = Color::BrightBlack;
pub const TEXT_DEFAULT: Color = Color::White;
pub const IPV6_ADDR: Color = Color::BrightBlue;

pub const PASSED: Color = Color::Green;
pub const SKIPPED: Color = Color::Yellow;
pub const FAILED: Color = Color::Red;
