//! Monokai theme

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        bg0: Color::Rgb(0x27, 0x28, 0x22),
        bg1: Color::Rgb(0x3e, 0x3d, 0x32),
        bg2: Color::Rgb(0x49, 0x48, 0x3e),
        fg0: Color::Rgb(0xf8, 0xf8, 0xf2),
        fg1: Color::Rgb(0xf8, 0xf8, 0xf0),
        grey0: Color::Rgb(0x49, 0x48, 0x3e),
        grey1: Color::Rgb(0x75, 0x71, 0x5e),
        grey2: Color::Rgb(0xa5, 0x9f, 0x85),
        accent: Color::Rgb(0x66, 0xd9, 0xef),
        running: Color::Rgb(0xa6, 0xe2, 0x2e),
        suspended: Color::Rgb(0xe6, 0xdb, 0x74),
        error: Color::Rgb(0xf9, 0x26, 0x72),
        info: Color::Rgb(0xae, 0x81, 0xff),
    }
}
