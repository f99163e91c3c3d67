//! One Dark theme (Atom)

use ratatui::style::Color;
use crate::theme::Theme;

pub fn default() -> Theme {
    Theme {
        bg0: Color::Rgb(0x28, 0x2c, 0x34),
        bg1: Color::Rgb(0x31, 0x35, 0x3f),
        bg2: Color::Rgb(0x3e, 0x44, 0x51),
        fg0: Color::Rgb(0xab, 0xb2, 0xbf),
        fg1: Color::Rgb(0xd7, 0xda, 0xe0),
        grey0: Color::Rgb(0x4b, 0x52, 0x63),
        grey1: Color::Rgb(0x5c, 0x63, 0x70),
        grey2: Color::Rgb(0x82, 0x89, 0x97),
        accent: Color::Rgb(0x61, 0xaf, 0xef),
        running: Color::Rgb(0x98, 0xc3, 0x79),
        suspended: Color::Rgb(0xe5, 0xc0, 0x7b),
        error: Color::Rgb(0xe0, 0x6c, 0x75),
        info: Color::Rgb(0x56, 0xb6, 0xc2),
    }
}
