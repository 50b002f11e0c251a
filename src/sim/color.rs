//! The four gate/player colors

use serde::{Deserialize, Serialize};

/// A selectable color. Each one owns a lane on the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorChoice {
    #[default]
    Red,
    Orange,
    Yellow,
    Blue,
}

impl ColorChoice {
    /// All colors in lane order (bottom lane first)
    pub const ALL: [ColorChoice; 4] = [
        ColorChoice::Red,
        ColorChoice::Orange,
        ColorChoice::Yellow,
        ColorChoice::Blue,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn index(self) -> usize {
        match self {
            ColorChoice::Red => 0,
            ColorChoice::Orange => 1,
            ColorChoice::Yellow => 2,
            ColorChoice::Blue => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Single-letter code shown on gates and bound to keys
    pub fn code(self) -> char {
        match self {
            ColorChoice::Red => 'R',
            ColorChoice::Orange => 'O',
            ColorChoice::Yellow => 'Y',
            ColorChoice::Blue => 'B',
        }
    }

    /// Look up a color by code (case-insensitive). Unknown codes yield None.
    pub fn from_code(code: char) -> Option<Self> {
        let code = code.to_ascii_uppercase();
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorChoice::Red => "Red",
            ColorChoice::Orange => "Orange",
            ColorChoice::Yellow => "Yellow",
            ColorChoice::Blue => "Blue",
        }
    }

    /// Display color as 0xRRGGBB
    pub fn rgb(self) -> u32 {
        match self {
            ColorChoice::Red => 0xff0000,
            ColorChoice::Orange => 0xff6b00,
            ColorChoice::Yellow => 0xffff00,
            ColorChoice::Blue => 0x0066ff,
        }
    }

    /// Next color in lane order, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::COUNT]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        for color in ColorChoice::ALL {
            assert_eq!(ColorChoice::from_code(color.code()), Some(color));
            assert_eq!(ColorChoice::from_index(color.index()), Some(color));
        }
        assert_eq!(ColorChoice::from_code('y'), Some(ColorChoice::Yellow));
        assert_eq!(ColorChoice::from_code('X'), None);
    }

    #[test]
    fn next_wraps() {
        assert_eq!(ColorChoice::Red.next(), ColorChoice::Orange);
        assert_eq!(ColorChoice::Blue.next(), ColorChoice::Red);
    }
}
