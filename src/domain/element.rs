/// Cell element catalog and its properties.
/// The glyph doubles as the element's type tag, so type queries are
/// methods comparing glyphs — semantics stay centralized here.

use crossterm::style::Color;

/// One grid cell's descriptor: glyph, colors, and whether it blocks entry.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Element {
    pub symbol: char,
    pub fg: Color,
    pub bg: Color,
    pub solid: bool,
}

impl Element {
    pub const PLAYER: Element = Element {
        symbol: '☺',
        fg: Color::Cyan,
        bg: Color::Reset,
        solid: true,
    };
    pub const ENEMY: Element = Element {
        symbol: '☠',
        fg: Color::Red,
        bg: Color::Reset,
        solid: true,
    };
    pub const WALL: Element = Element {
        symbol: '▤',
        fg: Color::Grey,
        bg: Color::DarkGrey,
        solid: true,
    };
    pub const VEGETATION: Element = Element {
        symbol: '♣',
        fg: Color::Green,
        bg: Color::Reset,
        solid: false,
    };
    pub const EMPTY: Element = Element {
        symbol: ' ',
        fg: Color::Reset,
        bg: Color::Reset,
        solid: false,
    };
    /// Static trap: always armed, never blocks entry, ends the game on entry.
    pub const TRAP: Element = Element {
        symbol: '*',
        fg: Color::Red,
        bg: Color::Reset,
        solid: false,
    };
    /// Stepping on it activates every portal on the map.
    pub const PRESSURE_PLATE: Element = Element {
        symbol: '.',
        fg: Color::DarkGrey,
        bg: Color::Reset,
        solid: false,
    };
    pub const PORTAL_CLOSED: Element = Element {
        symbol: '⬱',
        fg: Color::Green,
        bg: Color::Reset,
        solid: true,
    };
    pub const PORTAL_OPEN: Element = Element {
        symbol: 'O',
        fg: Color::Green,
        bg: Color::Reset,
        solid: false,
    };

    /// Does this element block entry into its cell?
    pub fn blocks_entry(self) -> bool {
        self.solid
    }

    pub fn is_enemy(self) -> bool {
        self.symbol == Self::ENEMY.symbol
    }

    pub fn is_trap(self) -> bool {
        self.symbol == Self::TRAP.symbol
    }

    pub fn is_pressure_plate(self) -> bool {
        self.symbol == Self::PRESSURE_PLATE.symbol
    }

    pub fn is_closed_portal(self) -> bool {
        self.symbol == Self::PORTAL_CLOSED.symbol
    }

    pub fn is_open_portal(self) -> bool {
        self.symbol == Self::PORTAL_OPEN.symbol
    }
}

impl Default for Element {
    fn default() -> Self {
        Element::EMPTY
    }
}
