//! Built-in theme shop catalog.
//!
//! The ledger only knows theme ids and prices handed to it; this catalog is
//! where the CLI looks those prices up.

use serde::Serialize;

/// Theme every profile owns and starts with.
pub const DEFAULT_THEME_ID: &str = "default";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub id: &'static str,
    pub name: &'static str,
    pub cost: u64,
    /// Accent colour as `#rrggbb`.
    pub color: &'static str,
}

pub static CATALOG: [Theme; 4] = [
    Theme {
        id: DEFAULT_THEME_ID,
        name: "Cyberpunk",
        cost: 0,
        color: "#d600ff",
    },
    Theme {
        id: "matrix",
        name: "Matrix",
        cost: 50,
        color: "#00ff00",
    },
    Theme {
        id: "ice",
        name: "Ice",
        cost: 100,
        color: "#00ffff",
    },
    Theme {
        id: "gold",
        name: "Midas",
        cost: 500,
        color: "#ffd700",
    },
];

pub fn find(id: &str) -> Option<&'static Theme> {
    CATALOG.iter().find(|theme| theme.id == id)
}
