use serde::Serialize;

/// Fixed list palette. The first entry colors the lazily created default list.
pub const PALETTE: [&str; 10] = [
    "#ff4d6d", "#ffb84d", "#4dff4d", "#4db8ff", "#b84dff", "#ff4dff", "#ffff4d", "#b8ff4d",
    "#4dffff", "#ff944d",
];

/// Shown for tasks whose list cannot be resolved.
pub const UNASSIGNED_COLOR: &str = "#555555";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskList {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Resolves user input to its palette entry, ignoring case and surrounding space.
pub fn palette_color(raw: &str) -> Option<&'static str> {
    let wanted = raw.trim();
    PALETTE
        .iter()
        .copied()
        .find(|color| color.eq_ignore_ascii_case(wanted))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Parses `#rrggbb`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#')?;
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |index: usize| u8::from_str_radix(&digits[index..index + 2], 16).ok();
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    pub fn scaled(self, factor: f64) -> Self {
        let scale = |value: u8| (f64::from(value) * factor).round().clamp(0.0, 255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    pub fn to_css(self) -> String {
        format!("rgb({},{},{})", self.r, self.g, self.b)
    }
}
