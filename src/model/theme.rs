use indexmap::IndexMap;
use serde::Serialize;

/// Theme applied to a list when none is chosen
pub const DEFAULT_THEME: &str = "theme-blue";

/// An RGB color, serialized as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// How a theme paints a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ThemeStyle {
    Solid { primary: Rgb, secondary: Rgb },
    Image,
}

/// A registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Theme {
    pub name: &'static str,
    #[serde(flatten)]
    pub style: ThemeStyle,
}

impl Theme {
    /// Accent color for list indicators; image themes fall back to the default blue
    pub fn accent(&self) -> Rgb {
        match self.style {
            ThemeStyle::Solid { primary, .. } => primary,
            ThemeStyle::Image => Rgb(0x42, 0x85, 0xF4),
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB triple
pub fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Rgb(r, g, b))
}

const SOLID_THEMES: &[(&str, &str, &str, &str)] = &[
    ("theme-blue", "Blue", "#4285f4", "#1976d2"),
    ("theme-purple", "Purple", "#9c27b0", "#673ab7"),
    ("theme-pink", "Pink", "#e91e63", "#f06292"),
    ("theme-red", "Red", "#f44336", "#d32f2f"),
    ("theme-green", "Green", "#4caf50", "#388e3c"),
    ("theme-teal", "Teal", "#009688", "#00695c"),
    ("theme-gray", "Gray", "#607d8b", "#455a64"),
    ("theme-light-blue", "Light Blue", "#03a9f4", "#0288d1"),
    ("theme-light-purple", "Light Purple", "#ba68c8", "#9c27b0"),
    ("theme-orange", "Orange", "#ff9800", "#f57c00"),
    ("theme-peach", "Peach", "#ffab91", "#ff8a65"),
    ("theme-mint", "Mint", "#a5d6a7", "#66bb6a"),
    ("theme-sky", "Sky", "#81d4fa", "#4fc3f7"),
    ("theme-slate", "Slate", "#90a4ae", "#546e7a"),
    ("theme-forest", "Forest", "#2e7d32", "#1b5e20"),
];

const IMAGE_THEMES: &[(&str, &str)] = &[
    ("theme-nature", "Nature"),
    ("theme-ocean", "Ocean"),
    ("theme-sunset", "Sunset"),
    ("theme-mountain", "Mountain"),
];

/// The fixed, ordered set of list themes
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: IndexMap<&'static str, Theme>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        let mut themes = IndexMap::new();
        for &(key, name, primary, secondary) in SOLID_THEMES {
            // Static table; entries that fail to parse are skipped
            if let (Some(primary), Some(secondary)) =
                (parse_hex_color(primary), parse_hex_color(secondary))
            {
                themes.insert(
                    key,
                    Theme {
                        name,
                        style: ThemeStyle::Solid { primary, secondary },
                    },
                );
            }
        }
        for &(key, name) in IMAGE_THEMES {
            themes.insert(
                key,
                Theme {
                    name,
                    style: ThemeStyle::Image,
                },
            );
        }
        ThemeRegistry { themes }
    }
}

impl ThemeRegistry {
    pub fn get(&self, key: &str) -> Option<&Theme> {
        self.themes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.themes.contains_key(key)
    }

    /// Registry entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Theme)> {
        self.themes.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
