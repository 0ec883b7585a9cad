//! Theme system for the thread UI
//!
//! Themes are defined by 7 seed colors. All other colors are derived
//! automatically using `lerp/blend_over`. Individual derived colors can
//! be overridden for fine-tuning.

use std::path::Path;

use opentui::{Rgba, Style};
use serde::{Deserialize, Serialize};

/// Thread-specific color tokens
#[derive(Debug, Clone)]
pub struct ThreadTheme {
    pub author: Rgba,
    pub timestamp: Rgba,
    /// Quoted lines (`> ...`) inside a comment body
    pub quote: Rgba,
    /// Background of an open text editor
    pub editor_bg: Rgba,
    /// Badge for edited comments
    pub edited: Rgba,
    /// Badge and body text for deleted comments
    pub deleted: Rgba,
    /// Marker shown while a request is in flight
    pub pending: Rgba,
    /// Status badge colors
    pub open: Rgba,
    pub resolved: Rgba,
}

/// Complete theme definition
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base colors
    pub background: Rgba,
    pub foreground: Rgba,

    // UI chrome
    pub border: Rgba,
    pub border_focused: Rgba,
    pub panel_bg: Rgba,

    // Selection/highlighting
    pub selection_bg: Rgba,
    pub selection_fg: Rgba,
    pub cursor: Rgba,

    // Semantic colors
    pub primary: Rgba,
    pub success: Rgba,
    pub warning: Rgba,
    pub error: Rgba,
    pub muted: Rgba,

    pub thread: ThreadTheme,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

// ---------------------------------------------------------------------------
// Style token methods
// ---------------------------------------------------------------------------

impl Theme {
    /// `Style::fg(self.muted)`
    #[must_use]
    pub const fn style_muted(&self) -> Style {
        Style::fg(self.muted)
    }

    /// `Style::fg(self.muted).with_bg(bg)`
    #[must_use]
    pub const fn style_muted_on(&self, bg: Rgba) -> Style {
        Style::fg(self.muted).with_bg(bg)
    }

    /// `Style::fg(self.foreground)`
    #[must_use]
    pub const fn style_foreground(&self) -> Style {
        Style::fg(self.foreground)
    }

    /// `Style::fg(self.foreground).with_bg(bg)`
    #[must_use]
    pub const fn style_foreground_on(&self, bg: Rgba) -> Style {
        Style::fg(self.foreground).with_bg(bg)
    }

    /// `Style::fg(self.primary)`
    #[must_use]
    pub const fn style_primary(&self) -> Style {
        Style::fg(self.primary)
    }

    /// `Style::fg(self.primary).with_bg(bg)`
    #[must_use]
    pub const fn style_primary_on(&self, bg: Rgba) -> Style {
        Style::fg(self.primary).with_bg(bg)
    }
}

// ---------------------------------------------------------------------------
// Seed-based theme construction
// ---------------------------------------------------------------------------

/// The 7 seed colors that define a theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSeeds {
    pub background: String,
    pub foreground: String,
    pub primary: String,
    pub muted: String,
    pub success: String,
    pub warning: String,
    pub error: String,
}

/// Optional overrides for any derived color.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ThemeOverrides {
    pub panel_bg: Option<String>,
    pub selection_bg: Option<String>,
    pub selection_fg: Option<String>,
    pub border: Option<String>,
    pub border_focused: Option<String>,
    pub cursor: Option<String>,
    // Thread
    pub author: Option<String>,
    pub timestamp: Option<String>,
    pub quote: Option<String>,
    pub editor_bg: Option<String>,
    pub edited: Option<String>,
    pub deleted: Option<String>,
    pub pending: Option<String>,
}

/// Parsed seed colors.
#[derive(Debug, Clone, Copy)]
struct Seeds {
    background: Rgba,
    foreground: Rgba,
    primary: Rgba,
    muted: Rgba,
    success: Rgba,
    warning: Rgba,
    error: Rgba,
}

impl Seeds {
    fn parse(seeds: &ThemeSeeds) -> anyhow::Result<Self> {
        Ok(Self {
            background: parse_color(&seeds.background)?,
            foreground: parse_color(&seeds.foreground)?,
            primary: parse_color(&seeds.primary)?,
            muted: parse_color(&seeds.muted)?,
            success: parse_color(&seeds.success)?,
            warning: parse_color(&seeds.warning)?,
            error: parse_color(&seeds.error)?,
        })
    }

    /// Packed `0xRRGGBB` seeds, used for the built-in themes.
    fn from_packed(packed: [u32; 7]) -> Self {
        let [background, foreground, primary, muted, success, warning, error] =
            packed.map(rgb);
        Self {
            background,
            foreground,
            primary,
            muted,
            success,
            warning,
            error,
        }
    }
}

impl Theme {
    /// Build a complete theme from 7 seed colors, deriving everything else.
    ///
    /// # Errors
    ///
    /// Returns an error if any seed or override color string fails to parse.
    pub fn from_seeds(
        name: String,
        seeds: &ThemeSeeds,
        overrides: Option<&ThemeOverrides>,
    ) -> anyhow::Result<Self> {
        let mut theme = Self::derive(name, Seeds::parse(seeds)?);

        if let Some(ov) = overrides {
            apply_override(&mut theme.panel_bg, ov.panel_bg.as_ref())?;
            apply_override(&mut theme.selection_bg, ov.selection_bg.as_ref())?;
            apply_override(&mut theme.selection_fg, ov.selection_fg.as_ref())?;
            apply_override(&mut theme.border, ov.border.as_ref())?;
            apply_override(&mut theme.border_focused, ov.border_focused.as_ref())?;
            apply_override(&mut theme.cursor, ov.cursor.as_ref())?;

            let thread = &mut theme.thread;
            apply_override(&mut thread.author, ov.author.as_ref())?;
            apply_override(&mut thread.timestamp, ov.timestamp.as_ref())?;
            apply_override(&mut thread.quote, ov.quote.as_ref())?;
            apply_override(&mut thread.editor_bg, ov.editor_bg.as_ref())?;
            apply_override(&mut thread.edited, ov.edited.as_ref())?;
            apply_override(&mut thread.deleted, ov.deleted.as_ref())?;
            apply_override(&mut thread.pending, ov.pending.as_ref())?;
        }

        Ok(theme)
    }

    fn derive(name: String, seeds: Seeds) -> Self {
        let Seeds {
            background: bg,
            foreground: fg,
            primary,
            muted,
            success,
            warning,
            error,
        } = seeds;

        let thread = ThreadTheme {
            author: lerp(primary, fg, 0.2),
            timestamp: muted,
            quote: lerp(muted, fg, 0.3),
            editor_bg: blend_over(with_alpha(primary, 0.06), bg),
            edited: warning,
            deleted: lerp(error, muted, 0.4),
            pending: lerp(warning, fg, 0.2),
            open: success,
            resolved: muted,
        };

        Self {
            name,
            background: bg,
            foreground: fg,
            border: lerp(bg, fg, 0.15),
            border_focused: primary,
            panel_bg: lerp(bg, fg, 0.05),
            selection_bg: blend_over(with_alpha(primary, 0.25), bg),
            selection_fg: fg,
            cursor: fg,
            primary,
            success,
            warning,
            error,
            muted,
            thread,
        }
    }

    /// Default dark theme (Tokyo Night inspired).
    #[must_use]
    pub fn dark() -> Self {
        Self::derive("dark".to_string(), Seeds::from_packed(DARK))
    }

    /// Light theme variant.
    #[must_use]
    pub fn light() -> Self {
        Self::derive("light".to_string(), Seeds::from_packed(LIGHT))
    }

    /// Whether the background reads as dark.
    #[must_use]
    pub fn is_dark(&self) -> bool {
        luminance(self.background) < 0.5
    }
}

// ---------------------------------------------------------------------------
// JSON theme file format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeSeedFile {
    pub name: String,
    pub seeds: ThemeSeeds,
    #[serde(default)]
    pub overrides: Option<ThemeOverrides>,
}

// ---------------------------------------------------------------------------
// Color helpers
// ---------------------------------------------------------------------------

fn rgb(packed: u32) -> Rgba {
    let [_, r, g, b] = packed.to_be_bytes();
    Rgba::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        1.0,
    )
}

/// Parse `#rrggbb` or `#rrggbbaa`.
fn parse_hex(hex: &str) -> Option<Rgba> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !matches!(digits.len(), 6 | 8) || !digits.is_ascii() {
        return None;
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    let alpha = if digits.len() == 8 { channel(6)? } else { 1.0 };
    Some(Rgba::new(channel(0)?, channel(2)?, channel(4)?, alpha))
}

fn lerp(from: Rgba, to: Rgba, t: f32) -> Rgba {
    let mix = |a: f32, b: f32| (b - a).mul_add(t, a);
    Rgba::new(
        mix(from.r, to.r),
        mix(from.g, to.g),
        mix(from.b, to.b),
        mix(from.a, to.a),
    )
}

fn with_alpha(color: Rgba, alpha: f32) -> Rgba {
    Rgba::new(color.r, color.g, color.b, alpha)
}

/// Composite `top` over an opaque `bottom`.
fn blend_over(top: Rgba, bottom: Rgba) -> Rgba {
    let mix = |a: f32, b: f32| a.mul_add(top.a, b * (1.0 - top.a));
    Rgba::new(
        mix(top.r, bottom.r),
        mix(top.g, bottom.g),
        mix(top.b, bottom.b),
        1.0,
    )
}

fn luminance(color: Rgba) -> f32 {
    0.0722f32.mul_add(color.b, 0.2126f32.mul_add(color.r, 0.7152 * color.g))
}

fn parse_color(hex: &str) -> anyhow::Result<Rgba> {
    parse_hex(hex).ok_or_else(|| anyhow::anyhow!("Invalid hex color: {hex}"))
}

fn apply_override(target: &mut Rgba, source: Option<&String>) -> anyhow::Result<()> {
    if let Some(hex) = source {
        *target = parse_color(hex)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

// background, foreground, primary, muted, success, warning, error
const DARK: [u32; 7] = [
    0x1a1b26, 0xc0caf5, 0x7aa2f7, 0x565f89, 0x9ece6a, 0xe0af68, 0xf7768e,
];
const LIGHT: [u32; 7] = [
    0xd5d6db, 0x343b58, 0x34548a, 0x6a6f87, 0x485e30, 0x8f5e15, 0x8c4351,
];

const BUILTIN_THEMES: &[(&str, [u32; 7])] = &[
    ("dark", DARK),
    ("light", LIGHT),
    (
        "nord",
        [
            0x2e3440, 0xd8dee9, 0x88c0d0, 0x616e88, 0xa3be8c, 0xebcb8b, 0xbf616a,
        ],
    ),
    (
        "gruvbox",
        [
            0x282828, 0xebdbb2, 0x83a598, 0x928374, 0xb8bb26, 0xfabd2f, 0xfb4934,
        ],
    ),
    (
        "solarized",
        [
            0xfdf6e3, 0x586e75, 0x268bd2, 0x93a1a1, 0x859900, 0xb58900, 0xdc322f,
        ],
    ),
];

/// Load a theme from a JSON file on disk.
///
/// # Errors
///
/// Returns an error if the file cannot be read or contains invalid theme JSON.
pub fn load_theme_from_path(path: &Path) -> anyhow::Result<Theme> {
    let json = std::fs::read_to_string(path)?;
    load_theme_from_str(&json)
}

/// Parse a seed theme from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or contains invalid color values.
pub fn load_theme_from_str(json: &str) -> anyhow::Result<Theme> {
    let file: ThemeSeedFile = serde_json::from_str(json)?;
    Theme::from_seeds(file.name, &file.seeds, file.overrides.as_ref())
}

#[must_use]
pub fn load_built_in_theme(name: &str) -> Option<Theme> {
    BUILTIN_THEMES
        .iter()
        .find(|(theme_name, _)| *theme_name == name)
        .map(|(theme_name, seeds)| {
            Theme::derive((*theme_name).to_string(), Seeds::from_packed(*seeds))
        })
}

#[must_use]
pub fn built_in_theme_names() -> Vec<&'static str> {
    BUILTIN_THEMES.iter().map(|(name, _)| *name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn hex_parsing() {
        let c = parse_hex("#ff8000").unwrap();
        assert!(close(c.r, 1.0) && close(c.g, 128.0 / 255.0) && close(c.b, 0.0));
        assert!(close(c.a, 1.0));
        assert!(close(parse_hex("00000080").unwrap().a, 128.0 / 255.0));
        assert!(parse_hex("#fff").is_none());
        assert!(parse_hex("#gg0000").is_none());
    }

    #[test]
    fn blend_and_lerp() {
        let black = rgb(0x000000);
        let white = rgb(0xffffff);
        assert!(close(lerp(black, white, 0.5).r, 0.5));
        let over = blend_over(with_alpha(white, 0.25), black);
        assert!(close(over.g, 0.25) && close(over.a, 1.0));
        assert!(close(luminance(white), 1.0));
    }

    #[test]
    fn built_in_themes_load() {
        for name in built_in_theme_names() {
            let theme = load_built_in_theme(name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::dark().is_dark());
        assert!(!Theme::light().is_dark());
        assert!(load_built_in_theme("missing").is_none());
    }

    #[test]
    fn seed_file_with_overrides() {
        let theme = load_theme_from_str(
            r##"{
                "name": "custom",
                "seeds": {
                    "background": "#101010", "foreground": "#f0f0f0",
                    "primary": "#3366ff", "muted": "#808080",
                    "success": "#00ff00", "warning": "#ffff00", "error": "#ff0000"
                },
                "overrides": { "editorBg": "#000000" }
            }"##,
        )
        .unwrap();
        assert_eq!(theme.name, "custom");
        assert!(close(theme.thread.editor_bg.r, 0.0));
        assert!(close(theme.thread.open.g, 1.0));
    }

    #[test]
    fn bad_seed_is_an_error() {
        let err = load_theme_from_str(
            r#"{"name":"x","seeds":{"background":"nope","foreground":"#ffffff",
                "primary":"#ffffff","muted":"#ffffff","success":"#ffffff",
                "warning":"#ffffff","error":"#ffffff"}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }
}
