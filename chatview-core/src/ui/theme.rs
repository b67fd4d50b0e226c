use anstyle::{Color, Effects, RgbColor, Style};
use anyhow::{Result, anyhow};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Identifier for the default theme.
pub const DEFAULT_THEME_ID: &str = "ciapre-dark";

const MIN_CONTRAST: f64 = 4.5;

const PRIMARY_ACCENT: RgbColor = RgbColor(0xD9, 0x9A, 0x4E);
const SECONDARY_ACCENT: RgbColor = RgbColor(0xBF, 0xB3, 0x8F);
const DARK_BACKGROUND: RgbColor = RgbColor(0x38, 0x3B, 0x73);
const BLUE_BACKGROUND: RgbColor = RgbColor(0x17, 0x1C, 0x26);
const ALERT_ACCENT: RgbColor = RgbColor(0xFF, 0x8A, 0x8A);
const ADDITION_ACCENT: RgbColor = RgbColor(0x8F, 0xC9, 0x7A);

const SOLARIZED_BASE3: RgbColor = RgbColor(0xFD, 0xF6, 0xE3);
const SOLARIZED_BASE01: RgbColor = RgbColor(0x58, 0x6E, 0x75);
const SOLARIZED_BLUE: RgbColor = RgbColor(0x26, 0x8B, 0xD2);
const SOLARIZED_CYAN: RgbColor = RgbColor(0x2A, 0xA1, 0x98);
const SOLARIZED_RED: RgbColor = RgbColor(0xDC, 0x32, 0x2F);
const SOLARIZED_GREEN: RgbColor = RgbColor(0x85, 0x99, 0x00);

const WHITE: RgbColor = RgbColor(0xFF, 0xFF, 0xFF);
const BLACK: RgbColor = RgbColor(0x00, 0x00, 0x00);

/// Blend of the background toward the accent used behind selected cells.
const SELECTION_ALPHA: f64 = 0.45;

/// Palette describing UI colors for the chat panel.
#[derive(Clone, Debug)]
pub struct ThemePalette {
    pub primary_accent: RgbColor,
    pub background: RgbColor,
    pub foreground: RgbColor,
    pub secondary_accent: RgbColor,
    pub alert: RgbColor,
    pub addition: RgbColor,
    /// Name of the bundled syntect theme used for fenced code.
    pub syntax_theme: &'static str,
}

impl ThemePalette {
    fn style_from(color: RgbColor, bold: bool) -> Style {
        let mut style = Style::new().fg_color(Some(Color::Rgb(color)));
        if bold {
            style = style.bold();
        }
        style
    }

    /// Derive every style the renderer, diff colorizer and selection overlay use.
    pub fn build_styles(&self) -> ThemeStyles {
        let primary = self.primary_accent;
        let background = self.background;
        let secondary = self.secondary_accent;
        let light = is_light(background);

        let text_color = ensure_contrast(
            self.foreground,
            background,
            MIN_CONTRAST,
            &[
                shift(self.foreground, light, 0.25),
                shift(secondary, light, 0.2),
                WHITE,
                BLACK,
            ],
        );
        let accent_color = ensure_contrast(
            primary,
            background,
            MIN_CONTRAST,
            &[
                shift(primary, light, 0.2),
                shift(secondary, light, 0.1),
                text_color,
            ],
        );
        let muted_color = ensure_contrast(
            mix(text_color, background, 0.3),
            background,
            MIN_CONTRAST,
            &[shift(secondary, light, 0.15), text_color],
        );
        let alert_color = ensure_contrast(
            self.alert,
            background,
            MIN_CONTRAST,
            &[shift(self.alert, light, 0.2), text_color],
        );
        let addition_color = ensure_contrast(
            self.addition,
            background,
            MIN_CONTRAST,
            &[shift(self.addition, light, 0.2), text_color],
        );
        let secondary_color = ensure_contrast(
            secondary,
            background,
            MIN_CONTRAST,
            &[shift(secondary, light, 0.2), text_color],
        );

        let selection_bg = mix(background, primary, SELECTION_ALPHA);
        let selection_fg = ensure_contrast(text_color, selection_bg, MIN_CONTRAST, &[WHITE, BLACK]);
        let flash_fg = ensure_contrast(background, primary, MIN_CONTRAST, &[BLACK, WHITE]);

        let heading = [
            Self::style_from(accent_color, true).effects(Effects::BOLD | Effects::UNDERLINE),
            Self::style_from(accent_color, true),
            Self::style_from(secondary_color, true),
            Self::style_from(text_color, true),
        ];

        ThemeStyles {
            heading,
            output: Self::style_from(text_color, false),
            list_bullet: Self::style_from(accent_color, false),
            blockquote: Self::style_from(muted_color, false),
            bold: Style::new().bold(),
            italic: Style::new().italic(),
            inline_code: Self::style_from(secondary_color, false),
            link_text: Self::style_from(accent_color, false).underline(),
            link_url: Self::style_from(muted_color, false),
            rule: Self::style_from(muted_color, false),
            table_border: Self::style_from(muted_color, false),
            table_header: Self::style_from(accent_color, true),
            tool_marker: Self::style_from(primary, true),
            tool_result: Self::style_from(muted_color, false),
            diff_added: Self::style_from(addition_color, false),
            diff_removed: Self::style_from(alert_color, false),
            diff_hunk: Self::style_from(secondary_color, false),
            diff_header: Self::style_from(accent_color, true),
            selection: Style::new()
                .fg_color(Some(Color::Rgb(selection_fg)))
                .bg_color(Some(Color::Rgb(selection_bg))),
            selection_flash: Style::new()
                .fg_color(Some(Color::Rgb(flash_fg)))
                .bg_color(Some(Color::Rgb(primary)))
                .bold(),
            background: Color::Rgb(background),
            foreground: Color::Rgb(text_color),
        }
    }
}

/// Styles computed from palette colors.
#[derive(Clone, Debug)]
pub struct ThemeStyles {
    /// Heading styles for `#` through `####`.
    pub heading: [Style; 4],
    pub output: Style,
    pub list_bullet: Style,
    pub blockquote: Style,
    pub bold: Style,
    pub italic: Style,
    pub inline_code: Style,
    pub link_text: Style,
    pub link_url: Style,
    pub rule: Style,
    pub table_border: Style,
    pub table_header: Style,
    pub tool_marker: Style,
    pub tool_result: Style,
    pub diff_added: Style,
    pub diff_removed: Style,
    pub diff_hunk: Style,
    pub diff_header: Style,
    pub selection: Style,
    pub selection_flash: Style,
    pub background: Color,
    pub foreground: Color,
}

impl ThemeStyles {
    /// Style for a heading of `level` hashes; deeper levels reuse the last.
    pub fn heading(&self, level: usize) -> Style {
        let index = level.clamp(1, self.heading.len()) - 1;
        self.heading[index]
    }
}

#[derive(Clone, Debug)]
pub struct ThemeDefinition {
    pub id: &'static str,
    pub label: &'static str,
    pub palette: ThemePalette,
}

static REGISTRY: Lazy<HashMap<&'static str, ThemeDefinition>> = Lazy::new(|| {
    let mut map = HashMap::new();
    map.insert(
        "ciapre-dark",
        ThemeDefinition {
            id: "ciapre-dark",
            label: "Ciapre Dark",
            palette: ThemePalette {
                primary_accent: PRIMARY_ACCENT,
                background: DARK_BACKGROUND,
                foreground: SECONDARY_ACCENT,
                secondary_accent: SECONDARY_ACCENT,
                alert: ALERT_ACCENT,
                addition: ADDITION_ACCENT,
                syntax_theme: "base16-mocha.dark",
            },
        },
    );
    map.insert(
        "ciapre-blue",
        ThemeDefinition {
            id: "ciapre-blue",
            label: "Ciapre Blue",
            palette: ThemePalette {
                primary_accent: PRIMARY_ACCENT,
                background: BLUE_BACKGROUND,
                foreground: SECONDARY_ACCENT,
                secondary_accent: SECONDARY_ACCENT,
                alert: ALERT_ACCENT,
                addition: ADDITION_ACCENT,
                syntax_theme: "base16-ocean.dark",
            },
        },
    );
    map.insert(
        "solarized-light",
        ThemeDefinition {
            id: "solarized-light",
            label: "Solarized Light",
            palette: ThemePalette {
                primary_accent: SOLARIZED_BLUE,
                background: SOLARIZED_BASE3,
                foreground: SOLARIZED_BASE01,
                secondary_accent: SOLARIZED_CYAN,
                alert: SOLARIZED_RED,
                addition: SOLARIZED_GREEN,
                syntax_theme: "Solarized (light)",
            },
        },
    );
    map
});

/// A resolved theme: palette plus derived styles.
///
/// Built once by the caller and passed by reference into the renderer,
/// the highlighter and the selection engine.
#[derive(Clone, Debug)]
pub struct Theme {
    id: &'static str,
    label: &'static str,
    palette: ThemePalette,
    styles: ThemeStyles,
}

impl Theme {
    /// Build a theme from its registry identifier (case-insensitive).
    pub fn from_id(theme_id: &str) -> Result<Self> {
        let id_lc = theme_id.trim().to_lowercase();
        let definition = REGISTRY
            .get(id_lc.as_str())
            .ok_or_else(|| anyhow!("Unknown theme '{theme_id}'"))?;
        Ok(Self::from_definition(definition))
    }

    fn from_definition(definition: &ThemeDefinition) -> Self {
        Self {
            id: definition.id,
            label: definition.label,
            styles: definition.palette.build_styles(),
            palette: definition.palette.clone(),
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn palette(&self) -> &ThemePalette {
        &self.palette
    }

    pub fn styles(&self) -> &ThemeStyles {
        &self.styles
    }

    /// Syntect theme name this palette pairs with.
    pub fn syntax_theme(&self) -> &'static str {
        self.palette.syntax_theme
    }
}

impl Default for Theme {
    fn default() -> Self {
        match REGISTRY.get(DEFAULT_THEME_ID) {
            Some(definition) => Self::from_definition(definition),
            None => {
                let palette = ThemePalette {
                    primary_accent: PRIMARY_ACCENT,
                    background: DARK_BACKGROUND,
                    foreground: SECONDARY_ACCENT,
                    secondary_accent: SECONDARY_ACCENT,
                    alert: ALERT_ACCENT,
                    addition: ADDITION_ACCENT,
                    syntax_theme: "base16-mocha.dark",
                };
                Self {
                    id: DEFAULT_THEME_ID,
                    label: "Ciapre Dark",
                    styles: palette.build_styles(),
                    palette,
                }
            }
        }
    }
}

/// Enumerate available theme identifiers.
pub fn available_themes() -> Vec<&'static str> {
    let mut keys: Vec<_> = REGISTRY.keys().copied().collect();
    keys.sort();
    keys
}

/// Look up a theme label for display.
pub fn theme_label(theme_id: &str) -> Option<&'static str> {
    REGISTRY.get(theme_id).map(|definition| definition.label)
}

/// Resolve a theme identifier from configuration or CLI input.
pub fn resolve_theme(preferred: Option<String>) -> String {
    preferred
        .and_then(|candidate| {
            let trimmed = candidate.trim().to_lowercase();
            if trimmed.is_empty() {
                None
            } else if REGISTRY.contains_key(trimmed.as_str()) {
                Some(trimmed)
            } else {
                None
            }
        })
        .unwrap_or_else(|| DEFAULT_THEME_ID.to_string())
}

fn relative_luminance(color: RgbColor) -> f64 {
    fn channel(value: u8) -> f64 {
        let c = (value as f64) / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    let r = channel(color.0);
    let g = channel(color.1);
    let b = channel(color.2);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

fn contrast_ratio(foreground: RgbColor, background: RgbColor) -> f64 {
    let fg = relative_luminance(foreground);
    let bg = relative_luminance(background);
    let (lighter, darker) = if fg > bg { (fg, bg) } else { (bg, fg) };
    (lighter + 0.05) / (darker + 0.05)
}

fn ensure_contrast(
    candidate: RgbColor,
    background: RgbColor,
    min_ratio: f64,
    fallbacks: &[RgbColor],
) -> RgbColor {
    if contrast_ratio(candidate, background) >= min_ratio {
        return candidate;
    }
    for &fallback in fallbacks {
        if contrast_ratio(fallback, background) >= min_ratio {
            return fallback;
        }
    }
    candidate
}

fn mix(color: RgbColor, target: RgbColor, ratio: f64) -> RgbColor {
    let ratio = ratio.clamp(0.0, 1.0);
    let blend = |c: u8, t: u8| -> u8 {
        let c = c as f64;
        let t = t as f64;
        ((c + (t - c) * ratio).round()).clamp(0.0, 255.0) as u8
    };
    RgbColor(
        blend(color.0, target.0),
        blend(color.1, target.1),
        blend(color.2, target.2),
    )
}

fn is_light(background: RgbColor) -> bool {
    relative_luminance(background) > 0.5
}

/// Move `color` away from the background: darker on light themes, lighter on dark ones.
fn shift(color: RgbColor, light_background: bool, ratio: f64) -> RgbColor {
    if light_background {
        mix(color, BLACK, ratio)
    } else {
        mix(color, WHITE, ratio)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fg(style: Style) -> RgbColor {
        match style.get_fg_color() {
            Some(Color::Rgb(color)) => color,
            other => panic!("expected rgb foreground, got {other:?}"),
        }
    }

    #[test]
    fn test_from_id_is_case_insensitive() {
        let theme = Theme::from_id(" Ciapre-Blue ").unwrap();
        assert_eq!(theme.id(), "ciapre-blue");
        assert_eq!(theme.label(), "Ciapre Blue");
        assert!(Theme::from_id("nope").is_err());
    }

    #[test]
    fn test_default_theme() {
        let theme = Theme::default();
        assert_eq!(theme.id(), DEFAULT_THEME_ID);
        assert_eq!(theme.syntax_theme(), "base16-mocha.dark");
    }

    #[test]
    fn test_resolve_theme_falls_back() {
        assert_eq!(resolve_theme(None), DEFAULT_THEME_ID);
        assert_eq!(resolve_theme(Some("  ".into())), DEFAULT_THEME_ID);
        assert_eq!(resolve_theme(Some("unknown".into())), DEFAULT_THEME_ID);
        assert_eq!(
            resolve_theme(Some("SOLARIZED-LIGHT".into())),
            "solarized-light"
        );
    }

    #[test]
    fn test_available_themes_sorted() {
        assert_eq!(
            available_themes(),
            vec!["ciapre-blue", "ciapre-dark", "solarized-light"]
        );
        assert_eq!(theme_label("solarized-light"), Some("Solarized Light"));
    }

    #[test]
    fn test_text_styles_meet_contrast_floor() {
        for id in available_themes() {
            let theme = Theme::from_id(id).unwrap();
            let background = theme.palette().background;
            let styles = theme.styles();
            for style in [styles.output, styles.heading(1), styles.diff_added, styles.diff_removed] {
                assert!(
                    contrast_ratio(fg(style), background) >= MIN_CONTRAST,
                    "{id} fails contrast"
                );
            }
        }
    }

    #[test]
    fn test_heading_levels_clamp() {
        let styles = Theme::default().styles().clone();
        assert_eq!(styles.heading(0), styles.heading[0]);
        assert_eq!(styles.heading(9), styles.heading[3]);
    }

    #[test]
    fn test_selection_styles_have_background() {
        let styles = Theme::default().styles().clone();
        assert!(styles.selection.get_bg_color().is_some());
        assert!(styles.selection_flash.get_bg_color().is_some());
        assert_ne!(styles.selection, styles.selection_flash);
    }
}
