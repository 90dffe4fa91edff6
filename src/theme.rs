use catppuccin::PALETTE;
use ratatui::style::Color;
use tracing::warn;

/// Convert a catppuccin color to a ratatui color.
const fn catppuccin_to_color(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Names accepted in `[theme] name`.
pub const THEME_NAMES: &[&str] = &[
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappe",
    "Catppuccin Latte",
];

/// Application colors.
///
/// Only the palette slots the UI actually paints with are kept. The shop's
/// brand accent is `pink`; selection and focus use `lavender`.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub surface0: Color,
    pub surface1: Color,
    pub surface2: Color,
    pub overlay0: Color,
    pub overlay1: Color,
    pub text: Color,
    pub subtext0: Color,
    pub subtext1: Color,
    pub pink: Color,
    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub green: Color,
    pub blue: Color,
    pub lavender: Color,
}

impl Theme {
    const fn from_catppuccin(flavor: &catppuccin::Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: catppuccin_to_color(&c.base),
            surface0: catppuccin_to_color(&c.surface0),
            surface1: catppuccin_to_color(&c.surface1),
            surface2: catppuccin_to_color(&c.surface2),
            overlay0: catppuccin_to_color(&c.overlay0),
            overlay1: catppuccin_to_color(&c.overlay1),
            text: catppuccin_to_color(&c.text),
            subtext0: catppuccin_to_color(&c.subtext0),
            subtext1: catppuccin_to_color(&c.subtext1),
            pink: catppuccin_to_color(&c.pink),
            mauve: catppuccin_to_color(&c.mauve),
            red: catppuccin_to_color(&c.red),
            peach: catppuccin_to_color(&c.peach),
            green: catppuccin_to_color(&c.green),
            blue: catppuccin_to_color(&c.blue),
            lavender: catppuccin_to_color(&c.lavender),
        }
    }

    #[must_use]
    pub fn catppuccin_mocha() -> Self {
        Self::from_catppuccin(&PALETTE.mocha)
    }

    #[must_use]
    pub fn catppuccin_macchiato() -> Self {
        Self::from_catppuccin(&PALETTE.macchiato)
    }

    #[must_use]
    pub fn catppuccin_frappe() -> Self {
        Self::from_catppuccin(&PALETTE.frappe)
    }

    #[must_use]
    pub fn catppuccin_latte() -> Self {
        Self::from_catppuccin(&PALETTE.latte)
    }

    #[must_use]
    pub const fn base(&self) -> Color {
        self.base
    }

    #[must_use]
    pub const fn surface0(&self) -> Color {
        self.surface0
    }

    #[must_use]
    pub const fn surface1(&self) -> Color {
        self.surface1
    }

    #[must_use]
    pub const fn surface2(&self) -> Color {
        self.surface2
    }

    #[must_use]
    pub const fn overlay0(&self) -> Color {
        self.overlay0
    }

    #[must_use]
    pub const fn overlay1(&self) -> Color {
        self.overlay1
    }

    #[must_use]
    pub const fn text(&self) -> Color {
        self.text
    }

    #[must_use]
    pub const fn subtext0(&self) -> Color {
        self.subtext0
    }

    #[must_use]
    pub const fn subtext1(&self) -> Color {
        self.subtext1
    }

    #[must_use]
    pub const fn pink(&self) -> Color {
        self.pink
    }

    #[must_use]
    pub const fn mauve(&self) -> Color {
        self.mauve
    }

    #[must_use]
    pub const fn red(&self) -> Color {
        self.red
    }

    #[must_use]
    pub const fn peach(&self) -> Color {
        self.peach
    }

    #[must_use]
    pub const fn green(&self) -> Color {
        self.green
    }

    #[must_use]
    pub const fn blue(&self) -> Color {
        self.blue
    }

    #[must_use]
    pub const fn lavender(&self) -> Color {
        self.lavender
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::catppuccin_mocha()
    }
}

/// Resolve a theme by its configured name, falling back to Mocha.
#[must_use]
pub fn theme_from_name(name: &str) -> Theme {
    match name.trim().to_lowercase().as_str() {
        "catppuccin mocha" | "mocha" => Theme::catppuccin_mocha(),
        "catppuccin macchiato" | "macchiato" => Theme::catppuccin_macchiato(),
        "catppuccin frappe" | "catppuccin frappé" | "frappe" => Theme::catppuccin_frappe(),
        "catppuccin latte" | "latte" => Theme::catppuccin_latte(),
        other => {
            warn!(theme = other, "Unknown theme, falling back to Catppuccin Mocha");
            Theme::catppuccin_mocha()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_from_name_is_case_insensitive() {
        assert_eq!(theme_from_name("catppuccin LATTE").base, Theme::catppuccin_latte().base);
        assert_eq!(theme_from_name("Frappe").base, Theme::catppuccin_frappe().base);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_mocha() {
        assert_eq!(theme_from_name("solarized").base, Theme::catppuccin_mocha().base);
    }

    #[test]
    fn test_every_listed_name_resolves() {
        for name in THEME_NAMES {
            let theme = theme_from_name(name);
            assert_ne!(theme.base, theme.text, "{name} should be a real palette");
        }
    }
}
