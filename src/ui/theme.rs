use ratatui::style::Color;

/// Theme color palette defining all colors used in the application.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    // Primary colors
    pub primary: ColorSpec,
    pub secondary: ColorSpec,
    pub accent: ColorSpec,

    // Text colors
    pub text: ColorSpec,
    pub text_muted: ColorSpec,

    // Background colors
    pub background: ColorSpec,
    pub surface: ColorSpec,

    // Status colors
    pub success: ColorSpec,
    pub warning: ColorSpec,
    pub error: ColorSpec,
    pub info: ColorSpec,

    // UI element colors
    pub border_active: ColorSpec,
    pub border_normal: ColorSpec,
    pub highlight_bg: ColorSpec,
    pub highlight_fg: ColorSpec,
}

/// RGB color specification.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorSpec {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorSpec {
    pub const fn rgb(r: u8, g: u8, b: u8) -> ColorSpec {
        ColorSpec { r, g, b }
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }
}

const THEME_NAMES: [&str; 4] = ["tokyo-night", "dracula", "catppuccin-mocha", "rose-pine-dawn"];

impl Default for Theme {
    fn default() -> Self {
        Theme::tokyo_night()
    }
}

impl Theme {
    pub fn tokyo_night() -> Self {
        let blue = ColorSpec::rgb(125, 207, 255);
        let comment = ColorSpec::rgb(117, 121, 148);
        let background = ColorSpec::rgb(26, 27, 38);
        Theme {
            name: "tokyo-night".to_string(),
            primary: blue,
            secondary: ColorSpec::rgb(158, 206, 106),
            accent: ColorSpec::rgb(255, 159, 196),
            text: ColorSpec::rgb(169, 177, 214),
            text_muted: comment,
            background,
            surface: ColorSpec::rgb(36, 40, 59),
            success: ColorSpec::rgb(158, 206, 106),
            warning: ColorSpec::rgb(255, 202, 40),
            error: ColorSpec::rgb(247, 118, 142),
            info: blue,
            border_active: blue,
            border_normal: comment,
            highlight_bg: blue,
            highlight_fg: background,
        }
    }

    pub fn dracula() -> Self {
        let purple = ColorSpec::rgb(189, 147, 249);
        let comment = ColorSpec::rgb(98, 114, 164);
        let background = ColorSpec::rgb(40, 42, 54);
        Theme {
            name: "dracula".to_string(),
            primary: purple,
            secondary: ColorSpec::rgb(80, 250, 123),
            accent: ColorSpec::rgb(255, 121, 198),
            text: ColorSpec::rgb(248, 248, 242),
            text_muted: comment,
            background,
            surface: ColorSpec::rgb(68, 71, 90),
            success: ColorSpec::rgb(80, 250, 123),
            warning: ColorSpec::rgb(241, 250, 140),
            error: ColorSpec::rgb(255, 85, 85),
            info: ColorSpec::rgb(139, 233, 253),
            border_active: purple,
            border_normal: comment,
            highlight_bg: purple,
            highlight_fg: background,
        }
    }

    pub fn catppuccin_mocha() -> Self {
        let mauve = ColorSpec::rgb(203, 166, 247);
        let overlay = ColorSpec::rgb(108, 112, 134);
        let base = ColorSpec::rgb(30, 30, 46);
        Theme {
            name: "catppuccin-mocha".to_string(),
            primary: mauve,
            secondary: ColorSpec::rgb(166, 227, 161),
            accent: ColorSpec::rgb(245, 194, 231),
            text: ColorSpec::rgb(205, 214, 244),
            text_muted: overlay,
            background: base,
            surface: ColorSpec::rgb(49, 50, 68),
            success: ColorSpec::rgb(166, 227, 161),
            warning: ColorSpec::rgb(249, 226, 175),
            error: ColorSpec::rgb(243, 139, 168),
            info: ColorSpec::rgb(137, 180, 250),
            border_active: mauve,
            border_normal: overlay,
            highlight_bg: mauve,
            highlight_fg: base,
        }
    }

    pub fn rose_pine_dawn() -> Self {
        let iris = ColorSpec::rgb(144, 122, 169);
        let muted = ColorSpec::rgb(152, 147, 165);
        Theme {
            name: "rose-pine-dawn".to_string(),
            primary: iris,
            secondary: ColorSpec::rgb(86, 148, 159),
            accent: ColorSpec::rgb(215, 130, 126),
            text: ColorSpec::rgb(87, 82, 121),
            text_muted: muted,
            background: ColorSpec::rgb(250, 244, 237),
            surface: ColorSpec::rgb(255, 250, 243),
            success: ColorSpec::rgb(40, 105, 131),
            warning: ColorSpec::rgb(234, 157, 52),
            error: ColorSpec::rgb(180, 99, 122),
            info: ColorSpec::rgb(86, 148, 159),
            border_active: iris,
            border_normal: muted,
            highlight_bg: iris,
            highlight_fg: ColorSpec::rgb(250, 244, 237),
        }
    }

    /// Get theme by name.
    ///
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "tokyo-night" => Some(Self::tokyo_night()),
            "dracula" => Some(Self::dracula()),
            "catppuccin-mocha" => Some(Self::catppuccin_mocha()),
            "rose-pine-dawn" => Some(Self::rose_pine_dawn()),
            _ => None,
        }
    }

    /// Get list of all available theme names.
    ///
    pub fn available_themes() -> Vec<String> {
        THEME_NAMES.iter().map(|name| name.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_theme_resolves() {
        for name in Theme::available_themes() {
            let theme = Theme::from_name(&name).unwrap();
            assert_eq!(theme.name, name);
        }
        assert!(Theme::from_name("solarized").is_none());
    }

    #[test]
    fn default_is_tokyo_night() {
        assert_eq!(Theme::default().name, "tokyo-night");
        assert_eq!(
            Theme::default().primary.to_color(),
            Color::Rgb(125, 207, 255)
        );
    }
}
