// colors for the tui

use crate::Emotion;
use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeKind {
    Dark,
    Light,
    Nord,
    CatppuccinMocha,
    CatppuccinLatte,
    RosePine,
    RosePineDawn,
}

impl ThemeKind {
    pub const ALL: &'static [ThemeKind] = &[
        Self::Dark,
        Self::Light,
        Self::Nord,
        Self::CatppuccinMocha,
        Self::CatppuccinLatte,
        Self::RosePine,
        Self::RosePineDawn,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
            Self::Nord => "nord",
            Self::CatppuccinMocha => "catppuccin mocha",
            Self::CatppuccinLatte => "catppuccin latte",
            Self::RosePine => "rose pine",
            Self::RosePineDawn => "rose pine dawn",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0)
    }
}

/// Picks a light or dark theme from the terminal background, dark when unknown.
pub fn detect_theme() -> ThemeKind {
    match terminal_light::luma() {
        Ok(luma) if luma > 0.6 => ThemeKind::Light,
        _ => ThemeKind::Dark,
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub border: Color,
    pub selection: Color,
    pub error: Color,
    pub success: Color,
    pub warning: Color,
    pub muted: Color,
}

// bg, fg, accent, border, selection, error, success, warning, muted
type Palette = [u32; 9];

const DARK: Palette = [
    0x16141f, 0xdedce8, 0x9d8cf0, 0x3a3650, 0x2e2a42, 0xf27a7a, 0x8fd9a8, 0xf2c27a, 0x7d7894,
];
const LIGHT: Palette = [
    0xfbf9f6, 0x2b2838, 0x6a55c9, 0xd8d3e0, 0xebe6f5, 0xc44848, 0x3f8f5c, 0xb9822e, 0x8e8a9c,
];
const NORD: Palette = [
    0x2e3440, 0xeceff4, 0x88c0d0, 0x434c5e, 0x434c5e, 0xbf616a, 0xa3be8c, 0xebcb8b, 0x4c566a,
];
const CATPPUCCIN_MOCHA: Palette = [
    0x1e1e2e, 0xcdd6f4, 0xb4befe, 0x313244, 0x45475a, 0xf38ba8, 0xa6e3a1, 0xf9e2af, 0xa6adc8,
];
const CATPPUCCIN_LATTE: Palette = [
    0xeff1f5, 0x4c4f69, 0x7287fd, 0xccd0da, 0xbcc0cc, 0xd20f39, 0x40a02b, 0xdf8e1d, 0x6c6f85,
];
const ROSE_PINE: Palette = [
    0x191724, 0xe0def4, 0xc4a7e7, 0x26233a, 0x393552, 0xeb6f92, 0x9ccfd8, 0xf6c177, 0x6e6a86,
];
const ROSE_PINE_DAWN: Palette = [
    0xfaf4ed, 0x575279, 0x907aa9, 0xf2e9e1, 0xdfdad9, 0xb4637a, 0x56949f, 0xea9d34, 0x9893a5,
];

fn rgb(hex: u32) -> Color {
    Color::Rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}

impl Theme {
    pub fn from_kind(kind: ThemeKind) -> Self {
        let palette = match kind {
            ThemeKind::Dark => DARK,
            ThemeKind::Light => LIGHT,
            ThemeKind::Nord => NORD,
            ThemeKind::CatppuccinMocha => CATPPUCCIN_MOCHA,
            ThemeKind::CatppuccinLatte => CATPPUCCIN_LATTE,
            ThemeKind::RosePine => ROSE_PINE,
            ThemeKind::RosePineDawn => ROSE_PINE_DAWN,
        };
        Self::from_palette(palette)
    }

    fn from_palette(p: Palette) -> Self {
        Self {
            bg: rgb(p[0]),
            fg: rgb(p[1]),
            accent: rgb(p[2]),
            border: rgb(p[3]),
            selection: rgb(p[4]),
            error: rgb(p[5]),
            success: rgb(p[6]),
            warning: rgb(p[7]),
            muted: rgb(p[8]),
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn success(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn warning(&self) -> Style {
        Style::default().fg(self.warning)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Color used to tag a message with its detected emotion.
    pub fn emotion(&self, emotion: Emotion) -> Style {
        let color = match emotion {
            Emotion::Sad => self.accent,
            Emotion::Angry => self.error,
            Emotion::Anxious => self.warning,
            Emotion::Positive => self.success,
            Emotion::Neutral => self.muted,
        };
        Style::default().fg(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_palette_unpacks() {
        assert_eq!(rgb(0x1e1e2e), Color::Rgb(30, 30, 46));
        assert_eq!(rgb(0xffffff), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn every_theme_has_its_index() {
        for (i, kind) in ThemeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
