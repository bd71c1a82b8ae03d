// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Routedesk-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of routedesk and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::{env, error::Error, fmt};

use ratatui::style::{Color, Modifier, Style};

const ACCENT_ENV: &str = "ROUTEDESK_ACCENT";

/// How a card is drawn relative to the cursor and the drag session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CardState {
    Normal,
    Cursor,
    /// The card under an active drag, left in place as a ghost.
    Lifted,
    /// Floating copy drawn under the pointer.
    Overlay,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TuiTheme {
    accent: Color,
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self { accent: Color::LightGreen }
    }
}

impl TuiTheme {
    /// Reads an accent override (`#RRGGBB`) from `ROUTEDESK_ACCENT`.
    pub(crate) fn from_env() -> Result<Self, ThemeError> {
        match env::var(ACCENT_ENV) {
            Ok(value) if value.trim().is_empty() => Ok(Self::default()),
            Ok(value) => {
                let accent = parse_hex_color(&value).map_err(|reason| ThemeError::InvalidEnv {
                    name: ACCENT_ENV.to_owned(),
                    value: format!("{} ({reason})", value.trim()),
                })?;
                Ok(Self { accent })
            }
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(env::VarError::NotUnicode(_)) => Err(ThemeError::InvalidEnv {
                name: ACCENT_ENV.to_owned(),
                value: "<non-unicode>".to_owned(),
            }),
        }
    }

    pub(crate) fn accent(&self) -> Color {
        self.accent
    }

    pub(crate) fn column_border_style(&self, focused: bool, over_limit: bool) -> Style {
        match (over_limit, focused) {
            (true, true) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(Color::Red),
            (false, true) => Style::default().fg(self.accent),
            (false, false) => Style::default().fg(Color::DarkGray),
        }
    }

    pub(crate) fn readout_style(&self, over_limit: bool) -> Style {
        if over_limit {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        }
    }

    pub(crate) fn card_style(&self, state: CardState) -> Style {
        match state {
            CardState::Normal => Style::default(),
            CardState::Cursor => Style::default().add_modifier(Modifier::REVERSED),
            CardState::Lifted => Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            CardState::Overlay => Style::default().fg(Color::Black).bg(self.accent),
        }
    }

    pub(crate) fn placeholder_style(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub(crate) fn footer_key_style(&self) -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub(crate) fn footer_label_style(&self) -> Style {
        Style::default().fg(Color::Gray)
    }

    pub(crate) fn error_style(&self) -> Style {
        Style::default().fg(Color::Red)
    }
}

fn parse_hex_color(value: &str) -> Result<Color, String> {
    let trimmed = value.trim();
    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .unwrap_or(trimmed);
    if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return Err("expected #RRGGBB".to_owned());
    }
    let rgb = u32::from_str_radix(hex, 16).map_err(|err| err.to_string())?;
    Ok(Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8))
}

#[derive(Debug, Clone)]
pub(crate) enum ThemeError {
    InvalidEnv { name: String, value: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEnv { name, value } => write!(f, "invalid env {name}={value}"),
        }
    }
}

impl Error for ThemeError {}

#[cfg(test)]
mod tests {
    use ratatui::style::Color;
    use rstest::rstest;

    use super::parse_hex_color;

    #[rstest]
    #[case::hash("#ff8800", Color::Rgb(0xff, 0x88, 0x00))]
    #[case::bare("0a0B0c", Color::Rgb(0x0a, 0x0b, 0x0c))]
    #[case::prefixed(" 0x102030 ", Color::Rgb(0x10, 0x20, 0x30))]
    fn accepts_hex_colors(#[case] raw: &str, #[case] expected: Color) {
        assert_eq!(parse_hex_color(raw), Ok(expected));
    }

    #[rstest]
    #[case::short("#fff")]
    #[case::named("green")]
    #[case::non_hex("#gg0000")]
    fn rejects_other_colors(#[case] raw: &str) {
        assert!(parse_hex_color(raw).is_err());
    }
}
