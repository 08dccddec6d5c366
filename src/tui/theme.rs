//! TUI color theme.

use ratatui::style::Color;

use crate::benchmark::view::Phase;
use crate::benchmark::TestKind;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    // Primary palette
    pub accent: Color,
    pub optimal: Color,
    pub caution: Color,
    pub critical: Color,

    // UI chrome
    pub border: Color,
    pub muted: Color,
    pub text: Color,
    pub text_dim: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(0, 212, 255),
            optimal: Color::Rgb(163, 230, 53),
            caution: Color::Rgb(251, 191, 36),
            critical: Color::Rgb(255, 68, 85),
            border: Color::Gray,
            muted: Color::DarkGray,
            text: Color::White,
            text_dim: Color::Gray,
        }
    }
}

impl Theme {
    pub fn phase_color(&self, phase: Phase) -> Color {
        match phase {
            Phase::Idle => self.text_dim,
            Phase::Running => self.caution,
            Phase::Finished => self.optimal,
        }
    }

    pub fn kind_color(&self, kind: TestKind) -> Color {
        match kind {
            TestKind::Cpu => self.accent,
            TestKind::Ram => Color::Rgb(192, 132, 252),
            TestKind::Disk => self.optimal,
        }
    }
}
