//! Light/dark palettes and verdict colors.

use eframe::egui::{self, Color32, Visuals};
use quickeval_common::model::Verdict;

/// Colors of one palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color32,
    pub foreground: Color32,
    pub accent: Color32,
    pub button: Color32,
    pub table: Color32,
}

const LIGHT_GRAY: Color32 = Color32::from_rgb(0xEC, 0xF0, 0xF1);
const DARK_BLUE_GRAY: Color32 = Color32::from_rgb(0x2C, 0x3E, 0x50);
const BRIGHT_BLUE: Color32 = Color32::from_rgb(0x34, 0x98, 0xDB);
const DARKER_BLUE: Color32 = Color32::from_rgb(0x29, 0x80, 0xB9);

const LIGHT: Palette = Palette {
    background: LIGHT_GRAY,
    foreground: DARK_BLUE_GRAY,
    accent: BRIGHT_BLUE,
    button: DARKER_BLUE,
    table: Color32::WHITE,
};

const DARK: Palette = Palette {
    background: DARK_BLUE_GRAY,
    foreground: LIGHT_GRAY,
    accent: BRIGHT_BLUE,
    button: DARKER_BLUE,
    table: Color32::from_rgb(0x34, 0x49, 0x5E),
};

/// User-selectable appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Theme {
    pub dark: bool,
    pub colorblind: bool,
}

impl Theme {
    pub fn palette(&self) -> Palette {
        if self.dark { DARK } else { LIGHT }
    }

    /// Text color of a cell with the given verdict.
    ///
    /// Colorblind mode swaps green/red for blue/orange.
    pub fn verdict_color(&self, verdict: Verdict) -> Color32 {
        match (verdict, self.colorblind) {
            (Verdict::Positive, false) => Color32::from_rgb(0x2E, 0xCC, 0x71),
            (Verdict::Negative, false) => Color32::from_rgb(0xE7, 0x4C, 0x3C),
            (Verdict::Positive, true) => Color32::from_rgb(0x37, 0x7E, 0xB8),
            (Verdict::Negative, true) => Color32::from_rgb(0xFF, 0x7F, 0x00),
            (Verdict::Neutral, _) => self.palette().foreground,
        }
    }

    pub fn visuals(&self) -> Visuals {
        let palette = self.palette();
        let mut visuals = if self.dark { Visuals::dark() } else { Visuals::light() };
        visuals.override_text_color = Some(palette.foreground);
        visuals.panel_fill = palette.background;
        visuals.window_fill = palette.background;
        visuals.extreme_bg_color = palette.table;
        visuals.faint_bg_color = palette.table;
        visuals.selection.bg_fill = palette.accent;
        visuals.widgets.inactive.weak_bg_fill = palette.button;
        visuals.widgets.hovered.weak_bg_fill = palette.accent;
        visuals.widgets.active.weak_bg_fill = palette.accent;
        visuals
    }

    pub fn apply(&self, ctx: &egui::Context) {
        ctx.set_visuals(self.visuals());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colorblind_mode_swaps_verdict_colors() {
        let normal = Theme::default();
        let colorblind = Theme {
            colorblind: true,
            ..Theme::default()
        };

        assert_eq!(normal.verdict_color(Verdict::Positive), Color32::from_rgb(0x2E, 0xCC, 0x71));
        assert_eq!(colorblind.verdict_color(Verdict::Negative), Color32::from_rgb(0xFF, 0x7F, 0x00));
        assert_ne!(
            normal.verdict_color(Verdict::Positive),
            colorblind.verdict_color(Verdict::Positive)
        );
    }

    #[test]
    fn neutral_follows_the_foreground() {
        let dark = Theme {
            dark: true,
            ..Theme::default()
        };
        assert_eq!(dark.verdict_color(Verdict::Neutral), LIGHT_GRAY);
        assert_eq!(Theme::default().verdict_color(Verdict::Neutral), DARK_BLUE_GRAY);
        assert_eq!(dark.visuals().panel_fill, DARK_BLUE_GRAY);
    }
}
