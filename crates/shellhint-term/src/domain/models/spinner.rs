#[cfg(test)]
#[path = "spinner_test.rs"]
mod tests;

use rand::seq::SliceRandom;
use rand::Rng;
use strum::Display;
use strum::EnumIter;
use strum::IntoEnumIterator;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SpinnerKind {
    #[default]
    Dot,
    Ellipsis,
    Line,
    Globe,
    Moon,
    Monkey,
    Jump,
    MiniDot,
    Points,
    Pulse,
    Meter,
    Hamburger,
}

impl SpinnerKind {
    pub fn frames(&self) -> &'static [&'static str] {
        return match self {
            SpinnerKind::Dot => &["⣾ ", "⣽ ", "⣻ ", "⢿ ", "⡿ ", "⣟ ", "⣯ ", "⣷ "],
            SpinnerKind::Ellipsis => &["", ".", "..", "..."],
            SpinnerKind::Line => &["|", "/", "-", "\\"],
            SpinnerKind::Globe => &["🌍", "🌎", "🌏"],
            SpinnerKind::Moon => &["🌑", "🌒", "🌓", "🌔", "🌕", "🌖", "🌗", "🌘"],
            SpinnerKind::Monkey => &["🙈", "🙉", "🙊"],
            SpinnerKind::Jump => &["⢄", "⢂", "⢁", "⡁", "⡈", "⡐", "⡠"],
            SpinnerKind::MiniDot => &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            SpinnerKind::Points => &["∙∙∙", "●∙∙", "∙●∙", "∙∙●"],
            SpinnerKind::Pulse => &["█", "▓", "▒", "░"],
            SpinnerKind::Meter => &["▱▱▱", "▰▱▱", "▰▰▱", "▰▰▰", "▰▰▱", "▰▱▱", "▱▱▱"],
            SpinnerKind::Hamburger => &["☱", "☲", "☴", "☲"],
        };
    }

    pub fn frame(&self, tick: usize) -> &'static str {
        let frames = self.frames();
        return frames[tick % frames.len()];
    }

    /// Number of ticks a spinner runs before a new one is picked.
    pub fn reseed_threshold(&self) -> usize {
        return self.frames().len() * 2;
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> SpinnerKind {
        let all = SpinnerKind::iter().collect::<Vec<_>>();
        return all.choose(rng).copied().unwrap_or_default();
    }
}
