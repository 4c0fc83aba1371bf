#[cfg(test)]
#[path = "menu_test.rs"]
mod tests;

use strum::EnumIter;
use strum::IntoEnumIterator;

/// Entries of the review menu, in display order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum MenuAction {
    #[default]
    Copy,
    Run,
    AskAgain,
    Quit,
}

impl MenuAction {
    pub fn all() -> Vec<MenuAction> {
        return MenuAction::iter().collect();
    }

    pub fn label(&self) -> &'static str {
        return match self {
            MenuAction::Copy => "Copy to clipboard",
            MenuAction::Run => "Run command",
            MenuAction::AskAgain => "Ask again",
            MenuAction::Quit => "Quit",
        };
    }

    pub fn index(&self) -> usize {
        return MenuAction::iter()
            .position(|e| e == *self)
            .unwrap_or_default();
    }

    pub fn from_index(index: usize) -> MenuAction {
        let all = MenuAction::all();
        return all[index % all.len()];
    }

    pub fn next(&self) -> MenuAction {
        return MenuAction::from_index(self.index() + 1);
    }

    pub fn previous(&self) -> MenuAction {
        let len = MenuAction::iter().count();
        return MenuAction::from_index(self.index() + len - 1);
    }
}
