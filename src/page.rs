use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::config::Category;

pub const LIGHT_GLYPH: &str = "🌙";
pub const DARK_GLYPH: &str = "☀";
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableBody {
    pub visible: bool,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub heading: String,
    pub lines: Vec<(String, String)>,
    pub dark: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardContainer {
    pub visible: bool,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Indicator {
    pub visible: bool,
    pub text: String,
}

/// Anchors for one category. Any of them may be absent on a given page.
#[derive(Debug, Clone, Default)]
pub struct Section {
    pub table: Option<TableBody>,
    pub cards: Option<CardContainer>,
    pub loading: Option<Indicator>,
    pub error: Option<Indicator>,
    pub updated_at: Option<DateTime<Local>>,
}

impl Section {
    /// Table, cards and loading indicator present; the error indicator is
    /// created on first failure.
    pub fn standard() -> Self {
        Self {
            table: Some(TableBody {
                visible: true,
                rows: Vec::new(),
            }),
            cards: Some(CardContainer::default()),
            loading: Some(Indicator {
                visible: false,
                text: "Loading...".to_string(),
            }),
            error: None,
            updated_at: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.as_ref().is_some_and(|l| l.visible)
    }

    pub fn error_text(&self) -> Option<&str> {
        self.error
            .as_ref()
            .filter(|e| e.visible)
            .map(|e| e.text.as_str())
    }

    pub fn row_count(&self) -> usize {
        self.table.as_ref().map_or(0, |t| t.rows.len())
    }

    pub fn card_count(&self) -> usize {
        self.cards.as_ref().map_or(0, |c| c.cards.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThemeToggle {
    pub glyph: String,
    pub label: String,
}

impl ThemeToggle {
    pub fn for_theme(dark: bool) -> Self {
        if dark {
            Self {
                glyph: DARK_GLYPH.to_string(),
                label: "Switch to light mode".to_string(),
            }
        } else {
            Self {
                glyph: LIGHT_GLYPH.to_string(),
                label: "Switch to dark mode".to_string(),
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page {
    pub sections: [Section; 2],
    pub theme_toggle: Option<ThemeToggle>,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl Default for Page {
    fn default() -> Self {
        Self::standard()
    }
}

impl Page {
    pub fn standard() -> Self {
        Self {
            sections: [Section::standard(), Section::standard()],
            theme_toggle: Some(ThemeToggle::for_theme(false)),
            logs: VecDeque::new(),
            help_overlay: false,
        }
    }

    pub fn section(&self, category: Category) -> &Section {
        &self.sections[category.index()]
    }

    pub fn section_mut(&mut self, category: Category) -> &mut Section {
        &mut self.sections[category.index()]
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_bounded() {
        let mut page = Page::standard();
        for i in 0..(MAX_LOGS + 5) {
            page.push_log(format!("line {i}"));
        }
        assert_eq!(page.logs.len(), MAX_LOGS);
        assert_eq!(page.logs.front().map(String::as_str), Some("line 5"));
    }
}
