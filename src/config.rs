use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://twins-player-stats-backend.onrender.com";
const DEFAULT_BREAKPOINT_COLS: u16 = 100;
const MIN_BREAKPOINT_COLS: u16 = 20;
const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 250;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Hitters,
    Pitchers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
}

impl Column {
    pub const fn new(key: &'static str, label: &'static str) -> Self {
        Self { key, label }
    }
}

/// Fixed per-category wiring: endpoint plus column schema. The first column is
/// always the player name.
#[derive(Debug)]
pub struct CategoryConfig {
    pub id: Category,
    pub title: &'static str,
    pub endpoint: &'static str,
    pub columns: &'static [Column],
}

pub static HITTERS: CategoryConfig = CategoryConfig {
    id: Category::Hitters,
    title: "Hitters",
    endpoint: "hitters",
    columns: &[
        Column::new("name", "Name"),
        Column::new("avg", "AVG"),
        Column::new("hr", "HR"),
        Column::new("ops", "OPS"),
    ],
};

pub static PITCHERS: CategoryConfig = CategoryConfig {
    id: Category::Pitchers,
    title: "Pitchers",
    endpoint: "pitchers",
    columns: &[
        Column::new("name", "Name"),
        Column::new("era", "ERA"),
        Column::new("whip", "WHIP"),
        Column::new("k9", "K/9"),
    ],
};

pub static CATEGORIES: [&CategoryConfig; 2] = [&HITTERS, &PITCHERS];

impl Category {
    pub fn config(self) -> &'static CategoryConfig {
        match self {
            Category::Hitters => &HITTERS,
            Category::Pitchers => &PITCHERS,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Category::Hitters => 0,
            Category::Pitchers => 1,
        }
    }
}

pub fn category_label(category: Category) -> &'static str {
    category.config().title
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub mobile_breakpoint: u16,
    pub resize_debounce: Duration,
    pub request_timeout: Option<Duration>,
    pub prefs_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            mobile_breakpoint: DEFAULT_BREAKPOINT_COLS,
            resize_debounce: Duration::from_millis(DEFAULT_RESIZE_DEBOUNCE_MS),
            request_timeout: None,
            prefs_path: None,
        }
    }
}

impl Config {
    /// Reads `.env.local` / `.env` if present, then the process environment.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let defaults = Self::default();
        let api_base_url = env::var("API_BASE_URL")
            .ok()
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty())
            .unwrap_or(defaults.api_base_url);
        let mobile_breakpoint = env::var("MOBILE_BREAKPOINT_COLS")
            .ok()
            .and_then(|val| val.parse::<u16>().ok())
            .unwrap_or(DEFAULT_BREAKPOINT_COLS)
            .max(MIN_BREAKPOINT_COLS);
        let resize_debounce = Duration::from_millis(
            env::var("RESIZE_DEBOUNCE_MS")
                .ok()
                .and_then(|val| val.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RESIZE_DEBOUNCE_MS),
        );
        let request_timeout = env::var("STATS_TIMEOUT_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let prefs_path = env::var("STATS_PREFS_PATH")
            .ok()
            .filter(|val| !val.trim().is_empty())
            .map(PathBuf::from);

        Self {
            api_base_url,
            mobile_breakpoint,
            resize_debounce,
            request_timeout,
            prefs_path,
        }
    }

    pub fn is_mobile_width(&self, width: u16) -> bool {
        width <= self.mobile_breakpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schemas_start_with_name() {
        for cat in CATEGORIES {
            assert_eq!(cat.columns[0].key, "name");
            assert_eq!(cat.id.config().endpoint, cat.endpoint);
        }
    }

    #[test]
    fn breakpoint_is_inclusive() {
        let config = Config::default();
        assert!(config.is_mobile_width(DEFAULT_BREAKPOINT_COLS));
        assert!(!config.is_mobile_width(DEFAULT_BREAKPOINT_COLS + 1));
    }
}
