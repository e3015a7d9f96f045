use std::time::Instant;

use chrono::Local;

use crate::config::{CATEGORIES, Category, Config, category_label};
use crate::debounce::Debouncer;
use crate::fetch::{FetchError, StatsSource};
use crate::page::{Indicator, Page, ThemeToggle};
use crate::prefs::PreferenceStore;
use crate::provider::{Delta, ProviderCommand};
use crate::record::PlayerRecord;
use crate::render::{self, RenderError};

pub const FETCH_FAILED_MESSAGE: &str = "Failed to load data. Please try again later.";

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub is_mobile: bool,
    pub is_dark_mode: bool,
    pub last_records: [Option<Vec<PlayerRecord>>; 2],
}

impl ViewState {
    pub fn last_records(&self, category: Category) -> Option<&[PlayerRecord]> {
        self.last_records[category.index()].as_deref()
    }
}

/// Keeps indicators, table rows and cards consistent across refreshes,
/// resizes and theme flips. All page mutation goes through here.
pub struct SyncEngine {
    config: Config,
    state: ViewState,
    page: Page,
    prefs: Box<dyn PreferenceStore>,
    resize: Debouncer,
    pending_width: Option<u16>,
    layout_passes: u64,
}

impl SyncEngine {
    pub fn new(
        config: Config,
        mut page: Page,
        prefs: Box<dyn PreferenceStore>,
        width: u16,
    ) -> Self {
        let is_dark_mode = prefs.load_dark_mode();
        let is_mobile = config.is_mobile_width(width);
        if let Some(toggle) = page.theme_toggle.as_mut() {
            *toggle = ThemeToggle::for_theme(is_dark_mode);
        }
        for section in &mut page.sections {
            render::set_layout(section, is_mobile);
        }
        let resize = Debouncer::new(config.resize_debounce);
        tracing::info!(width, is_mobile, is_dark_mode, "sync engine ready");

        Self {
            config,
            state: ViewState {
                is_mobile,
                is_dark_mode,
                last_records: [None, None],
            },
            page,
            prefs,
            resize,
            pending_width: None,
            layout_passes: 0,
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn layout_passes(&self) -> u64 {
        self.layout_passes
    }

    pub fn toggle_help(&mut self) {
        self.page.help_overlay = !self.page.help_overlay;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.page.push_log(msg);
    }

    pub fn refresh_all(&mut self) -> Vec<ProviderCommand> {
        CATEGORIES
            .iter()
            .map(|cat| self.begin_refresh(cat.id))
            .collect()
    }

    /// Shows the loading indicator and clears any previous error. The caller
    /// dispatches the returned command.
    pub fn begin_refresh(&mut self, category: Category) -> ProviderCommand {
        let section = self.page.section_mut(category);
        if let Some(loading) = section.loading.as_mut() {
            loading.visible = true;
        }
        if let Some(error) = section.error.as_mut() {
            error.visible = false;
            error.text.clear();
        }
        tracing::debug!(category = category_label(category), "refresh started");
        ProviderCommand::Fetch { category }
    }

    /// Applies a fetch outcome. A late completion from an older request still
    /// lands here and wins over whatever is on screen.
    pub fn finish_refresh(
        &mut self,
        category: Category,
        result: Result<Vec<PlayerRecord>, FetchError>,
    ) {
        match result {
            Ok(records) => self.show_records(category, records),
            Err(err) => self.show_fetch_error(category, &err),
        }

        if let Some(loading) = self.page.section_mut(category).loading.as_mut() {
            loading.visible = false;
        }
    }

    pub fn refresh_blocking(&mut self, category: Category, source: &dyn StatsSource) {
        self.begin_refresh(category);
        let result = source.fetch(category.config().endpoint);
        self.finish_refresh(category, result);
    }

    pub fn apply_delta(&mut self, delta: Delta) {
        match delta {
            Delta::Fetched { category, result } => self.finish_refresh(category, result),
        }
    }

    fn show_records(&mut self, category: Category, records: Vec<PlayerRecord>) {
        let label = category_label(category);
        let columns = category.config().columns;
        let section = self.page.section_mut(category);
        match render::render(
            section,
            &records,
            columns,
            self.state.is_mobile,
            self.state.is_dark_mode,
        ) {
            Ok(()) => {
                section.updated_at = Some(Local::now());
                tracing::info!(category = label, rows = records.len(), "rendered");
                self.page
                    .push_log(format!("[INFO] {label}: {} players loaded", records.len()));
            }
            Err(err) => log_render_error(category, &err),
        }
        self.state.last_records[category.index()] = Some(records);
    }

    fn show_fetch_error(&mut self, category: Category, err: &FetchError) {
        let label = category_label(category);
        tracing::error!(category = label, error = %err, "fetch failed");

        let section = self.page.section_mut(category);
        let error = section.error.get_or_insert_with(Indicator::default);
        error.text = FETCH_FAILED_MESSAGE.to_string();
        error.visible = true;
        self.page.push_log(format!("[WARN] {label} fetch failed: {err}"));
    }

    /// Records a resize and restarts the quiet-period timer.
    pub fn on_resize(&mut self, width: u16, now: Instant) {
        self.pending_width = Some(width);
        self.resize.start(now);
    }

    /// Runs the layout pass once the resize timer fires. Returns true when a
    /// pass ran.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.resize.poll(now) {
            return false;
        }
        let Some(width) = self.pending_width.take() else {
            return false;
        };
        self.apply_layout(width);
        true
    }

    pub fn apply_layout(&mut self, width: u16) {
        let is_mobile = self.config.is_mobile_width(width);
        if is_mobile != self.state.is_mobile {
            tracing::info!(width, is_mobile, "layout changed");
        }
        self.state.is_mobile = is_mobile;
        self.layout_passes += 1;

        for cat in CATEGORIES {
            render::set_layout(self.page.section_mut(cat.id), is_mobile);
            if is_mobile {
                self.repair_cards(cat.id);
            }
        }
    }

    /// Cards are only built while mobile, so a render that happened on a wide
    /// terminal leaves them empty. Rebuild from the cached records, or from the
    /// table text if nothing was cached.
    fn repair_cards(&mut self, category: Category) {
        let columns = category.config().columns;
        let section = self.page.section(category);
        let has_rows = section.table.as_ref().is_some_and(|t| !t.rows.is_empty());
        let cards_empty = section.cards.as_ref().is_some_and(|c| c.cards.is_empty());
        if !(has_rows && cards_empty) {
            return;
        }

        let records = match self.state.last_records(category) {
            Some(records) => records.to_vec(),
            None => render::records_from_table(section, columns),
        };
        let is_dark = self.state.is_dark_mode;
        let section = self.page.section_mut(category);
        if let Err(err) = render::render_cards(section, &records, columns, is_dark) {
            log_render_error(category, &err);
        }
    }

    pub fn toggle_theme(&mut self) {
        let is_dark = !self.state.is_dark_mode;
        self.state.is_dark_mode = is_dark;

        if let Err(err) = self.prefs.save_dark_mode(is_dark) {
            tracing::warn!(error = %format!("{err:#}"), "failed to persist theme");
            self.page.push_log("[WARN] Could not save theme preference");
        }
        if let Some(toggle) = self.page.theme_toggle.as_mut() {
            *toggle = ThemeToggle::for_theme(is_dark);
        }
        for section in &mut self.page.sections {
            render::apply_theme(section, is_dark);
        }
        tracing::info!(is_dark, "theme toggled");
    }
}

fn log_render_error(category: Category, err: &RenderError) {
    tracing::warn!(category = category_label(category), error = %err, "render skipped");
}
