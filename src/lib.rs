pub mod config;
pub mod debounce;
pub mod fetch;
pub mod http_client;
pub mod page;
pub mod prefs;
pub mod provider;
pub mod record;
pub mod render;
pub mod sync;
pub mod ui;
