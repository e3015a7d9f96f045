use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use crate::config::Category;
use crate::fetch::{FetchError, StatsSource};
use crate::record::PlayerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderCommand {
    Fetch { category: Category },
}

#[derive(Debug)]
pub enum Delta {
    Fetched {
        category: Category,
        result: Result<Vec<PlayerRecord>, FetchError>,
    },
}

/// Runs fetch commands off the UI thread. Each fetch gets its own thread, so
/// hitters and pitchers may complete in either order. Nothing is cancelled.
pub fn spawn_fetch_worker(
    source: Arc<dyn StatsSource>,
    tx: Sender<Delta>,
    cmd_rx: Receiver<ProviderCommand>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                ProviderCommand::Fetch { category } => {
                    let source = Arc::clone(&source);
                    let tx = tx.clone();
                    thread::spawn(move || {
                        let endpoint = category.config().endpoint;
                        let result = source.fetch(endpoint);
                        let _ = tx.send(Delta::Fetched { category, result });
                    });
                }
            }
        }
        tracing::debug!("fetch worker stopped");
    })
}
