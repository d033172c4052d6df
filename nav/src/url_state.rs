//! Per-session authority for the current location. Every write is a real
//! navigation; the `Changed` notification is the only signal channel.

use crate::error::NavError;
use crate::observe::Observer;
use crate::observe::Observers;
use crate::observe::SubscriptionId;
use crate::query;
use crate::query::Snapshot;
use tracing::debug;

const MAX_HISTORY: usize = 64;

/// Whether a navigation write adds a history entry or replaces the
/// current one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NavigateMode {
    #[default]
    Push,
    Replace,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocationChange {
    pub url: String,
}

pub struct UrlState {
    path: String,
    current: Snapshot,
    mode: NavigateMode,
    history: Vec<String>,
    observers: Observers<LocationChange>,
}

impl UrlState {
    pub fn parse(uri: &str) -> Result<Self, NavError> {
        let location = query::parse_uri(uri)?;
        let url = query::serialize(&location.path, &location.query);
        Ok(Self {
            path: location.path,
            current: location.query,
            mode: NavigateMode::default(),
            history: vec![url],
            observers: Observers::default(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Always reflects the query of the last known location; synchronous,
    /// never blocks.
    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    pub fn url(&self) -> String {
        query::serialize(&self.path, &self.current)
    }

    pub fn mode(&self) -> NavigateMode {
        self.mode
    }

    /// Pages that must not grow the history opt into replace writes.
    pub fn set_mode(&mut self, mode: NavigateMode) {
        self.mode = mode;
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn subscribe(&mut self, observer: Observer<LocationChange>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Builds a path+query string. With `preserve_current_state` the
    /// overrides merge on top of the current snapshot; without it the
    /// overrides alone define the query (explicit reset semantics used by
    /// facet links that must not inherit unrelated scalars). A `None`
    /// override removes the key.
    pub fn build_href(
        &self,
        base_path: &str,
        overrides: &[(&str, Option<&str>)],
        preserve_current_state: bool,
    ) -> String {
        let snapshot = if preserve_current_state {
            self.current.merged(overrides)
        } else {
            Snapshot::new().merged(overrides)
        };
        query::serialize(base_path, &snapshot)
    }

    /// Merges overrides into the current snapshot and performs a
    /// navigation write on the current path.
    pub fn set(&mut self, overrides: &[(&str, Option<&str>)]) {
        let next = self.current.merged(overrides);
        self.commit(self.path.clone(), next);
    }

    /// Navigates to a new path, preserving the current query and then
    /// applying overrides.
    pub fn navigate(&mut self, path: &str, overrides: &[(&str, Option<&str>)]) {
        let next = self.current.merged(overrides);
        self.commit(path.to_string(), next);
    }

    /// Applies a full location (external change or a precomputed href).
    pub fn set_location(&mut self, uri: &str) -> Result<(), NavError> {
        let location = query::parse_uri(uri)?;
        self.commit(location.path, location.query);
        Ok(())
    }

    /// Fires `Changed` exactly once per actual location change; a no-op
    /// write (equal path and snapshot) neither notifies nor touches
    /// history.
    fn commit(&mut self, path: String, next: Snapshot) {
        if query::paths_equal(&self.path, &path) && self.current == next {
            debug!(url = %self.url(), "skipping no-op navigation");
            return;
        }
        let path = query::root_path(&path);
        let url = query::serialize(&path, &next);
        self.path = path;
        self.current = next;
        match self.mode {
            NavigateMode::Push => self.history.push(url.clone()),
            NavigateMode::Replace => {
                self.history.pop();
                self.history.push(url.clone());
            }
        }
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
        self.observers.notify(&LocationChange { url });
    }
}

impl std::fmt::Debug for UrlState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UrlState")
            .field("url", &self.url())
            .field("mode", &self.mode)
            .field("history", &self.history.len())
            .finish()
    }
}
