//! URL⇄sidebar reconciliation. One controller per page type: it reads the
//! URL, rebuilds the sidebar through the section builder, reacts to
//! location changes with a debounced rebuild and translates sidebar clicks
//! back into URL writes.
//!
//! Location-changed fires for both user navigation and this controller's
//! own writes. External changes are coalesced behind a short delay
//! (latest-wins, enforced with a cancellation token per pending rebuild);
//! self-initiated navigations skip the delay so a click never renders a
//! stale sidebar frame.

use crate::builder;
use crate::builder::BuildInput;
use crate::config::FRANCHISE_KEY_PREFIX;
use crate::config::NavConfig;
use crate::error::NavError;
use crate::facet::Facet;
use crate::facet::FacetOption;
use crate::observe::SubscriptionId;
use crate::query::Snapshot;
use crate::selection;
use crate::selection::SelectionContext;
use crate::sidebar::ItemSelectedHandler;
use crate::sidebar::SidebarItem;
use crate::sidebar::SidebarSection;
use crate::sidebar::SidebarState;
use crate::url_state::UrlState;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::warn;

/// Contract a page supplies to the core. The core never auto-discovers
/// page-specific parameter names: `read_from_url` runs before every
/// rebuild and the snapshot accessors report what the page read.
pub trait PageSpec: Send {
    fn base_path(&self) -> &str;

    /// Facet definitions, in declaration order.
    fn facets(&self) -> Vec<Facet>;

    /// Reads page-specific parameters out of the current snapshot.
    fn read_from_url(&mut self, snapshot: &Snapshot);

    /// Current scalar snapshot, as of the last `read_from_url`.
    fn scalars(&self) -> Snapshot;

    /// Current multi-selections per facet key.
    fn multi_selections(&self) -> Vec<(String, Vec<String>)> {
        Vec::new()
    }

    fn franchise_dealers(&self) -> Option<Vec<FacetOption>> {
        None
    }

    /// Pages needing logic beyond a plain URL rewrite (e.g. accumulating
    /// multi-selections) opt in and receive the clicks the core would
    /// otherwise resolve to item URLs.
    fn handles_multi_facet_clicks(&self) -> bool {
        false
    }

    /// Page click delegate; errors propagate to the controller's caller.
    fn on_item_click(
        &mut self,
        _section_key: &str,
        _item: &SidebarItem,
        _url: &mut UrlState,
    ) -> anyhow::Result<()> {
        Ok(())
    }

    /// Two-way-bound selection map for selection rule 5.
    fn bound_selections(&self) -> Option<HashMap<String, String>> {
        None
    }
}

#[derive(Debug)]
pub enum ControllerEvent {
    /// A location change originating outside this controller.
    ExternalLocation(String),
    /// The URL state committed a change (any origin).
    LocationChanged,
    ItemClicked {
        section_key: String,
        item: SidebarItem,
    },
    /// A debounce window elapsed for the given scheduling generation.
    RebuildReady { generation: u64 },
    Shutdown,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerPhase {
    Idle,
    PendingRebuild,
}

struct PendingRebuild {
    token: CancellationToken,
    generation: u64,
}

/// Cheap cloneable handle for the host/view side of the controller.
#[derive(Clone)]
pub struct ControllerHandle {
    tx: UnboundedSender<ControllerEvent>,
}

impl ControllerHandle {
    pub fn location_changed(&self, uri: impl Into<String>) {
        let _ = self.tx.send(ControllerEvent::ExternalLocation(uri.into()));
    }

    pub fn click(&self, section_key: impl Into<String>, item: SidebarItem) {
        let _ = self.tx.send(ControllerEvent::ItemClicked {
            section_key: section_key.into(),
            item,
        });
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(ControllerEvent::Shutdown);
    }
}

pub struct PageController<P: PageSpec> {
    page: P,
    url: UrlState,
    sidebar: SidebarState,
    config: NavConfig,
    tx: UnboundedSender<ControllerEvent>,
    rx: UnboundedReceiver<ControllerEvent>,
    location_sub: SubscriptionId,
    click_handler: Option<ItemSelectedHandler>,
    phase: ControllerPhase,
    pending: Option<PendingRebuild>,
    generation: u64,
    self_initiated: bool,
}

impl<P: PageSpec> PageController<P> {
    pub fn new(page: P, mut url: UrlState, config: NavConfig) -> (Self, ControllerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let location_tx = tx.clone();
        let location_sub = url.subscribe(Box::new(move |_| {
            let _ = location_tx.send(ControllerEvent::LocationChanged);
        }));
        let controller = Self {
            page,
            url,
            sidebar: SidebarState::new(),
            config,
            tx: tx.clone(),
            rx,
            location_sub,
            click_handler: None,
            phase: ControllerPhase::Idle,
            pending: None,
            generation: 0,
            self_initiated: false,
        };
        (controller, ControllerHandle { tx })
    }

    /// Registers the click handler and performs the synchronous
    /// mount-time read+rebuild.
    pub fn mount(&mut self) {
        let click_tx = self.tx.clone();
        let handler: ItemSelectedHandler = Arc::new(move |section_key, item| {
            let _ = click_tx.send(ControllerEvent::ItemClicked {
                section_key: section_key.to_string(),
                item: item.clone(),
            });
        });
        self.sidebar.set_item_handler(handler.clone());
        self.click_handler = Some(handler);
        self.rebuild();
    }

    pub fn sidebar(&self) -> &SidebarState {
        &self.sidebar
    }

    pub fn url(&self) -> &UrlState {
        &self.url
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn phase(&self) -> ControllerPhase {
        self.phase
    }

    /// Render-time read path: evaluates an item's live selection against
    /// the current URL (precedence rules in the `selection` module).
    pub fn item_selected(&self, section: &SidebarSection, item_index: usize) -> bool {
        let bound = self.page.bound_selections();
        let ctx = SelectionContext {
            snapshot: self.url.current(),
            current_path: self.url.path(),
            bound_selections: bound.as_ref(),
            config: &self.config,
        };
        selection::is_item_selected(section, item_index, &ctx)
    }

    /// Processes events until the channel closes or shutdown is
    /// requested.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        while let Some(event) = self.rx.recv().await {
            if !self.handle_event(event)? {
                break;
            }
        }
        self.teardown();
        Ok(())
    }

    /// Processes queued events and any pending debounced rebuild, then
    /// returns. Waits only while a rebuild is scheduled.
    pub async fn run_until_idle(&mut self) -> anyhow::Result<()> {
        loop {
            let event = if self.pending.is_some() {
                match self.rx.recv().await {
                    Some(event) => event,
                    None => break,
                }
            } else {
                match self.rx.try_recv() {
                    Ok(event) => event,
                    Err(_) => break,
                }
            };
            if !self.handle_event(event)? {
                self.teardown();
                break;
            }
        }
        Ok(())
    }

    fn handle_event(&mut self, event: ControllerEvent) -> anyhow::Result<bool> {
        match event {
            ControllerEvent::ExternalLocation(uri) => {
                // malformed locations fail the read; the sidebar keeps its
                // previous state
                if let Err(err) = self.url.set_location(&uri) {
                    warn!("ignoring malformed location {uri:?}: {err}");
                }
            }
            ControllerEvent::LocationChanged => self.on_location_changed(),
            ControllerEvent::RebuildReady { generation } => self.on_rebuild_ready(generation),
            ControllerEvent::ItemClicked { section_key, item } => {
                self.on_item_clicked(&section_key, &item)?;
            }
            ControllerEvent::Shutdown => return Ok(false),
        }
        Ok(true)
    }

    fn on_location_changed(&mut self) {
        self.cancel_pending();
        if self.self_initiated {
            self.self_initiated = false;
            debug!("self-initiated navigation, rebuilding without debounce");
            self.rebuild();
            return;
        }
        self.phase = ControllerPhase::PendingRebuild;
        self.generation += 1;
        let generation = self.generation;
        let token = CancellationToken::new();
        let task_token = token.clone();
        let tx = self.tx.clone();
        let window = self.config.debounce_window;
        tokio::spawn(async move {
            tokio::select! {
                _ = task_token.cancelled() => {}
                _ = tokio::time::sleep(window) => {
                    let _ = tx.send(ControllerEvent::RebuildReady { generation });
                }
            }
        });
        self.pending = Some(PendingRebuild { token, generation });
    }

    fn on_rebuild_ready(&mut self, generation: u64) {
        if self.pending.as_ref().map(|pending| pending.generation) != Some(generation) {
            debug!(generation, "{}", NavError::RebuildCancelled);
            return;
        }
        self.pending = None;
        self.rebuild();
    }

    fn on_item_clicked(&mut self, section_key: &str, item: &SidebarItem) -> anyhow::Result<()> {
        if let Some(dealer) = item
            .key
            .as_deref()
            .and_then(|key| key.strip_prefix(FRANCHISE_KEY_PREFIX))
        {
            let before = self.url.url();
            self.self_initiated = true;
            self.url.set(&[(self.config.dealer_key.as_str(), Some(dealer))]);
            if self.url.url() == before {
                self.self_initiated = false;
            }
            return Ok(());
        }
        if self.page.handles_multi_facet_clicks() {
            let before = self.url.url();
            self.self_initiated = true;
            let result = self.page.on_item_click(section_key, item, &mut self.url);
            if self.url.url() == before {
                self.self_initiated = false;
            }
            return result;
        }
        if let Some(url) = item.url.as_deref() {
            let before = self.url.url();
            self.self_initiated = true;
            if let Err(err) = self.url.set_location(url) {
                self.self_initiated = false;
                warn!("ignoring malformed item url {url:?}: {err}");
            } else if self.url.url() == before {
                self.self_initiated = false;
            }
            return Ok(());
        }
        debug!(section_key, item = %item.text, "click did not resolve to a navigation");
        Ok(())
    }

    fn rebuild(&mut self) {
        let snapshot = self.url.current().clone();
        self.page.read_from_url(&snapshot);
        let facets = self.page.facets();
        let scalars = self.page.scalars();
        let multi = self.page.multi_selections();
        let dealers = self.page.franchise_dealers();
        let input = BuildInput {
            facets: &facets,
            scalars: &scalars,
            multi: &multi,
            base_path: self.page.base_path(),
            franchise_dealers: dealers.as_deref(),
        };
        let sections = builder::build_sections(&input, &self.config);
        let bound = self.page.bound_selections();
        self.sidebar.set_sections(&sections, bound.as_ref());
        self.phase = ControllerPhase::Idle;
        debug!(url = %self.url.url(), sections = sections.len(), "sidebar rebuilt");
    }

    fn cancel_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.token.cancel();
            debug!(generation = pending.generation, "cancelled pending rebuild");
        }
    }

    /// Cancels any pending rebuild and drops the subscriptions this
    /// controller registered.
    fn teardown(&mut self) {
        self.cancel_pending();
        self.url.unsubscribe(self.location_sub);
        if let Some(handler) = self.click_handler.take() {
            self.sidebar.clear_item_handler_if(&handler);
        }
        self.phase = ControllerPhase::Idle;
    }
}
