use portal_nav::Facet;
use portal_nav::FacetOption;
use portal_nav::NavConfig;
use portal_nav::PageController;
use portal_nav::PageSpec;
use portal_nav::Snapshot;
use portal_nav::UrlState;
use portal_nav::controller::ControllerPhase;
use portal_nav::sidebar::SidebarItem;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::time::Duration;

struct OrdersPage {
    reads: Arc<AtomicUsize>,
    dealer: Option<String>,
    status: Option<String>,
}

impl OrdersPage {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        (
            Self {
                reads: reads.clone(),
                dealer: None,
                status: None,
            },
            reads,
        )
    }
}

impl PageSpec for OrdersPage {
    fn base_path(&self) -> &str {
        "/orders/purchase"
    }

    fn facets(&self) -> Vec<Facet> {
        vec![
            Facet::new("status", "Status").with_options(vec![
                FacetOption::new("All"),
                FacetOption::new("Open"),
                FacetOption::new("Closed"),
            ]),
        ]
    }

    fn read_from_url(&mut self, snapshot: &Snapshot) {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.dealer = snapshot.get("dealer").map(str::to_string);
        self.status = snapshot.get("status").map(str::to_string);
    }

    fn scalars(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        if let Some(dealer) = &self.dealer {
            snapshot.insert("dealer", dealer);
        }
        if let Some(status) = &self.status {
            snapshot.insert("status", status);
        }
        snapshot
    }

    fn franchise_dealers(&self) -> Option<Vec<FacetOption>> {
        Some(vec![
            FacetOption::new("Dealer 42").with_value("D42"),
            FacetOption::new("Dealer 77").with_value("D77"),
        ])
    }
}

fn controller(uri: &str) -> (PageController<OrdersPage>, portal_nav::ControllerHandle, Arc<AtomicUsize>) {
    let (page, reads) = OrdersPage::new();
    let url = UrlState::parse(uri).expect("parse initial location");
    let (controller, handle) = PageController::new(page, url, NavConfig::default());
    (controller, handle, reads)
}

fn find_item(controller: &PageController<OrdersPage>, section_key: &str, text: &str) -> SidebarItem {
    controller
        .sidebar()
        .sections()
        .iter()
        .find(|section| section.key() == section_key)
        .and_then(|section| section.items.iter().find(|item| item.text == text))
        .cloned()
        .expect("sidebar item")
}

#[tokio::test(start_paused = true)]
async fn mount_rebuilds_synchronously() {
    let (mut controller, _handle, reads) = controller("/orders/purchase?status=Open");
    controller.mount();
    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert!(controller.sidebar().is_visible());
    assert_eq!(controller.phase(), ControllerPhase::Idle);
    // franchise selector first, then the status facet
    let sections = controller.sidebar().sections();
    assert!(sections[0].is_franchise_selector);
    assert_eq!(sections[1].key(), "status");
}

#[tokio::test(start_paused = true)]
async fn external_changes_within_the_window_coalesce_into_one_rebuild() {
    let (mut controller, handle, reads) = controller("/orders/purchase");
    controller.mount();
    handle.location_changed("/orders/purchase?status=Open");
    handle.location_changed("/orders/purchase?status=Closed");
    handle.location_changed("/orders/purchase?status=Open&page=3");
    controller.run_until_idle().await.expect("run");
    // one rebuild, using the latest location
    assert_eq!(reads.load(Ordering::SeqCst), 2);
    assert_eq!(controller.url().url(), "/orders/purchase?status=Open&page=3");
    assert_eq!(controller.page().status.as_deref(), Some("Open"));
}

#[tokio::test(start_paused = true)]
async fn debounced_rebuild_waits_for_the_window() {
    let (mut controller, handle, reads) = controller("/orders/purchase");
    controller.mount();
    let before = tokio::time::Instant::now();
    handle.location_changed("/orders/purchase?status=Closed");
    controller.run_until_idle().await.expect("run");
    assert_eq!(reads.load(Ordering::SeqCst), 2);
    assert_eq!(
        tokio::time::Instant::now().duration_since(before),
        NavConfig::default().debounce_window
    );
}

#[tokio::test(start_paused = true)]
async fn click_navigation_skips_the_debounce_window() {
    let (mut controller, _handle, reads) = controller("/orders/purchase");
    controller.mount();
    let open = find_item(&controller, "status", "Open");
    let before = tokio::time::Instant::now();
    controller.sidebar().click("status", &open);
    controller.run_until_idle().await.expect("run");
    assert_eq!(reads.load(Ordering::SeqCst), 2);
    assert_eq!(controller.url().url(), "/orders/purchase?status=Open");
    // no timer was involved: a click never renders a stale frame
    assert_eq!(tokio::time::Instant::now(), before);
}

#[tokio::test(start_paused = true)]
async fn franchise_click_sets_the_dealer_scalar_and_stops() {
    let (mut controller, _handle, _reads) = controller("/orders/purchase?status=Open");
    controller.mount();
    let dealer = find_item(&controller, "franchise", "Dealer 42");
    controller.sidebar().click("franchise", &dealer);
    controller.run_until_idle().await.expect("run");
    assert_eq!(
        controller.url().url(),
        "/orders/purchase?status=Open&dealer=D42"
    );
    assert_eq!(controller.page().dealer.as_deref(), Some("D42"));
}

#[tokio::test(start_paused = true)]
async fn malformed_external_location_keeps_the_last_good_sidebar() {
    let (mut controller, handle, reads) = controller("/orders/purchase?status=Open");
    controller.mount();
    handle.location_changed("/orders\u{1}purchase");
    controller.run_until_idle().await.expect("run");
    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert_eq!(controller.url().url(), "/orders/purchase?status=Open");
    assert!(controller.sidebar().is_visible());
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_a_pending_rebuild() {
    let (mut controller, handle, reads) = controller("/orders/purchase");
    controller.mount();
    handle.location_changed("/orders/purchase?status=Closed");
    let late_shutdown = handle.clone();
    tokio::spawn(async move {
        // inside the debounce window
        tokio::time::sleep(Duration::from_millis(1)).await;
        late_shutdown.shutdown();
    });
    controller.run_until_idle().await.expect("run");
    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert_eq!(controller.phase(), ControllerPhase::Idle);
    assert!(!controller.sidebar().has_item_handler());
}

#[tokio::test(start_paused = true)]
async fn run_drives_the_debounced_rebuild_and_stops_on_shutdown() {
    let (mut controller, handle, reads) = controller("/orders/purchase");
    controller.mount();
    handle.location_changed("/orders/purchase?status=Open");
    let late_shutdown = handle.clone();
    tokio::spawn(async move {
        // after the debounce window has fired
        tokio::time::sleep(Duration::from_millis(50)).await;
        late_shutdown.shutdown();
    });
    controller.run().await.expect("run");
    assert_eq!(reads.load(Ordering::SeqCst), 2);
    assert_eq!(controller.url().url(), "/orders/purchase?status=Open");
    assert_eq!(controller.phase(), ControllerPhase::Idle);
    assert!(!controller.sidebar().has_item_handler());
}

#[tokio::test(start_paused = true)]
async fn repeated_click_on_the_same_option_is_a_no_op() {
    let (mut controller, _handle, reads) = controller("/orders/purchase?status=Open");
    controller.mount();
    let open = find_item(&controller, "status", "Open");
    controller.sidebar().click("status", &open);
    controller.run_until_idle().await.expect("run");
    // the navigation was a no-op: no change event, no rebuild
    assert_eq!(reads.load(Ordering::SeqCst), 1);
    assert_eq!(controller.url().history().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn selection_is_recomputed_live_from_the_url() {
    let (mut controller, handle, _reads) = controller("/orders/purchase?status=Open");
    controller.mount();
    let status_section = controller.sidebar().sections()[1].clone();
    assert!(controller.item_selected(&status_section, 1));
    assert!(!controller.item_selected(&status_section, 0));
    handle.location_changed("/orders/purchase");
    controller.run_until_idle().await.expect("run");
    let status_section = controller.sidebar().sections()[1].clone();
    // no status key: the "All" item default-selects
    assert!(controller.item_selected(&status_section, 0));
    assert!(!controller.item_selected(&status_section, 1));
}
