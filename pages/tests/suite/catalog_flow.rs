use portal_nav::NavConfig;
use portal_nav::PageController;
use portal_nav::UrlState;
use portal_nav::sidebar::SidebarItem;
use portal_pages::ProductCatalogPage;
use pretty_assertions::assert_eq;

fn catalog(uri: &str) -> PageController<ProductCatalogPage> {
    let url = UrlState::parse(uri).expect("parse initial location");
    let (mut controller, _handle) =
        PageController::new(ProductCatalogPage::new(), url, NavConfig::default());
    controller.mount();
    controller
}

fn find_item(
    controller: &PageController<ProductCatalogPage>,
    section_key: &str,
    text: &str,
) -> SidebarItem {
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
async fn category_href_preserves_existing_scalars() {
    let controller = catalog("/product/webcat?class=CQT+Stock");
    let engines = find_item(&controller, "category", "Engines");
    assert_eq!(
        engines.url.as_deref(),
        Some("/product/webcat?class=CQT+Stock&category=Engines")
    );
}

#[tokio::test(start_paused = true)]
async fn category_section_disappears_without_a_class() {
    let controller = catalog("/product/webcat");
    assert!(
        !controller
            .sidebar()
            .sections()
            .iter()
            .any(|section| section.key() == "category")
    );
}

#[tokio::test(start_paused = true)]
async fn category_options_track_the_selected_class() {
    let controller = catalog("/product/webcat?class=Performance");
    let texts: Vec<String> = controller
        .sidebar()
        .sections()
        .iter()
        .find(|section| section.key() == "category")
        .expect("category section")
        .items
        .iter()
        .map(|item| item.text.clone())
        .collect();
    assert_eq!(texts, vec!["Exhaust", "Intakes"]);
}

#[tokio::test(start_paused = true)]
async fn feature_clicks_accumulate_through_the_page_delegate() {
    let mut controller = catalog("/product/webcat?class=CQT+Stock");
    let in_stock = find_item(&controller, "features", "In Stock");
    controller.sidebar().click("features", &in_stock);
    controller.run_until_idle().await.expect("run");
    assert_eq!(
        controller.url().url(),
        "/product/webcat?class=CQT+Stock&features=In+Stock"
    );

    let clearance = find_item(&controller, "features", "Clearance");
    controller.sidebar().click("features", &clearance);
    controller.run_until_idle().await.expect("run");
    assert_eq!(
        controller.url().url(),
        "/product/webcat?class=CQT+Stock&features=In+Stock%2CClearance"
    );
    assert_eq!(controller.page().features(), &["In Stock", "Clearance"]);

    // clicking a selected feature removes exactly that value
    let in_stock = find_item(&controller, "features", "In Stock");
    assert!(in_stock.selected);
    controller.sidebar().click("features", &in_stock);
    controller.run_until_idle().await.expect("run");
    assert_eq!(
        controller.url().url(),
        "/product/webcat?class=CQT+Stock&features=Clearance"
    );
    assert_eq!(controller.page().features(), &["Clearance"]);
}

#[tokio::test(start_paused = true)]
async fn class_click_navigates_via_the_item_url() {
    let mut controller = catalog("/product/webcat");
    let performance = find_item(&controller, "class", "Performance");
    controller.sidebar().click("class", &performance);
    controller.run_until_idle().await.expect("run");
    assert_eq!(controller.url().url(), "/product/webcat?class=Performance");
    // the rebuild now offers that class's categories
    assert!(
        controller
            .sidebar()
            .sections()
            .iter()
            .any(|section| section.key() == "category")
    );
}

#[tokio::test(start_paused = true)]
async fn legend_section_renders_without_links() {
    let controller = catalog("/product/webcat");
    let legend = controller
        .sidebar()
        .sections()
        .iter()
        .find(|section| section.is_legend)
        .expect("legend section")
        .clone();
    assert!(legend.items.iter().all(|item| item.url.is_none()));
    assert!((0..legend.items.len()).all(|index| !controller.item_selected(&legend, index)));
}
