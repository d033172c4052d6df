//! Product catalog page: class/category drill-down plus a multi-select
//! `features` facet. The category facet depends on the chosen class, and
//! feature clicks are handled by the page itself so selections accumulate
//! instead of replacing each other.

use anyhow::Result;
use portal_nav::Facet;
use portal_nav::FacetOption;
use portal_nav::PageSpec;
use portal_nav::Snapshot;
use portal_nav::UrlState;
use portal_nav::builder;
use portal_nav::config::DEFAULT_MULTI_SEPARATOR;
use portal_nav::sidebar::SidebarItem;
use tracing::debug;

pub const CATALOG_BASE_PATH: &str = "/product/webcat";
const FEATURES_KEY: &str = "features";

const CLASSES: &[&str] = &["CQT Stock", "Performance", "Accessories"];
const FEATURES: &[&str] = &["In Stock", "Clearance", "Backordered"];

fn categories_for(class: &str) -> &'static [&'static str] {
    match class {
        "CQT Stock" => &["Engines", "Transmissions", "Brakes"],
        "Performance" => &["Exhaust", "Intakes"],
        _ => &[],
    }
}

#[derive(Debug, Default)]
pub struct ProductCatalogPage {
    dealer: Option<String>,
    class: Option<String>,
    category: Option<String>,
    features: Vec<String>,
}

impl ProductCatalogPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }
}

impl PageSpec for ProductCatalogPage {
    fn base_path(&self) -> &str {
        CATALOG_BASE_PATH
    }

    fn facets(&self) -> Vec<Facet> {
        vec![
            Facet::new("class", "Class")
                .with_options(CLASSES.iter().map(|class| FacetOption::new(*class)).collect()),
            Facet::new("category", "Category")
                .depends_on("class")
                .valid_for_parent(|class, option| {
                    categories_for(class).contains(&option.text.as_str())
                })
                .with_lazy_options(|| {
                    // every category any class offers; the parent predicate
                    // narrows the list per rebuild
                    CLASSES
                        .iter()
                        .flat_map(|class| categories_for(class))
                        .map(|category| FacetOption::new(*category))
                        .collect()
                }),
            Facet::new(FEATURES_KEY, "Features")
                .multi()
                .with_options(FEATURES.iter().map(|feature| FacetOption::new(*feature)).collect()),
            Facet::new("availability", "Availability").legend().with_options(vec![
                FacetOption::new("In stock").with_color("#2e7d32"),
                FacetOption::new("Low stock").with_color("#f9a825"),
                FacetOption::new("Out of stock").with_color("#c62828"),
            ]),
        ]
    }

    fn read_from_url(&mut self, snapshot: &Snapshot) {
        self.dealer = snapshot.get("dealer").map(str::to_string);
        self.class = snapshot.get("class").map(str::to_string);
        self.category = snapshot.get("category").map(str::to_string);
        self.features = snapshot
            .get(FEATURES_KEY)
            .map(|joined| {
                joined
                    .split(DEFAULT_MULTI_SEPARATOR)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
    }

    fn scalars(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        if let Some(dealer) = &self.dealer {
            snapshot.insert("dealer", dealer);
        }
        if let Some(class) = &self.class {
            snapshot.insert("class", class);
        }
        if let Some(category) = &self.category {
            snapshot.insert("category", category);
        }
        snapshot
    }

    fn multi_selections(&self) -> Vec<(String, Vec<String>)> {
        vec![(FEATURES_KEY.to_string(), self.features.clone())]
    }

    fn handles_multi_facet_clicks(&self) -> bool {
        true
    }

    fn on_item_click(
        &mut self,
        section_key: &str,
        item: &SidebarItem,
        url: &mut UrlState,
    ) -> Result<()> {
        if section_key.eq_ignore_ascii_case(FEATURES_KEY) {
            self.features = builder::toggle(&self.features, item.selection_key());
            let joined = self
                .features
                .join(&DEFAULT_MULTI_SEPARATOR.to_string());
            debug!(features = %joined, "accumulating feature selection");
            url.set(&[(FEATURES_KEY, (!joined.is_empty()).then_some(joined.as_str()))]);
            return Ok(());
        }
        if let Some(target) = item.url.as_deref() {
            url.set_location(target)?;
        }
        Ok(())
    }
}
