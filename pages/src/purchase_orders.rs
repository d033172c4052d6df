//! Purchase orders page: query-driven status facet (with an "All" default
//! carrying an explicit href so it clears the parameter), an ASN section
//! that default-selects its first entry, a status legend and the
//! franchise selector.

use portal_nav::Facet;
use portal_nav::FacetOption;
use portal_nav::PageSpec;
use portal_nav::Snapshot;
use portal_nav::query;

pub const PURCHASE_ORDERS_BASE_PATH: &str = "/orders/purchase";

const STATUSES: &[&str] = &["Open", "Closed", "Cancelled"];

#[derive(Debug)]
pub struct PurchaseOrdersPage {
    dealer: Option<String>,
    status: Option<String>,
    asn: Option<String>,
    /// Advance-ship-notice numbers for the current dealer, seeded by the
    /// hosting page.
    asn_numbers: Vec<String>,
    dealers: Vec<FacetOption>,
}

impl PurchaseOrdersPage {
    pub fn new(asn_numbers: Vec<String>, dealers: Vec<FacetOption>) -> Self {
        Self {
            dealer: None,
            status: None,
            asn: None,
            asn_numbers,
            dealers,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn asn(&self) -> Option<&str> {
        self.asn.as_deref()
    }

    /// The "All" item must not inherit the status scalar, so it carries a
    /// precomputed href built without it.
    fn all_item_href(&self) -> String {
        let mut snapshot = Snapshot::new();
        if let Some(dealer) = &self.dealer {
            snapshot.insert("dealer", dealer);
        }
        query::serialize(PURCHASE_ORDERS_BASE_PATH, &snapshot)
    }
}

impl PageSpec for PurchaseOrdersPage {
    fn base_path(&self) -> &str {
        PURCHASE_ORDERS_BASE_PATH
    }

    fn facets(&self) -> Vec<Facet> {
        let mut status_options = vec![FacetOption::new("All").with_href(self.all_item_href())];
        status_options.extend(STATUSES.iter().map(|status| FacetOption::new(*status)));
        let asn_numbers = self.asn_numbers.clone();
        vec![
            Facet::new("status", "Status").with_options(status_options),
            Facet::new("asn", "ASN").with_lazy_options(move || {
                asn_numbers
                    .iter()
                    .map(|number| FacetOption::new(number.clone()))
                    .collect()
            }),
            Facet::new("status-legend", "Status legend").legend().with_options(vec![
                FacetOption::new("Open").with_color("#2e7d32"),
                FacetOption::new("Closed").with_color("#607d8b"),
                FacetOption::new("Cancelled").with_color("#c62828"),
            ]),
        ]
    }

    fn read_from_url(&mut self, snapshot: &Snapshot) {
        self.dealer = snapshot.get("dealer").map(str::to_string);
        self.status = snapshot.get("status").map(str::to_string);
        self.asn = snapshot.get("asn").map(str::to_string);
    }

    fn scalars(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        if let Some(dealer) = &self.dealer {
            snapshot.insert("dealer", dealer);
        }
        if let Some(status) = &self.status {
            snapshot.insert("status", status);
        }
        if let Some(asn) = &self.asn {
            snapshot.insert("asn", asn);
        }
        snapshot
    }

    fn franchise_dealers(&self) -> Option<Vec<FacetOption>> {
        if self.dealers.is_empty() {
            None
        } else {
            Some(self.dealers.clone())
        }
    }
}
