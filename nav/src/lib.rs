//! Navigation core for the dealer portal: the URL query string is the
//! single source of truth for "what is currently selected" and the
//! sidebar is a derived, re-renderable projection of it.
//!
//! The pieces, leaves first: a query codec ([`query`]), the per-session
//! URL authority ([`url_state`]), declarative facet descriptors
//! ([`facet`]), the pure section builder ([`builder`]), the mutable
//! sidebar view state ([`sidebar`]), the render-time selection evaluation
//! ([`selection`]) and the per-page controller that ties them together
//! with a debounced rebuild loop ([`controller`]).

pub mod builder;
pub mod config;
pub mod controller;
pub mod error;
pub mod facet;
pub mod observe;
pub mod query;
pub mod selection;
pub mod sidebar;
pub mod url_state;

pub use builder::BuildInput;
pub use builder::build_sections;
pub use config::NavConfig;
pub use controller::ControllerHandle;
pub use controller::PageController;
pub use controller::PageSpec;
pub use error::NavError;
pub use facet::Facet;
pub use facet::FacetOption;
pub use observe::SubscriptionId;
pub use query::Snapshot;
pub use selection::SelectionContext;
pub use selection::is_item_selected;
pub use sidebar::SidebarItem;
pub use sidebar::SidebarSection;
pub use sidebar::SidebarState;
pub use url_state::NavigateMode;
pub use url_state::UrlState;
