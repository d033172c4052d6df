use std::time::Duration;

pub const DEFAULT_MULTI_SEPARATOR: char = ',';
pub const DEFAULT_DEBOUNCE_WINDOW: Duration = Duration::from_millis(25);

/// Scalar preserved across nearly all navigations regardless of target page.
pub const DEALER_KEY: &str = "dealer";
/// Reserved section whose selection is purely query-driven, defaulting to
/// the first item when the parameter is absent.
pub const ASN_SECTION_KEY: &str = "asn";
/// Section excluded from the two-way-bound selection fallback.
pub const OPTION_SECTION_KEY: &str = "option";
pub const FRANCHISE_SECTION_KEY: &str = "franchise";
pub const FRANCHISE_SECTION_TITLE: &str = "Franchise";
/// Item-key prefix that routes a click to franchise selection instead of a
/// plain URL navigation.
pub const FRANCHISE_KEY_PREFIX: &str = "franchise:";
pub const ALL_ITEM_TEXT: &str = "All";

/// Knobs for the navigation core. One instance per page controller.
#[derive(Clone, Debug)]
pub struct NavConfig {
    /// Separator for multi-value query parameters.
    pub multi_separator: char,
    /// Delay used to coalesce rapid successive location changes into one
    /// rebuild. Skipped entirely for self-initiated navigations.
    pub debounce_window: Duration,
    pub dealer_key: String,
    pub asn_section_key: String,
    pub option_section_key: String,
    pub all_item_text: String,
    /// Static `section key -> query key` table driving selection rule 3.
    pub section_query_keys: Vec<(String, String)>,
    /// The one table-mapped section that defaults to the "All" item when
    /// its query key is absent. Other mapped sections default to nothing.
    pub all_default_section: Option<String>,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            multi_separator: DEFAULT_MULTI_SEPARATOR,
            debounce_window: DEFAULT_DEBOUNCE_WINDOW,
            dealer_key: DEALER_KEY.to_string(),
            asn_section_key: ASN_SECTION_KEY.to_string(),
            option_section_key: OPTION_SECTION_KEY.to_string(),
            all_item_text: ALL_ITEM_TEXT.to_string(),
            section_query_keys: vec![
                ("status".to_string(), "status".to_string()),
                ("class".to_string(), "class".to_string()),
                ("category".to_string(), "category".to_string()),
            ],
            all_default_section: Some("status".to_string()),
        }
    }
}

impl NavConfig {
    pub fn query_key_for(&self, section_key: &str) -> Option<&str> {
        self.section_query_keys
            .iter()
            .find(|(section, _)| section.eq_ignore_ascii_case(section_key))
            .map(|(_, query_key)| query_key.as_str())
    }

    pub fn defaults_to_all(&self, section_key: &str) -> bool {
        self.all_default_section
            .as_deref()
            .is_some_and(|section| section.eq_ignore_ascii_case(section_key))
    }
}
