//! Pure transform from facet definitions plus the page's current
//! scalar/multi state to renderable sidebar sections with computed hrefs.
//!
//! Facet hrefs are always rebuilt from the page-supplied snapshot alone
//! (reset semantics): a facet link must not inherit scalars the page did
//! not ask to carry.

use crate::config::FRANCHISE_KEY_PREFIX;
use crate::config::FRANCHISE_SECTION_KEY;
use crate::config::FRANCHISE_SECTION_TITLE;
use crate::config::NavConfig;
use crate::facet::Facet;
use crate::facet::FacetOption;
use crate::query;
use crate::query::Snapshot;
use crate::sidebar::SidebarItem;
use crate::sidebar::SidebarSection;

pub struct BuildInput<'a> {
    pub facets: &'a [Facet],
    /// Current scalar snapshot as the page read it from the URL.
    pub scalars: &'a Snapshot,
    /// Current multi-selections per facet key, values in URL order.
    pub multi: &'a [(String, Vec<String>)],
    pub base_path: &'a str,
    /// When present, a franchise-selector section is rendered first.
    pub franchise_dealers: Option<&'a [FacetOption]>,
}

pub fn build_sections(input: &BuildInput<'_>, config: &NavConfig) -> Vec<SidebarSection> {
    let mut sections = Vec::with_capacity(input.facets.len() + 1);
    if let Some(dealers) = input.franchise_dealers {
        sections.push(franchise_section(dealers));
    }
    for facet in input.facets {
        if let Some(section) = facet_section(facet, input, config) {
            sections.push(section);
        }
    }
    sections
}

fn facet_section(
    facet: &Facet,
    input: &BuildInput<'_>,
    config: &NavConfig,
) -> Option<SidebarSection> {
    let parent_value = match facet.parent_key() {
        Some(parent) => match input.scalars.get(parent) {
            Some(value) => Some(value.to_string()),
            // dependent facet without its parent scalar renders nothing
            None => return None,
        },
        None => None,
    };
    let mut options = facet.options().produce();
    if let (Some(parent_value), Some(predicate)) = (&parent_value, facet.parent_predicate()) {
        options.retain(|option| predicate(parent_value, option));
    }
    if options.is_empty() {
        return None;
    }

    let items = if facet.is_legend() {
        options.into_iter().map(legend_item).collect()
    } else if facet.is_multi() {
        let current = input
            .multi
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(facet.key()))
            .map(|(_, values)| values.as_slice())
            .unwrap_or_default();
        options
            .into_iter()
            .map(|option| multi_item(option, facet.key(), current, input, config))
            .collect()
    } else {
        let scalar = input.scalars.get(facet.key()).map(str::to_string);
        options
            .into_iter()
            .map(|option| scalar_item(option, facet.key(), scalar.as_deref(), input, config))
            .collect()
    };

    Some(SidebarSection {
        section_key: Some(facet.key().to_string()),
        title: facet.title().to_string(),
        is_legend: facet.is_legend(),
        is_franchise_selector: false,
        items,
    })
}

/// Legend entries are static color/label pairs: no href, never selected.
fn legend_item(option: FacetOption) -> SidebarItem {
    SidebarItem {
        text: option.text,
        key: None,
        icon: option.icon,
        color_hex: option.color_hex,
        url: None,
        selected: false,
    }
}

fn scalar_item(
    option: FacetOption,
    facet_key: &str,
    scalar: Option<&str>,
    input: &BuildInput<'_>,
    config: &NavConfig,
) -> SidebarItem {
    let token = option.value().to_string();
    let selected = scalar.is_some_and(|value| value.eq_ignore_ascii_case(&token));
    let url = option
        .href
        .unwrap_or_else(|| href_with(input, config, facet_key, Some(&token)));
    SidebarItem {
        text: option.text,
        key: option.value,
        icon: option.icon,
        color_hex: option.color_hex,
        url: Some(url),
        selected,
    }
}

/// Clicking a multi option toggles its membership: remove if present, add
/// if absent, order of the remaining values preserved.
fn multi_item(
    option: FacetOption,
    facet_key: &str,
    current: &[String],
    input: &BuildInput<'_>,
    config: &NavConfig,
) -> SidebarItem {
    let selected = current
        .iter()
        .any(|value| value.eq_ignore_ascii_case(option.value()));
    let url = option.href.clone().unwrap_or_else(|| {
        let toggled = toggle(current, option.value());
        let joined = joined(&toggled, config);
        href_with(input, config, facet_key, joined.as_deref())
    });
    SidebarItem {
        text: option.text,
        key: option.value,
        icon: option.icon,
        color_hex: option.color_hex,
        url: Some(url),
        selected,
    }
}

fn franchise_section(dealers: &[FacetOption]) -> SidebarSection {
    let items = dealers
        .iter()
        .map(|dealer| SidebarItem {
            text: dealer.text.clone(),
            key: Some(format!("{FRANCHISE_KEY_PREFIX}{}", dealer.value())),
            icon: dealer.icon.clone(),
            color_hex: dealer.color_hex.clone(),
            url: None,
            selected: false,
        })
        .collect();
    SidebarSection {
        section_key: Some(FRANCHISE_SECTION_KEY.to_string()),
        title: FRANCHISE_SECTION_TITLE.to_string(),
        is_legend: false,
        is_franchise_selector: true,
        items,
    }
}

pub fn toggle(current: &[String], value: &str) -> Vec<String> {
    if current
        .iter()
        .any(|existing| existing.eq_ignore_ascii_case(value))
    {
        current
            .iter()
            .filter(|existing| !existing.eq_ignore_ascii_case(value))
            .cloned()
            .collect()
    } else {
        let mut next = current.to_vec();
        next.push(value.to_string());
        next
    }
}

pub fn joined(values: &[String], config: &NavConfig) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(&config.multi_separator.to_string()))
    }
}

/// Serializes the page snapshot (scalars plus joined multi parameters)
/// with one facet's parameter replaced or removed.
fn href_with(
    input: &BuildInput<'_>,
    config: &NavConfig,
    facet_key: &str,
    value: Option<&str>,
) -> String {
    let mut snapshot = input.scalars.clone();
    for (key, values) in input.multi {
        if let Some(param) = joined(values, config) {
            snapshot.insert(key, &param);
        }
    }
    match value {
        Some(value) => snapshot.insert(facet_key, value),
        None => snapshot.remove(facet_key),
    }
    query::serialize(input.base_path, &snapshot)
}
