//! Render-time selection evaluation. Several sections declare overlapping
//! fallback rules; this single precedence order resolves them so no item
//! can end up double-selected. Selection is recomputed live from the URL
//! snapshot on every render pass and never cached across URL changes.

use crate::config::NavConfig;
use crate::query;
use crate::query::Snapshot;
use crate::sidebar::SidebarSection;
use std::collections::HashMap;

pub struct SelectionContext<'a> {
    pub snapshot: &'a Snapshot,
    pub current_path: &'a str,
    /// Externally supplied two-way-bound selection map, keyed by section.
    pub bound_selections: Option<&'a HashMap<String, String>>,
    pub config: &'a NavConfig,
}

/// Precedence (first applicable rule wins):
/// 1. legend and franchise-selector sections are never selected;
/// 2. the reserved always-query-driven section compares against its query
///    parameter, auto-selecting the first item when it is absent;
/// 3. a section in the `section key -> query key` table compares item text
///    against the query value, one designated section defaulting to the
///    "All" item when the key is absent;
/// 4. an item whose URL carries no query component is selected when its
///    path equals the current path;
/// 5. the two-way-bound selection map (excluding the "option" section);
/// 6. the legacy build-time `selected` flag.
///
/// Rules 1-3 are decisive for their sections; rules 4 and 5 fall through
/// on a miss.
pub fn is_item_selected(
    section: &SidebarSection,
    item_index: usize,
    ctx: &SelectionContext<'_>,
) -> bool {
    let Some(item) = section.items.get(item_index) else {
        return false;
    };
    if section.is_legend || section.is_franchise_selector {
        return false;
    }
    let section_key = section.key();

    if section_key.eq_ignore_ascii_case(&ctx.config.asn_section_key) {
        return match ctx.snapshot.get(&ctx.config.asn_section_key) {
            Some(value) => value.eq_ignore_ascii_case(item.selection_key()),
            None => item_index == 0,
        };
    }

    if let Some(query_key) = ctx.config.query_key_for(&section_key) {
        return match ctx.snapshot.get(query_key) {
            Some(value) => value.eq_ignore_ascii_case(&item.text),
            None => {
                ctx.config.defaults_to_all(&section_key)
                    && item.text.eq_ignore_ascii_case(&ctx.config.all_item_text)
            }
        };
    }

    if let Some(url) = item.url.as_deref() {
        if !url.contains('?') && query::paths_equal(url, ctx.current_path) {
            return true;
        }
    }

    if !section_key.eq_ignore_ascii_case(&ctx.config.option_section_key) {
        if let Some(bound) = ctx.bound_selections {
            let matched = bound
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(&section_key))
                .map(|(_, text)| text.eq_ignore_ascii_case(item.selection_key()));
            if matched == Some(true) {
                return true;
            }
        }
    }

    item.selected
}
