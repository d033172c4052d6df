//! Mutable sidebar view state: sections, per-section selection, visibility
//! and the single-slot click handler. Every mutation raises a change
//! notification; selection flags never survive a mutation stale.

use crate::observe::Observer;
use crate::observe::Observers;
use crate::observe::SubscriptionId;
use std::collections::HashMap;
use std::sync::Arc;

pub type ItemSelectedHandler = Arc<dyn Fn(&str, &SidebarItem) + Send + Sync>;

/// Raised on every sidebar mutation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StateChanged;

/// Lower-case, non-alphanumeric runs collapse to a single `-`,
/// leading/trailing `-` trimmed.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for ch in title.chars() {
        if ch.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SidebarItem {
    pub text: String,
    /// Selection token; comparisons fall back to `text` when unset.
    pub key: Option<String>,
    pub icon: Option<String>,
    pub color_hex: Option<String>,
    /// Precomputed navigation target.
    pub url: Option<String>,
    /// Legacy build-time flag. Authoritative selection is recomputed live
    /// from the URL at render time (see the `selection` module).
    pub selected: bool,
}

impl SidebarItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn selection_key(&self) -> &str {
        self.key.as_deref().unwrap_or(&self.text)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SidebarSection {
    /// Defaults to a slug of `title` when unset.
    pub section_key: Option<String>,
    pub title: String,
    pub is_legend: bool,
    pub is_franchise_selector: bool,
    pub items: Vec<SidebarItem>,
}

impl SidebarSection {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn key(&self) -> String {
        self.section_key
            .clone()
            .unwrap_or_else(|| slugify(&self.title))
    }
}

#[derive(Default)]
pub struct SidebarState {
    sections: Vec<SidebarSection>,
    selections: HashMap<String, String>,
    is_visible: bool,
    is_collapsed: bool,
    item_handler: Option<ItemSelectedHandler>,
    observers: Observers<StateChanged>,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sections(&self) -> &[SidebarSection] {
        &self.sections
    }

    pub fn selection(&self, section_key: &str) -> Option<&str> {
        self.selections
            .get(&section_key.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn is_visible(&self) -> bool {
        self.is_visible
    }

    pub fn is_collapsed(&self) -> bool {
        self.is_collapsed
    }

    pub fn subscribe(&mut self, observer: Observer<StateChanged>) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Replaces the current sections with a deep clone of `sections` (the
    /// builder's transient lists are never aliased), reseeds the selection
    /// map and re-derives the `selected` flags of every section the map
    /// covers; uncovered sections keep their build-time flags.
    pub fn set_sections(
        &mut self,
        sections: &[SidebarSection],
        initial_selections: Option<&HashMap<String, String>>,
    ) {
        self.sections = sections.to_vec();
        self.selections.clear();
        if let Some(initial) = initial_selections {
            for (section_key, text) in initial {
                self.selections
                    .insert(section_key.to_ascii_lowercase(), text.clone());
            }
        }
        for section in &mut self.sections {
            apply_selection(section, &self.selections);
        }
        self.is_visible = !self.sections.is_empty();
        self.observers.notify(&StateChanged);
    }

    /// Updates one section's selection and re-derives that section's item
    /// flags only.
    pub fn set_selection(&mut self, section_key: &str, text: &str) {
        let normalized = section_key.to_ascii_lowercase();
        self.selections.insert(normalized.clone(), text.to_string());
        if let Some(section) = self
            .sections
            .iter_mut()
            .find(|section| section.key().eq_ignore_ascii_case(&normalized))
        {
            apply_selection(section, &self.selections);
        }
        self.observers.notify(&StateChanged);
    }

    /// Clears sections and selections. Visibility drops only when `hide`
    /// is set.
    pub fn reset_all(&mut self, hide: bool) {
        self.sections.clear();
        self.selections.clear();
        if hide {
            self.is_visible = false;
        }
        self.observers.notify(&StateChanged);
    }

    pub fn set_collapsed(&mut self, collapsed: bool) {
        if self.is_collapsed == collapsed {
            return;
        }
        self.is_collapsed = collapsed;
        self.observers.notify(&StateChanged);
    }

    /// Exactly one click handler at a time; assigning silently replaces
    /// the previous one.
    pub fn set_item_handler(&mut self, handler: ItemSelectedHandler) {
        self.item_handler = Some(handler);
    }

    /// Clears the handler only when `handler` is the one currently
    /// registered, so a stale owner cannot clobber a newer registration.
    pub fn clear_item_handler_if(&mut self, handler: &ItemSelectedHandler) -> bool {
        match &self.item_handler {
            Some(current) if Arc::ptr_eq(current, handler) => {
                self.item_handler = None;
                true
            }
            _ => false,
        }
    }

    pub fn has_item_handler(&self) -> bool {
        self.item_handler.is_some()
    }

    /// Entry point for the view: routes a clicked item to the registered
    /// handler, if any.
    pub fn click(&self, section_key: &str, item: &SidebarItem) {
        if let Some(handler) = &self.item_handler {
            handler(section_key, item);
        }
    }
}

impl std::fmt::Debug for SidebarState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SidebarState")
            .field("sections", &self.sections.len())
            .field("is_visible", &self.is_visible)
            .field("is_collapsed", &self.is_collapsed)
            .field("has_item_handler", &self.item_handler.is_some())
            .finish()
    }
}

/// Re-derives a section's item flags from its selection-map entry. A
/// section with no entry keeps the flags the builder computed (multi
/// facets carry their membership this way).
fn apply_selection(section: &mut SidebarSection, selections: &HashMap<String, String>) {
    let Some(selected) = selections.get(&section.key().to_ascii_lowercase()) else {
        return;
    };
    for item in &mut section.items {
        item.selected = selected.eq_ignore_ascii_case(item.selection_key());
    }
}
