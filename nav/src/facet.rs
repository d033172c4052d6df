//! Declarative description of a navigable dimension. Facets are defined
//! per page and immutable for the page's lifetime.

use std::fmt;
use std::sync::Arc;

/// Produces a facet's options. Lazy sources are invoked fresh on every
/// rebuild so option lists can track page state.
#[derive(Clone)]
pub enum OptionSource {
    Static(Vec<FacetOption>),
    Lazy(Arc<dyn Fn() -> Vec<FacetOption> + Send + Sync>),
}

impl OptionSource {
    pub fn produce(&self) -> Vec<FacetOption> {
        match self {
            OptionSource::Static(options) => options.clone(),
            OptionSource::Lazy(producer) => producer(),
        }
    }
}

impl fmt::Debug for OptionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionSource::Static(options) => {
                f.debug_tuple("Static").field(&options.len()).finish()
            }
            OptionSource::Lazy(_) => f.debug_tuple("Lazy").finish(),
        }
    }
}

impl Default for OptionSource {
    fn default() -> Self {
        OptionSource::Static(Vec::new())
    }
}

/// Predicate deciding whether an option of a dependent facet is valid for
/// the parent facet's current scalar value.
pub type ParentPredicate = Arc<dyn Fn(&str, &FacetOption) -> bool + Send + Sync>;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FacetOption {
    pub text: String,
    /// Selection token; falls back to `text` when unset.
    pub value: Option<String>,
    pub icon: Option<String>,
    pub color_hex: Option<String>,
    /// Precomputed navigation target that bypasses default URL
    /// construction.
    pub href: Option<String>,
}

impl FacetOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_color(mut self, color_hex: impl Into<String>) -> Self {
        self.color_hex = Some(color_hex.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_href(mut self, href: impl Into<String>) -> Self {
        self.href = Some(href.into());
        self
    }

    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.text)
    }
}

#[derive(Clone)]
pub struct Facet {
    key: String,
    title: String,
    options: OptionSource,
    is_legend: bool,
    is_multi: bool,
    depends_on: Option<String>,
    valid_for_parent: Option<ParentPredicate>,
}

impl fmt::Debug for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facet")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("options", &self.options)
            .field("is_legend", &self.is_legend)
            .field("is_multi", &self.is_multi)
            .field("depends_on", &self.depends_on)
            .field("has_parent_predicate", &self.valid_for_parent.is_some())
            .finish()
    }
}

impl Facet {
    /// Keys are lower-cased up front so every later comparison is cheap.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into().to_ascii_lowercase(),
            title: title.into(),
            options: OptionSource::default(),
            is_legend: false,
            is_multi: false,
            depends_on: None,
            valid_for_parent: None,
        }
    }

    pub fn with_options(mut self, options: Vec<FacetOption>) -> Self {
        self.options = OptionSource::Static(options);
        self
    }

    pub fn with_lazy_options(
        mut self,
        producer: impl Fn() -> Vec<FacetOption> + Send + Sync + 'static,
    ) -> Self {
        self.options = OptionSource::Lazy(Arc::new(producer));
        self
    }

    pub fn legend(mut self) -> Self {
        self.is_legend = true;
        self
    }

    pub fn multi(mut self) -> Self {
        self.is_multi = true;
        self
    }

    pub fn depends_on(mut self, parent_key: impl Into<String>) -> Self {
        self.depends_on = Some(parent_key.into().to_ascii_lowercase());
        self
    }

    pub fn valid_for_parent(
        mut self,
        predicate: impl Fn(&str, &FacetOption) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.valid_for_parent = Some(Arc::new(predicate));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn options(&self) -> &OptionSource {
        &self.options
    }

    pub fn is_legend(&self) -> bool {
        self.is_legend
    }

    pub fn is_multi(&self) -> bool {
        self.is_multi
    }

    pub fn parent_key(&self) -> Option<&str> {
        self.depends_on.as_deref()
    }

    pub fn parent_predicate(&self) -> Option<&ParentPredicate> {
        self.valid_for_parent.as_ref()
    }
}
