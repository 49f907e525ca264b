use crate::html::escape;

/// Content written into a single page region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    /// Ready-made markup, inserted as the region's inner HTML.
    Html(String),
    /// Plain text content. Escaped when the page is serialized.
    Text(String),
}

impl Fragment {
    /// The markup this fragment contributes to its region.
    pub fn to_html(&self) -> String {
        match self {
            Fragment::Html(html) => html.clone(),
            Fragment::Text(text) => escape(text),
        }
    }
}

/// A single addressable region of the page, identified by its element id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    id: String,
    content: Fragment,
    classes: Vec<String>,
}

impl Region {
    /// The element id of this region.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The content last written to this region.
    pub fn content(&self) -> &Fragment {
        &self.content
    }

    /// Extra classes applied to the region element.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

/// The document a [`Model`](crate::Model) renders into.
///
/// `Page` plays the role a terminal frame plays in a TUI: the runtime hands a
/// `&mut Page` to [`Model::view`](crate::Model::view) and the model writes
/// whichever regions it owns.  Regions are addressed by element id and kept in
/// first-write order.  Writing a region replaces its content wholesale.
///
/// A region that was never written is absent, which lets callers distinguish
/// "rendered empty" from "never initialized".
///
/// # Example
///
/// ```
/// use shelf_core::Page;
///
/// let mut page = Page::new();
/// page.set_text("catalogCount", "2 of 5 items");
/// page.set_html("softwareGrid", "<div class=\"no-results\">nothing</div>");
///
/// assert_eq!(page.text("catalogCount"), Some("2 of 5 items"));
/// assert!(page.inner_html("activeFilters").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    regions: Vec<Region>,
}

impl Page {
    /// Create an empty page with no regions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the inner HTML of region `id`.
    pub fn set_html(&mut self, id: &str, html: impl Into<String>) {
        self.write(id, Fragment::Html(html.into()));
    }

    /// Replace the text content of region `id`.
    pub fn set_text(&mut self, id: &str, text: impl Into<String>) {
        self.write(id, Fragment::Text(text.into()));
    }

    /// Add or remove `class` on region `id`, creating the region empty if it
    /// does not exist yet.
    pub fn toggle_class(&mut self, id: &str, class: &str, on: bool) {
        let region = self.entry(id);
        let present = region.classes.iter().any(|c| c == class);
        if on && !present {
            region.classes.push(class.to_string());
        } else if !on && present {
            region.classes.retain(|c| c != class);
        }
    }

    /// Look up a region by element id.
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Serialized inner HTML of region `id`, if it was ever written.
    pub fn inner_html(&self, id: &str) -> Option<String> {
        self.region(id).map(|r| r.content.to_html())
    }

    /// Raw text content of region `id`, if it holds text.
    pub fn text(&self, id: &str) -> Option<&str> {
        match self.region(id).map(|r| &r.content) {
            Some(Fragment::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Whether region `id` carries `class`.
    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.region(id)
            .is_some_and(|r| r.classes.iter().any(|c| c == class))
    }

    /// All regions in first-write order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Whether no region has been written.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Serialize every region as a `<div id="...">` element.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for region in &self.regions {
            out.push_str(&region_html(region));
            out.push('\n');
        }
        out
    }

    fn write(&mut self, id: &str, content: Fragment) {
        self.entry(id).content = content;
    }

    fn entry(&mut self, id: &str) -> &mut Region {
        let pos = match self.regions.iter().position(|r| r.id == id) {
            Some(pos) => pos,
            None => {
                self.regions.push(Region {
                    id: id.to_string(),
                    content: Fragment::Html(String::new()),
                    classes: Vec::new(),
                });
                self.regions.len() - 1
            }
        };
        &mut self.regions[pos]
    }
}

/// Serialize one region as a `<div>` carrying its id and classes.
pub fn region_html(region: &Region) -> String {
    let class_attr = if region.classes.is_empty() {
        String::new()
    } else {
        format!(" class=\"{}\"", escape(&region.classes.join(" ")))
    };
    format!(
        "<div id=\"{}\"{}>{}</div>",
        escape(&region.id),
        class_attr,
        region.content.to_html()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn new_page_is_empty() {
        let page = Page::new();
        assert!(page.is_empty());
        assert!(page.region("anything").is_none());
    }

    #[test]
    fn set_html_replaces_content_wholesale() {
        let mut page = Page::new();
        page.set_html("grid", "<p>one</p>");
        page.set_html("grid", "<p>two</p>");
        assert_eq!(page.inner_html("grid").as_deref(), Some("<p>two</p>"));
        assert_eq!(page.regions().len(), 1);
    }

    #[test]
    fn text_is_escaped_on_serialization() {
        let mut page = Page::new();
        page.set_text("count", "<1 of 2>");
        assert_eq!(page.text("count"), Some("<1 of 2>"));
        assert_eq!(page.inner_html("count").as_deref(), Some("&lt;1 of 2&gt;"));
    }

    #[test]
    fn text_accessor_ignores_html_regions() {
        let mut page = Page::new();
        page.set_html("grid", "<p>x</p>");
        assert_eq!(page.text("grid"), None);
    }

    #[test]
    fn regions_keep_first_write_order() {
        let mut page = Page::new();
        page.set_html("b", "");
        page.set_html("a", "");
        page.set_html("b", "again");
        let ids: Vec<_> = page.regions().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn toggle_class_adds_and_removes() {
        let mut page = Page::new();
        page.toggle_class("sidebar", "open", true);
        page.toggle_class("sidebar", "open", true);
        assert!(page.has_class("sidebar", "open"));
        assert_eq!(page.region("sidebar").unwrap().classes().len(), 1);

        page.toggle_class("sidebar", "open", false);
        assert!(!page.has_class("sidebar", "open"));
    }

    #[test]
    fn to_html_serializes_regions() {
        let mut page = Page::new();
        page.set_text("count", "0 of 0 items");
        page.toggle_class("sidebar", "open", true);
        assert_eq!(
            page.to_html(),
            "<div id=\"count\">0 of 0 items</div>\n<div id=\"sidebar\" class=\"open\"></div>\n"
        );
    }
}
