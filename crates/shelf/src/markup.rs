//! Render engine: turns filter results and panel state into markup.
//!
//! Every data-sourced string is passed through [`escape`] before it is
//! inserted, whether as element content or inside an attribute value.

use crate::catalog::Catalog;
use crate::filter::Filtered;
use crate::item::{Category, Item};
use crate::panel::{Chip, FilterPanel};
use shelf_core::html::escape;

pub const NO_RESULTS: &str = "No software matches your search or filters.";
pub const LOAD_FAILED: &str = "Failed to load catalog. Please refresh.";

fn placeholder(message: &str) -> String {
    format!("<div class=\"no-results\">{}</div>", escape(message))
}

/// Grid content for a filter result: one card per visible item, or the
/// "no results" placeholder.
pub fn grid(catalog: &Catalog, filtered: &Filtered) -> String {
    if filtered.visible.is_empty() {
        return placeholder(NO_RESULTS);
    }
    filtered.items(catalog).map(card).collect()
}

/// Grid content shown in place of results when the catalog could not be
/// fetched.
pub fn load_failed() -> String {
    placeholder(LOAD_FAILED)
}

/// A single linked card.
pub fn card(item: &Item) -> String {
    let glyph = escape(&item.glyph().to_string());
    let logo = match &item.logo {
        Some(src) => format!(
            "<img class=\"card-logo\" src=\"{}\" alt=\"\" \
             onerror=\"this.style.display='none'; this.nextElementSibling.style.display='flex';\">\
             <div class=\"logo-placeholder\" style=\"display:none;\">{glyph}</div>",
            escape(src)
        ),
        None => format!("<div class=\"logo-placeholder\">{glyph}</div>"),
    };
    let badges: String = item.badges().map(badge).collect();
    let class = if item.featured {
        "software-card featured"
    } else {
        "software-card"
    };

    format!(
        "<a href=\"{href}\" class=\"{class}\">\
         <div class=\"card-header\">{logo}<div class=\"card-name\">{name}</div></div>\
         <div class=\"card-tagline\">{tagline}</div>\
         <div class=\"card-badges\">{badges}</div>\
         </a>",
        href = escape(&item.detail_href()),
        name = escape(&item.name),
        tagline = escape(&item.tagline),
    )
}

/// A card badge, styled by the category kind.
pub fn badge(category: &Category) -> String {
    let name = escape(&category.name);
    format!(
        "<span class=\"badge badge-{}\" data-name=\"{name}\">{name}</span>",
        escape(category.kind.as_str())
    )
}

/// Removable chips for the active category filters.  Empty when nothing is
/// selected.
pub fn chips(chips: &[Chip]) -> String {
    chips
        .iter()
        .map(|chip| {
            format!(
                "<button class=\"active-filter\" data-id=\"{}\">{} &times;</button>",
                escape(&chip.value),
                escape(&chip.label)
            )
        })
        .collect()
}

/// Status line under the search box.
pub fn count(filtered: &Filtered) -> String {
    filtered.count_text()
}

/// Sidebar checkboxes, one titled group per category kind.
pub fn filter_panel(panel: &FilterPanel) -> String {
    let mut out = String::new();
    for (kind, controls) in panel.groups() {
        out.push_str("<div class=\"filter-group\">");
        out.push_str(&format!(
            "<h3 class=\"filter-group-title\">{}</h3>",
            escape(kind.group_label())
        ));
        for control in controls {
            out.push_str(&format!(
                "<label class=\"filter-option\">\
                 <input type=\"checkbox\" value=\"{value}\"{checked}> \
                 <span class=\"badge badge-{kind}\">{label}</span>\
                 </label>",
                value = escape(&control.value),
                checked = if control.checked { " checked" } else { "" },
                kind = escape(control.kind.as_str()),
                label = escape(control.display_name()),
            ));
        }
        out.push_str("</div>");
    }
    out
}
