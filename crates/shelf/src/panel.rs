//! Filter sidebar: category checkboxes and the chips they produce.

use crate::filter::Selection;
use crate::item::{Category, CategoryId, CategoryKind};

/// A single category checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterControl {
    /// Raw control value, normally the category id.
    pub value: String,
    /// Visible label next to the checkbox, if any.
    pub label: Option<String>,
    /// Group the control belongs to.
    pub kind: CategoryKind,
    pub checked: bool,
}

impl FilterControl {
    /// An unchecked, unlabeled control in the catch-all group.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
            kind: CategoryKind::Other,
            checked: false,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_kind(mut self, kind: CategoryKind) -> Self {
        self.kind = kind;
        self
    }

    /// The category id encoded in `value`, if it is an integer.
    pub fn category_id(&self) -> Option<CategoryId> {
        self.value.trim().parse::<i64>().ok().map(CategoryId)
    }

    /// Chip text: the label, or the raw value when there is no label.
    pub fn display_name(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

impl From<&Category> for FilterControl {
    fn from(category: &Category) -> Self {
        FilterControl::new(category.id.to_string())
            .with_label(category.name.clone())
            .with_kind(category.kind.clone())
    }
}

/// A removable token for one checked control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    /// Raw value of the control, used to find it again on removal.
    pub value: String,
    pub label: String,
}

/// The ordered set of filter checkboxes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPanel {
    controls: Vec<FilterControl>,
}

impl FilterPanel {
    /// A panel showing `controls` in the given order.
    pub fn new(controls: Vec<FilterControl>) -> Self {
        Self { controls }
    }

    /// One control per category, grouped by kind in panel order and sorted by
    /// name within a group.
    pub fn from_categories(categories: &[Category]) -> Self {
        let mut sorted: Vec<&Category> = categories.iter().collect();
        sorted.sort_by(|a, b| {
            a.kind
                .group_rank()
                .cmp(&b.kind.group_rank())
                .then_with(|| a.kind.as_str().cmp(b.kind.as_str()))
                .then_with(|| a.name.cmp(&b.name))
        });
        Self::new(sorted.into_iter().map(FilterControl::from).collect())
    }

    /// All controls in panel order.
    pub fn controls(&self) -> &[FilterControl] {
        &self.controls
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Set the checked state of every control carrying `id`.  Returns whether
    /// any control matched.
    pub fn set_checked(&mut self, id: CategoryId, checked: bool) -> bool {
        let mut found = false;
        for control in &mut self.controls {
            if control.category_id() == Some(id) {
                control.checked = checked;
                found = true;
            }
        }
        found
    }

    /// Uncheck every control carrying `id`.
    pub fn uncheck(&mut self, id: CategoryId) -> bool {
        self.set_checked(id, false)
    }

    /// Uncheck every control whose raw value is `value`.  This is how a chip
    /// finds its control, so it also works for values that are not ids.
    pub fn uncheck_value(&mut self, value: &str) -> bool {
        let mut found = false;
        for control in &mut self.controls {
            if control.value == value {
                control.checked = false;
                found = true;
            }
        }
        found
    }

    /// Check every control whose id is in `selection`.  An id with no control
    /// gets a checked, unlabeled one appended, so it still filters and can be
    /// removed like any other.
    pub fn check_all(&mut self, selection: &Selection) {
        for id in selection.iter() {
            if !self.set_checked(id, true) {
                let mut control = FilterControl::new(id.to_string());
                control.checked = true;
                self.controls.push(control);
            }
        }
    }

    /// Uncheck every control.
    pub fn clear(&mut self) {
        for control in &mut self.controls {
            control.checked = false;
        }
    }

    /// What the checked controls select.  A checked control without an
    /// integer value makes the selection match nothing.
    pub fn selection(&self) -> Selection {
        let mut selection = Selection::new();
        for control in self.controls.iter().filter(|c| c.checked) {
            match control.category_id() {
                Some(id) => {
                    selection.insert(id);
                }
                None => selection.insert_unresolved(),
            }
        }
        selection
    }

    /// One chip per checked control, in control order.
    pub fn chips(&self) -> Vec<Chip> {
        self.controls
            .iter()
            .filter(|c| c.checked)
            .map(|c| Chip {
                value: c.value.clone(),
                label: c.display_name().to_string(),
            })
            .collect()
    }

    /// Controls split into consecutive groups of the same kind.
    pub fn groups(&self) -> Vec<(&CategoryKind, Vec<&FilterControl>)> {
        let mut groups: Vec<(&CategoryKind, Vec<&FilterControl>)> = Vec::new();
        for control in &self.controls {
            let continues = groups
                .last()
                .is_some_and(|(kind, _)| **kind == control.kind);
            if continues {
                if let Some((_, members)) = groups.last_mut() {
                    members.push(control);
                }
            } else {
                groups.push((&control.kind, vec![control]));
            }
        }
        groups
    }
}
