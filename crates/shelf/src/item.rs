//! Catalog records as served by the software API.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Identifier of a catalog entry.  The API may send integers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{n}"),
            ItemId::Str(s) => f.write_str(s),
        }
    }
}

/// Identifier of a category; the value carried by a filter checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        CategoryId(id)
    }
}

/// The `type` discriminator of a category.
///
/// Known kinds have their own variants; anything else the API sends is kept
/// verbatim in [`CategoryKind::Unknown`] so it still filters, but never
/// renders as a card badge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryKind {
    DpaStatus,
    Cost,
    Roster,
    Access,
    Status,
    Other,
    Unknown(String),
}

const ACCESS_KEYWORDS: [&str; 7] = [
    "staff only",
    "staff use only",
    "account-required",
    "no account required",
    "parental-consent",
    "paid license",
    "external accounts",
];

impl CategoryKind {
    /// The wire name, also used as the badge style key (`badge-{name}`).
    pub fn as_str(&self) -> &str {
        match self {
            CategoryKind::DpaStatus => "dpa_status",
            CategoryKind::Cost => "cost",
            CategoryKind::Roster => "roster",
            CategoryKind::Access => "access",
            CategoryKind::Status => "status",
            CategoryKind::Other => "other",
            CategoryKind::Unknown(s) => s,
        }
    }

    /// Whether categories of this kind are shown as badges on a card.
    pub fn is_card_badge(&self) -> bool {
        matches!(
            self,
            CategoryKind::DpaStatus | CategoryKind::Cost | CategoryKind::Roster | CategoryKind::Access
        )
    }

    /// Heading of the filter panel group holding this kind.
    pub fn group_label(&self) -> &str {
        match self {
            CategoryKind::DpaStatus => "DPA Status",
            CategoryKind::Cost => "Cost / School",
            CategoryKind::Roster => "Rostering",
            CategoryKind::Access => "Access",
            CategoryKind::Status => "Status",
            CategoryKind::Other => "Subject & Function",
            CategoryKind::Unknown(s) => s,
        }
    }

    /// Position of this kind's group in the filter panel.
    pub fn group_rank(&self) -> u8 {
        match self {
            CategoryKind::DpaStatus => 0,
            CategoryKind::Cost => 1,
            CategoryKind::Roster => 2,
            CategoryKind::Access => 3,
            CategoryKind::Status => 4,
            CategoryKind::Other => 5,
            CategoryKind::Unknown(_) => 6,
        }
    }

    /// Infer a kind from a category name.
    ///
    /// Used for category records that arrive without a `type`.
    pub fn classify(name: &str) -> Self {
        let n = name.trim();
        if ["0-", "1-", "2-", "3-", "4-"].iter().any(|p| n.starts_with(p))
            || n.to_uppercase().contains("DPA")
        {
            return CategoryKind::DpaStatus;
        }
        if n.starts_with('$') {
            return CategoryKind::Cost;
        }
        if n.starts_with("Roster:") {
            return CategoryKind::Roster;
        }
        if n.starts_with('#') {
            return CategoryKind::Status;
        }
        let lower = n.to_lowercase();
        if ACCESS_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
            return CategoryKind::Access;
        }
        CategoryKind::Other
    }
}

impl From<String> for CategoryKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "dpa_status" => CategoryKind::DpaStatus,
            "cost" => CategoryKind::Cost,
            "roster" => CategoryKind::Roster,
            "access" => CategoryKind::Access,
            "status" => CategoryKind::Status,
            "other" => CategoryKind::Other,
            _ => CategoryKind::Unknown(s),
        }
    }
}

impl From<CategoryKind> for String {
    fn from(kind: CategoryKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classification tag attached to items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawCategory")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryKind,
}

#[derive(Deserialize)]
struct RawCategory {
    id: CategoryId,
    #[serde(default)]
    name: String,
    #[serde(rename = "type", default)]
    kind: Option<CategoryKind>,
}

impl From<RawCategory> for Category {
    fn from(raw: RawCategory) -> Self {
        let kind = raw
            .kind
            .unwrap_or_else(|| CategoryKind::classify(&raw.name));
        Category {
            id: raw.id,
            name: raw.name,
            kind,
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tagline: String,
    #[serde(default, deserialize_with = "non_empty")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "non_empty", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Glyph shown when an item has no usable logo and an empty name.
pub const PLACEHOLDER_GLYPH: char = '?';

impl Item {
    /// Fallback glyph: the first character of the name, case preserved.
    pub fn glyph(&self) -> char {
        self.name.chars().next().unwrap_or(PLACEHOLDER_GLYPH)
    }

    /// Whether this item carries category `id`.
    pub fn has_category(&self, id: CategoryId) -> bool {
        self.categories.iter().any(|c| c.id == id)
    }

    /// Categories shown as badges on the card, in item order.
    pub fn badges(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter().filter(|c| c.kind.is_card_badge())
    }

    /// Link to the item's detail view.
    pub fn detail_href(&self) -> String {
        format!("/software/{}", self.id)
    }
}

fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn item(value: serde_json::Value) -> Item {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn decodes_api_record() {
        let parsed = item(json!({
            "id": 1,
            "name": "Zoom",
            "url": "https://zoom.us",
            "tagline": "video calls",
            "logo": "https://example.test/zoom.png",
            "featured": true,
            "categories": [{"id": 10, "name": "Free", "type": "cost"}]
        }));

        assert_eq!(parsed.id, ItemId::Int(1));
        assert_eq!(parsed.logo.as_deref(), Some("https://example.test/zoom.png"));
        assert!(parsed.featured);
        assert_eq!(
            parsed.categories,
            vec![Category {
                id: CategoryId(10),
                name: "Free".into(),
                kind: CategoryKind::Cost,
            }]
        );
    }

    #[test]
    fn string_ids_are_accepted() {
        let parsed = item(json!({"id": "abc-1", "name": "Canvas"}));
        assert_eq!(parsed.id, ItemId::Str("abc-1".into()));
        assert_eq!(parsed.detail_href(), "/software/abc-1");
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed = item(json!({"id": 3}));
        assert_eq!(parsed.name, "");
        assert_eq!(parsed.tagline, "");
        assert_eq!(parsed.logo, None);
        assert!(!parsed.featured);
        assert!(parsed.categories.is_empty());
    }

    #[test]
    fn empty_or_null_logo_is_absent() {
        assert_eq!(item(json!({"id": 1, "logo": ""})).logo, None);
        assert_eq!(item(json!({"id": 1, "logo": null})).logo, None);
    }

    #[test]
    fn glyph_preserves_case_and_handles_empty_names() {
        assert_eq!(item(json!({"id": 1, "name": "zoom"})).glyph(), 'z');
        assert_eq!(item(json!({"id": 1, "name": "Éducation"})).glyph(), 'É');
        assert_eq!(item(json!({"id": 1, "name": ""})).glyph(), PLACEHOLDER_GLYPH);
    }

    #[test]
    fn unknown_kinds_round_trip_verbatim() {
        let kind: CategoryKind = serde_json::from_value(json!("grade_band")).unwrap();
        assert_eq!(kind, CategoryKind::Unknown("grade_band".into()));
        assert!(!kind.is_card_badge());
        assert_eq!(serde_json::to_value(&kind).unwrap(), json!("grade_band"));
    }

    #[test]
    fn only_allow_listed_kinds_are_badges() {
        let parsed = item(json!({
            "id": 1,
            "name": "Zoom",
            "categories": [
                {"id": 1, "name": "2-Approved", "type": "dpa_status"},
                {"id": 2, "name": "Math", "type": "other"},
                {"id": 3, "name": "#Pilot", "type": "status"},
                {"id": 4, "name": "Roster: Clever", "type": "roster"}
            ]
        }));
        let names: Vec<_> = parsed.badges().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["2-Approved", "Roster: Clever"]);
    }

    #[test]
    fn missing_type_is_classified_from_name() {
        let parsed = item(json!({
            "id": 1,
            "categories": [
                {"id": 1, "name": "3-DPA Signed"},
                {"id": 2, "name": "$ School Paid"},
                {"id": 3, "name": "Roster: ClassLink"},
                {"id": 4, "name": "#Retired"},
                {"id": 5, "name": "Staff Only"},
                {"id": 6, "name": "Science"}
            ]
        }));
        let kinds: Vec<_> = parsed.categories.iter().map(|c| c.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                CategoryKind::DpaStatus,
                CategoryKind::Cost,
                CategoryKind::Roster,
                CategoryKind::Status,
                CategoryKind::Access,
                CategoryKind::Other,
            ]
        );
    }

    #[test]
    fn classify_matches_access_keywords_anywhere() {
        assert_eq!(
            CategoryKind::classify("Requires parental-consent form"),
            CategoryKind::Access
        );
        assert_eq!(CategoryKind::classify("  dpa pending "), CategoryKind::DpaStatus);
    }

    #[test]
    fn group_order_follows_rank() {
        let mut kinds = vec![
            CategoryKind::Other,
            CategoryKind::Unknown("x".into()),
            CategoryKind::Cost,
            CategoryKind::DpaStatus,
        ];
        kinds.sort_by_key(CategoryKind::group_rank);
        assert_eq!(kinds[0].group_label(), "DPA Status");
        assert_eq!(kinds[1].group_label(), "Cost / School");
        assert_eq!(kinds[2].group_label(), "Subject & Function");
    }
}
