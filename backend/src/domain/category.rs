//! Product categories and the category reference carried by products.
//!
//! A product's category is either a plain display name or a reference to a
//! stored [`Category`]. Every comparison, sort, or display goes through
//! [`CategoryRef::display_name`], so the two shapes never leak into callers.

use serde::{Deserialize, Serialize};

use super::{RecordId, StoredRecord};

/// Stored product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Store-assigned identity.
    pub id: RecordId,
    /// Display name, unique within the set used for filtering.
    pub name: String,
}

impl Category {
    /// Build a stored category from its draft and assigned identity.
    pub fn from_draft(id: RecordId, draft: CategoryDraft) -> Self {
        Self {
            id,
            name: draft.name,
        }
    }

    /// Reference to this category suitable for a product record.
    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef::ByReference {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl StoredRecord for Category {
    const ENTITY: &'static str = "category";

    fn id(&self) -> RecordId {
        self.id
    }
}

/// Fields supplied when creating a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDraft {
    /// Display name.
    pub name: String,
}

/// Partial category update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPatch {
    /// Replacement display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CategoryPatch {
    /// Merge the patch into `category`.
    pub fn apply_to(self, category: &mut Category) {
        if let Some(name) = self.name {
            category.name = name;
        }
    }
}

/// Category as carried on a product record.
///
/// Serialised untagged: a bare string for [`CategoryRef::ByName`] and an
/// `{ "id": .., "name": .. }` object for [`CategoryRef::ByReference`].
///
/// # Examples
/// ```
/// use inventory::domain::{CategoryRef, RecordId};
///
/// let by_name = CategoryRef::by_name("Tools");
/// let by_ref = CategoryRef::ByReference { id: RecordId::new(3), name: "Tools".into() };
/// assert_eq!(by_name.display_name(), by_ref.display_name());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CategoryRef {
    /// Plain category name.
    ByName(String),
    /// Reference to a stored category, with its name resolved.
    ByReference {
        /// Identity of the referenced category.
        id: RecordId,
        /// Name of the referenced category.
        name: String,
    },
}

impl CategoryRef {
    /// Convenience constructor for [`CategoryRef::ByName`].
    pub fn by_name(name: impl Into<String>) -> Self {
        Self::ByName(name.into())
    }

    /// Name shown to users and used for filtering and sorting.
    pub fn display_name(&self) -> &str {
        match self {
            Self::ByName(name) | Self::ByReference { name, .. } => name.as_str(),
        }
    }

    /// Identity of the referenced category, when known.
    pub fn category_id(&self) -> Option<RecordId> {
        match self {
            Self::ByName(_) => None,
            Self::ByReference { id, .. } => Some(*id),
        }
    }

    /// Resolve a category name against the known categories.
    ///
    /// Returns a reference when a category with exactly that name exists,
    /// otherwise keeps the plain name.
    pub fn resolve(name: &str, categories: &[Category]) -> Self {
        categories
            .iter()
            .find(|category| category.name == name)
            .map_or_else(|| Self::by_name(name), Category::to_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn categories() -> Vec<Category> {
        vec![
            Category {
                id: RecordId::new(1),
                name: "Tools".to_owned(),
            },
            Category {
                id: RecordId::new(2),
                name: "Garden".to_owned(),
            },
        ]
    }

    #[rstest]
    fn resolve_prefers_a_known_category(categories: Vec<Category>) {
        let resolved = CategoryRef::resolve("Garden", &categories);
        assert_eq!(resolved.category_id(), Some(RecordId::new(2)));
        assert_eq!(resolved.display_name(), "Garden");
    }

    #[rstest]
    fn resolve_keeps_unknown_names(categories: Vec<Category>) {
        let resolved = CategoryRef::resolve("garden", &categories);
        assert_eq!(resolved, CategoryRef::by_name("garden"));
    }

    #[rstest]
    #[case::name(json!("Tools"), CategoryRef::by_name("Tools"))]
    #[case::reference(
        json!({ "id": 4, "name": "Tools" }),
        CategoryRef::ByReference { id: RecordId::new(4), name: "Tools".to_owned() },
    )]
    fn deserialises_both_shapes(#[case] value: serde_json::Value, #[case] expected: CategoryRef) {
        let parsed: CategoryRef = serde_json::from_value(value).expect("category ref");
        assert_eq!(parsed, expected);
    }

    #[rstest]
    fn patch_leaves_missing_fields_untouched(categories: Vec<Category>) {
        let mut category = categories.into_iter().next().expect("fixture category");
        CategoryPatch::default().apply_to(&mut category);
        assert_eq!(category.name, "Tools");

        CategoryPatch {
            name: Some("Hardware".to_owned()),
        }
        .apply_to(&mut category);
        assert_eq!(category.name, "Hardware");
    }
}
