//! Catalog categories and the record formats they arrive in.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Image shown for categories without one of their own.
pub const FALLBACK_CATEGORY_IMAGE: &str = "/images/categories/categoryimg.jpg";

/// Category identifier as issued by the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    /// Create a new ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub description: String,
    /// Image reference as stored by the backend. See [`image_url`].
    pub image: String,
}

impl Category {
    /// Create a category.
    pub fn new(
        id: impl Into<CategoryId>,
        name: impl Into<String>,
        description: impl Into<String>,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            image: image.into(),
        }
    }

    /// Absolute image URL for display.
    pub fn image_url(&self, base_url: &str) -> String {
        image_url(base_url, &self.image)
    }
}

/// Category record as served by the endpoints.
///
/// Backends disagree on field names: the id arrives as `id` or `_id` (string
/// or number) and the image as `imageUrl` or `image`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCategory {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default, rename = "_id")]
    pub legacy_id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl RawCategory {
    /// Normalize into a [`Category`].
    ///
    /// Returns `None` when the record has no usable id or name.
    pub fn normalize(self) -> Option<Category> {
        let id = id_text(self.id.as_ref()).or_else(|| id_text(self.legacy_id.as_ref()))?;
        let name = self.name.filter(|n| !n.is_empty())?;
        let image = self
            .image_url
            .filter(|s| !s.is_empty())
            .or(self.image)
            .unwrap_or_default();

        Some(Category {
            id: CategoryId(id),
            name,
            description: self.description.unwrap_or_default(),
            image,
        })
    }
}

fn id_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Normalize a list of raw records, dropping unusable ones.
pub fn normalize_all(raw: Vec<RawCategory>) -> Vec<Category> {
    let total = raw.len();
    let categories: Vec<Category> = raw.into_iter().filter_map(RawCategory::normalize).collect();
    if categories.len() < total {
        tracing::debug!(
            dropped = total - categories.len(),
            "skipped category records without id or name"
        );
    }
    categories
}

/// Resolve a stored image reference against the catalog base URL.
///
/// ```
/// use cakeshop_catalog::image_url;
/// let base = "http://localhost:4000";
/// assert_eq!(image_url(base, "cake.jpg"), "http://localhost:4000/uploads/cake.jpg");
/// assert_eq!(image_url(base, "/static/a.png"), "http://localhost:4000/static/a.png");
/// ```
pub fn image_url(base_url: &str, image: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if image.is_empty() {
        FALLBACK_CATEGORY_IMAGE.to_string()
    } else if image.starts_with("http") {
        image.to_string()
    } else if image.starts_with('/') {
        format!("{}{}", base, image)
    } else {
        format!("{}/uploads/{}", base, image)
    }
}

/// Static categories served when every endpoint fails.
pub fn mock_categories() -> Vec<Category> {
    [
        ("1", "Cake Mold", "Various cake molds for baking"),
        ("2", "Fondants", "Fondant supplies for cake decoration"),
        ("3", "Nozzles", "Piping nozzles for cake decoration"),
        ("4", "Cake Board", "Cake boards for presentation"),
        ("5", "Baking Tools", "Essential tools for baking"),
        ("6", "Cake Toppers", "Decorative toppers for cakes"),
    ]
    .into_iter()
    .map(|(id, name, description)| Category::new(id, name, description, FALLBACK_CATEGORY_IMAGE))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> RawCategory {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_normalize_prefers_id_and_image_url() {
        let category = raw(
            r#"{"id": 7, "_id": "x", "name": "Fondants", "imageUrl": "f.jpg", "image": "old.jpg"}"#,
        )
        .normalize()
        .unwrap();

        assert_eq!(category.id.as_str(), "7");
        assert_eq!(category.image, "f.jpg");
        assert_eq!(category.description, "");
    }

    #[test]
    fn test_normalize_falls_back_to_legacy_fields() {
        let category = raw(r#"{"_id": "abc", "name": "Nozzles", "description": "Tips", "image": "/n.png"}"#)
            .normalize()
            .unwrap();

        assert_eq!(category.id, CategoryId::from("abc"));
        assert_eq!(category.description, "Tips");
        assert_eq!(category.image, "/n.png");
    }

    #[test]
    fn test_normalize_rejects_incomplete_records() {
        assert!(raw(r#"{"name": "No id"}"#).normalize().is_none());
        assert!(raw(r#"{"id": "1"}"#).normalize().is_none());
        assert!(raw(r#"{"id": null, "_id": "", "name": "x"}"#).normalize().is_none());
    }

    #[test]
    fn test_normalize_all_skips_bad_records() {
        let records = vec![
            raw(r#"{"id": "1", "name": "A"}"#),
            raw(r#"{"name": "B"}"#),
            raw(r#"{"_id": "3", "name": "C"}"#),
        ];
        let names: Vec<String> = normalize_all(records).into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn test_image_url_rules() {
        let base = "http://localhost:4000/";
        assert_eq!(image_url(base, ""), FALLBACK_CATEGORY_IMAGE);
        assert_eq!(
            image_url(base, "https://cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(image_url(base, "/img/a.jpg"), "http://localhost:4000/img/a.jpg");
        assert_eq!(image_url(base, "a.jpg"), "http://localhost:4000/uploads/a.jpg");
    }

    #[test]
    fn test_mock_categories() {
        let mock = mock_categories();
        assert_eq!(mock.len(), 6);
        assert_eq!(mock[0].name, "Cake Mold");
        assert_eq!(mock[5].id.as_str(), "6");
        assert!(mock.iter().all(|c| c.image == FALLBACK_CATEGORY_IMAGE));
    }

    #[test]
    fn test_category_serializes_with_underscore_id() {
        let value = serde_json::to_value(Category::new("1", "Cake Mold", "", "")).unwrap();
        assert_eq!(value["_id"], "1");
        assert!(value.get("id").is_none());
    }
}
