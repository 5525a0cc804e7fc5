//! Request and response shapes for story generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TONE: &str = "heritage";
pub const DEFAULT_LENGTH: &str = "medium";

/// Metadata about a handcrafted product, as sent by the storefront.
///
/// Only [`StoryRequest::from_json`] builds one, so every instance has a
/// validated `product` and defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryRequest {
    pub product: String,
    pub craft_type: Option<String>,
    pub region: Option<String>,
    pub materials: Option<Vec<String>>,
    pub technique: Option<String>,
    pub language: String,
    pub tone: String,
    pub length: String,
}

/// Wire shape. `null` is treated the same as an absent field.
#[derive(Deserialize)]
struct StoryRequestBody {
    product: String,
    #[serde(default)]
    craft_type: Option<String>,
    #[serde(default)]
    region: Option<String>,
    #[serde(default)]
    materials: Option<Vec<String>>,
    #[serde(default)]
    technique: Option<String>,
    #[serde(default = "default_language", deserialize_with = "or_default::language")]
    language: String,
    #[serde(default = "default_tone", deserialize_with = "or_default::tone")]
    tone: String,
    #[serde(default = "default_length", deserialize_with = "or_default::length")]
    length: String,
}

impl From<StoryRequestBody> for StoryRequest {
    fn from(body: StoryRequestBody) -> Self {
        StoryRequest {
            product: body.product,
            craft_type: body.craft_type,
            region: body.region,
            materials: body.materials,
            technique: body.technique,
            language: body.language,
            tone: body.tone,
            length: body.length,
        }
    }
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_tone() -> String {
    DEFAULT_TONE.to_string()
}

fn default_length() -> String {
    DEFAULT_LENGTH.to_string()
}

mod or_default {
    use serde::{Deserialize, Deserializer};

    fn opt<'de, D: Deserializer<'de>>(d: D, default: fn() -> String) -> Result<String, D::Error> {
        Ok(Option::<String>::deserialize(d)?.unwrap_or_else(default))
    }

    pub fn language<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        opt(d, super::default_language)
    }

    pub fn tone<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        opt(d, super::default_tone)
    }

    pub fn length<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        opt(d, super::default_length)
    }
}

/// Fields checked one by one so a rejection can name the offending field.
const TEXT_FIELDS: &[&str] = &["craft_type", "region", "technique", "language", "tone", "length"];

impl StoryRequest {
    /// Validates a raw JSON body. Rejects a missing, non-text or empty
    /// `product`, and any optional field of the wrong type. A body that is
    /// not an object has no `product` either.
    pub fn from_json(body: Value) -> Result<Self, AppError> {
        let Value::Object(fields) = &body else {
            return Err(AppError::invalid_field(
                "product",
                "field required: body must be a JSON object",
            ));
        };

        match fields.get("product") {
            None | Some(Value::Null) => {
                return Err(AppError::invalid_field("product", "field required"));
            }
            Some(Value::String(product)) if product.is_empty() => {
                return Err(AppError::invalid_field("product", "must not be empty"));
            }
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(AppError::invalid_field("product", "must be a string"));
            }
        }

        for &name in TEXT_FIELDS {
            if let Some(value) = fields.get(name) {
                if !(value.is_string() || value.is_null()) {
                    return Err(AppError::invalid_field(name, "must be a string"));
                }
            }
        }

        match fields.get("materials") {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) if items.iter().all(Value::is_string) => {}
            Some(_) => {
                return Err(AppError::invalid_field(
                    "materials",
                    "must be a list of strings",
                ));
            }
        }

        serde_json::from_value::<StoryRequestBody>(body)
            .map(StoryRequest::from)
            .map_err(|e| AppError::invalid_field("body", e.to_string()))
    }

    pub fn craft_type(&self) -> Option<&str> {
        present(&self.craft_type)
    }

    pub fn region(&self) -> Option<&str> {
        present(&self.region)
    }

    pub fn technique(&self) -> Option<&str> {
        present(&self.technique)
    }

    /// Materials joined with `", "`, or `None` when there are none.
    pub fn materials_joined(&self) -> Option<String> {
        self.materials
            .as_ref()
            .filter(|m| !m.is_empty())
            .map(|m| m.join(", "))
    }

    /// Non-empty `craft_type`, `region`, `technique`, in that order.
    /// Duplicates are kept.
    pub fn tags(&self) -> Vec<String> {
        [self.craft_type(), self.region(), self.technique()]
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect()
    }
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|v| !v.is_empty())
}

/// Story plus echoed product metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryResponse {
    pub story: String,
    pub product: String,
    /// Carries the request's `region`; the name is kept for client compatibility.
    pub heritage: Option<String>,
    pub technique: Option<String>,
    pub tags: Vec<String>,
    pub model: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_of(err: AppError) -> String {
        match err {
            AppError::InvalidField { field, .. } => field,
            other => panic!("expected InvalidField, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_applied_for_product_only() {
        let req = StoryRequest::from_json(json!({"product": "Banarasi Saree"})).unwrap();
        assert_eq!(req.product, "Banarasi Saree");
        assert_eq!(req.language, "en");
        assert_eq!(req.tone, "heritage");
        assert_eq!(req.length, "medium");
        assert!(req.materials.is_none());
        assert!(req.tags().is_empty());
    }

    #[test]
    fn test_null_options_take_defaults() {
        let req = StoryRequest::from_json(json!({
            "product": "Shawl",
            "language": null,
            "tone": null,
            "length": null,
            "materials": null
        }))
        .unwrap();
        assert_eq!(req.language, "en");
        assert_eq!(req.tone, "heritage");
        assert_eq!(req.length, "medium");
        assert_eq!(req.materials_joined(), None);
    }

    #[test]
    fn test_missing_product_rejected() {
        let err = StoryRequest::from_json(json!({"region": "Varanasi"})).unwrap_err();
        assert_eq!(field_of(err), "product");
    }

    #[test]
    fn test_non_text_product_rejected() {
        let err = StoryRequest::from_json(json!({"product": 42})).unwrap_err();
        assert_eq!(field_of(err), "product");
    }

    #[test]
    fn test_empty_product_rejected() {
        let err = StoryRequest::from_json(json!({"product": ""})).unwrap_err();
        assert_eq!(field_of(err), "product");
    }

    #[test]
    fn test_whitespace_product_accepted_verbatim() {
        let req = StoryRequest::from_json(json!({"product": "   "})).unwrap();
        assert_eq!(req.product, "   ");
    }

    #[test]
    fn test_wrong_type_optional_field_named() {
        let err = StoryRequest::from_json(json!({"product": "Saree", "tone": 3})).unwrap_err();
        assert_eq!(field_of(err), "tone");

        let err =
            StoryRequest::from_json(json!({"product": "Saree", "materials": "silk"})).unwrap_err();
        assert_eq!(field_of(err), "materials");

        let err = StoryRequest::from_json(json!({"product": "Saree", "materials": ["silk", 1]}))
            .unwrap_err();
        assert_eq!(field_of(err), "materials");
    }

    #[test]
    fn test_non_object_body_reports_product() {
        for body in [json!(["product"]), Value::Null, json!("Saree"), json!(7)] {
            let err = StoryRequest::from_json(body).unwrap_err();
            assert_eq!(field_of(err), "product");
        }
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let req = StoryRequest::from_json(json!({"product": "Pot", "glaze": "celadon"})).unwrap();
        assert_eq!(req.product, "Pot");
    }

    #[test]
    fn test_tags_keep_fixed_order_and_skip_empty() {
        let req = StoryRequest::from_json(json!({
            "product": "Saree",
            "technique": "handloom",
            "region": "",
            "craft_type": "Banarasi"
        }))
        .unwrap();
        assert_eq!(req.tags(), vec!["Banarasi", "handloom"]);
    }

    #[test]
    fn test_tags_keep_duplicates() {
        let req = StoryRequest::from_json(json!({
            "product": "Pashmina",
            "craft_type": "Kashmir",
            "region": "Kashmir"
        }))
        .unwrap();
        assert_eq!(req.tags(), vec!["Kashmir", "Kashmir"]);
    }

    #[test]
    fn test_empty_materials_list_counts_as_none() {
        let req = StoryRequest::from_json(json!({"product": "Rug", "materials": []})).unwrap();
        assert_eq!(req.materials_joined(), None);

        let req =
            StoryRequest::from_json(json!({"product": "Rug", "materials": ["wool", "jute"]}))
                .unwrap();
        assert_eq!(req.materials_joined().as_deref(), Some("wool, jute"));
    }

    #[test]
    fn test_response_serializes_absent_echoes_as_null() {
        let response = StoryResponse {
            story: "A story".to_string(),
            product: "Saree".to_string(),
            heritage: None,
            technique: None,
            tags: vec![],
            model: "fallback".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "story": "A story",
                "product": "Saree",
                "heritage": null,
                "technique": null,
                "tags": [],
                "model": "fallback"
            })
        );
    }
}
