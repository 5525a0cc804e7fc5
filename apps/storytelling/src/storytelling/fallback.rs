//! Deterministic narrative used whenever the model is unavailable.

use crate::storytelling::models::StoryRequest;

/// Value of `model` in responses built from the fallback narrative.
pub const FALLBACK_MODEL: &str = "fallback";

const DEFAULT_CRAFT: &str = "handcrafted piece";
const DEFAULT_REGION: &str = "a storied artisan community";
const DEFAULT_MATERIALS: &str = "carefully sourced materials";
const DEFAULT_TECHNIQUE: &str = "time-honored techniques";

/// Fills the heritage template from the request. Absent or empty fields get
/// their stock phrase, so the result is never empty.
pub fn fallback_story(req: &StoryRequest) -> String {
    let materials = req
        .materials_joined()
        .unwrap_or_else(|| DEFAULT_MATERIALS.to_string());

    format!(
        "This {craft} from {region} is shaped with {materials} using {technique}. \
         Every detail in {product} reflects generations of learned skill and quiet dedication—\
         a living connection between maker and wearer, tradition and today.",
        craft = req.craft_type().unwrap_or(DEFAULT_CRAFT),
        region = req.region().unwrap_or(DEFAULT_REGION),
        technique = req.technique().unwrap_or(DEFAULT_TECHNIQUE),
        product = req.product,
    )
}
