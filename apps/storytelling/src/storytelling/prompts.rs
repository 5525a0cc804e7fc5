//! Prompt composition for heritage stories. Pure string building, no I/O.

use crate::storytelling::models::StoryRequest;

pub const PERSONA: &str = "You are an expert cultural copywriter for handcrafted products.";

pub const AUDIENCE: &str =
    "Audience: global buyers; Purpose: product listing and social captions.";

pub const CONSTRAINTS: &str = "Constraints: culturally respectful, factually plausible, \
    avoid stereotypes, no overpromising.";

pub const STRUCTURE: &str =
    "Structure: 1-2 short evocative paragraphs, end with a subtle emotional note.";

const MEDIUM_HINT: &str = "~150-220 words";

/// Word-count hint for a requested length. Case-insensitive; anything
/// unrecognised gets the medium hint.
pub fn length_hint(length: &str) -> &'static str {
    match length.to_lowercase().as_str() {
        "short" => "~80-120 words",
        "long" => "~300-400 words",
        _ => MEDIUM_HINT,
    }
}

/// One line per present optional field, in fixed order.
fn detail_lines(req: &StoryRequest) -> Vec<String> {
    let mut details = Vec::new();
    if let Some(craft_type) = req.craft_type() {
        details.push(format!("Craft Type: {craft_type}"));
    }
    if let Some(region) = req.region() {
        details.push(format!("Region/Origin: {region}"));
    }
    if let Some(materials) = req.materials_joined() {
        details.push(format!("Materials: {materials}"));
    }
    if let Some(technique) = req.technique() {
        details.push(format!("Technique: {technique}"));
    }
    details
}

/// Builds the instruction sent to the model.
pub fn build_story_prompt(req: &StoryRequest) -> String {
    let mut prompt = format!(
        "{PERSONA}\n\
         Write a compelling heritage story for: {product}.\n\
         {AUDIENCE}\n\
         Tone: {tone}. Length: {hint}. Language: {language}.\n\
         {CONSTRAINTS}\n\
         {STRUCTURE}\n",
        product = req.product,
        tone = req.tone,
        hint = length_hint(&req.length),
        language = req.language,
    );

    let details = detail_lines(req);
    if !details.is_empty() {
        prompt.push_str("\nDetails:\n- ");
        prompt.push_str(&details.join("\n- "));
    }

    prompt
}
