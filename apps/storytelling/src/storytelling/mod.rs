// Heritage storytelling: request validation, prompt and fallback composition,
// and the best-effort model call that ties them together.
// All provider calls go through llm_client via the generator seam.

pub mod fallback;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
