//! Cumulative-reading study notes generated through Gemini or Groq.
//!
//! [`app::TransformService`] is the entry point: it validates a passage,
//! builds the prompt, dispatches to the client registered for the chosen
//! [`domain::ProviderId`] and folds the result into a
//! [`domain::GenerationOutcome`].

pub mod app;
pub mod domain;
pub mod infra;
