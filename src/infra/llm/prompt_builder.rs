const PREAMBLE: &str = "Role: Expert English Tutor.
Task: Convert the input text into \"Cumulative Reading\" format.";

/// Formatting rules embedded, in order, in every prompt.
pub const PROMPT_RULES: [&str; 5] = [
    "Break sentences into meaningful chunks (sense groups).",
    "Show the chunks cumulatively line by line.",
    "End each cumulative line with a slash (/).",
    "After the full sentence is complete, add a blank line and then provide a natural Korean translation.",
    "Separate distinct original sentences with \"---\".",
];

/// Builds the provider-agnostic instruction sent for a passage.
pub struct PromptBuilder;

impl PromptBuilder {
    /// The source text is appended verbatim as the final part of the prompt.
    pub fn build(source_text: &str) -> String {
        let rules = PROMPT_RULES
            .iter()
            .enumerate()
            .map(|(index, rule)| format!("{}. {rule}", index + 1))
            .collect::<Vec<_>>()
            .join("\n");

        format!("{PREAMBLE}\n\nRules:\n{rules}\n\nInput:\n{source_text}")
    }
}
