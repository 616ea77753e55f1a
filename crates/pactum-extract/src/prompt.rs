use crate::provider::ExtractionOptions;

/// System prompt shared by both providers. The response shape it asks for
/// is what the document pipeline parses.
pub const EXTRACTION_SYSTEM_PROMPT: &str = "\
You extract structured data from commercial energy contracts. \
Respond with a single JSON object and nothing else, shaped as \
{\"extractedData\": {...}, \"confidence\": {\"<field>\": <0.0-1.0>}, \"notes\": [\"...\"]}. \
Put every contract term you find in extractedData using camelCase keys, \
including customer, site, capacity, term, rates, escalation, payment terms, \
voltage, server count, components, output warranty and efficiency. \
Omit fields the document does not state rather than guessing.";

const DEFAULT_INSTRUCTION: &str = "Extract the contract terms from this document.";

/// The user-turn instruction sent next to the document.
pub fn instruction(options: &ExtractionOptions) -> String {
    options
        .instructions
        .clone()
        .unwrap_or_else(|| DEFAULT_INSTRUCTION.to_string())
}
