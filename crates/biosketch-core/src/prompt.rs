//! NIH Biographical Sketch prompt assembly.

use crate::types::ProfileRecord;

/// Sections every generated sketch must contain, in order.
pub const REQUIRED_SECTIONS: [&str; 4] = [
    "Personal Statement",
    "Positions and Honors",
    "Contributions to Science",
    "Research Support",
];

/// Sketch prompt template. Replace `{profile_data}` and `{sections}` before sending.
pub const BIOSKETCH_PROMPT_TEMPLATE: &str = r#"Generate an NIH Biographical Sketch format document based on the following LinkedIn profile information:
{profile_data}

Please format it according to the NIH Biographical Sketch guidelines, including sections for:
{sections}

Make it professional and well-structured."#;

/// Build the generation prompt for a profile record.
///
/// The record is embedded as pretty-printed JSON, so every field value
/// appears verbatim in the prompt.
pub fn build_prompt(record: &ProfileRecord) -> String {
    let sections = REQUIRED_SECTIONS
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{}. {}", i + 1, name))
        .collect::<Vec<_>>()
        .join("\n");

    BIOSKETCH_PROMPT_TEMPLATE
        .replace("{sections}", &sections)
        .replace("{profile_data}", &record.to_pretty_json())
}
