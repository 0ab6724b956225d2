//! Judge prompt construction.

use crate::turn::entities::ProviderResult;
use std::fmt::Write;

/// Build the evaluation prompt sent to the judge provider.
///
/// The prompt embeds every candidate response in a labeled block and pins
/// the expected output to an exact JSON shape, using the actual candidate
/// provider ids in the example so a literal-minded judge copies valid names.
pub fn judge_prompt(user_query: &str, results: &[ProviderResult]) -> String {
    let mut prompt = format!(
        "You are an impartial AI judge evaluating {} AI responses to a user query.\n\n\
         USER QUERY: {}\n\n\
         RESPONSES TO EVALUATE:\n",
        results.len(),
        user_query
    );

    for result in results {
        let _ = write!(
            prompt,
            "=== {} ({}) ===\n{}\n\n",
            result.provider.as_str().to_uppercase(),
            result.model,
            result.response_text
        );
    }

    prompt.push_str(
        "EVALUATION CRITERIA:\n\
         1. Accuracy and correctness\n\
         2. Completeness and depth\n\
         3. Clarity and presentation\n\
         4. Relevance to the query\n\n\
         INSTRUCTIONS:\n\
         - Evaluate each response on a scale of 1-10\n\
         - Give DIFFERENT scores to each provider (no ties!)\n\
         - The winner gets the highest score\n\
         - Be specific in your reasoning, mentioning each provider by name\n\n\
         You MUST respond with this EXACT JSON format:\n\
         {\n",
    );

    let first = results
        .first()
        .map(|r| r.provider.as_str())
        .unwrap_or("openai");
    let _ = write!(prompt, "  \"winner\": \"{first}\",\n");
    let _ = write!(
        prompt,
        "  \"reasoning\": \"**{}** scored highest because... (use markdown formatting)\",\n",
        first.to_uppercase()
    );
    prompt.push_str("  \"rankings\": [\n");
    for (i, result) in results.iter().enumerate() {
        let _ = write!(
            prompt,
            "    {{\"provider\": \"{}\", \"rank\": {}, \"score\": {:.1}}}{}\n",
            result.provider.as_str(),
            i + 1,
            (9.0 - i as f64).max(1.0),
            if i + 1 < results.len() { "," } else { "" }
        );
    }
    prompt.push_str("  ]\n}\n\nRESPOND WITH JSON ONLY, NO OTHER TEXT:");

    prompt
}
