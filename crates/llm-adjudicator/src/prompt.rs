use shared_types::Evidence;

pub struct PromptInput<'a> {
    pub doc_type: &'a str,
    pub paragraph: &'a str,
    pub rule_description: &'a str,
    pub issue: &'a str,
    pub evidence: &'a [Evidence],
}

/// Prompt asking the model to grade one finding
pub fn build_prompt(input: &PromptInput<'_>) -> String {
    let mut prompt = String::new();
    prompt.push_str("You are an expert in ADGM (Abu Dhabi Global Market) corporate compliance.\n");
    prompt.push_str(&format!("Document type: {}\n", input.doc_type));
    prompt.push_str(&format!("Rule: {}\n", input.rule_description));
    prompt.push_str(&format!("Automated finding: {}\n\n", input.issue));
    prompt.push_str(&format!("Paragraph:\n\"\"\"{}\"\"\"\n\n", input.paragraph));

    if !input.evidence.is_empty() {
        prompt.push_str("Relevant ADGM reference passages:\n");
        for (i, e) in input.evidence.iter().enumerate() {
            prompt.push_str(&format!("[{}] ({}) {}\n", i + 1, e.source_id, e.text));
        }
        prompt.push('\n');
    }

    prompt.push_str(
        "Assess how serious this finding is and how to fix it. Return ONLY a JSON object \
         of the form {\"severity\": \"Low\" | \"Medium\" | \"High\", \"suggestion\": \"...\"}.",
    );
    prompt
}
