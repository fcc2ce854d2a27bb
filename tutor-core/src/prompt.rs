//! Prompt builder: fixed tutoring instruction + optional context block.

/// Instruction prepended to every prompt.
///
/// The refusal sentence is part of the contract: the model is expected to
/// reply with it verbatim when a question falls outside math and science.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert AI tutor who only answers questions related to math and science. \
If the question is outside these topics, respond with: \
'I'm here to help with math and science questions only.'\n";

/// Builds the final prompt: instruction, optional labeled context block,
/// then the question with an `Answer:` cue for the model to complete.
///
/// The context block is included only when `context` is present and
/// non-empty. Retrieval failures upstream collapse to `None`, so the prompt
/// degrades to instruction + question.
pub fn build_prompt(question: &str, context: Option<&str>) -> String {
    let mut prompt = String::from(SYSTEM_INSTRUCTION);
    if let Some(ctx) = context.filter(|c| !c.is_empty()) {
        prompt.push_str("\nRelevant Context:\n");
        prompt.push_str(ctx);
        prompt.push('\n');
    }
    prompt.push_str("\nQuestion: ");
    prompt.push_str(question);
    prompt.push_str("\nAnswer:");
    prompt
}
