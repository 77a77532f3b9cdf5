//! The fixed answer-generation prompt.
//!
//! The template is a static asset compiled into the binary; it is loaded
//! once and is not editable at runtime.

/// The instruction template with `{context}` and `{question}` placeholders.
pub const RAG_PROMPT_TEMPLATE: &str = include_str!("../assets/rag_prompt.txt");

/// Fill the template with a context block and a question.
pub fn render(context: &str, question: &str) -> String {
    RAG_PROMPT_TEMPLATE.replace("{question}", question).replace("{context}", context)
}
