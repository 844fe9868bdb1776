//! Direct RAG answering for generic policy questions.

use std::sync::Arc;

use crate::llm::ChatClient;
use crate::rag::retriever::{format_context, DocumentRetriever};
use crate::types::Result;

/// Sentence the model is instructed to answer with when the retrieved
/// passages do not cover the question.
pub const REFUSAL_NOTICE: &str = "I can't find the answer to that question in the material I have";

/// Sampling temperature for grounded answers.
const ANSWER_TEMPERATURE: f32 = 0.2;

/// Answers a question strictly from retrieved passages, citing the source
/// documents and pages it used.
pub struct RagAnswerer {
    llm: Arc<dyn ChatClient>,
    retriever: Arc<DocumentRetriever>,
    top_k: usize,
}

impl RagAnswerer {
    /// Creates an answerer that retrieves `top_k` passages per question.
    pub fn new(llm: Arc<dyn ChatClient>, retriever: Arc<DocumentRetriever>, top_k: usize) -> Self {
        Self {
            llm,
            retriever,
            top_k,
        }
    }

    /// Retrieves context for `question` and generates a grounded answer.
    pub async fn answer(&self, question: &str) -> Result<String> {
        let hits = self.retriever.retrieve(question, self.top_k).await?;
        let context = format_context(&hits);
        let prompt = build_answer_prompt(&context, question);

        let answer = self.llm.generate(&prompt, Some(ANSWER_TEMPERATURE)).await?;
        tracing::info!(
            question = %question,
            passages = hits.len(),
            model = self.llm.model_name(),
            "Generated grounded answer"
        );

        Ok(answer)
    }
}

fn build_answer_prompt(context: &str, question: &str) -> String {
    format!(
        r#"# Your role
You are a brilliant expert at understanding the intent of the questioner and the crux of the question, and providing the most optimal answer to the questioner's needs from the documents you are given.
# Instruction
Your task is to answer the question using the following pieces of retrieved context delimited by XML tags.
<retrieved context>
{context}
</retrieved context>
# Constraint
1. Think deeply and multiple times about the user's question. You must understand the intent of their question and provide the most appropriate answer.
2. Choose the most relevant content from the retrieved context, the key content that directly relates to the question, and use it to generate an answer.
3. Generate a concise, logical answer. Do not just list your selections; rearrange them in context so that they become paragraphs with a natural flow.
4. When you have no retrieved context for the question, or the retrieved content is irrelevant to the question, answer '{refusal}'.
5. If required, break the answer into proper paragraphs.
6. Mention the name of every document and page number you used in generating the response, e.g. 1. Doc name: RSCA/etienne.pdf, Page number: 1 2. Doc name: RSCA/rubric.pdf, Page number: 10. Include all of the document names and pages.
# Question:
{question}"#,
        context = context,
        refusal = REFUSAL_NOTICE,
        question = question,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_context_question_and_refusal() {
        let prompt = build_answer_prompt(
            "Grants are capped at 40%.\nSource: RSCA/etienne.pdf, Page: 3",
            "What is the grant cap?",
        );

        assert!(prompt.contains("<retrieved context>"));
        assert!(prompt.contains("Grants are capped at 40%."));
        assert!(prompt.contains("# Question:\nWhat is the grant cap?"));
        assert!(prompt.contains(REFUSAL_NOTICE));
    }
}
