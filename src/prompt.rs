//! Prompt construction for the analyzer node's two backend calls.

/// System prompt for the summarization call.
pub const SUMMARY_SYSTEM: &str = "You are a helpful assistant that creates concise summaries.";

/// System prompt for the sentiment-classification call.
pub const SENTIMENT_SYSTEM: &str =
    "You are a sentiment analysis assistant. Respond with only one word: \
     positive, negative, neutral, or mixed.";

/// Build the summarization instruction, embedding the full input text and
/// the word count computed by the first node.
pub fn summary_prompt(input_text: &str, word_count: u32) -> String {
    format!(
        "Summarize the following text in 2-3 sentences. Be concise and capture the main points.\n\n\
         Text ({} words):\n{}\n\nSummary:",
        word_count, input_text
    )
}

/// Build the sentiment-classification instruction, constraining the answer
/// to exactly one of the four accepted tokens.
pub fn sentiment_prompt(input_text: &str) -> String {
    format!(
        "Analyze the sentiment of the following text.\n\
         Respond with ONLY ONE WORD from these options: positive, negative, neutral, or mixed.\n\n\
         Text:\n{}\n\nSentiment:",
        input_text
    )
}
