//! Prompt templates.

use super::QuestionDifficulty;

/// Number of questions requested per call.
pub const QUESTIONS_PER_REQUEST: usize = 3;

/// Number of options requested per question.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Prompt asking for a JSON array of multiple-choice questions.
///
/// The nonce varies the prompt between calls so repeated requests for one
/// topic do not come back identical.
pub fn question_prompt(topic: &str, difficulty: QuestionDifficulty, nonce: &str) -> String {
    let level = difficulty.describe();
    format!(
        r#"You are an experienced tutor. Write {count} distinct {level} level multiple-choice questions about the topic "{topic}".

Each question must:
- focus on a key concept of "{topic}"
- match the {level} level
- offer exactly {options} different options
- name the correct answer, which must be one of the options
- include a short explanation of why that answer is correct

Reply with a JSON array only, shaped like:
[
  {{
    "question": "Question text?",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "correct_answer": "Option B",
    "explanation": "Why Option B is correct."
  }}
]

Variation: {nonce}"#,
        count = QUESTIONS_PER_REQUEST,
        options = OPTIONS_PER_QUESTION,
    )
}

/// Prompt for a short tutoring reply.
pub fn chat_prompt(message: &str, context_unit: Option<&str>) -> String {
    let context = match context_unit {
        Some(unit) => format!("The learner is currently studying the unit \"{}\".\n", unit),
        None => String::new(),
    };

    format!(
        "You are a friendly tutor on a learning platform.\n{context}\n\
         The learner asks: \"{message}\"\n\n\
         Answer helpfully and encouragingly in two or three sentences."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt() {
        let prompt = question_prompt("Fractions", QuestionDifficulty::Expert, "abc123");
        assert!(prompt.contains("3 distinct expert/advanced level"));
        assert!(prompt.contains("\"Fractions\""));
        assert!(prompt.contains("exactly 4 different options"));
        assert!(prompt.ends_with("Variation: abc123"));
    }

    #[test]
    fn test_chat_prompt_context() {
        let with_unit = chat_prompt("What is a fraction?", Some("Fractions 1"));
        assert!(with_unit.contains("studying the unit \"Fractions 1\""));
        assert!(with_unit.contains("\"What is a fraction?\""));

        let without_unit = chat_prompt("Hello", None);
        assert!(!without_unit.contains("studying the unit"));
    }
}
