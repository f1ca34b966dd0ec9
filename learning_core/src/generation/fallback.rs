//! Local content served when the provider is absent or failing.

use super::Question;

/// Three templated questions about a topic.
pub fn fallback_questions(topic: &str) -> Vec<Question> {
    vec![
        Question {
            question: format!("What is a fundamental concept in {}?", topic),
            options: vec![
                "Core principle".to_string(),
                "Advanced theory".to_string(),
                "Unrelated idea".to_string(),
                "None of the above".to_string(),
            ],
            answer: "Core principle".to_string(),
            explanation: Some(format!(
                "Every study of {} starts from its core principles.",
                topic
            )),
        },
        Question {
            question: format!("Which approach is most useful when first learning {}?", topic),
            options: vec![
                "Practicing with examples".to_string(),
                "Memorizing without context".to_string(),
                "Skipping the basics".to_string(),
                "Avoiding questions".to_string(),
            ],
            answer: "Practicing with examples".to_string(),
            explanation: Some("Worked examples connect ideas to practice.".to_string()),
        },
        Question {
            question: format!("How can you check your understanding of {}?", topic),
            options: vec![
                "Explain it in your own words".to_string(),
                "Reread the title".to_string(),
                "Guess the answers".to_string(),
                "Move on immediately".to_string(),
            ],
            answer: "Explain it in your own words".to_string(),
            explanation: Some(
                "Restating a concept shows whether it has been understood.".to_string(),
            ),
        },
    ]
}

/// Reply used when no provider is configured.
pub fn offline_chat_reply(message: &str) -> String {
    format!(
        "The AI tutor is not configured, so here is a general pointer for \"{}\": \
         revisit the key ideas of your current unit and try explaining them in your own words.",
        message
    )
}

/// Reply used when the provider fails.
pub fn chat_apology(message: &str, context_unit: Option<&str>) -> String {
    match context_unit {
        Some(unit) => format!(
            "Sorry, I couldn't answer \"{}\" about {} right now. Please try again in a moment.",
            message, unit
        ),
        None => format!(
            "Sorry, I couldn't answer \"{}\" right now. Please try again in a moment.",
            message
        ),
    }
}
