//! Pulls a question list out of free-form model output.
//!
//! Models wrap JSON in prose or code fences and drift on key names, so parsing
//! is lenient: the first JSON value that normalizes to a non-empty list wins.

use serde_json::{Map, Value};

use super::{GenerationError, Question};

const MISSING_QUESTION: &str = "Question text unavailable";

const QUESTION_KEYS: &[&str] = &["question", "q", "text"];
const OPTION_KEYS: &[&str] = &["options", "choices", "answers"];
const ANSWER_KEYS: &[&str] = &["correct_answer", "answer", "correct"];
const EXPLANATION_KEYS: &[&str] = &["explanation", "reason"];

/// Extract questions from a provider reply.
///
/// Returns `MalformedResponse` when no embedded JSON value yields at least
/// one question.
pub fn parse_questions(text: &str) -> Result<Vec<Question>, GenerationError> {
    for (start, _) in text.match_indices(|c: char| c == '[' || c == '{') {
        let Some(value) = first_json_value(&text[start..]) else {
            continue;
        };

        let questions = normalize_questions(&value);
        if !questions.is_empty() {
            return Ok(questions);
        }
    }

    Err(GenerationError::MalformedResponse(format!(
        "no question list found in {} bytes of output",
        text.len()
    )))
}

/// Normalize a parsed JSON value into questions.
///
/// - An array is taken item by item
/// - An object holding a `questions` or `data` array is unwrapped
/// - Any other object counts as a single question
///
/// Items that are not objects are dropped.
pub fn normalize_questions(value: &Value) -> Vec<Question> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => match wrapped_list(map) {
            Some(items) => items.iter().collect(),
            None => vec![value],
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(Value::as_object)
        .map(normalize_question)
        .collect()
}

fn first_json_value(text: &str) -> Option<Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<Value>()
        .next()?
        .ok()
}

fn wrapped_list(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    ["questions", "data"]
        .iter()
        .find_map(|key| lookup(map, &[*key]).and_then(Value::as_array))
}

fn normalize_question(map: &Map<String, Value>) -> Question {
    let question = lookup(map, QUESTION_KEYS)
        .map(text_of)
        .unwrap_or_else(|| MISSING_QUESTION.to_string());

    let options = lookup(map, OPTION_KEYS)
        .and_then(Value::as_array)
        .map(|items| items.iter().map(text_of).collect())
        .unwrap_or_default();

    let answer = lookup(map, ANSWER_KEYS).map(text_of).unwrap_or_default();
    let explanation = lookup(map, EXPLANATION_KEYS).map(text_of);

    Question {
        question,
        options,
        answer,
        explanation,
    }
}

/// First truthy value under any of the aliases, matching keys without regard
/// to case. Aliases are tried in order.
fn lookup<'a>(map: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| {
        map.iter()
            .find(|(key, value)| key.eq_ignore_ascii_case(alias) && is_truthy(value))
            .map(|(_, value)| value)
    })
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
