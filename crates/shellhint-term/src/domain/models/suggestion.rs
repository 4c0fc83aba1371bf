#[cfg(test)]
#[path = "suggestion_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use super::BackendError;
use super::RawSuggestionPayload;

const PROMPT_TEMPLATE: &str = "Which terminal command best describes the following: {request}. respond with an object with 3 values \"command\" which is the suggested command. \"description\" which explains what the command does and \"safe\" which is either true or false depending on if the command could be dangerous to execute automatically.";

pub fn build_prompt(request: &str) -> String {
    return PROMPT_TEMPLATE.replace("{request}", request.trim());
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub command: String,
    pub description: String,
    pub safe: bool,
}

impl Suggestion {
    /// Decodes the model's JSON answer. Every field must be present with the
    /// right type, and the two strings must not be blank.
    pub fn parse(payload: &RawSuggestionPayload) -> Result<Suggestion, BackendError> {
        let value = serde_json::from_str::<Value>(payload.as_str().trim())
            .map_err(|err| BackendError::MalformedPayload(format!("not JSON ({err})")))?;

        let Value::Object(object) = value else {
            return Err(BackendError::MalformedPayload(
                "expected a JSON object".to_string(),
            ));
        };

        return Ok(Suggestion {
            command: required_text(&object, "command")?,
            description: required_text(&object, "description")?,
            safe: required_flag(&object, "safe")?,
        });
    }
}

fn required_text(object: &Map<String, Value>, field: &str) -> Result<String, BackendError> {
    return match object.get(field) {
        Some(Value::String(text)) if !text.trim().is_empty() => Ok(text.to_string()),
        Some(Value::String(_)) => Err(BackendError::MalformedPayload(format!(
            "\"{field}\" is empty"
        ))),
        Some(_) => Err(BackendError::MalformedPayload(format!(
            "\"{field}\" is not a string"
        ))),
        None => Err(BackendError::MalformedPayload(format!(
            "\"{field}\" is missing"
        ))),
    };
}

fn required_flag(object: &Map<String, Value>, field: &str) -> Result<bool, BackendError> {
    return match object.get(field) {
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(_) => Err(BackendError::MalformedPayload(format!(
            "\"{field}\" is not a boolean"
        ))),
        None => Err(BackendError::MalformedPayload(format!(
            "\"{field}\" is missing"
        ))),
    };
}
