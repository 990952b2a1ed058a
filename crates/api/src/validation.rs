//! Request body validation via the `validator` crate.

use serde::{Deserialize, Deserializer};
use validator::{Validate, ValidationErrors};

use crate::error::AppError;

/// Run `validator` rules on a request body, mapping failures to a 400.
pub fn validate_request<T: Validate>(input: &T) -> Result<(), AppError> {
    input
        .validate()
        .map_err(|errors| AppError::validation(describe(&errors)))
}

/// `#[serde(deserialize_with = "trimmed")]`: strip surrounding whitespace
/// before any `validator` rule sees the value.
pub fn trimmed<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| s.trim().to_string())
}

/// Flatten validation errors into `field: message` pairs, sorted by field.
fn describe(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => format!("{field}: {msg}"),
                None => format!("{field}: invalid ({})", e.code),
            })
        })
        .collect();
    parts.sort();
    parts.join("; ")
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Signup {
        #[validate(length(min = 3, message = "must be at least 3 characters"))]
        username: String,
        #[validate(email)]
        email: Option<String>,
    }

    #[derive(serde::Deserialize, Validate)]
    struct Named {
        #[serde(deserialize_with = "trimmed")]
        #[validate(length(min = 3))]
        name: String,
    }

    #[test]
    fn padding_does_not_count_towards_length() {
        let padded: Named = serde_json::from_str(r#"{"name": "  a  "}"#).unwrap();
        assert_eq!(padded.name, "a");
        assert!(validate_request(&padded).is_err());

        let ok: Named = serde_json::from_str(r#"{"name": " bob "}"#).unwrap();
        assert_eq!(ok.name, "bob");
        assert!(validate_request(&ok).is_ok());
    }

    #[test]
    fn valid_input_passes() {
        let input = Signup {
            username: "alice".into(),
            email: Some("alice@example.com".into()),
        };
        assert!(validate_request(&input).is_ok());
    }

    #[test]
    fn messages_name_the_field() {
        let input = Signup {
            username: "al".into(),
            email: Some("nope".into()),
        };
        let msg = validate_request(&input).unwrap_err().to_string();
        assert!(msg.contains("username: must be at least 3 characters"));
        assert!(msg.contains("email: invalid (email)"));
    }
}
