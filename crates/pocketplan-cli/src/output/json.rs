use std::io;

use pocketplan_client::contracts::envelope::FailureEnvelope;
use pocketplan_client::{ClientError, SuccessEnvelope};
use serde::Serialize;

/// Every command shares the client envelope; JSON mode prints it unchanged.
pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &ClientError) -> io::Result<String> {
    serialize_json_pretty(&FailureEnvelope::from(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use pocketplan_client::{ClientError, SuccessEnvelope};
    use serde_json::{Value, json};

    use super::{render_error_json, render_success_json};

    #[test]
    fn success_json_keeps_command_version_and_data() {
        let payload = SuccessEnvelope {
            ok: true,
            command: "salary show".to_string(),
            version: "0.1.0".to_string(),
            data: json!({ "period": "2024-02", "salary": 50000.0 }),
        };

        let rendered = render_success_json(&payload);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], true);
                assert_eq!(value["command"], "salary show");
                assert_eq!(value["data"]["salary"], 50000.0);
            }
        }
    }

    #[test]
    fn error_json_uses_failure_envelope() {
        let error = ClientError::expense_not_found("exp_1");
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(text) = rendered {
            let parsed: Result<Value, _> = serde_json::from_str(&text);
            assert!(parsed.is_ok());
            if let Ok(value) = parsed {
                assert_eq!(value["ok"], false);
                assert_eq!(value["error"]["code"], "expense_not_found");
                assert_eq!(value["data"]["expense_id"], "exp_1");
            }
        }
    }

    #[test]
    fn error_json_omits_absent_data() {
        let error = ClientError::invalid_argument_with_recovery("bad", Vec::new());
        let rendered = render_error_json(&error);
        assert!(matches!(rendered, Ok(text) if !text.contains("\"data\"")));
    }
}
