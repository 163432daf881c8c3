//! User-facing presentation of loader failures.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Transport,
    Validation,
    Unknown,
}

pub fn classify_failure(message: &str) -> FailureCategory {
    let lower = message.to_ascii_lowercase();
    if lower.contains("failed to reach")
        || lower.contains("connection refused")
        || lower.contains("timed out")
        || lower.contains("dns")
    {
        FailureCategory::Transport
    } else if lower.contains("invalid")
        || lower.contains("malformed")
        || lower.contains("rejected")
    {
        FailureCategory::Validation
    } else {
        FailureCategory::Unknown
    }
}

pub fn describe_failure(message: &str) -> String {
    match classify_failure(message) {
        FailureCategory::Transport => {
            "Catalog service unreachable; check the API URL and retry with 'r'.".to_string()
        }
        FailureCategory::Validation => {
            format!("Catalog API returned an unusable response: {message}")
        }
        FailureCategory::Unknown => format!("Catalog error: {message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_transport_failures() {
        assert_eq!(
            classify_failure("failed to load categories: failed to reach catalog API for /categories"),
            FailureCategory::Transport
        );
        assert_eq!(
            classify_failure("connection refused by 127.0.0.1:8443"),
            FailureCategory::Transport
        );
    }

    #[test]
    fn classifies_payload_failures() {
        assert_eq!(
            classify_failure("invalid payload from /products"),
            FailureCategory::Validation
        );
        assert_eq!(
            classify_failure("catalog API rejected /categories: Internal: down"),
            FailureCategory::Validation
        );
    }

    #[test]
    fn everything_else_is_unknown() {
        assert_eq!(classify_failure("boom"), FailureCategory::Unknown);
    }
}
