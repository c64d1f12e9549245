use serde::Serialize;

/// Format a result as minified JSON.
pub fn format_json<T: Serialize>(result: &T) -> String {
    serde_json::to_string(result).unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
}

/// Format an error as JSON.
pub fn format_error(err: &dyn std::fmt::Display) -> String {
    serde_json::json!({ "error": err.to_string() }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Report {
        url: String,
        products: usize,
    }

    #[test]
    fn format_json_minified() {
        let data = Report {
            url: "https://example.com/".into(),
            products: 3,
        };
        let json = format_json(&data);
        assert!(!json.contains('\n'));
        assert!(json.contains("\"products\":3"));
    }

    #[test]
    fn format_error_escapes_quotes() {
        let err = "bad \"url\"";
        let json = format_error(&err);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["error"], "bad \"url\"");
    }
}
