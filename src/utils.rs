/// Utility functions
use serde_json::Value;

/// Extract number from JSON value
pub fn num(v: &Value) -> Option<f64> {
    if let Some(x) = v.as_f64() {
        return Some(x);
    }
    if let Some(s) = v.as_str() {
        return s.trim().parse::<f64>().ok();
    }
    None
}

/// Extract number and round half away from zero
pub fn rounded(v: &Value) -> Option<i64> {
    num(v).filter(|x| x.is_finite()).map(|x| x.round() as i64)
}

/// Pick string value from JSON by trying multiple keys
pub fn s_pick(v: &Value, keys: &[&str]) -> Option<String> {
    for k in keys {
        if let Some(x) = v.get(*k) {
            if let Some(s) = as_text(x) {
                return Some(s);
            }
        }
    }
    None
}

/// String value at a JSON pointer such as `/camera/full_name`
pub fn s_at(v: &Value, pointer: &str) -> Option<String> {
    v.pointer(pointer).and_then(as_text)
}

fn as_text(x: &Value) -> Option<String> {
    if let Some(s) = x.as_str() {
        if !s.is_empty() {
            return Some(s.to_string());
        }
    } else if x.is_number() {
        return Some(x.to_string());
    }
    None
}

/// Mask the value of every `api_key=` query parameter
pub fn redact_api_key(input: &str) -> String {
    const NEEDLE: &str = "api_key=";
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find(NEEDLE) {
        let (head, tail) = rest.split_at(pos + NEEDLE.len());
        out.push_str(head);
        out.push_str("[REDACTED]");
        let end = tail
            .find(|c: char| c == '&' || c == ')' || c == '"' || c.is_whitespace())
            .unwrap_or(tail.len());
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}
