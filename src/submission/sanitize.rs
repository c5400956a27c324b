//! Content sanitization for submitted text.
//!
//! # Responsibilities
//! - Neutralize markup and script-bearing content in string fields
//! - Leave field presence and types untouched
//!
//! # Design Decisions
//! - Strip rather than escape: escaping is not idempotent, stripping to a
//!   fixed point is, and downstream consumers (workflow tooling, logs)
//!   want plain text anyway
//! - Runs after validation so rejected payloads are never processed

use serde_json::Value;

/// Clean one string value.
///
/// Drops control characters, removes `<...>` tag spans and the
/// `javascript:` scheme until a fixed point is reached, then trims
/// surrounding whitespace. Reaching a fixed point makes the whole pass
/// idempotent: `clean_text(clean_text(s)) == clean_text(s)`.
pub fn clean_text(input: &str) -> String {
    let mut current: String = input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect();

    loop {
        let stripped = remove_ascii_scheme(&remove_tag_spans(&current), "javascript:");
        if stripped == current {
            break;
        }
        current = stripped;
    }

    current.trim().to_string()
}

/// Recursively clean every string in a JSON tree.
///
/// Object keys and non-string leaves pass through unchanged, so the
/// shape of the document is preserved exactly.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean_text(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, inner)| (key, sanitize_value(inner)))
                .collect(),
        ),
        other => other,
    }
}

/// Remove every `<...>` span. An unmatched `<` is kept verbatim.
fn remove_tag_spans(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        match rest[open..].find('>') {
            Some(close) => rest = &rest[open + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Remove every ASCII-case-insensitive occurrence of `scheme`.
fn remove_ascii_scheme(s: &str, scheme: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while !rest.is_empty() {
        if rest.len() >= scheme.len()
            && rest.as_bytes()[..scheme.len()].eq_ignore_ascii_case(scheme.as_bytes())
        {
            // scheme is pure ASCII, so this slice lands on a char boundary
            rest = &rest[scheme.len()..];
        } else {
            let mut chars = rest.chars();
            if let Some(c) = chars.next() {
                out.push(c);
            }
            rest = chars.as_str();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_unchanged() {
        assert_eq!(clean_text("Av. Apoquindo 1234, of. 501"), "Av. Apoquindo 1234, of. 501");
        assert_eq!(clean_text("Pérez & Hijos Ltda."), "Pérez & Hijos Ltda.");
    }

    #[test]
    fn strips_script_tags() {
        assert_eq!(
            clean_text("Ana<script>alert('x')</script> Rojas"),
            "Anaalert('x') Rojas"
        );
    }

    #[test]
    fn strips_nested_tag_tricks() {
        // Removing the inner tag must not resurface an outer one.
        assert_eq!(clean_text("<<b>script>alert(1)<</b>/script>"), "script>alert(1)/script>");
        assert_eq!(clean_text("javasjavascript:cript:alert(1)"), "alert(1)");
    }

    #[test]
    fn drops_control_characters() {
        assert_eq!(clean_text("Ana\u{0}\u{7}Rojas"), "AnaRojas");
        assert_eq!(clean_text("line1\nline2"), "line1\nline2");
    }

    #[test]
    fn keeps_unmatched_angle_bracket() {
        assert_eq!(clean_text("precio < 1000"), "precio < 1000");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "Ana<script>alert('x')</script>",
            "  javascript:alert(1)  ",
            "plain",
            "<<b>script>x<</b>/script>",
            "a < b > c",
        ];
        for s in samples {
            let once = clean_text(s);
            assert_eq!(clean_text(&once), once, "not idempotent for {s:?}");
        }
    }

    #[test]
    fn sanitizes_json_tree_preserving_shape() {
        let tree = json!({
            "contact": {"email": "a@b.cl", "nota": "<img src=x onerror=alert(1)>hola"},
            "items": ["<b>uno</b>", 2, true],
        });
        let clean = sanitize_value(tree);
        assert_eq!(clean["contact"]["nota"], json!("hola"));
        assert_eq!(clean["items"], json!(["uno", 2, true]));
        assert_eq!(clean["contact"]["email"], json!("a@b.cl"));
    }

    #[test]
    fn sanitize_value_idempotent() {
        let tree = json!({"x": "<script>a</script>", "y": ["javascript:v", {"z": "<i>t</i>"}]});
        let once = sanitize_value(tree);
        assert_eq!(sanitize_value(once.clone()), once);
    }
}
