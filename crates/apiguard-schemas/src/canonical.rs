//! Deterministic JSON encoding for persisted snapshots.
//!
//! Baseline files are compared by humans and by version control, so encoding
//! the same logical value must always yield the same bytes, independent of
//! map insertion order, host platform, or locale. Off-the-shelf serializers
//! leave object member order to the backing map, so the encoder here sorts
//! object keys explicitly and uses fixed formatting rules:
//!
//! - objects: keys sorted lexicographically by raw byte order, no whitespace
//! - arrays: element order preserved (order is semantic there)
//! - strings: `"`, `\`, and control characters escaped
//! - numbers and booleans: `serde_json`'s locale-independent text forms
//!
//! The supported value universe is exactly [`serde_json::Value`]: mapping,
//! sequence, string, number, boolean, null. Values outside it cannot reach
//! the encoder; failures converting a Rust struct into a `Value` surface at
//! that conversion boundary.

use std::io::{self, Write};

use serde_json::Value;

/// Encodes a JSON value into its unique canonical byte sequence.
pub fn to_canonical_bytes(value: &Value) -> Vec<u8> {
    let mut out = Vec::new();
    write_canonical(value, &mut out)
        .expect("writing to Vec<u8> cannot fail");
    out
}

/// Writes the canonical encoding of `value` to `out`.
///
/// # Errors
///
/// Returns any I/O error raised by the writer. Encoding itself is total
/// over the `Value` universe.
pub fn write_canonical(
    value: &Value,
    out: &mut impl Write,
) -> io::Result<()> {
    match value {
        Value::Null => out.write_all(b"null"),
        Value::Bool(true) => out.write_all(b"true"),
        Value::Bool(false) => out.write_all(b"false"),
        // serde_json renders numbers via itoa/ryu: fixed, locale-independent.
        Value::Number(n) => write!(out, "{n}"),
        Value::String(s) => write_escaped(s, out),
        Value::Array(items) => {
            out.write_all(b"[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.write_all(b",")?;
                }
                write_canonical(item, out)?;
            }
            out.write_all(b"]")
        }
        Value::Object(map) => {
            // Member order in the backing map is an implementation detail;
            // canonical output always emits keys in sorted order.
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by_key(|(key, _)| key.as_str());

            out.write_all(b"{")?;
            for (i, (key, member)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.write_all(b",")?;
                }
                write_escaped(key, out)?;
                out.write_all(b":")?;
                write_canonical(member, out)?;
            }
            out.write_all(b"}")
        }
    }
}

/// Writes a string as a quoted JSON string, escaping quote, backslash, and
/// all control characters.
fn write_escaped(s: &str, out: &mut impl Write) -> io::Result<()> {
    out.write_all(b"\"")?;
    let mut rest = s;
    while let Some(pos) = rest.find(needs_escape) {
        let (plain, tail) = rest.split_at(pos);
        out.write_all(plain.as_bytes())?;
        let c = tail.chars().next().expect("split at a char boundary");
        match c {
            '"' => out.write_all(b"\\\"")?,
            '\\' => out.write_all(b"\\\\")?,
            '\n' => out.write_all(b"\\n")?,
            '\r' => out.write_all(b"\\r")?,
            '\t' => out.write_all(b"\\t")?,
            c => write!(out, "\\u{:04x}", c as u32)?,
        }
        rest = &tail[c.len_utf8()..];
    }
    out.write_all(rest.as_bytes())?;
    out.write_all(b"\"")
}

/// Returns true for characters that must be escaped in a JSON string.
fn needs_escape(c: char) -> bool {
    matches!(c, '"' | '\\') || (c as u32) < 0x20
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Encodes to a string for readable assertions.
    fn canon(value: &Value) -> String {
        String::from_utf8(to_canonical_bytes(value))
            .expect("canonical output is UTF-8")
    }

    #[test]
    fn scalars() {
        assert_eq!(canon(&json!(null)), "null");
        assert_eq!(canon(&json!(true)), "true");
        assert_eq!(canon(&json!(false)), "false");
        assert_eq!(canon(&json!(42)), "42");
        assert_eq!(canon(&json!(-7)), "-7");
        assert_eq!(canon(&json!("hi")), "\"hi\"");
    }

    #[test]
    fn object_keys_sorted() {
        let value = json!({"zeta": 1, "alpha": 2, "mid": 3});
        assert_eq!(canon(&value), r#"{"alpha":2,"mid":3,"zeta":1}"#);
    }

    #[test]
    fn nested_objects_sorted_recursively() {
        let value = json!({"b": {"y": 1, "x": 2}, "a": [{"n": 1, "m": 2}]});
        assert_eq!(
            canon(&value),
            r#"{"a":[{"m":2,"n":1}],"b":{"x":2,"y":1}}"#
        );
    }

    #[test]
    fn array_order_preserved() {
        // Sequence order is semantically meaningful; never sorted.
        let value = json!([3, 1, 2]);
        assert_eq!(canon(&value), "[3,1,2]");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(canon(&json!("a\"b")), r#""a\"b""#);
        assert_eq!(canon(&json!("a\\b")), r#""a\\b""#);
        assert_eq!(canon(&json!("a\nb\tc\rd")), r#""a\nb\tc\rd""#);
        // Other control characters use \u00XX form.
        assert_eq!(canon(&json!("a\u{1}b")), "\"a\\u0001b\"");
        // Non-ASCII passes through unescaped.
        assert_eq!(canon(&json!("héllo")), "\"héllo\"");
    }

    #[test]
    fn no_insignificant_whitespace() {
        let value = json!({"a": [1, 2], "b": {"c": "d"}});
        assert_eq!(canon(&value), r#"{"a":[1,2],"b":{"c":"d"}}"#);
    }

    #[test]
    fn encoding_twice_is_identical() {
        let value = json!({"k": ["v", {"n": 1.5, "b": false}]});
        assert_eq!(to_canonical_bytes(&value), to_canonical_bytes(&value));
    }

    #[test]
    fn writer_variant_matches_vec_variant() {
        let value = json!({"x": [null, true, "s"]});
        let mut out = Vec::new();
        write_canonical(&value, &mut out).expect("write");
        assert_eq!(out, to_canonical_bytes(&value));
    }
}
