//! Query string parsing module
//!
//! Minimal `application/x-www-form-urlencoded` parsing for GET query
//! strings; enough for the fixture selector form.

/// Extract a single parameter value from a query string
///
/// Returns the first occurrence, percent-decoded with `+` as space.
/// A key without `=` yields an empty value.
pub fn get_param(query: &str, name: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (key, value) = match pair.split_once('=') {
            Some((k, v)) => (k, v),
            None => (pair, ""),
        };
        (key == name).then(|| decode(value))
    })
}

/// Percent-decode a query value (`+` decodes to space)
///
/// Malformed escapes are kept literally rather than rejected; a garbled
/// name simply selects no fixture.
pub fn decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                if let (Some(hi), Some(lo)) = (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    out.push(hi * 16 + lo);
                    i += 3;
                } else {
                    out.push(b'%');
                    i += 1;
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

const fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_param() {
        assert_eq!(
            get_param("resource=big-vector", "resource"),
            Some("big-vector".to_string())
        );
        assert_eq!(
            get_param("a=1&resource=nested-svg&b=2", "resource"),
            Some("nested-svg".to_string())
        );
        assert_eq!(get_param("a=1&b=2", "resource"), None);
        assert_eq!(get_param("", "resource"), None);
    }

    #[test]
    fn test_empty_and_bare_values() {
        assert_eq!(get_param("resource=", "resource"), Some(String::new()));
        assert_eq!(get_param("resource", "resource"), Some(String::new()));
    }

    #[test]
    fn test_decoding() {
        assert_eq!(decode("two%20words"), "two words");
        assert_eq!(decode("plus+space"), "plus space");
        assert_eq!(decode("slash%2Fname"), "slash/name");
        // Malformed escapes pass through literally
        assert_eq!(decode("bad%zzescape"), "bad%zzescape");
        assert_eq!(decode("trailing%2"), "trailing%2");
    }
}
