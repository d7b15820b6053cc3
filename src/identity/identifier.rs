/// Identifier canonicalization
use crate::error::{StatsError, StatsResult};

const SEPARATOR: char = '-';
const COMPACT_LEN: usize = 32;
const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];

/// Convert a compact 32-hex identifier into its hyphenated 8-4-4-4-12 form.
///
/// Empty input and input that already contains a separator are returned
/// unchanged, so the function is idempotent. Anything else must be exactly
/// 32 hex characters.
pub fn canonicalize(id: &str) -> StatsResult<String> {
    if id.is_empty() || id.contains(SEPARATOR) {
        return Ok(id.to_string());
    }

    if id.len() != COMPACT_LEN {
        return Err(StatsError::MalformedIdentifier(format!(
            "expected {} characters, got {}",
            COMPACT_LEN,
            id.len()
        )));
    }

    if !id.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(StatsError::MalformedIdentifier(format!(
            "non-hex characters in {:?}",
            id
        )));
    }

    let mut canonical = String::with_capacity(COMPACT_LEN + GROUPS.len() - 1);
    let mut start = 0;
    for (i, len) in GROUPS.iter().enumerate() {
        if i > 0 {
            canonical.push(SEPARATOR);
        }
        canonical.push_str(&id[start..start + len]);
        start += len;
    }

    Ok(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_to_canonical() {
        assert_eq!(
            canonicalize("0123456789abcdef0123456789abcdef").unwrap(),
            "01234567-89ab-cdef-0123-456789abcdef"
        );
    }

    #[test]
    fn test_empty_and_separated_pass_through() {
        assert_eq!(canonicalize("").unwrap(), "");
        assert_eq!(canonicalize("a-b").unwrap(), "a-b");
    }

    #[test]
    fn test_idempotent() {
        for id in [
            "",
            "0123456789abcdef0123456789abcdef",
            "069A79F444E94726A5BEFCA90E38AAF5",
            "853c80ef-3c37-49fd-aa49-938b674adae6",
        ] {
            let once = canonicalize(id).unwrap();
            assert_eq!(canonicalize(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_preserves_case() {
        assert_eq!(
            canonicalize("069A79F444E94726A5BEFCA90E38AAF5").unwrap(),
            "069A79F4-44E9-4726-A5BE-FCA90E38AAF5"
        );
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = canonicalize("0123456789abcdef").unwrap_err();
        assert!(matches!(err, StatsError::MalformedIdentifier(_)));

        let err = canonicalize("0123456789abcdef0123456789abcdef00").unwrap_err();
        assert!(matches!(err, StatsError::MalformedIdentifier(_)));
    }

    #[test]
    fn test_rejects_non_hex() {
        let err = canonicalize("zz23456789abcdef0123456789abcdef").unwrap_err();
        assert!(matches!(err, StatsError::MalformedIdentifier(_)));

        // 32 bytes but multi-byte characters
        let err = canonicalize("é123456789abcdef0123456789abcde").unwrap_err();
        assert!(matches!(err, StatsError::MalformedIdentifier(_)));
    }
}
