pub mod url_validator;

use crate::errors::{Result, ShortlinkError};

/// 短码字母表：数字 + 大写 + 小写，共 62 个字符
pub const CODE_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generate a random short code of `length` characters.
///
/// Every character is drawn uniformly from [`CODE_ALPHABET`] using the
/// thread-local generator of `rand`, which is a CSPRNG seeded from the OS.
/// Uniqueness is the caller's concern.
pub fn generate_random_code(length: usize) -> Result<String> {
    use std::iter;

    if length == 0 {
        return Err(ShortlinkError::invalid_input("Code length must be positive"));
    }

    Ok(
        iter::repeat_with(|| CODE_ALPHABET[rand::random_range(0..CODE_ALPHABET.len())] as char)
            .take(length)
            .collect(),
    )
}

/// Extract the short code from a bare code or a full short URL.
///
/// Query string and fragment are dropped, then the last path segment is
/// taken. Input ending in `/` or without any `/` is returned as-is (trimmed).
pub fn extract_code(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ShortlinkError::invalid_input("Short link cannot be empty"));
    }

    let without_query = trimmed.split('?').next().unwrap_or(trimmed);
    let without_fragment = without_query.split('#').next().unwrap_or(without_query);

    match without_fragment.rfind('/') {
        Some(idx) if idx + 1 < without_fragment.len() => Ok(without_fragment[idx + 1..].to_string()),
        _ => Ok(without_fragment.to_string()),
    }
}

/// Normalize a short-link domain so that codes can be appended directly.
///
/// Blank input falls back to `fallback`.
pub fn normalize_domain(domain: &str, fallback: &str) -> String {
    let trimmed = domain.trim();
    let base = if trimmed.is_empty() { fallback } else { trimmed };
    if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    }
}
