//! Relative IRI resolution shared by the parsers

use std::path::Path;

use iri_string::types::{IriAbsoluteStr, IriReferenceStr};

/// `true` when `reference` starts with a URI scheme (`scheme:`)
pub(crate) fn has_scheme(reference: &str) -> bool {
    match reference.find(':') {
        Some(colon) => {
            let scheme = &reference[..colon];
            let mut chars = scheme.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Resolve `reference` against `base` (RFC 3986 section 5).
///
/// Absolute references are returned untouched. Without a base a relative
/// reference is kept as written.
pub(crate) fn resolve(base: Option<&str>, reference: &str) -> Result<String, String> {
    if has_scheme(reference) {
        return Ok(reference.to_string());
    }
    let Some(base) = base else {
        return Ok(reference.to_string());
    };
    let base_without_fragment = base.split('#').next().unwrap_or(base);
    let base_iri = IriAbsoluteStr::new(base_without_fragment)
        .map_err(|e| format!("invalid base IRI <{}>: {}", base, e))?;
    let relative = IriReferenceStr::new(reference)
        .map_err(|e| format!("invalid IRI reference <{}>: {}", reference, e))?;
    Ok(relative.resolve_against(base_iri).to_string())
}

/// `file://` IRI of `path`, made absolute against the working directory
pub(crate) fn file_iri(path: &Path) -> String {
    let absolute = std::fs::canonicalize(path)
        .ok()
        .or_else(|| std::env::current_dir().ok().map(|dir| dir.join(path)))
        .unwrap_or_else(|| path.to_path_buf());
    let text = absolute.to_string_lossy().replace('\\', "/");
    let text = text.strip_prefix("//?/").unwrap_or(&text);

    let mut iri = String::from("file://");
    if !text.starts_with('/') {
        iri.push('/');
    }
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' => iri.push(byte as char),
            b'-' | b'.' | b'_' | b'~' | b'/' | b':' | b'@' | b'!' | b'$' | b'&' | b'\'' | b'('
            | b')' | b'*' | b'+' | b',' | b';' | b'=' => iri.push(byte as char),
            _ => iri.push_str(&format!("%{:02X}", byte)),
        }
    }
    iri
}
