//! Identifier sanitization.
//!
//! Every generated identifier doubles as a file stem and as a schema
//! identifier, so it must match `^[A-Za-z_][A-Za-z0-9_]{0,127}$`.

use ucdport_common::constants::{DEFAULT_IDENTIFIER, ID_MAX_LEN};

/// Converts arbitrary text into a stable, schema-safe identifier.
///
/// Surrounding whitespace is ignored; blank input becomes `id`. Any
/// character outside `[A-Za-z0-9_]` is replaced by `_`, an underscore is
/// prepended when the first character is not a letter or underscore, and
/// the result is truncated to [`ID_MAX_LEN`] characters.
#[must_use]
pub fn sanitize_identifier(name: &str) -> String {
    let trimmed = name.trim();
    let source = if trimmed.is_empty() {
        DEFAULT_IDENTIFIER
    } else {
        trimmed
    };

    let mut id: String = source
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if !id.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        id.insert(0, '_');
    }

    // Only ASCII remains, so byte truncation lands on a char boundary.
    id.truncate(ID_MAX_LEN);
    id
}
