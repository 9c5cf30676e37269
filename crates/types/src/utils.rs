//! Utility functions and helpers

/// Parse a boolean token.
///
/// Only the literals listed in [`TRUTHY_VALUES`](crate::constants::TRUTHY_VALUES)
/// are recognised; there is no case folding beyond them.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a boolean token, treating anything unrecognised as `false`.
pub fn is_truthy(value: &str) -> bool {
    parse_bool(value).unwrap_or(false)
}
