//! Postal prefix extraction

/// Length of a forward sortation area (the first half of a Canadian postal code).
pub const PREFIX_LEN: usize = 3;

/// Prefix reported when the provider has no address for the coordinate.
pub const UNKNOWN_PREFIX: &str = "Unknown";

/// Address reported when the provider has no address for the coordinate.
pub const UNKNOWN_ADDRESS: &str = "Unknown Location";

/// Uppercased first three characters of a postal code.
///
/// Absent codes and codes shorter than three characters (after trimming)
/// give an empty prefix. The code's format is not otherwise validated.
pub fn postal_prefix(postcode: Option<&str>) -> String {
    let Some(code) = postcode.map(str::trim) else {
        return String::new();
    };
    let prefix: String = code.chars().take(PREFIX_LEN).collect();
    if prefix.chars().count() < PREFIX_LEN {
        return String::new();
    }
    prefix.to_uppercase()
}
