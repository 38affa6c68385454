//! Phone number normalization for contact grouping.

/// Number of trailing digits kept for long numbers.
const KEY_LENGTH: usize = 10;

/// Canonicalizes a raw address into a grouping key.
///
/// Strips every `+`; numbers longer than nine characters keep only their
/// last ten, so `+1 555…` and `555…` land in the same group. Shorter values
/// (short codes, names) pass through unchanged. This is a heuristic, not a
/// phone number parser.
///
/// ```
/// use smsxtract::parsing::normalize_address;
///
/// assert_eq!(normalize_address("+15551234567"), "5551234567");
/// assert_eq!(normalize_address("5551234567"), "5551234567");
/// assert_eq!(normalize_address("+4412345"), "4412345");
/// ```
pub fn normalize_address(raw: &str) -> String {
    let stripped: String = raw.chars().filter(|&c| c != '+').collect();
    let len = stripped.chars().count();

    if len < KEY_LENGTH {
        return stripped;
    }

    stripped.chars().skip(len - KEY_LENGTH).collect()
}
