//! Recipient masking for log output.

const VISIBLE: usize = 4;

/// Masks all but the last four characters of a recipient.
///
/// Inputs of four characters or fewer are fully masked.
///
/// ```
/// use bmp_gateway::gateway::mask_recipient;
///
/// assert_eq!(mask_recipient("628116823073"), "********3073");
/// assert_eq!(mask_recipient("123"), "****");
/// ```
#[must_use]
pub fn mask_recipient(to: &str) -> String {
    let len = to.chars().count();
    if len <= VISIBLE {
        return "*".repeat(VISIBLE);
    }

    let hidden = len - VISIBLE;
    to.chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect()
}
