//! Ordered matcher cascades.
//!
//! ISBN and edition extraction are both "try these strategies in order, the
//! first one that produces something wins". The order lives in a slice of
//! matchers rather than in chained conditionals so it can be inspected,
//! overridden from config, and tested tier by tier.

use crate::normalize::NormalizedText;

/// A single tier of an extraction cascade.
pub trait Matcher {
    type Output;

    /// Stable name used in logs.
    fn name(&self) -> &'static str;

    /// Run this tier alone. `None` means the tier produced nothing usable.
    fn find(&self, text: &NormalizedText) -> Option<Self::Output>;
}

/// Evaluate `matchers` in order and stop at the first hit.
///
/// Returns the winning matcher alongside its output.
pub fn first_match<'m, M: Matcher>(
    matchers: &'m [M],
    text: &NormalizedText,
) -> Option<(&'m M, M::Output)> {
    for matcher in matchers {
        match matcher.find(text) {
            Some(output) => {
                tracing::debug!(tier = matcher.name(), "cascade hit");
                return Some((matcher, output));
            }
            None => tracing::trace!(tier = matcher.name(), "cascade miss"),
        }
    }
    None
}
