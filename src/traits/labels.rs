// SPDX-License-Identifier: MIT OR Apache-2.0

/// Resolves i18n tokens to display text for prompt rendering.
///
/// Only prompt text passes through here; translation has no effect on
/// resolution logic or selection invariants.
pub trait LabelResolver: Send + Sync {
    /// Translate a token, substituting the given `(name, value)` params.
    ///
    /// Implementations should fall back to returning the token itself for
    /// unknown keys so a missing translation never breaks a prompt.
    fn translate(&self, token: &str, params: &[(&str, &str)]) -> String;
}

/// Identity resolver: every token renders as itself.
///
/// Useful for hosts that pre-translate catalog labels, and as the default in
/// tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityLabels;

impl LabelResolver for IdentityLabels {
    fn translate(&self, token: &str, _params: &[(&str, &str)]) -> String {
        token.to_string()
    }
}
