// ABOUTME: Shared utility functions for Modview
// ABOUTME: Token masking for logs and status lines

/// Upper bound on the characters kept visible when masking a token
const VISIBLE_PREFIX: usize = 6;

/// Mask a bearer token for logging.
///
/// At most half of the token is kept, capped at six characters, so no token
/// is ever returned whole.
pub fn mask_token(token: &str) -> String {
    let visible = VISIBLE_PREFIX.min(token.chars().count() / 2);
    let prefix: String = token.chars().take(visible).collect();
    format!("{}…", prefix)
}
