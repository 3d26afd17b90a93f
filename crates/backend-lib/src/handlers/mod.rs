// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! Request handlers.
pub mod login;
pub mod whoami;

pub use login::{login, login_page};
pub use whoami::whoami;

/// Escape text for inclusion in HTML element content or attribute values
pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
