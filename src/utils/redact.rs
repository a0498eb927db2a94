//! Log Hygiene
//!
//! Upstream error bodies may echo request content or credentials. Anything
//! destined for a log line goes through redaction and truncation first.

/// Marker substituted for credential occurrences in logged text.
pub const REDACTED: &str = "[redacted]";

/// Replace every occurrence of each secret in `text` with [`REDACTED`].
///
/// Empty secrets are skipped so an unconfigured value can never blank out
/// the whole message.
pub fn redact<I, S>(text: &str, secrets: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = text.to_string();
    for secret in secrets {
        let secret = secret.as_ref();
        if !secret.is_empty() {
            out = out.replace(secret, REDACTED);
        }
    }
    out
}

/// Truncate `text` to at most `max_chars` characters, marking elision.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push('…');
    out
}
