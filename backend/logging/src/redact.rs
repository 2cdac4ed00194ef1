//! Log Redaction
//!
//! Scrubs debtor PII (phone numbers, e-mail addresses, account numbers) and
//! bearer tokens from strings before they are logged.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());
static TELEPHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b").unwrap()
});
/// Card and bank account numbers: 12 to 19 digits, optionally grouped by spaces or dashes.
static ACCOUNT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d(?:[ -]?\d){11,18}\b").unwrap());
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").unwrap());

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    // Accounts before phones: a long digit run would otherwise be half-eaten as a phone.
    let redacted = TOKEN_RE.replace_all(input, "[REDACTED_TOKEN]");
    let redacted = EMAIL_RE.replace_all(&redacted, "[REDACTED_EMAIL]");
    let redacted = ACCOUNT_RE.replace_all(&redacted, "[REDACTED_ACCOUNT]");
    let redacted = TELEPHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]");
    redacted.into_owned()
}
