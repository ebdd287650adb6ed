//! Normalises raw user input before it reaches the metadata library.

use std::sync::LazyLock;

use regex::Regex;

static RE_NON_DIAL: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^0-9+]").unwrap());

/// User input reduced to dialable characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sanitized {
  /// Digits, prefixed with `+` when the input was international.
  pub text: String,
  pub international: bool,
}

impl Sanitized {
  /// Region to parse against: none for international input, otherwise the
  /// configured default.
  pub fn parse_region<'a>(&self, default_region: &'a str) -> Option<&'a str> {
    (!self.international).then_some(default_region)
  }
}

/// Strips everything but ASCII digits and a leading `+`.
///
/// Returns `None` if no digits remain.
pub fn sanitize(raw: &str) -> Option<Sanitized> {
  let stripped = RE_NON_DIAL.replace_all(raw.trim(), "");
  let international = stripped.starts_with('+');
  let digits: String = stripped.chars().filter(char::is_ascii_digit).collect();
  if digits.is_empty() {
    return None;
  }

  let text = if international {
    format!("+{digits}")
  } else {
    digits
  };
  Some(Sanitized {
    text,
    international,
  })
}
