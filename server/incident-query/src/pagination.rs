//! Page/limit → offset/limit window.

use std::num::{IntErrorKind, NonZeroU32};

/// A bounded result window. `offset` is never negative and `limit` is
/// always in `1..=max_page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
  pub offset: i64,
  pub limit: i64,
}

impl Pagination {
  /// Parse failures degrade to defaults rather than erroring:
  /// - page: absent, non-numeric or < 1 → 1
  /// - limit: absent, non-numeric, <= 0 or > max → max
  pub fn from_params(page: Option<&str>, limit: Option<&str>, max_page_size: NonZeroU32) -> Self {
    let max = i64::from(max_page_size.get());

    let page = page
      .and_then(parse_saturating)
      .filter(|p| *p >= 1)
      .unwrap_or(1);

    let limit = limit
      .and_then(parse_saturating)
      .filter(|l| *l > 0 && *l <= max)
      .unwrap_or(max);

    Self {
      offset: (page - 1).saturating_mul(limit),
      limit,
    }
  }

  /// Read the first `page` and `limit` values from raw query pairs.
  pub fn from_pairs<'a, I>(pairs: I, max_page_size: NonZeroU32) -> Self
  where
    I: IntoIterator<Item = (&'a str, &'a str)>,
  {
    let mut page = None;
    let mut limit = None;
    for (name, value) in pairs {
      match name {
        "page" if page.is_none() => page = Some(value),
        "limit" if limit.is_none() => limit = Some(value),
        _ => {}
      }
    }
    Self::from_params(page, limit, max_page_size)
  }
}

/// Decimal integer with optional sign; no surrounding whitespace. Values out
/// of range saturate to the i64 bounds instead of being rejected.
fn parse_saturating(raw: &str) -> Option<i64> {
  match raw.parse::<i64>() {
    Ok(n) => Some(n),
    Err(e) => match e.kind() {
      IntErrorKind::PosOverflow => Some(i64::MAX),
      IntErrorKind::NegOverflow => Some(i64::MIN),
      _ => None,
    },
  }
}
