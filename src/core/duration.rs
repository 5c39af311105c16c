use std::time::Duration;

use super::error::{Error, Result};

/// Parse duration string like "500ms", "30s", "5m", "1h", "2h30m"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();
    if s.is_empty() {
        return Err(Error::InvalidDuration("empty duration string".to_string()));
    }

    let mut total = Duration::ZERO;
    let mut current_num = String::new();
    let mut chars = s.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() {
            current_num.push(ch);
            continue;
        }
        if ch.is_whitespace() {
            continue;
        }

        let value: u64 = current_num
            .parse()
            .map_err(|_| Error::InvalidDuration(format!("missing number before '{}' in {}", ch, s)))?;
        current_num.clear();

        let part = match ch.to_ascii_lowercase() {
            'h' => Duration::from_secs(value.saturating_mul(3600)),
            'm' if chars.peek().is_some_and(|c| c.eq_ignore_ascii_case(&'s')) => {
                chars.next();
                Duration::from_millis(value)
            }
            'm' => Duration::from_secs(value.saturating_mul(60)),
            's' => Duration::from_secs(value),
            _ => {
                return Err(Error::InvalidDuration(format!(
                    "invalid character '{}' in {}",
                    ch, s
                )))
            }
        };
        total = total.saturating_add(part);
    }

    if !current_num.is_empty() {
        return Err(Error::InvalidDuration(format!(
            "duration must end with a unit (h, m, s or ms): {}",
            s
        )));
    }

    if total.is_zero() {
        return Err(Error::InvalidDuration(format!(
            "duration must be greater than zero: {}",
            s
        )));
    }

    Ok(total)
}
