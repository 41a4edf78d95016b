//! Timestamp formatting in the local time zone.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

/// Formats a UTC [`Timestamp`] as `YYYY-MM-DD HH:MM:SS TZ` in the system
/// time zone.
///
/// ```rust
/// use jiff::Timestamp;
/// use vision_core::display::LocalDateTime;
///
/// let ts = Timestamp::from_second(1640995200).unwrap();
/// let shown = LocalDateTime(&ts).to_string();
/// assert!(shown.starts_with("202"));
/// ```
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let zoned = self.0.to_zoned(TimeZone::system());
        write!(f, "{}", zoned.strftime("%Y-%m-%d %H:%M:%S %Z"))
    }
}
