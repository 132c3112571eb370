//! Rendering of studio-local class times.
//!
//! Class times are authored and stored as naive wall-clock values in the
//! studio's zone. [`StudioClock::present`] first pins such a value to the
//! studio zone, producing an absolute instant, then renders that instant in
//! whichever zone the caller asked for as an RFC 3339 string with an explicit
//! numeric offset (`2025-06-10T09:00:00+05:30`).

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, SecondsFormat, TimeZone};
use chrono_tz::Tz;

use crate::error::{Result, StudioError};

pub const DEFAULT_STUDIO_ZONE: Tz = chrono_tz::Asia::Kolkata;

/// Parses an IANA zone name such as `America/New_York`. Case is ignored,
/// surrounding whitespace is not.
pub fn parse_zone(name: &str) -> Result<Tz> {
    Tz::from_str_insensitive(name).map_err(|_| StudioError::UnknownZone(name.to_string()))
}

#[derive(Debug, Clone, Copy)]
pub struct StudioClock {
    zone: Tz,
}

impl StudioClock {
    pub fn new(zone: Tz) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Attaches the studio offset to a stored wall-clock time.
    ///
    /// A time inside a DST fold resolves to the earlier of its two instants.
    /// A time inside a DST gap does not exist locally, so it is moved forward
    /// by the length of the gap.
    pub fn localize(&self, wall_clock: NaiveDateTime) -> DateTime<Tz> {
        match self.zone.from_local_datetime(&wall_clock) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => {
                let before = self.zone.offset_from_utc_datetime(&(wall_clock - Duration::days(1)));
                let utc = wall_clock - offset_of(&before);
                self.zone.from_utc_datetime(&utc)
            }
        }
    }

    /// Renders a stored class time, in `target` when given, else in the
    /// studio zone.
    pub fn present(&self, wall_clock: NaiveDateTime, target: Option<&str>) -> Result<String> {
        let zone = match target {
            Some(name) => parse_zone(name)?,
            None => self.zone,
        };
        Ok(self.present_in(wall_clock, zone))
    }

    /// Like [`present`](Self::present) for a zone that is already resolved.
    pub fn present_in(&self, wall_clock: NaiveDateTime, zone: Tz) -> String {
        self.localize(wall_clock)
            .with_timezone(&zone)
            .to_rfc3339_opts(SecondsFormat::AutoSi, false)
    }
}

impl Default for StudioClock {
    fn default() -> Self {
        Self::new(DEFAULT_STUDIO_ZONE)
    }
}

fn offset_of(offset: &<Tz as TimeZone>::Offset) -> Duration {
    use chrono::Offset;
    Duration::seconds(i64::from(offset.fix().local_minus_utc()))
}
