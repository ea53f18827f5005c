use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;

/// All order deadlines are defined in Phnom Penh local time, regardless of
/// where the submitting client happens to be.
pub const REFERENCE_TZ: Tz = chrono_tz::Asia::Phnom_Penh;

/// Highest day offset selectable from the order form (day after tomorrow).
pub const MAX_DAY_OFFSET: i64 = 2;

/// Coarse delivery/pickup window within a day. Each band has a fixed
/// submission cutoff in the reference timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeBand {
    Morning,
    Afternoon,
    Night,
}

impl TimeBand {
    /// Cutoff time-of-day `(hour, minute)` in the reference timezone.
    pub fn cutoff(self) -> (u32, u32) {
        match self {
            TimeBand::Morning => (9, 0),
            TimeBand::Afternoon => (15, 0),
            TimeBand::Night => (20, 0),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "MORNING" => Some(TimeBand::Morning),
            "AFTERNOON" => Some(TimeBand::Afternoon),
            "NIGHT" => Some(TimeBand::Night),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeBand::Morning => "MORNING",
            TimeBand::Afternoon => "AFTERNOON",
            TimeBand::Night => "NIGHT",
        }
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum WindowError {
    #[error("invalid time selection")]
    InvalidRequest,
    #[error("requested time window has already passed")]
    ExpiredWindow,
}

/// A user's time selection, either relative to "today" in the reference
/// timezone or pinned to an explicit calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    Relative { band: TimeBand, day_offset: i64 },
    Explicit { band: TimeBand, date: NaiveDate },
}

impl WindowRequest {
    /// Build a request from raw form inputs. An explicit date, when present
    /// and non-blank, takes precedence over the day offset.
    pub fn from_selection(
        band: TimeBand,
        day_offset: Option<i64>,
        selected_date: Option<&str>,
    ) -> Result<Self, WindowError> {
        if let Some(raw) = selected_date.map(str::trim).filter(|s| !s.is_empty()) {
            let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| WindowError::InvalidRequest)?;
            return Ok(WindowRequest::Explicit { band, date });
        }
        match day_offset {
            Some(offset) if (0..=MAX_DAY_OFFSET).contains(&offset) => {
                Ok(WindowRequest::Relative { band, day_offset: offset })
            }
            _ => Err(WindowError::InvalidRequest),
        }
    }
}

/// A resolved time window: the calendar date the order is for, and the
/// absolute instant after which it can no longer be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub requested_date: NaiveDate,
    pub expires_at: DateTime<Utc>,
}

/// Resolve a time selection against `now`. Rejects selections whose cutoff
/// has already passed in the reference timezone.
pub fn resolve_window(
    request: WindowRequest,
    now: DateTime<Utc>,
) -> Result<ResolvedWindow, WindowError> {
    let (band, requested_date) = match request {
        WindowRequest::Relative { band, day_offset } => {
            if !(0..=MAX_DAY_OFFSET).contains(&day_offset) {
                return Err(WindowError::InvalidRequest);
            }
            let today = now.with_timezone(&REFERENCE_TZ).date_naive();
            let date = today
                .checked_add_days(Days::new(day_offset as u64))
                .ok_or(WindowError::InvalidRequest)?;
            (band, date)
        }
        WindowRequest::Explicit { band, date } => (band, date),
    };

    let expires_at = expires_at_on(band, requested_date)?;
    if expires_at <= now {
        return Err(WindowError::ExpiredWindow);
    }
    Ok(ResolvedWindow { requested_date, expires_at })
}

/// The band's cutoff on `date`, interpreted in the reference timezone and
/// converted to a UTC instant.
pub fn expires_at_on(band: TimeBand, date: NaiveDate) -> Result<DateTime<Utc>, WindowError> {
    let (hour, minute) = band.cutoff();
    let local = date
        .and_hms_opt(hour, minute, 0)
        .ok_or(WindowError::InvalidRequest)?;
    // Indochina time has no DST, so a local cutoff maps to exactly one instant.
    REFERENCE_TZ
        .from_local_datetime(&local)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(WindowError::InvalidRequest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_now(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        REFERENCE_TZ
            .with_ymd_and_hms(y, mo, d, h, mi, 0)
            .single()
            .expect("valid reference-timezone instant")
            .with_timezone(&Utc)
    }

    #[test]
    fn band_parsing_round_trips() {
        for band in [TimeBand::Morning, TimeBand::Afternoon, TimeBand::Night] {
            assert_eq!(TimeBand::parse(band.as_str()), Some(band));
        }
        assert_eq!(TimeBand::parse("LUNCH"), None);
        assert_eq!(TimeBand::parse("morning"), None);
    }

    #[test]
    fn cutoffs_are_ordered_within_the_day() {
        assert!(TimeBand::Morning.cutoff() < TimeBand::Afternoon.cutoff());
        assert!(TimeBand::Afternoon.cutoff() < TimeBand::Night.cutoff());
    }

    #[test]
    fn requested_date_follows_reference_today_plus_offset() {
        // 01:00 in Phnom Penh on the 10th is still the 9th in UTC; the
        // resolver must count days in the reference timezone, not UTC.
        let now = reference_now(2026, 3, 10, 1, 0);
        for offset in 0..=MAX_DAY_OFFSET {
            let window = resolve_window(
                WindowRequest::Relative { band: TimeBand::Night, day_offset: offset },
                now,
            )
            .expect("window should resolve");
            let expected = NaiveDate::from_ymd_opt(2026, 3, 10)
                .and_then(|d| d.checked_add_days(Days::new(offset as u64)))
                .expect("valid date");
            assert_eq!(window.requested_date, expected);
        }
    }

    #[test]
    fn succeeds_just_before_cutoff_and_expires_just_after() {
        let request = WindowRequest::Relative { band: TimeBand::Morning, day_offset: 0 };

        let before = reference_now(2026, 3, 10, 8, 59);
        let window = resolve_window(request, before).expect("before cutoff should resolve");
        assert_eq!(window.expires_at, reference_now(2026, 3, 10, 9, 0));

        let after = reference_now(2026, 3, 10, 9, 1);
        assert_eq!(resolve_window(request, after), Err(WindowError::ExpiredWindow));
    }

    #[test]
    fn cutoff_instant_itself_is_expired() {
        let request = WindowRequest::Relative { band: TimeBand::Afternoon, day_offset: 0 };
        let at_cutoff = reference_now(2026, 3, 10, 15, 0);
        assert_eq!(resolve_window(request, at_cutoff), Err(WindowError::ExpiredWindow));
    }

    #[test]
    fn out_of_range_offset_is_invalid() {
        for offset in [Some(-1), Some(3), Some(99), None] {
            assert_eq!(
                WindowRequest::from_selection(TimeBand::Morning, offset, None),
                Err(WindowError::InvalidRequest)
            );
        }
    }

    #[test]
    fn explicit_date_takes_precedence_over_offset() {
        let request =
            WindowRequest::from_selection(TimeBand::Night, Some(0), Some("2026-04-01"))
                .expect("selection should parse");
        assert_eq!(
            request,
            WindowRequest::Explicit {
                band: TimeBand::Night,
                date: NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date"),
            }
        );

        let now = reference_now(2026, 3, 10, 12, 0);
        let window = resolve_window(request, now).expect("future date should resolve");
        assert_eq!(window.requested_date, NaiveDate::from_ymd_opt(2026, 4, 1).expect("valid date"));
        assert_eq!(window.expires_at, reference_now(2026, 4, 1, 20, 0));
    }

    #[test]
    fn blank_explicit_date_falls_back_to_offset() {
        let request = WindowRequest::from_selection(TimeBand::Morning, Some(1), Some("  "))
            .expect("selection should parse");
        assert_eq!(request, WindowRequest::Relative { band: TimeBand::Morning, day_offset: 1 });
    }

    #[test]
    fn unparseable_explicit_date_is_invalid() {
        assert_eq!(
            WindowRequest::from_selection(TimeBand::Morning, Some(0), Some("01/04/2026")),
            Err(WindowError::InvalidRequest)
        );
    }

    #[test]
    fn past_explicit_date_is_expired() {
        let now = reference_now(2026, 3, 10, 12, 0);
        let request = WindowRequest::Explicit {
            band: TimeBand::Night,
            date: NaiveDate::from_ymd_opt(2026, 3, 9).expect("valid date"),
        };
        assert_eq!(resolve_window(request, now), Err(WindowError::ExpiredWindow));
    }
}
