//! Countdown to the next local midnight (rendering-agnostic).
//!
//! The remaining time is computed from an injected instant, split into
//! hours/minutes/seconds and formatted through a template. Frontends only
//! ever see the resulting string.

use super::template::Template;
use crate::clock::Clock;
use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, TimeZone};

/// Fields a countdown template may use
pub const COUNTDOWN_FIELDS: &[&str] = &["hh", "mm", "ss"];

pub const DEFAULT_COUNTDOWN_TEMPLATE: &str = "Time left: {hh}h {mm}m {ss}s";

/// Longest displayable remaining time: 23h 59m 59s
const MAX_DISPLAY_SECONDS: i64 = 24 * 60 * 60 - 1;

/// A midnight that falls in a DST gap is pushed forward in these steps
const GAP_STEP_MINUTES: i64 = 15;
const MAX_GAP_STEPS: i64 = 16;

/// First valid instant at or after local midnight of `date`
fn resolve_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> Option<DateTime<Tz>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..=MAX_GAP_STEPS).find_map(|step| {
        tz.from_local_datetime(&(midnight + TimeDelta::minutes(step * GAP_STEP_MINUTES)))
            .earliest()
    })
}

/// The earliest local midnight at or after `now`.
///
/// Exactly 00:00:00.000 is its own midnight; any later instant counts down to
/// the start of the following day.
pub fn next_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    if now.time() == NaiveTime::MIN {
        return Some(now.clone());
    }
    let tomorrow = now.date_naive().succ_opt()?;
    resolve_midnight(&now.timezone(), tomorrow)
}

/// Real time left until the next local midnight (never negative)
pub fn remaining_until_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> TimeDelta {
    match next_midnight(now) {
        Some(midnight) => midnight
            .signed_duration_since(now.clone())
            .max(TimeDelta::zero()),
        None => TimeDelta::zero(),
    }
}

/// Remaining time split for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountdownParts {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl CountdownParts {
    pub const ZERO: Self = Self {
        hours: 0,
        minutes: 0,
        seconds: 0,
    };

    /// `None` when nothing is left; otherwise whole units, truncated, capped
    /// at 23:59:59.
    pub fn from_remaining(remaining: TimeDelta) -> Option<Self> {
        if remaining.num_milliseconds() <= 0 {
            return None;
        }
        let total = remaining.num_seconds().min(MAX_DISPLAY_SECONDS);
        Some(Self {
            hours: (total / 3600) as u8,
            minutes: ((total % 3600) / 60) as u8,
            seconds: (total % 60) as u8,
        })
    }

    fn field(&self, name: &str) -> Option<String> {
        match name {
            "hh" => Some(format!("{:02}", self.hours)),
            "mm" => Some(format!("{:02}", self.minutes)),
            "ss" => Some(format!("{:02}", self.seconds)),
            _ => None,
        }
    }

    pub fn render(&self, template: &Template) -> String {
        template.render(|name| self.field(name))
    }
}

/// Text for `remaining`, or `zero_text` once the boundary is reached
pub fn render_countdown(remaining: TimeDelta, template: &Template, zero_text: &str) -> String {
    match CountdownParts::from_remaining(remaining) {
        Some(parts) => parts.render(template),
        None => zero_text.to_string(),
    }
}

/// Countdown widget state: a parsed template plus the fixed zero string
#[derive(Debug, Clone)]
pub struct MidnightCountdown {
    template: Template,
    zero_text: String,
}

impl MidnightCountdown {
    /// Without an explicit `zero_text` the template is rendered with all zeros
    pub fn new(template: &str, zero_text: Option<&str>) -> Self {
        let template = Template::parse(template);
        let zero_text = match zero_text {
            Some(text) => text.to_string(),
            None => CountdownParts::ZERO.render(&template),
        };
        Self {
            template,
            zero_text,
        }
    }

    #[cfg(test)]
    pub fn zero_text(&self) -> &str {
        &self.zero_text
    }

    pub fn render_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        render_countdown(remaining_until_midnight(now), &self.template, &self.zero_text)
    }

    pub fn render(&self, clock: &dyn Clock) -> String {
        self.render_at(&clock.now())
    }
}

impl Default for MidnightCountdown {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTDOWN_TEMPLATE, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike, Utc};

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_two_seconds_before_midnight() {
        let cd = MidnightCountdown::default();
        assert_eq!(
            cd.render_at(&utc(2025, 3, 4, 23, 59, 58)),
            "Time left: 00h 00m 02s"
        );
    }

    #[test]
    fn test_exact_midnight_shows_zero_string() {
        let now = utc(2025, 3, 5, 0, 0, 0);
        assert_eq!(remaining_until_midnight(&now), TimeDelta::zero());

        let cd = MidnightCountdown::default();
        assert_eq!(cd.render_at(&now), "Time left: 00h 00m 00s");
    }

    #[test]
    fn test_just_after_midnight_counts_full_day() {
        let now = utc(2025, 3, 5, 0, 0, 0) + TimeDelta::milliseconds(1);
        let cd = MidnightCountdown::default();
        assert_eq!(cd.render_at(&now), "Time left: 23h 59m 59s");
    }

    #[test]
    fn test_sub_seconds_truncate() {
        let now = utc(2025, 3, 4, 12, 0, 0) + TimeDelta::milliseconds(250);
        // 11:59:59.750 left
        let parts = CountdownParts::from_remaining(remaining_until_midnight(&now)).unwrap();
        assert_eq!(
            parts,
            CountdownParts {
                hours: 11,
                minutes: 59,
                seconds: 59
            }
        );
    }

    #[test]
    fn test_parts_always_in_range_and_padded() {
        let cd = MidnightCountdown::new("{hh}:{mm}:{ss}", None);
        let start = utc(2025, 12, 31, 0, 0, 1);
        // Walk the whole day in uneven steps
        for step in 0..2000 {
            let now = start + TimeDelta::seconds(step * 43 + step % 7);
            let text = cd.render_at(&now);
            let fields: Vec<&str> = text.split(':').collect();
            assert_eq!(fields.len(), 3, "bad text {text}");
            for f in &fields {
                assert_eq!(f.len(), 2, "unpadded field in {text}");
            }
            let h: u32 = fields[0].parse().unwrap();
            let m: u32 = fields[1].parse().unwrap();
            let s: u32 = fields[2].parse().unwrap();
            assert!(h <= 23 && m <= 59 && s <= 59, "out of range: {text}");

            let expected = 86_400 - now.num_seconds_from_midnight();
            assert_eq!(h * 3600 + m * 60 + s, expected.min(86_399));
        }
    }

    #[test]
    fn test_non_positive_remaining_is_zero_text() {
        let t = Template::parse("{hh}{mm}{ss}");
        assert_eq!(render_countdown(TimeDelta::zero(), &t, "done"), "done");
        assert_eq!(render_countdown(TimeDelta::seconds(-5), &t, "done"), "done");
        assert_eq!(render_countdown(TimeDelta::seconds(61), &t, "done"), "000101");
    }

    #[test]
    fn test_explicit_zero_text_overrides_template() {
        let cd = MidnightCountdown::new("{hh}h", Some("Expired"));
        assert_eq!(cd.zero_text(), "Expired");
        assert_eq!(cd.render_at(&utc(2025, 1, 1, 0, 0, 0)), "Expired");
        assert_eq!(cd.render_at(&utc(2025, 1, 1, 1, 0, 0)), "23h");
    }

    #[test]
    fn test_remaining_is_capped_for_display() {
        let parts = CountdownParts::from_remaining(TimeDelta::hours(25)).unwrap();
        assert_eq!(
            parts,
            CountdownParts {
                hours: 23,
                minutes: 59,
                seconds: 59
            }
        );
    }

    #[test]
    fn test_midnight_uses_local_offset() {
        let brt = FixedOffset::west_opt(3 * 3600).unwrap();
        let now = brt.with_ymd_and_hms(2025, 3, 4, 22, 30, 0).unwrap();
        let midnight = next_midnight(&now).unwrap();
        assert_eq!(midnight, brt.with_ymd_and_hms(2025, 3, 5, 0, 0, 0).unwrap());
        assert_eq!(remaining_until_midnight(&now), TimeDelta::minutes(90));
    }

    // Sao Paulo skipped 2018-11-04 00:00..01:00 and repeated 2019-02-16 23:00..00:00
    #[test]
    fn test_midnight_in_dst_gap_moves_to_first_valid_instant() {
        use chrono_tz::America::Sao_Paulo;

        let now = Sao_Paulo.with_ymd_and_hms(2018, 11, 3, 23, 0, 0).single().unwrap();
        let midnight = next_midnight(&now).unwrap();
        assert_eq!(
            midnight,
            Sao_Paulo.with_ymd_and_hms(2018, 11, 4, 1, 0, 0).single().unwrap()
        );
        assert_eq!(midnight.naive_utc(), utc(2018, 11, 4, 3, 0, 0).naive_utc());
        assert_eq!(remaining_until_midnight(&now), TimeDelta::hours(1));

        let cd = MidnightCountdown::default();
        assert_eq!(cd.render_at(&now), "Time left: 01h 00m 00s");

        // The shortened day that follows is 23 hours long
        assert_eq!(remaining_until_midnight(&midnight), TimeDelta::hours(23));
    }

    #[test]
    fn test_long_dst_day_saturates_display() {
        use chrono_tz::America::Sao_Paulo;

        let now = Sao_Paulo.with_ymd_and_hms(2019, 2, 16, 0, 30, 0).single().unwrap();
        assert_eq!(
            remaining_until_midnight(&now),
            TimeDelta::hours(24) + TimeDelta::minutes(30)
        );
        let cd = MidnightCountdown::default();
        assert_eq!(cd.render_at(&now), "Time left: 23h 59m 59s");

        // First pass through the repeated hour still has the second pass to go
        let repeated = Sao_Paulo.with_ymd_and_hms(2019, 2, 16, 23, 30, 0).earliest().unwrap();
        assert_eq!(
            remaining_until_midnight(&repeated),
            TimeDelta::hours(1) + TimeDelta::minutes(30)
        );
        assert_eq!(cd.render_at(&repeated), "Time left: 01h 30m 00s");
    }

    #[test]
    fn test_month_and_year_rollover() {
        let midnight = next_midnight(&utc(2024, 12, 31, 18, 0, 0)).unwrap();
        assert_eq!(midnight, utc(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_render_with_clock() {
        use crate::clock::FixedClock;
        use chrono::Local;

        let clock = FixedClock::new(Local.with_ymd_and_hms(2025, 1, 15, 23, 0, 0).unwrap());
        let cd = MidnightCountdown::default();
        assert_eq!(cd.render(&clock), "Time left: 01h 00m 00s");
    }
}
