//! Next-day notice: tomorrow's date interpolated into a markup template.

use super::template::Template;
use crate::clock::Clock;
use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

/// Fields a notice template may use
pub const NOTICE_FIELDS: &[&str] = &["day", "month", "year"];

pub const DEFAULT_NOTICE_TEMPLATE: &str = "Offer valid until <strong>{day}/{month}</strong>.";

/// Calendar date after `now`'s local date
pub fn tomorrow<Tz: TimeZone>(now: &DateTime<Tz>) -> NaiveDate {
    let today = now.date_naive();
    today.succ_opt().unwrap_or(today)
}

/// Tomorrow's day-of-month, two digits
pub fn next_day_label<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format!("{:02}", tomorrow(now).day())
}

pub fn render_notice(template: &Template, date: NaiveDate) -> String {
    template.render(|name| match name {
        "day" => Some(format!("{:02}", date.day())),
        "month" => Some(format!("{:02}", date.month())),
        "year" => Some(format!("{:04}", date.year())),
        _ => None,
    })
}

#[derive(Debug, Clone)]
pub struct Notice {
    template: Template,
}

impl Notice {
    pub fn new(template: &str) -> Self {
        Self {
            template: Template::parse(template),
        }
    }

    pub fn render_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        render_notice(&self.template, tomorrow(now))
    }

    pub fn render(&self, clock: &dyn Clock) -> String {
        self.render_at(&clock.now())
    }
}

impl Default for Notice {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_TEMPLATE)
    }
}
