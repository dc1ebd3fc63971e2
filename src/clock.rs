use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

pub const DEFAULT_WINDOW_START: &str = "08:00";
pub const DEFAULT_WINDOW_END: &str = "20:00";

/// Placeholder shown wherever no instant is available.
pub const NO_TIME: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowBounds {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

pub fn day_key(now: NaiveDateTime) -> String {
    date_key(now.date())
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours = hours.trim().parse::<u32>().ok()?;
    let minutes = minutes.trim().parse::<u32>().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

/// Both bounds land on `now`'s date. An inverted or zero-length window is
/// returned as is.
pub fn window_bounds_for_today(start: &str, end: &str, now: NaiveDateTime) -> WindowBounds {
    let today = now.date();
    WindowBounds {
        start: today.and_time(time_or_default(start, DEFAULT_WINDOW_START)),
        end: today.and_time(time_or_default(end, DEFAULT_WINDOW_END)),
    }
}

fn time_or_default(value: &str, fallback: &str) -> NaiveTime {
    parse_hhmm(value)
        .or_else(|| parse_hhmm(fallback))
        .unwrap_or_default()
}

pub fn next_midnight(now: NaiveDateTime) -> NaiveDateTime {
    (now.date() + Duration::days(1)).and_time(NaiveTime::default())
}

/// Wall-clock delta from `now` to `at`, zero when `at` has passed.
pub fn until(now: NaiveDateTime, at: NaiveDateTime) -> std::time::Duration {
    (at - now).to_std().unwrap_or_default()
}

pub fn format_hhmm(instant: Option<NaiveDateTime>) -> String {
    match instant {
        Some(at) => at.format("%H:%M").to_string(),
        None => NO_TIME.to_string(),
    }
}

pub fn format_instant(instant: NaiveDateTime) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn parse_instant(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), "%Y-%m-%dT%H:%M:%S").ok()
}

#[cfg(test)]
pub(crate) fn at(date: (i32, u32, u32), hours: u32, minutes: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(date.0, date.1, date.2)
        .and_then(|day| day.and_hms_opt(hours, minutes, 0))
        .expect("valid test instant")
}
