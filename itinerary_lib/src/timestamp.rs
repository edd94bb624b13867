use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

/// Value format of an `<input type="datetime-local">`.
pub const INPUT_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// Empty or malformed picker values mean "not set".
pub fn parse_input(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(value, INPUT_TIME_FORMAT)
        // Some browsers keep the seconds
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

pub fn format_input(time: Option<NaiveDateTime>) -> String {
    time.map(|t| t.format(INPUT_TIME_FORMAT).to_string())
        .unwrap_or_default()
}
