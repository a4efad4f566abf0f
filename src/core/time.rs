use serde::de::Error as _;
use serde::Deserialize;
use time::{
    format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime,
    PrimitiveDateTime, UtcOffset,
};

pub(crate) fn primitive_now_utc() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    PrimitiveDateTime::new(now.date(), now.time())
}

pub(crate) fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

pub(crate) fn format_primitive(value: PrimitiveDateTime) -> String {
    value.assume_utc().format(&Rfc3339).unwrap_or_else(|_| value.assume_utc().to_string())
}

pub(crate) fn format_date(value: Date) -> String {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| value.to_string())
}

/// Spreadsheet exports use second precision without a zone designator.
pub(crate) fn format_export_timestamp(value: PrimitiveDateTime) -> String {
    value
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"))
        .unwrap_or_else(|_| value.to_string())
}

pub(crate) fn parse_date(raw: &str) -> Option<Date> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).ok()
}

/// Accepts RFC 3339 and the zone-less `datetime-local` shapes browsers send,
/// normalising everything to UTC.
pub(crate) fn parse_datetime_flexible(raw: &str) -> Option<PrimitiveDateTime> {
    let raw = raw.trim();
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        let utc = value.to_offset(UtcOffset::UTC);
        return Some(PrimitiveDateTime::new(utc.date(), utc.time()));
    }

    let separator = raw.as_bytes().get(10).copied();
    if separator != Some(b'T') && separator != Some(b' ') {
        return parse_date(raw).map(|date| date.midnight());
    }

    let normalized = raw.replacen(' ', "T", 1);
    if let Ok(value) = PrimitiveDateTime::parse(
        &normalized,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(value);
    }

    PrimitiveDateTime::parse(&normalized, format_description!("[year]-[month]-[day]T[hour]:[minute]"))
        .ok()
}

pub(crate) fn deserialize_datetime_flexible<'de, D>(
    deserializer: D,
) -> Result<PrimitiveDateTime, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime_flexible(&raw).ok_or_else(|| D::Error::custom(format!("invalid datetime: {raw}")))
}

pub(crate) fn deserialize_option_datetime_flexible<'de, D>(
    deserializer: D,
) -> Result<Option<PrimitiveDateTime>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) => parse_datetime_flexible(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid datetime: {value}")))
            .map(Some),
        None => Ok(None),
    }
}

pub(crate) fn deserialize_option_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => parse_date(&value)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {value}")))
            .map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Month, Time};

    fn sample() -> PrimitiveDateTime {
        let date = Date::from_calendar_date(2025, Month::January, 2).unwrap();
        PrimitiveDateTime::new(date, Time::from_hms(10, 20, 30).unwrap())
    }

    #[test]
    fn format_primitive_outputs_utc_z() {
        assert_eq!(format_primitive(sample()), "2025-01-02T10:20:30Z");
    }

    #[test]
    fn export_timestamp_drops_zone_and_fraction() {
        let value = sample().replace_nanosecond(123_000_000).unwrap();
        assert_eq!(format_export_timestamp(value), "2025-01-02 10:20:30");
    }

    #[test]
    fn flexible_parser_normalizes_offsets_to_utc() {
        let parsed = parse_datetime_flexible("2025-01-02T13:20:30+03:00").unwrap();
        assert_eq!(parsed, sample());
    }

    #[test]
    fn flexible_parser_accepts_local_shapes() {
        assert_eq!(parse_datetime_flexible("2025-01-02T10:20:30"), Some(sample()));
        assert_eq!(parse_datetime_flexible("2025-01-02 10:20:30"), Some(sample()));
        assert_eq!(
            parse_datetime_flexible("2025-01-02T10:20"),
            Some(sample().replace_second(0).unwrap())
        );
        assert_eq!(
            parse_datetime_flexible("2025-01-02"),
            Some(Date::from_calendar_date(2025, Month::January, 2).unwrap().midnight())
        );
        assert_eq!(parse_datetime_flexible("yesterday"), None);
    }

    #[test]
    fn format_date_is_iso() {
        let date = Date::from_calendar_date(2024, Month::March, 5).unwrap();
        assert_eq!(format_date(date), "2024-03-05");
        assert_eq!(parse_date(" 2024-03-05 "), Some(date));
    }
}
