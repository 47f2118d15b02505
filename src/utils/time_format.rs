//! `HH:MM` serde for times of day.
//!
//! Use with `#[serde(with = "crate::utils::time_format")]`, or the `option`
//! submodule for `Option<NaiveTime>` fields (pair it with `#[serde(default)]`).
//! Input with seconds (`HH:MM:SS`) is accepted, output never carries them.

use chrono::NaiveTime;
use serde::{Deserialize, Deserializer, Serializer, de};

pub const FORMAT: &str = "%H:%M";

pub fn parse(raw: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(raw, FORMAT).or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
}

pub fn serialize<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&time.format(FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(de::Error::custom)
}

pub mod option {
    use super::*;

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => super::serialize(t, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.is_empty() => parse(&raw).map(Some).map_err(de::Error::custom),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Shift {
        #[serde(with = "crate::utils::time_format")]
        start: NaiveTime,
        #[serde(with = "crate::utils::time_format::option", default)]
        end: Option<NaiveTime>,
    }

    #[test]
    fn writes_hours_and_minutes_only() {
        let shift = Shift {
            start: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            end: None,
        };
        let json = serde_json::to_value(&shift).unwrap();
        assert_eq!(json["start"], "09:05");
        assert!(json["end"].is_null());
    }

    #[test]
    fn accepts_seconds_and_missing_optional() {
        let shift: Shift = serde_json::from_str(r#"{"start":"17:30:00"}"#).unwrap();
        assert_eq!(shift.start, NaiveTime::from_hms_opt(17, 30, 0).unwrap());
        assert_eq!(shift.end, None);
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Shift>(r#"{"start":"half past nine"}"#).is_err());
    }
}
