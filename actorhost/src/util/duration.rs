//! Sidecar duration wire format.
//!
//! The sidecar exchanges durations as Go-style strings produced by the rule
//! `<H>h<M>m<S>s<ms>ms<μs>μs` (for example `0h0m1s0ms0μs`). Reminder and
//! timer bodies and the runtime configuration probe all use this format.

// Layer 1: Standard library imports
use std::time::Duration;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

const MICROS_PER_HOUR: u128 = 3_600_000_000;
const MICROS_PER_MINUTE: u128 = 60_000_000;
const MICROS_PER_SECOND: u128 = 1_000_000;
const MICROS_PER_MILLI: u128 = 1_000;

/// A duration literal that does not follow the sidecar wire format.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid duration literal: {0:?}")]
pub struct InvalidDuration(pub String);

/// Render a [`Duration`] in the sidecar wire format.
///
/// # Example
/// ```rust
/// use std::time::Duration;
/// use actorhost::util::to_sidecar_duration;
///
/// assert_eq!(to_sidecar_duration(Duration::from_secs(1)), "0h0m1s0ms0μs");
/// assert_eq!(to_sidecar_duration(Duration::from_secs(3600)), "1h0m0s0ms0μs");
/// ```
pub fn to_sidecar_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    let hours = micros / MICROS_PER_HOUR;
    let minutes = (micros / MICROS_PER_MINUTE) % 60;
    let seconds = (micros / MICROS_PER_SECOND) % 60;
    let millis = (micros / MICROS_PER_MILLI) % 1_000;
    let micros = micros % 1_000;
    format!("{hours}h{minutes}m{seconds}s{millis}ms{micros}μs")
}

/// Parse a duration in the sidecar wire format.
///
/// Accepts any subset of the `h`/`m`/`s`/`ms`/`μs` segments in order, so
/// short forms such as `"1h0m0s"` parse as well. `us` is accepted as an
/// ASCII spelling of `μs`.
pub fn from_sidecar_duration(literal: &str) -> Result<Duration, InvalidDuration> {
    let invalid = || InvalidDuration(literal.to_string());
    if literal.is_empty() {
        return Err(invalid());
    }

    let mut micros: u128 = 0;
    let mut rest = literal;
    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(invalid)?;
        if digits_end == 0 {
            return Err(invalid());
        }
        let value: u128 = rest[..digits_end].parse().map_err(|_| invalid())?;
        rest = &rest[digits_end..];

        let unit_end = rest
            .find(|c: char| c.is_ascii_digit())
            .unwrap_or(rest.len());
        let multiplier = match &rest[..unit_end] {
            "h" => MICROS_PER_HOUR,
            "m" => MICROS_PER_MINUTE,
            "s" => MICROS_PER_SECOND,
            "ms" => MICROS_PER_MILLI,
            "μs" | "us" => 1,
            _ => return Err(invalid()),
        };
        micros += value * multiplier;
        rest = &rest[unit_end..];
    }

    u64::try_from(micros)
        .map(Duration::from_micros)
        .map_err(|_| invalid())
}

/// Serde adapter for [`Duration`] fields carried in the sidecar wire format.
pub mod sidecar_duration {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&to_sidecar_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let literal = String::deserialize(deserializer)?;
        from_sidecar_duration(&literal).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for optional durations; pair with
/// `#[serde(skip_serializing_if = "Option::is_none")]` so absent values are
/// omitted from the wire body.
pub mod sidecar_duration_opt {
    use super::*;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => serializer.serialize_str(&to_sidecar_duration(*duration)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let literal = Option::<String>::deserialize(deserializer)?;
        literal
            .map(|l| from_sidecar_duration(&l).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_second() {
        assert_eq!(to_sidecar_duration(Duration::from_secs(1)), "0h0m1s0ms0μs");
    }

    #[test]
    fn test_one_hour() {
        assert_eq!(
            to_sidecar_duration(Duration::from_secs(3600)),
            "1h0m0s0ms0μs"
        );
    }

    #[test]
    fn test_mixed_components() {
        let duration = Duration::from_secs(2 * 3600 + 30 * 60 + 3)
            + Duration::from_millis(4)
            + Duration::from_micros(5);
        assert_eq!(to_sidecar_duration(duration), "2h30m3s4ms5μs");
    }

    #[test]
    fn test_zero() {
        assert_eq!(to_sidecar_duration(Duration::ZERO), "0h0m0s0ms0μs");
    }

    #[test]
    fn test_parse_full_rule() {
        assert_eq!(
            from_sidecar_duration("0h0m1s0ms0μs").expect("parse"),
            Duration::from_secs(1)
        );
    }

    #[test]
    fn test_parse_short_form() {
        assert_eq!(
            from_sidecar_duration("1h0m0s").expect("parse"),
            Duration::from_secs(3600)
        );
    }

    #[test]
    fn test_parse_ascii_micro_unit() {
        assert_eq!(
            from_sidecar_duration("15us").expect("parse"),
            Duration::from_micros(15)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(from_sidecar_duration("").is_err());
        assert!(from_sidecar_duration("5").is_err());
        assert!(from_sidecar_duration("h").is_err());
        assert!(from_sidecar_duration("1d").is_err());
    }

    #[test]
    fn test_round_trip() {
        let duration = Duration::from_secs(90) + Duration::from_millis(250);
        let literal = to_sidecar_duration(duration);
        assert_eq!(from_sidecar_duration(&literal).expect("parse"), duration);
    }

    #[test]
    fn test_option_adapter_round_trip() {
        use serde::{Deserialize, Serialize};

        #[derive(Serialize, Deserialize, PartialEq, Debug)]
        struct Probe {
            #[serde(
                with = "sidecar_duration_opt",
                skip_serializing_if = "Option::is_none",
                default
            )]
            ttl: Option<Duration>,
        }

        let some = Probe {
            ttl: Some(Duration::from_secs(9)),
        };
        let json = serde_json::to_string(&some).expect("serialize");
        assert_eq!(json, r#"{"ttl":"0h0m9s0ms0μs"}"#);
        assert_eq!(
            serde_json::from_str::<Probe>(&json).expect("deserialize"),
            some
        );

        let none = Probe { ttl: None };
        assert_eq!(serde_json::to_string(&none).expect("serialize"), "{}");
    }
}
