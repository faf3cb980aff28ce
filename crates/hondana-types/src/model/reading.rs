use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

pub const MAX_PROGRESS: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadingStatus {
    WantToRead,
    Reading,
    Finished,
}

impl ReadingStatus {
    pub const ALL: [ReadingStatus; 3] = [
        ReadingStatus::WantToRead,
        ReadingStatus::Reading,
        ReadingStatus::Finished,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "want_to_read",
            ReadingStatus::Reading => "reading",
            ReadingStatus::Finished => "finished",
        }
    }
}

impl Display for ReadingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidStatus(pub String);

impl Display for InvalidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invalid reading status: {}", self.0)
    }
}

impl std::error::Error for InvalidStatus {}

impl FromStr for ReadingStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "want_to_read" => Ok(ReadingStatus::WantToRead),
            "reading" => Ok(ReadingStatus::Reading),
            "finished" => Ok(ReadingStatus::Finished),
            other => Err(InvalidStatus(other.to_string())),
        }
    }
}

/// Clamps any requested progress into the 0..=100 percent range
pub fn clamp_progress(value: i64) -> u8 {
    value.clamp(0, MAX_PROGRESS as i64) as u8
}

#[cfg(test)]
mod tests {
    use quickcheck_macros::quickcheck;

    use super::*;

    #[quickcheck]
    fn test_clamp_progress_in_range(value: i64) -> bool {
        clamp_progress(value) <= MAX_PROGRESS
    }

    #[test]
    fn test_clamp_progress_edges() {
        assert_eq!(clamp_progress(150), 100);
        assert_eq!(clamp_progress(-5), 0);
        assert_eq!(clamp_progress(42), 42);
    }

    #[test]
    fn test_status_round_trip_names() {
        for status in ReadingStatus::ALL {
            assert_eq!(status.as_str().parse::<ReadingStatus>().unwrap(), status);
        }
        assert!("paused".parse::<ReadingStatus>().is_err());
        let json = serde_json::to_string(&ReadingStatus::WantToRead).unwrap();
        assert_eq!(json, r#""want_to_read""#);
    }
}
