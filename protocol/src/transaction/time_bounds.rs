//! Transaction validity window.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::xdr::{XdrCodec, XdrError, XdrReader, XdrResult, XdrWriter};

/// Closed window of ledger close times, in Unix seconds, during which a
/// transaction may be applied. A `max_time` of zero means "no upper bound".
///
/// Transactions hold `Option<TimeBounds>`: an absent window is not the same
/// thing as a present window with `max_time == 0`, and the two encode
/// differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeBounds")]
pub struct TimeBounds {
    min_time: u64,
    max_time: u64,
}

#[derive(Deserialize)]
struct RawTimeBounds {
    min_time: u64,
    max_time: u64,
}

impl TryFrom<RawTimeBounds> for TimeBounds {
    type Error = XdrError;

    fn try_from(raw: RawTimeBounds) -> XdrResult<Self> {
        Self::checked(raw.min_time, raw.max_time)
    }
}

impl TimeBounds {
    /// Fails with [`Error::InvalidArgument`] when either bound is negative or
    /// when a non-zero `max_time` does not lie strictly after `min_time`.
    pub fn new(min_time: i64, max_time: i64) -> Result<Self> {
        if min_time < 0 {
            return Err(Error::InvalidArgument(format!(
                "min_time must be non-negative, got {}",
                min_time
            )));
        }
        if max_time < 0 {
            return Err(Error::InvalidArgument(format!(
                "max_time must be non-negative, got {}",
                max_time
            )));
        }
        if max_time != 0 && min_time >= max_time {
            return Err(Error::InvalidArgument(format!(
                "min_time ({}) must be before max_time ({})",
                min_time, max_time
            )));
        }
        Ok(Self {
            min_time: min_time as u64,
            max_time: max_time as u64,
        })
    }

    /// Window opening now-ish (`min_time = 0`) and closing `timeout_secs`
    /// from the current wall-clock time.
    pub fn expires_after(timeout_secs: i64) -> Result<Self> {
        if timeout_secs < 0 {
            return Err(Error::InvalidArgument(format!(
                "timeout must be non-negative, got {}",
                timeout_secs
            )));
        }
        let max_time = Utc::now()
            .timestamp()
            .checked_add(timeout_secs)
            .ok_or_else(|| Error::Overflow(format!("now + {} seconds", timeout_secs)))?;
        Self::new(0, max_time)
    }

    pub fn min_time(&self) -> u64 {
        self.min_time
    }

    pub fn max_time(&self) -> u64 {
        self.max_time
    }

    fn checked(min_time: u64, max_time: u64) -> XdrResult<Self> {
        if max_time != 0 && min_time >= max_time {
            return Err(XdrError::Invalid("time bounds"));
        }
        Ok(Self { min_time, max_time })
    }

    /// Whether the window has an upper bound.
    pub fn is_bounded(&self) -> bool {
        self.max_time != 0
    }
}

impl XdrCodec for TimeBounds {
    fn encode(&self, writer: &mut XdrWriter) -> XdrResult<()> {
        writer.write_u64(self.min_time);
        writer.write_u64(self.max_time);
        Ok(())
    }

    /// An inverted window is rejected. A window that has already closed is
    /// not; validators own that check.
    fn decode(reader: &mut XdrReader<'_>) -> XdrResult<Self> {
        let min_time = reader.read_u64()?;
        let max_time = reader.read_u64()?;
        Self::checked(min_time, max_time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xdr::XdrCodecExt;

    #[test]
    fn valid_window() {
        let tb = TimeBounds::new(0, 100).unwrap();
        assert_eq!(tb.min_time(), 0);
        assert_eq!(tb.max_time(), 100);
        assert!(tb.is_bounded());
    }

    #[test]
    fn negative_bounds_rejected() {
        assert!(matches!(
            TimeBounds::new(-1, 100),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TimeBounds::new(0, -1),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn inverted_window_rejected() {
        assert!(matches!(
            TimeBounds::new(50, 10),
            Err(Error::InvalidArgument(_))
        ));
        assert!(TimeBounds::new(50, 50).is_err());
    }

    #[test]
    fn zero_max_means_unbounded() {
        let tb = TimeBounds::new(50, 0).unwrap();
        assert!(!tb.is_bounded());
    }

    #[test]
    fn expires_after_uses_wall_clock() {
        let before = Utc::now().timestamp() as u64;
        let tb = TimeBounds::expires_after(30).unwrap();
        let after = Utc::now().timestamp() as u64;
        assert_eq!(tb.min_time(), 0);
        assert!(tb.max_time() >= before + 30);
        assert!(tb.max_time() <= after + 30);
    }

    #[test]
    fn expires_after_rejects_bad_timeouts() {
        assert!(matches!(
            TimeBounds::expires_after(-5),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            TimeBounds::expires_after(i64::MAX),
            Err(Error::Overflow(_))
        ));
    }

    #[test]
    fn optional_wrapper_distinguishes_absent_from_zero() {
        let mut absent = XdrWriter::new();
        absent.write_optional::<TimeBounds>(None).unwrap();
        assert_eq!(absent.as_bytes(), &[0, 0, 0, 0]);

        let zero = TimeBounds::new(0, 0).unwrap();
        let mut present = XdrWriter::new();
        present.write_optional(Some(&zero)).unwrap();
        assert_eq!(present.len(), 4 + 16);

        let mut reader = XdrReader::new(absent.as_bytes());
        assert_eq!(reader.read_optional::<TimeBounds>().unwrap(), None);
        let mut reader = XdrReader::new(present.as_bytes());
        assert_eq!(reader.read_optional::<TimeBounds>().unwrap(), Some(zero));
    }

    #[test]
    fn decode_rejects_inverted_window() {
        let mut w = XdrWriter::new();
        w.write_u64(50);
        w.write_u64(10);
        assert!(matches!(
            TimeBounds::from_xdr_bytes(w.as_bytes()),
            Err(XdrError::Invalid("time bounds"))
        ));
        assert!(matches!(
            Error::from(XdrError::Invalid("time bounds")),
            Error::Decode(_)
        ));
    }

    #[test]
    fn decode_accepts_unbounded_window() {
        let mut w = XdrWriter::new();
        w.write_u64(50);
        w.write_u64(0);
        let tb = TimeBounds::from_xdr_bytes(w.as_bytes()).unwrap();
        assert_eq!((tb.min_time(), tb.max_time()), (50, 0));
    }

    #[test]
    fn serde_enforces_window() {
        let err = serde_json::from_str::<TimeBounds>(r#"{"min_time":9,"max_time":3}"#);
        assert!(err.is_err());
        let tb: TimeBounds = serde_json::from_str(r#"{"min_time":3,"max_time":9}"#).unwrap();
        assert_eq!(tb, TimeBounds::new(3, 9).unwrap());
    }

    #[test]
    fn wire_layout_is_two_u64() {
        let bytes = TimeBounds::new(1, 2).unwrap().to_xdr_bytes().unwrap();
        assert_eq!(bytes, vec![0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 0, 2]);
    }
}
