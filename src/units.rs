//! Rate and delay values parsed from CLI strings.
//!
//! The experiment drivers take link parameters in the `0.5Mbps` / `5ms`
//! notation; these newtypes carry the parsed value and keep the original
//! notation printable for the summary line.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::sim::SimTime;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitParseError {
    #[error("invalid data rate {0:?}: expected e.g. 0.5Mbps, 64Kbps, 1000bps")]
    DataRate(String),
    #[error("invalid delay {0:?}: expected e.g. 5ms, 200us, 1s")]
    Delay(String),
}

/// Link or application data rate in bits per second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DataRate(pub u64);

impl DataRate {
    pub fn from_mbps(mbps: u64) -> DataRate {
        DataRate(mbps.saturating_mul(1_000_000))
    }

    pub fn bps(self) -> u64 {
        self.0
    }
}

impl FromStr for DataRate {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let (num, scale) = if let Some(v) = t.strip_suffix("Gbps") {
            (v, 1e9)
        } else if let Some(v) = t.strip_suffix("Mbps") {
            (v, 1e6)
        } else if let Some(v) = t.strip_suffix("Kbps") {
            (v, 1e3)
        } else if let Some(v) = t.strip_suffix("bps") {
            (v, 1.0)
        } else {
            return Err(UnitParseError::DataRate(s.to_string()));
        };
        let v: f64 = num
            .trim()
            .parse()
            .map_err(|_| UnitParseError::DataRate(s.to_string()))?;
        if !(v >= 0.0) {
            return Err(UnitParseError::DataRate(s.to_string()));
        }
        Ok(DataRate((v * scale).round() as u64))
    }
}

impl fmt::Display for DataRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bps = self.0;
        if bps >= 1_000_000 && bps % 100_000 == 0 {
            // 0.5Mbps prints back as 0.5Mbps, 1Mbps as 1Mbps
            let mbps = bps as f64 / 1e6;
            if mbps.fract() == 0.0 {
                write!(f, "{}Mbps", mbps as u64)
            } else {
                write!(f, "{mbps}Mbps")
            }
        } else if bps >= 100_000 {
            write!(f, "{}Mbps", bps as f64 / 1e6)
        } else if bps >= 1_000 && bps % 1_000 == 0 {
            write!(f, "{}Kbps", bps / 1_000)
        } else {
            write!(f, "{bps}bps")
        }
    }
}

/// Propagation delay parsed from `5ms` style notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Delay(pub SimTime);

impl Delay {
    pub fn time(self) -> SimTime {
        self.0
    }
}

impl FromStr for Delay {
    type Err = UnitParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        // 顺序很重要：先匹配更长的后缀（ms/us 先于 s）
        let (num, ns_per_unit) = if let Some(v) = t.strip_suffix("ms") {
            (v, 1e6)
        } else if let Some(v) = t.strip_suffix("us") {
            (v, 1e3)
        } else if let Some(v) = t.strip_suffix("ns") {
            (v, 1.0)
        } else if let Some(v) = t.strip_suffix('s') {
            (v, 1e9)
        } else {
            return Err(UnitParseError::Delay(s.to_string()));
        };
        let v: f64 = num
            .trim()
            .parse()
            .map_err(|_| UnitParseError::Delay(s.to_string()))?;
        if !(v >= 0.0) {
            return Err(UnitParseError::Delay(s.to_string()));
        }
        Ok(Delay(SimTime((v * ns_per_unit).round() as u64)))
    }
}

impl fmt::Display for Delay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = self.0.0;
        if ns >= 1_000_000 && ns % 1_000_000 == 0 {
            write!(f, "{}ms", ns / 1_000_000)
        } else if ns >= 1_000 && ns % 1_000 == 0 {
            write!(f, "{}us", ns / 1_000)
        } else {
            write!(f, "{ns}ns")
        }
    }
}
