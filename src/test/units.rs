use crate::sim::SimTime;
use crate::units::{DataRate, Delay, UnitParseError};

#[test]
fn data_rate_parses_experiment_notation() {
    assert_eq!("1Mbps".parse::<DataRate>(), Ok(DataRate(1_000_000)));
    assert_eq!("0.5Mbps".parse::<DataRate>(), Ok(DataRate(500_000)));
    assert_eq!("5Mbps".parse::<DataRate>(), Ok(DataRate(5_000_000)));
    assert_eq!("64Kbps".parse::<DataRate>(), Ok(DataRate(64_000)));
    assert_eq!("1000bps".parse::<DataRate>(), Ok(DataRate(1_000)));
    assert_eq!("2Gbps".parse::<DataRate>(), Ok(DataRate(2_000_000_000)));
}

#[test]
fn data_rate_rejects_garbage() {
    assert!(matches!(
        "fast".parse::<DataRate>(),
        Err(UnitParseError::DataRate(_))
    ));
    assert!(matches!(
        "Mbps".parse::<DataRate>(),
        Err(UnitParseError::DataRate(_))
    ));
    assert!(matches!(
        "-1Mbps".parse::<DataRate>(),
        Err(UnitParseError::DataRate(_))
    ));
}

#[test]
fn data_rate_display_round_trips_summary_values() {
    // 汇总行里出现的取值要原样打印回来
    assert_eq!(DataRate(500_000).to_string(), "0.5Mbps");
    assert_eq!(DataRate(1_000_000).to_string(), "1Mbps");
    assert_eq!(DataRate(5_000_000).to_string(), "5Mbps");
    assert_eq!(DataRate(64_000).to_string(), "64Kbps");
}

#[test]
fn delay_parses_experiment_notation() {
    assert_eq!("5ms".parse::<Delay>(), Ok(Delay(SimTime::from_millis(5))));
    assert_eq!("200us".parse::<Delay>(), Ok(Delay(SimTime::from_micros(200))));
    assert_eq!("1s".parse::<Delay>(), Ok(Delay(SimTime::from_secs(1))));
    assert_eq!("10ns".parse::<Delay>(), Ok(Delay(SimTime(10))));
    // `ms` 必须先于 `s` 匹配
    assert_eq!("20ms".parse::<Delay>(), Ok(Delay(SimTime::from_millis(20))));
}

#[test]
fn delay_rejects_garbage() {
    assert!(matches!("".parse::<Delay>(), Err(UnitParseError::Delay(_))));
    assert!(matches!("5".parse::<Delay>(), Err(UnitParseError::Delay(_))));
    assert!(matches!(
        "soon".parse::<Delay>(),
        Err(UnitParseError::Delay(_))
    ));
}

#[test]
fn delay_display_round_trips_summary_values() {
    assert_eq!(Delay(SimTime::from_millis(5)).to_string(), "5ms");
    assert_eq!(Delay(SimTime::from_micros(200)).to_string(), "200us");
}
