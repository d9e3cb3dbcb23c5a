// 時刻ヘルパー
//
// Leading2Lean APIに送る記録時刻を、設定されたタイムゾーンの
// `YYYY-MM-DD HH:MM:SS`形式で生成する。

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// APIに送る日時の書式
pub const API_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 現在時刻の取得元（テスト用の抽象化）
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// システム時刻
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// 指定タイムゾーンでのAPI用日時文字列
pub fn format_api_datetime(instant: DateTime<Utc>, time_zone: Tz) -> String {
    instant
        .with_timezone(&time_zone)
        .format(API_DATETIME_FORMAT)
        .to_string()
}

/// 固定時刻を返すClock
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_in_central_daylight_time() {
        // 2026-07-01 17:30:05 UTC = 12:30:05 CDT (UTC-5)
        let instant = Utc.with_ymd_and_hms(2026, 7, 1, 17, 30, 5).unwrap();
        assert_eq!(
            format_api_datetime(instant, chrono_tz::US::Central),
            "2026-07-01 12:30:05"
        );
    }

    #[test]
    fn test_format_in_central_standard_time() {
        // 2026-01-15 06:00:00 UTC = 00:00:00 CST (UTC-6)
        let instant = Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap();
        assert_eq!(
            format_api_datetime(instant, chrono_tz::US::Central),
            "2026-01-15 00:00:00"
        );
    }

    #[test]
    fn test_format_crosses_date_boundary() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 19, 16, 0, 0).unwrap();
        assert_eq!(
            format_api_datetime(instant, chrono_tz::Asia::Tokyo),
            "2026-10-20 01:00:00"
        );
    }

    #[test]
    fn test_system_clock_is_recent() {
        let now = SystemClock.now();
        // 2020年1月1日より後であるべき
        assert!(now.timestamp() > 1577836800);
    }

    #[test]
    fn test_fixed_clock() {
        let instant = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        assert_eq!(FixedClock(instant).now(), instant);
    }
}
