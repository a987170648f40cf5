use crate::SeriesId;
use chrono::{DateTime, NaiveTime, Utc};
use core::time::Duration;

/// Average number of points per series per day, taken from real sensor data.
pub const POINTS_PER_SERIES: usize = 18_000;

/// Server-side expiry attached to every written point.
pub const POINT_TTL: Duration = Duration::from_secs(8 * 24 * 60 * 60);

/// One synthetic sample in transit from the producer to a writer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DataPoint {
    pub series_id: SeriesId,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

impl DataPoint {
    /// The UTC day bucket this point belongs to.
    pub fn day(&self) -> DateTime<Utc> {
        start_of_day(self.timestamp)
    }

    /// Binds the point into the row shape the store persists.
    ///
    /// TTLs beyond `u32::MAX` seconds saturate.
    pub fn into_row(self, ttl: Duration) -> PointRow {
        PointRow {
            series_id: self.series_id,
            day: self.day(),
            timestamp: self.timestamp,
            value: self.value,
            ttl_secs: u32::try_from(ttl.as_secs()).unwrap_or(u32::MAX),
        }
    }
}

/// The bound values of a single point insert.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointRow {
    pub series_id: SeriesId,
    pub day: DateTime<Utc>,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub ttl_secs: u32,
}

/// Truncates `ts` to midnight of its UTC day.
pub fn start_of_day(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.date_naive().and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn start_of_day_drops_time_of_day() {
        let ts = Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 59).unwrap();
        let day = start_of_day(ts);
        assert_eq!(day, Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap());
        assert_eq!(start_of_day(day), day);
    }

    #[test]
    fn row_binds_day_and_ttl() {
        let ts = Utc.with_ymd_and_hms(2024, 6, 1, 5, 0, 1).unwrap();
        let point = DataPoint {
            series_id: SeriesId::from_random(7),
            timestamp: ts,
            value: 0.25,
        };

        let row = point.into_row(POINT_TTL);
        assert_eq!(row.series_id, point.series_id);
        assert_eq!(row.timestamp, ts);
        assert_eq!(row.day.hour(), 0);
        assert_eq!(row.day, start_of_day(ts));
        assert_eq!(row.value, 0.25);
        assert_eq!(row.ttl_secs, 691_200);
    }

    #[test]
    fn oversized_ttl_saturates() {
        let point = DataPoint {
            series_id: SeriesId::from_random(1),
            timestamp: Utc::now(),
            value: 0.0,
        };
        let row = point.into_row(Duration::from_secs(u64::MAX));
        assert_eq!(row.ttl_secs, u32::MAX);
    }
}
