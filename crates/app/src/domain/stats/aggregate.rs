//! Pure aggregation over rows the repository has already fetched.

use std::collections::BTreeMap;

use jiff::{Timestamp, civil::Date, tz::TimeZone};

use crate::domain::stats::records::DateRange;

/// Revenue per UTC calendar day. Days without orders are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesByDate(pub BTreeMap<Date, u64>);

impl SalesByDate {
    /// Bucket `(created_at, total_price)` pairs by UTC date, keeping only
    /// dates inside `range`.
    pub fn from_orders<I>(range: DateRange, orders: I) -> Self
    where
        I: IntoIterator<Item = (Timestamp, u64)>,
    {
        let mut buckets = BTreeMap::new();

        for (created_at, total_price) in orders {
            let date = created_at.to_zoned(TimeZone::UTC).date();

            if !range.contains(date) {
                continue;
            }

            let bucket = buckets.entry(date).or_insert(0_u64);
            *bucket = bucket.saturating_add(total_price);
        }

        Self(buckets)
    }

    #[must_use]
    pub fn get(&self, date: Date) -> Option<u64> {
        self.0.get(&date).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Date, u64)> + '_ {
        self.0.iter().map(|(date, total)| (*date, *total))
    }
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn same_day_orders_share_a_bucket() -> TestResult {
        let range = DateRange {
            start: date(2026, 3, 1),
            end: date(2026, 3, 31),
        };

        let sales = SalesByDate::from_orders(
            range,
            [
                ("2026-03-05T01:00:00Z".parse::<Timestamp>()?, 100_000),
                ("2026-03-05T23:59:59Z".parse::<Timestamp>()?, 250_000),
                ("2026-03-06T00:00:00Z".parse::<Timestamp>()?, 40_000),
            ],
        );

        assert_eq!(sales.len(), 2);
        assert_eq!(sales.get(date(2026, 3, 5)), Some(350_000));
        assert_eq!(sales.get(date(2026, 3, 6)), Some(40_000));
        assert_eq!(sales.get(date(2026, 3, 7)), None);

        Ok(())
    }

    #[test]
    fn orders_outside_range_are_excluded() -> TestResult {
        let range = DateRange {
            start: date(2026, 3, 5),
            end: date(2026, 3, 6),
        };

        let sales = SalesByDate::from_orders(
            range,
            [
                ("2026-03-04T23:59:59Z".parse::<Timestamp>()?, 1),
                ("2026-03-05T00:00:00Z".parse::<Timestamp>()?, 10),
                ("2026-03-06T23:59:59Z".parse::<Timestamp>()?, 100),
                ("2026-03-07T00:00:00Z".parse::<Timestamp>()?, 1_000),
            ],
        );

        let buckets: Vec<(Date, u64)> = sales.iter().collect();

        assert_eq!(
            buckets,
            vec![(date(2026, 3, 5), 10), (date(2026, 3, 6), 100)]
        );

        Ok(())
    }

    #[test]
    fn bucketing_uses_utc_dates() -> TestResult {
        let range = DateRange {
            start: date(2026, 3, 5),
            end: date(2026, 3, 5),
        };

        // 06:30 on the 6th in Ha Noi is still the 5th in UTC.
        let sales = SalesByDate::from_orders(
            range,
            [("2026-03-06T06:30:00+07:00".parse::<Timestamp>()?, 75)],
        );

        assert_eq!(sales.get(date(2026, 3, 5)), Some(75));

        Ok(())
    }

    #[test]
    fn date_range_validity() {
        assert!(
            DateRange {
                start: date(2026, 1, 1),
                end: date(2026, 1, 1),
            }
            .is_valid()
        );

        assert!(
            !DateRange {
                start: date(2026, 1, 2),
                end: date(2026, 1, 1),
            }
            .is_valid()
        );
    }
}
