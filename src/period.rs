use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Aggregation bucket width selected in the date navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Period {
    #[default]
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    pub fn as_str(self) -> &'static str {
        match self {
            Period::Daily => "DAILY",
            Period::Weekly => "WEEKLY",
            Period::Monthly => "MONTHLY",
        }
    }
}

/// Inclusive calendar interval resolved from an anchor date and a period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateInterval {
    /// Pure resolution: daily is the anchor itself, weekly is the ISO week
    /// (Monday through Sunday) containing the anchor, monthly is the
    /// anchor's calendar month.
    pub fn resolve(anchor: NaiveDate, period: Period) -> Self {
        match period {
            Period::Daily => Self {
                start: anchor,
                end: anchor,
            },
            Period::Weekly => {
                let start = week_start(anchor);
                Self {
                    start,
                    end: start + Duration::days(6),
                }
            }
            Period::Monthly => {
                let start = anchor.with_day(1).unwrap_or(anchor);
                Self {
                    start,
                    end: month_end(start),
                }
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Non-strict overlap against another inclusive range, e.g. a risk
    /// document's management period.
    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        start <= self.end && end >= self.start
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start.iter_days().take_while(|d| *d <= self.end)
    }

    pub fn label(&self) -> String {
        if self.start == self.end {
            self.start.to_string()
        } else {
            format!("{} ~ {}", self.start, self.end)
        }
    }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn month_end(first_of_month: NaiveDate) -> NaiveDate {
    let next = if first_of_month.month() == 12 {
        NaiveDate::from_ymd_opt(first_of_month.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first_of_month.year(), first_of_month.month() + 1, 1)
    };
    next.unwrap_or(first_of_month) - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_interval_is_the_anchor() {
        let anchor = date(2025, 12, 19);
        let interval = DateInterval::resolve(anchor, Period::Daily);
        assert_eq!(interval.start, anchor);
        assert_eq!(interval.end, anchor);
    }

    #[test]
    fn anchor_always_inside_its_own_interval() {
        let anchors = [
            date(2025, 1, 1),
            date(2025, 12, 31),
            date(2024, 2, 29),
            date(2025, 6, 15),
        ];
        for anchor in anchors {
            for period in [Period::Daily, Period::Weekly, Period::Monthly] {
                let interval = DateInterval::resolve(anchor, period);
                assert!(interval.start <= interval.end);
                assert!(interval.contains(anchor), "{anchor} not in {period:?}");
            }
        }
    }

    #[test]
    fn weekly_runs_monday_through_sunday() {
        // 2025-12-19 is a Friday.
        let interval = DateInterval::resolve(date(2025, 12, 19), Period::Weekly);
        assert_eq!(interval.start, date(2025, 12, 15));
        assert_eq!(interval.end, date(2025, 12, 21));
        assert_eq!(interval.start.weekday(), Weekday::Mon);
        assert_eq!(interval.end.weekday(), Weekday::Sun);

        // A Monday anchor starts its own week, a Sunday anchor ends it.
        let monday = DateInterval::resolve(date(2025, 12, 15), Period::Weekly);
        assert_eq!(monday.start, date(2025, 12, 15));
        let sunday = DateInterval::resolve(date(2025, 12, 21), Period::Weekly);
        assert_eq!(sunday.end, date(2025, 12, 21));
        assert_eq!(sunday.start, date(2025, 12, 15));
    }

    #[test]
    fn monthly_covers_the_calendar_month() {
        let interval = DateInterval::resolve(date(2025, 12, 19), Period::Monthly);
        assert_eq!(interval.start, date(2025, 12, 1));
        assert_eq!(interval.end, date(2025, 12, 31));

        let leap = DateInterval::resolve(date(2024, 2, 10), Period::Monthly);
        assert_eq!(leap.end, date(2024, 2, 29));
        let plain = DateInterval::resolve(date(2025, 2, 10), Period::Monthly);
        assert_eq!(plain.end, date(2025, 2, 28));
    }

    #[test]
    fn resolve_is_idempotent() {
        let anchor = date(2025, 7, 31);
        let a = DateInterval::resolve(anchor, Period::Monthly);
        let b = DateInterval::resolve(anchor, Period::Monthly);
        assert_eq!(a, b);
    }

    #[test]
    fn overlap_is_non_strict() {
        let interval = DateInterval {
            start: date(2025, 12, 25),
            end: date(2025, 12, 26),
        };
        assert!(interval.overlaps(date(2025, 12, 15), date(2025, 12, 25)));
        assert!(!interval.overlaps(date(2025, 12, 27), date(2025, 12, 31)));
    }

    #[test]
    fn days_iterator_covers_every_day_inclusive() {
        let interval = DateInterval::resolve(date(2025, 12, 19), Period::Weekly);
        let days: Vec<_> = interval.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], interval.start);
        assert_eq!(days[6], interval.end);
    }

    #[test]
    fn period_wire_literals() {
        assert_eq!(serde_json::to_string(&Period::Weekly).unwrap(), "\"WEEKLY\"");
        let parsed: Period = serde_json::from_str("\"MONTHLY\"").unwrap();
        assert_eq!(parsed, Period::Monthly);
    }
}
