use chrono::{Duration, NaiveDate, NaiveDateTime, Utc};

use crate::random::RandomSource;

/// Samples dates and datetimes relative to a fixed session anchor.
///
/// The anchor pins "now" for the whole session so that age reconciliation and
/// admission/discharge windows stay mutually consistent even across a
/// midnight boundary during a long run.
#[derive(Debug, Clone, Copy)]
pub struct DateSampler {
    now: NaiveDateTime,
}

impl DateSampler {
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    pub fn from_wall_clock() -> Self {
        Self::new(Utc::now().naive_utc())
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date()
    }

    /// Uniform date in `[from, to]`, sampled over epoch days.
    pub fn date_between(
        &self,
        rng: &mut RandomSource,
        from: NaiveDate,
        to: NaiveDate,
    ) -> NaiveDate {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
        let lo = (from - epoch).num_days();
        let hi = (to - epoch).num_days();
        epoch + Duration::days(rng.next_long(lo.min(hi), lo.max(hi)))
    }

    /// Uniform datetime in `[from, to]`, sampled over whole seconds.
    pub fn datetime_between(
        &self,
        rng: &mut RandomSource,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> NaiveDateTime {
        let lo = from.and_utc().timestamp();
        let hi = to.and_utc().timestamp();
        let at = rng.next_long(lo.min(hi), lo.max(hi));
        chrono::DateTime::from_timestamp(at, 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or(from)
    }

    /// A date at most `max_years_earlier` years before the anchor, strictly
    /// in the past.
    pub fn date_in_past(&self, rng: &mut RandomSource, max_years_earlier: u32) -> NaiveDate {
        let latest = (self.now - Duration::seconds(1)).date();
        let earliest = shift_years(latest, -(max_years_earlier as i32));
        self.date_between(rng, earliest, latest)
    }

    /// A datetime between the anchor and `months` months ahead of it.
    pub fn datetime_in_future_months(&self, rng: &mut RandomSource, months: u32) -> NaiveDateTime {
        let until = self
            .now
            .checked_add_months(chrono::Months::new(months))
            .unwrap_or(self.now);
        self.datetime_between(rng, self.now, until)
    }
}

/// `date` shifted by `years`, clamping Feb 29 to Feb 28 when the target year
/// is not a leap year.
pub fn shift_years(date: NaiveDate, years: i32) -> NaiveDate {
    use chrono::Datelike;
    let year = date.year() + years;
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), 28))
        .unwrap_or(date)
}

/// Whole years elapsed between `from` and `to`, the way an age is counted.
pub fn years_between(from: NaiveDate, to: NaiveDate) -> i32 {
    use chrono::Datelike;
    let mut years = to.year() - from.year();
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn years_between_counts_completed_years() {
        assert_eq!(years_between(date(1990, 6, 15), date(2020, 6, 15)), 30);
        assert_eq!(years_between(date(1990, 6, 15), date(2020, 6, 14)), 29);
        assert_eq!(years_between(date(1990, 6, 15), date(2020, 6, 16)), 30);
    }

    #[test]
    fn shift_years_clamps_leap_day() {
        assert_eq!(shift_years(date(2020, 2, 29), 1), date(2021, 2, 28));
        assert_eq!(shift_years(date(2020, 2, 29), 4), date(2024, 2, 29));
    }

    #[test]
    fn date_between_stays_in_bounds() {
        let sampler = DateSampler::new(date(2024, 1, 1).and_hms_opt(12, 0, 0).unwrap());
        let mut rng = RandomSource::from_seed(9);
        for _ in 0..100 {
            let picked = sampler.date_between(&mut rng, date(2000, 1, 1), date(2010, 12, 31));
            assert!(picked >= date(2000, 1, 1) && picked <= date(2010, 12, 31));
        }
    }

    #[test]
    fn date_in_past_is_strictly_before_anchor() {
        let sampler = DateSampler::new(date(2024, 5, 20).and_hms_opt(0, 0, 0).unwrap());
        let mut rng = RandomSource::from_seed(2);
        for _ in 0..100 {
            assert!(sampler.date_in_past(&mut rng, 10) < date(2024, 5, 20));
        }
    }
}
