use chrono::{Datelike, NaiveDate, Utc};

use crate::error::DateError;

/// Every calendar representation of a single date.
///
/// Fields are optional because a [`crate::VersionInfo`] may carry only the
/// subset of them its pattern references. [`cal_info`] always fills all nine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CalendarInfo {
    /// Gregorian year, full four digits.
    pub year_y: Option<i32>,
    /// ISO 8601 week-numbering year (the year `%G` formats to).
    pub year_g: Option<i32>,
    /// Quarter of the year, 1-4.
    pub quarter: Option<i32>,
    /// Month, 1-12.
    pub month: Option<i32>,
    /// Day of the month.
    pub dom: Option<i32>,
    /// Day of the year, 1-366.
    pub doy: Option<i32>,
    /// Week of the year, weeks starting Monday (`%W`).
    pub week_w: Option<i32>,
    /// Week of the year, weeks starting Sunday (`%U`).
    pub week_u: Option<i32>,
    /// ISO 8601 week of the year (`%V`).
    pub week_v: Option<i32>,
}

pub(crate) fn quarter_from_month(month: i32) -> i32 {
    (month - 1) / 3 + 1
}

fn weeks_from_sunday(date: &impl Datelike) -> u32 {
    let days_from_sunday = date.weekday().num_days_from_sunday();
    (6 + date.ordinal() - days_from_sunday) / 7
}

fn weeks_from_monday(date: &impl Datelike) -> u32 {
    let days_from_monday = date.weekday().num_days_from_monday();
    (6 + date.ordinal() - days_from_monday) / 7
}

pub(crate) fn date_from_doy(year: i32, doy: i32) -> Result<NaiveDate, DateError> {
    u32::try_from(doy)
        .ok()
        .and_then(|ordinal| NaiveDate::from_yo_opt(year, ordinal))
        .ok_or(DateError::InvalidDayOfYear { year, doy })
}

pub(crate) fn date_from_ymd(year: i32, month: i32, dom: i32) -> Result<NaiveDate, DateError> {
    match (u32::try_from(month), u32::try_from(dom)) {
        (Ok(month_u), Ok(dom_u)) => NaiveDate::from_ymd_opt(year, month_u, dom_u),
        _ => None,
    }
    .ok_or(DateError::InvalidDate {
        year,
        month,
        day: dom,
    })
}

/// Computes all nine calendar representations of `date`.
///
/// `None` means "today" (UTC).
///
/// ```
/// use calbump::cal_info;
/// use chrono::NaiveDate;
///
/// let info = cal_info(NaiveDate::from_ymd_opt(2019, 1, 5));
/// assert_eq!(info.year_y, Some(2019));
/// assert_eq!(info.doy, Some(5));
/// assert_eq!(info.week_w, Some(0));
/// assert_eq!(info.week_u, Some(0));
/// assert_eq!(info.week_v, Some(1));
/// ```
pub fn cal_info(date: Option<NaiveDate>) -> CalendarInfo {
    let date = date.unwrap_or_else(|| Utc::now().date_naive());
    let iso_week = date.iso_week();

    CalendarInfo {
        year_y: Some(date.year()),
        year_g: Some(iso_week.year()),
        quarter: Some(quarter_from_month(date.month() as i32)),
        month: Some(date.month() as i32),
        dom: Some(date.day() as i32),
        doy: Some(date.ordinal() as i32),
        week_w: Some(weeks_from_monday(&date) as i32),
        week_u: Some(weeks_from_sunday(&date) as i32),
        week_v: Some(iso_week.week() as i32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[rstest]
    // the first week of January exercises every convention differently
    #[case(ymd(2019, 1, 5), 2019, 1, 5, 0, 0, 1)]
    #[case(ymd(2019, 1, 6), 2019, 1, 6, 0, 1, 1)]
    #[case(ymd(2019, 1, 7), 2019, 1, 7, 1, 1, 2)]
    #[case(ymd(2019, 4, 7), 2019, 2, 97, 13, 14, 14)]
    fn test_cal_info(
        #[case] date: NaiveDate,
        #[case] year_y: i32,
        #[case] quarter: i32,
        #[case] doy: i32,
        #[case] week_w: i32,
        #[case] week_u: i32,
        #[case] week_v: i32,
    ) {
        let info = cal_info(Some(date));
        assert_eq!(Some(year_y), info.year_y);
        assert_eq!(Some(quarter), info.quarter);
        assert_eq!(Some(doy), info.doy);
        assert_eq!(Some(week_w), info.week_w);
        assert_eq!(Some(week_u), info.week_u);
        assert_eq!(Some(week_v), info.week_v);
    }

    #[test]
    fn test_iso_year_straddles_january() {
        // 2021-01-03 is a Sunday that still belongs to ISO week 53 of 2020
        let info = cal_info(Some(ymd(2021, 1, 3)));
        assert_eq!(Some(2021), info.year_y);
        assert_eq!(Some(2020), info.year_g);
        assert_eq!(Some(53), info.week_v);
        assert_eq!(Some(0), info.week_w);
        assert_eq!(Some(1), info.week_u);
    }

    #[test]
    fn test_quarters() {
        let quarters: Vec<i32> = (1..=12).map(quarter_from_month).collect();
        assert_eq!(vec![1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4], quarters);
    }

    #[test]
    fn test_date_from_doy() {
        assert_eq!(Ok(ymd(2018, 1, 11)), date_from_doy(2018, 11));
        assert_eq!(Ok(ymd(2018, 6, 15)), date_from_doy(2018, 166));
        assert_eq!(Ok(ymd(2020, 12, 31)), date_from_doy(2020, 366));
        assert_eq!(
            Err(DateError::InvalidDayOfYear { year: 2019, doy: 366 }),
            date_from_doy(2019, 366)
        );
    }

    #[test]
    fn test_date_from_ymd() {
        assert_eq!(Ok(ymd(2021, 2, 3)), date_from_ymd(2021, 2, 3));
        assert_eq!(
            Err(DateError::InvalidDate { year: 2021, month: 2, day: 30 }),
            date_from_ymd(2021, 2, 30)
        );
        assert_eq!(
            Err(DateError::InvalidDate { year: 2021, month: 13, day: 1 }),
            date_from_ymd(2021, 13, 1)
        );
    }
}
