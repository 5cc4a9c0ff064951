use std::collections::HashMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::Datelike;

use crate::calendar::{self, cal_info, CalendarInfo};
use crate::error::ParseError;
use crate::part::Field;
use crate::pattern::{compile_pattern, Pattern};

/// A release tag, ordered from least to most mature.
///
/// Each tag has a long name (what `RELEASE` renders) and a PEP 440 short code
/// (what `PYTAG` renders); the two spellings convert losslessly in both
/// directions. `Final` is the default and renders as the empty short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReleaseTag {
    /// `alpha` / `a`
    Alpha,
    /// `beta` / `b`
    Beta,
    /// `dev` / `dev`
    Dev,
    /// `rc` / `rc`
    Rc,
    /// `post` / `post`
    Post,
    /// `final`, rendered as the empty PEP 440 code. The default.
    #[default]
    Final,
}

impl ReleaseTag {
    /// The long spelling, e.g. `beta`.
    pub fn name(self) -> &'static str {
        use ReleaseTag::*;
        match self {
            Alpha => "alpha",
            Beta => "beta",
            Dev => "dev",
            Rc => "rc",
            Post => "post",
            Final => "final",
        }
    }

    /// The PEP 440 short code, e.g. `b`. Empty for `final`.
    pub fn pep440(self) -> &'static str {
        use ReleaseTag::*;
        match self {
            Alpha => "a",
            Beta => "b",
            Dev => "dev",
            Rc => "rc",
            Post => "post",
            Final => "",
        }
    }

    /// Looks a tag up by its long spelling.
    pub fn from_name(name: &str) -> Option<Self> {
        use ReleaseTag::*;
        match name {
            "alpha" => Some(Alpha),
            "beta" => Some(Beta),
            "dev" => Some(Dev),
            "rc" => Some(Rc),
            "post" => Some(Post),
            "final" => Some(Final),
            _ => None,
        }
    }

    /// Looks a tag up by its PEP 440 short code.
    pub fn from_pep440(code: &str) -> Option<Self> {
        use ReleaseTag::*;
        match code {
            "a" => Some(Alpha),
            "b" => Some(Beta),
            "dev" => Some(Dev),
            "rc" => Some(Rc),
            "post" => Some(Post),
            "" => Some(Final),
            _ => None,
        }
    }

    /// All long spellings, for CLI help and validation messages.
    pub fn names() -> [&'static str; 6] {
        ["alpha", "beta", "dev", "rc", "post", "final"]
    }
}

impl Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReleaseTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            format!(
                "unknown release tag `{s}`, expected one of: {}",
                Self::names().join(", ")
            )
        })
    }
}

/// The normalized, fully-parsed representation of a version string.
///
/// A `VersionInfo` is an immutable value: operations that "change" it build a
/// new one via struct-update syntax, never mutate fields in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    /// Gregorian year, full four digits.
    pub year_y: Option<i32>,
    /// ISO 8601 week-numbering year.
    pub year_g: Option<i32>,
    /// Quarter, 1-4.
    pub quarter: Option<i32>,
    /// Month, 1-12.
    pub month: Option<i32>,
    /// Day of the month.
    pub dom: Option<i32>,
    /// Day of the year, 1-366.
    pub doy: Option<i32>,
    /// Week of the year, Monday start.
    pub week_w: Option<i32>,
    /// Week of the year, Sunday start.
    pub week_u: Option<i32>,
    /// ISO 8601 week of the year.
    pub week_v: Option<i32>,
    /// Semantic major version.
    pub major: u32,
    /// Semantic minor version.
    pub minor: u32,
    /// Semantic patch version.
    pub patch: u32,
    /// Release sequence number within a tag track.
    pub num: u32,
    /// Zero-based auto increment.
    pub inc0: u32,
    /// One-based auto increment.
    pub inc1: u32,
    /// Build id: a monotonically increasing numeric string, kept at or above
    /// 1000 when incrementing so rendered widths never lose leading zeros.
    pub bid: String,
    /// Release tag. `PYTAG` output derives from this via [`ReleaseTag::pep440`].
    pub tag: ReleaseTag,
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self {
            year_y: None,
            year_g: None,
            quarter: None,
            month: None,
            dom: None,
            doy: None,
            week_w: None,
            week_u: None,
            week_v: None,
            major: 0,
            minor: 0,
            patch: 0,
            num: 0,
            inc0: 0,
            inc1: 1,
            bid: "1000".to_string(),
            tag: ReleaseTag::Final,
        }
    }
}

impl VersionInfo {
    /// The calendar slice of this version.
    pub fn calendar(&self) -> CalendarInfo {
        CalendarInfo {
            year_y: self.year_y,
            year_g: self.year_g,
            quarter: self.quarter,
            month: self.month,
            dom: self.dom,
            doy: self.doy,
            week_w: self.week_w,
            week_u: self.week_u,
            week_v: self.week_v,
        }
    }

    /// A copy with every calendar field replaced wholesale by `cinfo`.
    pub fn with_calendar(&self, cinfo: &CalendarInfo) -> Self {
        Self {
            year_y: cinfo.year_y,
            year_g: cinfo.year_g,
            quarter: cinfo.quarter,
            month: cinfo.month,
            dom: cinfo.dom,
            doy: cinfo.doy,
            week_w: cinfo.week_w,
            week_u: cinfo.week_u,
            week_v: cinfo.week_v,
            ..self.clone()
        }
    }

    pub(crate) fn parse(version_str: &str, pattern: &Pattern) -> Result<Self, ParseError> {
        let captures = pattern.regexp.captures(version_str).ok_or_else(|| {
            ParseError::VersionPatternMismatch {
                version: version_str.to_string(),
                pattern: pattern.raw().to_string(),
            }
        })?;

        let whole = match captures.get(0) {
            Some(whole) => whole,
            None => unreachable!("capture group 0 is the whole match"),
        };
        if whole.end() < version_str.len() {
            return Err(ParseError::IncompleteMatch {
                matched: whole.as_str().to_string(),
                version: version_str.to_string(),
                pattern: pattern.raw().to_string(),
            });
        }

        let mut field_values: HashMap<Field, &str> = HashMap::new();
        for part in &pattern.parts {
            if let Some(group) = captures.name(part.field.group_name()) {
                field_values.insert(part.field, group.as_str());
            }
        }
        Self::from_field_values(&field_values)
    }

    /// Builds a normalized `VersionInfo` from raw per-field match strings.
    ///
    /// A concrete date is authoritative: once year plus day-of-year, or year
    /// plus month plus day, reconstruct one, every calendar field is derived
    /// from it and independently supplied values are discarded.
    pub(crate) fn from_field_values(
        field_values: &HashMap<Field, &str>,
    ) -> Result<Self, ParseError> {
        let int_of = |field: Field| -> Option<i32> {
            field_values.get(&field).and_then(|s| s.parse().ok())
        };
        // years below 1000 come from two-digit parts; move them to this era
        let year_of = |field: Field| int_of(field).map(|y| if y < 1000 { y + 2000 } else { y });

        let tag = match (field_values.get(&Field::Tag), field_values.get(&Field::PyTag)) {
            (Some(name), _) => ReleaseTag::from_name(name),
            (None, Some(code)) => ReleaseTag::from_pep440(code),
            (None, None) => Some(ReleaseTag::Final),
        }
        .unwrap_or_default();

        let mut year_y = year_of(Field::YearY);
        let mut year_g = year_of(Field::YearG);
        let mut month = int_of(Field::Month);
        let mut dom = int_of(Field::Dom);
        let mut doy = int_of(Field::Doy);
        let mut week_w = int_of(Field::WeekW);
        let mut week_u = int_of(Field::WeekU);
        let mut week_v = int_of(Field::WeekV);

        let mut date = None;
        if let (Some(year), Some(ordinal)) = (year_y.filter(|&y| y != 0), doy.filter(|&d| d != 0))
        {
            let from_doy = calendar::date_from_doy(year, ordinal)?;
            month = Some(from_doy.month() as i32);
            dom = Some(from_doy.day() as i32);
        }
        if let (Some(year), Some(m), Some(d)) = (
            year_y.filter(|&y| y != 0),
            month.filter(|&m| m != 0),
            dom.filter(|&d| d != 0),
        ) {
            date = Some(calendar::date_from_ymd(year, m, d)?);
        }

        if let Some(date) = date {
            let cinfo = cal_info(Some(date));
            year_y = cinfo.year_y;
            year_g = cinfo.year_g;
            month = cinfo.month;
            dom = cinfo.dom;
            doy = cinfo.doy;
            week_w = cinfo.week_w;
            week_u = cinfo.week_u;
            week_v = cinfo.week_v;
        }

        let quarter = int_of(Field::Quarter)
            .or_else(|| month.filter(|&m| m != 0).map(calendar::quarter_from_month));

        let uint_or = |field: Field, default: u32| -> u32 {
            field_values
                .get(&field)
                .and_then(|s| s.parse().ok())
                .unwrap_or(default)
        };

        Ok(Self {
            year_y,
            year_g,
            quarter,
            month,
            dom,
            doy,
            week_w,
            week_u,
            week_v,
            major: uint_or(Field::Major, 0),
            minor: uint_or(Field::Minor, 0),
            patch: uint_or(Field::Patch, 0),
            num: uint_or(Field::Num, 0),
            inc0: uint_or(Field::Inc0, 0),
            inc1: uint_or(Field::Inc1, 1),
            bid: field_values
                .get(&Field::Bid)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "1000".to_string()),
            tag,
        })
    }
}

/// Parses a version string against a raw pattern.
///
/// ```
/// use calbump::{parse_version_info, ReleaseTag};
///
/// let vinfo = parse_version_info("v201712.0033-beta", "vYYYY0M.BUILD[-RELEASE]").unwrap();
/// assert_eq!(Some(2017), vinfo.year_y);
/// assert_eq!(Some(12), vinfo.month);
/// assert_eq!("0033", vinfo.bid);
/// assert_eq!(ReleaseTag::Beta, vinfo.tag);
/// ```
pub fn parse_version_info(version_str: &str, raw_pattern: &str) -> Result<VersionInfo, ParseError> {
    let pattern = compile_pattern(raw_pattern)?;
    pattern.parse_version(version_str)
}

/// Checks whether a version string fully matches a raw pattern.
///
/// ```
/// use calbump::is_valid;
///
/// assert!(is_valid("v201712.0033-beta", "vYYYY0M.BUILD[-RELEASE[NUM]]"));
/// assert!(is_valid("1.2.3", "MAJOR.MINOR.PATCH"));
/// assert!(!is_valid("v201712.0033-beta", "MAJOR.MINOR.PATCH"));
/// ```
pub fn is_valid(version_str: &str, raw_pattern: &str) -> bool {
    parse_version_info(version_str, raw_pattern).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DateError;

    fn fields(entries: &[(Field, &'static str)]) -> HashMap<Field, &'static str> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_from_field_values_quarter_and_defaults() {
        let vinfo = VersionInfo::from_field_values(&fields(&[
            (Field::YearY, "2018"),
            (Field::Month, "11"),
            (Field::Bid, "0099"),
        ]))
        .unwrap();
        assert_eq!(Some(2018), vinfo.year_y);
        assert_eq!(Some(11), vinfo.month);
        assert_eq!(Some(4), vinfo.quarter);
        assert_eq!("0099", vinfo.bid);
        assert_eq!(ReleaseTag::Final, vinfo.tag);
    }

    #[test]
    fn test_from_field_values_doy_derives_month_and_dom() {
        let vinfo = VersionInfo::from_field_values(&fields(&[
            (Field::YearY, "2018"),
            (Field::Doy, "11"),
            (Field::Tag, "beta"),
        ]))
        .unwrap();
        assert_eq!(Some(1), vinfo.month);
        assert_eq!(Some(11), vinfo.dom);
        assert_eq!(Some(11), vinfo.doy);
        assert_eq!(ReleaseTag::Beta, vinfo.tag);
    }

    #[test]
    fn test_from_field_values_full_date_is_authoritative() {
        // week fields are recomputed from the concrete date, overriding input
        let vinfo = VersionInfo::from_field_values(&fields(&[
            (Field::YearY, "2021"),
            (Field::Month, "01"),
            (Field::Dom, "03"),
            (Field::WeekW, "27"),
        ]))
        .unwrap();
        assert_eq!(Some(1), vinfo.quarter);
        assert_eq!(Some(3), vinfo.doy);
        assert_eq!(Some(0), vinfo.week_w);
        assert_eq!(Some(1), vinfo.week_u);
        assert_eq!(Some(53), vinfo.week_v);
        assert_eq!(Some(2020), vinfo.year_g);
    }

    #[test]
    fn test_from_field_values_invalid_date() {
        let result = VersionInfo::from_field_values(&fields(&[
            (Field::YearY, "2019"),
            (Field::Doy, "366"),
        ]));
        assert_eq!(
            Err(ParseError::Date(DateError::InvalidDayOfYear {
                year: 2019,
                doy: 366
            })),
            result
        );
    }

    #[test]
    fn test_from_field_values_two_digit_year_normalized() {
        let vinfo =
            VersionInfo::from_field_values(&fields(&[(Field::YearY, "7")])).unwrap();
        assert_eq!(Some(2007), vinfo.year_y);
    }

    #[test]
    fn test_parse_simple_calver() {
        let vinfo = parse_version_info("v201712.0033-beta", "vYYYY0M.BUILD[-RELEASE]").unwrap();
        assert_eq!(Some(2017), vinfo.year_y);
        assert_eq!(Some(12), vinfo.month);
        assert_eq!(Some(4), vinfo.quarter);
        assert_eq!("0033", vinfo.bid);
        assert_eq!(ReleaseTag::Beta, vinfo.tag);

        let vinfo = parse_version_info("v201712.0033", "vYYYY0M.BUILD[-RELEASE]").unwrap();
        assert_eq!(ReleaseTag::Final, vinfo.tag);
    }

    #[test]
    fn test_parse_pytag_num() {
        let vinfo = parse_version_info("201712.33b0", "YYYY0M.BLD[PYTAGNUM]").unwrap();
        assert_eq!("33", vinfo.bid);
        assert_eq!(ReleaseTag::Beta, vinfo.tag);
        assert_eq!(0, vinfo.num);
    }

    #[test]
    fn test_parse_semver() {
        let vinfo = parse_version_info("1.23.456", "MAJOR.MINOR.PATCH").unwrap();
        assert_eq!((1, 23, 456), (vinfo.major, vinfo.minor, vinfo.patch));

        let vinfo = parse_version_info("1.023.0045", "MAJOR.MINOR.PATCH").unwrap();
        assert_eq!((1, 23, 45), (vinfo.major, vinfo.minor, vinfo.patch));
    }

    #[test]
    fn test_parse_rejects_mismatch() {
        assert!(matches!(
            parse_version_info("v201712.0033-beta", "MAJOR.MINOR.PATCH"),
            Err(ParseError::VersionPatternMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_rejects_prefix_match() {
        // the pattern matches a prefix, but trailing garbage must fail
        assert!(matches!(
            parse_version_info("1.2.3junk", "MAJOR.MINOR.PATCH"),
            Err(ParseError::IncompleteMatch { .. })
        ));
    }

    #[test]
    fn test_parse_optional_groups_absent() {
        let vinfo =
            parse_version_info("v1.0.0", "vMAJOR[.MINOR[.PATCH[-RELEASE[NUM]]]]").unwrap();
        assert_eq!((1, 0, 0), (vinfo.major, vinfo.minor, vinfo.patch));
        assert_eq!(ReleaseTag::Final, vinfo.tag);

        let vinfo = parse_version_info("v1", "vMAJOR[.MINOR[.PATCH[-RELEASE[NUM]]]]").unwrap();
        assert_eq!((1, 0, 0), (vinfo.major, vinfo.minor, vinfo.patch));
    }

    #[test]
    fn test_parse_week_variants() {
        // WW is width-flexible and rejects zero padding; 0V requires it
        let vinfo = parse_version_info("v2021w2.1001", "vYYYYwWW.BUILD").unwrap();
        assert_eq!(Some(2), vinfo.week_w);
        let vinfo = parse_version_info("v2021w02.1001", "vGGGGw0V.BUILD").unwrap();
        assert_eq!(Some(2), vinfo.week_v);
        assert_eq!(Some(2021), vinfo.year_g);
    }

    #[test]
    fn test_release_tag_round_trip() {
        for name in ReleaseTag::names() {
            let tag = ReleaseTag::from_name(name).unwrap();
            assert_eq!(name, tag.name());
            assert_eq!(Some(tag), ReleaseTag::from_pep440(tag.pep440()));
        }
        assert!(ReleaseTag::from_name("gamma").is_none());
    }

    #[test]
    fn test_with_calendar_replaces_wholesale() {
        let vinfo = parse_version_info("v201712.0033", "vYYYY0M.BUILD").unwrap();
        let cinfo = cal_info(chrono::NaiveDate::from_ymd_opt(2020, 2, 29));
        let updated = vinfo.with_calendar(&cinfo);
        assert_eq!(Some(2020), updated.year_y);
        assert_eq!(Some(60), updated.doy);
        assert_eq!("0033", updated.bid);
    }
}
