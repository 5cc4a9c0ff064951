use chrono::NaiveDate;

use crate::calendar::{cal_info, CalendarInfo};
use crate::error::IncrError;
use crate::format::format_version;
use crate::lexid::{BuildIdGen, Lexid};
use crate::part::Field;
use crate::pattern::{compile_pattern, Pattern};
use crate::version::{ReleaseTag, VersionInfo};

/// The explicit bumps a caller can request on top of a calendar update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BumpFlags {
    /// Increment `major`; resets `minor` and `patch`.
    pub major: bool,
    /// Increment `minor`; resets `patch`.
    pub minor: bool,
    /// Increment `patch`.
    pub patch: bool,
    /// Switch to this release tag. A tag different from the current one
    /// restarts `num` at zero.
    pub release: Option<ReleaseTag>,
    /// Increment the release sequence number.
    pub release_num: bool,
}

/// Is `left` newer than `right`, comparing only fields present on both sides?
///
/// The comparison walks fields in declaration order, not calendar magnitude;
/// that tie-break is load-bearing for round-trip expectations and is kept as
/// inherited.
fn is_cal_gt(left: &CalendarInfo, right: &CalendarInfo) -> bool {
    let pairs = [
        (left.year_y, right.year_y),
        (left.year_g, right.year_g),
        (left.quarter, right.quarter),
        (left.month, right.month),
        (left.dom, right.dom),
        (left.doy, right.doy),
        (left.week_w, right.week_w),
        (left.week_u, right.week_u),
        (left.week_v, right.week_v),
    ];

    let mut lvals = Vec::with_capacity(pairs.len());
    let mut rvals = Vec::with_capacity(pairs.len());
    for (lval, rval) in pairs {
        if let (Some(lval), Some(rval)) = (lval, rval) {
            lvals.push(lval);
            rvals.push(rval);
        }
    }
    lvals > rvals
}

fn initial_value(field: Field) -> Option<u32> {
    match field {
        Field::Major | Field::Minor | Field::Patch | Field::Num | Field::Inc0 => Some(0),
        Field::Inc1 => Some(1),
        _ => None,
    }
}

fn field_eq(a: &VersionInfo, b: &VersionInfo, field: Field) -> bool {
    use Field::*;
    match field {
        YearY => a.year_y == b.year_y,
        YearG => a.year_g == b.year_g,
        Quarter => a.quarter == b.quarter,
        Month => a.month == b.month,
        Dom => a.dom == b.dom,
        Doy => a.doy == b.doy,
        WeekW => a.week_w == b.week_w,
        WeekU => a.week_u == b.week_u,
        WeekV => a.week_v == b.week_v,
        Major => a.major == b.major,
        Minor => a.minor == b.minor,
        Patch => a.patch == b.patch,
        Num => a.num == b.num,
        Inc0 => a.inc0 == b.inc0,
        Inc1 => a.inc1 == b.inc1,
        Bid => a.bid == b.bid,
        Tag | PyTag => a.tag == b.tag,
    }
}

fn with_field(vinfo: VersionInfo, field: Field, value: u32) -> VersionInfo {
    match field {
        Field::Major => VersionInfo { major: value, ..vinfo },
        Field::Minor => VersionInfo { minor: value, ..vinfo },
        Field::Patch => VersionInfo { patch: value, ..vinfo },
        Field::Num => VersionInfo { num: value, ..vinfo },
        Field::Inc0 => VersionInfo { inc0: value, ..vinfo },
        Field::Inc1 => VersionInfo { inc1: value, ..vinfo },
        _ => vinfo,
    }
}

/// Every field sitting to the right of a changed field (in template order)
/// goes back to its initial value. The changed field itself is left alone.
fn apply_reset_cascade(
    pattern: &Pattern,
    old_vinfo: &VersionInfo,
    cur_vinfo: VersionInfo,
) -> (VersionInfo, Vec<Field>) {
    let mut cur_vinfo = cur_vinfo;
    let mut reset_fields = Vec::new();
    let mut has_reset = false;

    for field in pattern.fields() {
        if has_reset {
            if let Some(initial) = initial_value(field) {
                cur_vinfo = with_field(cur_vinfo, field, initial);
                reset_fields.push(field);
            }
        } else if !field_eq(old_vinfo, &cur_vinfo, field) {
            has_reset = true;
        }
    }
    (cur_vinfo, reset_fields)
}

fn incr_numeric(
    cur_vinfo: VersionInfo,
    flags: &BumpFlags,
    reset_fields: &[Field],
    id_gen: &dyn BuildIdGen,
) -> VersionInfo {
    let mut cur = cur_vinfo;

    // a bid below 1000 would lose leading zeros when re-rendered narrower
    if let Ok(bid_int) = cur.bid.parse::<u128>() {
        if bid_int < 1000 {
            cur = VersionInfo {
                bid: (bid_int + 1000).to_string(),
                ..cur
            };
        }
    }
    cur = VersionInfo {
        bid: id_gen.next_id(&cur.bid),
        ..cur
    };

    if !reset_fields.contains(&Field::Inc0) {
        cur = VersionInfo { inc0: cur.inc0 + 1, ..cur };
    }
    if !reset_fields.contains(&Field::Inc1) {
        cur = VersionInfo { inc1: cur.inc1 + 1, ..cur };
    }

    if flags.major {
        cur = VersionInfo {
            major: cur.major + 1,
            minor: 0,
            patch: 0,
            ..cur
        };
    }
    if flags.minor {
        cur = VersionInfo {
            minor: cur.minor + 1,
            patch: 0,
            ..cur
        };
    }
    if flags.patch {
        cur = VersionInfo { patch: cur.patch + 1, ..cur };
    }
    if flags.release_num {
        cur = VersionInfo { num: cur.num + 1, ..cur };
    }
    if let Some(tag) = flags.release {
        if tag != cur.tag {
            // a fresh release track restarts its counter
            cur = VersionInfo { num: 0, ..cur };
        }
        cur = VersionInfo { tag, ..cur };
    }
    cur
}

/// Like [`incr`], but reports failures as typed errors instead of logging,
/// and takes the build-id generator explicitly.
pub fn try_incr(
    old_version: &str,
    raw_pattern: &str,
    flags: &BumpFlags,
    pin_date: bool,
    date: Option<NaiveDate>,
    id_gen: &dyn BuildIdGen,
) -> Result<String, IncrError> {
    let pattern = compile_pattern(raw_pattern)?;
    let old_vinfo = pattern.parse_version(old_version)?;

    let cur_cinfo = if pin_date {
        old_vinfo.calendar()
    } else {
        cal_info(date)
    };

    let cur_vinfo = if is_cal_gt(&old_vinfo.calendar(), &cur_cinfo) {
        log::warn!("Old version appears to be from the future '{old_version}'");
        old_vinfo.clone()
    } else {
        old_vinfo.with_calendar(&cur_cinfo)
    };

    let (cur_vinfo, reset_fields) = apply_reset_cascade(&pattern, &old_vinfo, cur_vinfo);
    let cur_vinfo = incr_numeric(cur_vinfo, flags, &reset_fields, id_gen);

    let new_version = format_version(&cur_vinfo, raw_pattern)?;
    if new_version == old_version {
        Err(IncrError::NoChange)
    } else {
        Ok(new_version)
    }
}

/// Increments `old_version` under `raw_pattern`.
///
/// Calendar parts move to `date` (or today when `None`, or the version's own
/// embedded date when `pin_date`); any field right of a changed one resets to
/// its initial value; requested bumps apply on top; the build id always
/// advances. Returns `None` when no valid new version can be produced, with
/// the reason logged.
///
/// ```
/// use calbump::{incr, BumpFlags, ReleaseTag};
///
/// let flags = BumpFlags {
///     release: Some(ReleaseTag::Rc),
///     release_num: true,
///     ..BumpFlags::default()
/// };
/// let next = incr(
///     "v1.0.0-rc2",
///     "vMAJOR[.MINOR[.PATCH[-RELEASE[NUM]]]]",
///     &flags,
///     true,
///     None,
/// );
/// assert_eq!(Some("v1.0.0-rc3".to_string()), next);
/// ```
pub fn incr(
    old_version: &str,
    raw_pattern: &str,
    flags: &BumpFlags,
    pin_date: bool,
    date: Option<NaiveDate>,
) -> Option<String> {
    incr_with_id_gen(old_version, raw_pattern, flags, pin_date, date, &Lexid)
}

/// [`incr`] with a caller-supplied build-id generator.
pub fn incr_with_id_gen(
    old_version: &str,
    raw_pattern: &str,
    flags: &BumpFlags,
    pin_date: bool,
    date: Option<NaiveDate>,
    id_gen: &dyn BuildIdGen,
) -> Option<String> {
    match try_incr(old_version, raw_pattern, flags, pin_date, date, id_gen) {
        Ok(new_version) => Some(new_version),
        Err(err) => {
            log::error!("{err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CompileError, ParseError};

    fn date(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(year, month, day)
    }

    fn no_flags() -> BumpFlags {
        BumpFlags::default()
    }

    #[test]
    fn test_incr_advances_release_num() {
        let flags = BumpFlags {
            release: Some(ReleaseTag::Rc),
            release_num: true,
            ..no_flags()
        };
        let next = try_incr(
            "v1.0.0-rc2",
            "vMAJOR[.MINOR[.PATCH[-RELEASE[NUM]]]]",
            &flags,
            true,
            None,
            &Lexid,
        );
        assert_eq!(Ok("v1.0.0-rc3".to_string()), next);
    }

    #[test]
    fn test_incr_semantic_bumps() {
        let pattern = "MAJOR.MINOR.PATCH";
        let cases = [
            (BumpFlags { major: true, ..no_flags() }, "2.0.0"),
            (BumpFlags { minor: true, ..no_flags() }, "1.3.0"),
            (BumpFlags { patch: true, ..no_flags() }, "1.2.4"),
        ];
        for (flags, expected) in cases {
            assert_eq!(
                Ok(expected.to_string()),
                try_incr("1.2.3", pattern, &flags, true, None, &Lexid)
            );
        }
    }

    #[test]
    fn test_incr_calendar_rollover() {
        let next = try_incr(
            "v201712.0033-beta",
            "vYYYY0M.BUILD[-RELEASE]",
            &no_flags(),
            false,
            date(2018, 1, 1),
            &Lexid,
        );
        assert_eq!(Ok("v201801.1034-beta".to_string()), next);
    }

    #[test]
    fn test_incr_rollover_resets_fields_to_the_right() {
        // the year change resets NUM, which sits right of the calendar parts
        let next = try_incr(
            "v201712.1033-beta4",
            "vYYYY0M.BUILD[-RELEASENUM]",
            &no_flags(),
            false,
            date(2018, 1, 1),
            &Lexid,
        );
        assert_eq!(Ok("v201801.1034-beta0".to_string()), next);
    }

    #[test]
    fn test_incr_bump_applies_on_top_of_reset_baseline() {
        let flags = BumpFlags { patch: true, ..no_flags() };
        let next = try_incr(
            "2017.5",
            "YYYY.PATCH",
            &flags,
            false,
            date(2018, 1, 1),
            &Lexid,
        );
        assert_eq!(Ok("2018.1".to_string()), next);
    }

    #[test]
    fn test_incr_future_version_keeps_calendar() {
        // the version carries 2017-12; the requested date is earlier
        let next = try_incr(
            "v201712.0033-beta",
            "vYYYY0M.BUILD[-RELEASE]",
            &no_flags(),
            false,
            date(2017, 11, 1),
            &Lexid,
        );
        assert_eq!(Ok("v201712.1034-beta".to_string()), next);
    }

    #[test]
    fn test_incr_pinned_date_only_advances_bid() {
        let next = try_incr(
            "v201712.0033-beta",
            "vYYYY0M.BUILD[-RELEASE]",
            &no_flags(),
            true,
            None,
            &Lexid,
        );
        assert_eq!(Ok("v201712.1034-beta".to_string()), next);
    }

    #[test]
    fn test_incr_tag_change_restarts_num() {
        let flags = BumpFlags {
            release: Some(ReleaseTag::Beta),
            ..no_flags()
        };
        let next = try_incr(
            "v1.0.0-rc2",
            "vMAJOR[.MINOR[.PATCH[-RELEASE[NUM]]]]",
            &flags,
            true,
            None,
            &Lexid,
        );
        assert_eq!(Ok("v1.0.0-beta".to_string()), next);
    }

    #[test]
    fn test_incr_no_change_is_an_error() {
        // nothing requested, date pinned, no build part: nothing can move
        let result = try_incr("1.2.3", "MAJOR.MINOR.PATCH", &no_flags(), true, None, &Lexid);
        assert_eq!(Err(IncrError::NoChange), result);
        assert_eq!(
            None,
            incr("1.2.3", "MAJOR.MINOR.PATCH", &no_flags(), true, None)
        );
    }

    #[test]
    fn test_incr_rejects_mixed_week_pattern_before_parsing() {
        let result = try_incr(
            "v2021w01.1001",
            "vGGGGwWW.BUILD",
            &no_flags(),
            true,
            None,
            &Lexid,
        );
        assert!(matches!(
            result,
            Err(IncrError::Compile(CompileError::MixedWeekNumbering { .. }))
        ));
        assert_eq!(
            None,
            incr("v2021w01.1001", "vGGGGwWW.BUILD", &no_flags(), true, None)
        );
    }

    #[test]
    fn test_incr_surfaces_parse_failure() {
        let result = try_incr(
            "not-a-version",
            "MAJOR.MINOR.PATCH",
            &no_flags(),
            true,
            None,
            &Lexid,
        );
        assert!(matches!(
            result,
            Err(IncrError::Parse(ParseError::VersionPatternMismatch { .. }))
        ));
    }

    #[test]
    fn test_incr_bid_stays_string_sortable() {
        let first = try_incr(
            "v201712.1033",
            "vYYYY0M.BUILD",
            &no_flags(),
            true,
            None,
            &Lexid,
        )
        .unwrap();
        assert_eq!("v201712.1034", first);

        let second = try_incr(&first, "vYYYY0M.BUILD", &no_flags(), true, None, &Lexid).unwrap();
        // same-width lexicographic order agrees with numeric order
        assert!(second > first);
    }

    #[test]
    fn test_incr_with_custom_id_gen() {
        struct TenGen;
        impl BuildIdGen for TenGen {
            fn next_id(&self, prev_id: &str) -> String {
                let value: u64 = prev_id.parse().unwrap_or(0);
                format!("{}", value + 10)
            }
        }

        let next = incr_with_id_gen(
            "v201712.1033",
            "vYYYY0M.BUILD",
            &no_flags(),
            true,
            None,
            &TenGen,
        );
        assert_eq!(Some("v201712.1043".to_string()), next);
    }
}
