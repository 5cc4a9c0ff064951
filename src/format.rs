use crate::error::CompileError;
use crate::part::{Part, ALL};
use crate::pattern::{parse_segment_tree, SegNode};
use crate::version::VersionInfo;

/// Rendered part values, ordered longest-token-first so that substitution
/// never clobbers a longer token with a shorter one (`YYYY` before `YY`).
type PartValues = Vec<(&'static Part, String)>;

fn part_values(vinfo: &VersionInfo) -> PartValues {
    ALL.iter()
        .filter_map(|part| part.format_value(vinfo).map(|value| (part, value)))
        .collect()
}

#[derive(Debug)]
struct FormattedSeg {
    is_literal: bool,
    is_zero: bool,
    result: String,
}

fn format_segment(seg: &str, part_values: &PartValues) -> FormattedSeg {
    let mut used: Vec<(&'static str, &str)> = Vec::new();
    let mut zero_count = 0;

    for (part, value) in part_values {
        if seg.contains(part.token) {
            used.push((part.token, value.as_str()));
            if part.is_zero_value(value) {
                zero_count += 1;
            }
        }
    }

    let mut result = seg.replace(r"\[", "[").replace(r"\]", "]");
    for (token, value) in &used {
        result = result.replace(token, value);
    }

    if used.is_empty() {
        // a pure literal (typically a prefix or suffix), output as is
        FormattedSeg {
            is_literal: true,
            is_zero: false,
            result,
        }
    } else {
        FormattedSeg {
            is_literal: false,
            is_zero: zero_count > 0 && zero_count == used.len(),
            result,
        }
    }
}

fn format_group(children: &[SegNode], part_values: &PartValues) -> FormattedSeg {
    let mut formatted: Vec<(bool, FormattedSeg)> = children
        .iter()
        .map(|child| match child {
            SegNode::Literal(text) => (false, format_segment(text, part_values)),
            SegNode::Group(grandchildren) => (true, format_group(grandchildren, part_values)),
        })
        .collect();

    // Scanning right to left, a trailing run of all-zero optional groups is
    // dropped; once any non-zero segment appears, everything to its left is
    // kept even if individually zero. Literal-only segments never count.
    let mut has_value_to_right = false;
    for (is_group, seg) in formatted.iter_mut().rev() {
        if seg.is_literal {
            continue;
        }
        if *is_group && seg.is_zero && !has_value_to_right {
            seg.result.clear();
        } else if !seg.is_zero {
            has_value_to_right = true;
        }
    }

    let is_zero = formatted
        .iter()
        .filter(|(_, seg)| !seg.is_literal)
        .all(|(_, seg)| seg.is_zero);
    let result = formatted.into_iter().map(|(_, seg)| seg.result).collect();

    FormattedSeg {
        is_literal: false,
        is_zero,
        result,
    }
}

/// Renders `vinfo` as a version string under `raw_pattern`.
///
/// Optional `[...]` groups whose parts all render to their "zero" value
/// (`0` for counters, `final` for the release tag) are elided, right to
/// left. The outermost segment is never elided.
///
/// ```
/// use calbump::{format_version, parse_version_info};
///
/// let vinfo = parse_version_info("v200712.0033-beta", "vYYYY0M.BUILD[-RELEASE]").unwrap();
/// let rendered = format_version(&vinfo, "vYY.BLD[-PYTAGNUM]").unwrap();
/// assert_eq!("v7.33-b0", rendered);
/// ```
pub fn format_version(vinfo: &VersionInfo, raw_pattern: &str) -> Result<String, CompileError> {
    let values = part_values(vinfo);
    let tree = parse_segment_tree(raw_pattern)?;
    Ok(format_group(&tree, &values).result)
}
