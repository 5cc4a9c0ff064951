use crate::version::VersionInfo;

/// The version field a part token binds to.
///
/// Also names the capture group the part contributes to a compiled pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    YearY,
    YearG,
    Quarter,
    Month,
    Dom,
    Doy,
    WeekW,
    WeekU,
    WeekV,
    Major,
    Minor,
    Patch,
    Num,
    Inc0,
    Inc1,
    Bid,
    Tag,
    PyTag,
}

impl Field {
    pub(crate) fn group_name(self) -> &'static str {
        use Field::*;
        match self {
            YearY => "year_y",
            YearG => "year_g",
            Quarter => "quarter",
            Month => "month",
            Dom => "dom",
            Doy => "doy",
            WeekW => "week_w",
            WeekU => "week_u",
            WeekV => "week_v",
            Major => "major",
            Minor => "minor",
            Patch => "patch",
            Num => "num",
            Inc0 => "inc0",
            Inc1 => "inc1",
            Bid => "bid",
            Tag => "tag",
            PyTag => "pytag",
        }
    }
}

/// A fixed token recognized inside a raw pattern.
#[derive(Debug)]
pub(crate) struct Part {
    /// The literal token as written in a pattern, e.g. `YYYY`.
    pub(crate) token: &'static str,

    /// The field the token binds to.
    pub(crate) field: Field,

    /// The regex fragment matching this part in a version string.
    pub(crate) sub_pattern: &'static str,

    /// The rendered value considered "absent" for segment elision, if any.
    pub(crate) zero_value: Option<&'static str>,

    /// Renders the bound field of `vinfo` in this part's on-the-wire shape.
    /// `None` when the field is not populated.
    render: fn(&VersionInfo) -> Option<String>,
}

impl Part {
    pub(crate) fn format_value(&self, vinfo: &VersionInfo) -> Option<String> {
        (self.render)(vinfo)
    }

    pub(crate) fn is_zero_value(&self, rendered: &str) -> bool {
        self.zero_value == Some(rendered)
    }

    /// Returns the part whose token starts at the beginning of `rest`,
    /// preferring the longest token (`YYYY` over `YY`, `BUILD` over `BLD`).
    pub(crate) fn match_at(rest: &str) -> Option<&'static Part> {
        ALL.iter().find(|part| rest.starts_with(part.token))
    }
}

fn strip_leading_zeros(bid: &str) -> String {
    let stripped = bid.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// All parts, ordered by token length descending so that a linear scan
/// always yields the longest match first.
pub(crate) static ALL: &[Part] = &[
    Part {
        token: "RELEASE",
        field: Field::Tag,
        sub_pattern: r"alpha|beta|dev|rc|post|final",
        zero_value: Some("final"),
        render: |v| Some(v.tag.name().to_string()),
    },
    Part {
        token: "MAJOR",
        field: Field::Major,
        sub_pattern: r"[0-9]+",
        zero_value: Some("0"),
        render: |v| Some(v.major.to_string()),
    },
    Part {
        token: "MINOR",
        field: Field::Minor,
        sub_pattern: r"[0-9]+",
        zero_value: Some("0"),
        render: |v| Some(v.minor.to_string()),
    },
    Part {
        token: "PATCH",
        field: Field::Patch,
        sub_pattern: r"[0-9]+",
        zero_value: Some("0"),
        render: |v| Some(v.patch.to_string()),
    },
    Part {
        token: "BUILD",
        field: Field::Bid,
        sub_pattern: r"[0-9]{4,}",
        zero_value: None,
        render: |v| Some(v.bid.clone()),
    },
    Part {
        token: "PYTAG",
        field: Field::PyTag,
        sub_pattern: r"a|b|dev|rc|post",
        zero_value: Some(""),
        render: |v| Some(v.tag.pep440().to_string()),
    },
    Part {
        token: "GGGG",
        field: Field::YearG,
        sub_pattern: r"[1-9][0-9]{3}",
        zero_value: None,
        render: |v| v.year_g.map(|y| y.to_string()),
    },
    Part {
        token: "YYYY",
        field: Field::YearY,
        sub_pattern: r"[1-9][0-9]{3}",
        zero_value: None,
        render: |v| v.year_y.map(|y| y.to_string()),
    },
    Part {
        token: "INC0",
        field: Field::Inc0,
        sub_pattern: r"[0-9]+",
        zero_value: Some("0"),
        render: |v| Some(v.inc0.to_string()),
    },
    Part {
        token: "INC1",
        field: Field::Inc1,
        sub_pattern: r"[1-9][0-9]*",
        zero_value: Some("1"),
        render: |v| Some(v.inc1.to_string()),
    },
    Part {
        token: "BLD",
        field: Field::Bid,
        sub_pattern: r"[1-9][0-9]*",
        zero_value: None,
        render: |v| Some(strip_leading_zeros(&v.bid)),
    },
    Part {
        token: "NUM",
        field: Field::Num,
        sub_pattern: r"[0-9]+",
        zero_value: Some("0"),
        render: |v| Some(v.num.to_string()),
    },
    Part {
        token: "JJJ",
        field: Field::Doy,
        sub_pattern: r"36[0-6]|3[0-5][0-9]|[12][0-9][0-9]|[1-9][0-9]|[1-9]",
        zero_value: None,
        render: |v| v.doy.map(|d| d.to_string()),
    },
    Part {
        token: "00J",
        field: Field::Doy,
        sub_pattern: r"36[0-6]|3[0-5][0-9]|[0-2][0-9][0-9]",
        zero_value: None,
        render: |v| v.doy.map(|d| format!("{d:03}")),
    },
    Part {
        token: "YY",
        field: Field::YearY,
        sub_pattern: r"[1-9][0-9]*|0",
        zero_value: None,
        render: |v| v.year_y.map(|y| (y % 100).to_string()),
    },
    Part {
        token: "0Y",
        field: Field::YearY,
        sub_pattern: r"[0-9]{2}",
        zero_value: None,
        render: |v| v.year_y.map(|y| format!("{:02}", y % 100)),
    },
    Part {
        token: "GG",
        field: Field::YearG,
        sub_pattern: r"[1-9][0-9]*|0",
        zero_value: None,
        render: |v| v.year_g.map(|y| (y % 100).to_string()),
    },
    Part {
        token: "0G",
        field: Field::YearG,
        sub_pattern: r"[0-9]{2}",
        zero_value: None,
        render: |v| v.year_g.map(|y| format!("{:02}", y % 100)),
    },
    Part {
        token: "MM",
        field: Field::Month,
        sub_pattern: r"1[0-2]|[1-9]",
        zero_value: None,
        render: |v| v.month.map(|m| m.to_string()),
    },
    Part {
        token: "0M",
        field: Field::Month,
        sub_pattern: r"1[0-2]|0[1-9]",
        zero_value: None,
        render: |v| v.month.map(|m| format!("{m:02}")),
    },
    Part {
        token: "DD",
        field: Field::Dom,
        sub_pattern: r"3[01]|[12][0-9]|[1-9]",
        zero_value: None,
        render: |v| v.dom.map(|d| d.to_string()),
    },
    Part {
        token: "0D",
        field: Field::Dom,
        sub_pattern: r"3[01]|[12][0-9]|0[1-9]",
        zero_value: None,
        render: |v| v.dom.map(|d| format!("{d:02}")),
    },
    Part {
        token: "WW",
        field: Field::WeekW,
        sub_pattern: r"5[0-3]|[1-4][0-9]|[0-9]",
        zero_value: None,
        render: |v| v.week_w.map(|w| w.to_string()),
    },
    Part {
        token: "0W",
        field: Field::WeekW,
        sub_pattern: r"5[0-3]|[0-4][0-9]",
        zero_value: None,
        render: |v| v.week_w.map(|w| format!("{w:02}")),
    },
    Part {
        token: "UU",
        field: Field::WeekU,
        sub_pattern: r"5[0-3]|[1-4][0-9]|[0-9]",
        zero_value: None,
        render: |v| v.week_u.map(|w| w.to_string()),
    },
    Part {
        token: "0U",
        field: Field::WeekU,
        sub_pattern: r"5[0-3]|[0-4][0-9]",
        zero_value: None,
        render: |v| v.week_u.map(|w| format!("{w:02}")),
    },
    Part {
        token: "VV",
        field: Field::WeekV,
        sub_pattern: r"5[0-3]|[1-4][0-9]|[1-9]",
        zero_value: None,
        render: |v| v.week_v.map(|w| w.to_string()),
    },
    Part {
        token: "0V",
        field: Field::WeekV,
        sub_pattern: r"5[0-3]|[0-4][0-9]|0[1-9]",
        zero_value: None,
        render: |v| v.week_v.map(|w| format!("{w:02}")),
    },
    Part {
        token: "Q",
        field: Field::Quarter,
        sub_pattern: r"[1-4]",
        zero_value: None,
        render: |v| v.quarter.map(|q| q.to_string()),
    },
];
