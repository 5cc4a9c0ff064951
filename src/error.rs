/// A raw pattern could not be turned into a matcher.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum CompileError {
    /// A `]` without a matching `[`, or an unclosed `[`.
    #[error("Unbalanced bracket(s) in pattern `{pattern}`")]
    UnbalancedBrackets {
        /// The offending pattern.
        pattern: String,
    },

    /// The pattern mixes a Gregorian year with an ISO week, or an ISO year
    /// with a non-ISO week. `alt1` and `alt2` are the two consistent
    /// rewrites (swap the week system, or swap the year system).
    #[error(
        "Invalid pattern `{pattern}`: `{year_part}` and `{week_part}` use \
         different week numbering systems. Maybe try `{alt1}` or `{alt2}`"
    )]
    MixedWeekNumbering {
        /// The offending pattern.
        pattern: String,
        /// The year token found.
        year_part: &'static str,
        /// The conflicting week token found.
        week_part: &'static str,
        /// The pattern with the week system swapped to match the year.
        alt1: String,
        /// The pattern with the year system swapped to match the week.
        alt2: String,
    },

    /// The assembled regex was rejected, e.g. because two parts bind the
    /// same field.
    #[error("Pattern `{pattern}` compiled to an unusable matcher: {reason}")]
    BadMatcher {
        /// The offending pattern.
        pattern: String,
        /// What the regex engine said.
        reason: String,
    },
}

/// Calendar fields that do not reconstruct a real date.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum DateError {
    /// E.g. day-of-year 366 in a non-leap year.
    #[error("Year `{year}` and day-of-year `{doy}` do not name a real date")]
    InvalidDayOfYear {
        /// The year as parsed.
        year: i32,
        /// The day-of-year as parsed.
        doy: i32,
    },

    /// E.g. month 13, or February 30th.
    #[error("Year `{year}`, month `{month}` and day `{day}` do not name a real date")]
    InvalidDate {
        /// The year as parsed.
        year: i32,
        /// The month as parsed.
        month: i32,
        /// The day of month as parsed.
        day: i32,
    },
}

/// A version string could not be parsed against a pattern.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    /// The version string does not match the pattern at all.
    #[error("Invalid version string `{version}` for pattern `{pattern}`")]
    VersionPatternMismatch {
        /// The version string.
        version: String,
        /// The raw pattern.
        pattern: String,
    },

    /// The pattern matched a strict prefix of the version string; partial
    /// matches are rejected.
    #[error(
        "Incomplete match `{matched}` for version string `{version}` with pattern `{pattern}`"
    )]
    IncompleteMatch {
        /// The prefix that matched.
        matched: String,
        /// The full version string.
        version: String,
        /// The raw pattern.
        pattern: String,
    },

    /// The pattern itself failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The matched calendar fields do not form a real date.
    #[error(transparent)]
    Date(#[from] DateError),
}

/// An increment could not produce a new version.
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum IncrError {
    /// The pattern failed to compile.
    #[error(transparent)]
    Compile(#[from] CompileError),

    /// The old version did not parse under the pattern.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The increment rendered a string identical to the input; the flag and
    /// pattern combination cannot produce a distinguishable new version.
    #[error("Invalid arguments or pattern, version did not change")]
    NoChange,
}
