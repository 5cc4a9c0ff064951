//! # calbump
//!
//! A library for parsing, formatting and incrementing calendar-aware version
//! strings.
//!
//! Instead of conforming to a fixed versioning scheme, you describe your
//! versions with a *pattern*: literal text mixed with *parts* like `YYYY`,
//! `0M`, `MAJOR` or `BUILD`, with `[brackets]` marking optional segments.
//! The same pattern drives parsing, rendering and incrementing, so a version
//! string always round-trips through it.
//!
//! ## Examples
//!
//! Bump a semantic version:
//!
//! ```
//! use calbump::{incr, BumpFlags};
//!
//! let flags = BumpFlags { patch: true, ..BumpFlags::default() };
//! let next = incr("1.2.3", "MAJOR.MINOR.PATCH", &flags, true, None).unwrap();
//! assert_eq!("1.2.4", next);
//! ```
//!
//! Roll a calendar version to a new date — the build id advances and fields
//! to the right of the changed calendar part reset:
//!
//! ```
//! use calbump::{incr, BumpFlags};
//! use chrono::NaiveDate;
//!
//! let next = incr(
//!     "v201712.0033-beta",
//!     "vYYYY0M.BUILD[-RELEASE]",
//!     &BumpFlags::default(),
//!     false,
//!     NaiveDate::from_ymd_opt(2018, 1, 1),
//! );
//! assert_eq!(Some("v201801.1034-beta".to_string()), next);
//! ```
//!
//! Or break the steps apart for reuse:
//!
//! ```
//! use calbump::{compile_pattern, format_version};
//!
//! let pattern = compile_pattern("vYYYY0M.BUILD[-RELEASE]").unwrap();
//! let vinfo = pattern.parse_version("v200712.0033-beta").unwrap();
//! assert_eq!(Some(2007), vinfo.year_y);
//!
//! // re-render under another pattern; zero-valued optional segments elide
//! assert_eq!("v7.33-b0", format_version(&vinfo, "vYY.BLD[-PYTAGNUM]").unwrap());
//! ```
//!
//! ## Parts
//!
//! | Part | Example | Binds |
//! |---|---|---|
//! | `MAJOR` `MINOR` `PATCH` | `1` `2` `3` | semantic version fields |
//! | `YYYY` `YY` `0Y` | `2007` `7` `07` | Gregorian year (full, short, zero-padded) |
//! | `GGGG` `GG` `0G` | `2007` `7` `07` | ISO 8601 week-numbering year |
//! | `Q` | `3` | quarter |
//! | `MM` `0M` | `9` `09` | month |
//! | `DD` `0D` | `3` `03` | day of month |
//! | `JJJ` `00J` | `8` `008` | day of year |
//! | `WW` `0W` | `4` `04` | week, Monday start |
//! | `UU` `0U` | `4` `04` | week, Sunday start |
//! | `VV` `0V` | `5` `05` | ISO 8601 week |
//! | `BUILD` `BLD` | `1033` `33` | build id (fixed-width, width-flexible) |
//! | `RELEASE` | `beta` | release tag |
//! | `PYTAG` | `b` | release tag, PEP 440 short code |
//! | `NUM` | `0` | release sequence number |
//! | `INC0` `INC1` | `0` `1` | auto increment (zero- and one-based) |
//!
//! Longer tokens win over shorter ones, so `YYYY` is never read as two `YY`s
//! and `BUILD` is never read as `BLD`. Text that matches no part is literal.
//! Escape brackets meant literally as `\[` and `\]`.
//!
//! ## Week numbering
//!
//! `WW`/`0W`/`UU`/`0U` count weeks within the Gregorian year, while `VV`/`0V`
//! belongs to the ISO week-numbering year `GGGG`. Mixing the two systems in
//! one pattern produces versions that jump around new year, so such patterns
//! fail to compile — the error suggests the two consistent alternatives.
#![warn(missing_docs)]

mod calendar;
mod error;
mod format;
mod incr;
mod lexid;
mod part;
mod pattern;
mod version;

pub use crate::calendar::{cal_info, CalendarInfo};
pub use crate::error::{CompileError, DateError, IncrError, ParseError};
pub use crate::format::format_version;
pub use crate::incr::{incr, incr_with_id_gen, try_incr, BumpFlags};
pub use crate::lexid::{BuildIdGen, Lexid};
pub use crate::pattern::{compile_pattern, is_valid_week_pattern, Pattern};
pub use crate::version::{is_valid, parse_version_info, ReleaseTag, VersionInfo};

/// A convenience module appropriate for glob imports (`use calbump::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::BumpFlags;
    #[doc(no_inline)]
    pub use crate::CompileError;
    #[doc(no_inline)]
    pub use crate::IncrError;
    #[doc(no_inline)]
    pub use crate::ParseError;
    #[doc(no_inline)]
    pub use crate::Pattern;
    #[doc(no_inline)]
    pub use crate::ReleaseTag;
    #[doc(no_inline)]
    pub use crate::VersionInfo;
    #[doc(no_inline)]
    pub use crate::{cal_info, compile_pattern, format_version};
    #[doc(no_inline)]
    pub use crate::{incr, is_valid, parse_version_info};
}
