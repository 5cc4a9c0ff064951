/// A monotonic build-id generator over numeric strings.
///
/// The contract: for ids `a` then `b` produced in sequence, `a < b` holds both
/// numerically and as a plain string comparison. Implementations grow the id's
/// width rather than wrap, so string ordering survives digit rollover.
///
/// The incrementer treats this as a pluggable collaborator; substitute another
/// numbering scheme via [`crate::incr_with_id_gen`].
pub trait BuildIdGen {
    /// Returns the id following `prev_id`.
    fn next_id(&self, prev_id: &str) -> String;
}

/// The default generator: lexical ids.
///
/// The leading digit counts rollovers. Incrementing normally preserves the
/// zero-padded width (`0033` to `0034`); when the numeric value overflows into
/// the leading digit's position, that digit increments and the id grows one
/// digit, e.g. `0999` to `11000` and `1999` to `22000`. Build sequences
/// seeded at `1000` therefore stay string-sortable forever.
#[derive(Debug, Clone, Copy, Default)]
pub struct Lexid;

impl BuildIdGen for Lexid {
    fn next_id(&self, prev_id: &str) -> String {
        let Ok(prev_int) = prev_id.parse::<u128>() else {
            // not a numeric id; leave it alone and let the caller notice
            return prev_id.to_string();
        };
        let Some(next_int) = prev_int.checked_add(1) else {
            return prev_id.to_string();
        };

        let next_id = format!("{next_int:0width$}", width = prev_id.len());
        let rollover = next_id.len() > prev_id.len()
            || next_id.as_bytes().first() != prev_id.as_bytes().first();
        if rollover {
            let counter = prev_id
                .as_bytes()
                .first()
                .map(|digit| u32::from(digit - b'0') + 1)
                .unwrap_or(1);
            format!("{counter}{next_int}")
        } else {
            next_id
        }
    }
}
