//! Sequential `ChildNNN` session names

use once_cell::sync::Lazy;
use regex::Regex;

/// Pattern session names must match to count toward the sequence
pub const CHILD_NAME_PATTERN: &str = r"^Child\d{3}$";

static CHILD_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(CHILD_NAME_PATTERN).expect("valid child name regex"));

/// Compiled [`CHILD_NAME_PATTERN`]
pub(crate) fn child_name_regex() -> &'static Regex {
    &CHILD_NAME_RE
}

/// Next free name after the highest `ChildNNN` among `names`.
///
/// `Child001` when none match. Names that do not match the pattern are ignored.
pub fn next_child_name<'a, I>(names: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let highest = names
        .into_iter()
        .filter(|name| CHILD_NAME_RE.is_match(name))
        .filter_map(|name| name["Child".len()..].parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("Child{:03}", highest + 1)
}
