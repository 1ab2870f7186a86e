use crate::{Error, OrderedMap, Result, separated_by};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// Positional parameter marker.
pub const PLACEHOLDER: &str = "?";

/// Kind of `column = ?` clause produced by [`create_query_clause`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    Where,
    Set,
    OnDuplicateKeyUpdate,
}

impl ClauseKind {
    pub const fn keyword(&self) -> &'static str {
        match self {
            ClauseKind::Where => "WHERE",
            ClauseKind::Set => "SET",
            ClauseKind::OnDuplicateKeyUpdate => "ON DUPLICATE KEY UPDATE",
        }
    }
    /// Text placed between two `column = ?` assignments.
    pub const fn separator(&self) -> &'static str {
        match self {
            ClauseKind::Where => " AND ",
            ClauseKind::Set | ClauseKind::OnDuplicateKeyUpdate => ", ",
        }
    }
}

impl Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for ClauseKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        [
            ClauseKind::Where,
            ClauseKind::Set,
            ClauseKind::OnDuplicateKeyUpdate,
        ]
        .into_iter()
        .find(|v| v.keyword().eq_ignore_ascii_case(&normalized))
        .ok_or_else(|| {
            Error::msg(format!(
                "Unknown clause kind `{s}`, expected one of WHERE, SET, ON DUPLICATE KEY UPDATE"
            ))
        })
    }
}

/// Join the values with a single comma, no spacing.
pub fn to_comma_string<T: AsRef<str>>(values: impl IntoIterator<Item = T>) -> String {
    let mut out = String::new();
    for (i, v) in values.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(v.as_ref());
    }
    out
}

/// Append `<KEYWORD> col1 = ?<sep>col2 = ?...` to `out`, nothing for an empty map.
pub fn write_query_clause<K: AsRef<str>, V>(
    out: &mut String,
    map: &OrderedMap<K, V>,
    kind: ClauseKind,
) {
    if map.is_empty() {
        return;
    }
    out.push_str(kind.keyword());
    out.push(' ');
    separated_by(
        out,
        map.keys(),
        |out, column| {
            out.push_str(column.as_ref());
            out.push_str(" = ");
            out.push_str(PLACEHOLDER);
        },
        kind.separator(),
    );
}

pub fn create_query_clause<K: AsRef<str>, V>(map: &OrderedMap<K, V>, kind: ClauseKind) -> String {
    let mut out = String::new();
    write_query_clause(&mut out, map, kind);
    out
}

pub fn to_where_clause<K: AsRef<str>, V>(map: &OrderedMap<K, V>) -> String {
    create_query_clause(map, ClauseKind::Where)
}

pub fn to_set_clause<K: AsRef<str>, V>(map: &OrderedMap<K, V>) -> String {
    create_query_clause(map, ClauseKind::Set)
}

pub fn to_on_duplicate_update_clause<K: AsRef<str>, V>(map: &OrderedMap<K, V>) -> String {
    create_query_clause(map, ClauseKind::OnDuplicateKeyUpdate)
}

/// One placeholder per entry of the map.
pub fn values_to_question_mark<K, V>(map: &OrderedMap<K, V>) -> Vec<&'static str> {
    vec![PLACEHOLDER; map.len()]
}
