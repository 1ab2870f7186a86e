pub fn separated_by<T, F>(
    out: &mut String,
    values: impl IntoIterator<Item = T>,
    mut f: F,
    separator: &str,
) where
    F: FnMut(&mut String, T),
{
    let mut len = out.len();
    for v in values {
        if out.len() > len {
            out.push_str(separator);
        }
        len = out.len();
        f(out, v);
    }
}

/// Byte length of the longest prefix of `value` not exceeding `max` bytes that ends on a char boundary.
pub fn prefix_len(value: &str, max: usize) -> usize {
    if value.len() <= max {
        return value.len();
    }
    (0..=max)
        .rev()
        .find(|i| value.is_char_boundary(*i))
        .unwrap_or(0)
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            &$query[..$crate::prefix_len(&$query, 497)].trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated() {
        let mut out = String::from("(");
        separated_by(&mut out, ["a", "b", "c"], |out, v| out.push_str(v), ", ");
        assert_eq!(out, "(a, b, c");
        let mut out = String::new();
        separated_by(&mut out, Vec::<&str>::new(), |out, v| out.push_str(v), ", ");
        assert_eq!(out, "");
    }

    #[test]
    fn truncate() {
        let short = "SELECT 1";
        assert_eq!(format!("{}", truncate_long!(short)), "SELECT 1");
        let long = "é".repeat(400);
        let printed = format!("{}", truncate_long!(long));
        assert!(printed.ends_with("..."));
        assert!(printed.len() <= 500);
    }
}
