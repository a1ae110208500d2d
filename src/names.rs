//! Dotted-name helpers used when rewriting namespaced type references.

/// Finds the longest candidate that is a dotted prefix of `name`.
///
/// A candidate matches when it equals `name` or when `name` continues
/// with a `.` after it; `ns.Type` is a prefix of `ns.Type.Inner` but
/// not of `ns.TypeOther`.
pub fn find_longest_name_prefix<'a, I>(name: &str, candidates: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut best: Option<&str> = None;
    for candidate in candidates {
        if !is_dotted_prefix(candidate, name) {
            continue;
        }
        if best.map_or(true, |b| candidate.len() > b.len()) {
            best = Some(candidate);
        }
    }
    best.map(str::to_owned)
}

/// Replaces the dotted prefix of `name` with `replacement`.
///
/// `replace_prefix_in_name("ns.Type.Inner", "ns.Type", "T")` yields
/// `T.Inner`. `name` must actually start with the prefix; callers pass
/// the result of [`find_longest_name_prefix`].
pub fn replace_prefix_in_name(name: &str, prefix: &str, replacement: &str) -> String {
    if name == prefix {
        replacement.to_owned()
    } else if is_dotted_prefix(prefix, name) {
        format!("{}{}", replacement, &name[prefix.len()..])
    } else {
        name.to_owned()
    }
}

fn is_dotted_prefix(prefix: &str, name: &str) -> bool {
    name == prefix
        || (name.starts_with(prefix) && name.as_bytes().get(prefix.len()) == Some(&b'.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longest_prefix_wins() {
        let candidates = ["ns", "ns.Type", "other"];
        assert_eq!(
            find_longest_name_prefix("ns.Type.Inner", candidates),
            Some("ns.Type".to_owned())
        );
        assert_eq!(find_longest_name_prefix("ns", candidates), Some("ns".to_owned()));
    }

    #[test]
    fn component_boundaries_are_respected() {
        assert_eq!(find_longest_name_prefix("ns.TypeOther", ["ns.Type"]), None);
        assert_eq!(find_longest_name_prefix("unrelated.Foo", ["ns.Type"]), None);
    }

    #[test]
    fn prefix_replacement() {
        assert_eq!(replace_prefix_in_name("ns.Type", "ns.Type", "T"), "T");
        assert_eq!(replace_prefix_in_name("ns.Type.Inner", "ns.Type", "T"), "T.Inner");
        assert_eq!(replace_prefix_in_name("other.Foo", "ns.Type", "T"), "other.Foo");
    }
}
