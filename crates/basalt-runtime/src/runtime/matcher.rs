/// A matched candidate and its distance above the requested value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedMatch<T> {
    pub value: T,
    pub delta: u32,
}

/// Finds the candidate whose key is closest to `target` from above.
///
/// Candidates below `target` are skipped entirely. An exact match wins
/// immediately; otherwise the smallest positive delta wins, and ties
/// keep the candidate seen first. The stability matters: it decides
/// which of two equally-distant runtimes gets launched.
pub fn find_nearest_at_least<T, I, F>(target: u32, candidates: I, mut key: F) -> Option<RankedMatch<T>>
where
    I: IntoIterator<Item = T>,
    F: FnMut(&T) -> u32,
{
    let mut best: Option<RankedMatch<T>> = None;

    for candidate in candidates {
        let found = key(&candidate);
        if found < target {
            continue;
        }

        let delta = found - target;
        if delta == 0 {
            return Some(RankedMatch {
                value: candidate,
                delta: 0,
            });
        }
        if best.as_ref().map_or(true, |b| delta < b.delta) {
            best = Some(RankedMatch {
                value: candidate,
                delta,
            });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_match_short_circuits() {
        let found = find_nearest_at_least(17, [8u32, 21, 17], |v| *v).unwrap();
        assert_eq!(found.value, 17);
        assert_eq!(found.delta, 0);
    }

    #[test]
    fn nearest_above_wins() {
        let found = find_nearest_at_least(17, [8u32, 21], |v| *v).unwrap();
        assert_eq!(found.value, 21);
        assert_eq!(found.delta, 4);
    }

    #[test]
    fn nothing_at_or_above_target() {
        assert_eq!(find_nearest_at_least(17, [8u32], |v| *v), None);
    }

    #[test]
    fn ties_keep_first_seen_candidate() {
        let candidates = [("a", 21u32), ("b", 21)];
        let found = find_nearest_at_least(17, candidates, |(_, v)| *v).unwrap();
        assert_eq!(found.value.0, "a");

        let reversed = [("b", 21u32), ("a", 21)];
        let found = find_nearest_at_least(17, reversed, |(_, v)| *v).unwrap();
        assert_eq!(found.value.0, "b");
    }
}
