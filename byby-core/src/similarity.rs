//! Similarity ratio and closest-match selection.
//!
//! Ratcliff/Obershelp ratio `2 * M / T` on Unicode scalar values: `M` counts
//! the characters in the recursively found longest matching blocks and `T`
//! is the combined length. Long targets skip popular characters when
//! seeding blocks. Stored FAQ questions were tuned against these scores, so
//! the 0.6 cutoff keeps its meaning.

use std::cmp::Ordering;
use std::collections::HashMap;

/// Targets of at least this many characters get the "popular element"
/// heuristic: characters making up more than 1% of the target are ignored
/// when searching for match seeds.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Compares candidate sequences against one fixed target.
///
/// The target index is built once, so scoring many candidates against the
/// same target (the closest-match case) is cheap.
#[derive(Debug, Clone)]
pub struct SequenceMatcher {
    target: Vec<char>,
    /// Positions of each character in `target`, minus popular characters.
    positions: HashMap<char, Vec<usize>>,
    /// Full character histogram of `target`.
    counts: HashMap<char, usize>,
}

impl SequenceMatcher {
    pub fn new(target: &str) -> Self {
        let target: Vec<char> = target.chars().collect();

        let mut positions: HashMap<char, Vec<usize>> = HashMap::new();
        let mut counts: HashMap<char, usize> = HashMap::new();
        for (j, &c) in target.iter().enumerate() {
            positions.entry(c).or_default().push(j);
            *counts.entry(c).or_default() += 1;
        }

        let n = target.len();
        if n >= AUTOJUNK_MIN_LEN {
            let ntest = n / 100 + 1;
            positions.retain(|_, js| js.len() <= ntest);
        }

        Self { target, positions, counts }
    }

    /// `2 * M / T`, where `M` is the number of matched characters and `T` the
    /// combined length. Two empty sequences are identical (`1.0`).
    pub fn ratio(&self, candidate: &str) -> f64 {
        let a: Vec<char> = candidate.chars().collect();
        let matches = self.matching_characters(&a);
        ratio_of(matches, a.len() + self.target.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from character multisets only.
    pub fn quick_ratio(&self, candidate: &str) -> f64 {
        let mut available: HashMap<char, isize> = HashMap::new();
        let mut matches = 0;
        let mut len = 0;
        for c in candidate.chars() {
            len += 1;
            let left = available
                .entry(c)
                .or_insert_with(|| self.counts.get(&c).copied().unwrap_or(0) as isize);
            *left -= 1;
            if *left >= 0 {
                matches += 1;
            }
        }
        ratio_of(matches, len + self.target.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from lengths only.
    pub fn real_quick_ratio(&self, candidate: &str) -> f64 {
        let la = candidate.chars().count();
        let lb = self.target.len();
        ratio_of(la.min(lb), la + lb)
    }

    /// Total size of the matching blocks between `a` and the target.
    fn matching_characters(&self, a: &[char]) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, a.len(), 0, self.target.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            total += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }
        total
    }

    /// Longest matching block in `a[alo..ahi]` and `target[blo..bhi]` as
    /// `(i, j, size)`. Among equally long blocks the one starting earliest in
    /// `a`, then earliest in the target, wins.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = &self.target;
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // run length of the match ending at (i - 1, j), keyed by j
        let mut run_len: HashMap<usize, usize> = HashMap::new();
        for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
            let mut next_run_len = HashMap::new();
            if let Some(js) = self.positions.get(c) {
                for &j in js {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        // Popular characters never seed a match but may still extend one.
        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }
}

fn ratio_of(matches: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        1.0
    } else {
        2.0 * matches as f64 / total_len as f64
    }
}

/// Similarity ratio of `a` against `b` in `[0, 1]`.
pub fn ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(b).ratio(a)
}

/// Up to `n` of `possibilities` scoring at least `cutoff` against `word`,
/// best first. Equal scores are ordered by the candidate text, greatest
/// first.
pub fn close_matches<'a, I>(word: &str, possibilities: I, n: usize, cutoff: f64) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    if n == 0 {
        return Vec::new();
    }

    let matcher = SequenceMatcher::new(word);
    let mut scored: Vec<(f64, &'a str)> = possibilities
        .into_iter()
        .filter(|candidate| {
            matcher.real_quick_ratio(candidate) >= cutoff
                && matcher.quick_ratio(candidate) >= cutoff
        })
        .filter_map(|candidate| {
            let score = matcher.ratio(candidate);
            (score >= cutoff).then_some((score, candidate))
        })
        .collect();

    scored.sort_by(|(sa, ca), (sb, cb)| {
        sb.partial_cmp(sa)
            .unwrap_or(Ordering::Equal)
            .then_with(|| cb.cmp(ca))
    });
    scored.truncate(n);
    scored.into_iter().map(|(_, candidate)| candidate).collect()
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn identical_and_empty_sequences() {
        assert!(approx(ratio("abc", "abc"), 1.0));
        assert!(approx(ratio("", ""), 1.0));
        assert!(approx(ratio("abc", ""), 0.0));
    }

    #[test]
    fn ratio_counts_matching_blocks() {
        // "bcd" is the only block.
        assert!(approx(ratio("abcd", "bcde"), 0.75));
        // "ch reset m" + "c" + "y t" + "nh" = 16 of 38 characters, twice.
        assert!(approx(
            ratio("cách reset máy tính", "cach reset may tinh"),
            32.0 / 38.0
        ));
    }

    #[test]
    fn quick_ratios_bound_the_real_ratio() {
        let m = SequenceMatcher::new("abcxy");
        for candidate in ["abcde", "yxcba", "a", "zzzzzzzz"] {
            assert!(m.real_quick_ratio(candidate) >= m.quick_ratio(candidate));
            assert!(m.quick_ratio(candidate) >= m.ratio(candidate));
        }
    }

    #[test]
    fn close_matches_ranks_by_score() {
        let got = close_matches("appel", ["ape", "apple", "peach", "puppy"], 3, 0.6);
        assert_eq!(got, vec!["apple", "ape"]);
    }

    #[test]
    fn cutoff_is_inclusive() {
        // 6 of 10 + 10 characters match: exactly 0.6.
        assert_eq!(
            close_matches("abcdefxyzw", ["abcdefghij"], 1, 0.6),
            vec!["abcdefghij"]
        );
        // 5 of 10 + 10: 0.5.
        assert!(close_matches("abcdexyzwv", ["abcdefghij"], 1, 0.6).is_empty());
        // 7 of 10 + 10: 0.7.
        assert_eq!(
            close_matches("abcdefgxyz", ["abcdefghij"], 1, 0.6),
            vec!["abcdefghij"]
        );
    }

    #[test]
    fn ties_prefer_greatest_candidate() {
        assert_eq!(close_matches("ab", ["ax", "ay"], 1, 0.5), vec!["ay"]);
    }

    #[test]
    fn zero_candidates_requested() {
        assert!(close_matches("abc", ["abc"], 0, 0.0).is_empty());
    }

    #[test]
    fn popular_characters_still_extend_matches() {
        // 300 'a's make 'a' popular in the target; the block is still found
        // through the 'b' seed and extended over the 'a's.
        let target = format!("{}b", "a".repeat(300));
        let candidate = format!("{}b", "a".repeat(10));
        let r = ratio(&candidate, &target);
        assert!(approx(r, 2.0 * 11.0 / 312.0));
    }
}
