//! Ratcliff/Obershelp "gestalt" similarity.
//!
//! `ratio` is `2·M / T`, where `T` is the total number of characters in both
//! strings and `M` the number of characters in matching blocks. Blocks are
//! found by taking the longest common substring and recursing on the pieces
//! to its left and right. Ties pick the block that starts earliest in `a`,
//! then earliest in `b`.

/// Similarity of two strings in `[0, 1]`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matches = matching_characters(&a, &b, 0, a.len(), 0, b.len());
    2.0 * matches as f64 / total as f64
}

/// Sum of matching-block sizes inside `a[alo..ahi]` × `b[blo..bhi]`.
fn matching_characters(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let mut total = 0;
    let mut pending = vec![(alo, ahi, blo, bhi)];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, size) = longest_match(a, b, alo, ahi, blo, bhi);
        if size == 0 {
            continue;
        }
        total += size;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + size < ahi && j + size < bhi {
            pending.push((i + size, ahi, j + size, bhi));
        }
    }
    total
}

/// Longest common block `(start_in_a, start_in_b, len)` within the given ranges.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // run[j] = length of the common suffix ending at a[i - 1] and b[j]
    let mut run = vec![0usize; bhi.saturating_sub(blo) + 1];
    for i in alo..ahi {
        let mut next = vec![0usize; run.len()];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = if j > blo { run[j - blo - 1] + 1 } else { 1 };
            next[j - blo] = k;
            if k > best_size {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_size = k;
            }
        }
        run = next;
    }
    (best_i, best_j, best_size)
}
