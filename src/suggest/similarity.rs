//! Similarity matcher / 相似度匹配
//!
//! Pure functions, no persistence dependency. The score is a normalized
//! edit-distance ratio over characters:
//!
//! ```text
//! similarity(a, b) = 1 - levenshtein(a, b) / max(|a|, |b|)
//! ```
//!
//! Properties: symmetric, deterministic, `1.0` iff `a == b`, `0.0` when
//! exactly one side is empty, monotonic in the shared-substring proportion.

/// Normalized similarity in `[0, 1]` / 归一化相似度
pub fn similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_len = a_chars.len().max(b_chars.len());
    let dist = levenshtein(&a_chars, &b_chars);

    1.0 - dist as f64 / max_len as f64
}

/// Levenshtein edit distance over char slices / 字符级编辑距离
///
/// Single-row rolling table; O(|a| * |b|) time, O(|b|) memory.
fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let next = (row[j] + 1).min(row[j + 1] + 1).min(prev_diag + cost);
            prev_diag = row[j + 1];
            row[j + 1] = next;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein(&[], &[]), 0);
        let abc: Vec<char> = "abc".chars().collect();
        let abd: Vec<char> = "abd".chars().collect();
        let abcd: Vec<char> = "abcd".chars().collect();
        assert_eq!(levenshtein(&abc, &abc), 0);
        assert_eq!(levenshtein(&abc, &abd), 1);
        assert_eq!(levenshtein(&abc, &abcd), 1);
        assert_eq!(levenshtein(&abcd, &abc), 1);
    }

    #[test]
    fn test_similarity_axioms() {
        assert_eq!(similarity("Hello", "Hello"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("", "x"), 0.0);
        assert_eq!(similarity("x", ""), 0.0);
        assert_eq!(similarity("Hello", "world"), similarity("world", "Hello"));
    }

    #[test]
    fn test_similarity_tracks_shared_proportion() {
        let close = similarity("Hello there", "Hello ther");
        let far = similarity("Hello there", "Goodbye");
        assert!(close > 0.9, "close = {}", close);
        assert!(far < 0.4, "far = {}", far);
        assert!(close > far);
    }

    #[test]
    fn test_similarity_multibyte() {
        // Char-level distance, not byte-level / 字符级而非字节级
        let score = similarity("测试文件", "测试文本");
        assert_eq!(score, 0.75);
    }
}
