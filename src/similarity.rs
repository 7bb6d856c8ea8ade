use itertools::Itertools;

/// Decides whether two pieces of text name the same thing.
///
/// Boards consult this both to judge guesses and, without a relationship graph,
/// to match legacy references against solved answers.
pub trait Similarity {
    /// Whether `a` and `b` are close enough to count as equal.
    fn similar(&self, a: &str, b: &str) -> bool;
}

impl<F> Similarity for F
where
    F: Fn(&str, &str) -> bool,
{
    fn similar(&self, a: &str, b: &str) -> bool {
        self(a, b)
    }
}

/// Case- and whitespace-insensitive edit ratio, accepting at or above a threshold out of 100.
///
/// The ratio is `2 * LCS / (len(a) + len(b))` over characters, i.e. one minus the
/// normalized insert/delete distance, rounded to a whole percentage.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FuzzyRatio {
    threshold: u8,
}

impl FuzzyRatio {
    /// Matcher accepting scores of at least `threshold` (clamped to 100).
    pub fn new(threshold: u8) -> Self {
        Self { threshold: threshold.min(100) }
    }

    /// The acceptance threshold.
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Score `a` against `b` on a 0..=100 scale. Empty input scores 0.
    pub fn score(a: &str, b: &str) -> u8 {
        let a = a.trim().to_lowercase().chars().collect_vec();
        let b = b.trim().to_lowercase().chars().collect_vec();
        if a.is_empty() || b.is_empty() {
            return 0;
        }

        let common = longest_common_subsequence(&a, &b);
        let ratio = (2 * common) as f64 / (a.len() + b.len()) as f64;
        // ratio is in [0, 1], so this cannot truncate
        (ratio * 100.0).round() as u8
    }
}

impl Default for FuzzyRatio {
    fn default() -> Self {
        Self::new(85)
    }
}

impl Similarity for FuzzyRatio {
    fn similar(&self, a: &str, b: &str) -> bool {
        Self::score(a, b) >= self.threshold
    }
}

fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    // single rolling row over b
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}
