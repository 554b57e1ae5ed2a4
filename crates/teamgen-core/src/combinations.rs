// Lexicographic k-subset enumeration over index positions.

/// Iterator over every `k`-element subset of `0..n`, yielded as sorted index
/// vectors in lexicographic order.
///
/// Stepping follows the classic "next combination" rule: advance the rightmost
/// index that is not yet at its maximum position (`i + n - k`), then reset every
/// index to its right to be consecutive. `k == 0` yields a single empty subset;
/// `k > n` yields nothing.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    k: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Combinations {
            n,
            k,
            indices: (0..k).collect(),
            done: k > n,
        }
    }

    /// Advance `indices` to the next combination. Returns false once exhausted.
    fn step(&mut self) -> bool {
        let (n, k) = (self.n, self.k);
        let Some(i) = (0..k).rev().find(|&i| self.indices[i] != i + n - k) else {
            return false;
        };
        self.indices[i] += 1;
        for j in i + 1..k {
            self.indices[j] = self.indices[j - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();
        if !self.step() {
            self.done = true;
        }
        Some(current)
    }
}

/// Binomial coefficient C(n, k), used to size the search up front.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}
