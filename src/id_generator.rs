//! Id generator for nodes and edges
//! Produces role-prefixed ids like "table-00", "edge-2K" or "rel-01J..." (ULID suffix).
//! Sequential suffixes are short base-36 codes that widen when a length is exhausted.
use crate::config::IdStrategy;
use ulid::Ulid;

const CHARS: &[char] = &[
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H',
    'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    /// Current suffix length (starts at 2)
    length: usize,
    /// Counter for next suffix
    counter: u64,
    /// Maximum value before needing to expand
    max_value: u64,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self::with_length(strategy, 2)
    }

    pub fn with_length(strategy: IdStrategy, length: usize) -> Self {
        let max_value = (CHARS.len() as u64).pow(length as u32);
        Self {
            strategy,
            length,
            counter: 0,
            max_value,
        }
    }

    /// Generate the next id under `prefix`
    pub fn next(&mut self, prefix: &str) -> String {
        match self.strategy {
            IdStrategy::Ulid => format!("{}-{}", prefix, Ulid::new()),
            IdStrategy::Sequential => format!("{}-{}", prefix, self.next_code()),
        }
    }

    fn next_code(&mut self) -> String {
        if self.counter >= self.max_value {
            self.expand();
        }

        let code = self.encode(self.counter);
        self.counter += 1;
        code
    }

    /// Encode a number to a fixed-width base-36 string
    fn encode(&self, mut num: u64) -> String {
        let base = CHARS.len() as u64;
        let mut result = Vec::with_capacity(self.length);

        for _ in 0..self.length {
            let digit = (num % base) as usize;
            result.push(CHARS[digit]);
            num /= base;
        }

        result.reverse();
        result.into_iter().collect()
    }

    /// Move to the next length; codes of different widths never collide
    fn expand(&mut self) {
        self.length += 1;
        self.max_value = (CHARS.len() as u64).pow(self.length as u32);
        self.counter = 0;
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}
