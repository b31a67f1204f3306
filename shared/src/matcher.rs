//! Byte-at-a-time token matcher
//!
//! The radio announces events by writing fixed literals (`+RCC`, `OK`) into
//! an otherwise unparsed byte stream. A [`TokenMatcher`] is created for one
//! wait, fed every received byte, and dropped once it reports a match.
//!
//! The matcher is a small automaton with a fallback table: on a mismatch it
//! falls back to the longest prefix of the token that is still a suffix of
//! the input and retries the same byte from there. This makes it
//! overlap-aware (`+R+RCC` matches `+RCC`). For tokens without a repeated
//! prefix, which includes both radio tokens, the fallback is always to the
//! start, so the behavior equals restart-on-mismatch with the offending byte
//! re-tested against the first expected byte.

/// Incremental matcher for a single literal token
#[derive(Debug, Clone)]
pub struct TokenMatcher {
    token: &'static [u8],
    /// fallback[i]: length of the longest proper border of token[..=i]
    fallback: Vec<usize>,
    /// Number of token bytes matched so far
    matched: usize,
}

impl TokenMatcher {
    /// Create a matcher for the given token
    ///
    /// An empty token is matched by the first byte fed.
    pub fn new(token: &'static [u8]) -> Self {
        Self {
            token,
            fallback: build_fallback(token),
            matched: 0,
        }
    }

    /// Feed one byte, returning true once the whole token has been seen
    ///
    /// After a match the matcher is spent; further bytes keep returning true.
    pub fn feed(&mut self, byte: u8) -> bool {
        if self.is_complete() {
            return true;
        }

        while self.matched > 0 && self.token[self.matched] != byte {
            self.matched = self.fallback[self.matched - 1];
        }
        if self.token[self.matched] == byte {
            self.matched += 1;
        }

        self.is_complete()
    }

    /// Whether the token has been fully observed
    pub fn is_complete(&self) -> bool {
        self.matched == self.token.len()
    }
}

fn build_fallback(token: &[u8]) -> Vec<usize> {
    let mut fallback = vec![0; token.len()];
    let mut k = 0;
    for i in 1..token.len() {
        while k > 0 && token[i] != token[k] {
            k = fallback[k - 1];
        }
        if token[i] == token[k] {
            k += 1;
        }
        fallback[i] = k;
    }
    fallback
}
