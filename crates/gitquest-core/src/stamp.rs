use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use time::OffsetDateTime;

/// Length of a simulated commit hash.
pub const HASH_LEN: usize = 6;

const HASH_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of commit hashes. Collisions are tolerated, never checked.
pub trait HashSource: Send {
    fn next_hash(&mut self) -> String;
}

/// Source of commit timestamps.
pub trait Clock: Send {
    fn now(&self) -> OffsetDateTime;
}

/// Random base-36 hashes, six characters each.
pub struct RandomHashes {
    rng: StdRng,
}

impl RandomHashes {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl Default for RandomHashes {
    fn default() -> Self {
        Self::new()
    }
}

impl HashSource for RandomHashes {
    fn next_hash(&mut self) -> String {
        (0..HASH_LEN)
            .map(|_| HASH_ALPHABET[self.rng.gen_range(0..HASH_ALPHABET.len())] as char)
            .collect()
    }
}

/// Hands out a fixed list of hashes, then `h00000`, `h00001`, ...
#[derive(Debug, Default)]
pub struct SequenceHashes {
    queued: VecDeque<String>,
    counter: u32,
}

impl SequenceHashes {
    pub fn new<I, S>(hashes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queued: hashes.into_iter().map(Into::into).collect(),
            counter: 0,
        }
    }
}

impl HashSource for SequenceHashes {
    fn next_hash(&mut self) -> String {
        if let Some(h) = self.queued.pop_front() {
            return h;
        }
        let h = format!("h{:05}", self.counter);
        self.counter += 1;
        h
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub OffsetDateTime);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
    }
}

/// Hash + clock pair handed to every command handler.
pub struct Stamp {
    hashes: Box<dyn HashSource>,
    clock: Box<dyn Clock>,
}

impl Stamp {
    pub fn new(hashes: impl HashSource + 'static, clock: impl Clock + 'static) -> Self {
        Self {
            hashes: Box::new(hashes),
            clock: Box::new(clock),
        }
    }

    pub fn hash(&mut self) -> String {
        self.hashes.next_hash()
    }

    pub fn now(&self) -> OffsetDateTime {
        self.clock.now()
    }
}

impl Default for Stamp {
    fn default() -> Self {
        Self::new(RandomHashes::new(), SystemClock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_hash_is_six_base36_chars() {
        let mut hashes = RandomHashes::new();
        for _ in 0..50 {
            let h = hashes.next_hash();
            assert_eq!(h.len(), HASH_LEN);
            assert!(h.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn sequence_hashes_drain_then_count() {
        let mut hashes = SequenceHashes::new(["aaa111", "bbb222"]);
        assert_eq!(hashes.next_hash(), "aaa111");
        assert_eq!(hashes.next_hash(), "bbb222");
        assert_eq!(hashes.next_hash(), "h00000");
        assert_eq!(hashes.next_hash(), "h00001");
    }

    #[test]
    fn fixed_clock_is_stable() {
        let t = OffsetDateTime::from_unix_timestamp(1_704_110_400).unwrap();
        let stamp = Stamp::new(SequenceHashes::default(), FixedClock(t));
        assert_eq!(stamp.now(), t);
        assert_eq!(stamp.now(), t);
    }
}
