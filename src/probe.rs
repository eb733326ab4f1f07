//! Hash / Probe Strategy
//!
//! Key fingerprints and the linear probe sequence over the slot array.
//!
//! The probe start is `fingerprint % mod_prime`, where `mod_prime` is the
//! prime nearest to the slot count. Final indices still wrap modulo the slot
//! count, so the start may lie past the end of the table. Changing either
//! modulus moves keys to different slots and breaks existing files.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of the key's UTF-8 bytes
///
/// Unseeded, so fingerprints are stable across runs and processes.
pub fn fingerprint(key: &str) -> u32 {
    key.as_bytes().iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Trial-division primality test
pub fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d * d <= n {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

/// Prime closest to `n`; ties go to the lower prime, and `n <= 2` yields 2
pub fn closest_prime(n: usize) -> usize {
    if n <= 2 {
        return 2;
    }
    if is_prime(n) {
        return n;
    }

    let mut distance = 1;
    loop {
        // Lower candidate first, so equal distances resolve downward
        if n - distance >= 2 && is_prime(n - distance) {
            return n - distance;
        }
        if is_prime(n + distance) {
            return n + distance;
        }
        distance += 1;
    }
}

/// Probe parameters for a table of fixed size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeStrategy {
    slot_count: usize,
    mod_prime: u32,
}

impl ProbeStrategy {
    /// Compute the probe modulus for `slot_count` slots (must be > 0)
    pub fn new(slot_count: usize) -> Self {
        Self {
            slot_count,
            mod_prime: closest_prime(slot_count) as u32,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn mod_prime(&self) -> u32 {
        self.mod_prime
    }

    /// Initial probe position (not yet reduced modulo the slot count)
    pub fn start(&self, fingerprint: u32) -> usize {
        (fingerprint % self.mod_prime) as usize
    }

    /// Slot indices visited for `fingerprint`, at most `slot_count` of them
    pub fn sequence(&self, fingerprint: u32) -> ProbeSequence {
        ProbeSequence {
            start: self.start(fingerprint),
            probe: 0,
            slot_count: self.slot_count,
        }
    }
}

/// Iterator over `(start + p) % slot_count` for `p` in `0..slot_count`
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    start: usize,
    probe: usize,
    slot_count: usize,
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.probe >= self.slot_count {
            return None;
        }
        let index = (self.start + self.probe) % self.slot_count;
        self.probe += 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.slot_count - self.probe;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
