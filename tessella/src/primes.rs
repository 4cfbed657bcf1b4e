//! A deterministic prime table with an explicit lifecycle: created empty,
//! extended monotonically by trial division, dropped with its owner.
//! No probabilistic primality testing.

use num_integer::Integer as NumInteger;

fn isqrt(n: u64) -> u64 {
    if n < 2 { return n }
    let mut x = (n as f64).sqrt() as u64 + 1;
    while x * x > n {
        x -= 1;
    }
    x
}

#[derive(Debug, Clone)]
pub struct Primes {
    list: Vec<u64>,
}

impl Primes {
    pub fn new() -> Self {
        Self { list: vec![2, 3] }
    }

    /// Extends the table so that it contains every prime `<= bound`.
    pub fn extend_to(&mut self, bound: u64) {
        let mut c = *self.list.last().unwrap();
        while c < bound {
            c += 2;
            if self.is_prime_trial(c) {
                self.list.push(c);
            }
        }
    }

    fn is_prime_trial(&self, c: u64) -> bool {
        for &p in &self.list {
            if p * p > c {
                return true;
            }
            if c % p == 0 {
                return false;
            }
        }
        // table too short for a definitive answer, fall back to full division
        let mut d = *self.list.last().unwrap();
        while d * d <= c {
            if c % d == 0 {
                return false;
            }
            d += 2;
        }
        true
    }

    pub fn is_prime(&mut self, n: u64) -> bool {
        if n < 2 {
            return false;
        }
        self.extend_to(isqrt(n) + 1);
        self.list.binary_search(&n).is_ok() || self.is_prime_trial(n)
    }

    /// Prime factorization of `n > 0` as (prime, exponent) pairs, ascending.
    pub fn factorize(&mut self, mut n: u64) -> Vec<(u64, u32)> {
        assert!(n > 0);
        let mut out = vec![];
        self.extend_to(isqrt(n) + 1);
        for i in 0.. {
            if n == 1 {
                break;
            }
            if i == self.list.len() {
                // remaining part is prime
                out.push((n, 1));
                break;
            }
            let p = self.list[i];
            if p * p > n {
                out.push((n, 1));
                break;
            }
            let mut e = 0;
            while n.is_multiple_of(p) {
                n /= p;
                e += 1;
            }
            if e > 0 {
                out.push((p, e));
            }
        }
        out
    }
}

impl Default for Primes {
    fn default() -> Self {
        Self::new()
    }
}

/// Legendre symbol (a/p) for an odd prime `p`.
pub fn legendre_symbol(a: i64, p: u64) -> i32 {
    debug_assert!(p > 2);
    let a = a.rem_euclid(p as i64) as u64;
    if a == 0 {
        return 0;
    }
    // Euler's criterion, computed by square-and-multiply mod p.
    let mut result = 1u64;
    let mut base = a % p;
    let mut exp = (p - 1) / 2;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % p;
        }
        base = base * base % p;
        exp >>= 1;
    }
    if result == 1 { 1 } else { -1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primality() {
        let mut pr = Primes::new();
        assert!(pr.is_prime(2));
        assert!(pr.is_prime(97));
        assert!(!pr.is_prime(1));
        assert!(!pr.is_prime(91));
        assert!(pr.is_prime(7919));
    }

    #[test]
    fn factorize() {
        let mut pr = Primes::new();
        assert_eq!(pr.factorize(360), vec![(2, 3), (3, 2), (5, 1)]);
        assert_eq!(pr.factorize(97), vec![(97, 1)]);
        assert_eq!(pr.factorize(1), vec![]);
    }

    #[test]
    fn legendre() {
        assert_eq!(legendre_symbol(2, 7), 1);
        assert_eq!(legendre_symbol(3, 7), -1);
        assert_eq!(legendre_symbol(0, 5), 0);
        assert_eq!(legendre_symbol(4, 5), 1);
        assert_eq!(legendre_symbol(-1, 5), 1);
        assert_eq!(legendre_symbol(-1, 7), -1);
    }
}
