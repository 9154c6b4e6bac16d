//! Prime candidates for hash table capacities.
//!
//! The operator picks the table capacity out of the five smallest primes
//! strictly greater than the node count, trading load factor for memory.

/// Number of capacity candidates produced by [`close_primes`].
pub const CANDIDATE_COUNT: usize = 5;

/// Deterministic primality test by trial division.
///
/// Checks 2 and 3, then divisors of the form `6k ± 1` up to `√n`.
pub fn is_prime(n: usize) -> bool {
    if n <= 1 {
        return false;
    }
    if n <= 3 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut i = 5;
    // `i <= n / i` is `i * i <= n` without the overflow.
    while i <= n / i {
        if n % i == 0 || n % (i + 2) == 0 {
            return false;
        }
        i += 6;
    }
    true
}

/// Returns the five smallest primes strictly greater than `n`, ascending.
///
/// ```
/// assert_eq!(ipgraph::primes::close_primes(10), [11, 13, 17, 19, 23]);
/// ```
pub fn close_primes(n: usize) -> [usize; CANDIDATE_COUNT] {
    let mut out = [0; CANDIDATE_COUNT];
    let mut found = 0;
    let mut candidate = n;
    while found < CANDIDATE_COUNT {
        candidate += 1;
        if is_prime(candidate) {
            out[found] = candidate;
            found += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_prime(n: usize) -> bool {
        n >= 2 && (2..n).all(|d| n % d != 0)
    }

    #[test]
    fn test_is_prime_small_values() {
        for n in 0..500 {
            assert_eq!(is_prime(n), naive_prime(n), "mismatch at {n}");
        }
    }

    #[test]
    fn test_close_primes_examples() {
        assert_eq!(close_primes(0), [2, 3, 5, 7, 11]);
        assert_eq!(close_primes(1), [2, 3, 5, 7, 11]);
        assert_eq!(close_primes(2), [3, 5, 7, 11, 13]);
        assert_eq!(close_primes(10), [11, 13, 17, 19, 23]);
        // A prime input is excluded from its own candidates.
        assert_eq!(close_primes(13), [17, 19, 23, 29, 31]);
    }

    #[test]
    fn test_close_primes_properties() {
        for n in 0..300 {
            let primes = close_primes(n);
            assert!(primes[0] > n);
            assert!(primes.windows(2).all(|w| w[0] < w[1]));
            assert!(primes.iter().all(|&p| naive_prime(p)));
            // Nothing prime is skipped between n and the first candidate.
            assert!((n + 1..primes[0]).all(|m| !naive_prime(m)));
        }
    }

    #[test]
    fn test_large_prime_boundary() {
        assert!(is_prime(1_000_000_007));
        assert!(!is_prime(1_000_000_007 * 3));
        assert_eq!(close_primes(1_000_000_000)[0], 1_000_000_007);
    }
}
