// Copyright 2026 Redglyph
//
// Arbitrary-magnitude unsigned integers for the conversion engine.
//
// A value is a little-endian sequence of 32-bit limbs together with a count
// of implicit zero low limbs:
//
//     value = sum(limbs[i] * 2^(32*i)) * 2^(32*offset)
//
// Invariants: the top stored limb is non-zero (zero is the empty limb
// sequence), and `offset == 0` when the value is zero. Two values that are
// numerically equal may still store a low zero limb explicitly in one and in
// `offset` in the other, so equality goes through [Bignum::cmp], never
// through a derived `PartialEq`.
//
// Only the operations the conversion engine needs are provided, and all of
// them are exact: limb loops run 32-bit arithmetic in 64-bit accumulators
// with full carry/borrow propagation.
//
// An owned `Bignum` is uniquely mutable; the shared power-of-five constants
// live in a process-wide cache behind `OnceLock`, are never written after
// construction, and are cloned whenever an owned value is required.

use std::cmp::Ordering;
use std::sync::OnceLock;

/// Powers of 5 fitting one limb (5^13 is the largest below 2^32).
pub(crate) const SMALL_5_POW: [u32; 14] = [
    1,
    5,
    25,
    125,
    625,
    3_125,
    15_625,
    78_125,
    390_625,
    1_953_125,
    9_765_625,
    48_828_125,
    244_140_625,
    1_220_703_125,
];

/// Powers of 5 fitting an u64 (5^26 is the largest below 2^63).
pub(crate) const LONG_5_POW: [u64; 27] = [
    1,
    5,
    25,
    125,
    625,
    3_125,
    15_625,
    78_125,
    390_625,
    1_953_125,
    9_765_625,
    48_828_125,
    244_140_625,
    1_220_703_125,
    6_103_515_625,
    30_517_578_125,
    152_587_890_625,
    762_939_453_125,
    3_814_697_265_625,
    19_073_486_328_125,
    95_367_431_640_625,
    476_837_158_203_125,
    2_384_185_791_015_625,
    11_920_928_955_078_125,
    59_604_644_775_390_625,
    298_023_223_876_953_125,
    1_490_116_119_384_765_625,
];

/// Largest cached power of five; conversions of doubles never need more than
/// a few hundred, anything above is built recursively.
const MAX_FIVE_POW: usize = 340;

fn pow5_cache() -> &'static [Bignum] {
    static CACHE: OnceLock<Vec<Bignum>> = OnceLock::new();
    CACHE.get_or_init(|| {
        let mut cache = Vec::with_capacity(MAX_FIVE_POW);
        for &p in SMALL_5_POW.iter() {
            cache.push(Bignum { limbs: vec![p], offset: 0 });
        }
        while cache.len() < MAX_FIVE_POW {
            let mut next = cache.last().unwrap().clone();
            next.mult_small(5);
            cache.push(next);
        }
        cache
    })
}

/// Shared read-only `5^p5`, `p5 < 340`.
pub(crate) fn pow5_ref(p5: usize) -> &'static Bignum {
    &pow5_cache()[p5]
}

/// Owned `5^p5` for any exponent: cloned from the cache when possible, else
/// `5^p = 5^ceil(p/2) * 5^floor(p/2)`.
fn big_pow5(p5: usize) -> Bignum {
    if p5 < MAX_FIVE_POW {
        pow5_ref(p5).clone()
    } else {
        let q = p5 >> 1;
        big_pow5(p5 - q).mult_big(&big_pow5(q))
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Bignum {
    limbs: Vec<u32>,
    offset: usize,
}

impl Bignum {
    /// Canonicalizing constructor: trims high zero limbs.
    pub(crate) fn from_limbs(limbs: Vec<u32>, offset: usize) -> Bignum {
        let mut value = Bignum { limbs, offset };
        value.trim();
        value
    }

    /// Builds `seed * 10^(digits.len() - k) + digits[k..]` where `digits` are
    /// ASCII decimal digits. Digits are folded in five at a time so the cost
    /// is one mul-add per chunk instead of one per character.
    pub(crate) fn from_digits(seed: u64, digits: &[u8], k: usize) -> Bignum {
        let mut value =
            Bignum::from_limbs(vec![seed as u32, (seed >> 32) as u32], 0);
        let n = digits.len();
        let mut i = k;
        while i + 5 <= n {
            let mut chunk = 0u32;
            for _ in 0..5 {
                chunk = chunk * 10 + (digits[i] - b'0') as u32;
                i += 1;
            }
            value.mult_add(100_000, chunk);
        }
        let mut factor = 1u32;
        let mut chunk = 0u32;
        while i < n {
            chunk = chunk * 10 + (digits[i] - b'0') as u32;
            factor *= 10;
            i += 1;
        }
        if factor > 1 {
            value.mult_add(factor, chunk);
        }
        value
    }

    /// `5^p5 * 2^p2`.
    pub(crate) fn pow52(p5: usize, p2: u32) -> Bignum {
        let wordcount = (p2 >> 5) as usize;
        let bitcount = p2 & 0x1f;
        if p5 == 0 {
            Bignum { limbs: vec![1 << bitcount], offset: wordcount }
        } else if p5 < SMALL_5_POW.len() {
            let pow5 = SMALL_5_POW[p5];
            if bitcount == 0 {
                Bignum { limbs: vec![pow5], offset: wordcount }
            } else {
                Bignum::from_limbs(
                    vec![pow5 << bitcount, pow5 >> (32 - bitcount)],
                    wordcount,
                )
            }
        } else {
            big_pow5(p5).left_shift(p2)
        }
    }

    /// `value * 5^p5 * 2^p2` for a 64-bit seed.
    pub(crate) fn mul_pow52(value: u64, p5: usize, p2: u32) -> Bignum {
        let v0 = value as u32;
        let v1 = (value >> 32) as u32;
        let wordcount = (p2 >> 5) as usize;
        let bitcount = p2 & 0x1f;
        if p5 == 0 {
            if bitcount == 0 {
                Bignum::from_limbs(vec![v0, v1], wordcount)
            } else {
                Bignum::from_limbs(
                    vec![
                        v0 << bitcount,
                        (v1 << bitcount) | (v0 >> (32 - bitcount)),
                        v1 >> (32 - bitcount),
                    ],
                    wordcount,
                )
            }
        } else if p5 < SMALL_5_POW.len() {
            let pow5 = SMALL_5_POW[p5] as u64;
            let mut carry = (v0 as u64) * pow5;
            let t0 = carry as u32;
            carry >>= 32;
            carry += (v1 as u64) * pow5;
            let t1 = carry as u32;
            let t2 = (carry >> 32) as u32;
            if bitcount == 0 {
                Bignum::from_limbs(vec![t0, t1, t2], wordcount)
            } else {
                Bignum::from_limbs(
                    vec![
                        t0 << bitcount,
                        (t1 << bitcount) | (t0 >> (32 - bitcount)),
                        (t2 << bitcount) | (t1 >> (32 - bitcount)),
                        t2 >> (32 - bitcount),
                    ],
                    wordcount,
                )
            }
        } else {
            big_pow5(p5).mult_u64(value).left_shift(p2)
        }
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Limb count plus offset: the total limb-width of the value.
    pub(crate) fn size(&self) -> usize {
        self.limbs.len() + self.offset
    }

    #[cfg(test)]
    pub(crate) fn parts(&self) -> (&[u32], usize) {
        (&self.limbs, self.offset)
    }

    fn top(&self) -> u32 {
        *self.limbs.last().unwrap()
    }

    /// Limb at absolute position `i` (counting the implicit low zeros).
    fn limb(&self, i: usize) -> u32 {
        if i < self.offset || i >= self.size() {
            0
        } else {
            self.limbs[i - self.offset]
        }
    }

    fn trim(&mut self) {
        while self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
        if self.limbs.is_empty() {
            self.offset = 0;
        }
    }

    /// Rewrites `offset` down to `to`, storing the uncovered zero limbs.
    fn lower_offset(&mut self, to: usize) {
        debug_assert!(to <= self.offset);
        let extra = self.offset - to;
        if extra > 0 {
            self.limbs.splice(0..0, std::iter::repeat(0).take(extra));
            self.offset = to;
        }
    }

    /// Shifts left by `shift` bits. Grows by one limb only on a non-zero
    /// carry-out; a low limb shifted to zero is folded into the offset.
    pub(crate) fn left_shift(mut self, shift: u32) -> Bignum {
        if shift == 0 || self.is_zero() {
            return self;
        }
        let wordcount = (shift >> 5) as usize;
        let bitcount = shift & 0x1f;
        if bitcount != 0 {
            let anticount = 32 - bitcount;
            let mut prev = 0u32;
            for limb in self.limbs.iter_mut() {
                let t = *limb;
                *limb = (t << bitcount) | (prev >> anticount);
                prev = t;
            }
            let carry = prev >> anticount;
            if carry != 0 {
                self.limbs.push(carry);
            }
            let zeros = self.limbs.iter().take_while(|&&l| l == 0).count();
            if zeros > 0 {
                self.limbs.drain(..zeros);
                self.offset += zeros;
            }
        }
        self.offset += wordcount;
        self
    }

    /// In-place multiplication by 10.
    pub(crate) fn mult_by_10(&mut self) {
        let mut carry = 0u64;
        for limb in self.limbs.iter_mut() {
            carry += *limb as u64 * 10;
            *limb = carry as u32;
            carry >>= 32;
        }
        if carry != 0 {
            self.limbs.push(carry as u32);
        }
    }

    /// `self * 5^p5 * 2^p2`.
    pub(crate) fn mult_by_pow52(mut self, p5: usize, p2: u32) -> Bignum {
        if self.is_zero() {
            return self;
        }
        if p5 > 0 {
            if p5 < SMALL_5_POW.len() {
                self.mult_small(SMALL_5_POW[p5]);
            } else {
                self = self.mult_big(&big_pow5(p5));
            }
        }
        self.left_shift(p2)
    }

    /// In-place `self = self * m`.
    fn mult_small(&mut self, m: u32) {
        let mut carry = 0u64;
        for limb in self.limbs.iter_mut() {
            carry += *limb as u64 * m as u64;
            *limb = carry as u32;
            carry >>= 32;
        }
        if carry != 0 {
            self.limbs.push(carry as u32);
        }
    }

    /// In-place `self = self * m + addend`; requires `offset == 0` so the
    /// addend lands in the low limb (only the digit constructor needs this).
    fn mult_add(&mut self, m: u32, addend: u32) {
        debug_assert!(self.offset == 0);
        if self.limbs.is_empty() {
            if addend != 0 {
                self.limbs.push(addend);
            }
            return;
        }
        let mut carry = addend as u64;
        for limb in self.limbs.iter_mut() {
            carry += *limb as u64 * m as u64;
            *limb = carry as u32;
            carry >>= 32;
        }
        if carry != 0 {
            self.limbs.push(carry as u32);
        }
    }

    /// `self * v` for a 64-bit multiplier, as a new value.
    fn mult_u64(&self, v: u64) -> Bignum {
        let n = self.limbs.len();
        let mut r = vec![0u32; n + 2];
        let v0 = (v as u32) as u64;
        let v1 = v >> 32;
        let mut carry = 0u64;
        for (i, &l) in self.limbs.iter().enumerate() {
            carry += v0 * l as u64;
            r[i] = carry as u32;
            carry >>= 32;
        }
        r[n] = carry as u32;
        carry = 0;
        for (i, &l) in self.limbs.iter().enumerate() {
            carry += v1 * l as u64 + r[i + 1] as u64;
            r[i + 1] = carry as u32;
            carry >>= 32;
        }
        carry += r[n + 1] as u64;
        r[n + 1] = carry as u32;
        debug_assert!(carry >> 32 == 0);
        Bignum::from_limbs(r, self.offset)
    }

    /// Schoolbook `self * other`, as a new value.
    fn mult_big(&self, other: &Bignum) -> Bignum {
        let mut r = vec![0u32; self.limbs.len() + other.limbs.len()];
        for (i, &a) in self.limbs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            let mut carry = 0u64;
            for (j, &b) in other.limbs.iter().enumerate() {
                carry += r[i + j] as u64 + a as u64 * b as u64;
                r[i + j] = carry as u32;
                carry >>= 32;
            }
            r[i + other.limbs.len()] = carry as u32;
        }
        Bignum::from_limbs(r, self.offset + other.offset)
    }

    /// `self + other`, as a new value.
    fn add(&self, other: &Bignum) -> Bignum {
        let lo = self.offset.min(other.offset);
        let hi = self.size().max(other.size());
        let mut r = Vec::with_capacity(hi - lo + 1);
        let mut carry = 0u64;
        for i in lo..hi {
            carry += self.limb(i) as u64 + other.limb(i) as u64;
            r.push(carry as u32);
            carry >>= 32;
        }
        if carry != 0 {
            r.push(carry as u32);
        }
        Bignum::from_limbs(r, lo)
    }

    /// The left shift that puts the top limb's high 4 bits at zero and bit 27
    /// set, making single-limb quotient estimates accurate.
    pub(crate) fn get_normalization_bias(&self) -> u32 {
        assert!(!self.is_zero(), "zero value cannot be normalized");
        let zeros = self.top().leading_zeros();
        if zeros < 4 {
            28 + zeros
        } else {
            zeros - 4
        }
    }

    /// One step of decimal long division: estimates the quotient digit from
    /// the top limbs, computes `self - q*divisor` (adding the divisor back if
    /// the estimate overshot), multiplies the remainder by 10 in place and
    /// returns the digit.
    ///
    /// The divisor must be pre-normalized (see [Self::get_normalization_bias])
    /// and no wider than `self`; a wider `self` is a caller logic error and
    /// panics.
    pub(crate) fn quo_rem_iteration(&mut self, divisor: &Bignum) -> u32 {
        let th_size = self.size();
        let s_size = divisor.size();
        if th_size < s_size {
            // quotient is zero, just bring the next digit up
            self.mult_by_10();
            self.trim();
            return 0;
        }
        assert!(th_size == s_size, "disparate sizes in division step");
        debug_assert!(
            divisor.top().leading_zeros() == 4,
            "divisor is not normalized"
        );
        if self.offset > divisor.offset {
            self.lower_offset(divisor.offset);
        }
        let delta = divisor.offset - self.offset;
        let mut q = (self.top() / divisor.top()) as u64;
        if q != 0 {
            // subtract q * divisor; the estimate can only be a little high
            let mut borrow: i64 = 0;
            for (si, &sl) in divisor.limbs.iter().enumerate() {
                let ti = si + delta;
                borrow += self.limbs[ti] as i64 - q as i64 * sl as i64;
                self.limbs[ti] = borrow as u32;
                borrow >>= 32;
            }
            while borrow != 0 {
                q -= 1;
                let mut carry = 0u64;
                for (si, &sl) in divisor.limbs.iter().enumerate() {
                    let ti = si + delta;
                    carry += self.limbs[ti] as u64 + sl as u64;
                    self.limbs[ti] = carry as u32;
                    carry >>= 32;
                }
                borrow += carry as i64;
            }
        }
        // remainder < divisor, whose top limb is below 2^28, so scaling by 10
        // cannot carry past the divisor's width
        let width = self.limbs.len();
        self.mult_by_10();
        debug_assert!(self.limbs.len() == width);
        self.trim();
        q as u32
    }

    /// Three-way comparison.
    pub(crate) fn cmp(&self, other: &Bignum) -> Ordering {
        let by_size = self.size().cmp(&other.size());
        if by_size != Ordering::Equal {
            return by_size;
        }
        let mut a_len = self.limbs.len();
        let mut b_len = other.limbs.len();
        while a_len > 0 && b_len > 0 {
            a_len -= 1;
            b_len -= 1;
            let by_limb = self.limbs[a_len].cmp(&other.limbs[b_len]);
            if by_limb != Ordering::Equal {
                return by_limb;
            }
        }
        // one of the tails may still hold explicit non-zero low limbs
        if self.limbs[..a_len].iter().any(|&l| l != 0) {
            Ordering::Greater
        } else if other.limbs[..b_len].iter().any(|&l| l != 0) {
            Ordering::Less
        } else {
            Ordering::Equal
        }
    }

    /// Compares against `5^p5 * 2^p2` without building it when `p5` is zero
    /// (a single-bit value) or already cached.
    pub(crate) fn cmp_pow52(&self, p5: usize, p2: u32) -> Ordering {
        if p5 == 0 {
            let wordcount = (p2 >> 5) as usize;
            let bitcount = p2 & 0x1f;
            let by_size = self.size().cmp(&(wordcount + 1));
            if by_size != Ordering::Equal {
                return by_size;
            }
            let by_top = self.top().cmp(&(1 << bitcount));
            if by_top != Ordering::Equal {
                return by_top;
            }
            let below = &self.limbs[..self.limbs.len() - 1];
            if below.iter().any(|&l| l != 0) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        } else if p5 < MAX_FIVE_POW && p2 == 0 {
            self.cmp(pow5_ref(p5))
        } else {
            self.cmp(&Bignum::pow52(p5, p2))
        }
    }

    /// Compares `self` against `x + y`, deciding from limb counts or the top
    /// limbs when possible and materializing the sum only as a last resort.
    pub(crate) fn add_and_cmp(&self, x: &Bignum, y: &Bignum) -> Ordering {
        let (big, small) = if x.size() >= y.size() { (x, y) } else { (y, x) };
        let th_size = self.size();
        let b_size = big.size();
        if b_size == 0 {
            return if th_size == 0 { Ordering::Equal } else { Ordering::Greater };
        }
        if small.is_zero() {
            return self.cmp(big);
        }
        if b_size > th_size {
            return Ordering::Less;
        }
        if b_size + 1 < th_size {
            return Ordering::Greater;
        }
        let mut top = big.top() as u64;
        if b_size == small.size() {
            top += small.top() as u64;
        }
        if top >> 32 == 0 {
            // no carry out of the top limb, so the sum keeps big's size
            if b_size + 1 == th_size {
                return Ordering::Greater;
            }
            let v = self.top() as u64;
            if v < top {
                return Ordering::Less;
            }
            // carries from below can raise the top limb by at most one
            if v > top + 1 {
                return Ordering::Greater;
            }
        }
        self.cmp(&big.add(small))
    }

    /// `self - subtrahend`, reusing `self`'s storage. The caller guarantees a
    /// non-negative result.
    pub(crate) fn left_inplace_sub(mut self, subtrahend: &Bignum) -> Bignum {
        debug_assert!(self.size() >= subtrahend.size());
        if subtrahend.offset < self.offset {
            self.lower_offset(subtrahend.offset);
        }
        let delta = subtrahend.offset - self.offset;
        let mut borrow: i64 = 0;
        let mut i = delta;
        for &sl in subtrahend.limbs.iter() {
            borrow += self.limbs[i] as i64 - sl as i64;
            self.limbs[i] = borrow as u32;
            borrow >>= 32;
            i += 1;
        }
        while borrow != 0 && i < self.limbs.len() {
            borrow += self.limbs[i] as i64;
            self.limbs[i] = borrow as u32;
            borrow >>= 32;
            i += 1;
        }
        debug_assert!(borrow == 0, "negative result in subtraction");
        self.trim();
        self
    }

    /// `self - subtrahend`, reusing the subtrahend's storage. The caller
    /// guarantees a non-negative result.
    pub(crate) fn right_inplace_sub(&self, mut subtrahend: Bignum) -> Bignum {
        debug_assert!(self.size() >= subtrahend.size());
        let lo = self.offset.min(subtrahend.offset);
        let width = self.size() - lo;
        subtrahend.lower_offset(lo);
        subtrahend.limbs.resize(width, 0);
        let mut borrow: i64 = 0;
        for i in 0..width {
            borrow += self.limb(lo + i) as i64 - subtrahend.limbs[i] as i64;
            subtrahend.limbs[i] = borrow as u32;
            borrow >>= 32;
        }
        debug_assert!(borrow == 0, "negative result in subtraction");
        subtrahend.trim();
        subtrahend
    }
}
