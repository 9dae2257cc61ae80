//! Exact rational numbers for the equation balancer.
//!
//! Floating point elimination would give coefficients like 1.9999999 for big equations,
//! so the linear system is solved over fractions of i128. All arithmetic is checked:
//! an overflow gives None instead of a wrong coefficient.

/// Greatest common divisor using Euclidean algorithm
pub fn gcd(mut a: i128, mut b: i128) -> i128 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// Least common multiple, None on overflow
pub fn lcm(a: i128, b: i128) -> Option<i128> {
    if a == 0 || b == 0 {
        return Some(0);
    }
    (a / gcd(a, b)).checked_mul(b).map(|l| l.abs())
}

/// Invariant: denominator > 0, gcd(numerator, denominator) == 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    numer: i128,
    denom: i128,
}

impl Rational {
    pub const ZERO: Rational = Rational { numer: 0, denom: 1 };
    pub const ONE: Rational = Rational { numer: 1, denom: 1 };

    pub fn integer(n: i128) -> Self {
        Rational { numer: n, denom: 1 }
    }

    /// Create a rational, automatically reducing. None if the denominator is zero
    pub fn new(numer: i128, denom: i128) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        // Normalize sign to numerator
        let (numer, denom) = if denom < 0 {
            (numer.checked_neg()?, denom.checked_neg()?)
        } else {
            (numer, denom)
        };
        let g = gcd(numer, denom);
        Some(Rational {
            numer: numer / g,
            denom: denom / g,
        })
    }

    pub fn numer(&self) -> i128 {
        self.numer
    }

    pub fn denom(&self) -> i128 {
        self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.numer == 0
    }

    pub fn is_positive(&self) -> bool {
        self.numer > 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        let g = gcd(self.denom, other.denom);
        let left = self.numer.checked_mul(other.denom / g)?;
        let right = other.numer.checked_mul(self.denom / g)?;
        let denom = (self.denom / g).checked_mul(other.denom)?;
        Rational::new(left.checked_add(right)?, denom)
    }

    pub fn checked_neg(self) -> Option<Self> {
        Some(Rational {
            numer: self.numer.checked_neg()?,
            denom: self.denom,
        })
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.checked_add(other.checked_neg()?)
    }

    pub fn checked_mul(self, other: Self) -> Option<Self> {
        // cross reduction keeps the intermediate values small
        let g1 = gcd(self.numer, other.denom).max(1);
        let g2 = gcd(other.numer, self.denom).max(1);
        let numer = (self.numer / g1).checked_mul(other.numer / g2)?;
        let denom = (self.denom / g2).checked_mul(other.denom / g1)?;
        Rational::new(numer, denom)
    }

    /// None on division by zero or overflow
    pub fn checked_div(self, other: Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let inverse = Rational::new(other.denom, other.numer)?;
        self.checked_mul(inverse)
    }
}
