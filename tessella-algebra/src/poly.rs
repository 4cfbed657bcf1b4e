use std::ops::{Add, AddAssign, Mul};
use num_traits::Zero;
use tessella::{Integer, IntOps};

/// A dense single-variable polynomial with integer coefficients, ascending
/// powers. Just enough surface for Poincaré polynomials and the
/// characteristic-polynomial signature count.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntPoly<R> {
    coeffs: Vec<R>,
}

impl<R> IntPoly<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    pub fn new(coeffs: Vec<R>) -> Self {
        let mut p = Self { coeffs };
        p.trim();
        p
    }

    pub fn zero() -> Self {
        Self { coeffs: vec![] }
    }

    pub fn one() -> Self {
        Self { coeffs: vec![R::one()] }
    }

    /// The monomial `c t^k`.
    pub fn monomial(c: R, k: usize) -> Self {
        if c.is_zero() {
            return Self::zero()
        }
        let mut coeffs = vec![R::zero(); k + 1];
        coeffs[k] = c;
        Self { coeffs }
    }

    fn trim(&mut self) {
        while self.coeffs.last().map_or(false, |c| c.is_zero()) {
            self.coeffs.pop();
        }
    }

    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    pub fn degree(&self) -> Option<usize> {
        if self.coeffs.is_empty() {
            None
        } else {
            Some(self.coeffs.len() - 1)
        }
    }

    pub fn coeff(&self, k: usize) -> R {
        self.coeffs.get(k).cloned().unwrap_or_else(R::zero)
    }

    pub fn coeffs(&self) -> &[R] {
        &self.coeffs
    }

    pub fn eval(&self, x: &R) -> R {
        let mut acc = R::zero();
        for c in self.coeffs.iter().rev() {
            acc = &acc * x + c;
        }
        acc
    }

    /// Number of sign changes in the coefficient sequence; by Descartes'
    /// rule this counts the positive roots when all roots are real.
    pub fn sign_changes(&self) -> usize {
        let mut changes = 0;
        let mut last = 0i8;
        for c in &self.coeffs {
            if c.is_zero() { continue }
            let s = if c.is_positive() { 1 } else { -1 };
            if last != 0 && s != last {
                changes += 1;
            }
            last = s;
        }
        changes
    }

    /// `p(-t)`.
    pub fn flip(&self) -> Self {
        let coeffs = self.coeffs.iter().enumerate().map(|(k, c)| {
            if k % 2 == 1 { -c } else { c.clone() }
        }).collect();
        Self::new(coeffs)
    }
}

impl<R> Add for IntPoly<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        let n = self.coeffs.len().max(rhs.coeffs.len());
        let mut coeffs = vec![R::zero(); n];
        for (k, c) in self.coeffs.into_iter().enumerate() {
            coeffs[k] += c;
        }
        for (k, c) in rhs.coeffs.into_iter().enumerate() {
            coeffs[k] += c;
        }
        Self::new(coeffs)
    }
}

impl<R> AddAssign for IntPoly<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    fn add_assign(&mut self, rhs: Self) {
        *self = self.clone() + rhs;
    }
}

impl<R> Mul for IntPoly<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self.is_zero() || rhs.is_zero() {
            return Self::zero()
        }
        let mut coeffs =
            vec![R::zero(); self.coeffs.len() + rhs.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() { continue }
            for (j, b) in rhs.coeffs.iter().enumerate() {
                coeffs[i + j] += a * b;
            }
        }
        Self::new(coeffs)
    }
}

impl<R> std::fmt::Display for IntPoly<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "0")
        }
        let mut first = true;
        for (k, c) in self.coeffs.iter().enumerate() {
            if c.is_zero() { continue }
            let (sign, mag) = if c.is_negative() {
                ("-", -c)
            } else {
                ("+", c.clone())
            };
            if first {
                if sign == "-" { write!(f, "-")? }
            } else {
                write!(f, " {sign} ")?;
            }
            first = false;
            match k {
                0 => write!(f, "{mag}")?,
                _ => {
                    if !mag.is_one() {
                        write!(f, "{mag}")?;
                    }
                    if k == 1 {
                        write!(f, "t")?;
                    } else {
                        write!(f, "t^{k}")?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type P = IntPoly<i64>;

    #[test]
    fn display() {
        let p = P::new(vec![1, 0, 0, 1]);
        assert_eq!(p.to_string(), "1 + t^3");
        let q = P::new(vec![1, 2, 1]);
        assert_eq!(q.to_string(), "1 + 2t + t^2");
        assert_eq!(P::zero().to_string(), "0");
    }

    #[test]
    fn eval() {
        let p = P::new(vec![1, 0, 0, 1]);
        assert_eq!(p.eval(&-1), 0);
        assert_eq!(p.eval(&2), 9);
    }

    #[test]
    fn arithmetic() {
        let p = P::monomial(1, 1) + P::one();       // 1 + t
        let q = p.clone() * p.clone();              // 1 + 2t + t^2
        assert_eq!(q.coeffs(), &[1, 2, 1]);
    }

    #[test]
    fn descartes() {
        // (t - 1)(t - 2) = t^2 - 3t + 2: two positive roots
        let p = P::new(vec![2, -3, 1]);
        assert_eq!(p.sign_changes(), 2);
        assert_eq!(p.flip().sign_changes(), 0);
        // (t + 1)(t - 1) = t^2 - 1
        let q = P::new(vec![-1, 0, 1]);
        assert_eq!(q.sign_changes(), 1);
        assert_eq!(q.flip().sign_changes(), 1);
    }
}
