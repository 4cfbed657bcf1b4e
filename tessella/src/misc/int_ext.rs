use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive};
use crate::*;

pub trait IntOps<T = Self>: EucRingOps<T> {}

pub trait Integer: EucRing + IntOps + Signed + PartialOrd + Ord + ToPrimitive
where for<'a> &'a Self: EucRingOps<Self> {
    fn from_i64(a: i64) -> Self;

    /// Least non-negative residue mod `m` (`m > 0`).
    fn rem_euclid_by(&self, m: &Self) -> Self {
        let r = self % m;
        if r.is_negative() { r + m.abs() } else { r }
    }
}

macro_rules! impl_ops {
    ($trait:ident, $type:ty) => {
        impl $trait for $type {}
        impl<'a> $trait<$type> for &'a $type {}
    };
}

macro_rules! impl_integer {
    ($type:ident, $from:expr) => {
        impl_ops!(AddMonOps, $type);
        impl_ops!(AddGrpOps, $type);
        impl_ops!(MonOps, $type);
        impl_ops!(RingOps, $type);
        impl_ops!(EucRingOps, $type);
        impl_ops!(IntOps, $type);

        impl Elem for $type {
            fn math_symbol() -> String {
                String::from("Z")
            }
        }

        impl AddMon for $type {}
        impl AddGrp for $type {}
        impl Mon for $type {}
        impl Ring for $type {
            fn inv(&self) -> Option<Self> {
                if self.is_unit() {
                    Some(self.clone())
                } else {
                    None
                }
            }

            fn is_unit(&self) -> bool {
                self.is_one() || (-self).is_one()
            }

            fn normalizing_unit(&self) -> Self {
                if !self.is_negative() {
                    Self::one()
                } else {
                    -Self::one()
                }
            }
        }

        impl EucRing for $type {
            fn gcd(x: &Self, y: &Self) -> Self {
                num_integer::Integer::gcd(x, y)
            }

            fn gcdx(x: &Self, y: &Self) -> (Self, Self, Self) {
                let num_integer::ExtendedGcd{ gcd: d, x: s, y: t } =
                    num_integer::Integer::extended_gcd(x, y);
                (d, s, t)
            }

            fn lcm(x: &Self, y: &Self) -> Self {
                num_integer::Integer::lcm(x, y)
            }
        }

        impl Integer for $type {
            fn from_i64(a: i64) -> Self {
                ($from)(a)
            }
        }
    }
}

impl_integer!(i64, |a| a);
impl_integer!(i128, |a: i64| a as i128);
impl_integer!(BigInt, BigInt::from);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_type() {
        fn check<T>() where T: Integer, for<'a> &'a T: IntOps<T> {}
        check::<i64>();
        check::<i128>();
        check::<BigInt>();
    }

    #[test]
    fn int_is_unit() {
        assert!(1i64.is_unit());
        assert!((-1i64).is_unit());
        assert!(!2i64.is_unit());
    }

    #[test]
    fn int_inv() {
        assert_eq!(1i64.inv(), Some(1));
        assert_eq!((-1i64).inv(), Some(-1));
        assert_eq!(2i64.inv(), None);
    }

    #[test]
    fn rem_euclid_by() {
        assert_eq!((-7i64).rem_euclid_by(&5), 3);
        assert_eq!(7i64.rem_euclid_by(&5), 2);
    }

    #[test]
    fn big_int() {
        let a = BigInt::from(-7);
        let m = BigInt::from(5);
        assert_eq!(a.rem_euclid_by(&m), BigInt::from(3));
    }
}
