use std::ops::{Mul, MulAssign, Neg};
use derive_more::{Display, Debug};
use is_even::IsEven;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Display, Debug)]
#[repr(i8)]
pub enum Sign {
    #[default]
    #[display("+")]
    #[debug("+")]
    Pos = 1,

    #[display("-")]
    #[debug("-")]
    Neg = -1
}

impl Sign {
    pub fn is_positive(&self) -> bool {
        self == &Sign::Pos
    }

    pub fn is_negative(&self) -> bool {
        !self.is_positive()
    }

    pub fn from_parity<I: IsEven>(val: I) -> Self {
        if val.is_even() {
            Sign::Pos
        } else {
            Sign::Neg
        }
    }

    pub fn to_i64(self) -> i64 {
        self.into()
    }
}

macro_rules! impl_int_conversion {
    ($t:tt) => {
        impl From<$t> for Sign {
            fn from(value: $t) -> Self {
                match value {
                     1 => Sign::Pos,
                    -1 => Sign::Neg,
                     _ => panic!()
                }
            }
        }

        impl From<Sign> for $t {
            fn from(value: Sign) -> Self {
                match value {
                    Sign::Pos =>  1,
                    Sign::Neg => -1
                }
            }
        }
    };
}

impl_int_conversion!(i8);
impl_int_conversion!(i16);
impl_int_conversion!(i32);
impl_int_conversion!(i64);
impl_int_conversion!(isize);

impl Neg for Sign {
    type Output = Self;
    fn neg(self) -> Self {
        use Sign::*;
        match self {
            Neg => Pos,
            Pos => Neg
        }
    }
}

impl Mul for Sign {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        if self == rhs { Sign::Pos } else { Sign::Neg }
    }
}

impl MulAssign for Sign {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ord() {
        assert!(Sign::Neg < Sign::Pos)
    }

    #[test]
    fn to_string() {
        assert_eq!(&Sign::Neg.to_string(), "-");
        assert_eq!(&Sign::Pos.to_string(), "+");
    }

    #[test]
    fn mul() {
        assert_eq!(Sign::Pos * Sign::Neg, Sign::Neg);
        assert_eq!(Sign::Neg * Sign::Neg, Sign::Pos);
    }

    #[test]
    fn from_parity() {
        assert_eq!(Sign::from_parity(0), Sign::Pos);
        assert_eq!(Sign::from_parity(3), Sign::Neg);
    }
}
