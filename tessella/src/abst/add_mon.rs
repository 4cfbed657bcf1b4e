use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use num_traits::Zero;
use crate::Elem;

// Additive monoids

pub trait AddMonOps<T = Self>:
    Sized +
    Add<T, Output = T> +
    for<'a> Add<&'a T, Output = T>
{}

pub trait AddMon:
    Elem +
    AddMonOps +
    AddAssign +
    for<'a> AddAssign<&'a Self> +
    Sum<Self> +
    for<'a> Sum<&'a Self> +
    Zero
where
    for<'a> &'a Self: AddMonOps<Self>
{}

// Additive groups

pub trait AddGrpOps<T = Self>:
    AddMonOps<T> +
    Neg<Output = T> +
    Sub<T, Output = T> +
    for<'a> Sub<&'a T, Output = T>
{}

pub trait AddGrp:
    AddMon +
    AddGrpOps +
    SubAssign +
    for<'a> SubAssign<&'a Self>
where
    for<'a> &'a Self: AddGrpOps<Self>
{}
