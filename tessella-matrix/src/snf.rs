use std::cmp::min;
use log::{debug, trace};
use tessella::{EucRing, EucRingOps};
use num_traits::Zero;
use crate::{Mat, MatType};

pub type SnfFlags = [bool; 4];

/// Smith normal form `p * a * q = d` with `d` diagonal and each diagonal
/// entry dividing the next. The four flags select which of `p`, `p⁻¹`,
/// `q`, `q⁻¹` are tracked.
pub fn snf<R>(target: &Mat<R>, flags: SnfFlags) -> SnfResult<R>
where R: EucRing, for<'a> &'a R: EucRingOps<R> {
    let copy = target.clone();
    snf_in_place(copy, flags)
}

pub fn snf_in_place<R>(target: Mat<R>, flags: SnfFlags) -> SnfResult<R>
where R: EucRing, for<'a> &'a R: EucRingOps<R> {
    debug!("start snf: {:?}, flags: {:?}.", target.shape(), flags);

    let mut calc = SnfCalc::new(target, flags);
    calc.process();

    debug!("snf done.");

    calc.result()
}

#[derive(Debug)]
pub struct SnfResult<R>
where R: EucRing, for<'a> &'a R: EucRingOps<R> {
    result: Mat<R>,
    p:    Option<Mat<R>>,
    pinv: Option<Mat<R>>,
    q:    Option<Mat<R>>,
    qinv: Option<Mat<R>>
}

impl<R> SnfResult<R>
where R: EucRing, for<'a> &'a R: EucRingOps<R> {
    pub fn result(&self) -> &Mat<R> {
        &self.result
    }

    pub fn p(&self) -> Option<&Mat<R>> {
        self.p.as_ref()
    }

    pub fn pinv(&self) -> Option<&Mat<R>> {
        self.pinv.as_ref()
    }

    pub fn q(&self) -> Option<&Mat<R>> {
        self.q.as_ref()
    }

    pub fn qinv(&self) -> Option<&Mat<R>> {
        self.qinv.as_ref()
    }

    pub fn destruct(self) -> (Mat<R>, [Option<Mat<R>>; 4]) {
        (self.result, [self.p, self.pinv, self.q, self.qinv])
    }

    pub fn rank(&self) -> usize {
        let n = min(self.result.nrows(), self.result.ncols());
        (0..n).find(|&i| self.result[(i, i)].is_zero()).unwrap_or(n)
    }

    pub fn factors(&self) -> Vec<&R> {
        let n = min(self.result.nrows(), self.result.ncols());
        (0..n).filter_map(|i| {
            let a = &self.result[(i, i)];
            if !a.is_zero() {
                Some(a)
            } else {
                None
            }
         }).collect()
    }
}

#[derive(Debug)]
struct SnfCalc<R>
where R: EucRing, for<'a> &'a R: EucRingOps<R> {
    target: Mat<R>,
    p:    Option<Mat<R>>,
    pinv: Option<Mat<R>>,
    q:    Option<Mat<R>>,
    qinv: Option<Mat<R>>
}

impl<R> SnfCalc<R>
where R: EucRing, for<'a> &'a R: EucRingOps<R> {
    fn new(target: Mat<R>, flags: SnfFlags) -> Self {
        let id_opt = |size, flag| {
            if flag { Some(Mat::id(size)) } else { None }
        };

        let (m, n) = target.shape();
        let p    = id_opt(m, flags[0]);
        let pinv = id_opt(m, flags[1]);
        let q    = id_opt(n, flags[2]);
        let qinv = id_opt(n, flags[3]);

        SnfCalc{ target, p, pinv, q, qinv }
    }

    fn result(self) -> SnfResult<R> {
        SnfResult {
            result: self.target,
            p: self.p,
            pinv: self.pinv,
            q: self.q,
            qinv: self.qinv
        }
    }

    fn process(&mut self) {
        if self.target.is_zero() {
            return
        }

        self.eliminate_all();
        self.diag_normalize();
    }

    fn eliminate_all(&mut self) {
        let (m, n) = self.target.shape();
        let mut i = 0;

        for j in 0..n {
            if i >= m { break }
            if self.eliminate_step(i, j) {
                i += 1;
            }
        }
    }

    fn eliminate_step(&mut self, i: usize, j: usize) -> bool {
        let Some(i_p) = self.select_pivot(i, j) else {
            return false
        };

        trace!("select-pivot: ({i_p}, {j})");

        if i_p > i {
            self.swap_rows(i, i_p);
        }

        if j > i {
            self.swap_cols(i, j);
        }

        // normalize pivot
        let u = self.target[(i, i)].normalizing_unit();
        if !u.is_one() {
            self.mul_col(i, &u);
        }

        self.eliminate_at(i, i);

        true
    }

    fn row_nz(&self, i: usize) -> usize {
        (0..self.target.ncols()).filter(|&j| !self.target[(i, j)].is_zero()).count()
    }

    fn col_nz(&self, j: usize) -> usize {
        (0..self.target.nrows()).filter(|&i| !self.target[(i, j)].is_zero()).count()
    }

    fn swap_rows(&mut self, i: usize, j: usize) {
        self.target.swap_rows(i, j);
        if let Some(p) = self.p.as_mut() {
            p.swap_rows(i, j)
        }
        if let Some(pinv) = self.pinv.as_mut() {
            pinv.swap_cols(i, j)
        }
    }

    fn swap_cols(&mut self, i: usize, j: usize) {
        self.target.swap_cols(i, j);
        if let Some(q) = self.q.as_mut() {
            q.swap_cols(i, j)
        }
        if let Some(qinv) = self.qinv.as_mut() {
            qinv.swap_rows(i, j)
        }
    }

    fn mul_row(&mut self, i: usize, u: &R) {
        self.target.mul_row(i, u);
        if let Some(p) = self.p.as_mut() {
            p.mul_row(i, u)
        }
        if let Some(pinv) = self.pinv.as_mut() {
            let Some(uinv) = &u.inv() else { panic!("`u` is not invertible.") };
            pinv.mul_col(i, uinv)
        }
    }

    fn mul_col(&mut self, i: usize, u: &R) {
        self.target.mul_col(i, u);
        if let Some(q) = self.q.as_mut() {
            q.mul_col(i, u)
        }
        if let Some(qinv) = self.qinv.as_mut() {
            let Some(uinv) = &u.inv() else { panic!("`u` is not invertible.") };
            qinv.mul_row(i, uinv)
        }
    }

    // Multiply [a, b; c, d] from left, assuming det = 1.
    fn left_elementary(&mut self, comps: [&R; 4], i: usize, j: usize) {
        let [a, b, c, d] = comps;
        debug_assert!((a * d - b * c).is_one());

        self.target.left_elementary(comps, i, j);
        if let Some(p) = self.p.as_mut() {
            p.left_elementary(comps, i, j)
        }
        if let Some(pinv) = self.pinv.as_mut() {
            let inv_t = [d, &-c, &-b, a];
            pinv.right_elementary(inv_t, i, j)
        }
    }

    // Multiply [a, c; b, d] from right, assuming det = 1.
    fn right_elementary(&mut self, comps: [&R; 4], i: usize, j: usize) {
        let [a, b, c, d] = comps;
        debug_assert!((a * d - b * c).is_one());

        self.target.right_elementary(comps, i, j);
        if let Some(q) = self.q.as_mut() {
            q.right_elementary(comps, i, j)
        }
        if let Some(qinv) = self.qinv.as_mut() {
            let inv_t = [d, &-c, &-b, a];
            qinv.left_elementary(inv_t, i, j)
        }
    }

    fn select_pivot(&self, below_i: usize, j: usize) -> Option<usize> {
        // the row with fewest non-zero entries wins
        (below_i..self.target.nrows())
            .filter( |i| !self.target[(*i, j)].is_zero() )
            .map( |i| (i, self.row_nz(i)) )
            .min_by( |e1, e2| e1.1.cmp(&e2.1) )
            .map( |(i, _)| i )
    }

    fn eliminate_at(&mut self, i: usize, j: usize) {
        assert!(!self.target[(i, j)].is_zero());

        while self.row_nz(i) > 1 || self.col_nz(j) > 1 {
            let modified = self.eliminate_col(i, j)
                         | self.eliminate_row(i, j);
            if !modified {
                panic!("Detect endless loop");
            }
        }
    }

    fn eliminate_row(&mut self, i: usize, j: usize) -> bool {
        let mut modified = false;

        for j1 in 0..self.target.ncols() {
            if j == j1 || self.target[(i, j1)].is_zero() { continue }

            // d = sx + ty,
            // a = x/d,
            // b = y/d.
            //
            // [x y][s -b] = [d 0]
            //      [t  a]

            let x = &self.target[(i, j )];
            let y = &self.target[(i, j1)];

            let (d, s, t) = Self::gcdx(x, y);
            let (a, b) = (x / &d, y / &d);

            self.right_elementary(
                [&s, &t, &-b, &a],
                j, j1
            );
            modified = true
        }

        modified
    }

    fn eliminate_col(&mut self, i: usize, j: usize) -> bool {
        let mut modified = false;

        for i1 in 0..self.target.nrows() {
            if i == i1 || self.target[(i1, j)].is_zero() { continue }

            // d = sx + ty,
            // a = x/d,
            // b = y/d.
            //
            // [ s t][x] < i  = [d]
            // [-b a][y] < i1   [0]

            let x = &self.target[(i , j)];
            let y = &self.target[(i1, j)];

            let (d, s, t) = Self::gcdx(x, y);
            let (a, b) = (x / &d, y / &d);

            self.left_elementary(
                [&s, &t, &-b, &a],
                i, i1
            );
            modified = true
        }

        modified
    }

    fn diag_normalize(&mut self) {
        debug_assert!(self.target.is_diag());

        let n = min(self.target.nrows(), self.target.ncols());
        let r = (0..n).find(|&i|
            self.target[(i, i)].is_zero()
        ).unwrap_or(n);

        if r == 0 {
            return
        }

        'outer: loop {
            for i in 0..r-1 {
                if !self.diag_normalize_step(i) {
                    continue 'outer
                }
            }
            break
        }

        for i in 0..r {
            let a = &self.target[(i, i)];
            let u = a.normalizing_unit();
            if !u.is_one() {
                self.mul_row(i, &u);
            }
        }
    }

    fn diag_normalize_step(&mut self, i: usize) -> bool {
        let x = &self.target[(i, i)];
        let y = &self.target[(i + 1, i + 1)];

        assert!(!x.is_zero());
        assert!(!y.is_zero());

        if x.divides(y) {
            return true
        }

        if y.divides(x) {
            self.swap_rows(i, i + 1);
            self.swap_cols(i, i + 1);
            return false
        }

        // perform gcd:
        //
        // sx + ty = d, a = x/d, b = y/d.
        //
        // [1   1 ][x   ][s  -b] = [d      ]
        // [-tb sa][   y][t   a]   [   xy/d]

        let (d, s, t) = Self::gcdx(x, y);
        let (a, b) = (x / &d, y / &d);
        let (tb, sa) = (&t * &b, &s * &a);

        self.left_elementary(
            [&R::one(), &R::one(), &-tb, &sa],
            i, i + 1
        );
        self.right_elementary(
            [&s, &t, &-b, &a],
            i, i + 1
        );

        false
    }

    fn gcdx(x: &R, y: &R) -> (R, R, R) {
        let (d, s, t) = EucRing::gcdx(x, y);

        let a = x / &d;
        if a.is_unit() {
            (d, a, R::zero())
        } else {
            (d, s, t)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;
    use rand::Rng;

    fn verify<R>(a: &Mat<R>, s: &SnfResult<R>)
    where R: EucRing, for<'x> &'x R: EucRingOps<R> {
        let d = s.result();
        assert!(d.is_diag());

        let (p, q) = (s.p().unwrap(), s.q().unwrap());
        assert_eq!(&(&(p * a) * q), d);

        assert!(&(s.p().unwrap() * s.pinv().unwrap())
            .is_id());
        assert!(&(s.q().unwrap() * s.qinv().unwrap())
            .is_id());

        let fs = s.factors();
        for k in 1..fs.len() {
            assert!(fs[k - 1].divides(fs[k]));
        }
    }

    #[test]
    fn zero() {
        let a: Mat<i64> = Mat::zero((2, 3));
        let s = snf(&a, [true; 4]);
        assert!(s.result().is_zero());
        assert_eq!(s.rank(), 0);
    }

    #[test]
    fn id() {
        let a: Mat<i64> = Mat::id(3);
        let s = snf(&a, [true; 4]);
        assert_eq!(s.rank(), 3);
        verify(&a, &s);
    }

    #[test]
    fn basic() {
        let a: Mat<i64> = Mat::from_data((3, 3), [
            2, 4, 4,
            -6, 6, 12,
            10, 4, 16
        ]);
        let s = snf(&a, [true; 4]);
        verify(&a, &s);
        assert_eq!(s.factors(), vec![&2, &2, &156]);
    }

    #[test]
    fn rect() {
        let a: Mat<i64> = Mat::from_data((2, 3), [
            1, 2, 3,
            4, 5, 6
        ]);
        let s = snf(&a, [true; 4]);
        verify(&a, &s);
        assert_eq!(s.factors(), vec![&1, &3]);
    }

    #[test]
    fn torsion() {
        // boundary map of RP^2-like complex
        let a: Mat<i64> = Mat::from_data((1, 1), [2]);
        let s = snf(&a, [true; 4]);
        assert_eq!(s.factors(), vec![&2]);
    }

    #[test]
    fn rand_i64() {
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let a: Mat<i64> = Mat::generate((4, 5), |_, _| rng.gen_range(-4..=4));
            let s = snf(&a, [true; 4]);
            verify(&a, &s);
        }
    }

    #[test]
    fn rand_bigint() {
        let mut rng = rand::thread_rng();
        for _ in 0..5 {
            let a: Mat<BigInt> =
                Mat::generate((4, 4), |_, _| BigInt::from(rng.gen_range(-6i64..=6)));
            let s = snf(&a, [true; 4]);
            verify(&a, &s);
        }
    }
}
