use log::trace;
use num_traits::{Zero, One};
use tessella::{Integer, IntOps, EucRing};
use tessella_matrix::{Mat, MatType, snf};

/// A finitely presented abelian group `ker m / im n`, presented by a pair of
/// integer matrices
///
/// ```text
///   Z^a --n--> Z^b --m--> Z^c
/// ```
///
/// together with explicit Smith-normal-form bases for its cycles, boundaries
/// and quotient. A coefficient modulus `coef >= 0` is carried with the group;
/// `coef = 0` means integer coefficients, `coef = p > 0` computes the same
/// homology with `Z_p` coefficients (where the `Tor` part of the universal
/// coefficient theorem shows up as extra cyclic summands).
///
/// All change-of-basis bookkeeping follows the convention
/// `omc * om * omr = snf(om)` with `omri = omr⁻¹`, `omci = omc⁻¹`.
#[derive(Clone, Debug)]
pub struct MarkedAbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    om: Mat<R>,
    on: Mat<R>,
    coef: R,

    omr: Mat<R>,
    omri: Mat<R>,
    rank_om: usize,

    orn_r: Mat<R>,
    orn_c: Mat<R>,
    orn_ci: Mat<R>,

    // mod-p bookkeeping (trivial when coef == 0)
    ot_r: Mat<R>,
    ot_c: Mat<R>,
    ot_ci: Mat<R>,
    tor_vec: Vec<R>,
    tor_loc: usize,
    tensor_if_loc: usize,
    tensor_inv_fac: Vec<R>,

    inv_fac: Vec<R>,
    snf_rank: usize,
    snf_free_index: usize,
    if_num: usize,
    if_loc: usize,
}

impl<R> MarkedAbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    /// The group `ker m / im n` with integer coefficients.
    pub fn new(m: Mat<R>, n: Mat<R>) -> Self {
        Self::with_coef(m, n, R::zero())
    }

    /// The group `ker m / im n` with coefficients in `Z_coef`
    /// (`coef = 0` gives `Z`).
    pub fn with_coef(om: Mat<R>, on: Mat<R>, coef: R) -> Self {
        assert_eq!(om.ncols(), on.nrows());
        assert!(!coef.is_negative());
        trace!("marked abelian group from {:?} x {:?}, coef {}",
            om.shape(), on.shape(), coef);

        let s_m = snf(&om, [false, false, true, true]);
        let rank_om = s_m.rank();
        let omr = s_m.q().unwrap().clone();
        let omri = s_m.qinv().unwrap().clone();

        let omri_n = &omri * &on;
        let b = on.nrows();

        if coef.is_zero() {
            // im n expressed in the kernel basis of m
            let orn = omri_n.submat_rows(rank_om..b);
            let s_orn = snf(&orn, [true, true, true, true]);

            let mut if_loc = 0;
            let mut inv_fac = vec![];
            let d = s_orn.result();
            for i in 0..usize::min(d.nrows(), d.ncols()) {
                let a = &d[(i, i)];
                if a.is_one() {
                    if_loc += 1;
                } else if !a.is_zero() {
                    inv_fac.push(a.clone());
                }
            }

            let if_num = inv_fac.len();
            let snf_rank = orn.nrows() - if_loc - if_num;
            let snf_free_index = if_loc + if_num;

            let (_, [p, pinv, q, _]) = s_orn.destruct();

            Self {
                om, on, coef,
                omr, omri, rank_om,
                orn_r: q.unwrap(),
                orn_c: p.unwrap(), orn_ci: pinv.unwrap(),
                ot_r: Mat::zero((0, 0)), ot_c: Mat::zero((0, 0)),
                ot_ci: Mat::zero((0, 0)),
                tor_vec: vec![], tor_loc: rank_om,
                tensor_if_loc: 0, tensor_inv_fac: vec![],
                inv_fac, snf_rank, snf_free_index, if_num, if_loc,
            }
        } else {
            // diagonal entries of snf(m) sharing a factor with coef
            // contribute Tor terms
            let d_m = s_m.result();
            let mut tor_vec = vec![];
            for i in 0..rank_om {
                if !R::gcd(&d_m[(i, i)], &coef).is_one() {
                    tor_vec.push(d_m[(i, i)].clone());
                }
            }
            let tor_loc = rank_om - tor_vec.len();

            // presentation of H ⊗ Z_p: crop omri * n, pad with coef * I
            let rows = b - rank_om;
            let tensor_pres = Mat::generate(
                (rows, omri_n.ncols() + rows),
                |i, j| if j < omri_n.ncols() {
                    omri_n[(i + rank_om, j)].clone()
                } else if j - omri_n.ncols() == i {
                    coef.clone()
                } else {
                    R::zero()
                });
            let s_t = snf(&tensor_pres, [true, true, true, true]);

            let mut tensor_if_loc = 0;
            let mut tensor_inv_fac = vec![];
            let mut snf_rank = 0;
            let d_t = s_t.result();
            for i in 0..usize::min(d_t.nrows(), d_t.ncols()) {
                let a = &d_t[(i, i)];
                if a.is_one() {
                    tensor_if_loc += 1;
                } else if a.is_zero() {
                    snf_rank += 1;
                } else {
                    tensor_inv_fac.push(a.clone());
                }
            }
            let tensor_if_num = tensor_inv_fac.len();

            // the Tor and tensor cyclic summands need not be in divisibility
            // order, so assemble a diagonal presentation and smith it again
            let sz = tor_vec.len() + tensor_if_num + snf_rank;
            let diag_pres = Mat::generate((sz, sz), |i, j| {
                if i != j {
                    R::zero()
                } else if i < tor_vec.len() {
                    R::gcd(&tor_vec[i], &coef)
                } else {
                    d_t[(i - tor_vec.len() + tensor_if_loc,
                         i - tor_vec.len() + tensor_if_loc)].clone()
                }
            });
            let s_d = snf(&diag_pres, [true, true, true, true]);

            let mut inv_fac = vec![];
            let d_d = s_d.result();
            for i in 0..sz {
                let a = &d_d[(i, i)];
                if !a.is_one() && !a.is_zero() {
                    inv_fac.push(a.clone());
                }
            }
            let if_num = inv_fac.len();
            let snf_free_index = if_num;
            let if_loc = sz - if_num;

            let (_, [p_d, pinv_d, q_d, _]) = s_d.destruct();
            let (_, [p_t, pinv_t, q_t, _]) = s_t.destruct();

            Self {
                om, on, coef,
                omr, omri, rank_om,
                orn_r: q_d.unwrap(),
                orn_c: p_d.unwrap(), orn_ci: pinv_d.unwrap(),
                ot_r: q_t.unwrap(), ot_c: p_t.unwrap(),
                ot_ci: pinv_t.unwrap(),
                tor_vec, tor_loc,
                tensor_if_loc, tensor_inv_fac,
                inv_fac, snf_rank, snf_free_index, if_num, if_loc,
            }
        }
    }

    /// The group `Z^rank / p Z^rank` with its trivial presentation.
    pub fn elementary(rank: usize, p: R) -> Self {
        let m = Mat::zero((rank, rank));
        let n = Mat::diag((rank, rank), (0..rank).map(|_| p.clone()));
        Self::new(m, n)
    }

    pub fn m(&self) -> &Mat<R> { &self.om }
    pub fn n(&self) -> &Mat<R> { &self.on }
    pub fn coef(&self) -> &R { &self.coef }

    /// Dimension of the chain module the group is presented in.
    pub fn rank_cc(&self) -> usize {
        self.om.ncols()
    }

    /// Free rank of the group.
    pub fn rank(&self) -> usize {
        self.snf_rank
    }

    pub fn count_invariant_factors(&self) -> usize {
        self.if_num
    }

    pub fn invariant_factor(&self, i: usize) -> &R {
        &self.inv_fac[i]
    }

    pub fn invariant_factors(&self) -> &[R] {
        &self.inv_fac
    }

    pub fn is_trivial(&self) -> bool {
        self.snf_rank == 0 && self.if_num == 0
    }

    pub fn is_z(&self) -> bool {
        self.snf_rank == 1 && self.if_num == 0
    }

    /// Number of generators in the Smith normal form basis.
    pub fn min_generators(&self) -> usize {
        self.snf_rank + self.if_num
    }

    /// Number of generators of the cycle submodule.
    pub fn min_cycle_generators(&self) -> usize {
        self.rank_cc() - self.tor_loc
    }

    pub fn is_isomorphic_to(&self, other: &Self) -> bool {
        self.snf_rank == other.snf_rank && self.inv_fac == other.inv_fac
    }

    pub fn equal_presentation(&self, other: &Self) -> bool {
        self.om == other.om && self.on == other.on && self.coef == other.coef
    }

    /// Is `m * n == 0` (mod coef)?
    pub fn is_chain_complex(&self) -> bool {
        let prod = &self.om * &self.on;
        if self.coef.is_zero() {
            prod.is_zero()
        } else {
            prod.iter().all(|(_, _, a)| (a % &self.coef).is_zero())
        }
    }

    pub fn is_cycle(&self, chain: &[R]) -> bool {
        if chain.len() != self.rank_cc() { return false }
        let img = self.om.apply(chain);
        if self.coef.is_zero() {
            img.iter().all(|x| x.is_zero())
        } else {
            img.iter().all(|x| (x % &self.coef).is_zero())
        }
    }

    /// `m * chain`, reduced mod coef when working with cyclic coefficients.
    pub fn boundary_of(&self, chain: &[R]) -> Vec<R> {
        let mut out = self.om.apply(chain);
        if !self.coef.is_zero() {
            for x in out.iter_mut() {
                *x = x.rem_euclid_by(&self.coef);
            }
        }
        out
    }

    /// Projection of a chain onto the cycle submodule: truncate the
    /// non-kernel Smith coordinates and come back.
    pub fn cycle_projection(&self, chain: &[R]) -> Option<Vec<R>> {
        if chain.len() != self.rank_cc() { return None }
        let b = self.rank_cc();
        let mut out = vec![R::zero(); b];
        for j in self.rank_om..b {
            let mut c = R::zero();
            for (k, x) in chain.iter().enumerate() {
                if x.is_zero() { continue }
                c += &self.omri[(j, k)] * x;
            }
            if c.is_zero() { continue }
            for i in 0..b {
                out[i] += &self.omr[(i, j)] * &c;
            }
        }
        Some(out)
    }

    pub fn cycle_projection_unit(&self, cc_index: usize) -> Option<Vec<R>> {
        if cc_index >= self.rank_cc() { return None }
        let mut e = vec![R::zero(); self.rank_cc()];
        e[cc_index] = R::one();
        self.cycle_projection(&e)
    }

    /// The `j`-th generator of the cycle submodule: a column of `omr`,
    /// rescaled on the Tor block.
    pub fn cycle_gen(&self, j: usize) -> Option<Vec<R>> {
        if j >= self.min_cycle_generators() { return None }
        let mut out = self.omr.col_vec(j + self.tor_loc);
        if j < self.tor_vec.len() {
            let s = &self.coef / &R::gcd(&self.coef, &self.tor_vec[j]);
            for x in out.iter_mut() {
                *x = &*x * &s;
            }
        }
        Some(out)
    }

    /// Writes a cycle in the Smith normal form coordinates of the group:
    /// first the torsion coordinates (reduced mod their invariant factors),
    /// then the free coordinates. `None` if the input is not a cycle.
    pub fn snf_rep(&self, element: &[R]) -> Option<Vec<R>> {
        if element.len() != self.rank_cc() { return None }
        let b = self.rank_cc();
        let mut temp = vec![R::zero(); b];
        for i in 0..b {
            for (k, x) in element.iter().enumerate() {
                if x.is_zero() { continue }
                temp[i] += &self.omri[(i, k)] * x;
            }
        }

        // cycle test in smith coordinates
        if self.coef.is_zero() {
            if temp[..self.rank_om].iter().any(|x| !x.is_zero()) {
                return None
            }
        } else {
            for i in 0..self.rank_om {
                if i < self.tor_loc {
                    if !(&temp[i] % &self.coef).is_zero() { return None }
                } else {
                    let t = &temp[i] * &self.tor_vec[i - self.tor_loc];
                    if !(&t % &self.coef).is_zero() { return None }
                    let div = &self.coef / &R::gcd(&self.coef, &self.tor_vec[i - self.tor_loc]);
                    temp[i] = &temp[i] / &div;
                }
            }
        }

        let mut out = vec![R::zero(); self.snf_rank + self.if_num];

        if self.coef.is_zero() {
            for i in 0..self.snf_rank {
                for j in self.rank_om..b {
                    out[i + self.if_num] +=
                        &self.orn_c[(i + self.snf_free_index, j - self.rank_om)] * &temp[j];
                }
            }
            for i in 0..self.if_num {
                for j in self.rank_om..b {
                    out[i] += &self.orn_c[(i + self.if_loc, j - self.rank_om)] * &temp[j];
                }
            }
        } else {
            let rows = self.orn_c.nrows();
            let mut diag_v = vec![R::zero(); rows];
            for i in 0..rows {
                if i < self.tor_vec.len() {
                    diag_v[i] = temp[i + self.tor_loc].clone();
                } else {
                    for j in 0..self.ot_c.ncols() {
                        diag_v[i] += &self.ot_c[(i - self.tor_vec.len() + self.tensor_if_loc, j)]
                            * &temp[j + self.rank_om];
                    }
                }
            }
            for i in 0..out.len() {
                for j in 0..rows {
                    out[i] += &self.orn_c[(i, j)] * &diag_v[j];
                }
            }
        }

        for i in 0..self.if_num {
            out[i] = out[i].rem_euclid_by(&self.inv_fac[i]);
        }
        Some(out)
    }

    /// Chain representative of the `j`-th Smith normal form generator
    /// (torsion generators first, then free generators).
    pub fn cc_rep(&self, snf_gen: usize) -> Option<Vec<R>> {
        if snf_gen >= self.snf_rank + self.if_num { return None }
        let b = self.rank_cc();
        let mut out = vec![R::zero(); b];

        if self.coef.is_zero() {
            let col = self.if_loc + snf_gen;
            for i in 0..b {
                for j in 0..self.orn_ci.nrows() {
                    out[i] += &self.omr[(i, j + self.tor_loc)] * &self.orn_ci[(j, col)];
                }
            }
        } else {
            let col = snf_gen + self.if_loc;
            let t = self.tor_vec.len();
            let mut first = vec![R::zero(); t];
            let mut second = vec![R::zero(); self.orn_c.nrows() - t];
            for (i, f) in first.iter_mut().enumerate() {
                *f = self.orn_ci[(i, col)].clone();
            }
            for (i, s) in second.iter_mut().enumerate() {
                *s = self.orn_ci[(i + t, col)].clone();
            }
            for (i, f) in first.iter_mut().enumerate() {
                let s = &self.coef / &R::gcd(&self.tor_vec[i], &self.coef);
                *f = &*f * &s;
            }
            let ot_ci = &self.ot_ci;
            let mut second_up = vec![R::zero(); ot_ci.nrows()];
            for i in 0..ot_ci.nrows() {
                for (j, s) in second.iter().enumerate() {
                    second_up[i] += &ot_ci[(i, j + self.tensor_if_loc)] * s;
                }
            }
            for i in 0..b {
                for (j, f) in first.iter().enumerate() {
                    out[i] += &self.omr[(i, self.tor_loc + j)] * f;
                }
                for (j, s) in second_up.iter().enumerate() {
                    out[i] += &self.omr[(i, self.rank_om + j)] * s;
                }
            }
        }
        Some(out)
    }

    /// Chain representative of the `i`-th torsion generator.
    pub fn torsion_rep(&self, i: usize) -> Option<Vec<R>> {
        if i >= self.if_num { return None }
        self.cc_rep(i)
    }

    /// Chain representative of the `i`-th free generator.
    pub fn free_rep(&self, i: usize) -> Option<Vec<R>> {
        if i >= self.snf_rank { return None }
        self.cc_rep(self.if_num + i)
    }

    pub fn is_boundary(&self, chain: &[R]) -> bool {
        match self.snf_rep(chain) {
            Some(rep) => rep.iter().all(|x| x.is_zero()),
            None => false,
        }
    }

    /// Solves `n * x = chain` for a cycle lying in the image of `n`;
    /// `None` if the chain is not a boundary.
    pub fn write_as_boundary(&self, chain: &[R]) -> Option<Vec<R>> {
        if !self.is_cycle(chain) { return None }
        let b = self.rank_cc();
        let mut temp = vec![R::zero(); b];
        for i in 0..b {
            for (k, x) in chain.iter().enumerate() {
                if x.is_zero() { continue }
                temp[i] += &self.omri[(i, k)] * x;
            }
        }
        for i in 0..self.tor_vec.len() {
            if !(&temp[self.tor_loc + i] % &self.coef).is_zero() {
                return None
            }
        }

        let mut out = vec![R::zero(); self.on.ncols()];
        if self.coef.is_zero() {
            let rows = self.orn_c.nrows();
            let mut snf_v = vec![R::zero(); rows];
            for i in 0..rows {
                for j in 0..self.orn_c.ncols() {
                    snf_v[i] += &self.orn_c[(i, j)] * &temp[j + self.rank_om];
                }
            }
            for i in 0..self.if_num {
                let f = &self.inv_fac[i];
                if !(&snf_v[i + self.if_loc] % f).is_zero() {
                    return None
                }
                snf_v[i + self.if_loc] = &snf_v[i + self.if_loc] / f;
            }
            for i in 0..self.snf_rank {
                if !snf_v[i + self.snf_free_index].is_zero() {
                    return None
                }
            }
            for i in 0..self.orn_r.nrows().min(out.len()) {
                for j in 0..self.snf_free_index {
                    out[i] += &self.orn_r[(i, j)] * &snf_v[j];
                }
            }
            Some(out)
        } else {
            let ot_c = &self.ot_c;
            let mut tensor_v = vec![R::zero(); ot_c.nrows()];
            for i in 0..ot_c.nrows() {
                for j in 0..ot_c.ncols() {
                    tensor_v[i] += &ot_c[(i, j)] * &temp[j + self.rank_om];
                }
            }
            for (i, f) in self.tensor_inv_fac.iter().enumerate() {
                let k = i + self.tensor_if_loc;
                if !(&tensor_v[k] % f).is_zero() {
                    return None
                }
                tensor_v[k] = &tensor_v[k] / f;
            }
            for i in 0..out.len().min(self.ot_r.nrows()) {
                for (j, t) in tensor_v.iter().enumerate() {
                    out[i] += &self.ot_r[(i, j)] * t;
                }
            }
            Some(out)
        }
    }

    /// The torsion subgroup with its trivial presentation.
    pub fn torsion_subgroup(&self) -> Self {
        let k = self.if_num;
        let m = Mat::zero((1, k));
        let n = Mat::diag((k, k), self.inv_fac.iter().cloned());
        Self::new(m, n)
    }

    // internal accessors shared with the homomorphism code

    pub(crate) fn omr(&self) -> &Mat<R> { &self.omr }
    pub(crate) fn omri(&self) -> &Mat<R> { &self.omri }
    pub(crate) fn orn_c(&self) -> &Mat<R> { &self.orn_c }
    pub(crate) fn orn_ci(&self) -> &Mat<R> { &self.orn_ci }
    pub(crate) fn ot_c(&self) -> &Mat<R> { &self.ot_c }
    pub(crate) fn tor_vec(&self) -> &[R] { &self.tor_vec }
    pub(crate) fn tor_loc(&self) -> usize { self.tor_loc }
    pub(crate) fn if_loc(&self) -> usize { self.if_loc }
    pub(crate) fn tensor_if_loc(&self) -> usize { self.tensor_if_loc }
    pub(crate) fn rank_om(&self) -> usize { self.rank_om }

    pub(crate) fn ot_ci(&self) -> &Mat<R> { &self.ot_ci }
}

/// Inverse of a unimodular square matrix, via Smith normal form.
pub(crate) fn invert_unimodular<R>(a: &Mat<R>) -> Mat<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    if a.nrows() == 0 {
        return Mat::zero((0, 0))
    }
    assert!(a.is_square());
    let s = snf(a, [true, false, true, false]);
    let d = s.result();
    assert!((0..d.nrows()).all(|i| d[(i, i)].is_one()),
        "matrix is not unimodular");
    // p a q = 1  =>  a⁻¹ = q p
    s.q().unwrap() * s.p().unwrap()
}

impl<R> std::fmt::Display for MarkedAbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", tessella::util::group_symbol(self.snf_rank, &self.inv_fac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type M = MarkedAbelianGroup<i64>;

    fn zn_chain(ds: &[i64]) -> M {
        // Z^k / im diag(ds)
        let k = ds.len();
        let m = Mat::zero((1, k));
        let n = Mat::diag((k, k), ds.iter().cloned());
        M::new(m, n)
    }

    #[test]
    fn free() {
        let g = M::elementary(3, 0);
        assert_eq!(g.rank(), 3);
        assert_eq!(g.count_invariant_factors(), 0);
        assert!(!g.is_trivial());
        assert_eq!(g.to_string(), "Z^3");
    }

    #[test]
    fn cyclic() {
        let g = zn_chain(&[5]);
        assert_eq!(g.rank(), 0);
        assert_eq!(g.invariant_factors(), &[5]);
        assert_eq!(g.to_string(), "Z_5");
    }

    #[test]
    fn divisibility_normalized() {
        let g = zn_chain(&[4, 6]);
        assert_eq!(g.rank(), 0);
        assert_eq!(g.invariant_factors(), &[2, 12]);
    }

    #[test]
    fn trivial_factors_dropped() {
        let g = zn_chain(&[1, 1, 3]);
        assert_eq!(g.invariant_factors(), &[3]);
        assert_eq!(g.rank(), 0);
    }

    #[test]
    fn mixed() {
        let g = zn_chain(&[2, 0]);
        assert_eq!(g.rank(), 1);
        assert_eq!(g.invariant_factors(), &[2]);
    }

    #[test]
    fn nontrivial_kernel() {
        // 0 -> Z^2 --[[1],[1]] col--> ... m = [1, -1]
        let m = Mat::from_data((1, 2), [1, -1]);
        let n = Mat::zero((2, 1));
        let g = M::new(m, n);
        assert_eq!(g.rank(), 1);
        assert_eq!(g.count_invariant_factors(), 0);

        // its generator is a cycle
        let z = g.cc_rep(0).unwrap();
        assert!(g.is_cycle(&z));
        assert_eq!(g.snf_rep(&z).unwrap(), vec![1]);
    }

    #[test]
    fn snf_rep_detects_non_cycles() {
        let m = Mat::from_data((1, 2), [1, -1]);
        let n = Mat::zero((2, 1));
        let g = M::new(m, n);
        assert!(g.snf_rep(&[1, 0]).is_none());
        assert!(g.snf_rep(&[1, 1]).is_some());
    }

    #[test]
    fn torsion_rep_has_right_order() {
        let g = zn_chain(&[0, 4]);
        assert_eq!(g.rank(), 1);
        assert_eq!(g.invariant_factors(), &[4]);

        let t = g.torsion_rep(0).unwrap();
        assert!(g.is_cycle(&t));
        // 4t is a boundary, t is not
        let t4: Vec<i64> = t.iter().map(|x| 4 * x).collect();
        assert!(g.is_boundary(&t4));
        assert!(!g.is_boundary(&t));
    }

    #[test]
    fn write_as_boundary() {
        let g = zn_chain(&[3, 0]);
        let t = g.torsion_rep(0).unwrap();
        let t3: Vec<i64> = t.iter().map(|x| 3 * x).collect();
        let pre = g.write_as_boundary(&t3).unwrap();
        let img = g.n().apply(&pre);
        assert_eq!(img, t3);
        assert!(g.write_as_boundary(&t).is_none());
    }

    #[test]
    fn mod_p() {
        // H = Z with Z_2 coefficients -> Z_2
        let g = M::with_coef(Mat::zero((1, 1)), Mat::zero((1, 1)), 2);
        assert_eq!(g.rank(), 0);
        assert_eq!(g.invariant_factors(), &[2]);
    }

    #[test]
    fn mod_p_torsion() {
        // H = Z_2 with Z_2 coefficients: Z_2 (tensor part only here,
        // since the Tor part sits one dimension down)
        let m = Mat::zero((1, 1));
        let n = Mat::from_data((1, 1), [2]);
        let g = M::with_coef(m, n, 2);
        assert_eq!(g.rank(), 0);
        assert_eq!(g.invariant_factors(), &[2]);
    }

    #[test]
    fn mod_p_tor_part() {
        // chain complex Z --2--> Z --0--> 0 at the bottom degree:
        // m = [2] (1x1), n = zero. H_0 = ker(2 mod 2)/0 = Z_2 over Z_2,
        // via the Tor correction.
        let m = Mat::from_data((1, 1), [2]);
        let n = Mat::zero((1, 1));
        let g = M::with_coef(m, n, 2);
        assert_eq!(g.rank(), 0);
        assert_eq!(g.invariant_factors(), &[2]);
    }

    #[test]
    fn cycle_projection() {
        let m = Mat::from_data((1, 2), [1, -1]);
        let n = Mat::zero((2, 1));
        let g = M::new(m, n);
        let p = g.cycle_projection(&[1, 1]).unwrap();
        assert_eq!(p, vec![1, 1]);
        let q = g.cycle_projection_unit(0).unwrap();
        assert!(g.is_cycle(&q) || q.iter().all(|x| *x == 0));
    }

    #[test]
    fn torsion_subgroup() {
        let g = zn_chain(&[2, 4, 0]);
        let t = g.torsion_subgroup();
        assert_eq!(t.rank(), 0);
        assert_eq!(t.invariant_factors(), &[2, 4]);
    }

    #[test]
    fn elementary_cyclic() {
        let g = M::elementary(1, 5);
        assert_eq!(g.invariant_factors(), &[5]);
        assert!(g.is_isomorphic_to(&zn_chain(&[5])));
    }
}
