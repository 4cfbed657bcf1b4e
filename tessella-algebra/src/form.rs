use num_traits::{One, ToPrimitive, Zero};
use tessella::{Integer, IntOps, EucRing};
use tessella::primes::{Primes, legendre_symbol};
use tessella_matrix::{Mat, MatType, SparseGrid};
use crate::{HomMarkedAbelianGroup, IntPoly, MarkedAbelianGroup};

/// A bilinear form `L x R -> T` of marked abelian groups, described by a
/// sparse 3-tensor on chain representatives: entry `(i, j, k) -> v` says
/// that the pairing of the `i`-th and `j`-th chain generators has `v` as its
/// `k`-th chain coordinate in the range.
///
/// Alongside the chain-level tensor a reduced pairing is computed, written
/// in the Smith normal form generators of all three groups.
#[derive(Clone, Debug)]
pub struct BilinearForm<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    ldomain: MarkedAbelianGroup<R>,
    rdomain: MarkedAbelianGroup<R>,
    range: MarkedAbelianGroup<R>,
    pairing: SparseGrid<R>,
    reduced: SparseGrid<R>,
}

impl<R> BilinearForm<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    pub fn new(ldomain: MarkedAbelianGroup<R>,
               rdomain: MarkedAbelianGroup<R>,
               range: MarkedAbelianGroup<R>,
               pairing: SparseGrid<R>) -> Self {
        assert_eq!(pairing.arity(), 3);

        let mut reduced = SparseGrid::new(3);
        for i in 0..ldomain.min_generators() {
            let lv = ldomain.cc_rep(i).unwrap();
            for j in 0..rdomain.min_generators() {
                let rv = rdomain.cc_rep(j).unwrap();
                let mut eval_cc = vec![R::zero(); range.rank_cc()];
                for (idx, v) in pairing.iter() {
                    let t = &(&lv[idx[0]] * &rv[idx[1]]) * v;
                    eval_cc[idx[2]] += t;
                }
                let eval_snf = range.snf_rep(&eval_cc)
                    .expect("pairing does not land in cycles");
                for (k, v) in eval_snf.into_iter().enumerate() {
                    if !v.is_zero() {
                        reduced.set(&[i, j, k], v);
                    }
                }
            }
        }

        Self { ldomain, rdomain, range, pairing, reduced }
    }

    pub fn ldomain(&self) -> &MarkedAbelianGroup<R> { &self.ldomain }
    pub fn rdomain(&self) -> &MarkedAbelianGroup<R> { &self.rdomain }
    pub fn range(&self) -> &MarkedAbelianGroup<R> { &self.range }
    pub fn pairing(&self) -> &SparseGrid<R> { &self.pairing }
    pub fn reduced_pairing(&self) -> &SparseGrid<R> { &self.reduced }

    /// Evaluates the form on two chains, in the chain coordinates of the
    /// range. `None` on a dimension mismatch.
    pub fn eval_cc(&self, lcc: &[R], rcc: &[R]) -> Option<Vec<R>> {
        if lcc.len() != self.ldomain.rank_cc()
            || rcc.len() != self.rdomain.rank_cc() {
            return None
        }
        let mut out = vec![R::zero(); self.range.rank_cc()];
        for (idx, v) in self.pairing.iter() {
            let t = &(&lcc[idx[0]] * &rcc[idx[1]]) * v;
            out[idx[2]] += t;
        }
        Some(out)
    }

    /// Evaluates the form on SNF generators of the two domains, in the SNF
    /// coordinates of the range (reduced mod its invariant factors).
    pub fn eval_snf_gens(&self, i: usize, j: usize) -> Vec<R> {
        let n = self.range.min_generators();
        let mut out = vec![R::zero(); n];
        for k in 0..n {
            if let Some(v) = self.reduced.get(&[i, j, k]) {
                out[k] = v.clone();
            }
        }
        for (k, x) in out.iter_mut().enumerate() {
            if k < self.range.count_invariant_factors() {
                *x = x.rem_euclid_by(self.range.invariant_factor(k));
            }
        }
        out
    }

    pub fn is_symmetric(&self) -> bool {
        if !self.ldomain.equal_presentation(&self.rdomain) {
            return false
        }
        self.reduced.iter().all(|(idx, v)| {
            match self.reduced.get(&[idx[1], idx[0], idx[2]]) {
                Some(w) => v == w,
                None => false,
            }
        })
    }

    pub fn is_anti_symmetric(&self) -> bool {
        if !self.ldomain.equal_presentation(&self.rdomain) {
            return false
        }
        self.reduced.iter().all(|(idx, v)| {
            let Some(w) = self.reduced.get(&[idx[1], idx[0], idx[2]]) else {
                return false
            };
            let s = v + w;
            if idx[2] < self.range.count_invariant_factors() {
                (&s % self.range.invariant_factor(idx[2])).is_zero()
            } else {
                s.is_zero()
            }
        })
    }

    /// Precomposes the left slot with `f` (which must land in the left
    /// domain).
    pub fn l_compose(&self, f: &HomMarkedAbelianGroup<R>) -> Self {
        debug_assert!(self.ldomain.equal_presentation(f.codomain()));
        let mut pairing = SparseGrid::new(3);
        for i in 0..f.domain().rank_cc() {
            for (idx, v) in self.pairing.iter() {
                let c = &f.defining_matrix()[(idx[0], i)] * v;
                if !c.is_zero() {
                    pairing.accumulate(&[i, idx[1], idx[2]], c);
                }
            }
        }
        Self::new(f.domain().clone(), self.rdomain.clone(),
                  self.range.clone(), pairing)
    }

    /// Precomposes the right slot with `f`.
    pub fn r_compose(&self, f: &HomMarkedAbelianGroup<R>) -> Self {
        debug_assert!(self.rdomain.equal_presentation(f.codomain()));
        let mut pairing = SparseGrid::new(3);
        for i in 0..f.domain().rank_cc() {
            for (idx, v) in self.pairing.iter() {
                let c = &f.defining_matrix()[(idx[1], i)] * v;
                if !c.is_zero() {
                    pairing.accumulate(&[idx[0], i, idx[2]], c);
                }
            }
        }
        Self::new(self.ldomain.clone(), f.domain().clone(),
                  self.range.clone(), pairing)
    }

    /// Postcomposes the range with `f`.
    pub fn post_compose(&self, f: &HomMarkedAbelianGroup<R>) -> Self {
        debug_assert!(self.range.equal_presentation(f.domain()));
        let mut pairing = SparseGrid::new(3);
        for (idx, v) in self.pairing.iter() {
            for i in 0..f.codomain().rank_cc() {
                let c = &f.defining_matrix()[(i, idx[2])] * v;
                if !c.is_zero() {
                    pairing.accumulate(&[idx[0], idx[1], i], c);
                }
            }
        }
        Self::new(self.ldomain.clone(), self.rdomain.clone(),
                  f.codomain().clone(), pairing)
    }

    /// The adjoint `L -> Hom(R, T)`, with both ends in trivial SNF
    /// presentations.
    pub fn left_adjoint(&self) -> HomMarkedAbelianGroup<R> {
        self.adjoint(true)
    }

    /// The adjoint `R -> Hom(L, T)`.
    pub fn right_adjoint(&self) -> HomMarkedAbelianGroup<R> {
        self.adjoint(false)
    }

    fn adjoint(&self, left: bool) -> HomMarkedAbelianGroup<R> {
        let (dom, other) = if left {
            (&self.ldomain, &self.rdomain)
        } else {
            (&self.rdomain, &self.ldomain)
        };
        let og = other.min_generators();
        let tg = self.range.min_generators();
        let hom_gens = og * tg;

        // Hom(other, T) = ⊕_{i,j} Z_{e_ij}
        let m = Mat::zero((1, hom_gens));
        let mut n = Mat::zero((hom_gens, hom_gens));
        for i in 0..og {
            for j in 0..tg {
                let k = i * tg + j;
                n[(k, k)] = match (i < other.count_invariant_factors(),
                                   j < self.range.count_invariant_factors()) {
                    (true, true) => R::gcd(other.invariant_factor(i),
                                           self.range.invariant_factor(j)),
                    (true, false) => R::one(),
                    (false, true) => self.range.invariant_factor(j).clone(),
                    (false, false) => R::zero(),
                };
            }
        }
        let hom_group = MarkedAbelianGroup::new(m, n);

        let mut adj = Mat::zero((hom_gens, dom.min_generators()));
        for (idx, v) in self.reduced.iter() {
            let (di, oi) = if left { (idx[0], idx[1]) } else { (idx[1], idx[0]) };
            let k = idx[2];
            let entry = if k < self.range.count_invariant_factors()
                && oi < other.count_invariant_factors() {
                let p = other.invariant_factor(oi);
                let q = self.range.invariant_factor(k);
                let div = q / &R::gcd(p, q);
                v / &div
            } else {
                v.clone()
            };
            adj[(oi * tg + k, di)] = entry;
        }

        let dm = Mat::zero((1, dom.min_generators()));
        let mut dn = Mat::zero((dom.min_generators(), dom.min_generators()));
        for i in 0..dom.count_invariant_factors() {
            dn[(i, i)] = dom.invariant_factor(i).clone();
        }
        let simple_dom = MarkedAbelianGroup::new(dm, dn);

        HomMarkedAbelianGroup::new(simple_dom, hom_group, adj)
    }

    /// Signature of a symmetric form with range `Z`, through the
    /// characteristic polynomial of the free-block pairing matrix and
    /// Descartes' sign counts.
    pub fn z_form_signature(&self) -> i64 {
        if !self.is_symmetric() { return 0 }
        if !(self.range.rank() == 1 && self.range.count_invariant_factors() == 0) {
            return 0
        }
        let lt = self.ldomain.count_invariant_factors();
        let rt = self.rdomain.count_invariant_factors();
        let n = self.ldomain.rank();
        let m = Mat::generate((n, n), |i, j| {
            self.reduced.get(&[i + lt, j + rt, self.range.count_invariant_factors()])
                .cloned().unwrap_or_else(R::zero)
        });
        let chi = char_poly(&m);
        chi.sign_changes() as i64 - chi.flip().sign_changes() as i64
    }

    /// The rank-vector part of the Kawauchi-Kojima classification of a
    /// torsion linking form: for each prime `p` dividing the torsion order,
    /// the multiplicities of `Z_{p^k}` in the primary decomposition.
    pub fn kk_torsion_rank_vector(&self) -> Vec<(u64, Vec<usize>)> {
        let mut primes = Primes::new();
        let mut out: Vec<(u64, Vec<usize>)> = vec![];
        for f in self.ldomain.invariant_factors() {
            let f = f.to_u64().expect("torsion order too large");
            for (p, e) in primes.factorize(f) {
                let pos = match out.iter().position(|(q, _)| *q == p) {
                    Some(pos) => pos,
                    None => {
                        out.push((p, vec![]));
                        out.len() - 1
                    }
                };
                let e = e as usize;
                if out[pos].1.len() < e {
                    out[pos].1.resize(e, 0);
                }
                out[pos].1[e - 1] += 1;
            }
        }
        out.sort_by_key(|(p, _)| *p);
        out
    }

    /// The odd Legendre symbol vector of the Kawauchi-Kojima
    /// classification: for each odd prime `p` and each `k` with
    /// `G_{(p,k)}` non-trivial, the Legendre symbol of the determinant of
    /// the restricted pairing matrix over `Z_p`.
    ///
    /// Expects a symmetric torsion linking form whose range is cyclic
    /// `Z_N` interpreted as `(1/N)Z / Z`.
    pub fn kk_torsion_legendre_vector(&self) -> Vec<(u64, Vec<i32>)> {
        let ranks = self.kk_torsion_rank_vector();
        let nn = match self.range.invariant_factors().first() {
            Some(n) => n.to_i64().expect("range modulus too large"),
            None => return vec![],
        };
        let facs: Vec<i64> = self.ldomain.invariant_factors().iter()
            .map(|f| f.to_i64().unwrap())
            .collect();

        let mut out = vec![];
        for (p, mults) in &ranks {
            if *p == 2 { continue }
            let p = *p as i64;
            let mut symbols = vec![];
            for (k1, mult) in mults.iter().enumerate() {
                let k = (k1 + 1) as u32;
                if *mult == 0 {
                    symbols.push(0);
                    continue
                }
                // generators whose order has p-valuation exactly k
                let sel: Vec<usize> = (0..facs.len()).filter(|&i| {
                    valuation(facs[i], p) == k
                }).collect();
                debug_assert_eq!(sel.len(), *mult);
                // entries of p^k * f_p(x'_i, x'_j) mod p
                let pk = p.pow(k);
                let mut det_mat = vec![vec![0i64; sel.len()]; sel.len()];
                for (a, &i) in sel.iter().enumerate() {
                    for (b, &j) in sel.iter().enumerate() {
                        let lam = self.reduced.get(&[i, j, 0])
                            .map(|v| v.to_i64().unwrap())
                            .unwrap_or(0);
                        let ai = facs[i] / p.pow(valuation(facs[i], p));
                        let aj = facs[j] / p.pow(valuation(facs[j], p));
                        let num = pk as i128 * ai as i128 * aj as i128 * lam as i128;
                        debug_assert_eq!(num % nn as i128, 0,
                            "linking value is not in (1/p^k)Z");
                        det_mat[a][b] = ((num / nn as i128) % p as i128) as i64;
                    }
                }
                let d = det_mod_p(&det_mat, p);
                symbols.push(legendre_symbol(d, p as u64));
            }
            out.push((p as u64, symbols));
        }
        out
    }
}

fn valuation(mut n: i64, p: i64) -> u32 {
    let mut v = 0;
    while n % p == 0 && n != 0 {
        n /= p;
        v += 1;
    }
    v
}

fn det_mod_p(m: &[Vec<i64>], p: i64) -> i64 {
    let n = m.len();
    let mut a: Vec<Vec<i64>> = m.iter()
        .map(|row| row.iter().map(|x| x.rem_euclid(p)).collect())
        .collect();
    let mut det = 1i64;
    for c in 0..n {
        let Some(piv) = (c..n).find(|&r| a[r][c] % p != 0) else {
            return 0
        };
        if piv != c {
            a.swap(piv, c);
            det = -det;
        }
        det = det * a[c][c] % p;
        let inv = mod_inverse(a[c][c], p);
        for r in c + 1..n {
            let f = a[r][c] * inv % p;
            for k in c..n {
                a[r][k] = (a[r][k] - f * a[c][k]).rem_euclid(p);
            }
        }
    }
    det.rem_euclid(p)
}

fn mod_inverse(a: i64, p: i64) -> i64 {
    let (_, x, _) = EucRing::gcdx(&a.rem_euclid(p), &p);
    x.rem_euclid(p)
}

/// Characteristic polynomial `det(tI - m)` by the Faddeev-LeVerrier
/// recursion; every division is exact.
pub fn char_poly<R>(m: &Mat<R>) -> IntPoly<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    let n = m.nrows();
    assert!(m.is_square());
    if n == 0 {
        return IntPoly::one()
    }
    let mut coeffs = vec![R::zero(); n + 1];
    coeffs[n] = R::one();

    let mut mk = m.clone();
    for k in 1..=n {
        let mut tr = R::zero();
        for i in 0..n {
            tr += &mk[(i, i)];
        }
        let c = -(&tr / &R::from_i64(k as i64));
        coeffs[n - k] = c.clone();
        if k < n {
            let mut shifted = mk.clone();
            for i in 0..n {
                shifted[(i, i)] = &shifted[(i, i)] + &c;
            }
            mk = m * &shifted;
        }
    }
    IntPoly::new(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;

    type M = MarkedAbelianGroup<i64>;
    type B = BilinearForm<i64>;

    fn z_group(rank: usize) -> M {
        M::elementary(rank, 0)
    }

    fn zn(n: i64) -> M {
        M::elementary(1, n)
    }

    #[test]
    fn char_poly_basics() {
        let m: Mat<i64> = Mat::from_data((2, 2), [2, 0, 0, -3]);
        let p = char_poly(&m);
        // (t - 2)(t + 3) = t^2 + t - 6
        assert_eq!(p.coeffs(), &[-6, 1, 1]);
    }

    #[test]
    fn signature_definite() {
        // <1> ⊕ <1> on Z^2
        let mut g = SparseGrid::new(3);
        g.set(&[0, 0, 0], 1i64);
        g.set(&[1, 1, 0], 1);
        let b = B::new(z_group(2), z_group(2), z_group(1), g);
        assert!(b.is_symmetric());
        assert_eq!(b.z_form_signature(), 2);
    }

    #[test]
    fn signature_hyperbolic() {
        // [[0, 1], [1, 0]]
        let mut g = SparseGrid::new(3);
        g.set(&[0, 1, 0], 1i64);
        g.set(&[1, 0, 0], 1);
        let b = B::new(z_group(2), z_group(2), z_group(1), g);
        assert!(b.is_symmetric());
        assert_eq!(b.z_form_signature(), 0);
    }

    #[test]
    fn antisymmetric() {
        let mut g = SparseGrid::new(3);
        g.set(&[0, 1, 0], 1i64);
        g.set(&[1, 0, 0], -1);
        let b = B::new(z_group(2), z_group(2), z_group(1), g);
        assert!(!b.is_symmetric());
        assert!(b.is_anti_symmetric());
        assert_eq!(b.z_form_signature(), 0);
    }

    #[test]
    fn linking_form_on_z5() {
        // l(g, g) = 2/5 on Z_5
        let mut g = SparseGrid::new(3);
        g.set(&[0, 0, 0], 2i64);
        let b = B::new(zn(5), zn(5), zn(5), g);
        assert!(b.is_symmetric());

        // adjoint Z_5 -> Hom(Z_5, Z_5) is an isomorphism
        let adj = b.left_adjoint();
        assert!(adj.is_isomorphism());

        assert_eq!(b.kk_torsion_rank_vector(), vec![(5, vec![1])]);
        let leg = b.kk_torsion_legendre_vector();
        // det = 2, (2/5) = -1
        assert_eq!(leg, vec![(5, vec![-1])]);
    }

    #[test]
    fn degenerate_linking() {
        let g = SparseGrid::new(3);
        let b = B::new(zn(5), zn(5), zn(5), g);
        let adj = b.left_adjoint();
        assert!(!adj.is_isomorphism());
    }

    #[test]
    fn compositions() {
        // pairing Z x Z -> Z, (x, y) -> 3xy; precompose left with doubling
        let mut g = SparseGrid::new(3);
        g.set(&[0, 0, 0], 3i64);
        let b = B::new(z_group(1), z_group(1), z_group(1), g);
        let f = HomMarkedAbelianGroup::new(z_group(1), z_group(1),
            Mat::from_data((1, 1), [2]));
        let b2 = b.l_compose(&f);
        assert_eq!(b2.pairing().get(&[0, 0, 0]), Some(&6));
    }
}
