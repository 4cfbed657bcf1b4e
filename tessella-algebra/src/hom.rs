use std::cell::OnceCell;
use num_traits::Zero;
use tessella::{Integer, IntOps, EucRing};
use tessella_matrix::{Mat, MatType, snf};
use crate::{AbelianGroup, MarkedAbelianGroup, invert_unimodular};

/// A homomorphism between two marked abelian groups, described by a matrix
/// acting on chain representatives. The reduced matrix (the same map written
/// in the Smith normal form bases of both ends) and the kernel, image and
/// cokernel are computed lazily.
#[derive(Clone, Debug)]
pub struct HomMarkedAbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    domain: MarkedAbelianGroup<R>,
    codomain: MarkedAbelianGroup<R>,
    matrix: Mat<R>,
    reduced: OnceCell<Mat<R>>,
    kernel_lattice: OnceCell<Mat<R>>,
}

impl<R> HomMarkedAbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    pub fn new(domain: MarkedAbelianGroup<R>, codomain: MarkedAbelianGroup<R>,
               matrix: Mat<R>) -> Self {
        assert_eq!(matrix.nrows(), codomain.rank_cc());
        assert_eq!(matrix.ncols(), domain.rank_cc());
        Self {
            domain, codomain, matrix,
            reduced: OnceCell::new(),
            kernel_lattice: OnceCell::new(),
        }
    }

    /// Builds the homomorphism whose *reduced* matrix is given, recovering a
    /// chain-level matrix through the stored change-of-basis data of both
    /// groups.
    pub fn from_reduced(reduced: Mat<R>,
                        domain: MarkedAbelianGroup<R>,
                        codomain: MarkedAbelianGroup<R>) -> Self {
        assert_eq!(reduced.nrows(), codomain.min_generators());
        assert_eq!(reduced.ncols(), domain.min_generators());

        // Step 1: into the codomain's diagonal-presentation coordinates.
        let cod_ci = codomain.orn_ci();
        let dom_c = domain.orn_c();
        let step1 = Mat::generate((cod_ci.nrows(), dom_c.nrows()), |i, j| {
            let mut acc = R::zero();
            for k in 0..reduced.nrows() {
                for l in 0..reduced.ncols() {
                    acc += &(&cod_ci[(i, k + codomain.if_loc())] * &reduced[(k, l)])
                         * &dom_c[(l + domain.if_loc(), j)];
                }
            }
            acc
        });

        // Step 2: with cyclic coefficients, pass through the tensor bases.
        let cod_t = codomain.tor_vec().len();
        let dom_t = domain.tor_vec().len();
        let step2 = if domain.coef().is_zero() {
            step1
        } else {
            let cod_otci = codomain.ot_ci();
            let dom_otc = domain.ot_c();
            let rows = step1.nrows() + codomain.tensor_if_loc();
            let cols = step1.ncols() + domain.tensor_if_loc();
            let mut m = Mat::generate((rows, cols), |i, j| {
                if i < cod_t {
                    if j < dom_t {
                        step1[(i, j)].clone()
                    } else {
                        let mut acc = R::zero();
                        for k in domain.tensor_if_loc()..dom_otc.nrows() {
                            acc += &step1[(i, k - domain.tensor_if_loc() + dom_t)]
                                 * &dom_otc[(k, j - dom_t)];
                        }
                        acc
                    }
                } else if j < dom_t {
                    let mut acc = R::zero();
                    for k in codomain.tensor_if_loc()..cod_otci.ncols() {
                        acc += &cod_otci[(i - cod_t, k)]
                             * &step1[(k - codomain.tensor_if_loc() + cod_t, j)];
                    }
                    acc
                } else {
                    let mut acc = R::zero();
                    for k in codomain.tensor_if_loc()..cod_otci.nrows() {
                        for l in domain.tensor_if_loc()..dom_otc.nrows() {
                            acc += &(&cod_otci[(i - cod_t, k)]
                                 * &step1[(k - codomain.tensor_if_loc() + cod_t,
                                           l - domain.tensor_if_loc() + dom_t)])
                                 * &dom_otc[(l, j - dom_t)];
                        }
                    }
                    acc
                }
            });
            // rescale the Tor blocks
            for i in 0..cod_t {
                let s = codomain.coef() / &R::gcd(codomain.coef(), &codomain.tor_vec()[i]);
                for j in 0..m.ncols() {
                    m[(i, j)] = &m[(i, j)] * &s;
                }
            }
            for j in 0..dom_t {
                let s = domain.coef() / &R::gcd(domain.coef(), &domain.tor_vec()[j]);
                for i in 0..m.nrows() {
                    m[(i, j)] = &m[(i, j)] / &s;
                }
            }
            m
        };

        // Step 3: up to chain-complex coordinates.
        let cod_omr = codomain.omr();
        let dom_omri = domain.omri();
        let matrix = Mat::generate(
            (codomain.rank_cc(), domain.rank_cc()), |i, j| {
            let mut acc = R::zero();
            for k in codomain.tor_loc()..cod_omr.ncols() {
                for l in domain.tor_loc()..dom_omri.nrows() {
                    acc += &(&cod_omr[(i, k)]
                         * &step2[(k - codomain.tor_loc(), l - domain.tor_loc())])
                         * &dom_omri[(l, j)];
                }
            }
            acc
        });

        let hom = Self::new(domain, codomain, matrix);
        let _ = hom.reduced.set(reduced);
        hom
    }

    pub fn identity(group: MarkedAbelianGroup<R>) -> Self {
        let n = group.rank_cc();
        Self::new(group.clone(), group, Mat::id(n))
    }

    pub fn zero_map(domain: MarkedAbelianGroup<R>,
                    codomain: MarkedAbelianGroup<R>) -> Self {
        let m = Mat::zero((codomain.rank_cc(), domain.rank_cc()));
        Self::new(domain, codomain, m)
    }

    pub fn domain(&self) -> &MarkedAbelianGroup<R> { &self.domain }
    pub fn codomain(&self) -> &MarkedAbelianGroup<R> { &self.codomain }
    pub fn defining_matrix(&self) -> &Mat<R> { &self.matrix }

    pub fn eval_cc(&self, input: &[R]) -> Vec<R> {
        self.matrix.apply(input)
    }

    pub fn eval_snf(&self, input: &[R]) -> Option<Vec<R>> {
        if input.len() != self.domain.min_generators() { return None }
        let red = self.reduced_matrix();
        let mut out = red.apply(input);
        for i in 0..self.codomain.count_invariant_factors() {
            out[i] = out[i].rem_euclid_by(self.codomain.invariant_factor(i));
        }
        Some(out)
    }

    /// The map written in the Smith normal form bases of both groups
    /// (torsion generators first, then free generators).
    pub fn reduced_matrix(&self) -> &Mat<R> {
        self.reduced.get_or_init(|| {
            let rows = self.codomain.min_generators();
            let cols = self.domain.min_generators();
            let mut red = Mat::zero((rows, cols));
            for j in 0..cols {
                let col = self.domain.cc_rep(j).unwrap();
                let img = self.eval_cc(&col);
                let snf_img = self.codomain.snf_rep(&img)
                    .expect("image of a cycle is not a cycle");
                for i in 0..rows {
                    red[(i, j)] = snf_img[i].clone();
                }
            }
            red
        })
    }

    /// Do cycles map to cycles?
    pub fn is_cycle_map(&self) -> bool {
        (0..self.domain.min_cycle_generators()).all(|j| {
            let z = self.domain.cycle_gen(j).unwrap();
            self.codomain.is_cycle(&self.eval_cc(&z))
        })
    }

    /// Chain-map commutation against `other`, the same map one dimension
    /// up: the two squares must share their chain complexes and satisfy
    /// `∂_cod ∘ self = other ∘ ∂_dom`.
    pub fn is_chain_map(&self, other: &Self) -> bool {
        if self.codomain.m().shape() != other.codomain.n().shape()
            || self.domain.m().shape() != other.domain.n().shape()
            || self.codomain.m() != other.codomain.n()
            || self.domain.m() != other.domain.n() {
            return false
        }
        let lhs = self.codomain.m() * self.defining_matrix();
        let rhs = other.defining_matrix() * self.domain.m();
        lhs == rhs
    }

    /// Basis matrix of the sublattice of the domain's SNF generator lattice
    /// mapping into the codomain's relation lattice.
    fn reduced_kernel_lattice(&self) -> &Mat<R> {
        self.kernel_lattice.get_or_init(|| {
            let red = self.reduced_matrix();
            let n = self.codomain.count_invariant_factors();
            let l: Vec<R> = (0..self.codomain.min_generators()).map(|i| {
                if i < n {
                    self.codomain.invariant_factor(i).clone()
                } else {
                    R::zero()
                }
            }).collect();
            preimage_of_lattice(red, &l)
        })
    }

    pub fn kernel(&self) -> AbelianGroup<R> {
        let lat = self.reduced_kernel_lattice();
        let r = lat.ncols();
        if r == 0 {
            return AbelianGroup::free(0)
        }
        let s = snf(lat, [true, false, true, false]);
        let d = s.result();
        let p = s.p().unwrap();
        let q = s.q().unwrap();
        // express the domain's relation vectors in the lattice basis
        let if_num = self.domain.count_invariant_factors();
        let work = Mat::generate((r, if_num), |i, j| {
            let mut acc = R::zero();
            for k in 0..r {
                if d[(k, k)].is_zero() { continue }
                let t = &(self.domain.invariant_factor(j) * &q[(i, k)]) * &p[(k, j)];
                acc += &t / &d[(k, k)];
            }
            acc
        });
        AbelianGroup::from_presentation(work)
    }

    pub fn image(&self) -> AbelianGroup<R> {
        let lat = self.reduced_kernel_lattice();
        let n = lat.nrows();
        let if_num = self.domain.count_invariant_factors();
        let rel = Mat::generate((n, if_num + lat.ncols()), |i, j| {
            if j < if_num {
                if i == j {
                    self.domain.invariant_factor(j).clone()
                } else {
                    R::zero()
                }
            } else {
                lat[(i, j - if_num)].clone()
            }
        });
        AbelianGroup::from_presentation(rel)
    }

    pub fn cokernel(&self) -> AbelianGroup<R> {
        let red = self.reduced_matrix();
        let n = self.codomain.count_invariant_factors();
        let rel = Mat::generate(
            (red.nrows(), red.ncols() + n), |i, j| {
            if j < red.ncols() {
                red[(i, j)].clone()
            } else if i == j - red.ncols() {
                self.codomain.invariant_factor(i).clone()
            } else {
                R::zero()
            }
        });
        AbelianGroup::from_presentation(rel)
    }

    pub fn is_epic(&self) -> bool {
        self.cokernel().is_trivial()
    }

    pub fn is_monic(&self) -> bool {
        self.kernel().is_trivial()
    }

    pub fn is_isomorphism(&self) -> bool {
        self.is_epic() && self.is_monic()
    }

    pub fn is_zero_map(&self) -> bool {
        self.reduced_matrix().is_zero()
    }

    pub fn is_identity(&self) -> bool {
        self.domain.equal_presentation(&self.codomain)
            && self.reduced_matrix().is_id()
    }

    /// `self ∘ other`.
    pub fn compose(&self, other: &Self) -> Self {
        assert!(self.domain.equal_presentation(other.codomain()));
        Self::new(other.domain.clone(), self.codomain.clone(),
            &self.matrix * &other.matrix)
    }

    /// Inverse homomorphism when this map is an isomorphism.
    ///
    /// The reduced matrix has block form `[A B; 0 D]` with `A` an
    /// automorphism of the torsion part and `D` invertible over `Z`;
    /// the inverse is `[A' -A'BD'; 0 D']`.
    pub fn inverse_hom(&self) -> Option<Self> {
        if !self.is_isomorphism() { return None }
        let red = self.reduced_matrix();
        let t = self.domain.count_invariant_factors();
        let r = self.domain.rank();
        debug_assert_eq!(self.codomain.count_invariant_factors(), t);
        debug_assert_eq!(self.codomain.rank(), r);

        let a = red.submat(0..t, 0..t);
        let b = red.submat(0..t, t..t + r);
        let d = red.submat(t..t + r, t..t + r);

        let di = invert_unimodular(&d);
        let fac: Vec<R> = (0..t)
            .map(|i| self.domain.invariant_factor(i).clone()).collect();
        let ai = torsion_aut_inverse(&a, &fac)?;

        // b' = -a' b d', reduced mod the invariant factors
        let mut bi = &(&ai * &b) * &di;
        for i in 0..t {
            for j in 0..r {
                bi[(i, j)] = (-&bi[(i, j)]).rem_euclid_by(&fac[i]);
            }
        }

        let inv = Mat::generate((t + r, t + r), |i, j| {
            if i < t && j < t {
                ai[(i, j)].clone()
            } else if i < t {
                bi[(i, j - t)].clone()
            } else if j >= t {
                di[(i - t, j - t)].clone()
            } else {
                R::zero()
            }
        });

        Some(Self::from_reduced(inv, self.codomain.clone(), self.domain.clone()))
    }

    /// The induced map on torsion subgroups, in their trivial presentations.
    pub fn torsion_subgroup_hom(&self) -> Self {
        let dom = self.domain.torsion_subgroup();
        let cod = self.codomain.torsion_subgroup();
        let rows = self.codomain.count_invariant_factors();
        let cols = self.domain.count_invariant_factors();
        let m = Mat::generate((rows, cols), |i, j| {
            let rep = self.domain.torsion_rep(j).unwrap();
            let img = self.eval_cc(&rep);
            let snf_img = self.codomain.snf_rep(&img)
                .expect("torsion generator does not map to a cycle");
            snf_img[i].clone()
        });
        Self::new(dom, cod, m)
    }
}

impl<R> MarkedAbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    /// The canonical inclusion of the trivially presented torsion
    /// subgroup.
    pub fn torsion_inclusion(&self) -> HomMarkedAbelianGroup<R> {
        let k = self.count_invariant_factors();
        let m = Mat::generate((self.rank_cc(), k), |i, j| {
            self.torsion_rep(j).unwrap()[i].clone()
        });
        HomMarkedAbelianGroup::new(self.torsion_subgroup(), self.clone(), m)
    }
}

/// Basis matrix of `{x : (a x)_i ∈ l_i Z for l_i > 0, (a x)_i = 0 for
/// l_i = 0}`. The kernel of the augmented matrix `[a | diag(l)]` projects
/// injectively onto it.
fn preimage_of_lattice<R>(a: &Mat<R>, l: &[R]) -> Mat<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    let (m, n) = a.shape();
    assert_eq!(l.len(), m);
    let nonzero: Vec<usize> =
        (0..m).filter(|&i| !l[i].is_zero()).collect();
    let t = nonzero.len();
    let aug = Mat::generate((m, n + t), |i, j| {
        if j < n {
            a[(i, j)].clone()
        } else if nonzero[j - n] == i {
            l[i].clone()
        } else {
            R::zero()
        }
    });
    let s = snf(&aug, [false, false, true, false]);
    let rank = s.rank();
    let q = s.q().unwrap();
    // columns of q past the rank span the kernel; keep the x-part
    q.submat(0..n, rank..n + t)
}

/// Inverse of an automorphism of `⊕ Z_{d_i}`, by an integer solve of
/// `a x ≡ e_j (mod d)` column by column.
fn torsion_aut_inverse<R>(a: &Mat<R>, d: &[R]) -> Option<Mat<R>>
where R: Integer, for<'x> &'x R: IntOps<R> {
    let t = a.nrows();
    if t == 0 {
        return Some(Mat::zero((0, 0)))
    }
    assert!(a.is_square());
    // solve [a | diag(d)] z = e_j over Z, take the first block of z
    let aug = Mat::generate((t, 2 * t), |i, j| {
        if j < t {
            a[(i, j)].clone()
        } else if j - t == i {
            d[i].clone()
        } else {
            R::zero()
        }
    });
    let s = snf(&aug, [true, false, true, false]);
    let diag = s.result();
    let p = s.p().unwrap();
    let q = s.q().unwrap();

    let mut out = Mat::zero((t, t));
    for j in 0..t {
        // e_j in smith coordinates
        let rhs: Vec<R> = (0..t).map(|i| p[(i, j)].clone()).collect();
        let mut y = vec![R::zero(); 2 * t];
        for (i, v) in rhs.into_iter().enumerate() {
            if v.is_zero() { continue }
            if i >= diag.nrows() || diag[(i, i)].is_zero()
                || !diag[(i, i)].divides(&v) {
                return None
            }
            y[i] = &v / &diag[(i, i)];
        }
        let x = q.apply(&y);
        for i in 0..t {
            out[(i, j)] = x[i].rem_euclid_by(&d[i]);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    type M = MarkedAbelianGroup<i64>;
    type H = HomMarkedAbelianGroup<i64>;

    fn zn_chain(ds: &[i64]) -> M {
        let k = ds.len();
        let m = Mat::zero((1, k));
        let n = Mat::diag((k, k), ds.iter().cloned());
        M::new(m, n)
    }

    #[test]
    fn identity() {
        let g = zn_chain(&[0, 0]);
        let id = H::identity(g);
        assert!(id.is_identity());
        assert!(id.is_isomorphism());
        assert!(id.kernel().is_trivial());
        assert!(id.cokernel().is_trivial());
        assert_eq!(id.image().rank(), 2);
    }

    #[test]
    fn doubling_on_z() {
        let g = zn_chain(&[0]);
        let f = H::new(g.clone(), g, Mat::from_data((1, 1), [2]));
        assert!(f.is_monic());
        assert!(!f.is_epic());
        assert_eq!(f.cokernel().invariant_factors(), &[2]);
        assert!(f.kernel().is_trivial());
        assert_eq!(f.image().rank(), 1);
    }

    #[test]
    fn projection_z_to_z2() {
        let dom = zn_chain(&[0]);
        let cod = zn_chain(&[2]);
        let f = H::new(dom, cod, Mat::from_data((1, 1), [1]));
        assert!(f.is_epic());
        assert!(!f.is_monic());
        assert_eq!(f.kernel().rank(), 1);
        assert_eq!(f.image().invariant_factors(), &[2]);
    }

    #[test]
    fn reduced_matrix_of_identity() {
        // a group with a non-trivial presentation: Z^2 / [2, 0]
        let g = zn_chain(&[2, 0]);
        let id = H::identity(g);
        assert!(id.reduced_matrix().is_id());
    }

    #[test]
    fn inverse_of_identity() {
        let g = zn_chain(&[3, 0]);
        let id = H::identity(g);
        let inv = id.inverse_hom().unwrap();
        assert!(inv.is_identity());
    }

    #[test]
    fn inverse_of_negation() {
        let g = zn_chain(&[0]);
        let f = H::new(g.clone(), g, Mat::from_data((1, 1), [-1]));
        assert!(f.is_isomorphism());
        let inv = f.inverse_hom().unwrap();
        let c = f.compose(&inv);
        assert!(c.is_identity());
    }

    #[test]
    fn inverse_on_torsion() {
        // multiplication by 2 on Z_5 is invertible (inverse 3)
        let g = zn_chain(&[5]);
        let f = H::new(g.clone(), g, Mat::from_data((1, 1), [2]));
        assert!(f.is_isomorphism());
        let inv = f.inverse_hom().unwrap();
        assert_eq!(inv.reduced_matrix()[(0, 0)], 3);
        assert!(f.compose(&inv).is_identity());
    }

    #[test]
    fn cycle_map() {
        let g = zn_chain(&[0]);
        let f = H::new(g.clone(), g, Mat::from_data((1, 1), [7]));
        assert!(f.is_cycle_map());
    }

    #[test]
    fn torsion_hom() {
        let dom = zn_chain(&[4, 0]);
        let cod = zn_chain(&[2]);
        // map sends the Z_4 torsion generator to the Z_2 generator
        let m = Mat::from_data((1, 2), [1, 0]);
        let f = H::new(dom, cod, m);
        let t = f.torsion_subgroup_hom();
        assert_eq!(t.domain().invariant_factors(), &[4]);
        assert_eq!(t.codomain().invariant_factors(), &[2]);
    }

    #[test]
    fn preimage_lattice() {
        // map Z^2 -> Z_2 x Z, matrix [[1, 0], [0, 2]]; lattice l = (2, 0)
        let a: Mat<i64> = Mat::from_data((2, 2), [1, 0, 0, 2]);
        let lat = preimage_of_lattice(&a, &[2, 0]);
        // preimage = {(x, y) : x even, 2y = 0} = 2Z x 0
        assert_eq!(lat.ncols(), 1);
        assert_eq!(lat.col_vec(0).iter().map(|x| x.abs()).collect::<Vec<_>>(), vec![2, 0]);
    }

    #[test]
    fn torsion_inverse_mod() {
        let a = Mat::from_data((2, 2), [1, 1, 0, 1]);
        let d = [5i64, 5];
        let ai = torsion_aut_inverse(&a, &d).unwrap();
        // a * ai = I mod 5
        let prod = &a * &ai;
        assert_eq!(prod[(0, 0)].rem_euclid(5), 1);
        assert_eq!(prod[(0, 1)].rem_euclid(5), 0);
        assert_eq!(prod[(1, 1)].rem_euclid(5), 1);
    }
}
