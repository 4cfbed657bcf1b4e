//! The façade: eager chain-complex construction, lazy locator-keyed
//! caches for groups, homomorphisms and forms.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use log::debug;
use num_traits::Zero;
use tessella::{Integer, IntOps};
use tessella_algebra::{
    AbelianGroup, BilinearForm, HomMarkedAbelianGroup, IntPoly,
    MarkedAbelianGroup,
};
use tessella_matrix::{Mat, MatType};

use crate::complex::{self, CoverGrid};
use crate::chain_map;
use crate::{
    CellIndexes, ChainComplexLocator, ChainMapLocator, Coords, FormLocator,
    FormType, GroupLocator, HomLocator, Tri, Variance,
};

/// All derived cellular data of one triangulation. The triangulation is
/// borrowed read-only for the lifetime of this object; index vectors,
/// boundary maps and chain maps are built eagerly, everything else on
/// demand. The caches are not thread-safe: callers sharing one façade
/// across threads must serialize externally.
pub struct CellularData<'a, R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    pub(crate) tri: Tri<'a>,
    pub(crate) ix: CellIndexes,

    // boundary maps as cover grids, per decomposition; entry d is the
    // boundary map of dimension d+1
    pub(crate) std_cc: Vec<CoverGrid>,
    pub(crate) dual_cc: Vec<CoverGrid>,
    pub(crate) mix_cc: Vec<CoverGrid>,
    pub(crate) bdry_cc: Vec<CoverGrid>,
    pub(crate) rel_cc: Vec<CoverGrid>,

    // chain maps as cover grids
    pub(crate) sm_cm: Vec<CoverGrid>,
    pub(crate) dm_cm: Vec<CoverGrid>,
    pub(crate) sbi_cm: Vec<CoverGrid>,
    pub(crate) str_cm: Vec<CoverGrid>,
    pub(crate) sch_cm: Vec<CoverGrid>,

    chain_complexes: RefCell<BTreeMap<ChainComplexLocator, Rc<Mat<R>>>>,
    chain_maps: RefCell<BTreeMap<ChainMapLocator, Rc<Mat<R>>>>,
    abelian_groups: RefCell<BTreeMap<GroupLocator, Rc<AbelianGroup<R>>>>,
    marked_groups: RefCell<BTreeMap<GroupLocator, Rc<MarkedAbelianGroup<R>>>>,
    homs: RefCell<BTreeMap<HomLocator, Rc<HomMarkedAbelianGroup<R>>>>,
    pub(crate) forms: RefCell<BTreeMap<FormLocator, Rc<BilinearForm<R>>>>,
}

impl<'a, R> CellularData<'a, R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    pub fn new(tri: Tri<'a>) -> Self {
        let ix = CellIndexes::new(&tri);
        debug!("cellular data over a {}-manifold with {} top-simplices",
            tri.dim(), tri.size());

        let std_cc = complex::fill_standard(&tri, &ix);
        let dual_cc = complex::fill_dual(&tri, &ix);
        let mix_cc = complex::fill_mixed(&tri, &ix);
        let bdry_cc = complex::fill_boundary(&tri, &ix);
        let rel_cc = complex::fill_relative(&tri, &ix);

        let sm_cm = chain_map::fill_std_to_mix(&tri, &ix);
        let dm_cm = chain_map::fill_dual_to_mix(&tri, &ix);
        let sbi_cm = chain_map::fill_bdry_to_std(&tri, &ix);
        let str_cm = chain_map::fill_std_to_rel(&tri, &ix);
        let sch_cm = chain_map::fill_rel_to_bdry(&tri, &ix);

        let data = Self {
            tri, ix,
            std_cc, dual_cc, mix_cc, bdry_cc, rel_cc,
            sm_cm, dm_cm, sbi_cm, str_cm, sch_cm,
            chain_complexes: RefCell::new(BTreeMap::new()),
            chain_maps: RefCell::new(BTreeMap::new()),
            abelian_groups: RefCell::new(BTreeMap::new()),
            marked_groups: RefCell::new(BTreeMap::new()),
            homs: RefCell::new(BTreeMap::new()),
            forms: RefCell::new(BTreeMap::new()),
        };

        debug_assert!(data.chain_complexes_verified());
        debug_assert!(data.chain_maps_verified());
        data
    }

    pub fn dim(&self) -> usize {
        self.tri.dim()
    }

    pub fn indexes(&self) -> &CellIndexes {
        &self.ix
    }

    /// Top cell dimension for a coordinate system (one less than the
    /// manifold dimension for boundary decompositions).
    pub fn top_dim(&self, coords: Coords) -> usize {
        if coords.is_boundary_type() {
            self.dim() - 1
        } else {
            self.dim()
        }
    }

    pub fn cell_count(&self, loc: ChainComplexLocator) -> usize {
        self.ix.cell_count(self.dim(), loc)
    }

    fn grid_family(&self, coords: Coords) -> Option<&[CoverGrid]> {
        match coords {
            Coords::Std => Some(&self.std_cc),
            Coords::Dual => Some(&self.dual_cc),
            Coords::Mix => Some(&self.mix_cc),
            Coords::StdBdry => Some(&self.bdry_cc),
            Coords::StdRelBdry => Some(&self.rel_cc),
            _ => None,
        }
    }

    fn grid_to_mat(&self, grid: &CoverGrid, rows: usize, cols: usize) -> Mat<R> {
        let mut m: Mat<R> = Mat::zero((rows, cols));
        for (key, facet) in grid.iter() {
            let col = key[0];
            let cur = m[(facet.cell, col)].clone();
            m[(facet.cell, col)] = cur + R::from_i64(facet.sign);
        }
        m
    }

    /// The boundary matrix `∂: C_dim -> C_{dim-1}`; `None` when the
    /// dimension is out of range or the decomposition unimplemented.
    pub fn integer_chain_complex(&self, loc: ChainComplexLocator)
        -> Option<Rc<Mat<R>>>
    {
        if let Some(m) = self.chain_complexes.borrow().get(&loc) {
            return Some(Rc::clone(m))
        }
        let grids = self.grid_family(loc.coords)?;
        if loc.dim == 0 || loc.dim > self.top_dim(loc.coords) {
            return None
        }
        let grid = &grids[loc.dim - 1];
        let rows = self.cell_count(
            ChainComplexLocator::new(loc.dim - 1, loc.coords));
        let cols = self.cell_count(loc);
        let mat = Rc::new(self.grid_to_mat(grid, rows, cols));
        self.chain_complexes.borrow_mut().insert(loc, Rc::clone(&mat));
        Some(mat)
    }

    fn chain_map_grid(&self, loc: ChainMapLocator) -> Option<&CoverGrid> {
        let (dom, ran) = (loc.domain, loc.range);
        let n = self.dim();
        use Coords::*;
        match (dom.coords, ran.coords) {
            (StdBdry, Std) if dom.dim == ran.dim && dom.dim < n =>
                Some(&self.sbi_cm[dom.dim]),
            (Std, Mix) if dom.dim == ran.dim =>
                Some(&self.sm_cm[dom.dim]),
            (Dual, Mix) if dom.dim == ran.dim =>
                Some(&self.dm_cm[dom.dim]),
            (Std, StdRelBdry) if dom.dim == ran.dim =>
                Some(&self.str_cm[dom.dim]),
            (StdRelBdry, StdBdry) if dom.dim == ran.dim + 1 && ran.dim < n =>
                Some(&self.sch_cm[ran.dim]),
            _ => None,
        }
    }

    /// The matrix of a recognized chain map; `None` otherwise.
    pub fn integer_chain_map(&self, loc: ChainMapLocator) -> Option<Rc<Mat<R>>> {
        if let Some(m) = self.chain_maps.borrow().get(&loc) {
            return Some(Rc::clone(m))
        }
        if loc.domain.dim > self.top_dim(loc.domain.coords)
            || loc.range.dim > self.top_dim(loc.range.coords) {
            return None
        }
        let grid = self.chain_map_grid(loc)?;
        let rows = self.cell_count(loc.range);
        let cols = self.cell_count(loc.domain);
        let mat = Rc::new(self.grid_to_mat(grid, rows, cols));
        self.chain_maps.borrow_mut().insert(loc, Rc::clone(&mat));
        Some(mat)
    }

    /// The pair (∂_dim, ∂_{dim+1}) with zero-shaped stand-ins at the ends
    /// of the complex.
    fn boundary_pair(&self, dim: usize, coords: Coords)
        -> Option<(Mat<R>, Mat<R>)>
    {
        if !coords.is_implemented() {
            return None
        }
        let top = self.top_dim(coords);
        if dim > top {
            return None
        }
        let count = |d: usize| {
            self.cell_count(ChainComplexLocator::new(d, coords))
        };
        let m = if dim == 0 {
            Mat::zero((0, count(0)))
        } else {
            (*self.integer_chain_complex(
                ChainComplexLocator::new(dim, coords))?).clone()
        };
        let n = if dim == top {
            Mat::zero((count(top), 0))
        } else {
            (*self.integer_chain_complex(
                ChainComplexLocator::new(dim + 1, coords))?).clone()
        };
        Some((m, n))
    }

    /// The marked (co)homology group at a locator, lazily cached.
    pub fn marked_group(&self, loc: GroupLocator)
        -> Option<Rc<MarkedAbelianGroup<R>>>
    {
        if let Some(g) = self.marked_groups.borrow().get(&loc) {
            return Some(Rc::clone(g))
        }
        let (m, n) = self.boundary_pair(loc.dim, loc.coords)?;
        let coef = R::from_i64(loc.coef as i64);
        let group = match loc.variance {
            Variance::Covariant =>
                MarkedAbelianGroup::with_coef(m, n, coef),
            Variance::Contravariant =>
                MarkedAbelianGroup::with_coef(n.transpose(), m.transpose(), coef),
        };
        let group = Rc::new(group);
        self.marked_groups.borrow_mut().insert(loc, Rc::clone(&group));
        Some(group)
    }

    /// The same group, recorded only up to isomorphism.
    pub fn unmarked_group(&self, loc: GroupLocator)
        -> Option<Rc<AbelianGroup<R>>>
    {
        if let Some(g) = self.abelian_groups.borrow().get(&loc) {
            return Some(Rc::clone(g))
        }
        let marked = self.marked_group(loc)?;
        let group = Rc::new(AbelianGroup::from((*marked).clone()));
        self.abelian_groups.borrow_mut().insert(loc, Rc::clone(&group));
        Some(group)
    }

    fn hom_chain_matrix(&self, h: HomLocator) -> Option<Mat<R>> {
        let (dom, ran) = (h.domain, h.range);
        let n = self.dim();
        use Coords::*;

        if dom.variance == ran.variance {
            // change of coefficients on the same chain complex
            if dom.dim == ran.dim && dom.coords == ran.coords {
                let size = self.marked_group(dom)?.rank_cc();
                return Some(Mat::id(size))
            }

            let cov = dom.variance == Variance::Covariant;
            if cov {
                // subdivision maps
                if (dom.coords == Std || dom.coords == Dual)
                    && ran.coords == Mix && dom.dim == ran.dim {
                    return self.integer_chain_map(ChainMapLocator::new(
                        ChainComplexLocator::new(dom.dim, dom.coords),
                        ChainComplexLocator::new(ran.dim, Mix),
                    )).map(|m| (*m).clone())
                }
                // the long exact sequence of the pair
                if dom.coords == StdBdry && ran.coords == Std
                    && dom.dim == ran.dim && dom.dim < n {
                    return self.integer_chain_map(ChainMapLocator::new(
                        ChainComplexLocator::new(dom.dim, StdBdry),
                        ChainComplexLocator::new(ran.dim, Std),
                    )).map(|m| (*m).clone())
                }
                if dom.coords == Std && ran.coords == StdRelBdry
                    && dom.dim == ran.dim {
                    return self.integer_chain_map(ChainMapLocator::new(
                        ChainComplexLocator::new(dom.dim, Std),
                        ChainComplexLocator::new(ran.dim, StdRelBdry),
                    )).map(|m| (*m).clone())
                }
                if dom.coords == StdRelBdry && ran.coords == StdBdry
                    && dom.dim == ran.dim + 1 && ran.dim < n {
                    return self.integer_chain_map(ChainMapLocator::new(
                        ChainComplexLocator::new(dom.dim, StdRelBdry),
                        ChainComplexLocator::new(ran.dim, StdBdry),
                    )).map(|m| (*m).clone())
                }
            } else {
                // the contravariant versions are the transposes, with
                // domain and range exchanged
                if dom.coords == Mix && (ran.coords == Std || ran.coords == Dual)
                    && dom.dim == ran.dim {
                    return self.integer_chain_map(ChainMapLocator::new(
                        ChainComplexLocator::new(ran.dim, ran.coords),
                        ChainComplexLocator::new(dom.dim, Mix),
                    )).map(|m| m.transpose())
                }
                if dom.coords == Std && ran.coords == StdBdry
                    && dom.dim == ran.dim && ran.dim < n {
                    return self.integer_chain_map(ChainMapLocator::new(
                        ChainComplexLocator::new(ran.dim, StdBdry),
                        ChainComplexLocator::new(dom.dim, Std),
                    )).map(|m| m.transpose())
                }
                if dom.coords == StdRelBdry && ran.coords == Std
                    && dom.dim == ran.dim {
                    return self.integer_chain_map(ChainMapLocator::new(
                        ChainComplexLocator::new(ran.dim, Std),
                        ChainComplexLocator::new(dom.dim, StdRelBdry),
                    )).map(|m| m.transpose())
                }
                if dom.coords == StdBdry && ran.coords == StdRelBdry
                    && dom.dim + 1 == ran.dim && dom.dim < n {
                    return self.integer_chain_map(ChainMapLocator::new(
                        ChainComplexLocator::new(ran.dim, StdRelBdry),
                        ChainComplexLocator::new(dom.dim, StdBdry),
                    )).map(|m| m.transpose())
                }
            }
            return None
        }

        // variance-reversing: Poincaré duality
        let orientable = self.tri.is_orientable();
        if !orientable && dom.coef != 2 && ran.coef != 2 {
            return None
        }
        if dom.coords == Dual && ran.coords == StdRelBdry
            && dom.dim + ran.dim == n {
            let diag = chain_map::duality_diagonal(&self.tri, &self.ix, dom.dim);
            let rows = self.ix.num_rel[ran.dim];
            let cols = self.ix.num_dual[dom.dim];
            debug_assert_eq!(rows, cols);
            let m = Mat::generate((rows, cols), |i, j| {
                if i == j { R::from_i64(diag[i]) } else { R::zero() }
            });
            return Some(m)
        }

        None
    }

    /// The induced map on marked groups for a recognized homomorphism
    /// locator; `None` otherwise.
    pub fn hom_group(&self, h: HomLocator)
        -> Option<Rc<HomMarkedAbelianGroup<R>>>
    {
        if let Some(f) = self.homs.borrow().get(&h) {
            return Some(Rc::clone(f))
        }
        let n = self.dim();
        if h.domain.dim > n || h.range.dim > n {
            return None
        }
        // change-of-coefficients requests need divisibility
        if h.range.coef != 0 && h.domain.coef % h.range.coef != 0 {
            return None
        }
        let cm = self.hom_chain_matrix(h)?;
        let dom = self.marked_group(h.domain)?;
        let ran = self.marked_group(h.range)?;
        let hom = Rc::new(HomMarkedAbelianGroup::new(
            (*dom).clone(), (*ran).clone(), cm));
        self.homs.borrow_mut().insert(h, Rc::clone(&hom));
        Some(hom)
    }

    /// `Σ_i rank(H_i(M; Z)) t^i` in the dual decomposition.
    pub fn poincare_polynomial(&self) -> IntPoly<R> {
        let mut p = IntPoly::zero();
        for d in 0..=self.dim() {
            let g = self.unmarked_group(
                GroupLocator::new(d, Variance::Covariant, Coords::Dual, 0));
            if let Some(g) = g {
                p += IntPoly::monomial(R::from_i64(g.rank() as i64), d);
            }
        }
        p
    }

    /// Alternating sum of the dual cell counts.
    pub fn euler_char(&self) -> i64 {
        (0..=self.dim()).map(|d| {
            let c = self.ix.num_dual[d] as i64;
            if d % 2 == 0 { c } else { -c }
        }).sum()
    }

    /// Signature of the intersection form on middle homology; zero in odd
    /// dimensions and for non-orientable manifolds.
    pub fn signature(&self) -> i64 {
        if self.dim() != 4 || !self.tri.is_orientable() {
            return 0
        }
        let loc = GroupLocator::new(2, Variance::Covariant, Coords::Dual, 0);
        match self.bilinear_form(FormLocator::new(
            FormType::Intersection, loc, loc)) {
            Some(b) => b.z_form_signature(),
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_tri::fixtures;

    type CD<'a> = CellularData<'a, i64>;

    fn group(cd: &CD, dim: usize, coords: Coords) -> Rc<AbelianGroup<i64>> {
        cd.unmarked_group(GroupLocator::new(
            dim, Variance::Covariant, coords, 0)).unwrap()
    }

    #[test]
    fn s3_homology() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        for coords in [Coords::Std, Coords::Dual, Coords::Mix] {
            let h0 = group(&cd, 0, coords);
            let h1 = group(&cd, 1, coords);
            let h2 = group(&cd, 2, coords);
            let h3 = group(&cd, 3, coords);
            assert!(h0.is_z(), "H0 in {coords:?}");
            assert!(h1.is_trivial(), "H1 in {coords:?}");
            assert!(h2.is_trivial(), "H2 in {coords:?}");
            assert!(h3.is_z(), "H3 in {coords:?}");
        }
        assert_eq!(cd.euler_char(), 0);
        assert_eq!(cd.signature(), 0);
        assert_eq!(cd.poincare_polynomial().to_string(), "1 + t^3");
    }

    #[test]
    fn s3_homology_bigint() {
        use num_bigint::BigInt;
        let t = fixtures::s3_one_tet();
        let cd = CellularData::<BigInt>::new(Tri::D3(&t));
        let h3 = cd.unmarked_group(GroupLocator::new(
            3, Variance::Covariant, Coords::Std, 0)).unwrap();
        assert!(h3.is_z());
        let h1 = cd.unmarked_group(GroupLocator::new(
            1, Variance::Covariant, Coords::Std, 0)).unwrap();
        assert!(h1.is_trivial());
    }

    #[test]
    fn s3_cached_pointers() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let loc = GroupLocator::new(1, Variance::Covariant, Coords::Std, 0);
        let a = cd.marked_group(loc).unwrap();
        let b = cd.marked_group(loc).unwrap();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn s3_out_of_range() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        assert!(cd.marked_group(GroupLocator::new(
            4, Variance::Covariant, Coords::Std, 0)).is_none());
        assert!(cd.integer_chain_complex(
            ChainComplexLocator::new(2, Coords::MixBdry)).is_none());
        assert_eq!(cd.cell_count(
            ChainComplexLocator::new(2, Coords::DualBdry)), 0);
    }

    #[test]
    fn lens_5_1_homology() {
        let t = fixtures::lens_5_1();
        let cd = CD::new(Tri::D3(&t));
        let h1 = group(&cd, 1, Coords::Std);
        assert_eq!(h1.rank(), 0);
        assert_eq!(h1.invariant_factors(), &[5]);
        let h2 = group(&cd, 2, Coords::Std);
        assert!(h2.is_trivial());
        assert!(group(&cd, 3, Coords::Std).is_z());
        // mod 5 coefficients: H_1 = Z_5, H_2 picks up the Tor term
        let h1_5 = cd.unmarked_group(GroupLocator::new(
            1, Variance::Covariant, Coords::Std, 5)).unwrap();
        assert_eq!(h1_5.invariant_factors(), &[5]);
        let h2_5 = cd.unmarked_group(GroupLocator::new(
            2, Variance::Covariant, Coords::Std, 5)).unwrap();
        assert_eq!(h2_5.invariant_factors(), &[5]);
    }

    #[test]
    fn figure_eight_homology() {
        let t = fixtures::figure_eight();
        let cd = CD::new(Tri::D3(&t));
        assert!(group(&cd, 0, Coords::Std).is_z());
        assert!(group(&cd, 1, Coords::Std).is_z());
        assert!(group(&cd, 2, Coords::Std).is_trivial());
        // the boundary complex is the cusp torus
        let b0 = cd.unmarked_group(GroupLocator::new(
            0, Variance::Covariant, Coords::StdBdry, 0)).unwrap();
        let b1 = cd.unmarked_group(GroupLocator::new(
            1, Variance::Covariant, Coords::StdBdry, 0)).unwrap();
        let b2 = cd.unmarked_group(GroupLocator::new(
            2, Variance::Covariant, Coords::StdBdry, 0)).unwrap();
        assert!(b0.is_z());
        assert_eq!(b1.rank(), 2);
        assert!(b2.is_z());
    }

    #[test]
    fn poincare_sphere_homology() {
        let t = fixtures::poincare_sphere();
        let cd = CD::new(Tri::D3(&t));
        assert!(group(&cd, 0, Coords::Dual).is_z());
        assert!(group(&cd, 1, Coords::Dual).is_trivial());
        assert!(group(&cd, 2, Coords::Dual).is_trivial());
        assert!(group(&cd, 3, Coords::Dual).is_z());
        assert_eq!(cd.signature(), 0);
    }

    #[test]
    fn s4_homology() {
        let t = fixtures::s4_two_pentachora();
        let cd = CD::new(Tri::D4(&t));
        assert!(group(&cd, 0, Coords::Std).is_z());
        for d in 1..4 {
            assert!(group(&cd, d, Coords::Std).is_trivial(), "H{d}");
        }
        assert!(group(&cd, 4, Coords::Std).is_z());
        assert_eq!(cd.euler_char(), 2);
        assert_eq!(cd.signature(), 0);
    }

    #[test]
    fn cp2_homology_and_signature() {
        let t = fixtures::cp2();
        let cd = CD::new(Tri::D4(&t));
        assert!(group(&cd, 0, Coords::Std).is_z());
        assert!(group(&cd, 1, Coords::Std).is_trivial());
        assert!(group(&cd, 2, Coords::Std).is_z());
        assert!(group(&cd, 3, Coords::Std).is_trivial());
        assert!(group(&cd, 4, Coords::Std).is_z());
        assert_eq!(cd.euler_char(), 3);
        // the triangulation carries one of the two orientations of the
        // manifold, so only the magnitude of the signature is pinned down
        assert_eq!(cd.signature().abs(), 1);
        let p = cd.poincare_polynomial();
        assert_eq!(p.to_string(), "1 + t^2 + t^4");
        // Euler characteristic from the Poincaré polynomial at t = -1
        assert_eq!(p.eval(&-1), 3);
    }

    #[test]
    fn coefficient_change_map() {
        let t = fixtures::lens_5_1();
        let cd = CD::new(Tri::D3(&t));
        let dom = GroupLocator::new(1, Variance::Covariant, Coords::Std, 0);
        let ran = GroupLocator::new(1, Variance::Covariant, Coords::Std, 5);
        let f = cd.hom_group(HomLocator::new(dom, ran)).unwrap();
        assert!(f.is_cycle_map());
        // Z -> Z_5 reduction is onto on H_1 = Z_5
        assert!(f.is_epic());
        // a non-dividing change of coefficients is rejected
        let bad = GroupLocator::new(1, Variance::Covariant, Coords::Std, 3);
        assert!(cd.hom_group(HomLocator::new(
            GroupLocator::new(1, Variance::Covariant, Coords::Std, 5), bad))
            .is_none());
    }

    #[test]
    fn unrecognized_maps_return_none() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        // Mix -> Dual covariant is not a declared map
        let dom = GroupLocator::new(1, Variance::Covariant, Coords::Mix, 0);
        let ran = GroupLocator::new(1, Variance::Covariant, Coords::Dual, 0);
        assert!(cd.hom_group(HomLocator::new(dom, ran)).is_none());
    }
}
