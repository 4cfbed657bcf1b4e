//! The façade's self-checks: chain-complex and chain-map laws, the
//! subdivision isomorphisms, the long exact sequence of the pair,
//! Poincaré duality, and the bilinear forms. These hold by construction
//! for every valid triangulation; debug builds assert the first two at
//! construction time.

use tessella::{Integer, IntOps};
use tessella_matrix::Mat;

use crate::{
    CellularData, ChainComplexLocator, ChainMapLocator, Coords, FormLocator,
    FormType, GroupLocator, HomLocator, Variance,
};

impl<'a, R> CellularData<'a, R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    /// `∂ ∘ ∂ = 0` for every decomposition and dimension.
    pub fn chain_complexes_verified(&self) -> bool {
        use Coords::*;
        for coords in [Std, Dual, Mix, StdBdry, StdRelBdry] {
            let top = self.top_dim(coords);
            for d in 2..=top {
                let lo = self.integer_chain_complex(
                    ChainComplexLocator::new(d - 1, coords));
                let hi = self.integer_chain_complex(
                    ChainComplexLocator::new(d, coords));
                if let (Some(lo), Some(hi)) = (lo, hi) {
                    if !(&*lo * &*hi).is_zero() {
                        return false
                    }
                }
            }
        }
        true
    }

    fn cc(&self, d: usize, coords: Coords) -> Mat<R> {
        match self.integer_chain_complex(ChainComplexLocator::new(d, coords)) {
            Some(m) => (*m).clone(),
            None => {
                let rows = self.cell_count(
                    ChainComplexLocator::new(d.wrapping_sub(1), coords));
                let cols = self.cell_count(ChainComplexLocator::new(d, coords));
                Mat::zero((rows, cols))
            }
        }
    }

    fn cm(&self, d: usize, src: Coords, tgt: Coords) -> Option<Mat<R>> {
        self.integer_chain_map(ChainMapLocator::new(
            ChainComplexLocator::new(d, src),
            ChainComplexLocator::new(d, tgt),
        )).map(|m| (*m).clone())
    }

    /// Chain-commutation for every declared chain map, plus the
    /// anticommutation law of the connecting map.
    pub fn chain_maps_verified(&self) -> bool {
        use Coords::*;
        let n = self.dim();

        // subdivision and long-exact-sequence maps commute with ∂
        for (src, tgt, top) in [
            (Std, Mix, n),
            (Dual, Mix, n),
            (StdBdry, Std, n - 1),
            (Std, StdRelBdry, n),
        ] {
            for d in 1..=top {
                let (Some(m_lo), Some(m_hi)) =
                    (self.cm(d - 1, src, tgt), self.cm(d, src, tgt)) else {
                    return false
                };
                let lhs = &m_lo * &self.cc(d, src);
                let rhs = &self.cc(d, tgt) * &m_hi;
                if lhs != rhs {
                    return false
                }
            }
        }

        // the connecting map anticommutes:
        // sch_d ∘ ∂rel_{d+2} + ∂bdry_{d+1} ∘ sch_{d+1} = 0
        for d in 0..n - 1 {
            let sch_d = self.integer_chain_map(ChainMapLocator::new(
                ChainComplexLocator::new(d + 1, StdRelBdry),
                ChainComplexLocator::new(d, StdBdry)))
                .expect("connecting map missing");
            let sch_d1 = self.integer_chain_map(ChainMapLocator::new(
                ChainComplexLocator::new(d + 2, StdRelBdry),
                ChainComplexLocator::new(d + 1, StdBdry)))
                .expect("connecting map missing");
            let a = &*sch_d * &self.cc(d + 2, StdRelBdry);
            let b = &self.cc(d + 1, StdBdry) * &*sch_d1;
            if !(&a + &b).is_zero() {
                return false
            }
        }

        true
    }

    /// The subdivision chain maps induce isomorphisms on (co)homology at
    /// every dimension.
    pub fn coordinate_isomorphisms_verified(&self, variance: Variance,
                                            coef: u64) -> bool {
        let n = self.dim();
        for d in 0..=n {
            let pairs: [(Coords, Coords); 2] = match variance {
                Variance::Covariant =>
                    [(Coords::Std, Coords::Mix), (Coords::Dual, Coords::Mix)],
                Variance::Contravariant =>
                    [(Coords::Mix, Coords::Std), (Coords::Mix, Coords::Dual)],
            };
            for (src, tgt) in pairs {
                let h = self.hom_group(HomLocator::new(
                    GroupLocator::new(d, variance, src, coef),
                    GroupLocator::new(d, variance, tgt, coef)));
                match h {
                    Some(h) => if !h.is_isomorphism() { return false },
                    None => return false,
                }
            }
        }
        true
    }

    /// Exactness of the long exact sequence of the pair `(M, ∂M)`:
    /// consecutive compositions vanish and image matches kernel, up to
    /// rank and invariant factors.
    pub fn homology_les_verified(&self, variance: Variance, coef: u64)
        -> bool
    {
        let n = self.dim();
        let g = |d: usize, c: Coords| GroupLocator::new(d, variance, c, coef);

        // the maps of the sequence, ordered as they compose for homology:
        // ... -> H_d(∂) -> H_d(M) -> H_d(M,∂) -> H_{d-1}(∂) -> ...
        let mut seq = vec![];
        for d in (0..=n).rev() {
            if d < n {
                seq.push(HomLocator::new(
                    g(d, Coords::StdBdry), g(d, Coords::Std)));
            }
            seq.push(HomLocator::new(
                g(d, Coords::Std), g(d, Coords::StdRelBdry)));
            if d > 0 {
                seq.push(HomLocator::new(
                    g(d, Coords::StdRelBdry), g(d - 1, Coords::StdBdry)));
            }
        }
        if variance == Variance::Contravariant {
            // cohomology runs the arrows backwards
            seq.reverse();
            seq = seq.into_iter()
                .map(|h| HomLocator::new(h.range, h.domain))
                .collect();
        }

        for w in seq.windows(2) {
            let (Some(f), Some(gm)) =
                (self.hom_group(w[0]), self.hom_group(w[1])) else {
                return false
            };
            let comp = gm.compose(&f);
            if !comp.is_zero_map() {
                return false
            }
            if f.image() != gm.kernel() {
                return false
            }
        }
        true
    }

    /// The duality chain map induces isomorphisms
    /// `H_i(M; dual) ≅ H^{n-i}(M, ∂M)` (over `Z` when orientable, over
    /// `Z_2` always).
    pub fn poincare_duality_verified(&self) -> bool {
        let n = self.dim();
        let coefs: &[u64] = if self.tri.is_orientable() { &[0, 2] } else { &[2] };
        for &coef in coefs {
            for i in 0..=n {
                let h = self.hom_group(HomLocator::new(
                    GroupLocator::new(i, Variance::Covariant,
                        Coords::Dual, coef),
                    GroupLocator::new(n - i, Variance::Contravariant,
                        Coords::StdRelBdry, coef)));
                match h {
                    Some(h) => if !h.is_isomorphism() { return false },
                    None => return false,
                }
            }
        }
        true
    }

    /// Sanity of the intersection pairings: symmetry of the middle form
    /// in even dimensions, and nondegeneracy of the torsion linking form
    /// on closed orientable 3-manifolds.
    pub fn intersection_forms_verified(&self) -> bool {
        let n = self.dim();
        if n == 4 && self.tri.is_orientable() {
            let l = GroupLocator::new(2, Variance::Covariant, Coords::Dual, 0);
            match self.bilinear_form(FormLocator::new(
                FormType::Intersection, l, l)) {
                Some(b) => if !b.is_symmetric() { return false },
                None => return false,
            }
        }
        if n == 3 && self.tri.is_orientable() && self.is_closed() {
            let l = GroupLocator::new(1, Variance::Covariant, Coords::Dual, 0);
            let r = GroupLocator::new(1, Variance::Covariant,
                Coords::StdRelBdry, 0);
            match self.bilinear_form(FormLocator::new(
                FormType::TorsionLinking, l, r)) {
                Some(b) => {
                    if !b.ldomain().is_trivial()
                        && !b.left_adjoint().is_isomorphism() {
                        return false
                    }
                }
                None => return false,
            }
        }
        true
    }

    fn is_closed(&self) -> bool {
        self.ix.num_std_bdry.iter().all(|&c| c == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tri;
    use tessella_tri::fixtures;

    type CD<'a> = CellularData<'a, i64>;

    fn init_logger() {
        let _ = simplelog::SimpleLogger::init(
            log::LevelFilter::Warn, simplelog::Config::default());
    }

    fn full_check(cd: &CD) {
        init_logger();
        assert!(cd.chain_complexes_verified());
        assert!(cd.chain_maps_verified());
        for variance in [Variance::Covariant, Variance::Contravariant] {
            for coef in [0, 2, 3] {
                assert!(cd.coordinate_isomorphisms_verified(variance, coef),
                    "coordinate isomorphisms failed at {variance:?}, {coef}");
                assert!(cd.homology_les_verified(variance, coef),
                    "LES failed at {variance:?}, {coef}");
            }
        }
        assert!(cd.poincare_duality_verified());
        assert!(cd.intersection_forms_verified());
    }

    #[test]
    fn s3_one_tet_all_checks() {
        let t = fixtures::s3_one_tet();
        full_check(&CD::new(Tri::D3(&t)));
    }

    #[test]
    fn lens_5_1_all_checks() {
        let t = fixtures::lens_5_1();
        full_check(&CD::new(Tri::D3(&t)));
    }

    #[test]
    fn figure_eight_all_checks() {
        let t = fixtures::figure_eight();
        full_check(&CD::new(Tri::D3(&t)));
    }

    #[test]
    fn s4_all_checks() {
        let t = fixtures::s4_two_pentachora();
        full_check(&CD::new(Tri::D4(&t)));
    }

    #[test]
    fn cp2_all_checks() {
        let t = fixtures::cp2();
        full_check(&CD::new(Tri::D4(&t)));
    }

    #[test]
    fn closed_manifold_relative_is_identity() {
        // no boundary: the quotient onto the relative complex is the
        // identity at every dimension
        let t = fixtures::lens_5_1();
        let cd = CD::new(Tri::D3(&t));
        for d in 0..=3 {
            assert_eq!(cd.cell_count(
                ChainComplexLocator::new(d.min(2), Coords::StdBdry)), 0);
            let f = cd.hom_group(HomLocator::new(
                GroupLocator::new(d, Variance::Covariant, Coords::Std, 0),
                GroupLocator::new(d, Variance::Covariant, Coords::StdRelBdry, 0),
            )).unwrap();
            assert!(f.is_identity());
        }
    }

    #[test]
    fn subdivision_round_trip() {
        let t = fixtures::lens_5_1();
        let cd = CD::new(Tri::D3(&t));
        for d in 0..=3 {
            let f = cd.hom_group(HomLocator::new(
                GroupLocator::new(d, Variance::Covariant, Coords::Std, 0),
                GroupLocator::new(d, Variance::Covariant, Coords::Mix, 0),
            )).unwrap();
            let g = f.inverse_hom().unwrap();
            assert!(g.compose(&f).is_identity(), "round trip failed at {d}");
        }
    }

    #[test]
    fn poincare_sphere_all_checks() {
        let t = fixtures::poincare_sphere();
        let cd = CD::new(Tri::D3(&t));
        assert!(cd.chain_complexes_verified());
        assert!(cd.chain_maps_verified());
        assert!(cd.poincare_duality_verified());
    }
}
