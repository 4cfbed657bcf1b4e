//! The bilinear-form engine: evaluation pairings, intersection products,
//! and torsion linking forms, plus the convenience coordinate variants
//! obtained by composing with subdivision isomorphisms.

use std::rc::Rc;

use num_traits::{One, Zero};
use tessella::{EucRing, Integer, IntOps, Sign};
use tessella::perm::{self, Perm};
use tessella_algebra::{BilinearForm, HomMarkedAbelianGroup, MarkedAbelianGroup};
use tessella_matrix::{Mat, SparseGrid};
use tessella_tri::{Triangulation3, Triangulation4};

use crate::{
    CellularData, Coords, FormLocator, FormType, GroupLocator, HomLocator,
    Tri, Variance,
};

fn sgn(s: Sign) -> i64 {
    s.to_i64()
}

impl<'a, R> CellularData<'a, R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    /// The bilinear form at a locator: evaluation, intersection or torsion
    /// linking, in their primary coordinates or the recognized convenience
    /// coordinates. `None` for anything else (cup products included).
    pub fn bilinear_form(&self, f: FormLocator) -> Option<Rc<BilinearForm<R>>> {
        if let Some(b) = self.forms.borrow().get(&f) {
            return Some(Rc::clone(b))
        }
        let built = match f.form_type {
            FormType::Evaluation => self.evaluation_form(f),
            FormType::Intersection => self.intersection_form(f),
            FormType::TorsionLinking => self.torsion_linking_form(f),
            FormType::CupProduct => None,
        }?;
        let built = Rc::new(built);
        self.forms.borrow_mut().insert(f, Rc::clone(&built));
        Some(built)
    }

    /// Kronecker pairing `H_d ⊗ H^d -> Z_m`.
    fn evaluation_form(&self, f: FormLocator) -> Option<BilinearForm<R>> {
        let (l, r) = (f.left, f.right);
        if l.dim != r.dim || l.variance == r.variance
            || l.coef != r.coef || l.coords != r.coords {
            return None
        }
        let ld = self.marked_group(l)?;
        let rd = self.marked_group(r)?;
        let range = MarkedAbelianGroup::elementary(1, R::from_i64(l.coef as i64));

        let mut grid = SparseGrid::new(3);
        for i in 0..ld.rank_cc() {
            grid.set(&[i, i, 0], R::one());
        }
        Some(BilinearForm::new((*ld).clone(), (*rd).clone(), range, grid))
    }

    fn intersection_form(&self, f: FormLocator) -> Option<BilinearForm<R>> {
        let (l, r) = (f.left, f.right);
        let n = self.dim();
        if l.variance != Variance::Covariant || r.variance != Variance::Covariant {
            return None
        }
        if l.dim + r.dim < n || (l.dim + r.dim) - n >= n - 1 {
            return None
        }
        if l.dim == 0 || r.dim == 0 || l.coef != r.coef {
            return None
        }

        // primary coordinates
        if l.coords == Coords::Dual && r.coords == Coords::StdRelBdry {
            if l.coef != 2 && !self.tri.is_orientable() {
                return None
            }
            let ld = self.marked_group(l)?;
            let rd = self.marked_group(r)?;
            let range = self.marked_group(GroupLocator::new(
                l.dim + r.dim - n, Variance::Covariant, Coords::Mix, l.coef))?;

            let grid = match self.tri {
                Tri::D3(t) => self.intersection_grid_3(t, l.dim, r.dim),
                Tri::D4(t) => self.intersection_grid_4(t, l.dim, r.dim),
            };
            return Some(BilinearForm::new(
                (*ld).clone(), (*rd).clone(), (*range).clone(), grid))
        }

        // convenience: Dual x Dual, through homologous classes
        if l.coords == Coords::Dual && r.coords == Coords::Dual {
            let dc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Dual, r.coef);
            let mc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Mix, r.coef);
            let sc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Std, r.coef);
            let sb = GroupLocator::new(r.dim, Variance::Covariant, Coords::StdRelBdry, r.coef);
            let sc_sb = self.hom_group(HomLocator::new(sc, sb))?;
            let sc_mc = self.hom_group(HomLocator::new(sc, mc))?;
            let dc_mc = self.hom_group(HomLocator::new(dc, mc))?;
            let f_map = sc_sb.compose(&sc_mc.inverse_hom()?.compose(&dc_mc));
            let prim = FormLocator::new(FormType::Intersection, l,
                GroupLocator { coords: Coords::StdRelBdry, ..r });
            let base = self.bilinear_form(prim)?;
            return Some(base.r_compose(&f_map))
        }

        // convenience: Std x StdRelBdry, moving the left class to Dual
        if l.coords == Coords::Std && r.coords == Coords::StdRelBdry {
            let dc = GroupLocator::new(l.dim, Variance::Covariant, Coords::Dual, l.coef);
            let mc = GroupLocator::new(l.dim, Variance::Covariant, Coords::Mix, l.coef);
            let sc = GroupLocator::new(l.dim, Variance::Covariant, Coords::Std, l.coef);
            let sc_mc = self.hom_group(HomLocator::new(sc, mc))?;
            let dc_mc = self.hom_group(HomLocator::new(dc, mc))?;
            let f_map = dc_mc.inverse_hom()?.compose(&sc_mc);
            let prim = FormLocator::new(FormType::Intersection,
                GroupLocator { coords: Coords::Dual, ..l }, r);
            let base = self.bilinear_form(prim)?;
            return Some(base.l_compose(&f_map))
        }

        None
    }

    fn intersection_grid_3(&self, t: &Triangulation3, ldim: usize, rdim: usize)
        -> SparseGrid<R>
    {
        let ix = &self.ix;
        let nc = &ix.num_non_ideal;
        let mut grid = SparseGrid::new(3);

        match (ldim, rdim) {
            // (dual) H_2 x (rel) H_2 -> (mix) H_1
            (2, 2) => {
                for i in 0..ix.num_rel[2] {
                    let fac = ix.r[2][i];
                    let femb = &t.face(2, fac).embeddings[1];
                    let tet = femb.simplex;
                    let facinc = femb.vertices;
                    for j in 0..3 {
                        let (edg, _) = t.subface(2, fac, 1, j);
                        if t.is_boundary_face(1, edg) { continue }
                        let dual_ix = ix.dc_lookup(2, edg);
                        let e_num = perm::edge_number_4(
                            facinc[(j + 1) % 3], facinc[(j + 2) % 3]);
                        let mut edginc = t.face_mapping(tet, 1, e_num);
                        if t.orientation(tet) != edginc.sign() {
                            edginc = edginc * Perm::transposition(0, 1);
                        }
                        let inout =
                            if t.orientation(tet) == facinc.sign() { 1 } else { -1 };
                        let dualor = Perm::from_images([
                            facinc[j], edginc[0], edginc[1], facinc[3]]);
                        let val = sgn(dualor.sign()) * inout
                            * sgn(t.orientation(tet));
                        grid.accumulate(
                            &[dual_ix, i, 2 * nc[1] + 3 * fac + j],
                            R::from_i64(val));
                    }
                }
            }
            // (dual) H_2 x (rel) H_1 -> (mix) H_0
            (2, 1) => {
                for i in 0..ix.num_rel[1] {
                    let edg = ix.r[1][i];
                    let emb = t.face(1, edg).front();
                    let val = sgn(emb.vertices.sign())
                        * sgn(t.orientation(emb.simplex));
                    grid.accumulate(
                        &[ix.dc_lookup(2, edg), i, nc[0] + edg],
                        R::from_i64(val));
                }
            }
            // (dual) H_1 x (rel) H_2 -> (mix) H_0
            (1, 2) => {
                for i in 0..ix.num_rel[2] {
                    let fac = ix.r[2][i];
                    let emb = t.face(2, fac).front();
                    let val = sgn(emb.vertices.sign())
                        * sgn(t.orientation(emb.simplex));
                    grid.accumulate(
                        &[ix.dc_lookup(1, fac), i, nc[0] + nc[1] + fac],
                        R::from_i64(val));
                }
            }
            _ => unreachable!("dimension case outside the 3-manifold range"),
        }
        grid
    }

    fn intersection_grid_4(&self, t: &Triangulation4, ldim: usize, rdim: usize)
        -> SparseGrid<R>
    {
        let ix = &self.ix;
        let nc = &ix.num_non_ideal;
        let mut grid = SparseGrid::new(3);

        match (ldim, rdim) {
            // (dual) H_2 x (rel) H_2 -> (mix) H_0
            (2, 2) => {
                for i in 0..ix.num_rel[2] {
                    let fac = ix.r[2][i];
                    let emb = t.face(2, fac).front();
                    let val = sgn(emb.vertices.sign())
                        * sgn(t.orientation(emb.simplex));
                    grid.accumulate(
                        &[ix.dc_lookup(2, fac), i, nc[0] + nc[1] + fac],
                        R::from_i64(val));
                }
            }
            // (dual) H_1 x (rel) H_3 -> (mix) H_0
            (1, 3) => {
                for i in 0..ix.num_rel[3] {
                    let tet = ix.r[3][i];
                    let emb = t.face(3, tet).front();
                    let val = sgn(emb.vertices.sign())
                        * sgn(t.orientation(emb.simplex));
                    grid.accumulate(
                        &[ix.dc_lookup(1, tet), i, nc[0] + nc[1] + nc[2] + tet],
                        R::from_i64(val));
                }
            }
            // (dual) H_3 x (rel) H_1 -> (mix) H_0
            (3, 1) => {
                for i in 0..ix.num_rel[1] {
                    let edg = ix.r[1][i];
                    let emb = t.face(1, edg).front();
                    let val = sgn(emb.vertices.sign())
                        * sgn(t.orientation(emb.simplex));
                    grid.accumulate(
                        &[ix.dc_lookup(3, edg), i, nc[0] + edg],
                        R::from_i64(val));
                }
            }
            // (dual) H_2 x (rel) H_3 -> (mix) H_1
            (2, 3) => {
                for i in 0..ix.num_rel[3] {
                    let tet = ix.r[3][i];
                    let temb = &t.face(3, tet).embeddings[1];
                    let pen = temb.simplex;
                    let tetinc = temb.vertices;
                    for j in 0..4 {
                        let (fac, _) = t.subface(3, tet, 2, j);
                        if t.is_boundary_face(2, fac) { continue }
                        let f_num = perm::triangle_number_5(
                            tetinc[(j + 1) % 4], tetinc[(j + 2) % 4],
                            tetinc[(j + 3) % 4]);
                        let mut facinc = t.face_mapping(pen, 2, f_num);
                        if facinc.sign() != t.orientation(pen) {
                            facinc = facinc * Perm::transposition(0, 1);
                        }
                        let inout =
                            if tetinc.sign() == t.orientation(pen) { 1 } else { -1 };
                        let dualor = Perm::from_images([
                            tetinc[j], facinc[0], facinc[1], facinc[2],
                            temb.slot]);
                        let val = sgn(dualor.sign()) * inout
                            * sgn(t.orientation(pen));
                        grid.accumulate(
                            &[ix.dc_lookup(2, fac), i,
                              2 * nc[1] + 3 * nc[2] + 4 * tet + j],
                            R::from_i64(val));
                    }
                }
            }
            // (dual) H_3 x (rel) H_2 -> (mix) H_1
            (3, 2) => {
                for i in 0..ix.num_rel[2] {
                    let fac = ix.r[2][i];
                    let femb = t.face(2, fac).front();
                    let pen = femb.simplex;
                    let mut facinc = femb.vertices;
                    for j in 0..3 {
                        let (edg, _) = t.subface(2, fac, 1, j);
                        if t.is_boundary_face(1, edg) { continue }
                        let e_num = perm::edge_number_5(
                            facinc[(j + 1) % 3], facinc[(j + 2) % 3]);
                        let mut edginc = t.face_mapping(pen, 1, e_num);
                        if facinc.sign() != t.orientation(pen) {
                            facinc = facinc * Perm::transposition(3, 4);
                        }
                        if edginc.sign() != t.orientation(pen) {
                            edginc = edginc * Perm::transposition(0, 1);
                        }
                        let dualor = Perm::from_images([
                            facinc[j], edginc[0], edginc[1],
                            facinc[3], facinc[4]]);
                        let val = sgn(dualor.sign()) * sgn(t.orientation(pen));
                        grid.accumulate(
                            &[ix.dc_lookup(3, edg), i, 2 * nc[1] + 3 * fac + j],
                            R::from_i64(val));
                    }
                }
            }
            // (dual) H_3 x (rel) H_3 -> (mix) H_2
            (3, 3) => {
                for i in 0..ix.num_rel[3] {
                    let tet = ix.r[3][i];
                    let temb = &t.face(3, tet).embeddings[1];
                    let pen = temb.simplex;
                    let tetinc = temb.vertices;
                    for j in 0..6 {
                        let (edg, edgintet) = t.subface(3, tet, 1, j);
                        if t.is_boundary_face(1, edg) { continue }
                        let ordual = tetinc * edgintet;
                        let e_num = perm::edge_number_5(ordual[0], ordual[1]);
                        let mut edginc = t.face_mapping(pen, 1, e_num);
                        if edginc.sign() != t.orientation(pen) {
                            edginc = edginc * Perm::transposition(0, 1);
                        }
                        let inout =
                            if tetinc.sign() == t.orientation(pen) { 1 } else { -1 };
                        let dualor = Perm::from_images([
                            ordual[2], ordual[3], edginc[0], edginc[1],
                            temb.slot]);
                        let val = sgn(dualor.sign()) * inout
                            * sgn(t.orientation(pen));
                        grid.accumulate(
                            &[ix.dc_lookup(3, edg), i, 3 * nc[2] + 6 * tet + j],
                            R::from_i64(val));
                    }
                }
            }
            _ => unreachable!("dimension case outside the 4-manifold range"),
        }
        grid
    }

    fn torsion_linking_form(&self, f: FormLocator) -> Option<BilinearForm<R>> {
        let (l, r) = (f.left, f.right);
        let n = self.dim();
        if l.variance != Variance::Covariant || r.variance != Variance::Covariant {
            return None
        }
        if l.dim + r.dim + 1 != n || l.dim == 0 || r.dim == 0
            || l.coef != 0 || r.coef != 0 {
            return None
        }

        // primary coordinates
        if l.coords == Coords::Dual && r.coords == Coords::StdRelBdry {
            let ld = self.marked_group(l)?;
            let rd = self.marked_group(r)?;
            let ldomain = ld.torsion_subgroup();
            let rdomain = rd.torsion_subgroup();

            let big_n = if ldomain.is_trivial() || rdomain.is_trivial() {
                R::one()
            } else {
                R::gcd(
                    ld.invariant_factor(ld.count_invariant_factors() - 1),
                    rd.invariant_factor(rd.count_invariant_factors() - 1))
            };
            let range = MarkedAbelianGroup::elementary(1, big_n.clone());

            let mut grid = SparseGrid::new(3);
            for i in 0..ld.count_invariant_factors() {
                let dual_vec = ld.torsion_rep(i)?;
                for j in 0..rd.count_invariant_factors() {
                    let order = rd.invariant_factor(j).clone();
                    let scaled: Vec<R> = rd.torsion_rep(j)?
                        .into_iter().map(|x| &x * &order).collect();
                    let chain = rd.write_as_boundary(&scaled)?;
                    let mut sum =
                        self.linking_intersection(l.dim, &dual_vec, &chain);
                    sum = &sum * &(&big_n / &order);
                    sum = sum.rem_euclid_by(&big_n);
                    if !sum.is_zero() {
                        grid.set(&[i, j, 0], sum);
                    }
                }
            }
            return Some(BilinearForm::new(ldomain, rdomain, range, grid))
        }

        // convenience: Dual x Dual
        if l.coords == Coords::Dual && r.coords == Coords::Dual {
            let dc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Dual, 0);
            let mc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Mix, 0);
            let sc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Std, 0);
            let sb = GroupLocator::new(r.dim, Variance::Covariant, Coords::StdRelBdry, 0);
            let sc_sb = self.hom_group(HomLocator::new(sc, sb))?;
            let sc_mc = self.hom_group(HomLocator::new(sc, mc))?;
            let dc_mc = self.hom_group(HomLocator::new(dc, mc))?;
            let rinc = dc_mc.domain().torsion_inclusion();
            let lproj = torsion_projection(sc_sb.codomain());
            let f_map = lproj
                .compose(&sc_sb)
                .compose(&sc_mc.inverse_hom()?)
                .compose(&dc_mc)
                .compose(&rinc);
            let prim = FormLocator::new(FormType::TorsionLinking, l,
                GroupLocator { coords: Coords::StdRelBdry, ..r });
            let base = self.bilinear_form(prim)?;
            return Some(base.r_compose(&f_map))
        }

        // convenience: Std x Std
        if l.coords == Coords::Std && r.coords == Coords::Std {
            let dc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Dual, 0);
            let mc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Mix, 0);
            let sc = GroupLocator::new(r.dim, Variance::Covariant, Coords::Std, 0);
            let sb = GroupLocator::new(r.dim, Variance::Covariant, Coords::StdRelBdry, 0);
            let sc_sb = self.hom_group(HomLocator::new(sc, sb))?
                .torsion_subgroup_hom();
            let sc_mc = self.hom_group(HomLocator::new(sc, mc))?
                .torsion_subgroup_hom();
            let dc_mc = self.hom_group(HomLocator::new(dc, mc))?
                .torsion_subgroup_hom();
            let f_left = dc_mc.inverse_hom()?.compose(&sc_mc);
            let prim = FormLocator::new(FormType::TorsionLinking,
                GroupLocator { coords: Coords::Dual, ..l },
                GroupLocator { coords: Coords::StdRelBdry, ..r });
            let base = self.bilinear_form(prim)?;
            return Some(base.l_compose(&f_left).r_compose(&sc_sb))
        }

        None
    }

    /// The diagonal intersection number between a dual cycle and a
    /// relative chain of complementary dimensions: both are indexed by the
    /// same interior faces, paired with the embedding orientation.
    fn linking_intersection(&self, ldim: usize, dual_vec: &[R], chain: &[R])
        -> R
    {
        let n = self.dim();
        let fdim = n - ldim;
        let mut sum = R::zero();
        for (k, z) in dual_vec.iter().enumerate() {
            if z.is_zero() { continue }
            let face = self.ix.dc[ldim][k];
            let rel = self.ix.r_lookup(fdim, face);
            if chain[rel].is_zero() { continue }
            let val = match self.tri {
                Tri::D3(t) => {
                    let emb = t.face(fdim, face).front();
                    sgn(emb.vertices.sign()) * sgn(t.orientation(emb.simplex))
                }
                Tri::D4(t) => {
                    let emb = t.face(fdim, face).front();
                    sgn(emb.vertices.sign()) * sgn(t.orientation(emb.simplex))
                }
            };
            sum += &(&chain[rel] * z) * &R::from_i64(val);
        }
        sum
    }

}

/// The projection of a marked group onto its trivially presented torsion
/// subgroup, one SNF coordinate at a time.
fn torsion_projection<R>(g: &MarkedAbelianGroup<R>) -> HomMarkedAbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    let rows = g.count_invariant_factors();
    let cols = g.rank_cc();
    let m = Mat::generate((rows, cols), |i, j| {
        match g.cycle_projection_unit(j).and_then(|p| g.snf_rep(&p)) {
            Some(rep) => rep[i].clone(),
            None => R::zero(),
        }
    });
    HomMarkedAbelianGroup::new(g.clone(), g.torsion_subgroup(), m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_tri::fixtures;
    use crate::Tri;

    type CD<'a> = CellularData<'a, i64>;

    fn cov(dim: usize, coords: Coords, coef: u64) -> GroupLocator {
        GroupLocator::new(dim, Variance::Covariant, coords, coef)
    }

    #[test]
    fn evaluation_form_s3() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let l = cov(1, Coords::Std, 0);
        let r = GroupLocator::new(1, Variance::Contravariant, Coords::Std, 0);
        let b = cd.bilinear_form(FormLocator::new(
            FormType::Evaluation, l, r)).unwrap();
        // H_1 = 0, so the reduced pairing is empty but well-formed
        assert!(b.ldomain().is_trivial());
    }

    #[test]
    fn cp2_intersection_form() {
        let t = fixtures::cp2();
        let cd = CD::new(Tri::D4(&t));
        let l = cov(2, Coords::Dual, 0);
        let b = cd.bilinear_form(FormLocator::new(
            FormType::Intersection, l, l)).unwrap();
        assert!(b.is_symmetric());
        assert_eq!(b.z_form_signature().abs(), 1);
        // the single generator pairs to ±1
        let v = b.eval_snf_gens(0, 0);
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].abs(), 1);
    }

    #[test]
    fn s4_intersection_form_is_empty() {
        let t = fixtures::s4_two_pentachora();
        let cd = CD::new(Tri::D4(&t));
        let l = cov(2, Coords::Dual, 0);
        let b = cd.bilinear_form(FormLocator::new(
            FormType::Intersection, l, l)).unwrap();
        assert!(b.ldomain().is_trivial());
        assert_eq!(b.z_form_signature(), 0);
    }

    #[test]
    fn lens_torsion_linking_form() {
        let t = fixtures::lens_5_1();
        let cd = CD::new(Tri::D3(&t));
        let l = cov(1, Coords::Dual, 0);
        let r = cov(1, Coords::StdRelBdry, 0);
        let b = cd.bilinear_form(FormLocator::new(
            FormType::TorsionLinking, l, r)).unwrap();
        assert_eq!(b.ldomain().invariant_factors(), &[5]);
        assert_eq!(b.rdomain().invariant_factors(), &[5]);
        // l(g, g) = k/5 with k nonzero
        let v = b.eval_snf_gens(0, 0);
        let k = v[0].rem_euclid(5);
        assert!(k >= 1 && k <= 4, "linking value was {k}/5");
        // the adjoint Z_5 -> Hom(Z_5, Q/Z) is an isomorphism
        assert!(b.left_adjoint().is_isomorphism());
    }

    #[test]
    fn poincare_torsion_linking_is_trivial() {
        let t = fixtures::poincare_sphere();
        let cd = CD::new(Tri::D3(&t));
        let l = cov(1, Coords::Dual, 0);
        let r = cov(1, Coords::StdRelBdry, 0);
        let b = cd.bilinear_form(FormLocator::new(
            FormType::TorsionLinking, l, r)).unwrap();
        // H_1 is torsion-free (trivial), so the form is empty
        assert!(b.ldomain().is_trivial());
        assert!(b.reduced_pairing().is_empty());
    }

    #[test]
    fn cup_product_reserved() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let l = GroupLocator::new(1, Variance::Contravariant, Coords::Dual, 0);
        assert!(cd.bilinear_form(FormLocator::new(
            FormType::CupProduct, l, l)).is_none());
    }
}
