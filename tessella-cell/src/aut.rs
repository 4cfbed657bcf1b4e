//! The simplicial automorphism engine: the group of combinatorial
//! self-isomorphisms, its presentation, its action on cellular chain
//! complexes and homology, and the fixed-point stratification of each
//! element into linear facets.

use std::collections::BTreeSet;
use std::rc::Rc;

use tessella::{Integer, IntOps};
use tessella::perm::{self, Perm};
use tessella_algebra::{GroupPresentation, HomMarkedAbelianGroup};
use tessella_matrix::Mat;
use tessella_tri::Triangulation;

use crate::{CellularData, Coords, GroupLocator, Tri, Variance};

/// One self-isomorphism as raw data: per top-simplex, the image simplex
/// and the permutation stored by its index in `S_{n+1}`. IsoStructs are
/// ordered lexicographically so a sorted list supports binary search.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct IsoStruct {
    pub germs: Vec<(usize, usize)>,
}

impl IsoStruct {
    pub fn is_identity(&self) -> bool {
        // permutation index zero is the identity in the lexicographic
        // enumeration
        self.germs.iter().enumerate().all(|(s, &(t, p))| s == t && p == 0)
    }
}

/// A sub-polytope of a standard cell: the convex hull of the barycentres
/// of the partition blocks. `ambient_dim`/`ambient_index` name the
/// carrying cell, `dim` is the facet's own dimension (one less than the
/// number of blocks).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LinearFacet {
    pub dim: usize,
    pub ambient_dim: usize,
    pub ambient_index: usize,
    pub partition: Vec<BTreeSet<usize>>,
}

pub struct SimplicialAutGroup<'c, 'a, R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    data: &'c CellularData<'a, R>,
    elements: Vec<IsoStruct>,
}

impl<'a, R> CellularData<'a, R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    /// The full group of simplicial automorphisms, sorted so that the
    /// identity sits at index zero.
    pub fn simplicial_automorphism_group(&self) -> SimplicialAutGroup<'_, 'a, R> {
        let mut elements: Vec<IsoStruct> = match self.tri {
            Tri::D3(t) => t.find_all_isomorphisms().into_iter().map(|iso| {
                IsoStruct {
                    germs: iso.germs.into_iter()
                        .map(|(t2, p)| (t2, p.index())).collect(),
                }
            }).collect(),
            Tri::D4(t) => t.find_all_isomorphisms().into_iter().map(|iso| {
                IsoStruct {
                    germs: iso.germs.into_iter()
                        .map(|(t2, p)| (t2, p.index())).collect(),
                }
            }).collect(),
        };
        elements.sort();
        debug_assert!(elements[0].is_identity());
        SimplicialAutGroup { data: self, elements }
    }
}

/// Parity of a permutation given by its image sequence.
fn images_sign(images: &[usize]) -> i64 {
    let mut inv = 0;
    for i in 0..images.len() {
        for j in i + 1..images.len() {
            if images[i] > images[j] {
                inv += 1;
            }
        }
    }
    if inv % 2 == 0 { 1 } else { -1 }
}

/// Cycle decomposition of a permutation of `{0..len}` given by images.
fn cycle_partition(images: &[usize]) -> Vec<BTreeSet<usize>> {
    let mut seen = vec![false; images.len()];
    let mut blocks = vec![];
    for start in 0..images.len() {
        if seen[start] { continue }
        let mut block = BTreeSet::new();
        let mut x = start;
        while !seen[x] {
            seen[x] = true;
            block.insert(x);
            x = images[x];
        }
        blocks.push(block);
    }
    blocks.sort();
    blocks
}

impl<'c, 'a, R> SimplicialAutGroup<'c, 'a, R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    pub fn order(&self) -> usize {
        self.elements.len()
    }

    pub fn element(&self, i: usize) -> &IsoStruct {
        &self.elements[i]
    }

    /// Index of `g_i ∘ g_j`, by binary search in the sorted element list.
    pub fn compose(&self, i: usize, j: usize) -> usize {
        let composite = match self.data.tri {
            Tri::D3(_) => self.compose_g::<4>(i, j),
            Tri::D4(_) => self.compose_g::<5>(i, j),
        };
        self.elements.binary_search(&composite)
            .expect("composite of two automorphisms is not in the group")
    }

    fn compose_g<const V: usize>(&self, i: usize, j: usize) -> IsoStruct {
        let (gi, gj) = (&self.elements[i], &self.elements[j]);
        let germs = (0..gj.germs.len()).map(|s| {
            let (mid, pj) = gj.germs[s];
            let (tgt, pi) = gi.germs[mid];
            let p = Perm::<V>::from_index(pi) * Perm::<V>::from_index(pj);
            (tgt, p.index())
        }).collect();
        IsoStruct { germs }
    }

    pub fn multiplication_table(&self) -> Vec<Vec<usize>> {
        let n = self.order();
        (0..n).map(|i| (0..n).map(|j| self.compose(i, j)).collect()).collect()
    }

    /// One generator per element, one relation `g_i g_j g_k⁻¹` per pair,
    /// handed to the Tietze reducer.
    pub fn group_presentation(&self) -> GroupPresentation {
        let n = self.order();
        let mut relators = vec![];
        for i in 0..n {
            for j in 0..n {
                let k = self.compose(i, j);
                relators.push(vec![(i, 1i64), (j, 1), (k, -1)]);
            }
        }
        let mut pres = GroupPresentation::new(n, relators);
        pres.simplify();
        pres
    }

    /// Whether each element preserves or reverses orientation.
    pub fn orientation_action(&self) -> Vec<i64> {
        match self.data.tri {
            Tri::D3(t) => self.orientation_action_g::<4>(t),
            Tri::D4(t) => self.orientation_action_g::<5>(t),
        }
    }

    fn orientation_action_g<const V: usize>(&self, t: &Triangulation<V>)
        -> Vec<i64>
    {
        self.elements.iter().map(|iso| {
            let (tgt, p) = iso.germs[0];
            t.orientation(0).to_i64()
                * Perm::<V>::from_index(p).sign().to_i64()
                * t.orientation(tgt).to_i64()
        }).collect()
    }

    /// The action of every element on a standard-coordinate homology
    /// group. `None` unless the locator is covariant, standard, and in
    /// range.
    pub fn homology_action(&self, loc: GroupLocator)
        -> Option<Vec<Rc<HomMarkedAbelianGroup<R>>>>
    {
        if loc.coords != Coords::Std || loc.variance != Variance::Covariant {
            return None
        }
        if loc.dim > self.data.dim() {
            return None
        }
        let group = self.data.marked_group(loc)?;
        let homs = (0..self.order()).map(|a| {
            let mat = self.action_matrix(a, loc.dim);
            let hom = HomMarkedAbelianGroup::new(
                (*group).clone(), (*group).clone(), mat);
            debug_assert!(hom.is_cycle_map());
            debug_assert!(hom.is_isomorphism());
            Rc::new(hom)
        }).collect();
        Some(homs)
    }

    /// The reduced matrices of the action on `H_1` in standard
    /// coordinates.
    pub fn homology_h1_action(&self) -> Vec<Mat<R>> {
        let loc = GroupLocator::new(1, Variance::Covariant, Coords::Std, 0);
        self.homology_action(loc)
            .map(|homs| homs.iter()
                .map(|h| h.reduced_matrix().clone()).collect())
            .unwrap_or_default()
    }

    /// Chain-level action of element `a` on the standard `d`-cells.
    pub fn action_matrix(&self, a: usize, d: usize) -> Mat<R> {
        match self.data.tri {
            Tri::D3(t) => self.action_matrix_g::<4>(t, a, d),
            Tri::D4(t) => self.action_matrix_g::<5>(t, a, d),
        }
    }

    /// Image cell and induced vertex permutation of a non-ideal standard
    /// `d`-cell under element `a`. The returned images live on the cell's
    /// intrinsic labels `0..=d` (for `d = n` they are the simplex labels).
    fn image_of_cell<const V: usize>(&self, t: &Triangulation<V>, a: usize,
                                     d: usize, f: usize)
        -> (usize, Vec<usize>)
    {
        let n = V - 1;
        let iso = &self.elements[a];
        let (dom_sim, dom_perm) = if d == n {
            (f, Perm::<V>::id())
        } else {
            let emb = t.face(d, f).front();
            (emb.simplex, emb.vertices)
        };
        let (ran_sim, mp) = iso.germs[dom_sim];
        let m_perm = Perm::<V>::from_index(mp);
        if d == n {
            let tpara: Vec<usize> = (0..=d).map(|k| m_perm[k]).collect();
            (ran_sim, tpara)
        } else {
            let verts: Vec<usize> =
                (0..=d).map(|k| m_perm[dom_perm[k]]).collect();
            let slot = perm::face_number(V, d, &verts);
            let g = t.face_index(ran_sim, d, slot);
            let ran_perm = t.face_mapping(ran_sim, d, slot);
            let tpara: Vec<usize> = (0..=d)
                .map(|k| ran_perm.pre_image_of(m_perm[dom_perm[k]]))
                .collect();
            (g, tpara)
        }
    }

    fn action_matrix_g<const V: usize>(&self, t: &Triangulation<V>, a: usize,
                                       d: usize) -> Mat<R> {
        let n = V - 1;
        let ix = &self.data.ix;
        let size = ix.num_standard[d];
        let mut mat = Mat::zero((size, size));

        // non-ideal cells
        for j in 0..ix.num_non_ideal[d] {
            let f = ix.nic[d][j];
            let (g, tpara) = self.image_of_cell(t, a, d, f);
            let i = if d == n { g } else { ix.nic_lookup(d, g) };
            mat[(i, j)] = R::from_i64(images_sign(&tpara));
        }

        // ideal cells ride on their carrying (d+1)-face
        for j in 0..ix.ideal_count(d) {
            let (f, v) = ix.ic_index(d, j);
            let (g, tpara) = self.image_of_cell(t, a, d + 1, f);
            let i = ix.ic_lookup(d, g, tpara[v]);
            mat[(ix.num_non_ideal[d] + i, ix.num_non_ideal[d] + j)] =
                R::from_i64(images_sign(&tpara));
        }

        mat
    }

    /// The fixed-point sets of the elements, lazily, one element at a
    /// time: linear facets inside the preserved standard cells, one
    /// centroid per cycle of the induced vertex permutation.
    pub fn fixed_points(&self)
        -> impl Iterator<Item = BTreeSet<LinearFacet>> + '_
    {
        (0..self.order()).map(move |a| self.fixed_point_set(a))
    }

    /// The fixed-point set of one element.
    pub fn fixed_point_set(&self, a: usize) -> BTreeSet<LinearFacet> {
        match self.data.tri {
            Tri::D3(t) => self.fixed_point_set_g::<4>(t, a),
            Tri::D4(t) => self.fixed_point_set_g::<5>(t, a),
        }
    }

    fn fixed_point_set_g<const V: usize>(&self, t: &Triangulation<V>,
                                         a: usize) -> BTreeSet<LinearFacet>
    {
        let n = V - 1;
        let ix = &self.data.ix;
        let mut facets = BTreeSet::new();
        for d in 0..=n {
            for j in 0..ix.num_non_ideal[d] {
                let f = ix.nic[d][j];
                let (g, tpara) = self.image_of_cell(t, a, d, f);
                let image_ix = if d == n { g } else { ix.nic_lookup(d, g) };
                if image_ix != j {
                    continue
                }
                let partition = cycle_partition(&tpara);
                facets.insert(LinearFacet {
                    dim: partition.len() - 1,
                    ambient_dim: d,
                    ambient_index: f,
                    partition,
                });
            }
        }
        facets
    }

    /// The boundary of a linear facet: remove one centroid at a time,
    /// re-reading the remaining centroids inside the sub-face their
    /// blocks span.
    pub fn facet_boundary(&self, facet: &LinearFacet) -> BTreeSet<LinearFacet> {
        match self.data.tri {
            Tri::D3(t) => self.facet_boundary_g::<4>(t, facet),
            Tri::D4(t) => self.facet_boundary_g::<5>(t, facet),
        }
    }

    fn facet_boundary_g<const V: usize>(&self, t: &Triangulation<V>,
                                        facet: &LinearFacet)
        -> BTreeSet<LinearFacet>
    {
        let n = V - 1;
        let mut out = BTreeSet::new();
        if facet.dim == 0 {
            return out
        }

        let d = facet.ambient_dim;
        let amb_map = if d == n {
            Perm::<V>::id()
        } else {
            t.face(d, facet.ambient_index).front().vertices
        };
        let amb_sim = if d == n {
            facet.ambient_index
        } else {
            t.face(d, facet.ambient_index).front().simplex
        };

        for omit in 0..facet.partition.len() {
            let kept: Vec<&BTreeSet<usize>> = facet.partition.iter()
                .enumerate()
                .filter(|(b, _)| *b != omit)
                .map(|(_, blk)| blk)
                .collect();
            let span: BTreeSet<usize> =
                kept.iter().flat_map(|blk| blk.iter().copied()).collect();

            // ambient vertices of the spanned sub-face
            let amb_verts: Vec<usize> =
                span.iter().map(|&x| amb_map[x]).collect();
            let sub_d = amb_verts.len() - 1;
            let slot = perm::face_number(V, sub_d, &amb_verts);
            let sub_cls = t.face_index(amb_sim, sub_d, slot);
            let sub_map = t.face_mapping(amb_sim, sub_d, slot);

            let partition: Vec<BTreeSet<usize>> = {
                let mut blocks: Vec<BTreeSet<usize>> = kept.iter()
                    .map(|blk| blk.iter()
                        .map(|&x| sub_map.pre_image_of(amb_map[x]))
                        .collect())
                    .collect();
                blocks.sort();
                blocks
            };

            out.insert(LinearFacet {
                dim: facet.dim - 1,
                ambient_dim: sub_d,
                ambient_index: sub_cls,
                partition,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_tri::fixtures;
    use crate::Tri;

    type CD<'a> = CellularData<'a, i64>;

    #[test]
    fn s3_aut_group() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let aut = cd.simplicial_automorphism_group();
        assert_eq!(aut.order(), 12);
        assert!(aut.element(0).is_identity());

        // the identity row and column of the multiplication table
        let table = aut.multiplication_table();
        for i in 0..12 {
            assert_eq!(table[0][i], i);
            assert_eq!(table[i][0], i);
        }
        // closure: every row is a permutation of the group
        for row in &table {
            let mut seen = row.clone();
            seen.sort();
            assert_eq!(seen, (0..12).collect::<Vec<_>>());
        }
    }

    #[test]
    fn s3_orientation_action() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let aut = cd.simplicial_automorphism_group();
        let act = aut.orientation_action();
        assert_eq!(act[0], 1);
        assert!(act.iter().all(|&s| s == 1 || s == -1));
    }

    #[test]
    fn s3_homology_action_is_trivial_on_h1() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let aut = cd.simplicial_automorphism_group();
        // H_1 = 0: every action matrix reduces to the empty matrix
        let mats = aut.homology_h1_action();
        assert_eq!(mats.len(), 12);
        for m in &mats {
            assert_eq!(m.inner().nrows(), 0);
        }
    }

    #[test]
    fn h3_action_matches_orientation() {
        use tessella_matrix::MatType;
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let aut = cd.simplicial_automorphism_group();
        let loc = GroupLocator::new(3, Variance::Covariant, Coords::Std, 0);
        let homs = aut.homology_action(loc).unwrap();
        let ors = aut.orientation_action();
        for (h, or) in homs.iter().zip(ors) {
            let red = h.reduced_matrix();
            assert_eq!(red.shape(), (1, 1));
            assert_eq!(red[(0, 0)], or);
        }
    }

    #[test]
    fn group_presentation_abelianization() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let aut = cd.simplicial_automorphism_group();
        let pres = aut.group_presentation();
        // a group of order 12 abelianizes to something of order <= 12
        let ab: tessella_algebra::AbelianGroup<i64> = pres.abelianization();
        assert_eq!(ab.rank(), 0);
    }

    #[test]
    fn identity_fixes_everything() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let aut = cd.simplicial_automorphism_group();
        let id_set = aut.fixed_point_set(0);
        // the identity preserves every cell with the whole cell fixed
        let total: usize = (0..4).map(|d| cd.indexes().num_non_ideal[d]).sum();
        assert_eq!(id_set.len(), total);
        for f in &id_set {
            assert_eq!(f.dim, f.ambient_dim);
            assert_eq!(f.partition.len(), f.ambient_dim + 1);
        }
    }

    #[test]
    fn facet_boundary_shrinks_dimension() {
        let t = fixtures::s3_one_tet();
        let cd = CD::new(Tri::D3(&t));
        let aut = cd.simplicial_automorphism_group();
        let set = aut.fixed_point_set(0);
        let top = set.iter().rev().next().unwrap().clone();
        assert!(top.dim > 0);
        for b in aut.facet_boundary(&top) {
            assert_eq!(b.dim, top.dim - 1);
            assert!(b.ambient_dim <= top.ambient_dim);
        }
    }

    #[test]
    fn figure_eight_actions_on_h1() {
        use tessella_matrix::MatType;
        let t = fixtures::figure_eight();
        let cd = CD::new(Tri::D3(&t));
        let aut = cd.simplicial_automorphism_group();
        let mats = aut.homology_h1_action();
        assert_eq!(mats.len(), aut.order());
        // H_1 = Z: every reduced action matrix is (±1)
        for m in &mats {
            assert_eq!(m.shape(), (1, 1));
            assert_eq!(m[(0, 0)].abs(), 1);
        }
        // the identity acts as +1
        assert_eq!(mats[0][(0, 0)], 1);
    }

    #[test]
    fn cycle_partitions() {
        // a transposition of {0,1} inside a triangle
        let blocks = cycle_partition(&[1, 0, 2]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], BTreeSet::from([0, 1]));
        assert_eq!(blocks[1], BTreeSet::from([2]));
        // a 3-cycle
        let blocks = cycle_partition(&[1, 2, 0]);
        assert_eq!(blocks.len(), 1);
    }
}
