//! Cell enumeration and indexing for the five decompositions.
//!
//! For every dimension the indexer keeps strictly increasing vectors of
//! triangulation face identifiers:
//!
//! * `nic[d]` — non-ideal standard cells (faces of the triangulation);
//! * `ic[d]` — ideal cells, as composite identifiers
//!   `(d + 2) * subface + vertex slot` over the `(d+1)`-faces with ideal
//!   vertices;
//! * `dc[d]` — dual cells: interior `(n - d)`-faces, in index order;
//! * `bc[d]` — boundary cells;
//! * `r[d]` — relative cells (neither boundary nor ideal).
//!
//! The position of an identifier in its vector is the cell index; lookups
//! are binary searches.

use tessella_tri::{Triangulation3, Triangulation4};
use crate::{ChainComplexLocator, Coords};

/// A borrowed triangulation of dimension 3 or 4.
#[derive(Clone, Copy)]
pub enum Tri<'a> {
    D3(&'a Triangulation3),
    D4(&'a Triangulation4),
}

impl<'a> Tri<'a> {
    pub fn dim(&self) -> usize {
        match self {
            Tri::D3(_) => 3,
            Tri::D4(_) => 4,
        }
    }

    pub fn size(&self) -> usize {
        match self {
            Tri::D3(t) => t.size(),
            Tri::D4(t) => t.size(),
        }
    }

    pub fn face_count(&self, d: usize) -> usize {
        match self {
            Tri::D3(t) => t.face_count(d),
            Tri::D4(t) => t.face_count(d),
        }
    }

    pub fn is_boundary_face(&self, d: usize, i: usize) -> bool {
        match self {
            Tri::D3(t) => t.is_boundary_face(d, i),
            Tri::D4(t) => t.is_boundary_face(d, i),
        }
    }

    pub fn is_ideal_vertex(&self, v: usize) -> bool {
        match self {
            Tri::D3(t) => t.is_ideal_vertex(v),
            Tri::D4(t) => t.is_ideal_vertex(v),
        }
    }

    pub fn is_orientable(&self) -> bool {
        match self {
            Tri::D3(t) => t.is_orientable(),
            Tri::D4(t) => t.is_orientable(),
        }
    }

    /// Vertex class at intrinsic label `k` of a `d`-face (`d` = the
    /// manifold dimension addresses top-simplices).
    pub fn face_vertex(&self, d: usize, i: usize, k: usize) -> usize {
        match self {
            Tri::D3(t) => {
                if d == 3 { t.face_index(i, 0, k) } else { t.face_vertex(d, i, k) }
            }
            Tri::D4(t) => {
                if d == 4 { t.face_index(i, 0, k) } else { t.face_vertex(d, i, k) }
            }
        }
    }

    pub fn face_vertex_is_ideal(&self, d: usize, i: usize, k: usize) -> bool {
        let v = self.face_vertex(d, i, k);
        self.is_ideal_vertex(v)
    }
}

#[derive(Clone, Debug, Default)]
pub struct CellIndexes {
    pub nic: [Vec<usize>; 5],
    pub ic: [Vec<usize>; 4],
    pub dc: [Vec<usize>; 5],
    pub bc: [Vec<usize>; 4],
    pub r: [Vec<usize>; 5],

    pub num_standard: [usize; 5],
    pub num_dual: [usize; 5],
    pub num_mix: [usize; 5],
    pub num_std_bdry: [usize; 4],
    pub num_rel: [usize; 5],
    pub num_non_ideal: [usize; 5],
    pub num_ideal: [usize; 4],
    pub num_non_ideal_bdry: [usize; 4],
}

fn lookup(v: &[usize], id: usize) -> usize {
    v.binary_search(&id).expect("cell identifier missing from index vector")
}

impl CellIndexes {
    pub fn new(tri: &Tri) -> Self {
        let mut ix = CellIndexes::default();
        let n = tri.dim();

        // vertices
        for v in 0..tri.face_count(0) {
            if tri.is_ideal_vertex(v) { continue }
            ix.nic[0].push(v);
            if tri.is_boundary_face(0, v) {
                ix.bc[0].push(v);
            } else {
                ix.dc[n].push(v);
                ix.r[0].push(v);
            }
        }

        // faces of dimension 1 .. n-1
        for d in 1..n {
            for f in 0..tri.face_count(d) {
                ix.nic[d].push(f);
                if tri.is_boundary_face(d, f) {
                    ix.bc[d].push(f);
                } else {
                    ix.dc[n - d].push(f);
                    ix.r[d].push(f);
                    for k in 0..=d {
                        if tri.face_vertex_is_ideal(d, f, k) {
                            ix.ic[d - 1].push((d + 1) * f + k);
                        }
                    }
                }
            }
        }

        // top-simplices
        for s in 0..tri.size() {
            ix.nic[n].push(s);
            ix.dc[0].push(s);
            ix.r[n].push(s);
            for k in 0..=n {
                if tri.face_vertex_is_ideal(n, s, k) {
                    ix.ic[n - 1].push((n + 1) * s + k);
                }
            }
        }

        for d in 0..5 {
            ix.num_non_ideal[d] = ix.nic[d].len();
            ix.num_dual[d] = ix.dc[d].len();
            ix.num_rel[d] = ix.r[d].len();
        }
        for d in 0..4 {
            ix.num_ideal[d] = ix.ic[d].len();
            ix.num_non_ideal_bdry[d] = ix.bc[d].len();
            ix.num_std_bdry[d] = ix.bc[d].len() + ix.ic[d].len();
        }
        for d in 0..n {
            ix.num_standard[d] = ix.nic[d].len() + ix.ic[d].len();
        }
        ix.num_standard[n] = ix.nic[n].len();

        // every standard cell contributes barycentric pieces to the mixed
        // decomposition; ideal cells one piece each
        let nc = &ix.num_non_ideal;
        let icc = &ix.num_ideal;
        if n == 3 {
            ix.num_mix[0] = nc[0] + nc[1] + nc[2] + nc[3] + icc[0];
            ix.num_mix[1] = 2 * nc[1] + 3 * nc[2] + 4 * nc[3] + icc[1];
            ix.num_mix[2] = 3 * nc[2] + 6 * nc[3] + icc[2];
            ix.num_mix[3] = 4 * nc[3];
            ix.num_mix[4] = 0;
        } else {
            ix.num_mix[0] = nc[0] + nc[1] + nc[2] + nc[3] + nc[4] + icc[0];
            ix.num_mix[1] = 2 * nc[1] + 3 * nc[2] + 4 * nc[3] + 5 * nc[4] + icc[1];
            ix.num_mix[2] = 3 * nc[2] + 6 * nc[3] + 10 * nc[4] + icc[2];
            ix.num_mix[3] = 4 * nc[3] + 10 * nc[4] + icc[3];
            ix.num_mix[4] = 5 * nc[4];
        }

        ix
    }

    /// Index of a non-ideal standard cell.
    pub fn nic_lookup(&self, d: usize, face: usize) -> usize {
        lookup(&self.nic[d], face)
    }

    /// Index of an ideal cell, from its carrying `(d+1)`-face and vertex
    /// slot.
    pub fn ic_lookup(&self, d: usize, subface: usize, slot: usize) -> usize {
        lookup(&self.ic[d], (d + 2) * subface + slot)
    }

    pub fn dc_lookup(&self, d: usize, face: usize) -> usize {
        lookup(&self.dc[d], face)
    }

    pub fn bc_lookup(&self, d: usize, face: usize) -> usize {
        lookup(&self.bc[d], face)
    }

    pub fn r_lookup(&self, d: usize, face: usize) -> usize {
        lookup(&self.r[d], face)
    }

    pub fn r_contains(&self, d: usize, face: usize) -> bool {
        self.r[d].binary_search(&face).is_ok()
    }

    /// Ideal cell count in a dimension; zero at the top dimension, where
    /// ideal cells cannot occur.
    pub fn ideal_count(&self, d: usize) -> usize {
        if d < 4 { self.num_ideal[d] } else { 0 }
    }

    /// Decomposes an ideal cell index back into (carrying face, slot).
    pub fn ic_index(&self, d: usize, i: usize) -> (usize, usize) {
        let id = self.ic[d][i];
        (id / (d + 2), id % (d + 2))
    }

    pub fn nic_index(&self, d: usize, i: usize) -> usize {
        self.nic[d][i]
    }

    /// Total cell count for a (dimension, decomposition) pair; zero when
    /// out of range or unimplemented.
    pub fn cell_count(&self, dim: usize, loc: ChainComplexLocator) -> usize {
        let d = loc.dim;
        if d > 4 { return 0 }
        match loc.coords {
            Coords::Std => if d <= dim { self.num_standard[d] } else { 0 },
            Coords::Dual => if d <= dim { self.num_dual[d] } else { 0 },
            Coords::Mix => if d <= dim { self.num_mix[d] } else { 0 },
            Coords::StdRelBdry => if d <= dim { self.num_rel[d] } else { 0 },
            Coords::StdBdry =>
                if d < 4 && d < dim { self.num_std_bdry[d] } else { 0 },
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessella_tri::fixtures;

    #[test]
    fn one_tet_sphere() {
        let t = fixtures::s3_one_tet();
        let tri = Tri::D3(&t);
        let ix = CellIndexes::new(&tri);

        assert_eq!(ix.num_standard[..4], [2, 3, 2, 1]);
        assert_eq!(ix.num_dual[..4], [1, 2, 3, 2]);
        assert_eq!(ix.num_ideal, [0, 0, 0, 0]);
        assert_eq!(ix.num_std_bdry, [0, 0, 0, 0]);
        assert_eq!(ix.num_rel[..4], [2, 3, 2, 1]);
        // closed manifold: mixed cells are the barycentric subdivision
        assert_eq!(ix.num_mix[..4], [2 + 3 + 2 + 1, 2 * 3 + 3 * 2 + 4, 3 * 2 + 6, 4]);
    }

    #[test]
    fn figure_eight_ideal_blocks() {
        let t = fixtures::figure_eight();
        let tri = Tri::D3(&t);
        let ix = CellIndexes::new(&tri);

        // one ideal vertex, sitting at both ends of both edges and all
        // three corners of all four triangles
        assert_eq!(ix.num_non_ideal, [0, 2, 4, 2, 0]);
        assert_eq!(ix.num_ideal, [4, 12, 8, 0]);
        assert_eq!(ix.num_standard[..4], [4, 2 + 12, 4 + 8, 2]);
        // every edge end gives exactly one ideal 0-cell
        assert_eq!(ix.ic[0], vec![0, 1, 2, 3]);
        // no boundary: the boundary complex is purely ideal
        assert_eq!(ix.num_non_ideal_bdry, [0, 0, 0, 0]);
        assert_eq!(ix.num_std_bdry, [4, 12, 8, 0]);
        // dual cells exclude nothing in a closed ideal triangulation
        // except the (ideal) vertices
        assert_eq!(ix.num_dual[..4], [2, 4, 2, 0]);
    }

    #[test]
    fn lookups_roundtrip() {
        let t = fixtures::figure_eight();
        let tri = Tri::D3(&t);
        let ix = CellIndexes::new(&tri);

        for d in 1..3 {
            for (j, &f) in ix.nic[d].iter().enumerate() {
                assert_eq!(ix.nic_lookup(d, f), j);
            }
        }
        for d in 0..3 {
            for j in 0..ix.ic[d].len() {
                let (f, s) = ix.ic_index(d, j);
                assert_eq!(ix.ic_lookup(d, f, s), j);
            }
        }
    }

    #[test]
    fn cp2_counts() {
        let t = fixtures::cp2();
        let tri = Tri::D4(&t);
        let ix = CellIndexes::new(&tri);
        assert_eq!(ix.num_standard, [4, 5, 10, 10, 4]);
        assert_eq!(ix.num_dual, [4, 10, 10, 5, 4]);
        assert_eq!(ix.num_ideal, [0; 4]);
        // Euler characteristic from the dual counts
        let chi: i64 = (0..5).map(|d| {
            let c = ix.num_dual[d] as i64;
            if d % 2 == 0 { c } else { -c }
        }).sum();
        assert_eq!(chi, 3);
    }
}
