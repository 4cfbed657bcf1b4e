//! Construction of the boundary maps for the five cell decompositions.
//!
//! Each boundary map is assembled as a sparse cover grid keyed by
//! `(cell, facet slot)` with values `(incident cell one dimension down,
//! sign)`; the dense matrix is obtained later by summing signs at equal
//! (target, source) pairs.
//!
//! The sign arithmetic follows one rule throughout: an incidence sign is
//! the sign of the permutation embedding the facet into the cell, times a
//! `-1` fix-up wherever a co-dimension-one piece appears with the opposite
//! of its natural orientation. Ideal cells inherit the boundary of their
//! carrying face, restricted to the ideal vertex slot and negated.

use tessella::Sign;
use tessella::perm::{self, Perm};
use tessella_matrix::{CoverFacet, SparseGrid};
use tessella_tri::Triangulation;
use crate::{CellIndexes, Tri};

pub(crate) type CoverGrid = SparseGrid<CoverFacet>;

fn sgn(s: Sign) -> i64 {
    s.to_i64()
}

/// Class and class-level mapping of the `k`-th facet of a `d`-face
/// (`d` = top dimension addresses a top-simplex directly).
fn face_facet<const V: usize>(t: &Triangulation<V>, d: usize, i: usize,
                              k: usize) -> (usize, Perm<V>) {
    if d == V - 1 {
        (t.face_index(i, d - 1, k), t.face_mapping(i, d - 1, k))
    } else {
        t.subface(d, i, d - 1, k)
    }
}

/// Standard decomposition: one boundary map per dimension `1..=n`.
pub(crate) fn fill_standard(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    match tri {
        Tri::D3(t) => fill_standard_g::<4>(t, ix),
        Tri::D4(t) => fill_standard_g::<5>(t, ix),
    }
}

fn fill_standard_g<const V: usize>(t: &Triangulation<V>, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let n = V - 1;
    let mut out = vec![];

    for dd in 1..=n {
        let mut cc = CoverGrid::new(2);

        // non-ideal cells: the simplicial boundary, with ideal ends
        for j in 0..ix.num_non_ideal[dd] {
            let f = ix.nic[dd][j];
            for i in 0..=dd {
                if dd == 1 {
                    // endpoints: ideal or not
                    let v = t.face_vertex(1, f, i);
                    if t.is_ideal_vertex(v) {
                        let idl = ix.ic_lookup(0, f, i);
                        cc.set(&[j, i], CoverFacet::new(
                            ix.num_non_ideal[0] + idl, 1));
                    } else {
                        cc.set(&[j, i], CoverFacet::new(
                            ix.nic_lookup(0, v),
                            if i == 0 { -1 } else { 1 }));
                    }
                    continue
                }

                let vtx = if dd == n {
                    t.face_index(f, 0, i)
                } else {
                    t.face_vertex(dd, f, i)
                };
                if t.is_ideal_vertex(vtx) {
                    let idl = ix.ic_lookup(dd - 1, f, i);
                    cc.set(&[j, i + dd + 1], CoverFacet::new(
                        ix.num_non_ideal[dd - 1] + idl, 1));
                }

                let (g, p) = face_facet(t, dd, f, i);
                cc.set(&[j, i], CoverFacet::new(
                    ix.nic_lookup(dd - 1, g), sgn(p.sign())));
            }
        }

        // ideal cells: boundary of the carrying face, restricted to the
        // ideal vertex slot
        for j in 0..ix.ideal_count(dd) {
            let (f, v) = ix.ic_index(dd, j);
            for i in 1..dd + 2 {
                let slot = (v + i) % (dd + 2);
                let (g, p) = face_facet(t, dd + 1, f, slot);
                let idl = ix.ic_lookup(dd - 1, g, p.pre_image_of(v));
                cc.set(&[ix.num_non_ideal[dd] + j, i], CoverFacet::new(
                    ix.num_non_ideal[dd - 1] + idl, -sgn(p.sign())));
            }
        }

        out.push(cc);
    }
    out
}

/// Boundary decomposition: standard cells restricted to the boundary plus
/// all ideal cells; one map per dimension `1..n`.
pub(crate) fn fill_boundary(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    match tri {
        Tri::D3(t) => fill_boundary_g::<4>(t, ix),
        Tri::D4(t) => fill_boundary_g::<5>(t, ix),
    }
}

fn fill_boundary_g<const V: usize>(t: &Triangulation<V>, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let n = V - 1;
    let mut out = vec![];

    for dd in 1..n {
        let mut cc = CoverGrid::new(2);

        for j in 0..ix.num_non_ideal_bdry[dd] {
            let f = ix.bc[dd][j];
            for i in 0..=dd {
                if dd == 1 {
                    let v = t.face_vertex(1, f, i);
                    if t.is_ideal_vertex(v) {
                        let idl = ix.ic_lookup(0, f, i);
                        cc.set(&[j, i], CoverFacet::new(
                            ix.num_non_ideal_bdry[0] + idl, 1));
                    } else {
                        cc.set(&[j, i], CoverFacet::new(
                            ix.bc_lookup(0, v),
                            if i == 0 { -1 } else { 1 }));
                    }
                    continue
                }

                if t.is_ideal_vertex(t.face_vertex(dd, f, i)) {
                    let idl = ix.ic_lookup(dd - 1, f, i);
                    cc.set(&[j, i + dd + 1], CoverFacet::new(
                        ix.num_non_ideal_bdry[dd - 1] + idl, 1));
                }

                let (g, p) = face_facet(t, dd, f, i);
                cc.set(&[j, i], CoverFacet::new(
                    ix.bc_lookup(dd - 1, g), sgn(p.sign())));
            }
        }

        for j in 0..ix.ideal_count(dd) {
            let (f, v) = ix.ic_index(dd, j);
            for i in 1..dd + 2 {
                let slot = (v + i) % (dd + 2);
                let (g, p) = face_facet(t, dd + 1, f, slot);
                let idl = ix.ic_lookup(dd - 1, g, p.pre_image_of(v));
                cc.set(&[ix.num_non_ideal_bdry[dd] + j, i], CoverFacet::new(
                    ix.num_non_ideal_bdry[dd - 1] + idl, -sgn(p.sign())));
            }
        }

        out.push(cc);
    }
    out
}

/// Relative decomposition: standard cells away from the boundary; one map
/// per dimension `1..=n`.
pub(crate) fn fill_relative(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    match tri {
        Tri::D3(t) => fill_relative_g::<4>(t, ix),
        Tri::D4(t) => fill_relative_g::<5>(t, ix),
    }
}

fn fill_relative_g<const V: usize>(t: &Triangulation<V>, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let n = V - 1;
    let mut out = vec![];

    for dd in 1..=n {
        let mut cc = CoverGrid::new(2);

        for j in 0..ix.num_rel[dd] {
            let f = ix.r[dd][j];
            for i in 0..=dd {
                if dd == 1 {
                    let v = t.face_vertex(1, f, i);
                    if t.is_ideal_vertex(v) || t.is_boundary_face(0, v) {
                        continue
                    }
                    cc.set(&[j, i], CoverFacet::new(
                        ix.r_lookup(0, v),
                        if i == 0 { -1 } else { 1 }));
                    continue
                }

                let (g, p) = face_facet(t, dd, f, i);
                if t.is_boundary_face(dd - 1, g) {
                    continue
                }
                cc.set(&[j, i], CoverFacet::new(
                    ix.r_lookup(dd - 1, g), sgn(p.sign())));
            }
        }

        out.push(cc);
    }
    out
}

/// Dual decomposition: dual `d`-cells are the interior `(n-d)`-faces;
/// one map per dimension `1..=n`.
///
/// For dual cells of dimension two and up the incidence sign is the
/// parity of `e⁻¹ ∘ f ∘ (swap)` restricted to the co-dimension labels,
/// where `e` and `f` are the mapping permutations of the two faces in a
/// shared top-simplex.
pub(crate) fn fill_dual(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    match tri {
        Tri::D3(t) => fill_dual_3(t, ix),
        Tri::D4(t) => fill_dual_4(t, ix),
    }
}

fn fill_dual_3(t: &tessella_tri::Triangulation3, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let mut out = vec![];

    // dual 1-cells: interior triangles, running between the barycentres
    // of their two sides
    let mut cc = CoverGrid::new(2);
    for j in 0..ix.num_dual[1] {
        let fac = t.face(2, ix.dc[1][j]);
        for i in 0..2 {
            let pen = fac.embeddings[i].simplex;
            cc.set(&[j, i], CoverFacet::new(
                ix.dc_lookup(0, pen),
                if i == 0 { -1 } else { 1 }));
        }
    }
    out.push(cc);

    // dual 2-cells: interior edges; the boundary walks the edge link
    let mut cc = CoverGrid::new(2);
    for j in 0..ix.num_dual[2] {
        let edg = t.face(1, ix.dc[2][j]);
        for (i, emb) in edg.embeddings.iter().enumerate() {
            let tet = emb.simplex;
            let edginc = emb.vertices;
            let fac_slot = edginc[3];
            let fac_cls = t.face_index(tet, 2, fac_slot);
            let fac = t.face(2, fac_cls);
            let e1 = &fac.embeddings[1];
            let sig = if e1.simplex == tet && e1.slot == fac_slot { 1 } else { -1 };
            cc.set(&[j, i], CoverFacet::new(ix.dc_lookup(1, fac_cls), sig));
        }
    }
    out.push(cc);

    // dual 3-cells: interior vertices; pieces indexed by (edge, end)
    let mut cc = CoverGrid::new(2);
    for i in 0..ix.num_dual[2] {
        let edg = t.face(1, ix.dc[2][i]);
        for j in 0..2 {
            let v = t.face_vertex(1, ix.dc[2][i], j);
            if t.is_boundary_face(0, v) || t.is_ideal_vertex(v) {
                continue
            }
            let emb = edg.front();
            let tet = emb.simplex;
            let edginc = emb.vertices;
            let vrtinc = t.face_mapping(tet, 0, edginc[j]);
            let delta = vrtinc.inverse() * edginc * Perm::transposition(1, j);
            cc.set(&[ix.dc_lookup(3, v), 2 * i + j],
                CoverFacet::new(i, sgn(delta.sign())));
        }
    }
    out.push(cc);

    out
}

fn fill_dual_4(t: &tessella_tri::Triangulation4, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let mut out = vec![];

    // dual 1-cells: interior tetrahedra
    let mut cc = CoverGrid::new(2);
    for j in 0..ix.num_dual[1] {
        let tet = t.face(3, ix.dc[1][j]);
        for i in 0..2 {
            let pen = tet.embeddings[i].simplex;
            cc.set(&[j, i], CoverFacet::new(
                ix.dc_lookup(0, pen),
                if i == 0 { -1 } else { 1 }));
        }
    }
    out.push(cc);

    // dual 2-cells: interior triangles, walking the triangle link
    let mut cc = CoverGrid::new(2);
    for j in 0..ix.num_dual[2] {
        let fac = t.face(2, ix.dc[2][j]);
        for (i, emb) in fac.embeddings.iter().enumerate() {
            let pen = emb.simplex;
            let facinc = emb.vertices;
            let tet_slot = facinc[4];
            let tet_cls = t.face_index(pen, 3, tet_slot);
            let e1 = &t.face(3, tet_cls).embeddings[1];
            let sig = if e1.simplex == pen && e1.slot == tet_slot { 1 } else { -1 };
            cc.set(&[j, i], CoverFacet::new(ix.dc_lookup(1, tet_cls), sig));
        }
    }
    out.push(cc);

    // dual 3-cells: interior edges; pieces indexed by (triangle, edge)
    let mut cc = CoverGrid::new(2);
    for i in 0..ix.num_dual[2] {
        let fac_id = ix.dc[2][i];
        for jj in 0..3 {
            let (edg, _) = t.subface(2, fac_id, 1, jj);
            if t.is_boundary_face(1, edg) {
                continue
            }
            let emb = t.face(2, fac_id).front();
            let pen = emb.simplex;
            let facinc = emb.vertices;
            let a = facinc[if jj == 0 { 1 } else { 0 }];
            let b = facinc[if jj <= 1 { 2 } else { 1 }];
            let edginc = t.face_mapping(pen, 1, perm::edge_number_5(a, b));
            let mut delta = edginc.inverse() * facinc
                * Perm::transposition(2, jj);
            delta = delta * Perm::transposition(0, delta[0]);
            cc.set(&[ix.dc_lookup(3, edg), 3 * i + jj],
                CoverFacet::new(i, sgn(delta.sign())));
        }
    }
    out.push(cc);

    // dual 4-cells: interior vertices; pieces indexed by (edge, end)
    let mut cc = CoverGrid::new(2);
    for i in 0..ix.num_dual[3] {
        let edg_id = ix.dc[3][i];
        let edg = t.face(1, edg_id);
        for j in 0..2 {
            let v = t.face_vertex(1, edg_id, j);
            if t.is_boundary_face(0, v) || t.is_ideal_vertex(v) {
                continue
            }
            let emb = edg.front();
            let pen = emb.simplex;
            let edginc = emb.vertices;
            let vrtinc = t.face_mapping(pen, 0, edginc[j]);
            let delta = vrtinc.inverse() * edginc * Perm::transposition(1, j);
            cc.set(&[ix.dc_lookup(4, v), 4 * i + j],
                CoverFacet::new(i, sgn(delta.sign())));
        }
    }
    out.push(cc);

    out
}

/// Mixed decomposition: the barycentric subdivision. Cells are indexed in
/// blocks, one block per standard cell dimension, followed by the ideal
/// cells; the orientation of a piece comes from the standard cell it
/// subdivides (or the dual cell, for pieces of dual type).
pub(crate) fn fill_mixed(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    match tri {
        Tri::D3(t) => fill_mixed_3(t, ix),
        Tri::D4(t) => fill_mixed_4(t, ix),
    }
}

fn fill_mixed_3(t: &tessella_tri::Triangulation3, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let nc = &ix.num_non_ideal;
    let mut out = vec![];

    // mixed 1-cells
    let ri1 = nc[0];
    let ri2 = ri1 + nc[1];
    let ri3 = ri2 + nc[2];
    let ri4 = ri3 + nc[3];
    let ci1 = 2 * nc[1];
    let ci2 = ci1 + 3 * nc[2];
    let ci3 = ci2 + 4 * nc[3];

    let mut cc = CoverGrid::new(2);
    for j in 0..2 * nc[1] {
        let edg = ix.nic[1][j / 2];
        let v = t.face_vertex(1, edg, j % 2);
        if t.is_ideal_vertex(v) {
            let idl = ix.ic_lookup(0, edg, j % 2);
            cc.set(&[j, 0], CoverFacet::new(ri4 + idl, 1));
        } else {
            cc.set(&[j, 0], CoverFacet::new(
                ix.nic_lookup(0, v),
                if j % 2 == 0 { -1 } else { 1 }));
        }
        cc.set(&[j, 1], CoverFacet::new(
            ri1 + j / 2,
            if j % 2 == 0 { 1 } else { -1 }));
    }
    for j in 0..3 * nc[2] {
        let fac = ix.nic[2][j / 3];
        let (edg, _) = t.subface(2, fac, 1, j % 3);
        cc.set(&[ci1 + j, 0],
            CoverFacet::new(ri1 + ix.nic_lookup(1, edg), 1));
        cc.set(&[ci1 + j, 1], CoverFacet::new(ri2 + j / 3, -1));
    }
    for j in 0..4 * nc[3] {
        let tet = ix.nic[3][j / 4];
        let fac_slot = j % 4;
        let fac_cls = t.face_index(tet, 2, fac_slot);
        let e0 = t.face(2, fac_cls).front();
        let sig = if e0.simplex == tet && e0.slot == fac_slot { 1 } else { -1 };
        cc.set(&[ci2 + j, 0],
            CoverFacet::new(ri2 + ix.nic_lookup(2, fac_cls), sig));
        cc.set(&[ci2 + j, 1], CoverFacet::new(ri3 + j / 4, -sig));
    }
    for j in 0..ix.ideal_count(1) {
        let (f, v) = ix.ic_index(1, j);
        for i in 1..3 {
            let slot = (v + i) % 3;
            let (edg, p) = t.subface(2, f, 1, slot);
            let idl = ix.ic_lookup(0, edg, p.pre_image_of(v));
            cc.set(&[ci3 + j, i],
                CoverFacet::new(ri4 + idl, -sgn(p.sign())));
        }
    }
    out.push(cc);

    // mixed 2-cells
    let ri1 = ci1;
    let ri2 = ci2;
    let ri3 = ci3;
    let ci1 = 3 * nc[2];
    let ci2 = ci1 + 6 * nc[3];

    let mut cc = CoverGrid::new(2);
    for j in 0..3 * nc[2] {
        let fac = ix.nic[2][j / 3];
        for i in 1..3 {
            let slot = (j + i) % 3;
            let (edg, edginc) = t.subface(2, fac, 1, slot);
            let e_ix = ix.nic_lookup(1, edg);
            let half = if edginc.sign() == Sign::Pos { 2 - i } else { i - 1 };
            cc.set(&[j, i % 3], CoverFacet::new(
                2 * e_ix + half, sgn(edginc.sign())));
            cc.set(&[j, 3 + i % 3], CoverFacet::new(
                ri1 + 3 * (j / 3) + slot,
                if i == 1 { 1 } else { -1 }));
        }
        if t.is_ideal_vertex(t.face_vertex(2, fac, j % 3)) {
            let idl = ix.ic_lookup(1, fac, j % 3);
            cc.set(&[j, 0], CoverFacet::new(ri3 + idl, 1));
        }
    }
    for j in 0..6 * nc[3] {
        let tet = ix.nic[3][j / 6];
        let edginc = t.face_mapping(tet, 1, j % 6);
        for i in 0..2 {
            let fac_slot = edginc[i + 2];
            let facinc = t.face_mapping(tet, 2, fac_slot);
            let fac_cls = t.face_index(tet, 2, fac_slot);
            let e0 = t.face(2, fac_cls).front();
            let sig = if e0.simplex == tet && e0.slot == fac_slot { 1 } else { -1 };
            cc.set(&[ci1 + j, i % 2], CoverFacet::new(
                ri1 + 3 * ix.nic_lookup(2, fac_cls)
                    + facinc.pre_image_of(edginc[3 - i]),
                if i == 0 { 1 } else { -1 }));
            cc.set(&[ci1 + j, 2 + i % 2], CoverFacet::new(
                ri2 + 4 * (j / 6) + fac_slot,
                sig * if i == 0 { 1 } else { -1 }));
        }
    }
    for j in 0..ix.ideal_count(2) {
        let (f, v) = ix.ic_index(2, j);
        for i in 1..4 {
            let slot = (v + i) % 4;
            let facinc = t.face_mapping(f, 2, slot);
            let fac_cls = t.face_index(f, 2, slot);
            let idl = ix.ic_lookup(1, fac_cls, facinc.pre_image_of(v));
            cc.set(&[ci2 + j, i],
                CoverFacet::new(ri3 + idl, -sgn(facinc.sign())));
        }
    }
    out.push(cc);

    // mixed 3-cells
    let ri1 = ci1;
    let ri2 = ci2;

    let mut cc = CoverGrid::new(2);
    for j in 0..4 * nc[3] {
        let tet = ix.nic[3][j / 4];
        for i in 1..4 {
            let fac_slot = (j + i) % 4;
            let facinc = t.face_mapping(tet, 2, fac_slot);
            let fac_cls = t.face_index(tet, 2, fac_slot);
            cc.set(&[j, i % 4], CoverFacet::new(
                3 * ix.nic_lookup(2, fac_cls) + facinc.pre_image_of(j % 4),
                sgn(facinc.sign())));
            let e_num = perm::edge_number_4(j % 4, (j + i) % 4);
            let edginc = t.face_mapping(tet, 1, e_num);
            cc.set(&[j, 4 + i % 4], CoverFacet::new(
                ri1 + 6 * (j / 4) + e_num,
                (if edginc[1] == j % 4 { 1 } else { -1 }) * sgn(edginc.sign())));
        }
        if t.is_ideal_vertex(t.face_index(tet, 0, j % 4)) {
            let idl = ix.ic_lookup(2, tet, j % 4);
            cc.set(&[j, 0], CoverFacet::new(ri2 + idl, 1));
        }
    }
    out.push(cc);

    out
}

fn fill_mixed_4(t: &tessella_tri::Triangulation4, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let nc = &ix.num_non_ideal;
    let mut out = vec![];

    // mixed 1-cells
    let ri1 = nc[0];
    let ri2 = ri1 + nc[1];
    let ri3 = ri2 + nc[2];
    let ri4 = ri3 + nc[3];
    let ri5 = ri4 + nc[4];
    let ci1 = 2 * nc[1];
    let ci2 = ci1 + 3 * nc[2];
    let ci3 = ci2 + 4 * nc[3];
    let ci4 = ci3 + 5 * nc[4];

    let mut cc = CoverGrid::new(2);
    for j in 0..2 * nc[1] {
        let edg = ix.nic[1][j / 2];
        let v = t.face_vertex(1, edg, j % 2);
        if t.is_ideal_vertex(v) {
            let idl = ix.ic_lookup(0, edg, j % 2);
            cc.set(&[j, 0], CoverFacet::new(ri5 + idl, 1));
        } else {
            cc.set(&[j, 0], CoverFacet::new(
                ix.nic_lookup(0, v),
                if j % 2 == 0 { -1 } else { 1 }));
        }
        cc.set(&[j, 1], CoverFacet::new(
            ri1 + j / 2,
            if j % 2 == 0 { 1 } else { -1 }));
    }
    for j in 0..3 * nc[2] {
        let fac = ix.nic[2][j / 3];
        let (edg, _) = t.subface(2, fac, 1, j % 3);
        cc.set(&[ci1 + j, 0],
            CoverFacet::new(ri1 + ix.nic_lookup(1, edg), 1));
        cc.set(&[ci1 + j, 1], CoverFacet::new(ri2 + j / 3, -1));
    }
    for j in 0..4 * nc[3] {
        let tet = ix.nic[3][j / 4];
        let (fac, _) = t.subface(3, tet, 2, j % 4);
        cc.set(&[ci2 + j, 0],
            CoverFacet::new(ri2 + ix.nic_lookup(2, fac), 1));
        cc.set(&[ci2 + j, 1], CoverFacet::new(ri3 + j / 4, -1));
    }
    for j in 0..5 * nc[4] {
        let pen = ix.nic[4][j / 5];
        let tet_slot = j % 5;
        let tet_cls = t.face_index(pen, 3, tet_slot);
        let e0 = t.face(3, tet_cls).front();
        let sig = if e0.simplex == pen && e0.slot == tet_slot { 1 } else { -1 };
        cc.set(&[ci3 + j, 0],
            CoverFacet::new(ri3 + ix.nic_lookup(3, tet_cls), sig));
        cc.set(&[ci3 + j, 1], CoverFacet::new(ri4 + j / 5, -sig));
    }
    for j in 0..ix.ideal_count(1) {
        let (f, v) = ix.ic_index(1, j);
        for i in 1..3 {
            let slot = (v + i) % 3;
            let (edg, p) = t.subface(2, f, 1, slot);
            let idl = ix.ic_lookup(0, edg, p.pre_image_of(v));
            cc.set(&[ci4 + j, i],
                CoverFacet::new(ri5 + idl, -sgn(p.sign())));
        }
    }
    out.push(cc);

    // mixed 2-cells
    let ri1 = ci1;
    let ri2 = ci2;
    let ri3 = ci3;
    let ri4 = ci4;
    let ci1 = 3 * nc[2];
    let ci2 = ci1 + 6 * nc[3];
    let ci3 = ci2 + 10 * nc[4];

    let mut cc = CoverGrid::new(2);
    for j in 0..3 * nc[2] {
        let fac = ix.nic[2][j / 3];
        for i in 1..3 {
            let slot = (j + i) % 3;
            let (edg, edginc) = t.subface(2, fac, 1, slot);
            let e_ix = ix.nic_lookup(1, edg);
            let half = if edginc.sign() == Sign::Pos { 2 - i } else { i - 1 };
            cc.set(&[j, i % 3], CoverFacet::new(
                2 * e_ix + half, sgn(edginc.sign())));
            cc.set(&[j, 3 + i % 3], CoverFacet::new(
                ri1 + 3 * (j / 3) + slot,
                if i == 1 { 1 } else { -1 }));
        }
        if t.is_ideal_vertex(t.face_vertex(2, fac, j % 3)) {
            let idl = ix.ic_lookup(1, fac, j % 3);
            cc.set(&[j, 0], CoverFacet::new(ri4 + idl, 1));
        }
    }
    for j in 0..6 * nc[3] {
        let tet = ix.nic[3][j / 6];
        let edginc = t.subface(3, tet, 1, j % 6).1;
        for i in 0..2 {
            let fac_local = edginc[i + 2];
            let (fac_cls, facinc) = t.subface(3, tet, 2, fac_local);
            cc.set(&[ci1 + j, i % 2], CoverFacet::new(
                ri1 + 3 * ix.nic_lookup(2, fac_cls)
                    + facinc.pre_image_of(edginc[3 - i]),
                if i == 0 { 1 } else { -1 }));
            cc.set(&[ci1 + j, 2 + i % 2], CoverFacet::new(
                ri2 + 4 * (j / 6) + fac_local,
                if i == 0 { 1 } else { -1 }));
        }
    }
    for j in 0..10 * nc[4] {
        let pen = ix.nic[4][j / 10];
        let facinc = t.face_mapping(pen, 2, j % 10);
        for i in 0..2 {
            let tet_slot = facinc[i + 3];
            let tetinc = t.face_mapping(pen, 3, tet_slot);
            let tet_cls = t.face_index(pen, 3, tet_slot);
            cc.set(&[ci2 + j, i % 2], CoverFacet::new(
                ri2 + 4 * ix.nic_lookup(3, tet_cls)
                    + tetinc.pre_image_of(facinc[4 - i]),
                if i == 0 { 1 } else { -1 }));
            let e0 = t.face(3, tet_cls).front();
            let sig = if e0.simplex == pen && e0.slot == tet_slot { 1 } else { -1 };
            cc.set(&[ci2 + j, 2 + i % 2], CoverFacet::new(
                ri3 + 5 * (j / 10) + tet_slot,
                sig * if i == 0 { 1 } else { -1 }));
        }
    }
    for j in 0..ix.ideal_count(2) {
        let (f, v) = ix.ic_index(2, j);
        for i in 1..4 {
            let slot = (v + i) % 4;
            let (fac_cls, facinc) = t.subface(3, f, 2, slot);
            let idl = ix.ic_lookup(1, fac_cls, facinc.pre_image_of(v));
            cc.set(&[ci3 + j, i],
                CoverFacet::new(ri4 + idl, -sgn(facinc.sign())));
        }
    }
    out.push(cc);

    // mixed 3-cells
    let ri1 = ci1;
    let ri2 = ci2;
    let ri3 = ci3;
    let ci1 = 4 * nc[3];
    let ci2 = ci1 + 10 * nc[4];

    let mut cc = CoverGrid::new(2);
    for j in 0..4 * nc[3] {
        let tet = ix.nic[3][j / 4];
        for i in 1..4 {
            let fac_local = (j + i) % 4;
            let (fac_cls, facinc) = t.subface(3, tet, 2, fac_local);
            cc.set(&[j, i % 4], CoverFacet::new(
                3 * ix.nic_lookup(2, fac_cls) + facinc.pre_image_of(j % 4),
                sgn(facinc.sign())));
            let e_num = perm::edge_number_4(j % 4, (j + i) % 4);
            let edginc = t.subface(3, tet, 1, e_num).1;
            cc.set(&[j, 4 + i % 4], CoverFacet::new(
                ri1 + 6 * (j / 4) + e_num,
                (if edginc[1] == j % 4 { 1 } else { -1 }) * sgn(edginc.sign())));
        }
        if t.is_ideal_vertex(t.face_vertex(3, tet, j % 4)) {
            let idl = ix.ic_lookup(2, tet, j % 4);
            cc.set(&[j, 0], CoverFacet::new(ri3 + idl, 1));
        }
    }
    for j in 0..10 * nc[4] {
        let pen = ix.nic[4][j / 10];
        let edginc = t.face_mapping(pen, 1, j % 10);
        for i in 2..5 {
            let tet_slot = edginc[i];
            let tetinc = t.face_mapping(pen, 3, tet_slot);
            let tet_cls = t.face_index(pen, 3, tet_slot);
            // the edge as it sits inside the tetrahedron
            let e_num = perm::edge_number_4(
                tetinc.pre_image_of(edginc[0]),
                tetinc.pre_image_of(edginc[1]));
            let edgtetinc = t.subface(3, tet_cls, 1, e_num).1;
            cc.set(&[ci1 + j, i % 5], CoverFacet::new(
                ri1 + 6 * ix.nic_lookup(3, tet_cls) + e_num,
                -sgn(((tetinc * edgtetinc).inverse() * edginc).sign())));
            // the piece dual to a triangle of the pentachoron
            let f_num = perm::triangle_number_5(
                edginc[0], edginc[1], edginc[i]);
            let facinc = t.face_mapping(pen, 2, f_num);
            let mut delta = edginc.inverse() * facinc
                * Perm::transposition(2, facinc.pre_image_of(edginc[i]));
            delta = delta * Perm::transposition(0, delta[0]);
            cc.set(&[ci1 + j, 5 + i % 5], CoverFacet::new(
                ri2 + 10 * (j / 10) + f_num, sgn(delta.sign())));
        }
    }
    for j in 0..ix.ideal_count(3) {
        let (f, v) = ix.ic_index(3, j);
        for i in 1..5 {
            let slot = (v + i) % 5;
            let p = t.face_mapping(f, 3, slot);
            let tet_cls = t.face_index(f, 3, slot);
            let idl = ix.ic_lookup(2, tet_cls, p.pre_image_of(v));
            cc.set(&[ci2 + j, i],
                CoverFacet::new(ri3 + idl, -sgn(p.sign())));
        }
    }
    out.push(cc);

    // mixed 4-cells
    let ri1 = ci1;
    let ri2 = ci2;

    let mut cc = CoverGrid::new(2);
    for j in 0..5 * nc[4] {
        let pen = ix.nic[4][j / 5];
        for i in 1..5 {
            let tet_slot = (j + i) % 5;
            let tetinc = t.face_mapping(pen, 3, tet_slot);
            let tet_cls = t.face_index(pen, 3, tet_slot);
            cc.set(&[j, i % 5], CoverFacet::new(
                4 * ix.nic_lookup(3, tet_cls) + tetinc.pre_image_of(j % 5),
                sgn(tetinc.sign())));
            let e_num = perm::edge_number_5(j % 5, (j + i) % 5);
            let edginc = t.face_mapping(pen, 1, e_num);
            cc.set(&[j, 5 + i % 5], CoverFacet::new(
                ri1 + 10 * (j / 5) + e_num,
                (if edginc[1] == j % 5 { 1 } else { -1 }) * sgn(edginc.sign())));
        }
        if t.is_ideal_vertex(t.face_index(pen, 0, j % 5)) {
            let idl = ix.ic_lookup(3, pen, j % 5);
            cc.set(&[j, 0], CoverFacet::new(ri2 + idl, 1));
        }
    }
    out.push(cc);

    out
}
