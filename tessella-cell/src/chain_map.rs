//! The canonical chain maps between decompositions: inclusion of the
//! boundary, barycentric subdivision of the standard and dual complexes,
//! the quotient onto the relative complex, the connecting map of the pair,
//! and the Poincaré duality diagonal.

use tessella::Sign;
use tessella_matrix::CoverFacet;
use tessella_tri::Triangulation;
use crate::complex::CoverGrid;
use crate::{CellIndexes, Tri};

fn sgn(s: Sign) -> i64 {
    s.to_i64()
}

/// Subdivision `Std -> Mix`: a non-ideal `d`-cell is the sum of its
/// `d + 1` barycentric pieces; an ideal cell is a single mixed cell.
/// One map per dimension `0..=n`.
pub(crate) fn fill_std_to_mix(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    let n = tri.dim();
    let mut out = vec![];
    for d in 0..=n {
        let mut cm = CoverGrid::new(2);
        let delta = ix.num_mix[d] - ix.ideal_count(d) - ix.num_non_ideal[d];
        for j in 0..ix.num_standard[d] {
            if j < ix.num_non_ideal[d] {
                for i in 0..=d {
                    cm.set(&[j, i], CoverFacet::new((d + 1) * j + i, 1));
                }
            } else {
                cm.set(&[j, 0], CoverFacet::new(delta + j, 1));
            }
        }
        out.push(cm);
    }
    out
}

/// Subdivision `Dual -> Mix`: a dual cell is the sum of its barycentric
/// pieces, one per incidence inside a top-simplex; only the top-dimension
/// case needs an orientation sign. One map per dimension `0..=n`.
pub(crate) fn fill_dual_to_mix(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    match tri {
        Tri::D3(t) => fill_dual_to_mix_g::<4>(t, ix),
        Tri::D4(t) => fill_dual_to_mix_g::<5>(t, ix),
    }
}

fn fill_dual_to_mix_g<const V: usize>(t: &Triangulation<V>, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let n = V - 1;
    let nc = &ix.num_non_ideal;

    // offset of the per-top-simplex block inside each mixed dimension
    let delta: Vec<usize> = match n {
        3 => vec![
            nc[0] + nc[1] + nc[2],
            2 * nc[1] + 3 * nc[2],
            3 * nc[2],
            0,
        ],
        _ => vec![
            nc[0] + nc[1] + nc[2] + nc[3],
            2 * nc[1] + 3 * nc[2] + 4 * nc[3],
            3 * nc[2] + 6 * nc[3],
            4 * nc[3],
            0,
        ],
    };

    let mut out: Vec<CoverGrid> = (0..=n).map(|_| CoverGrid::new(2)).collect();

    for j in 0..nc[n] {
        // the barycentre of the top-simplex is its dual 0-cell piece
        out[0].set(&[j, 0], CoverFacet::new(delta[0] + j, 1));

        for d in 1..n {
            // dual d-cells come from interior (n-d)-faces
            let slots = tessella::perm::face_count(V, n - d);
            for i in 0..slots {
                let cls = t.face_index(j, n - d, i);
                if t.is_boundary_face(n - d, cls) { continue }
                let col = ix.dc_lookup(d, cls);
                out[d].set(&[col, j * slots + i],
                    CoverFacet::new(delta[d] + slots * j + i, 1));
            }
        }

        // dual n-cells: interior, non-ideal vertices; the piece inherits
        // the orientation of the vertex's corner
        for i in 0..V {
            let v = t.face_index(j, 0, i);
            if t.is_boundary_face(0, v) || t.is_ideal_vertex(v) { continue }
            let col = ix.dc_lookup(n, v);
            let vrtinc = t.face_mapping(j, 0, i);
            out[n].set(&[col, j * V + i],
                CoverFacet::new(delta[n] + V * j + i, sgn(vrtinc.sign())));
        }
    }

    out
}

/// Inclusion `StdBdry -> Std`: identity on shared index entries.
/// One map per dimension `0..n`.
pub(crate) fn fill_bdry_to_std(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    let n = tri.dim();
    let mut out = vec![];
    for d in 0..n {
        let mut cm = CoverGrid::new(2);
        for j in 0..ix.num_non_ideal_bdry[d] {
            let row = ix.nic_lookup(d, ix.bc[d][j]);
            cm.set(&[j, 0], CoverFacet::new(row, 1));
        }
        for j in 0..ix.ideal_count(d) {
            cm.set(&[ix.num_non_ideal_bdry[d] + j, 0],
                CoverFacet::new(ix.num_non_ideal[d] + j, 1));
        }
        out.push(cm);
    }
    out
}

/// Quotient `Std -> StdRelBdry`: projection onto the non-boundary index
/// set. One map per dimension `0..=n`.
pub(crate) fn fill_std_to_rel(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    let n = tri.dim();
    let mut out = vec![];
    for d in 0..=n {
        let mut cm = CoverGrid::new(2);
        for j in 0..ix.num_non_ideal[d] {
            let f = ix.nic[d][j];
            if ix.r_contains(d, f) {
                cm.set(&[j, 0], CoverFacet::new(ix.r_lookup(d, f), 1));
            }
        }
        out.push(cm);
    }
    out
}

/// The connecting map of the pair: a relative `(d+1)`-cell maps to its
/// standard boundary, projected onto the boundary complex. One map per
/// dimension `0..n` (indexed by the boundary dimension `d`).
pub(crate) fn fill_rel_to_bdry(tri: &Tri, ix: &CellIndexes) -> Vec<CoverGrid> {
    match tri {
        Tri::D3(t) => fill_rel_to_bdry_g::<4>(t, ix),
        Tri::D4(t) => fill_rel_to_bdry_g::<5>(t, ix),
    }
}

fn fill_rel_to_bdry_g<const V: usize>(t: &Triangulation<V>, ix: &CellIndexes)
    -> Vec<CoverGrid>
{
    let n = V - 1;
    let mut out = vec![];

    for d in 0..n {
        let dd = d + 1; // dimension of the relative cells
        let mut cm = CoverGrid::new(2);

        for j in 0..ix.num_rel[dd] {
            let f = ix.r[dd][j];
            for i in 0..=dd {
                if dd == 1 {
                    let v = t.face_vertex(1, f, i);
                    if t.is_ideal_vertex(v) {
                        let idl = ix.ic_lookup(0, f, i);
                        cm.accumulate(&[j, i], CoverFacet::new(
                            ix.num_non_ideal_bdry[0] + idl, 1));
                    } else if t.is_boundary_face(0, v) {
                        cm.accumulate(&[j, i], CoverFacet::new(
                            ix.bc_lookup(0, v),
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
                    cm.set(&[j, i + dd + 1], CoverFacet::new(
                        ix.num_non_ideal_bdry[dd - 1] + idl, 1));
                }

                let (g, p) = if dd == n {
                    (t.face_index(f, dd - 1, i), t.face_mapping(f, dd - 1, i))
                } else {
                    t.subface(dd, f, dd - 1, i)
                };
                if t.is_boundary_face(dd - 1, g) {
                    cm.set(&[j, i], CoverFacet::new(
                        ix.bc_lookup(dd - 1, g), sgn(p.sign())));
                }
            }
        }

        out.push(cm);
    }
    out
}

/// The diagonal of the Poincaré duality chain map
/// `Dual_d -> StdRelBdry_{n-d}`: the orientation of the dual cell, as the
/// product of its first embedding's sign with the top-simplex orientation.
/// Identity when the manifold is non-orientable (used with `Z_2`
/// coefficients only).
pub(crate) fn duality_diagonal(tri: &Tri, ix: &CellIndexes, d_dom: usize)
    -> Vec<i64>
{
    match tri {
        Tri::D3(t) => duality_diagonal_g::<4>(t, ix, d_dom),
        Tri::D4(t) => duality_diagonal_g::<5>(t, ix, d_dom),
    }
}

fn duality_diagonal_g<const V: usize>(t: &Triangulation<V>, ix: &CellIndexes,
                                      d_dom: usize) -> Vec<i64>
{
    let n = V - 1;
    if !t.is_orientable() {
        return vec![1; ix.num_dual[d_dom]]
    }
    (0..ix.num_dual[d_dom]).map(|i| {
        let f = ix.dc[d_dom][i];
        if d_dom == 0 {
            sgn(t.orientation(f))
        } else {
            let emb = t.face(n - d_dom, f).front();
            sgn(emb.vertices.sign()) * sgn(t.orientation(emb.simplex))
        }
    }).collect()
}
