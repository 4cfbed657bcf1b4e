//! Triangulations described by facet gluings, with their full skeleta.
//!
//! A triangulation on simplices with `V` vertices each (`V = 4`:
//! tetrahedra, `V = 5`: pentachora) stores, per facet slot, either nothing
//! (a boundary facet) or the glued-to simplex and the gluing permutation on
//! vertex labels. Facet `i` is opposite vertex `i`, so a gluing permutation
//! also maps facet numbers.
//!
//! The skeleton assigns every `d`-face (`d < V - 1`) a class index and, per
//! appearance in a simplex, a *mapping* permutation sending the class's
//! intrinsic vertex labels `0..=d` to ambient vertex slots. Mappings are
//! orientation-coherent across the appearances of one class: codimension-1
//! classes list the side matching the simplex orientation first, and
//! codimension-2 classes enumerate their embeddings along the link path or
//! cycle. This coherence is what the dual cell decomposition's boundary
//! signs are built from.

use ahash::AHashSet;
use tessella::Sign;
use tessella::perm::{self, Perm};

pub type Gluing<const V: usize> = (usize, Perm<V>);

/// One appearance of a face class inside a top-simplex.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceEmbedding<const V: usize> {
    pub simplex: usize,
    pub slot: usize,
    pub vertices: Perm<V>,
}

#[derive(Clone, Debug)]
pub struct FaceClass<const V: usize> {
    pub embeddings: Vec<FaceEmbedding<V>>,
    pub boundary: bool,
}

impl<const V: usize> FaceClass<V> {
    pub fn degree(&self) -> usize {
        self.embeddings.len()
    }

    pub fn front(&self) -> &FaceEmbedding<V> {
        &self.embeddings[0]
    }

    pub fn back(&self) -> &FaceEmbedding<V> {
        self.embeddings.last().unwrap()
    }
}

#[derive(Clone, Debug)]
pub struct Triangulation<const V: usize> {
    gluings: Vec<Vec<Option<Gluing<V>>>>,
    orient: Vec<Sign>,
    orientable: bool,
    connected: bool,
    // per dimension 0..V-1: face classes and the (simplex, slot) table
    classes: Vec<Vec<FaceClass<V>>>,
    table: Vec<Vec<Vec<(usize, Perm<V>)>>>,
    ideal: Vec<bool>,
}

impl<const V: usize> Triangulation<V> {
    /// Builds a triangulation from a gluing list
    /// `(simplex, facet, target simplex, vertex permutation)`. Each gluing
    /// is recorded from both sides; unlisted facets stay boundary.
    pub fn from_gluings(n: usize,
                        gluings: &[(usize, usize, usize, [usize; V])]) -> Self {
        let mut glu: Vec<Vec<Option<Gluing<V>>>> = vec![vec![None; V]; n];
        for &(s, f, t, im) in gluings {
            let p = Perm::from_images(im);
            let g = p[f];
            assert!(s < n && t < n && f < V);
            assert!(glu[s][f].is_none(), "facet glued twice");
            assert!(!(s == t && f == g), "facet glued to itself");
            glu[s][f] = Some((t, p));
            assert!(glu[t][g].is_none(), "facet glued twice");
            glu[t][g] = Some((s, p.inverse()));
        }
        Self::from_gluing_table(glu)
    }

    pub fn from_gluing_table(gluings: Vec<Vec<Option<Gluing<V>>>>) -> Self {
        let mut tri = Self {
            gluings,
            orient: vec![],
            orientable: true,
            connected: true,
            classes: vec![],
            table: vec![],
            ideal: vec![],
        };
        tri.calculate_orientations();
        tri.calculate_faces();
        tri.calculate_boundary();
        tri.ideal = vec![false; tri.face_count(0)];
        tri
    }

    pub fn size(&self) -> usize {
        self.gluings.len()
    }

    pub fn dim(&self) -> usize {
        V - 1
    }

    pub fn gluing(&self, s: usize, facet: usize) -> Option<&Gluing<V>> {
        self.gluings[s][facet].as_ref()
    }

    pub fn is_boundary_facet(&self, s: usize, facet: usize) -> bool {
        self.gluings[s][facet].is_none()
    }

    pub fn orientation(&self, s: usize) -> Sign {
        self.orient[s]
    }

    pub fn is_orientable(&self) -> bool {
        self.orientable
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_closed(&self) -> bool {
        self.gluings.iter().all(|row| row.iter().all(|g| g.is_some()))
    }

    /// Number of `d`-face classes; `d = V - 1` counts the top-simplices.
    pub fn face_count(&self, d: usize) -> usize {
        if d == V - 1 {
            self.size()
        } else {
            self.classes[d].len()
        }
    }

    pub fn face(&self, d: usize, i: usize) -> &FaceClass<V> {
        &self.classes[d][i]
    }

    pub fn faces(&self, d: usize) -> &[FaceClass<V>] {
        &self.classes[d]
    }

    /// Class index of the `d`-face at the given slot of a simplex.
    pub fn face_index(&self, s: usize, d: usize, slot: usize) -> usize {
        self.table[d][s][slot].0
    }

    /// Mapping permutation of the `d`-face at the given slot: intrinsic
    /// class labels to ambient vertex slots. Identical to the
    /// corresponding embedding's `vertices`.
    pub fn face_mapping(&self, s: usize, d: usize, slot: usize) -> Perm<V> {
        self.table[d][s][slot].1
    }

    pub fn is_boundary_face(&self, d: usize, i: usize) -> bool {
        if d == V - 1 {
            false
        } else {
            self.classes[d][i].boundary
        }
    }

    pub fn is_ideal_vertex(&self, v: usize) -> bool {
        self.ideal[v]
    }

    pub fn has_ideal_vertices(&self) -> bool {
        self.ideal.iter().any(|&b| b)
    }

    /// Vertex class at intrinsic label `k` of the `d`-face class `i`.
    pub fn face_vertex(&self, d: usize, i: usize, k: usize) -> usize {
        debug_assert!(k <= d);
        let emb = self.classes[d][i].front();
        self.face_index(emb.simplex, 0, emb.vertices[k])
    }

    /// The `k`-th `d2`-subface of the `d`-face class `i`, as a pair
    /// (subface class, mapping). Subfaces are numbered within the face's
    /// intrinsic label space by the same conventions as simplex faces, and
    /// the mapping sends the subface class's labels into the face's labels
    /// (with the remaining labels ascending, and labels `> d` fixed).
    pub fn subface(&self, d: usize, i: usize, d2: usize, k: usize)
        -> (usize, Perm<V>)
    {
        assert!(d2 < d);
        let emb = self.classes[d][i].front();
        let m_f = emb.vertices;
        let local = perm::face_vertices(d + 1, d2, k);
        let ambient: Vec<usize> = local.iter().map(|&x| m_f[x]).collect();
        let slot = perm::face_number(V, d2, &ambient);
        let (cls, m_g) = self.table[d2][emb.simplex][slot];
        let m_f_inv = m_f.inverse();

        let mut im = [usize::MAX; V];
        let mut used = [false; V];
        for j in 0..=d2 {
            let x = m_f_inv[m_g[j]];
            im[j] = x;
            used[x] = true;
        }
        let mut pos = d2 + 1;
        for x in 0..=d {
            if !used[x] {
                im[pos] = x;
                pos += 1;
            }
        }
        for (x, slot) in im.iter_mut().enumerate().skip(d + 1) {
            *slot = x;
        }
        (cls, Perm::from_images(im))
    }

    // ---- skeleton computation ----

    fn calculate_orientations(&mut self) {
        let n = self.size();
        self.orient = vec![Sign::Pos; n];
        let mut seen = vec![false; n];
        let mut components = 0;

        for s0 in 0..n {
            if seen[s0] { continue }
            components += 1;
            seen[s0] = true;
            self.orient[s0] = Sign::Pos;
            let mut queue = std::collections::VecDeque::from([s0]);
            while let Some(s) = queue.pop_front() {
                for f in 0..V {
                    let Some(&(t, g)) = self.gluings[s][f].as_ref() else {
                        continue
                    };
                    let yours = if g.sign() == Sign::Pos {
                        -self.orient[s]
                    } else {
                        self.orient[s]
                    };
                    if seen[t] {
                        if yours != self.orient[t] {
                            self.orientable = false;
                        }
                    } else {
                        seen[t] = true;
                        self.orient[t] = yours;
                        queue.push_back(t);
                    }
                }
            }
        }
        self.connected = components <= 1;
    }

    fn calculate_faces(&mut self) {
        self.classes = vec![vec![]; V - 1];
        self.table = (0..V - 1).map(|d| {
            let slots = perm::face_count(V, d);
            vec![vec![(usize::MAX, Perm::id()); slots]; self.size()]
        }).collect();

        for d in (0..V - 1).rev() {
            if d == V - 2 {
                self.calculate_codim_1();
            } else if d == V - 3 {
                self.calculate_codim_2();
            } else {
                self.calculate_general(d);
            }
        }
    }

    fn set_entry(&mut self, d: usize, s: usize, slot: usize,
                 class: usize, map: Perm<V>) {
        self.table[d][s][slot] = (class, map);
        self.classes[d][class].embeddings.push(FaceEmbedding {
            simplex: s, slot, vertices: map,
        });
    }

    fn entry_known(&self, d: usize, s: usize, slot: usize) -> bool {
        self.table[d][s][slot].0 != usize::MAX
    }

    fn calculate_codim_1(&mut self) {
        let d = V - 2;
        for s in 0..self.size() {
            for facet in (0..V).rev() {
                if self.entry_known(d, s, facet) { continue }

                let class = self.classes[d].len();
                self.classes[d].push(FaceClass {
                    embeddings: vec![], boundary: false,
                });
                let mut map = perm::face_ordering::<V>(d, facet);

                if let Some(&(t, g)) = self.gluings[s][facet].as_ref() {
                    let adj_map = g * map;
                    let adj_facet = adj_map[V - 1];
                    // the side whose mapping sign matches its orientation
                    // becomes the first embedding
                    if map.sign() == self.orient[s] {
                        self.set_entry(d, s, facet, class, map);
                        self.set_entry(d, t, adj_facet, class, adj_map);
                    } else {
                        self.set_entry(d, t, adj_facet, class, adj_map);
                        self.set_entry(d, s, facet, class, map);
                    }
                } else {
                    if map.sign() != self.orient[s] {
                        map = map * Perm::transposition(V - 2, V - 3);
                    }
                    self.set_entry(d, s, facet, class, map);
                }
            }
        }
    }

    fn calculate_codim_2(&mut self) {
        let d = V - 3;
        let swap = Perm::<V>::transposition(V - 2, V - 1);
        let slots = perm::face_count(V, d);

        for s in 0..self.size() {
            for start in 0..slots {
                if self.entry_known(d, s, start) { continue }

                let class = self.classes[d].len();
                self.classes[d].push(FaceClass {
                    embeddings: vec![], boundary: false,
                });
                let mut map = perm::face_ordering::<V>(d, start);
                if map.sign() != self.orient[s] {
                    map = map * swap;
                }
                self.set_entry(d, s, start, class, map);

                // the link is a path or cycle; walk it both ways
                for dir in 0..2 {
                    let mut simp = s;
                    let mut m = map;
                    loop {
                        let exit = if dir == 0 { m[V - 2] } else { m[V - 1] };
                        let Some(&(t, g)) = self.gluings[simp][exit].as_ref()
                        else {
                            break
                        };
                        let adj_map = g * m * swap;
                        let verts: Vec<usize> =
                            (0..=d).map(|j| adj_map[j]).collect();
                        let adj_slot = perm::face_number(V, d, &verts);
                        if self.entry_known(d, t, adj_slot) {
                            // walked right around a cycle
                            break
                        }
                        if dir == 0 {
                            self.set_entry(d, t, adj_slot, class, adj_map);
                        } else {
                            self.table[d][t][adj_slot] = (class, adj_map);
                            self.classes[d][class].embeddings.insert(0,
                                FaceEmbedding {
                                    simplex: t, slot: adj_slot,
                                    vertices: adj_map,
                                });
                        }
                        simp = t;
                        m = adj_map;
                    }
                }
            }
        }
    }

    fn calculate_general(&mut self, d: usize) {
        let swap = Perm::<V>::transposition(V - 2, V - 1);
        let slots = perm::face_count(V, d);

        for s in 0..self.size() {
            for start in 0..slots {
                if self.entry_known(d, s, start) { continue }

                let class = self.classes[d].len();
                self.classes[d].push(FaceClass {
                    embeddings: vec![], boundary: false,
                });
                let map = {
                    let mut m = perm::face_ordering::<V>(d, start);
                    if m.sign() != self.orient[s] {
                        m = m * swap;
                    }
                    m
                };
                self.set_entry(d, s, start, class, map);

                let mut queue =
                    std::collections::VecDeque::from([(s, start)]);
                while let Some((simp, slot)) = queue.pop_front() {
                    let face_verts: AHashSet<usize> =
                        perm::face_vertices(V, d, slot).into_iter().collect();
                    let m = self.table[d][simp][slot].1;
                    for exit in 0..V {
                        if face_verts.contains(&exit) { continue }
                        let Some(&(t, g)) = self.gluings[simp][exit].as_ref()
                        else {
                            continue
                        };
                        // the swap keeps the orientation of the opposite
                        // face consistent across the crossing
                        let adj_map = g * m * swap;
                        let verts: Vec<usize> =
                            (0..=d).map(|j| adj_map[j]).collect();
                        let adj_slot = perm::face_number(V, d, &verts);
                        if self.entry_known(d, t, adj_slot) { continue }
                        self.set_entry(d, t, adj_slot, class, adj_map);
                        queue.push_back((t, adj_slot));
                    }
                }
            }
        }
    }

    fn calculate_boundary(&mut self) {
        for s in 0..self.size() {
            for facet in 0..V {
                if self.gluings[s][facet].is_some() { continue }
                let fv = perm::face_vertices(V, V - 2, facet);
                for d in 0..V - 1 {
                    for k in 0..perm::face_count(V, d) {
                        let kv = perm::face_vertices(V, d, k);
                        if kv.iter().all(|x| fv.contains(x)) {
                            let cls = self.table[d][s][k].0;
                            self.classes[d][cls].boundary = true;
                        }
                    }
                }
            }
        }
    }

    pub(crate) fn set_ideal(&mut self, ideal: Vec<bool>) {
        assert_eq!(ideal.len(), self.face_count(0));
        for (v, &flag) in ideal.iter().enumerate() {
            if flag {
                assert!(!self.classes[0][v].boundary,
                    "an ideal vertex must have a closed link");
            }
        }
        self.ideal = ideal;
    }
}

/// A 3-manifold triangulation. Ideal vertices are those whose link is
/// closed but not a 2-sphere, detected from the link's Euler
/// characteristic.
#[derive(Clone, Debug)]
pub struct Triangulation3 {
    inner: Triangulation<4>,
}

impl Triangulation3 {
    pub fn from_gluings(n: usize,
                        gluings: &[(usize, usize, usize, [usize; 4])]) -> Self {
        Self::new(Triangulation::<4>::from_gluings(n, gluings))
    }

    pub fn new(mut inner: Triangulation<4>) -> Self {
        let ideal = (0..inner.face_count(0)).map(|v| {
            !inner.is_boundary_face(0, v) && vertex_link_euler(&inner, v) != 2
        }).collect();
        inner.set_ideal(ideal);
        Self { inner }
    }

    pub fn vertex_link_euler(&self, v: usize) -> i64 {
        vertex_link_euler(&self.inner, v)
    }
}

/// Euler characteristic of a vertex link in a 3-manifold triangulation:
/// link vertices are edge-ends, link edges are triangle corners, link
/// faces are tetrahedron corners at the vertex.
fn vertex_link_euler(tri: &Triangulation<4>, v: usize) -> i64 {
    let mut verts = 0i64;
    for e in tri.faces(1) {
        let emb = e.front();
        for end in 0..2 {
            if tri.face_index(emb.simplex, 0, emb.vertices[end]) == v {
                verts += 1;
            }
        }
    }
    let mut edges = 0i64;
    for t in tri.faces(2) {
        let emb = t.front();
        for corner in 0..3 {
            if tri.face_index(emb.simplex, 0, emb.vertices[corner]) == v {
                edges += 1;
            }
        }
    }
    let mut faces = 0i64;
    for s in 0..tri.size() {
        for corner in 0..4 {
            if tri.face_index(s, 0, corner) == v {
                faces += 1;
            }
        }
    }
    verts - edges + faces
}

/// A 4-manifold triangulation. Recognizing which vertex links are
/// 3-spheres is beyond this crate, so ideal vertices are declared at
/// construction; they must have closed links.
#[derive(Clone, Debug)]
pub struct Triangulation4 {
    inner: Triangulation<5>,
}

impl Triangulation4 {
    pub fn from_gluings(n: usize,
                        gluings: &[(usize, usize, usize, [usize; 5])]) -> Self {
        Self::new(Triangulation::<5>::from_gluings(n, gluings))
    }

    pub fn new(inner: Triangulation<5>) -> Self {
        Self { inner }
    }

    pub fn with_ideal_vertices(mut self, ideal: &[usize]) -> Self {
        let mut flags = vec![false; self.inner.face_count(0)];
        for &v in ideal {
            flags[v] = true;
        }
        self.inner.set_ideal(flags);
        self
    }
}

macro_rules! deref_tri {
    ($t:ty, $v:literal) => {
        impl std::ops::Deref for $t {
            type Target = Triangulation<$v>;
            fn deref(&self) -> &Self::Target {
                &self.inner
            }
        }
    };
}

deref_tri!(Triangulation3, 4);
deref_tri!(Triangulation4, 5);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn one_tet_sphere() {
        let t = fixtures::s3_one_tet();
        assert_eq!(t.size(), 1);
        assert!(t.is_orientable());
        assert!(t.is_closed());
        assert_eq!(t.face_count(0), 2);
        assert_eq!(t.face_count(1), 3);
        assert_eq!(t.face_count(2), 2);
        assert!(!t.has_ideal_vertices());
        for v in 0..2 {
            assert_eq!(t.vertex_link_euler(v), 2);
        }
    }

    #[test]
    fn figure_eight() {
        let t = fixtures::figure_eight();
        assert_eq!(t.size(), 2);
        assert!(t.is_orientable());
        assert!(t.is_closed());
        assert_eq!(t.face_count(0), 1);
        assert_eq!(t.face_count(1), 2);
        assert_eq!(t.face_count(2), 4);
        assert!(t.is_ideal_vertex(0));
        assert_eq!(t.vertex_link_euler(0), 0); // torus cusp
    }

    #[test]
    fn mapping_signs_codim_1() {
        // interior facets: the first embedding's sign matches its simplex
        // orientation
        let t = fixtures::figure_eight();
        for f in t.faces(2) {
            let emb = f.front();
            assert_eq!(emb.vertices.sign(), t.orientation(emb.simplex));
        }
    }

    #[test]
    fn codim_2_link_cycles() {
        // interior edge embeddings walk the link: consecutive embeddings
        // are related by a gluing through the forward facet
        let t = fixtures::figure_eight();
        for e in t.faces(1) {
            let n = e.degree();
            for i in 0..n {
                let cur = &e.embeddings[i];
                let nxt = &e.embeddings[(i + 1) % n];
                let exit = cur.vertices[2];
                let (tgt, g) = *t.gluing(cur.simplex, exit).unwrap();
                assert_eq!(tgt, nxt.simplex);
                let expect = g * cur.vertices
                    * tessella::perm::Perm::transposition(2, 3);
                assert_eq!(expect, nxt.vertices);
            }
        }
    }

    #[test]
    fn two_pentachora_sphere() {
        let t = fixtures::s4_two_pentachora();
        assert_eq!(t.size(), 2);
        assert!(t.is_orientable());
        assert!(t.is_closed());
        assert_eq!(t.face_count(0), 5);
        assert_eq!(t.face_count(1), 10);
        assert_eq!(t.face_count(2), 10);
        assert_eq!(t.face_count(3), 5);
    }

    #[test]
    fn boundary_flags() {
        // a single unglued tetrahedron: everything is boundary
        let t = Triangulation3::from_gluings(1, &[]);
        assert!(!t.is_closed());
        for d in 0..3 {
            for i in 0..t.face_count(d) {
                assert!(t.is_boundary_face(d, i));
            }
        }
    }

    #[test]
    fn subface_consistency() {
        let t = fixtures::figure_eight();
        // each triangle has 3 edges; their classes match ambient lookups
        for i in 0..t.face_count(2) {
            let emb = t.face(2, i).front();
            for k in 0..3 {
                let (cls, p) = t.subface(2, i, 1, k);
                // the subface mapping keeps labels above the face fixed
                assert_eq!(p[3], 3);
                // the edge's vertices, pushed into the ambient simplex,
                // agree with a direct lookup
                let m_f = emb.vertices;
                let av = [m_f[p[0]], m_f[p[1]]];
                let slot = tessella::perm::face_number(4, 1, &av);
                assert_eq!(t.face_index(emb.simplex, 1, slot), cls);
            }
        }
    }

    #[test]
    fn orientation_double_cover_consistency() {
        let t = fixtures::s3_one_tet();
        assert!(t.is_connected());
        assert_eq!(t.orientation(0), Sign::Pos);
    }
}
