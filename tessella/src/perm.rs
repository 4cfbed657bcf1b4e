//! Fixed-size permutations of `{0, .., N-1}` together with the canonical
//! face-numbering tables of a simplex on `N` vertices.
//!
//! Conventions, shared with the triangulation layer:
//!
//! * codimension-1 faces ("facets") are numbered by their opposite vertex;
//! * all lower-dimensional faces are numbered lexicographically by vertex set;
//! * `ordering` permutations list the face's vertices in ascending order
//!   followed by the remaining vertices in ascending order (so a facet's
//!   ordering ends with its opposite vertex).

use std::ops::{Index, Mul};
use crate::Sign;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Perm<const N: usize>([usize; N]);

impl<const N: usize> Perm<N> {
    pub fn id() -> Self {
        Self(std::array::from_fn(|i| i))
    }

    pub fn transposition(a: usize, b: usize) -> Self {
        assert!(a < N && b < N);
        let mut p = Self::id();
        p.0.swap(a, b);
        p
    }

    pub fn from_images(im: [usize; N]) -> Self {
        let mut seen = [false; N];
        for &v in im.iter() {
            assert!(v < N && !seen[v]);
            seen[v] = true;
        }
        Self(im)
    }

    pub fn images(&self) -> [usize; N] {
        self.0
    }

    pub fn pre_image_of(&self, v: usize) -> usize {
        debug_assert!(v < N);
        self.0.iter().position(|&x| x == v).unwrap()
    }

    pub fn inverse(&self) -> Self {
        let mut out = [0; N];
        for i in 0..N {
            out[self.0[i]] = i;
        }
        Self(out)
    }

    pub fn sign(&self) -> Sign {
        let mut inv = 0;
        for i in 0..N {
            for j in i + 1..N {
                if self.0[i] > self.0[j] {
                    inv += 1;
                }
            }
        }
        Sign::from_parity(inv as i64)
    }

    /// Lexicographic rank of the image sequence within `S_N`.
    pub fn index(&self) -> usize {
        let mut rank = 0;
        let mut fact = 1;
        for i in 1..N {
            fact *= i;
        }
        let mut remaining: Vec<usize> = (0..N).collect();
        let mut f = fact;
        for i in 0..N {
            let pos = remaining.iter().position(|&x| x == self.0[i]).unwrap();
            rank += pos * f;
            remaining.remove(pos);
            if N - i > 1 {
                f /= N - i - 1;
            }
        }
        rank
    }

    pub fn from_index(mut rank: usize) -> Self {
        let mut fact = 1;
        for i in 1..N {
            fact *= i;
        }
        assert!(rank < fact * N);
        let mut remaining: Vec<usize> = (0..N).collect();
        let mut out = [0; N];
        let mut f = fact;
        for i in 0..N {
            let pos = rank / f;
            rank %= f;
            out[i] = remaining.remove(pos);
            if N - i > 1 {
                f /= N - i - 1;
            }
        }
        Self(out)
    }

    pub fn all() -> impl Iterator<Item = Self> {
        let mut fact = 1;
        for i in 1..=N {
            fact *= i;
        }
        (0..fact).map(Self::from_index)
    }
}

impl<const N: usize> Default for Perm<N> {
    fn default() -> Self {
        Self::id()
    }
}

impl<const N: usize> Index<usize> for Perm<N> {
    type Output = usize;
    fn index(&self, i: usize) -> &usize {
        &self.0[i]
    }
}

impl<const N: usize> Mul for Perm<N> {
    type Output = Self;
    // (p * q)[i] = p[q[i]]
    fn mul(self, rhs: Self) -> Self {
        let mut out = [0; N];
        for i in 0..N {
            out[i] = self.0[rhs.0[i]];
        }
        Self(out)
    }
}

impl<const N: usize> std::fmt::Display for Perm<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for i in 0..N {
            write!(f, "{}", self.0[i])?;
        }
        write!(f, ")")
    }
}

// Face-numbering tables.

/// Edges of a 3-simplex, in lexicographic order.
pub const EDGE_VERTEX_4: [[usize; 2]; 6] =
    [[0, 1], [0, 2], [0, 3], [1, 2], [1, 3], [2, 3]];

/// Edges of a 4-simplex, in lexicographic order.
pub const EDGE_VERTEX_5: [[usize; 2]; 10] =
    [[0, 1], [0, 2], [0, 3], [0, 4], [1, 2],
     [1, 3], [1, 4], [2, 3], [2, 4], [3, 4]];

/// Triangles of a 4-simplex, in lexicographic order.
pub const TRIANGLE_VERTEX_5: [[usize; 3]; 10] =
    [[0, 1, 2], [0, 1, 3], [0, 1, 4], [0, 2, 3], [0, 2, 4],
     [0, 3, 4], [1, 2, 3], [1, 2, 4], [1, 3, 4], [2, 3, 4]];

/// Index of the edge joining distinct vertices `i`, `j` of a 3-simplex.
pub fn edge_number_4(i: usize, j: usize) -> usize {
    assert!(i != j && i < 4 && j < 4);
    let (a, b) = if i < j { (i, j) } else { (j, i) };
    EDGE_VERTEX_4.iter().position(|e| e == &[a, b]).unwrap()
}

/// Index of the edge joining distinct vertices `i`, `j` of a 4-simplex.
pub fn edge_number_5(i: usize, j: usize) -> usize {
    assert!(i != j && i < 5 && j < 5);
    let (a, b) = if i < j { (i, j) } else { (j, i) };
    EDGE_VERTEX_5.iter().position(|e| e == &[a, b]).unwrap()
}

/// Index of the triangle spanned by distinct vertices `i`, `j`, `k` of a
/// 4-simplex.
pub fn triangle_number_5(i: usize, j: usize, k: usize) -> usize {
    assert!(i != j && j != k && i != k && i < 5 && j < 5 && k < 5);
    let mut v = [i, j, k];
    v.sort();
    TRIANGLE_VERTEX_5.iter().position(|t| t == &v).unwrap()
}

/// Number of `d`-faces of a simplex on `v` vertices.
pub fn face_count(v: usize, d: usize) -> usize {
    binomial(v, d + 1)
}

/// Vertex set of `d`-face number `k` of a simplex on `v` vertices.
pub fn face_vertices(v: usize, d: usize, k: usize) -> Vec<usize> {
    if d + 2 == v {
        // facets are numbered by opposite vertex
        (0..v).filter(|&x| x != k).collect()
    } else {
        subset_of_rank(v, d + 1, k)
    }
}

/// Inverse of [`face_vertices`]: the face number of a given vertex set.
pub fn face_number(v: usize, d: usize, verts: &[usize]) -> usize {
    debug_assert_eq!(verts.len(), d + 1);
    let mut sorted = verts.to_vec();
    sorted.sort();
    if d + 2 == v {
        (0..v).find(|x| !sorted.contains(x)).unwrap()
    } else {
        rank_of_subset(v, &sorted)
    }
}

fn binomial(n: usize, k: usize) -> usize {
    if k > n { return 0 }
    let k = k.min(n - k);
    let mut num = 1;
    let mut den = 1;
    for i in 0..k {
        num *= n - i;
        den *= i + 1;
    }
    num / den
}

fn subset_of_rank(n: usize, k: usize, mut rank: usize) -> Vec<usize> {
    let mut out = Vec::with_capacity(k);
    let mut next = 0;
    for rem in (1..=k).rev() {
        let mut v = next;
        loop {
            let count = binomial(n - v - 1, rem - 1);
            if rank < count { break }
            rank -= count;
            v += 1;
        }
        out.push(v);
        next = v + 1;
    }
    out
}

fn rank_of_subset(n: usize, verts: &[usize]) -> usize {
    let k = verts.len();
    let mut rank = 0;
    let mut prev = 0;
    for (pos, &v) in verts.iter().enumerate() {
        for x in prev..v {
            rank += binomial(n - x - 1, k - pos - 1);
        }
        prev = v + 1;
    }
    rank
}

/// The canonical permutation for `d`-face number `k`: face vertices in
/// ascending order followed by the remaining vertices in ascending order.
pub fn face_ordering<const N: usize>(d: usize, k: usize) -> Perm<N> {
    let fv = face_vertices(N, d, k);
    let mut im = [0usize; N];
    let mut pos = 0;
    for &x in &fv {
        im[pos] = x;
        pos += 1;
    }
    for x in 0..N {
        if !fv.contains(&x) {
            im[pos] = x;
            pos += 1;
        }
    }
    Perm::from_images(im)
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    #[test]
    fn compose() {
        let p = Perm::<4>::from_images([1, 2, 0, 3]);
        let q = Perm::<4>::from_images([0, 1, 3, 2]);
        let pq = p * q;
        assert_eq!(pq.images(), [1, 2, 3, 0]);
    }

    #[test]
    fn inverse() {
        for p in Perm::<4>::all() {
            assert_eq!(p * p.inverse(), Perm::id());
            assert_eq!(p.inverse() * p, Perm::id());
        }
    }

    #[test]
    fn sign() {
        assert_eq!(Perm::<4>::id().sign(), Sign::Pos);
        assert_eq!(Perm::<4>::transposition(0, 1).sign(), Sign::Neg);
        assert_eq!(Perm::<5>::from_images([1, 2, 0, 3, 4]).sign(), Sign::Pos);
    }

    #[test]
    fn sign_multiplicative() {
        for (p, q) in Perm::<4>::all().cartesian_product(Perm::<4>::all().collect_vec()) {
            assert_eq!((p * q).sign(), p.sign() * q.sign());
        }
    }

    #[test]
    fn index_roundtrip() {
        for (i, p) in Perm::<4>::all().enumerate() {
            assert_eq!(p.index(), i);
            assert_eq!(Perm::<4>::from_index(i), p);
        }
        assert_eq!(Perm::<5>::all().count(), 120);
    }

    #[test]
    fn index_is_lexicographic() {
        let all = Perm::<4>::all().map(|p| p.images()).collect_vec();
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn pre_image() {
        let p = Perm::<5>::from_images([3, 0, 4, 1, 2]);
        for i in 0..5 {
            assert_eq!(p[p.pre_image_of(i)], i);
        }
    }

    #[test]
    fn edge_tables() {
        for (e, [i, j]) in EDGE_VERTEX_4.iter().enumerate() {
            assert_eq!(edge_number_4(*i, *j), e);
            assert_eq!(edge_number_4(*j, *i), e);
        }
        for (e, [i, j]) in EDGE_VERTEX_5.iter().enumerate() {
            assert_eq!(edge_number_5(*i, *j), e);
        }
        for (t, [i, j, k]) in TRIANGLE_VERTEX_5.iter().enumerate() {
            assert_eq!(triangle_number_5(*i, *j, *k), t);
            assert_eq!(triangle_number_5(*k, *i, *j), t);
        }
    }

    #[test]
    fn face_numbering() {
        // facets are numbered by opposite vertex
        assert_eq!(face_vertices(4, 2, 0), vec![1, 2, 3]);
        assert_eq!(face_vertices(4, 2, 3), vec![0, 1, 2]);
        assert_eq!(face_number(4, 2, &[0, 1, 2]), 3);
        // lower faces lexicographically
        assert_eq!(face_vertices(4, 1, 0), vec![0, 1]);
        assert_eq!(face_vertices(5, 1, 9), vec![3, 4]);
        for d in 0..4 {
            for k in 0..face_count(5, d) {
                assert_eq!(face_number(5, d, &face_vertices(5, d, k)), k);
            }
        }
    }

    #[test]
    fn orderings() {
        // a facet ordering ends with the opposite vertex
        let p = face_ordering::<4>(2, 1);
        assert_eq!(p.images(), [0, 2, 3, 1]);
        // codim >= 2: face vertices then the rest, all ascending
        let p = face_ordering::<4>(1, 1); // edge {0, 2}
        assert_eq!(p.images(), [0, 2, 1, 3]);
        let p = face_ordering::<5>(1, 4); // edge {1, 2}
        assert_eq!(p.images(), [1, 2, 0, 3, 4]);
    }

    #[test]
    fn facet_ordering_signs() {
        // boundary signs of a 3-simplex: face i opposite vertex i
        let signs = (0..4)
            .map(|i| face_ordering::<4>(2, i).sign())
            .collect_vec();
        assert_eq!(signs, vec![Sign::Neg, Sign::Pos, Sign::Neg, Sign::Pos]);
    }
}
