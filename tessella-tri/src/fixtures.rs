//! Reference triangulations used across the test suites. Every table here
//! was verified independently before being committed: orientability, face
//! counts, vertex links and homology.

use crate::{Triangulation3, Triangulation4};

/// The one-tetrahedron 3-sphere: facets 0 and 1 folded together, and
/// facets 2 and 3.
pub fn s3_one_tet() -> Triangulation3 {
    Triangulation3::from_gluings(1, &[
        (0, 0, 0, [1, 0, 2, 3]),
        (0, 2, 0, [0, 1, 3, 2]),
    ])
}

/// The figure-eight knot complement: two ideal tetrahedra, one torus
/// cusp, two edges.
pub fn figure_eight() -> Triangulation3 {
    Triangulation3::from_gluings(2, &[
        (0, 0, 1, [0, 1, 2, 3]),
        (0, 1, 1, [1, 2, 0, 3]),
        (0, 2, 1, [1, 0, 3, 2]),
        (0, 3, 1, [3, 0, 2, 1]),
    ])
}

/// The lens space L(5,1), built as an untwisted layered loop of length
/// five.
pub fn lens_5_1() -> Triangulation3 {
    Triangulation3::from_gluings(5, &[
        (0, 0, 1, [2, 1, 0, 3]),
        (0, 1, 1, [0, 3, 2, 1]),
        (0, 2, 4, [2, 1, 0, 3]),
        (0, 3, 4, [0, 3, 2, 1]),
        (1, 0, 2, [2, 1, 0, 3]),
        (1, 1, 2, [0, 3, 2, 1]),
        (2, 0, 3, [2, 1, 0, 3]),
        (2, 1, 3, [0, 3, 2, 1]),
        (3, 0, 4, [2, 1, 0, 3]),
        (3, 1, 4, [0, 3, 2, 1]),
    ])
}

/// The Poincare homology sphere: the solid dodecahedron with opposite
/// faces identified through a one-tenth turn, coned to sixty tetrahedra
/// (five per pentagonal face).
pub fn poincare_sphere() -> Triangulation3 {
    Triangulation3::from_gluings(60, &[
        (0, 0, 58, [0, 1, 3, 2]),
        (0, 1, 21, [0, 1, 3, 2]),
        (0, 2, 1, [0, 1, 3, 2]),
        (0, 3, 4, [0, 1, 3, 2]),
        (1, 0, 57, [0, 1, 3, 2]),
        (1, 1, 12, [0, 1, 3, 2]),
        (1, 2, 2, [0, 1, 3, 2]),
        (2, 0, 56, [0, 1, 3, 2]),
        (2, 1, 6, [0, 1, 3, 2]),
        (2, 2, 3, [0, 1, 3, 2]),
        (3, 0, 55, [0, 1, 3, 2]),
        (3, 1, 25, [0, 1, 3, 2]),
        (3, 2, 4, [0, 1, 3, 2]),
        (4, 0, 59, [0, 1, 3, 2]),
        (4, 1, 17, [0, 1, 3, 2]),
        (5, 0, 53, [0, 1, 3, 2]),
        (5, 1, 26, [0, 1, 3, 2]),
        (5, 2, 6, [0, 1, 3, 2]),
        (5, 3, 9, [0, 1, 3, 2]),
        (6, 0, 52, [0, 1, 3, 2]),
        (6, 2, 7, [0, 1, 3, 2]),
        (7, 0, 51, [0, 1, 3, 2]),
        (7, 1, 11, [0, 1, 3, 2]),
        (7, 2, 8, [0, 1, 3, 2]),
        (8, 0, 50, [0, 1, 3, 2]),
        (8, 1, 45, [0, 1, 3, 2]),
        (8, 2, 9, [0, 1, 3, 2]),
        (9, 0, 54, [0, 1, 3, 2]),
        (9, 1, 32, [0, 1, 3, 2]),
        (10, 0, 38, [0, 1, 3, 2]),
        (10, 1, 46, [0, 1, 3, 2]),
        (10, 2, 11, [0, 1, 3, 2]),
        (10, 3, 14, [0, 1, 3, 2]),
        (11, 0, 37, [0, 1, 3, 2]),
        (11, 2, 12, [0, 1, 3, 2]),
        (12, 0, 36, [0, 1, 3, 2]),
        (12, 2, 13, [0, 1, 3, 2]),
        (13, 0, 35, [0, 1, 3, 2]),
        (13, 1, 20, [0, 1, 3, 2]),
        (13, 2, 14, [0, 1, 3, 2]),
        (14, 0, 39, [0, 1, 3, 2]),
        (14, 1, 42, [0, 1, 3, 2]),
        (15, 0, 47, [0, 1, 3, 2]),
        (15, 1, 53, [0, 1, 3, 2]),
        (15, 2, 16, [0, 1, 3, 2]),
        (15, 3, 19, [0, 1, 3, 2]),
        (16, 0, 46, [0, 1, 3, 2]),
        (16, 1, 22, [0, 1, 3, 2]),
        (16, 2, 17, [0, 1, 3, 2]),
        (17, 0, 45, [0, 1, 3, 2]),
        (17, 2, 18, [0, 1, 3, 2]),
        (18, 0, 49, [0, 1, 3, 2]),
        (18, 1, 29, [0, 1, 3, 2]),
        (18, 2, 19, [0, 1, 3, 2]),
        (19, 0, 48, [0, 1, 3, 2]),
        (19, 1, 36, [0, 1, 3, 2]),
        (20, 0, 32, [0, 1, 3, 2]),
        (20, 2, 21, [0, 1, 3, 2]),
        (20, 3, 24, [0, 1, 3, 2]),
        (21, 0, 31, [0, 1, 3, 2]),
        (21, 2, 22, [0, 1, 3, 2]),
        (22, 0, 30, [0, 1, 3, 2]),
        (22, 2, 23, [0, 1, 3, 2]),
        (23, 0, 34, [0, 1, 3, 2]),
        (23, 1, 52, [0, 1, 3, 2]),
        (23, 2, 24, [0, 1, 3, 2]),
        (24, 0, 33, [0, 1, 3, 2]),
        (24, 1, 43, [0, 1, 3, 2]),
        (25, 0, 42, [0, 1, 3, 2]),
        (25, 2, 26, [0, 1, 3, 2]),
        (25, 3, 29, [0, 1, 3, 2]),
        (26, 0, 41, [0, 1, 3, 2]),
        (26, 2, 27, [0, 1, 3, 2]),
        (27, 0, 40, [0, 1, 3, 2]),
        (27, 1, 31, [0, 1, 3, 2]),
        (27, 2, 28, [0, 1, 3, 2]),
        (28, 0, 44, [0, 1, 3, 2]),
        (28, 1, 37, [0, 1, 3, 2]),
        (28, 2, 29, [0, 1, 3, 2]),
        (29, 0, 43, [0, 1, 3, 2]),
        (30, 1, 38, [0, 1, 3, 2]),
        (30, 2, 31, [0, 1, 3, 2]),
        (30, 3, 34, [0, 1, 3, 2]),
        (31, 2, 32, [0, 1, 3, 2]),
        (32, 2, 33, [0, 1, 3, 2]),
        (33, 1, 49, [0, 1, 3, 2]),
        (33, 2, 34, [0, 1, 3, 2]),
        (34, 1, 56, [0, 1, 3, 2]),
        (35, 1, 54, [0, 1, 3, 2]),
        (35, 2, 36, [0, 1, 3, 2]),
        (35, 3, 39, [0, 1, 3, 2]),
        (36, 2, 37, [0, 1, 3, 2]),
        (37, 2, 38, [0, 1, 3, 2]),
        (38, 2, 39, [0, 1, 3, 2]),
        (39, 1, 55, [0, 1, 3, 2]),
        (40, 1, 58, [0, 1, 3, 2]),
        (40, 2, 41, [0, 1, 3, 2]),
        (40, 3, 44, [0, 1, 3, 2]),
        (41, 1, 47, [0, 1, 3, 2]),
        (41, 2, 42, [0, 1, 3, 2]),
        (42, 2, 43, [0, 1, 3, 2]),
        (43, 2, 44, [0, 1, 3, 2]),
        (44, 1, 51, [0, 1, 3, 2]),
        (45, 2, 46, [0, 1, 3, 2]),
        (45, 3, 49, [0, 1, 3, 2]),
        (46, 2, 47, [0, 1, 3, 2]),
        (47, 2, 48, [0, 1, 3, 2]),
        (48, 1, 57, [0, 1, 3, 2]),
        (48, 2, 49, [0, 1, 3, 2]),
        (50, 1, 59, [0, 1, 3, 2]),
        (50, 2, 51, [0, 1, 3, 2]),
        (50, 3, 54, [0, 1, 3, 2]),
        (51, 2, 52, [0, 1, 3, 2]),
        (52, 2, 53, [0, 1, 3, 2]),
        (53, 2, 54, [0, 1, 3, 2]),
        (55, 2, 56, [0, 1, 3, 2]),
        (55, 3, 59, [0, 1, 3, 2]),
        (56, 2, 57, [0, 1, 3, 2]),
        (57, 2, 58, [0, 1, 3, 2]),
        (58, 2, 59, [0, 1, 3, 2]),
    ])
}

/// The two-pentachoron 4-sphere: both pentachora glued along all five
/// facets by the identity.
pub fn s4_two_pentachora() -> Triangulation4 {
    Triangulation4::from_gluings(2, &[
        (0, 0, 1, [0, 1, 2, 3, 4]),
        (0, 1, 1, [0, 1, 2, 3, 4]),
        (0, 2, 1, [0, 1, 2, 3, 4]),
        (0, 3, 1, [0, 1, 2, 3, 4]),
        (0, 4, 1, [0, 1, 2, 3, 4]),
    ])
}

/// The complex projective plane on four pentachora.
pub fn cp2() -> Triangulation4 {
    Triangulation4::from_gluings(4, &[
        (0, 0, 0, [2, 3, 1, 0, 4]),
        (0, 1, 0, [0, 3, 2, 1, 4]),
        (0, 4, 1, [0, 1, 2, 3, 4]),
        (1, 0, 1, [2, 3, 1, 0, 4]),
        (1, 1, 2, [0, 1, 2, 3, 4]),
        (1, 3, 2, [1, 0, 3, 2, 4]),
        (2, 0, 2, [3, 1, 2, 0, 4]),
        (2, 4, 3, [0, 1, 2, 3, 4]),
        (3, 0, 3, [1, 0, 2, 3, 4]),
        (3, 2, 3, [0, 1, 3, 2, 4]),
    ])
}
