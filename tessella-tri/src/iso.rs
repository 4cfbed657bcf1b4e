//! Enumeration of combinatorial self-isomorphisms.
//!
//! An isomorphism is one germ per top-simplex: the image simplex and the
//! permutation of its vertex labels. For a connected triangulation the
//! whole isomorphism is determined by the image of simplex 0, so the
//! search seeds that image and propagates across gluings.

use log::debug;
use tessella::perm::Perm;
use crate::Triangulation;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Isomorphism<const V: usize> {
    pub germs: Vec<(usize, Perm<V>)>,
}

impl<const V: usize> Isomorphism<V> {
    pub fn simp_image(&self, s: usize) -> usize {
        self.germs[s].0
    }

    pub fn facet_perm(&self, s: usize) -> Perm<V> {
        self.germs[s].1
    }

    pub fn is_identity(&self) -> bool {
        self.germs.iter().enumerate()
            .all(|(s, &(t, p))| s == t && p == Perm::id())
    }
}

impl<const V: usize> Triangulation<V> {
    /// All self-isomorphisms. The triangulation must be connected.
    pub fn find_all_isomorphisms(&self) -> Vec<Isomorphism<V>> {
        assert!(self.is_connected());
        let n = self.size();
        let mut out = vec![];
        if n == 0 {
            return out
        }

        for t0 in 0..n {
            for p0 in Perm::<V>::all() {
                if let Some(iso) = self.propagate(t0, p0) {
                    out.push(iso);
                }
            }
        }
        debug!("{} self-isomorphisms found", out.len());
        out
    }

    fn propagate(&self, t0: usize, p0: Perm<V>) -> Option<Isomorphism<V>> {
        let n = self.size();
        let mut image: Vec<Option<(usize, Perm<V>)>> = vec![None; n];
        let mut used = vec![false; n];
        image[0] = Some((t0, p0));
        used[t0] = true;

        let mut queue = std::collections::VecDeque::from([0usize]);
        while let Some(s) = queue.pop_front() {
            let (ts, ps) = image[s].unwrap();
            for f in 0..V {
                match self.gluing(s, f) {
                    None => {
                        // boundary facets must map to boundary facets
                        if self.gluing(ts, ps[f]).is_some() {
                            return None
                        }
                    }
                    Some(&(s2, g)) => {
                        let Some(&(t2, g2)) = self.gluing(ts, ps[f]) else {
                            return None
                        };
                        // the square s -> s2, ts -> t2 must commute:
                        // sigma_{s2} = g2 ∘ sigma_s ∘ g⁻¹
                        let p2 = g2 * ps * g.inverse();
                        match image[s2] {
                            Some((u, q)) => {
                                if u != t2 || q != p2 {
                                    return None
                                }
                            }
                            None => {
                                if used[t2] {
                                    return None
                                }
                                image[s2] = Some((t2, p2));
                                used[t2] = true;
                                queue.push_back(s2);
                            }
                        }
                    }
                }
            }
        }

        let germs = image.into_iter().map(|g| g.unwrap()).collect();
        Some(Isomorphism { germs })
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures;

    #[test]
    fn one_tet_sphere_aut_order() {
        let t = fixtures::s3_one_tet();
        let isos = t.find_all_isomorphisms();
        assert_eq!(isos.len(), 12);
        assert_eq!(isos.iter().filter(|i| i.is_identity()).count(), 1);
    }

    #[test]
    fn figure_eight_auts() {
        let t = fixtures::figure_eight();
        let isos = t.find_all_isomorphisms();
        // the figure-eight complement's minimal triangulation has a
        // non-trivial symmetry group
        assert!(isos.len() > 1);
        assert!(isos.len() % 2 == 0);
        assert_eq!(isos.iter().filter(|i| i.is_identity()).count(), 1);
    }

    #[test]
    fn identity_always_found() {
        let t = fixtures::lens_5_1();
        let isos = t.find_all_isomorphisms();
        assert!(isos.iter().any(|i| i.is_identity()));
    }
}
