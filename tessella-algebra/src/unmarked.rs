use tessella::{Integer, IntOps};
use tessella_matrix::{Mat, MatType};
use crate::MarkedAbelianGroup;

/// A finitely generated abelian group recorded only up to isomorphism:
/// free rank plus invariant factors `d_1 | d_2 | ... | d_k`, each `> 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    rank: usize,
    inv_fac: Vec<R>,
}

impl<R> AbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    /// Homology `ker m / im n` of one chain-complex stage.
    pub fn new(m: Mat<R>, n: Mat<R>) -> Self {
        MarkedAbelianGroup::new(m, n).into()
    }

    pub fn with_coef(m: Mat<R>, n: Mat<R>, coef: R) -> Self {
        MarkedAbelianGroup::with_coef(m, n, coef).into()
    }

    /// The cokernel `Z^k / im rel` of a relation matrix (`k` = rows).
    pub fn from_presentation(rel: Mat<R>) -> Self {
        let m = Mat::zero((1, rel.nrows()));
        MarkedAbelianGroup::new(m, rel).into()
    }

    pub fn free(rank: usize) -> Self {
        Self { rank, inv_fac: vec![] }
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn invariant_factors(&self) -> &[R] {
        &self.inv_fac
    }

    pub fn count_invariant_factors(&self) -> usize {
        self.inv_fac.len()
    }

    pub fn invariant_factor(&self, i: usize) -> &R {
        &self.inv_fac[i]
    }

    pub fn is_trivial(&self) -> bool {
        self.rank == 0 && self.inv_fac.is_empty()
    }

    pub fn is_z(&self) -> bool {
        self.rank == 1 && self.inv_fac.is_empty()
    }

    /// Number of invariant factors divisible by `d`.
    pub fn torsion_rank(&self, d: &R) -> usize {
        self.inv_fac.iter().filter(|f| d.divides(f)).count()
    }
}

impl<R> From<MarkedAbelianGroup<R>> for AbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    fn from(g: MarkedAbelianGroup<R>) -> Self {
        Self {
            rank: g.rank(),
            inv_fac: g.invariant_factors().to_vec(),
        }
    }
}

impl<R> std::fmt::Display for AbelianGroup<R>
where R: Integer, for<'x> &'x R: IntOps<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", tessella::util::group_symbol(self.rank, &self.inv_fac))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_presentation() {
        let g = AbelianGroup::from_presentation(Mat::<i64>::from_data((2, 2), [2, 0, 0, 0]));
        assert_eq!(g.rank(), 1);
        assert_eq!(g.invariant_factors(), &[2]);
        assert_eq!(g.to_string(), "Z + Z_2");
    }

    #[test]
    fn torsion_rank() {
        let g = AbelianGroup::from_presentation(
            Mat::diag((3, 3), [2i64, 4, 3].into_iter()));
        assert_eq!(g.torsion_rank(&2), 2);
        assert_eq!(g.torsion_rank(&3), 1);
        assert_eq!(g.rank(), 0);
    }

    #[test]
    fn mod_two_homology() {
        // Z --2--> Z with Z_2 coefficients has H = Z_2 at both ends
        let m: Mat<i64> = Mat::from_data((1, 1), [2]);
        let n = Mat::zero((1, 1));
        let g = AbelianGroup::with_coef(m, n, 2);
        assert_eq!(g.rank(), 0);
        assert_eq!(g.invariant_factors(), &[2]);
    }
}
