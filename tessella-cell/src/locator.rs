//! Value-typed keys for the façade's caches.

/// The cell decompositions ("coordinate systems") of a triangulated
/// manifold. The first five are implemented; the remaining four are
/// reserved and all chain-complex queries on them answer `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Coords {
    /// The triangulation itself, augmented with ideal cells.
    Std,
    /// The dual polyhedral decomposition: dual k-cells are the interior
    /// (n-k)-faces.
    Dual,
    /// The barycentric common refinement of `Std` and `Dual`.
    Mix,
    /// `Std` restricted to the boundary, ideal cells included.
    StdBdry,
    /// `Std` with the boundary thrown away.
    StdRelBdry,
    /// Reserved: barycentric subdivision of the boundary.
    MixBdry,
    /// Reserved: `Mix` rel boundary.
    MixRelBdry,
    /// Reserved: dual decomposition of the boundary.
    DualBdry,
    /// Reserved: dual decomposition rel boundary.
    DualRelBdry,
}

impl Coords {
    pub fn is_implemented(self) -> bool {
        matches!(self,
            Coords::Std | Coords::Dual | Coords::Mix
            | Coords::StdBdry | Coords::StdRelBdry)
    }

    /// Decompositions of the boundary have top dimension one less than
    /// the manifold.
    pub fn is_boundary_type(self) -> bool {
        matches!(self,
            Coords::StdBdry | Coords::MixBdry | Coords::DualBdry)
    }
}

/// Homology or cohomology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variance {
    Covariant,
    Contravariant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormType {
    Evaluation,
    Intersection,
    TorsionLinking,
    CupProduct,
}

/// Identifies one stage of one chain complex: the matrix
/// `∂: C_dim -> C_{dim-1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainComplexLocator {
    pub dim: usize,
    pub coords: Coords,
}

impl ChainComplexLocator {
    pub fn new(dim: usize, coords: Coords) -> Self {
        Self { dim, coords }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChainMapLocator {
    pub domain: ChainComplexLocator,
    pub range: ChainComplexLocator,
}

impl ChainMapLocator {
    pub fn new(domain: ChainComplexLocator, range: ChainComplexLocator) -> Self {
        Self { domain, range }
    }
}

/// Identifies a (co)homology group: dimension, variance, coordinate
/// system and coefficient modulus (`0` = integer coefficients).
///
/// The ordering is lexicographic on (variance, dim, coef, coords).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GroupLocator {
    pub dim: usize,
    pub variance: Variance,
    pub coords: Coords,
    pub coef: u64,
}

impl GroupLocator {
    pub fn new(dim: usize, variance: Variance, coords: Coords, coef: u64) -> Self {
        Self { dim, variance, coords, coef }
    }

    fn key(&self) -> (Variance, usize, u64, Coords) {
        (self.variance, self.dim, self.coef, self.coords)
    }
}

impl PartialOrd for GroupLocator {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupLocator {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HomLocator {
    pub domain: GroupLocator,
    pub range: GroupLocator,
}

impl HomLocator {
    pub fn new(domain: GroupLocator, range: GroupLocator) -> Self {
        Self { domain, range }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FormLocator {
    pub form_type: FormType,
    pub left: GroupLocator,
    pub right: GroupLocator,
}

impl FormLocator {
    pub fn new(form_type: FormType, left: GroupLocator, right: GroupLocator) -> Self {
        Self { form_type, left, right }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_locator_order() {
        use Coords::*;
        use Variance::*;
        let a = GroupLocator::new(0, Covariant, Dual, 0);
        let b = GroupLocator::new(1, Covariant, Std, 0);
        let c = GroupLocator::new(0, Contravariant, Std, 0);
        let d = GroupLocator::new(0, Covariant, Std, 2);
        // variance dominates, then dimension, then coefficient
        assert!(a < b);
        assert!(b < c);
        assert!(a < d);
        assert!(d < b);
    }

    #[test]
    fn implemented_coords() {
        assert!(Coords::Std.is_implemented());
        assert!(Coords::StdRelBdry.is_implemented());
        assert!(!Coords::MixBdry.is_implemented());
        assert!(Coords::StdBdry.is_boundary_type());
        assert!(!Coords::StdRelBdry.is_boundary_type());
    }
}
