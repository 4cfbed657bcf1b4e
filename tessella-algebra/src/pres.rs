use tessella::{Integer, IntOps};
use tessella_matrix::{Mat, MatType};
use crate::AbelianGroup;

/// A word in the free group: a list of (generator, exponent) syllables with
/// non-zero exponents and no two adjacent syllables on the same generator.
pub type Word = Vec<(usize, i64)>;

/// A finite group presentation. Simplification is a conservative Tietze
/// reduction: it never changes the group, only the presentation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPresentation {
    n_gens: usize,
    relators: Vec<Word>,
}

fn free_reduce(word: &[(usize, i64)]) -> Word {
    let mut out: Word = vec![];
    for &(g, e) in word {
        if e == 0 { continue }
        match out.last_mut() {
            Some((h, f)) if *h == g => {
                *f += e;
                if *f == 0 {
                    out.pop();
                }
            }
            _ => out.push((g, e)),
        }
    }
    out
}

fn cyclic_reduce(mut word: Word) -> Word {
    loop {
        let n = word.len();
        if n >= 2 {
            let (g0, e0) = word[0];
            let (g1, e1) = word[n - 1];
            if g0 == g1 {
                let e = e0 + e1;
                word.remove(n - 1);
                word.remove(0);
                if e != 0 {
                    word.insert(0, (g0, e));
                }
                word = free_reduce(&word);
                continue
            }
        }
        return word
    }
}

impl GroupPresentation {
    pub fn new(n_gens: usize, relators: Vec<Word>) -> Self {
        let relators = relators.into_iter()
            .map(|w| cyclic_reduce(free_reduce(&w)))
            .filter(|w| !w.is_empty())
            .collect();
        Self { n_gens, relators }
    }

    pub fn trivial() -> Self {
        Self { n_gens: 0, relators: vec![] }
    }

    pub fn count_generators(&self) -> usize {
        self.n_gens
    }

    pub fn relators(&self) -> &[Word] {
        &self.relators
    }

    /// Exponent-sum matrix: one column per relator, one row per generator.
    pub fn relation_matrix<R>(&self) -> Mat<R>
    where R: Integer, for<'x> &'x R: IntOps<R> {
        let mut m = Mat::zero((self.n_gens, self.relators.len()));
        for (j, w) in self.relators.iter().enumerate() {
            for &(g, e) in w {
                m[(g, j)] = &m[(g, j)] + &R::from_i64(e);
            }
        }
        m
    }

    pub fn abelianization<R>(&self) -> AbelianGroup<R>
    where R: Integer, for<'x> &'x R: IntOps<R> {
        AbelianGroup::from_presentation(self.relation_matrix())
    }

    /// Conservative Tietze simplification: free and cyclic reduction,
    /// removal of duplicate relators, elimination of generators that a
    /// length-one relator kills or a two-syllable relator expresses in
    /// terms of another generator.
    pub fn simplify(&mut self) {
        loop {
            self.relators = self.relators.iter()
                .map(|w| cyclic_reduce(free_reduce(w)))
                .filter(|w| !w.is_empty())
                .collect();
            self.relators.sort();
            self.relators.dedup();

            // a relator g^{±1} makes g trivial
            if let Some(g) = self.relators.iter().find_map(|w| {
                match w.as_slice() {
                    &[(g, e)] if e.abs() == 1 => Some(g),
                    _ => None,
                }
            }) {
                self.kill_generator(g);
                continue
            }

            // a relator g^{±1} h^{∓1} identifies g with h;
            // a relator g^{±1} h^{±1} identifies g with h^{-1}
            if let Some((g, h, flip)) = self.relators.iter().find_map(|w| {
                match w.as_slice() {
                    &[(g, eg), (h, eh)] if eg.abs() == 1 && eh.abs() == 1 => {
                        Some((g, h, eg == eh))
                    }
                    _ => None,
                }
            }) {
                self.substitute(g, h, flip);
                continue
            }

            return
        }
    }

    fn kill_generator(&mut self, g: usize) {
        for w in self.relators.iter_mut() {
            w.retain(|&(h, _)| h != g);
        }
        self.renumber_without(g);
    }

    /// Replaces `g` by `h` (or `h^{-1}` when `flip`) and removes `g`.
    fn substitute(&mut self, g: usize, h: usize, flip: bool) {
        debug_assert_ne!(g, h);
        for w in self.relators.iter_mut() {
            for t in w.iter_mut() {
                if t.0 == g {
                    t.0 = h;
                    if flip {
                        t.1 = -t.1;
                    }
                }
            }
        }
        self.renumber_without(g);
    }

    fn renumber_without(&mut self, g: usize) {
        for w in self.relators.iter_mut() {
            for t in w.iter_mut() {
                debug_assert_ne!(t.0, g);
                if t.0 > g {
                    t.0 -= 1;
                }
            }
        }
        self.n_gens -= 1;
    }
}

impl std::fmt::Display for GroupPresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "< {} generators | {} relators >",
            self.n_gens, self.relators.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_reduction() {
        let w = free_reduce(&[(0, 1), (1, 1), (1, -1), (0, 2)]);
        assert_eq!(w, vec![(0, 3)]);
    }

    #[test]
    fn cyclic_reduction() {
        let w = cyclic_reduce(free_reduce(&[(0, 1), (1, 2), (0, -1)]));
        assert_eq!(w, vec![(1, 2)]);
    }

    #[test]
    fn trivial_generator() {
        // < a, b | a, b^3 a > simplifies to < b | b^3 >
        let mut p = GroupPresentation::new(2, vec![
            vec![(0, 1)],
            vec![(1, 3), (0, 1)],
        ]);
        p.simplify();
        assert_eq!(p.count_generators(), 1);
        assert_eq!(p.relators(), &[vec![(0, 3)]]);
    }

    #[test]
    fn identify_generators() {
        // < a, b | a b^{-1} > is infinite cyclic
        let mut p = GroupPresentation::new(2, vec![
            vec![(0, 1), (1, -1)],
        ]);
        p.simplify();
        assert_eq!(p.count_generators(), 1);
        assert!(p.relators().is_empty());
    }

    #[test]
    fn abelianization() {
        // < a, b | a^2, b^3 > -> Z_2 + Z_3 = Z_6
        let p = GroupPresentation::new(2, vec![
            vec![(0, 2)],
            vec![(1, 3)],
        ]);
        let ab: AbelianGroup<i64> = p.abelianization();
        assert_eq!(ab.rank(), 0);
        assert_eq!(ab.invariant_factors(), &[6]);
    }

    #[test]
    fn simplification_preserves_abelianization() {
        let mut p = GroupPresentation::new(3, vec![
            vec![(0, 1), (1, -1)],
            vec![(1, 5)],
            vec![(2, 1)],
        ]);
        let before: AbelianGroup<i64> = p.abelianization();
        p.simplify();
        let after: AbelianGroup<i64> = p.abelianization();
        assert_eq!(before, after);
        assert_eq!(p.count_generators(), 1);
    }
}
