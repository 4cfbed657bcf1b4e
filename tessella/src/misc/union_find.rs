use itertools::Itertools;

pub struct UnionFind {
    p: Vec<usize>
}

impl UnionFind {
    pub fn new(n: usize) -> Self {
        Self { p: (0..n).collect() }
    }

    pub fn extend(&mut self, l: usize) {
        let n = self.p.len();
        self.p.extend(n .. n + l);
    }

    pub fn size(&self) -> usize {
        self.p.len()
    }

    pub fn root(&self, i: usize) -> usize {
        let p = self.p[i];
        if p == i {
            i
        } else {
            self.root(p)
        }
    }

    pub fn is_same(&self, i: usize, j: usize) -> bool {
        self.root(i) == self.root(j)
    }

    pub fn union(&mut self, i: usize, j: usize) {
        use std::cmp::Ordering::*;
        let ri = self.root(i);
        let rj = self.root(j);

        match usize::cmp(&ri, &rj) {
            Less    => self.p[rj] = ri,
            Equal   => (),
            Greater => self.p[ri] = rj,
        }
    }

    pub fn group(&self) -> Vec<Vec<usize>> {
        let n = self.size();
        (0..n).into_group_map_by(|&i| self.root(i))
            .into_iter()
            .sorted_by_key(|&(i, _)| i)
            .map(|(_, l)| l)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union() {
        let mut u = UnionFind::new(5);
        u.union(0, 2);
        u.union(3, 4);

        assert!( u.is_same(0, 2));
        assert!(!u.is_same(0, 1));
        assert!( u.is_same(3, 4));
        assert_eq!(u.group(), vec![vec![0, 2], vec![1], vec![3, 4]]);
    }
}
