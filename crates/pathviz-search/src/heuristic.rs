use crate::pos::Pos;

/// Manhattan (L1) distance between two positions.
///
/// Admissible and consistent for 4-connected unit-cost grids.
#[inline]
pub fn manhattan(a: Pos, b: Pos) -> u32 {
    a.row.abs_diff(b.row) + a.col.abs_diff(b.col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_and_zero_on_self() {
        let a = Pos::new(0, 0);
        let b = Pos::new(4, -3);
        assert_eq!(manhattan(a, b), 7);
        assert_eq!(manhattan(b, a), 7);
        assert_eq!(manhattan(b, b), 0);
    }

    #[test]
    fn consistent_across_neighbors() {
        let goal = Pos::new(5, 2);
        for r in 0..8 {
            for c in 0..8 {
                let p = Pos::new(r, c);
                for n in p.neighbors_4() {
                    assert!(manhattan(p, goal) <= 1 + manhattan(n, goal));
                }
            }
        }
    }
}
