//! Draw selection and reveal sequencing.
//!
//! The real selection is [`select_winner`] -- one uniform pick over the
//! eligible set. [`DrawEngine`] wraps it in the animated reveal, which is
//! presentation only and cannot disagree with the pick.

pub mod engine;

pub use engine::{DrawEngine, DrawPacing, DrawState};

use rand::Rng;

use crate::model::Member;

/// Uniform random selection over the eligible set. `None` when empty.
///
/// This is the only place a winner is decided; everything downstream is
/// told the result.
pub fn select_winner<'a, R: Rng + ?Sized>(
    eligible: &'a [Member],
    rng: &mut R,
) -> Option<&'a Member> {
    select_winner_index(eligible.len(), rng).map(|i| &eligible[i])
}

/// Index form of [`select_winner`], shared with the reveal engine.
pub(crate) fn select_winner_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(rng.gen_range(0..len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Role, User};
    use rand::SeedableRng;
    use rand_pcg::Mcg128Xsl64;

    fn members(n: usize) -> Vec<Member> {
        (0..n)
            .map(|i| {
                Member::from_user(&User {
                    id: format!("user-{i}"),
                    name: format!("Member {i}"),
                    mobile: String::new(),
                    role: Role::Member,
                })
            })
            .collect()
    }

    #[test]
    fn empty_set_has_no_winner() {
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        assert!(select_winner(&[], &mut rng).is_none());
    }

    #[test]
    fn single_candidate_always_wins() {
        let pool = members(1);
        let mut rng = Mcg128Xsl64::seed_from_u64(1);
        for _ in 0..10 {
            assert_eq!(select_winner(&pool, &mut rng).unwrap().user_id, "user-0");
        }
    }

    #[test]
    fn every_candidate_is_reachable() {
        let pool = members(4);
        let mut rng = Mcg128Xsl64::seed_from_u64(7);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(select_winner(&pool, &mut rng).unwrap().user_id.clone());
        }
        assert_eq!(seen.len(), 4);
    }
}
