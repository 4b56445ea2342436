//! Integration tests for seeding: placement order and strong-vs-weak pairing.

use maze_tournament::{bracket_rounds, seed_order, seeded, sort_ranks, TournamentError};

#[test]
fn seed_order_small_sizes() {
    assert_eq!(seed_order(0), vec![0]);
    assert_eq!(seed_order(1), vec![0, 1]);
    assert_eq!(seed_order(2), vec![0, 3, 1, 2]);
    assert_eq!(seed_order(3), vec![0, 7, 3, 4, 1, 6, 2, 5]);
    assert_eq!(
        seed_order(4),
        vec![0, 15, 7, 8, 3, 12, 4, 11, 1, 14, 6, 9, 2, 13, 5, 10]
    );
}

#[test]
fn seed_order_is_a_permutation() {
    for m in 0..=6 {
        let mut order = seed_order(m);
        order.sort_unstable();
        assert_eq!(order, (0..1usize << m).collect::<Vec<_>>(), "m = {}", m);
    }
}

#[test]
fn strongest_meets_weakest_in_every_round() {
    for m in 1..=5u32 {
        let mut round = seed_order(m);
        let mut size = round.len();
        while size > 1 {
            for pair in round.chunks(2) {
                assert_eq!(pair[0] + pair[1], size - 1, "m = {}, {:?}", m, round);
            }
            // Lower seed always wins.
            round = round.chunks(2).map(|p| p[0].min(p[1])).collect();
            size /= 2;
        }
    }
}

#[test]
fn seeded_reorders_ranked_list() {
    let ranked = ["a", "b", "c", "d"];
    assert_eq!(seeded(&ranked).unwrap(), vec!["a", "d", "b", "c"]);
}

#[test]
fn bracket_rounds_accepts_powers_of_two_up_to_16() {
    assert_eq!(bracket_rounds(2).unwrap(), 1);
    assert_eq!(bracket_rounds(4).unwrap(), 2);
    assert_eq!(bracket_rounds(8).unwrap(), 3);
    assert_eq!(bracket_rounds(16).unwrap(), 4);
    assert_eq!(bracket_rounds(0), Err(TournamentError::EmptyTeamList));
    for count in [1, 3, 6, 12, 32] {
        assert_eq!(
            bracket_rounds(count),
            Err(TournamentError::InvalidParticipantCount { count })
        );
    }
}

#[test]
fn sort_ranks_pairs_best_with_worst() {
    let pairing = sort_ranks((1..=6).collect(), false);
    assert_eq!(pairing.pairs, vec![(1, 6), (2, 5), (3, 4)]);
    assert_eq!(pairing.remainder, None);
    assert_eq!(pairing.bonus, None);
}

#[test]
fn sort_ranks_odd_count_leaves_remainder() {
    let pairing = sort_ranks((1..=5).collect(), false);
    assert_eq!(pairing.pairs, vec![(1, 4), (2, 3)]);
    assert_eq!(pairing.remainder, Some(5));
    assert_eq!(pairing.clone().into_order(), vec![1, 4, 2, 3, 5]);
}

#[test]
fn sort_ranks_bonus_match_holds_back_worst_team() {
    let pairing = sort_ranks((1..=6).collect(), true);
    assert_eq!(pairing.bonus, Some(6));
    assert_eq!(pairing.remainder, Some(5));
    assert_eq!(pairing.pairs, vec![(1, 4), (2, 3)]);
    assert_eq!(pairing.into_order(), vec![1, 4, 2, 3, 5, 6]);
}

#[test]
fn sort_ranks_single_team() {
    let pairing = sort_ranks(vec![7], true);
    assert!(pairing.pairs.is_empty());
    assert_eq!(pairing.remainder, Some(7));
    assert_eq!(pairing.bonus, None);
}

#[test]
#[should_panic(expected = "seed order")]
fn seed_order_rejects_exponents_past_usize() {
    seed_order(usize::BITS);
}
