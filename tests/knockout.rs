//! Integration tests for the knockout: layout, dependency resolution and replays.

use maze_tournament::{
    prepare_knockout_matches, KnockoutStage, Match, MatchKey, MatchResult, Roster, StageKind,
    Team, TeamId, TournamentError, TournamentStage, DEFAULT_NUM_REPLAYS,
};
use serde_json::{json, Value};

/// Lower id wins.
fn favourite(game: &Match) -> MatchResult {
    let (blue, red) = game.teams().unwrap();
    if blue < red {
        MatchResult::Blue
    } else {
        MatchResult::Red
    }
}

#[test]
fn four_teams_give_two_semis_and_a_final() {
    let matches = prepare_knockout_matches(&[0, 1, 2, 3]).unwrap();
    assert_eq!(matches.len(), 3);
    assert_eq!(matches[0].key(), MatchKey::new(0, 0));
    assert_eq!(matches[0].opponents, [Some(0), Some(3)]);
    assert_eq!(matches[1].key(), MatchKey::new(0, 1));
    assert_eq!(matches[1].opponents, [Some(1), Some(2)]);
    assert_eq!(matches[2].key(), MatchKey::new(1, 0));
    assert_eq!(matches[2].opponents, [None, None]);
    assert!(matches.iter().all(|m| m.stage == StageKind::Knockout));
}

#[test]
fn round_sizes_halve_toward_the_final() {
    let teams: Vec<TeamId> = (0..16).collect();
    let matches = prepare_knockout_matches(&teams).unwrap();
    assert_eq!(matches.len(), 15);
    for (round, expected) in [(0, 8), (1, 4), (2, 2), (3, 1)] {
        assert_eq!(matches.iter().filter(|m| m.round == round).count(), expected);
    }
}

#[test]
fn unsupported_sizes_are_rejected() {
    assert_eq!(
        prepare_knockout_matches(&[1, 2, 3]),
        Err(TournamentError::InvalidParticipantCount { count: 3 })
    );
    assert_eq!(
        prepare_knockout_matches(&[]),
        Err(TournamentError::EmptyTeamList)
    );
    let teams: Vec<TeamId> = (0..32).collect();
    assert!(matches!(
        KnockoutStage::new(teams),
        Err(TournamentError::InvalidParticipantCount { count: 32 })
    ));
}

#[test]
fn final_waits_for_both_semis() {
    let mut stage = KnockoutStage::new(vec![0, 1, 2, 3]).unwrap();
    assert_eq!(stage.num_rounds(), 2);

    let first = stage.get_next().unwrap().unwrap();
    assert_eq!(first, MatchKey::new(0, 0));
    stage.record_result(first, MatchResult::Red, Value::Null).unwrap();

    // Semi 1 is next, not the half-resolved final.
    assert_eq!(stage.get_next().unwrap(), Some(MatchKey::new(0, 1)));
    assert_eq!(
        stage
            .record_result(MatchKey::new(1, 0), MatchResult::Blue, Value::Null)
            .unwrap_err(),
        TournamentError::MatchNotReady {
            round: 1,
            match_id: 0
        }
    );

    stage
        .record_result(MatchKey::new(0, 1), MatchResult::Blue, Value::Null)
        .unwrap();
    assert_eq!(stage.get_next().unwrap(), Some(MatchKey::new(1, 0)));
    assert_eq!(stage.final_match().unwrap().opponents, [Some(3), Some(1)]);

    stage
        .record_result(MatchKey::new(1, 0), MatchResult::Red, Value::Null)
        .unwrap();
    assert!(stage.is_complete());
    assert_eq!(stage.champion(), Some(1));
    assert_eq!(stage.runner_up(), Some(3));
    assert_eq!(stage.get_next().unwrap(), None);
    assert!(!stage.has_next());
}

#[test]
fn get_next_only_returns_ready_matches() {
    let teams: Vec<TeamId> = (0..16).collect();
    let mut stage = KnockoutStage::new(teams).unwrap();
    let mut played = 0;
    while let Some(key) = stage.get_next().unwrap() {
        let game = stage.book().get(key).unwrap().clone();
        assert!(game.is_ready(), "{:?}", game);
        assert!(game.winner.is_none());
        stage.record_result(key, favourite(&game), Value::Null).unwrap();
        played += 1;
    }
    assert_eq!(played, 15);
    assert_eq!(stage.champion(), Some(0));
    assert_eq!(stage.runner_up(), Some(1));
    assert!(stage.matches().iter().all(Match::is_ready));
}

#[test]
fn draw_is_replayed_until_decided() {
    let mut stage = KnockoutStage::new(vec![7, 8]).unwrap();
    let key = MatchKey::new(0, 0);

    let game = stage
        .record_result(key, MatchResult::Draw, json!({ "turns": 100 }))
        .unwrap();
    assert_eq!(game.winner, None);
    assert_eq!(stage.get_next().unwrap(), Some(key));

    stage.record_result(key, MatchResult::Red, json!({ "turns": 42 })).unwrap();
    assert_eq!(stage.champion(), Some(8));

    let games: Vec<_> = stage.book().games_for(key).collect();
    assert_eq!(games.len(), 2);
    assert_eq!(games[0].winner, MatchResult::Draw);
    assert_eq!(games[1].final_state, json!({ "turns": 42 }));
    assert_eq!(games[1].opponents, [7, 8]);
    assert_ne!(games[0].id, games[1].id);
}

#[test]
fn replay_limit_stops_endless_draws() {
    let mut stage = KnockoutStage::new(vec![7, 8]).unwrap().with_num_replays(2);
    let key = MatchKey::new(0, 0);
    let limit = TournamentError::ReplayLimitExceeded {
        round: 0,
        match_id: 0,
        limit: 2,
    };

    stage.record_result(key, MatchResult::Draw, Value::Null).unwrap();
    assert_eq!(
        stage.record_result(key, MatchResult::Draw, Value::Null).unwrap_err(),
        limit
    );
    assert_eq!(stage.book().games_for(key).count(), 2);
    assert_eq!(
        stage.record_result(key, MatchResult::Blue, Value::Null).unwrap_err(),
        limit
    );
    assert_eq!(stage.book().games_for(key).count(), 2);
    assert!(!stage.is_complete());
}

#[test]
fn default_replay_cap() {
    let stage = KnockoutStage::new(vec![1, 2]).unwrap();
    assert_eq!(stage.book().num_replays(), DEFAULT_NUM_REPLAYS);
    assert!(!stage.book().draw_allowed());
}

#[test]
fn decided_match_rejects_another_result() {
    let mut stage = KnockoutStage::new(vec![1, 2]).unwrap();
    let key = MatchKey::new(0, 0);
    stage.record_result(key, MatchResult::Blue, Value::Null).unwrap();
    assert_eq!(
        stage.record_result(key, MatchResult::Blue, Value::Null).unwrap_err(),
        TournamentError::DuplicateResult {
            round: 0,
            match_id: 0
        }
    );
}

#[test]
fn missing_parent_match_is_reported() {
    let mut matches = prepare_knockout_matches(&[1, 2, 3, 4]).unwrap();
    matches.remove(0);
    let mut stage = KnockoutStage::from_matches(StageKind::Knockout, vec![1, 2, 3, 4], matches);

    let key = stage.get_next().unwrap().unwrap();
    assert_eq!(key, MatchKey::new(0, 1));
    stage.record_result(key, MatchResult::Blue, Value::Null).unwrap();
    assert_eq!(
        stage.get_next(),
        Err(TournamentError::MissingParentMatch {
            round: 1,
            match_id: 0,
            slot: 0
        })
    );
}

#[test]
fn play_next_counts_games_for_both_teams() {
    let mut roster = Roster::numbered(2).unwrap();
    let mut stage = KnockoutStage::new(roster.ids()).unwrap();
    let mut calls = 0;
    let mut player = |_: &Match, _: &Team, _: &Team| {
        calls += 1;
        let result = if calls < 3 {
            MatchResult::Draw
        } else {
            MatchResult::Blue
        };
        (result, Value::Null)
    };

    let key = MatchKey::new(0, 0);
    assert_eq!(stage.play_next(&mut roster, &mut player).unwrap(), Some(key));
    assert_eq!(stage.play_next(&mut roster, &mut player).unwrap(), Some(key));
    assert_eq!(stage.play_next(&mut roster, &mut player).unwrap(), Some(key));
    assert_eq!(stage.play_next(&mut roster, &mut player).unwrap(), None);

    assert_eq!(stage.champion(), Some(0));
    for team in roster.teams() {
        assert_eq!(team.matches_played, 3);
    }
}

#[test]
fn exhausted_match_is_not_played_again() {
    let mut roster = Roster::numbered(2).unwrap();
    let mut stage = KnockoutStage::new(roster.ids()).unwrap().with_num_replays(2);
    let mut calls = 0;
    let mut player = |_: &Match, _: &Team, _: &Team| {
        calls += 1;
        let result = if calls <= 2 {
            MatchResult::Draw
        } else {
            MatchResult::Blue
        };
        (result, Value::Null)
    };
    let limit = TournamentError::ReplayLimitExceeded {
        round: 0,
        match_id: 0,
        limit: 2,
    };

    assert_eq!(stage.play_next(&mut roster, &mut player).unwrap(), Some(MatchKey::new(0, 0)));
    assert_eq!(stage.play_next(&mut roster, &mut player).unwrap_err(), limit);
    assert_eq!(stage.play_next(&mut roster, &mut player).unwrap_err(), limit);

    assert_eq!(calls, 2);
    assert_eq!(stage.book().games().len(), 2);
    for team in roster.teams() {
        assert_eq!(team.matches_played, 2);
    }
    assert!(!stage.is_complete());
}

#[test]
fn zero_replays_still_allows_one_game() {
    let stage = KnockoutStage::new(vec![1, 2]).unwrap().with_num_replays(0);
    assert_eq!(stage.book().num_replays(), 1);
}
