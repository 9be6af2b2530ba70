mod common;

use common::{parties, parties_with_candidate_votes};
use tally_core::{RandomTieBreaker, ScriptedTieBreaker, TieContext};
use tally_opl::OpenPartyList;

fn seats(outcome: &tally_opl::OplOutcome) -> Vec<usize> {
    outcome.parties.iter().map(|row| row.total_seats).collect()
}

#[test]
fn quota_phase_splits_seats_and_remainders() {
    let engine = OpenPartyList::new(5520, 3, parties(&[3, 3], &[3000, 2520])).unwrap();
    assert_eq!(engine.quota(), 1840);
    let outcome = engine.run(&mut ScriptedTieBreaker::default()).unwrap();

    let row = &outcome.parties[0];
    assert_eq!(row.first_allocation, 1);
    assert_eq!(row.remaining_votes, 1160);
    let other = &outcome.parties[1];
    assert_eq!(other.first_allocation, 1);
    assert_eq!(other.remaining_votes, 680);
    assert_eq!(seats(&outcome), vec![2, 1]);
    assert!(outcome.all_seats_filled());
}

#[test]
fn largest_remainder_takes_the_last_seat() {
    let outcome = OpenPartyList::new(9500, 5, parties(&[3, 2, 6, 2], &[2000, 3000, 4000, 500]))
        .unwrap()
        .run(&mut ScriptedTieBreaker::default())
        .unwrap();
    assert_eq!(outcome.quota, 1900);
    let first: Vec<usize> = outcome.parties.iter().map(|r| r.first_allocation).collect();
    assert_eq!(first, vec![1, 1, 2, 0]);
    assert_eq!(seats(&outcome), vec![1, 2, 2, 0]);
    assert_eq!(outcome.parties[1].second_allocation, 1);
}

#[test]
fn remainders_fill_seats_left_by_small_quotas() {
    let outcome = OpenPartyList::new(9100, 3, parties(&[3, 2, 6, 2], &[2000, 3000, 4000, 100]))
        .unwrap()
        .run(&mut ScriptedTieBreaker::default())
        .unwrap();
    let first: Vec<usize> = outcome.parties.iter().map(|r| r.first_allocation).collect();
    assert_eq!(first, vec![0, 0, 1, 0]);
    assert_eq!(seats(&outcome), vec![1, 1, 1, 0]);
}

#[test]
fn more_seats_than_candidates_leaves_seats_unfilled() {
    let outcome = OpenPartyList::new(
        9500,
        11,
        parties_with_candidate_votes(&[
            &[1200, 500, 300],
            &[2000, 1000],
            &[500, 1000, 2500],
            &[300, 200],
        ]),
    )
    .unwrap()
    .run(&mut ScriptedTieBreaker::default())
    .unwrap();

    assert_eq!(outcome.quota, 863);
    assert_eq!(seats(&outcome), vec![3, 2, 3, 2]);
    assert_eq!(outcome.unfilled_seats, 1);
    assert!(!outcome.all_seats_filled());
    assert_eq!(outcome.winners.len(), 10);
    assert!(outcome
        .record
        .notes()
        .iter()
        .any(|note| note.starts_with("Not all seats have been distributed")));
}

#[test]
fn more_seats_than_ballots_assigns_every_seat_by_remainder() {
    let engine = OpenPartyList::new(3, 5, parties_with_candidate_votes(&[&[2, 0, 0], &[1, 0]]))
        .unwrap();
    assert_eq!(engine.quota(), 0);
    let outcome = engine.run(&mut ScriptedTieBreaker::default()).unwrap();

    let first: Vec<usize> = outcome.parties.iter().map(|r| r.first_allocation).collect();
    assert_eq!(first, vec![0, 0]);
    let remaining: Vec<u64> = outcome.parties.iter().map(|r| r.remaining_votes).collect();
    assert_eq!(remaining, vec![2, 1]);
    let second: Vec<usize> = outcome.parties.iter().map(|r| r.second_allocation).collect();
    assert_eq!(second, vec![3, 2]);
    assert_eq!(seats(&outcome), vec![3, 2]);
    assert!(outcome.all_seats_filled());
    assert_eq!(outcome.winners.len(), 5);
    assert!(outcome
        .record
        .notes()
        .iter()
        .any(|note| note == "Quota is zero; every seat is assigned by remaining votes."));
}

#[test]
fn single_party_seats_its_whole_list() {
    let outcome = OpenPartyList::new(2011, 4, parties_with_candidate_votes(&[&[1000, 1000, 10, 1]]))
        .unwrap()
        .run(&mut ScriptedTieBreaker::default())
        .unwrap();
    assert_eq!(outcome.seats_for("P0"), Some(4));
    assert_eq!(outcome.winners.len(), 4);
    assert!(outcome.record.ties().is_empty());
}

#[test]
fn equal_remainders_are_drawn() {
    let mut oracle = ScriptedTieBreaker::new([2]);
    let outcome = OpenPartyList::new(300, 1, parties(&[1, 1, 1], &[100, 100, 100]))
        .unwrap()
        .run(&mut oracle)
        .unwrap();
    assert_eq!(oracle.requests(), &[3]);
    assert_eq!(seats(&outcome), vec![0, 0, 1]);
    let tie = &outcome.record.ties()[0];
    assert_eq!(tie.context, TieContext::OplRemainder);
    assert_eq!(tie.tied, vec!["P0", "P1", "P2"]);
    assert_eq!(
        tie.narrative(),
        "P0, P1, P2 tied when assigning remaining seats. P2 won in a fair coin toss."
    );
}

#[test]
fn tied_candidates_within_a_party_are_drawn() {
    let mut oracle = ScriptedTieBreaker::new([1, 1]);
    let outcome = OpenPartyList::new(
        200,
        2,
        parties_with_candidate_votes(&[&[50, 50, 50], &[40, 10]]),
    )
    .unwrap()
    .run(&mut oracle)
    .unwrap();
    assert_eq!(outcome.quota, 100);
    assert_eq!(seats(&outcome), vec![1, 1]);
    let names: Vec<&str> = outcome.winners.iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["P0-1", "P1-0"]);
    assert_eq!(oracle.requests(), &[2, 3]);
    assert_eq!(outcome.record.ties()[0].context, TieContext::OplRemainder);
    let tie = &outcome.record.ties()[1];
    assert_eq!(tie.context, TieContext::OplCandidate { party: "P0".into() });
    assert_eq!(tie.tied, vec!["P0-0", "P0-1", "P0-2"]);
}

#[test]
fn seeded_runs_replay_identically() {
    let build =
        || OpenPartyList::new(700, 3, parties(&[2, 2, 2, 2], &[175, 175, 175, 175])).unwrap();
    let first = build().run(&mut RandomTieBreaker::from_seed(3)).unwrap();
    let second = build().run(&mut RandomTieBreaker::from_seed(3)).unwrap();
    assert_eq!(first, second);
    assert_eq!(seats(&first).iter().sum::<usize>(), 3);
}

#[test]
fn outcome_serializes_rows() {
    let outcome = OpenPartyList::new(5520, 3, parties(&[3, 3], &[3000, 2520]))
        .unwrap()
        .run(&mut ScriptedTieBreaker::default())
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["quota"], 1840);
    assert_eq!(json["parties"][0]["remaining_votes"], 1160);
}
