mod common;

use common::parties;
use tally_core::{Party, TallyError};
use tally_opl::OpenPartyList;

fn code_of(result: Result<OpenPartyList, TallyError>) -> String {
    let err = result.unwrap_err();
    assert!(err.is_invalid_argument());
    err.info().code.clone()
}

#[test]
fn scalars_must_be_positive() {
    assert_eq!(code_of(OpenPartyList::new(0, 3, parties(&[1], &[0]))), "opl-total-ballots");
    assert_eq!(code_of(OpenPartyList::new(10, 0, parties(&[1], &[5]))), "opl-seats");
}

#[test]
fn party_list_must_be_usable() {
    assert_eq!(code_of(OpenPartyList::new(10, 1, Vec::new())), "opl-no-parties");
    assert_eq!(
        code_of(OpenPartyList::new(10, 1, vec![Party::new("Empty").unwrap()])),
        "opl-empty-party"
    );
    let mut twins = parties(&[1], &[2]);
    twins.extend(parties(&[1], &[3]));
    assert_eq!(code_of(OpenPartyList::new(10, 1, twins)), "opl-duplicate-party");
}

#[test]
fn votes_cannot_exceed_ballots() {
    assert_eq!(
        code_of(OpenPartyList::new(10, 2, parties(&[1, 1], &[6, 5]))),
        "opl-vote-overflow"
    );
}
