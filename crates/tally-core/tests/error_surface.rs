use tally_core::errors::{ErrorInfo, TallyError};
use tally_core::tiebreak::{RandomTieBreaker, TieBreaker};
use tally_core::{Candidate, CandidateId, Party};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("party", "D")
        .with_context("seats", 3)
}

#[test]
fn invalid_argument_surface() {
    let err = TallyError::InvalidArgument(sample_info("opl-no-parties", "no parties"));
    assert_eq!(err.info().code, "opl-no-parties");
    assert!(err.is_invalid_argument());
    assert_eq!(err.info().context.get("seats").map(String::as_str), Some("3"));
}

#[test]
fn input_surface_renders_context_and_hint() {
    let err = TallyError::Input(
        sample_info("ballot-width", "ballot must carry one slot per candidate")
            .with_hint("check the candidate list"),
    );
    let text = err.to_string();
    assert!(text.starts_with("input error: ballot must carry one slot per candidate"));
    assert!(text.contains("party=D, seats=3"));
    assert!(text.ends_with("hint: check the candidate list"));
    assert!(!err.is_invalid_argument());
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = TallyError::Serde(sample_info("json-read", "eof"));
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "Serde");
    assert_eq!(json["detail"]["code"], "json-read");
}

#[test]
fn empty_population_is_rejected() {
    let mut oracle = RandomTieBreaker::from_seed(7);
    let err = oracle.choose_one(0).unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(err.info().code, "tie-empty-population");
}

#[test]
fn model_constructors_reject_empty_fields() {
    assert!(Candidate::new("", "D", CandidateId::from_raw(0)).is_err());
    assert!(Party::new("  ").unwrap_err().is_invalid_argument());
}
