use proptest::prelude::*;
use tally_core::{registry_from_entries, BallotMultiset, BallotSignature, RankedBallotBuilder};

const TOKENS: [&str; 5] = ["D", "R", "I", "G", "L"];

fn signature_strategy() -> impl Strategy<Value = BallotSignature> {
    Just(TOKENS.to_vec())
        .prop_shuffle()
        .prop_flat_map(|tokens| (0..=tokens.len()).prop_map(move |len| tokens[..len].to_vec()))
        .prop_map(|tokens| BallotSignature::new(tokens).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn signature_text_form_parses_back(signature in signature_strategy()) {
        let parsed: BallotSignature = signature.to_string().parse().unwrap();
        prop_assert_eq!(parsed, signature);
    }

    #[test]
    fn removing_a_token_moves_counts_without_loss(
        entries in prop::collection::vec((signature_strategy(), 1u64..50), 1..20),
        dropped in 0usize..TOKENS.len(),
    ) {
        let mut ballots: BallotMultiset = entries.into_iter().collect();
        let before = ballots.total();
        let token = TOKENS[dropped];
        let mut exhausted = 0;
        for signature in ballots.signatures_containing(token) {
            let count = ballots.remove(&signature).unwrap();
            let replacement = signature.without(token);
            if replacement.is_empty() {
                exhausted += count;
            } else {
                ballots.add(replacement, count);
            }
        }
        prop_assert!(ballots.signatures_containing(token).is_empty());
        prop_assert_eq!(ballots.total() + exhausted, before);
    }

    #[test]
    fn builder_counts_every_ballot_once(
        ballots in prop::collection::vec(
            Just((1..=4u32).collect::<Vec<_>>()).prop_shuffle(),
            1..40,
        ),
        ranked in 1usize..=4,
    ) {
        let candidates =
            registry_from_entries([("A", "D"), ("B", "R"), ("C", "I"), ("E", "G")]).unwrap();
        let mut builder = RankedBallotBuilder::new(&candidates).require_half_ranked(true);
        for ranks in &ballots {
            let slots: Vec<Option<u32>> = ranks
                .iter()
                .map(|&r| ((r as usize) <= ranked).then_some(r))
                .collect();
            builder.push(&slots).unwrap();
        }
        let tally = builder.finish();
        prop_assert_eq!(tally.valid_ballots + tally.invalidated.len() as u64, ballots.len() as u64);
        prop_assert_eq!(tally.multiset.total(), tally.valid_ballots);
        if ranked < 2 {
            prop_assert_eq!(tally.valid_ballots, 0);
        }
    }
}
