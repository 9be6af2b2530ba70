use std::collections::BTreeMap;

use tally_core::errors::TallyError;
use tally_core::{ElectionRecord, Party, TieBreaker, TieContext, TieRecord};
use tracing::debug;

/// Awards whole quotas to every party, capped by list length and by the seats
/// still open. Sets each party's seat count and remainder and returns the seats
/// left afterwards.
///
/// A zero quota (more seats than ballots) skips the phase entirely and leaves
/// every party's full vote as its remainder.
pub fn quota_allocation(
    parties: &mut [Party],
    quota: u64,
    seats: usize,
    record: &mut ElectionRecord,
) -> Result<usize, TallyError> {
    let mut seats_left = seats;
    if quota == 0 {
        for party in parties.iter_mut() {
            let votes = party.total_votes();
            party.set_remaining_votes(votes);
        }
        record.note("Quota is zero; every seat is assigned by remaining votes.");
        return Ok(seats_left);
    }

    for party in parties.iter_mut() {
        let whole = usize::try_from(party.total_votes() / quota).unwrap_or(usize::MAX);
        let mut obtained = whole.min(party.num_candidates());
        if obtained > seats_left {
            record.note(format!(
                "{} earned {} quota seats but only {} remained.",
                party.name(),
                obtained,
                seats_left
            ));
            obtained = seats_left;
        }
        party.set_seats_won(obtained)?;
        party.set_remaining_votes(party.total_votes() - quota * obtained as u64);
        seats_left -= obtained;
        debug!(
            party = party.name(),
            obtained,
            remaining = party.remaining_votes(),
            "quota seats"
        );
    }
    Ok(seats_left)
}

/// Hands out the seats left after the quota phase by largest remainder.
///
/// Parties sharing a remainder form one group. Groups are visited from the
/// largest remainder down and the visit wraps around until no seat is left or
/// every party has seated its whole list. A group that fits in the seats left
/// takes one seat per party; otherwise the oracle awards the last seats one at a
/// time among the still-tied parties. Returns the seats that could not be filled.
pub fn remainder_allocation(
    parties: &mut [Party],
    mut seats_left: usize,
    oracle: &mut dyn TieBreaker,
    record: &mut ElectionRecord,
) -> Result<usize, TallyError> {
    let mut grouped: BTreeMap<u64, Vec<usize>> = BTreeMap::new();
    for (idx, party) in parties.iter().enumerate() {
        grouped.entry(party.remaining_votes()).or_default().push(idx);
    }
    let groups: Vec<Vec<usize>> = grouped.into_values().rev().collect();

    'cycle: loop {
        for group in &groups {
            if seats_left == 0 || parties.iter().all(Party::at_capacity) {
                break 'cycle;
            }
            let mut open: Vec<usize> = group
                .iter()
                .copied()
                .filter(|&idx| !parties[idx].at_capacity())
                .collect();
            if open.is_empty() {
                continue;
            }
            if open.len() <= seats_left {
                for &idx in &open {
                    parties[idx].try_award_seat();
                    debug!(party = parties[idx].name(), "remainder seat");
                }
                seats_left -= open.len();
                continue;
            }
            while seats_left > 0 && !open.is_empty() {
                let pick = oracle.choose_one(open.len())?;
                let tied = open.iter().map(|&idx| parties[idx].name().to_string()).collect();
                let idx = open.remove(pick);
                if parties[idx].try_award_seat() {
                    seats_left -= 1;
                }
                record.push_tie(TieRecord {
                    context: TieContext::OplRemainder,
                    tied,
                    chosen: parties[idx].name().to_string(),
                });
                debug!(party = parties[idx].name(), "remainder seat by coin toss");
            }
        }
    }
    Ok(seats_left)
}
