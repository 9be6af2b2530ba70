//! Plain-text audit and media reports built from the structured record.

use std::fmt::{self, Write};

use tally_core::{percentage, ElectionRecord};
use tally_ir::IrOutcome;
use tally_opl::OplOutcome;

use crate::summary::{ElectionResult, RunSummary};

fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

fn write_ties_and_notes(out: &mut String, record: &ElectionRecord) -> fmt::Result {
    writeln!(out, "Ties")?;
    if record.has_ties() {
        for tie in record.ties() {
            writeln!(out, "  {}", tie.narrative())?;
        }
    } else {
        writeln!(out, "  No ties occurred.")?;
    }
    if !record.notes().is_empty() {
        writeln!(out)?;
        writeln!(out, "Notes")?;
        for note in record.notes() {
            writeln!(out, "  {note}")?;
        }
    }
    Ok(())
}

/// Round-by-round audit of an instant-runoff count.
pub fn ir_audit(outcome: &IrOutcome, ballot_listing: bool) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Instant Runoff Election")?;
    writeln!(
        out,
        "Candidates: {}   Ballots cast: {}",
        outcome.remaining.len() + outcome.eliminated.len(),
        outcome.total_ballots
    )?;

    for round in outcome.record.rounds() {
        writeln!(out)?;
        writeln!(out, "{} Count", ordinal(round.round))?;
        if let Some(eliminated) = &round.eliminated {
            writeln!(
                out,
                "  Eliminated: {} ({}) with {} votes",
                eliminated.name, eliminated.party, eliminated.votes
            )?;
        }
        writeln!(out, "  {:<28}{:>10}{:>10}{:>10}", "Candidate", "Votes", "Change", "Share")?;
        for tally in &round.tallies {
            writeln!(
                out,
                "  {:<28}{:>10}{:>+10}{:>9.2}%",
                format!("{} ({})", tally.name, tally.party),
                tally.votes,
                tally.delta,
                percentage(tally.votes, round.remaining_ballots)
            )?;
        }
        writeln!(out, "  Ballots still counting: {}", round.remaining_ballots)?;
        if ballot_listing {
            writeln!(out, "  Ballot distribution:")?;
            for entry in &round.ballots {
                writeln!(out, "    {:<24}{:>8}", entry.signature, entry.count)?;
            }
        }
    }

    writeln!(out)?;
    write_ties_and_notes(&mut out, &outcome.record)?;
    writeln!(out)?;
    writeln!(
        out,
        "Winner: {} ({}) with {} votes, {:.2}% of ballots still counting and {:.2}% of all ballots",
        outcome.winner.name,
        outcome.winner.party,
        outcome.winner.votes,
        outcome.winning_share,
        outcome.share_of_total
    )?;
    writeln!(out, "Exhausted ballots: {}", outcome.exhausted_ballots())?;
    Ok(out)
}

/// Seat allocation audit of an open-party-list election.
pub fn opl_audit(outcome: &OplOutcome) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "Open Party List Election")?;
    writeln!(
        out,
        "Seats: {}   Ballots cast: {}   Quota: {}",
        outcome.seats_available, outcome.total_ballots, outcome.quota
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "  {:<16}{:>10}{:>8}{:>12}{:>8}{:>8}{:>10}{:>10}",
        "Party", "Votes", "First", "Remaining", "Second", "Final", "% Votes", "% Seats"
    )?;
    for row in &outcome.parties {
        writeln!(
            out,
            "  {:<16}{:>10}{:>8}{:>12}{:>8}{:>8}{:>9.2}%{:>9.2}%",
            row.name,
            row.votes,
            row.first_allocation,
            row.remaining_votes,
            row.second_allocation,
            row.total_seats,
            percentage(row.votes, outcome.total_ballots),
            percentage(row.total_seats as u64, outcome.seats_available as u64)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Votes per candidate")?;
    for row in &outcome.parties {
        writeln!(out, "  {}", row.name)?;
        for candidate in &row.candidates {
            let seated = row.winners.iter().any(|w| w.id() == candidate.id());
            writeln!(
                out,
                "    {:<24}{:>10}{}",
                candidate.name(),
                candidate.votes(),
                if seated { "  seated" } else { "" }
            )?;
        }
    }

    writeln!(out)?;
    write_ties_and_notes(&mut out, &outcome.record)?;
    writeln!(out)?;
    writeln!(out, "Winners")?;
    for winner in &outcome.winners {
        writeln!(out, "  {}", winner.label())?;
    }
    Ok(out)
}

/// Short public summary of a run.
pub fn media_report(summary: &RunSummary) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match &summary.result {
        ElectionResult::InstantRunoff(outcome) => {
            writeln!(out, "Instant Runoff Election Results")?;
            writeln!(
                out,
                "{} ({}) wins with {} votes ({:.2}%).",
                outcome.winner.name,
                outcome.winner.party,
                outcome.winner.votes,
                outcome.winning_share
            )?;
            if outcome.resolved_by_coin_toss {
                writeln!(out, "The final two candidates were separated by a coin toss.")?;
            }
            writeln!(
                out,
                "Ballots cast: {}. Rounds counted: {}.",
                outcome.total_ballots, outcome.rounds
            )?;
        }
        ElectionResult::OpenPartyList(outcome) => {
            writeln!(out, "Open Party List Election Results")?;
            for row in &outcome.parties {
                writeln!(
                    out,
                    "{}: {} of {} seats with {:.2}% of the vote.",
                    row.name,
                    row.total_seats,
                    outcome.seats_available,
                    percentage(row.votes, outcome.total_ballots)
                )?;
            }
            writeln!(out, "Elected:")?;
            for winner in &outcome.winners {
                writeln!(out, "  {}", winner.label())?;
            }
            if !outcome.all_seats_filled() {
                writeln!(
                    out,
                    "{} seats could not be filled.",
                    outcome.unfilled_seats
                )?;
            }
        }
    }
    if !summary.invalidated_ballots.is_empty() {
        writeln!(
            out,
            "{} ballots were invalidated for ranking too few candidates.",
            summary.invalidated_ballots.len()
        )?;
    }
    writeln!(out, "Audit seed: {}", summary.provenance.seed)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals() {
        let rendered: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 102].map(ordinal).to_vec();
        assert_eq!(
            rendered,
            vec!["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "102nd"]
        );
    }
}
