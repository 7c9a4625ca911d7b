//! Vote tally & resolution — runs once, after the whole batch.
//!
//! RULE: Only proposals that existed (by id) before the batch began are
//! resolved. A proposal created and pushed to Voting within the same
//! batch waits for the next call.
//!
//! Simple majority of "for" over "against". Ties reject. Any other
//! choice string is an abstention and counts in neither tally.

use crate::{
    proposal::ProposalStatus,
    state::{GameStateSnapshot, Vote},
    types::EntityId,
};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoteTally {
    pub votes_for: usize,
    pub votes_against: usize,
    pub abstentions: usize,
}

impl VoteTally {
    /// Count every vote given, typically one proposal's votes from
    /// `GameStateSnapshot::votes_for_proposal`. Duplicate votes by one
    /// player are all counted.
    pub fn count<'a, I>(votes: I) -> Self
    where
        I: IntoIterator<Item = &'a Vote>,
    {
        votes
            .into_iter()
            .fold(Self::default(), |mut tally, vote| {
                if vote.is_for() {
                    tally.votes_for += 1;
                } else if vote.is_against() {
                    tally.votes_against += 1;
                } else {
                    tally.abstentions += 1;
                }
                tally
            })
    }

    pub fn outcome(&self) -> ProposalStatus {
        if self.votes_for > self.votes_against {
            ProposalStatus::Enacted
        } else {
            ProposalStatus::Rejected
        }
    }
}

/// Ids resolved in this pass, in proposal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub enacted: Vec<EntityId>,
    pub rejected: Vec<EntityId>,
}

pub fn resolve_voting(state: &mut GameStateSnapshot, pre_existing: &HashSet<EntityId>) -> Resolution {
    let due: Vec<(usize, VoteTally)> = state
        .proposals
        .iter()
        .enumerate()
        .filter(|(_, p)| p.status == ProposalStatus::Voting && pre_existing.contains(&p.id))
        .map(|(index, p)| (index, VoteTally::count(state.votes_for_proposal(&p.id))))
        .collect();

    let mut resolution = Resolution::default();
    for (index, tally) in due {
        let proposal = &mut state.proposals[index];
        let outcome = tally.outcome();
        proposal.resolve(outcome);
        log::debug!(
            "proposal {} resolved {} (for={} against={} abstain={})",
            proposal.id,
            outcome.as_str(),
            tally.votes_for,
            tally.votes_against,
            tally.abstentions
        );

        match outcome {
            ProposalStatus::Enacted => resolution.enacted.push(proposal.id.clone()),
            _ => resolution.rejected.push(proposal.id.clone()),
        }
    }

    resolution
}
