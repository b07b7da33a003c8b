use std::collections::HashMap;

use log::debug;
use snafu::prelude::*;

pub use crate::config::*;
use crate::{checks, resolve_ranking, tabulate, CandidateId, Preferences, VoteCount};

/// A builder for tallying votes as they arrive.
///
/// Every ballot is checked and recorded in the preference matrix as soon as it
/// is added, so that input can be read one voter at a time and abandoned at the
/// first invalid ballot.
///
/// ```
/// pub use ranked_pairs::builder::Builder;
/// pub use ranked_pairs::ElectionRules;
/// # use ranked_pairs::VotingErrors;
///
/// let mut builder = Builder::new(&ElectionRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ballot_simple(&["Anna".to_string(), "Bob".to_string()])?;
/// assert_eq!(builder.resolve()?.winner, "Anna");
///
/// # Ok::<(), VotingErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: ElectionRules,
    pub(crate) _candidates: Vec<String>,
    pub(crate) _index: HashMap<String, CandidateId>,
    pub(crate) _preferences: Preferences,
    // Number of ballots submitted, valid or not. Used for error reporting.
    pub(crate) _submitted: usize,
    pub(crate) _voters: VoteCount,
}

impl Builder {
    pub fn new(rules: &ElectionRules) -> Result<Builder, VotingErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: Vec::new(),
            _index: HashMap::new(),
            _preferences: Preferences::new(0),
            _submitted: 0,
            _voters: VoteCount::EMPTY,
        })
    }

    /// Sets the roster. The order of the names is the candidate order used for
    /// discovering pairs and for the candidate-order tie-break.
    pub fn candidates(self, cands: &[String]) -> Result<Builder, VotingErrors> {
        let index = checks(cands)?;
        debug!("Builder: candidates: {:?}", cands);
        Ok(Builder {
            _rules: self._rules,
            _candidates: cands.to_vec(),
            _index: index,
            _preferences: Preferences::new(cands.len()),
            _submitted: 0,
            _voters: VoteCount::EMPTY,
        })
    }

    pub fn num_candidates(&self) -> usize {
        self._candidates.len()
    }

    /// Adds the ranking of one voter.
    pub fn add_ballot_simple(&mut self, ranks: &[String]) -> Result<(), VotingErrors> {
        self.add_ballot(ranks, 1)
    }

    /// Adds a ranking cast by `count` voters.
    ///
    /// ranks: every candidate, exactly once, most preferred first.
    /// Nothing is recorded if the ranking is invalid. Ballots added before stay recorded.
    pub fn add_ballot(&mut self, ranks: &[String], count: u64) -> Result<(), VotingErrors> {
        ensure!(!self._candidates.is_empty(), EmptyElectionSnafu {});
        self._submitted += 1;
        let resolved = resolve_ranking(&self._index, ranks, self._submitted)?;
        debug!(
            "Builder: ballot {}: {:?} x{}",
            self._submitted, resolved, count
        );
        let ballot = self._submitted;
        // The voter total bounds every preference count, so it overflows first.
        let voters = self
            ._voters
            .checked_add(VoteCount(count))
            .context(TallyOverflowSnafu { ballot })?;
        self._preferences
            .record(&resolved, VoteCount(count))
            .context(TallyOverflowSnafu { ballot })?;
        self._voters = voters;
        Ok(())
    }

    /// Checks a single name of the next ballot, before the full ranking is known.
    ///
    /// rank: 1-based position of the name in the ranking.
    pub fn check_name(&self, rank: usize, name: &str) -> Result<(), VotingErrors> {
        ensure!(!self._candidates.is_empty(), EmptyElectionSnafu {});
        ensure!(
            self._index.contains_key(name),
            InvalidVoteSnafu {
                ballot: self._submitted + 1,
                rank,
                name,
            }
        );
        Ok(())
    }

    pub fn add_ballot_2(&mut self, ballot: &Ballot) -> Result<(), VotingErrors> {
        self.add_ballot(&ballot.ranks, ballot.count)
    }

    /// Runs the pair generation, sorting, locking and winner extraction on
    /// the ballots recorded so far.
    pub fn resolve(&self) -> Result<ElectionResult, VotingErrors> {
        ensure!(!self._candidates.is_empty(), EmptyElectionSnafu {});
        tabulate(
            &self._candidates,
            &self._preferences,
            self._voters,
            &self._rules,
        )
    }
}
