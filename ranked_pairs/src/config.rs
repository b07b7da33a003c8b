// ********* Input data structures ***********

use snafu::Snafu;

/// The largest roster an election accepts.
pub const MAX_CANDIDATES: usize = 9;

/// One ranking, cast by `count` identical voters.
///
/// The ranking must name every candidate exactly once, most preferred first.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Ballot {
    pub ranks: Vec<String>,
    pub count: u64,
}

impl Ballot {
    /// A ballot cast by a single voter.
    pub fn single(ranks: &[&str]) -> Ballot {
        Ballot {
            ranks: ranks.iter().map(|s| s.to_string()).collect(),
            count: 1,
        }
    }
}

// ******** Output data structures *********

/// A majority pair, after sorting, with the outcome of the locking step.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairStats {
    pub winner: String,
    pub loser: String,
    /// Voters ranking the winner above the loser.
    pub strength: u64,
    /// Voters ranking the loser above the winner.
    pub opposition: u64,
    /// False if locking this pair would have closed a cycle.
    pub locked: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionResult {
    pub winner: String,
    /// The roster, in index order.
    pub candidates: Vec<String>,
    /// Number of voters recorded (sum of the ballot weights).
    pub voters: u64,
    /// `preferences[a][b]`: voters ranking candidate `a` above candidate `b`.
    pub preferences: Vec<Vec<u64>>,
    /// Pairs in the order they were considered for locking.
    pub pairs: Vec<PairStats>,
    /// Candidates without any locked edge pointing at them, in roster order.
    pub sources: Vec<String>,
    /// True if several sources existed and the tie-break policy picked the winner.
    pub tiebreak_applied: bool,
}

/// Errors that prevent the algorithm from completing successfully.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VotingErrors {
    #[snafu(display("No candidates were registered for this election"))]
    EmptyElection {},
    #[snafu(display("Maximum number of candidates is {max}, got {count}"))]
    TooManyCandidates { count: usize, max: usize },
    #[snafu(display("Candidate {name:?} is registered more than once"))]
    DuplicateCandidate { name: String },
    #[snafu(display("Invalid vote: ballot {ballot}, rank {rank}: unknown candidate {name:?}"))]
    InvalidVote {
        ballot: usize,
        rank: usize,
        name: String,
    },
    #[snafu(display("Invalid vote: ballot {ballot} ranks candidate {name:?} more than once"))]
    DuplicateRank { ballot: usize, name: String },
    #[snafu(display("Invalid vote: ballot {ballot} ranks {found} candidates, expected {expected}"))]
    IncompleteBallot {
        ballot: usize,
        found: usize,
        expected: usize,
    },
    #[snafu(display("Ballot {ballot} makes the vote counts overflow"))]
    TallyOverflow { ballot: usize },
    #[snafu(display("No unique winner, candidates without a defeat: {sources:?}"))]
    NoUniqueWinner { sources: Vec<String> },
}

impl VotingErrors {
    /// True for the errors caused by a malformed ranking.
    pub fn is_invalid_vote(&self) -> bool {
        matches!(
            self,
            VotingErrors::InvalidVote { .. }
                | VotingErrors::DuplicateRank { .. }
                | VotingErrors::IncompleteBallot { .. }
        )
    }
}

// ********* Configuration **********

/// How to pick a winner when several candidates have no locked defeat.
///
/// This only happens when some pairs are exactly tied, which leaves
/// the lock graph without a single source.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// Fail with [`VotingErrors::NoUniqueWinner`].
    Reject,
    /// Pick the first source in roster order.
    UseCandidateOrder,
    // The seed is mixed with each candidate name and hashed with SHA-256;
    // the smallest digest wins.
    Random(u32),
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ElectionRules {
    pub tiebreak_mode: TieBreakMode,
}

impl ElectionRules {
    pub const DEFAULT_RULES: ElectionRules = ElectionRules {
        tiebreak_mode: TieBreakMode::Reject,
    };
}

impl Default for ElectionRules {
    fn default() -> Self {
        ElectionRules::DEFAULT_RULES
    }
}
