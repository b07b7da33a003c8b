pub mod builder;
mod config;
pub mod manual;

use log::{debug, info, warn};
use snafu::prelude::*;

use std::{cmp::Reverse, collections::HashMap};

pub use crate::builder::Builder;
pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub(crate) struct CandidateId(usize);

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
pub(crate) struct VoteCount(u64);

impl VoteCount {
    pub(crate) const EMPTY: VoteCount = VoteCount(0);

    pub(crate) fn checked_add(self, rhs: VoteCount) -> Option<VoteCount> {
        self.0.checked_add(rhs.0).map(VoteCount)
    }
}

/// Head-to-head counts between every two candidates.
#[derive(Eq, PartialEq, Debug, Clone)]
pub(crate) struct Preferences {
    num_candidates: usize,
    // Row-major, counts[a * n + b] is the number of voters preferring a over b.
    counts: Vec<VoteCount>,
}

impl Preferences {
    pub(crate) fn new(num_candidates: usize) -> Preferences {
        Preferences {
            num_candidates,
            counts: vec![VoteCount::EMPTY; num_candidates * num_candidates],
        }
    }

    fn index(&self, a: CandidateId, b: CandidateId) -> usize {
        a.0 * self.num_candidates + b.0
    }

    fn get(&self, a: CandidateId, b: CandidateId) -> VoteCount {
        self.counts[self.index(a, b)]
    }

    /// Tallies one complete ranking. Every candidate ranked above another one
    /// gains `count` preferences over it.
    ///
    /// Returns None, and records nothing, if a count would overflow.
    pub(crate) fn record(&mut self, ranks: &[CandidateId], count: VoteCount) -> Option<()> {
        let mut updates: Vec<(usize, VoteCount)> = Vec::new();
        for (i, &preferred) in ranks.iter().enumerate() {
            for &other in ranks[i + 1..].iter() {
                let idx = self.index(preferred, other);
                updates.push((idx, self.counts[idx].checked_add(count)?));
            }
        }
        for (idx, vc) in updates {
            self.counts[idx] = vc;
        }
        Some(())
    }

    fn to_matrix(&self) -> Vec<Vec<u64>> {
        self.counts
            .chunks(self.num_candidates.max(1))
            .take(self.num_candidates)
            .map(|row| row.iter().map(|vc| vc.0).collect())
            .collect()
    }
}

// Both candidates are always distinct.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
struct Pair {
    winner: CandidateId,
    loser: CandidateId,
}

impl Pair {
    fn strength(&self, prefs: &Preferences) -> VoteCount {
        prefs.get(self.winner, self.loser)
    }
}

/// Directed graph of the locked pairs: `winner -> loser`.
#[derive(Eq, PartialEq, Debug, Clone)]
struct LockGraph {
    num_candidates: usize,
    locked: Vec<bool>,
}

impl LockGraph {
    fn new(num_candidates: usize) -> LockGraph {
        LockGraph {
            num_candidates,
            locked: vec![false; num_candidates * num_candidates],
        }
    }

    fn is_locked(&self, from: CandidateId, to: CandidateId) -> bool {
        self.locked[from.0 * self.num_candidates + to.0]
    }

    fn lock(&mut self, pair: &Pair) {
        self.locked[pair.winner.0 * self.num_candidates + pair.loser.0] = true;
    }

    /// Depth-first search along the locked edges.
    fn reaches(&self, start: CandidateId, target: CandidateId) -> bool {
        let mut visited = vec![false; self.num_candidates];
        let mut stack = vec![start];
        while let Some(cid) = stack.pop() {
            if cid == target {
                return true;
            }
            if visited[cid.0] {
                continue;
            }
            visited[cid.0] = true;
            for next in (0..self.num_candidates).map(CandidateId) {
                if self.is_locked(cid, next) && !visited[next.0] {
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Locking `winner -> loser` closes a cycle iff the loser already reaches the winner.
    fn creates_cycle(&self, pair: &Pair) -> bool {
        self.reaches(pair.loser, pair.winner)
    }

    fn has_defeat(&self, cid: CandidateId) -> bool {
        (0..self.num_candidates)
            .map(CandidateId)
            .any(|other| self.is_locked(other, cid))
    }
}

/// Runs the ranked pairs algorithm on the given ballots.
///
/// Arguments:
/// * `candidates` the registered candidates, in roster order. The order matters
/// for the discovery order of the pairs and for the candidate-order tie-break.
/// * `ballots` the complete rankings. The first invalid ballot aborts the election.
/// * `rules` the rules that govern this election
pub fn run_election(
    candidates: &[String],
    ballots: &[Ballot],
    rules: &ElectionRules,
) -> Result<ElectionResult, VotingErrors> {
    info!(
        "run_election: processing {:?} ballots, candidates: {:?}, rules: {:?}",
        ballots.len(),
        candidates,
        rules
    );
    let mut builder = Builder::new(rules)?.candidates(candidates)?;
    for ballot in ballots.iter() {
        builder.add_ballot(&ballot.ranks, ballot.count)?;
    }
    builder.resolve()
}

/// Checks the roster and assigns the candidate ids in roster order.
pub(crate) fn checks(candidates: &[String]) -> Result<HashMap<String, CandidateId>, VotingErrors> {
    ensure!(!candidates.is_empty(), EmptyElectionSnafu {});
    ensure!(
        candidates.len() <= MAX_CANDIDATES,
        TooManyCandidatesSnafu {
            count: candidates.len(),
            max: MAX_CANDIDATES,
        }
    );
    let mut index: HashMap<String, CandidateId> = HashMap::new();
    for (idx, name) in candidates.iter().enumerate() {
        ensure!(
            !index.contains_key(name),
            DuplicateCandidateSnafu { name: name.clone() }
        );
        index.insert(name.clone(), CandidateId(idx));
    }
    Ok(index)
}

/// Turns a ranking of names into candidate ids.
/// `ballot` is only used to report errors.
pub(crate) fn resolve_ranking(
    index: &HashMap<String, CandidateId>,
    ranks: &[String],
    ballot: usize,
) -> Result<Vec<CandidateId>, VotingErrors> {
    let mut seen = vec![false; index.len()];
    let mut res: Vec<CandidateId> = Vec::with_capacity(ranks.len());
    for (rank, name) in ranks.iter().enumerate() {
        let cid = *index.get(name).context(InvalidVoteSnafu {
            ballot,
            rank: rank + 1,
            name: name.clone(),
        })?;
        ensure!(
            !seen[cid.0],
            DuplicateRankSnafu {
                ballot,
                name: name.clone()
            }
        );
        seen[cid.0] = true;
        res.push(cid);
    }
    ensure!(
        res.len() == index.len(),
        IncompleteBallotSnafu {
            ballot,
            found: res.len(),
            expected: index.len(),
        }
    );
    Ok(res)
}

/// Returns the pairs with a strict majority, in candidate index order.
fn add_pairs(prefs: &Preferences) -> Vec<Pair> {
    let n = prefs.num_candidates;
    let mut pairs: Vec<Pair> = Vec::new();
    for a in (0..n).map(CandidateId) {
        for b in (a.0 + 1..n).map(CandidateId) {
            let a_over_b = prefs.get(a, b);
            let b_over_a = prefs.get(b, a);
            if a_over_b > b_over_a {
                pairs.push(Pair {
                    winner: a,
                    loser: b,
                });
            } else if b_over_a > a_over_b {
                pairs.push(Pair {
                    winner: b,
                    loser: a,
                });
            }
            // Exact tie: no pair.
        }
    }
    pairs
}

/// Strongest victories first. The sort is stable: pairs of equal strength keep
/// their discovery order, which decides which of them gets locked first.
fn sort_pairs(pairs: &mut [Pair], prefs: &Preferences) {
    pairs.sort_by_key(|p| Reverse(p.strength(prefs)));
}

/// Locks the pairs in order, skipping the ones that would close a cycle.
/// Returns the graph and, for every pair, whether it was locked.
fn lock_pairs(pairs: &[Pair], num_candidates: usize) -> (LockGraph, Vec<bool>) {
    let mut graph = LockGraph::new(num_candidates);
    let mut decisions: Vec<bool> = Vec::with_capacity(pairs.len());
    for pair in pairs.iter() {
        if graph.creates_cycle(pair) {
            debug!("lock_pairs: skipping {:?}: would create a cycle", pair);
            decisions.push(false);
        } else {
            debug!("lock_pairs: locking {:?}", pair);
            graph.lock(pair);
            decisions.push(true);
        }
    }
    (graph, decisions)
}

/// The candidates without a locked defeat, in roster order.
fn find_sources(graph: &LockGraph) -> Vec<CandidateId> {
    (0..graph.num_candidates)
        .map(CandidateId)
        .filter(|cid| !graph.has_defeat(*cid))
        .collect()
}

fn select_winner(
    sources: &[CandidateId],
    candidates: &[String],
    tiebreak: TieBreakMode,
) -> Result<CandidateId, VotingErrors> {
    let names = || -> Vec<String> {
        sources
            .iter()
            .map(|cid| candidates[cid.0].clone())
            .collect()
    };
    match (sources, tiebreak) {
        ([cid], _) => Ok(*cid),
        ([], _) | (_, TieBreakMode::Reject) => NoUniqueWinnerSnafu { sources: names() }.fail(),
        ([first, ..], TieBreakMode::UseCandidateOrder) => {
            warn!(
                "select_winner: {:?} are undefeated, using candidate order",
                names()
            );
            Ok(*first)
        }
        (_, TieBreakMode::Random(seed)) => {
            warn!(
                "select_winner: {:?} are undefeated, using random order with seed {}",
                names(),
                seed
            );
            let res = candidate_permutation_crypto(sources, candidates, seed);
            debug!("select_winner: permutation: {:?}", res);
            res.first()
                .cloned()
                .context(NoUniqueWinnerSnafu { sources: names() })
        }
    }
}

/// Orders the candidates by the SHA-256 digest of the seed and their name.
/// Hard to guess in advance, but reproducible for a given seed.
fn candidate_permutation_crypto(
    sources: &[CandidateId],
    candidates: &[String],
    seed: u32,
) -> Vec<CandidateId> {
    let mut data: Vec<(CandidateId, String)> = sources
        .iter()
        .map(|cid| {
            let input = format!("{:08}{}", seed, candidates[cid.0]);
            (*cid, sha256::digest(input.as_str()))
        })
        .collect();
    data.sort_by(|a, b| a.1.cmp(&b.1));
    data.iter().map(|p| p.0).collect()
}

/// Phases after the tally: pairs, sort, lock, winner.
pub(crate) fn tabulate(
    candidates: &[String],
    prefs: &Preferences,
    voters: VoteCount,
    rules: &ElectionRules,
) -> Result<ElectionResult, VotingErrors> {
    let mut pairs = add_pairs(prefs);
    debug!("tabulate: {} pairs before sorting: {:?}", pairs.len(), pairs);
    sort_pairs(&mut pairs, prefs);

    let (graph, decisions) = lock_pairs(&pairs, candidates.len());
    let sources = find_sources(&graph);
    debug!("tabulate: sources: {:?}", sources);
    let winner = select_winner(&sources, candidates, rules.tiebreak_mode)?;

    let pair_stats: Vec<PairStats> = pairs
        .iter()
        .zip(decisions.iter())
        .map(|(p, &locked)| PairStats {
            winner: candidates[p.winner.0].clone(),
            loser: candidates[p.loser.0].clone(),
            strength: p.strength(prefs).0,
            opposition: prefs.get(p.loser, p.winner).0,
            locked,
        })
        .collect();
    for ps in pair_stats.iter() {
        info!(
            "Pair {} over {} ({} to {}) -> {}",
            ps.winner,
            ps.loser,
            ps.strength,
            ps.opposition,
            if ps.locked { "locked" } else { "skipped" }
        );
    }
    info!("Winner: {}", candidates[winner.0]);

    Ok(ElectionResult {
        winner: candidates[winner.0].clone(),
        candidates: candidates.to_vec(),
        voters: voters.0,
        preferences: prefs.to_matrix(),
        pairs: pair_stats,
        tiebreak_applied: sources.len() > 1,
        sources: sources.iter().map(|cid| candidates[cid.0].clone()).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn names(l: &[&str]) -> Vec<String> {
        l.iter().map(|s| s.to_string()).collect()
    }

    fn ids(l: &[usize]) -> Vec<CandidateId> {
        l.iter().cloned().map(CandidateId).collect()
    }

    fn pair(w: usize, l: usize) -> Pair {
        Pair {
            winner: CandidateId(w),
            loser: CandidateId(l),
        }
    }

    // Builds a matrix from (winner, loser, count) entries.
    fn prefs_from(n: usize, entries: &[(usize, usize, u64)]) -> Preferences {
        let mut prefs = Preferences::new(n);
        for &(a, b, c) in entries {
            let idx = prefs.index(CandidateId(a), CandidateId(b));
            prefs.counts[idx] = VoteCount(c);
        }
        prefs
    }

    fn winner_of(candidates: &[&str], ballots: &[&[&str]], rules: &ElectionRules) -> String {
        let ballots: Vec<Ballot> = ballots.iter().map(|b| Ballot::single(b)).collect();
        run_election(&names(candidates), &ballots, rules)
            .unwrap()
            .winner
    }

    #[test]
    fn record_counts_every_lower_rank() {
        let mut prefs = Preferences::new(3);
        prefs.record(&ids(&[1, 2, 0]), VoteCount(2)).unwrap();
        assert_eq!(
            prefs.to_matrix(),
            vec![vec![0, 0, 0], vec![2, 0, 2], vec![2, 0, 0]]
        );
    }

    #[test]
    fn record_is_all_or_nothing() {
        let mut prefs = prefs_from(3, &[(2, 1, u64::MAX)]);
        assert_eq!(prefs.record(&ids(&[0, 2, 1]), VoteCount(1)), None);
        assert_eq!(
            prefs.to_matrix(),
            vec![vec![0, 0, 0], vec![0, 0, 0], vec![0, u64::MAX, 0]]
        );
    }

    #[test]
    fn huge_weights_overflow() {
        let ballots = vec![
            Ballot {
                ranks: names(&["A", "B"]),
                count: u64::MAX,
            },
            Ballot::single(&["A", "B"]),
        ];
        let res = run_election(&names(&["A", "B"]), &ballots, &ElectionRules::DEFAULT_RULES);
        assert_eq!(res, Err(VotingErrors::TallyOverflow { ballot: 2 }));
    }

    #[test]
    fn pairs_skip_ties() {
        let prefs = prefs_from(3, &[(0, 1, 2), (1, 0, 2), (2, 0, 3), (0, 2, 1), (1, 2, 1)]);
        assert_eq!(add_pairs(&prefs), vec![pair(2, 0), pair(1, 2)]);
    }

    #[test]
    fn pairs_in_discovery_order() {
        let prefs = prefs_from(4, &[(3, 0, 1), (0, 1, 1), (2, 1, 1), (2, 3, 5)]);
        assert_eq!(
            add_pairs(&prefs),
            vec![pair(0, 1), pair(3, 0), pair(2, 1), pair(2, 3)]
        );
    }

    #[test]
    fn sort_is_stable() {
        let prefs = prefs_from(4, &[(0, 1, 2), (0, 2, 5), (3, 1, 2), (2, 3, 2), (1, 2, 5)]);
        let mut pairs = vec![pair(0, 1), pair(0, 2), pair(3, 1), pair(1, 2), pair(2, 3)];
        sort_pairs(&mut pairs, &prefs);
        assert_eq!(
            pairs,
            vec![pair(0, 2), pair(1, 2), pair(0, 1), pair(3, 1), pair(2, 3)]
        );
    }

    #[test]
    fn cycle_detection_follows_transitive_locks() {
        let mut graph = LockGraph::new(4);
        graph.lock(&pair(0, 1));
        graph.lock(&pair(1, 2));
        assert!(graph.creates_cycle(&pair(2, 0)));
        assert!(!graph.creates_cycle(&pair(0, 2)));
        assert!(!graph.creates_cycle(&pair(3, 0)));
        assert!(!graph.creates_cycle(&pair(2, 3)));
    }

    #[test]
    fn lock_skips_cycle_closing_pair() {
        let (graph, decisions) = lock_pairs(&[pair(0, 1), pair(2, 0), pair(1, 2)], 3);
        assert_eq!(decisions, vec![true, true, false]);
        assert!(!graph.is_locked(CandidateId(1), CandidateId(2)));
        assert_eq!(find_sources(&graph), ids(&[2]));
    }

    #[test]
    fn unanimous() {
        init();
        let ballots: Vec<Ballot> = (0..3).map(|_| Ballot::single(&["A", "B", "C"])).collect();
        let res = run_election(&names(&["A", "B", "C"]), &ballots, &ElectionRules::DEFAULT_RULES)
            .unwrap();
        assert_eq!(res.winner, "A");
        assert_eq!(
            res.preferences,
            vec![vec![0, 3, 3], vec![0, 0, 3], vec![0, 0, 0]]
        );
        let locked: Vec<(&str, &str, u64, bool)> = res
            .pairs
            .iter()
            .map(|p| (p.winner.as_str(), p.loser.as_str(), p.strength, p.locked))
            .collect();
        assert_eq!(
            locked,
            vec![
                ("A", "B", 3, true),
                ("A", "C", 3, true),
                ("B", "C", 3, true)
            ]
        );
        assert_eq!(res.sources, names(&["A"]));
        assert!(!res.tiebreak_applied);
        assert_eq!(res.voters, 3);
    }

    #[test]
    fn condorcet_cycle_resolved_by_pair_order() {
        init();
        // Every pair is won 2 to 1. The pairs are sorted (A,B), (C,A), (B,C)
        // and (B,C) would close the cycle.
        let w = winner_of(
            &["A", "B", "C"],
            &[&["A", "B", "C"], &["B", "C", "A"], &["C", "A", "B"]],
            &ElectionRules::DEFAULT_RULES,
        );
        assert_eq!(w, "C");
    }

    #[test]
    fn weighted_ballots() {
        init();
        let ballots = vec![
            Ballot {
                ranks: names(&["Alice", "Bob", "Charlie"]),
                count: 3,
            },
            Ballot {
                ranks: names(&["Bob", "Charlie", "Alice"]),
                count: 2,
            },
            Ballot {
                ranks: names(&["Charlie", "Alice", "Bob"]),
                count: 4,
            },
        ];
        let res = run_election(
            &names(&["Alice", "Bob", "Charlie"]),
            &ballots,
            &ElectionRules::DEFAULT_RULES,
        )
        .unwrap();
        assert_eq!(res.winner, "Charlie");
        assert_eq!(res.voters, 9);
        let decisions: Vec<bool> = res.pairs.iter().map(|p| p.locked).collect();
        assert_eq!(decisions, vec![true, true, false]);
        assert_eq!(res.pairs[0].strength, 7);
        assert_eq!(res.pairs[0].opposition, 2);
    }

    #[test]
    fn exact_tie_rejected_by_default() {
        init();
        let ballots = vec![
            Ballot::single(&["A", "B", "C"]),
            Ballot::single(&["C", "B", "A"]),
        ];
        let res = run_election(&names(&["A", "B", "C"]), &ballots, &ElectionRules::DEFAULT_RULES);
        assert_eq!(
            res,
            Err(VotingErrors::NoUniqueWinner {
                sources: names(&["A", "B", "C"])
            })
        );
    }

    #[test]
    fn exact_tie_with_candidate_order() {
        init();
        let rules = ElectionRules {
            tiebreak_mode: TieBreakMode::UseCandidateOrder,
        };
        let ballots = vec![
            Ballot::single(&["A", "B", "C"]),
            Ballot::single(&["C", "B", "A"]),
        ];
        let res = run_election(&names(&["A", "B", "C"]), &ballots, &rules).unwrap();
        assert_eq!(res.winner, "A");
        assert!(res.pairs.is_empty());
        assert_eq!(res.sources.len(), 3);
        assert!(res.tiebreak_applied);
    }

    #[test]
    fn exact_tie_with_random_is_reproducible() {
        init();
        let candidates = names(&["A", "B", "C", "D"]);
        let ballots = vec![
            Ballot::single(&["A", "B", "C", "D"]),
            Ballot::single(&["D", "C", "B", "A"]),
        ];
        let rules = ElectionRules {
            tiebreak_mode: TieBreakMode::Random(42),
        };
        let first = run_election(&candidates, &ballots, &rules).unwrap();
        let second = run_election(&candidates, &ballots, &rules).unwrap();
        assert_eq!(first.winner, second.winner);
        assert!(candidates.contains(&first.winner));

        let sources = ids(&[0, 1, 2, 3]);
        let expected = sources
            .iter()
            .min_by_key(|cid| sha256::digest(format!("{:08}{}", 42, candidates[cid.0]).as_str()))
            .cloned()
            .unwrap();
        assert_eq!(first.winner, candidates[expected.0]);
    }

    #[test]
    fn no_voters() {
        init();
        assert_eq!(
            winner_of(&["Solo"], &[], &ElectionRules::DEFAULT_RULES),
            "Solo"
        );
        let res = run_election(&names(&["A", "B"]), &[], &ElectionRules::DEFAULT_RULES);
        assert!(matches!(res, Err(VotingErrors::NoUniqueWinner { .. })));
    }

    #[test]
    fn unknown_candidate_aborts() {
        init();
        let ballots = vec![
            Ballot::single(&["A", "B", "C"]),
            Ballot::single(&["A", "Zed", "C"]),
        ];
        let res = run_election(&names(&["A", "B", "C"]), &ballots, &ElectionRules::DEFAULT_RULES);
        let err = res.unwrap_err();
        assert_eq!(
            err,
            VotingErrors::InvalidVote {
                ballot: 2,
                rank: 2,
                name: "Zed".to_string()
            }
        );
        assert!(err.is_invalid_vote());
    }

    #[test]
    fn incomplete_and_repeated_rankings() {
        let index = checks(&names(&["A", "B", "C"])).unwrap();
        assert_eq!(
            resolve_ranking(&index, &names(&["A", "B"]), 1),
            Err(VotingErrors::IncompleteBallot {
                ballot: 1,
                found: 2,
                expected: 3
            })
        );
        assert_eq!(
            resolve_ranking(&index, &names(&["A", "B", "A"]), 4),
            Err(VotingErrors::DuplicateRank {
                ballot: 4,
                name: "A".to_string()
            })
        );
        assert_eq!(
            resolve_ranking(&index, &names(&["C", "A", "B"]), 1),
            Ok(ids(&[2, 0, 1]))
        );
    }

    #[test]
    fn roster_checks() {
        assert_eq!(checks(&[]), Err(VotingErrors::EmptyElection {}));
        let many: Vec<String> = (0..10).map(|i| format!("C{}", i)).collect();
        assert_eq!(
            checks(&many),
            Err(VotingErrors::TooManyCandidates { count: 10, max: 9 })
        );
        assert!(checks(&many[..9]).is_ok());
        assert_eq!(
            checks(&names(&["A", "B", "A"])),
            Err(VotingErrors::DuplicateCandidate {
                name: "A".to_string()
            })
        );
    }

    fn is_acyclic(graph: &LockGraph) -> bool {
        (0..graph.num_candidates).map(CandidateId).all(|c| {
            (0..graph.num_candidates)
                .map(CandidateId)
                .filter(|&next| graph.is_locked(c, next))
                .all(|next| !graph.reaches(next, c))
        })
    }

    // Odd voter counts: no pair can be exactly tied.
    fn odd_elections() -> impl Strategy<Value = (usize, Vec<Vec<usize>>)> {
        (2..=MAX_CANDIDATES, 0usize..6).prop_flat_map(|(n, k)| {
            let ranking = Just((0..n).collect::<Vec<usize>>()).prop_shuffle();
            (Just(n), proptest::collection::vec(ranking, 2 * k + 1))
        })
    }

    proptest! {
        #[test]
        fn random_elections_keep_graph_acyclic((n, rankings) in odd_elections()) {
            let mut prefs = Preferences::new(n);
            for ranking in rankings.iter() {
                let ranks: Vec<CandidateId> = ranking.iter().cloned().map(CandidateId).collect();
                prop_assert!(prefs.record(&ranks, VoteCount(1)).is_some());
            }
            let mut pairs = add_pairs(&prefs);
            prop_assert_eq!(pairs.len(), n * (n - 1) / 2);
            sort_pairs(&mut pairs, &prefs);
            for w in pairs.windows(2) {
                prop_assert!(w[0].strength(&prefs) >= w[1].strength(&prefs));
            }

            let mut graph = LockGraph::new(n);
            for p in pairs.iter() {
                if graph.creates_cycle(p) {
                    let mut with_pair = graph.clone();
                    with_pair.lock(p);
                    prop_assert!(!is_acyclic(&with_pair));
                } else {
                    graph.lock(p);
                    prop_assert!(!graph.reaches(p.loser, p.winner));
                    prop_assert!(is_acyclic(&graph));
                }
            }
            prop_assert_eq!(find_sources(&graph).len(), 1);
        }
    }
}
