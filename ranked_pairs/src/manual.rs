/*!

This is the long-form manual for `ranked_pairs` and `tideman`.

## The method

Every voter ranks all the candidates. For every two candidates `A` and `B`, the
program counts how many voters ranked `A` above `B`. If more voters prefer `A`
to `B` than the opposite, `(A, B)` becomes a *pair* whose *strength* is the
number of voters preferring `A`. Exactly tied candidates produce no pair.

The pairs are sorted by decreasing strength. Pairs of equal strength keep the
order in which they were found, which follows the order of the candidates on
the command line (or in the configuration file).

The sorted pairs are then *locked* one after the other as arrows `A -> B`, unless
the arrow would close a cycle, in which case the pair is skipped. The winner is
the candidate that no arrow points to.

When some candidates are exactly tied, several candidates may end up without
any arrow pointing to them. The tie-break mode decides what happens then:

* `stop` (default): the election fails and the undefeated candidates are listed.
* `useCandidateOrder`: the first undefeated candidate in candidate order wins.
* `random`: the undefeated candidate with the smallest SHA-256 digest of the
  seed (8 digits, zero-padded) followed by the name wins. The same seed always
  gives the same winner.

## Command line

```bash
tideman Alice Bob Charlie
```

asks for the number of voters, then for the ranking of each voter, one name per
line. At most 9 candidates are accepted. The name of the winner is printed on the
standard output.

The exit status is `0` on success, `1` for bad arguments or configuration,
`2` for too many candidates, `3` for an invalid vote (unknown name, repeated
name or missing name) and `4` for any other failure.

Other options:
* `--input FILE --input-type csv|xlsx` reads the ballots from a file.
* `--config FILE` reads a complete election description (see below).
* `--out FILE` (or `--out stdout`) writes a summary of the election in JSON.
* `--reference FILE` compares the summary with a reference summary.
* `--tiebreak MODE --seed N` changes the tie-break mode.
* `--verbose` turns on debug logging. `RUST_LOG` is also honoured.

## Input formats

### csv

Each row is a ballot, each column (in order) is a rank.

```text
id,count,rank 1,rank 2,rank 3
v1,3,Alice,Bob,Charlie
v2,2,Bob,Charlie,Alice
```

The `id` and `count` columns are optional. A header row is optional.
Without a configuration file, the first row is a header and every column is a rank.

### xlsx

Same layout as `csv`, in the first worksheet of an Excel file (or the worksheet
given by `--excel-worksheet-name`).

## Configuration

```json
{
  "outputSettings": { "contestName": "Class president", "outputDirectory": "output" },
  "candidates": [ { "name": "Alice", "code": "A" }, { "name": "Bob" } ],
  "ballotSources": [
    { "provider": "csv", "filePath": "ballots.csv", "firstVoteRowIndex": 2,
      "idColumnIndex": 1, "countColumnIndex": 2, "firstVoteColumnIndex": 3 }
  ],
  "ballots": [ ["A", "Bob"] ],
  "rules": { "tiebreakMode": "random", "randomSeed": "42" }
}
```

 - Row and column indexes start at 1. Columns can also be given as Excel letters (`"C"`).
 - File paths are relative to the configuration file.
 - Ballots may refer to a candidate by its `code`.
 - `ballots` holds inline rankings, counted once each, after the ballot sources.
 - If `outputDirectory` is set, the summary is written to `summary.json` in that directory.

 */
