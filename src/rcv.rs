use log::{debug, info, warn};

use ranked_pairs::*;
use snafu::{prelude::*, Snafu};

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::rcv::config_reader::*;
use crate::rcv::io_prompt::PromptReader;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_prompt;
mod io_xlsx;

// Exit status of the program.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_BAD_ARGUMENTS: i32 = 1;
pub const EXIT_TOO_MANY_CANDIDATES: i32 = 2;
pub const EXIT_INVALID_VOTE: i32 = 3;
pub const EXIT_FAILURE: i32 = 4;

#[derive(Debug, Snafu)]
pub enum RcvError {
    #[snafu(display("Usage: tideman [candidate ...]"))]
    TooFewArguments {},
    #[snafu(display("{source}"))]
    Voting { source: VotingErrors },

    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive index, got {content}"))]
    ParsingJsonNumber { content: String },
    #[snafu(display("Could not find the directory of the configuration file"))]
    MissingParentDir {},
    #[snafu(display("Unknown ballot provider {provider:?}"))]
    UnknownProvider { provider: String },

    #[snafu(display("Error opening file {path}: {source}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The Excel file does not contain any worksheet"))]
    EmptyExcel {},
    #[snafu(display("Worksheet {name:?} not found"))]
    MissingWorksheet { name: String },
    #[snafu(display("Excel row {lineno}: unexpected cell {content}"))]
    ExcelWrongCellType { lineno: usize, content: String },

    #[snafu(display("Error opening file {path}: {source}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing line {lineno}: {source}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("Line {lineno}: {content:?} is not a ballot count"))]
    ParsingCount { lineno: usize, content: String },

    #[snafu(display("Error reading the standard input: {source}"))]
    ReadingInput { source: std::io::Error },
    #[snafu(display("The input ended before all the votes were read"))]
    EndOfInput {},
    #[snafu(display("Error writing {path}: {source}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The summary differs from the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type RcvResult<T> = Result<T, RcvError>;

impl RcvError {
    pub fn exit_code(&self) -> i32 {
        match self {
            RcvError::Voting { source } => match source {
                VotingErrors::TooManyCandidates { .. } => EXIT_TOO_MANY_CANDIDATES,
                e if e.is_invalid_vote() => EXIT_INVALID_VOTE,
                VotingErrors::EmptyElection {} | VotingErrors::DuplicateCandidate { .. } => {
                    EXIT_BAD_ARGUMENTS
                }
                _ => EXIT_FAILURE,
            },
            RcvError::TooFewArguments {}
            | RcvError::OpeningJson { .. }
            | RcvError::ParsingJson { .. }
            | RcvError::ParsingJsonNumber { .. }
            | RcvError::MissingParentDir {}
            | RcvError::UnknownProvider { .. }
            | RcvError::Whatever { .. } => EXIT_BAD_ARGUMENTS,
            _ => EXIT_FAILURE,
        }
    }
}

/// A ballot, as parsed by the readers.
/// This is before resolving the candidate codes.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub count: Option<u64>,
    pub choices: Vec<String>,
}

fn result_to_json(rs: &ElectionResult) -> JSValue {
    let mut preferences: JSMap<String, JSValue> = JSMap::new();
    for (name, row) in rs.candidates.iter().zip(rs.preferences.iter()) {
        let mut counts: JSMap<String, JSValue> = JSMap::new();
        for (other, count) in rs.candidates.iter().zip(row.iter()) {
            if other != name {
                counts.insert(other.clone(), json!(count));
            }
        }
        preferences.insert(name.clone(), JSValue::Object(counts));
    }

    let pairs: Vec<JSValue> = rs
        .pairs
        .iter()
        .map(|p| {
            json!({
                "winner": p.winner,
                "loser": p.loser,
                "strength": p.strength,
                "opposition": p.opposition,
                "locked": p.locked,
            })
        })
        .collect();

    json!({
        "candidates": rs.candidates,
        "voters": rs.voters,
        "preferences": preferences,
        "pairs": pairs,
        "sources": rs.sources,
        "tiebreak": rs.tiebreak_applied,
        "winner": rs.winner,
    })
}

fn build_summary_js(config: Option<&RcvConfig>, rs: &ElectionResult) -> RcvResult<JSValue> {
    let c = OutputConfig::from_settings(
        config.and_then(|c| c.output_settings.as_ref()),
        config.and_then(|c| c.rules.rules_description.clone()),
    );
    let mut js = result_to_json(rs);
    js["config"] = serde_json::to_value(&c).context(ParsingJsonSnafu {})?;
    Ok(js)
}

fn validate_rules(rcv_rules: &RcvRules, args: &Args) -> RcvResult<ElectionRules> {
    let mode = args
        .tiebreak
        .clone()
        .or_else(|| rcv_rules.tiebreak_mode.clone())
        .unwrap_or_else(|| "stop".to_string());
    let tiebreak_mode = match mode.as_str() {
        "stop" => TieBreakMode::Reject,
        "useCandidateOrder" => TieBreakMode::UseCandidateOrder,
        "random" => {
            let seed = match (args.seed, rcv_rules.random_seed.clone()) {
                (Some(x), _) => x,
                (None, Some(s)) => match s.parse::<u32>() {
                    Result::Ok(x) => x,
                    Result::Err(_) => whatever!("Cannot parse the random seed {:?}", s),
                },
                (None, None) => whatever!("The random tiebreak mode requires a seed"),
            };
            TieBreakMode::Random(seed)
        }
        x => {
            whatever!("Unknown tiebreak mode {:?}", x)
        }
    };
    Ok(ElectionRules { tiebreak_mode })
}

fn read_ballot_source(root: &Path, cfs: &FileSource) -> RcvResult<Vec<ParsedBallot>> {
    let p: PathBuf = root.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_ballots(&p2, cfs),
        "xlsx" => io_xlsx::read_xlsx_ballots(&p2, cfs),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

/// Replaces the candidate codes by the candidate names. A choice matching a
/// candidate name is kept as is, even if it is also the code of another candidate.
fn validate_ballot(
    pb: &ParsedBallot,
    names: &HashSet<String>,
    codes: &HashMap<String, String>,
) -> Vec<String> {
    pb.choices
        .iter()
        .map(|c| match codes.get(c) {
            Some(name) if !names.contains(c) => name.clone(),
            _ => c.clone(),
        })
        .collect()
}

fn add_parsed_ballots(
    builder: &mut Builder,
    ballots: &[ParsedBallot],
    names: &HashSet<String>,
    codes: &HashMap<String, String>,
) -> RcvResult<()> {
    for pb in ballots.iter() {
        let ranks = validate_ballot(pb, names, codes);
        debug!("Choices for ballot {:?}: {:?}", pb.id, ranks);
        // Default of 1 if not specified
        let count = pb.count.unwrap_or(1);
        if let Err(e) = builder.add_ballot(&ranks, count) {
            warn!("Rejected ballot {:?}: {}", pb.id, e);
            return Err(e).context(VotingSnafu {});
        }
    }
    Ok(())
}

pub(crate) fn read_prompted_ballots<R: BufRead, W: Write>(
    reader: &mut PromptReader<R, W>,
    builder: &mut Builder,
    voters: Option<u32>,
) -> RcvResult<()> {
    let voter_count = match voters {
        Some(x) => x,
        None => reader.read_voter_count()?,
    };
    info!("Reading the rankings of {} voters", voter_count);
    for _ in 0..voter_count {
        let ranks = reader.read_ranking(builder.num_candidates(), |rank, name| {
            builder.check_name(rank, name).context(VotingSnafu {})
        })?;
        builder.add_ballot_simple(&ranks).context(VotingSnafu {})?;
    }
    Ok(())
}

fn read_interactive_ballots(builder: &mut Builder, voters: Option<u32>) -> RcvResult<()> {
    let stdin = io::stdin();
    // Prompts would only get in the way of piped input.
    let show_prompts = stdin.is_terminal();
    let mut reader = PromptReader::new(stdin.lock(), io::stdout(), show_prompts);
    read_prompted_ballots(&mut reader, builder, voters)
}

fn write_summary(
    pretty_js: &str,
    out: Option<&str>,
    config: Option<&RcvConfig>,
    root: &Path,
) -> RcvResult<()> {
    let output_directory = config
        .and_then(|c| c.output_settings.as_ref())
        .and_then(|s| s.output_directory.clone());
    match (out, output_directory) {
        // Printed after the winner.
        (Some("stdout"), _) => {}
        (Some(path), _) => {
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
            info!("Summary written to {}", path);
        }
        (None, Some(dir)) => {
            let dir_p = root.join(dir);
            let path = dir_p.join("summary.json").display().to_string();
            fs::create_dir_all(&dir_p).context(WritingOutputSnafu { path: path.clone() })?;
            fs::write(&path, pretty_js).context(WritingOutputSnafu { path: path.clone() })?;
            info!("Summary written to {}", path);
        }
        (None, None) => {}
    }
    Ok(())
}

fn check_reference(pretty_js: &str, reference_path: &str) -> RcvResult<()> {
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {
            path: reference_path,
        }
        .fail();
    }
    Ok(())
}

/// Runs one election from the command line arguments and prints the winner.
pub fn run_election(args: &Args) -> RcvResult<ElectionResult> {
    run_election_with(args, &mut io::stdout())
}

fn run_election_with<W: Write>(args: &Args, stdout: &mut W) -> RcvResult<ElectionResult> {
    let (config, root): (Option<RcvConfig>, PathBuf) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (Some(config), root)
        }
        None => (None, PathBuf::new()),
    };

    let candidates: Vec<String> = match &config {
        Some(c) => c.candidates.iter().map(|c| c.name.clone()).collect(),
        None => args.candidates.clone(),
    };
    ensure!(!candidates.is_empty(), TooFewArgumentsSnafu {});

    let names: HashSet<String> = candidates.iter().cloned().collect();
    let codes: HashMap<String, String> = config
        .iter()
        .flat_map(|c| c.candidates.iter())
        .filter_map(|c| match &c.code {
            Some(code) if !code.is_empty() => Some((code.clone(), c.name.clone())),
            _ => None,
        })
        .collect();

    let default_rules = RcvRules::default();
    let rules = validate_rules(
        config.as_ref().map(|c| &c.rules).unwrap_or(&default_rules),
        args,
    )?;

    let mut builder = Builder::new(&rules)
        .context(VotingSnafu {})?
        .candidates(&candidates)
        .context(VotingSnafu {})?;

    if let Some(input_path) = &args.input {
        let cfs = FileSource::from_input(
            input_path,
            args.input_type.clone(),
            args.excel_worksheet_name.clone(),
        );
        let ballots = read_ballot_source(Path::new(""), &cfs)?;
        add_parsed_ballots(&mut builder, &ballots, &names, &codes)?;
    } else if let Some(c) = config
        .as_ref()
        .filter(|c| !c.ballot_sources.is_empty() || !c.ballots.is_empty())
    {
        for cfs in c.ballot_sources.iter() {
            let ballots = read_ballot_source(&root, cfs)?;
            add_parsed_ballots(&mut builder, &ballots, &names, &codes)?;
        }
        let inline: Vec<ParsedBallot> = c
            .ballots
            .iter()
            .map(|choices| ParsedBallot {
                id: None,
                count: Some(1),
                choices: choices.clone(),
            })
            .collect();
        add_parsed_ballots(&mut builder, &inline, &names, &codes)?;
    } else {
        read_interactive_ballots(&mut builder, args.voters)?;
    }

    let result = builder.resolve().context(VotingSnafu {})?;

    // Assemble the final json
    let result_js = build_summary_js(config.as_ref(), &result)?;
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_summary(
        &pretty_js_stats,
        args.out.as_deref(),
        config.as_ref(),
        &root,
    )?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(&pretty_js_stats, reference_path)?;
    }

    // Nothing is printed unless every step succeeded.
    writeln!(stdout, "{}", result.winner).context(WritingOutputSnafu { path: "stdout" })?;
    if args.out.as_deref() == Some("stdout") {
        writeln!(stdout, "{}", pretty_js_stats).context(WritingOutputSnafu { path: "stdout" })?;
    }

    Ok(result)
}
