use clap::Parser;

/// Resolves an election with the ranked pairs (Tideman) method.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// The names of the candidates, in candidate order (at most 9). Ignored when --config is
    /// provided.
    #[clap(value_parser)]
    pub candidates: Vec<String>,

    /// (file path, optional) A JSON election description: candidates, ballot sources and rules.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) A reference file containing the summary of an election in JSON format. If provided,
    /// tideman will check that the computed summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON
    /// format to the given location. Setting this option overrides the output directory that may be
    /// specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) A file of ballots. If not specified and no ballot source is configured,
    /// the ballots are read interactively from the standard input.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or xlsx.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// The number of voters when reading ballots interactively. Asked for if not provided.
    #[clap(long, value_parser)]
    pub voters: Option<u32>,

    /// (default stop) What to do when several candidates remain undefeated: stop, useCandidateOrder
    /// or random.
    #[clap(long, value_parser)]
    pub tiebreak: Option<String>,

    /// The seed of the random tie-break.
    #[clap(long, value_parser)]
    pub seed: Option<u32>,

    /// When using an Excel file, indicates the name of the worksheet to use. The first worksheet
    /// is used otherwise.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
