use crate::rcv::*;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;
use snafu::prelude::*;
use std::fs;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

/// The description of the contest, as written in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
}

impl OutputConfig {
    pub fn from_settings(
        settings: Option<&OutputSettings>,
        rules_description: Option<String>,
    ) -> OutputConfig {
        match settings {
            Some(s) => OutputConfig {
                contest: s.contest_name.clone(),
                date: s.contest_date.clone(),
                jurisdiction: s.contest_jurisdiction.clone(),
                office: s.contest_office.clone(),
                rules: rules_description,
            },
            None => OutputConfig {
                contest: "Election".to_string(),
                date: None,
                jurisdiction: None,
                office: None,
                rules: rules_description,
            },
        }
    }
}

/// A file of ballots. Row and column indexes are 1-based in the JSON file.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
    #[serde(rename = "countColumnIndex")]
    pub count_column_index: Option<JSValue>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// The source described by the --input flags: one header row, then one ballot per row
    /// with every column being a rank.
    pub fn from_input(
        path: &str,
        input_type: Option<String>,
        excel_worksheet_name: Option<String>,
    ) -> FileSource {
        FileSource {
            provider: input_type.unwrap_or_else(|| "csv".to_string()),
            file_path: path.to_string(),
            _first_vote_column_index: Some(JSValue::from(1)),
            _first_vote_row_index: Some(JSValue::from(2)),
            id_column_index: None,
            count_column_index: None,
            excel_worksheet_name,
        }
    }

    // All the accessors below return 0-based indexes.

    pub fn first_vote_column_index(&self) -> RcvResult<usize> {
        match self._first_vote_column_index {
            Some(_) => Ok(read_js_int(&self._first_vote_column_index)? - 1),
            None => Ok(0),
        }
    }

    pub fn first_vote_row_index(&self) -> RcvResult<usize> {
        match self._first_vote_row_index {
            Some(_) => Ok(read_js_int(&self._first_vote_row_index)? - 1),
            None => Ok(0),
        }
    }

    pub fn id_column_index_int(&self) -> RcvResult<Option<usize>> {
        match self.id_column_index {
            Some(_) => read_js_int(&self.id_column_index).map(|x| Some(x - 1)),
            None => Ok(None),
        }
    }

    pub fn count_column_index_int(&self) -> RcvResult<Option<usize>> {
        match self.count_column_index {
            Some(_) => read_js_int(&self.count_column_index).map(|x| Some(x - 1)),
            None => Ok(None),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvCandidate {
    pub name: String,
    pub code: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct RcvRules {
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "rulesDescription")]
    pub rules_description: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: Option<OutputSettings>,
    pub candidates: Vec<RcvCandidate>,
    #[serde(rename = "ballotSources", default)]
    pub ballot_sources: Vec<FileSource>,
    #[serde(default)]
    pub ballots: Vec<Vec<String>>,
    #[serde(default)]
    pub rules: RcvRules,
}

pub fn read_config(path: &str) -> RcvResult<RcvConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RcvConfig = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> RcvResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}

/// Reads a 1-based index: a number, a numeric string or an Excel column name ("A", "AB").
fn read_js_int(x: &Option<JSValue>) -> RcvResult<usize> {
    let res = match x {
        Some(JSValue::Number(n)) => n.as_u64().map(|x| x as usize),
        // Parsing the Excel-style columns
        Some(JSValue::String(s)) if !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic()) => {
            s.to_ascii_lowercase().chars().try_fold(0usize, |acc, c| {
                acc.checked_mul(26)?
                    .checked_add((c as usize) - ('a' as usize) + 1)
            })
        }
        Some(JSValue::String(s)) => s.parse::<usize>().ok(),
        _ => None,
    };
    res.filter(|x| *x >= 1).context(ParsingJsonNumberSnafu {
        content: format!("{:?}", x),
    })
}
