// Reading ballots from Excel files.

use calamine::{open_workbook, DataType, Range, Reader, Xlsx};

use crate::rcv::{
    io_common::{make_default_id, trim_blank_tail},
    *,
};

pub fn read_xlsx_ballots(path: &str, cfs: &FileSource) -> RcvResult<Vec<ParsedBallot>> {
    let default_id = make_default_id(path);

    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;
    let count_idx_o = cfs.count_column_index_int()?;
    let first_row = cfs.first_vote_row_index()?;

    let wrange = get_range(path, cfs)?;

    // The range starts at the first non-empty cell of the sheet.
    let (row_offset, col_offset) = wrange
        .start()
        .map(|(r, c)| (r as usize, c as usize))
        .unwrap_or((0, 0));

    let mut res: Vec<ParsedBallot> = Vec::new();
    for (idx, row) in wrange.rows().enumerate() {
        if idx + row_offset < first_row {
            continue;
        }
        let lineno = idx + row_offset + 1;

        let id = match id_idx_o.and_then(|i| cell_at(row, i, col_offset)) {
            Some(cell) if !cell.is_empty() => read_cell(cell, lineno)?,
            _ => default_id(lineno),
        };

        let count: Option<u64> = match count_idx_o {
            Some(count_idx) => Some(read_count(cell_at(row, count_idx, col_offset), lineno)?),
            None => None,
        };

        let mut choices: Vec<String> = Vec::new();
        for cell in row.iter().skip(choices_start_col.saturating_sub(col_offset)) {
            choices.push(read_cell(cell, lineno)?);
        }
        let choices = trim_blank_tail(choices);
        if choices.is_empty() {
            debug!("read_xlsx_ballots: lineno {}: empty row, skipped", lineno);
            continue;
        }
        debug!("read_xlsx_ballots: lineno: {:?} row: {:?}", lineno, &choices);

        res.push(ParsedBallot {
            id: Some(id),
            count,
            choices,
        });
    }
    Ok(res)
}

fn cell_at(row: &[DataType], col: usize, col_offset: usize) -> Option<&DataType> {
    col.checked_sub(col_offset).and_then(|c| row.get(c))
}

fn read_cell(cell: &DataType, lineno: usize) -> RcvResult<String> {
    match cell {
        DataType::String(s) => Ok(s.trim().to_string()),
        DataType::Empty => Ok("".to_string()),
        // Numeric ids or candidate codes
        DataType::Int(i) => Ok(i.to_string()),
        DataType::Float(f) if f.fract() == 0.0 => Ok(format!("{}", *f as i64)),
        _ => ExcelWrongCellTypeSnafu {
            lineno,
            content: format!("{:?}", cell),
        }
        .fail(),
    }
}

fn read_count(cell: Option<&DataType>, lineno: usize) -> RcvResult<u64> {
    let content = format!("{:?}", cell);
    let res = match cell {
        Some(DataType::Int(i)) if *i >= 0 => Some(*i as u64),
        Some(DataType::Float(f)) if *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
        Some(DataType::String(s)) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    res.context(ParsingCountSnafu { lineno, content })
}

fn get_range(path: &str, cfs: &FileSource) -> RcvResult<Range<DataType>> {
    debug!(
        "read_xlsx_ballots: path: {:?} worksheet: {:?}",
        path, &cfs.excel_worksheet_name
    );
    let mut workbook: Xlsx<_> = open_workbook(path).context(OpeningExcelSnafu { path })?;

    let wrange = match &cfs.excel_worksheet_name {
        // A worksheet name was provided, use it.
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name })?,
        None => workbook.worksheet_range_at(0).context(EmptyExcelSnafu {})?,
    };
    wrange.context(OpeningExcelSnafu { path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(read_cell(&DataType::String(" Bob ".to_string()), 1).unwrap(), "Bob");
        assert_eq!(read_cell(&DataType::Empty, 1).unwrap(), "");
        assert_eq!(read_cell(&DataType::Float(3.0), 1).unwrap(), "3");
        assert!(matches!(
            read_cell(&DataType::Bool(true), 4),
            Err(RcvError::ExcelWrongCellType { lineno: 4, .. })
        ));
    }

    #[test]
    fn counts() {
        assert_eq!(read_count(Some(&DataType::Float(2.0)), 1).unwrap(), 2);
        assert_eq!(read_count(Some(&DataType::Int(5)), 1).unwrap(), 5);
        assert_eq!(read_count(Some(&DataType::String("7".to_string())), 1).unwrap(), 7);
        assert!(read_count(Some(&DataType::Float(1.5)), 1).is_err());
        assert!(read_count(None, 2).is_err());
    }

    fn fixture() -> (String, FileSource) {
        let path = format!(
            "{}/tests/data/xlsx_offset/ballots.xlsx",
            env!("CARGO_MANIFEST_DIR")
        );
        let cfs: FileSource = serde_json::from_str(&format!(
            r#"{{"provider": "xlsx", "filePath": {:?}, "excelWorksheetName": "Ballots",
                "firstVoteRowIndex": 3, "idColumnIndex": "B", "countColumnIndex": "C",
                "firstVoteColumnIndex": "D"}}"#,
            path
        ))
        .unwrap();
        (path, cfs)
    }

    #[test]
    fn sheet_starting_after_first_column() {
        let (path, cfs) = fixture();
        let ballots = read_xlsx_ballots(&path, &cfs).unwrap();
        assert_eq!(ballots.len(), 3);
        assert_eq!(
            ballots[0],
            ParsedBallot {
                id: Some("v1".to_string()),
                count: Some(4),
                // The blank cell after the last rank is dropped.
                choices: vec!["Alice".to_string(), "Bob".to_string(), "Charlie".to_string()],
            }
        );
        assert_eq!(ballots[2].id, Some("v3".to_string()));
        assert_eq!(ballots[2].count, Some(2));
    }

    #[test]
    fn unknown_worksheet() {
        let (path, mut cfs) = fixture();
        cfs.excel_worksheet_name = Some("Votes".to_string());
        assert!(matches!(
            read_xlsx_ballots(&path, &cfs),
            Err(RcvError::MissingWorksheet { .. })
        ));
    }

    #[test]
    fn first_worksheet_by_default() {
        let (path, mut cfs) = fixture();
        cfs.excel_worksheet_name = None;
        // The first sheet only holds a note above the first ballot row.
        assert!(read_xlsx_ballots(&path, &cfs).unwrap().is_empty());
    }

    #[test]
    fn missing_workbook() {
        let cfs = FileSource::from_input("/nonexistent/tideman.xlsx", Some("xlsx".to_string()), None);
        let err = read_xlsx_ballots("/nonexistent/tideman.xlsx", &cfs).unwrap_err();
        assert!(matches!(err, RcvError::OpeningExcel { .. }));
    }
}
