use std::path::Path;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Ballot ids for files without an id column: the file name and the line number.
pub fn make_default_id(path: &str) -> impl Fn(usize) -> String {
    let simplified_file_name = simplify_file_name(path);
    move |lineno| format!("{}-{:08}", simplified_file_name, lineno)
}

/// Drops the empty cells at the end of a row.
///
/// Spreadsheets often pad rows. Blanks in the middle of a row are kept so that
/// the ballot gets rejected as incomplete.
pub fn trim_blank_tail(mut choices: Vec<String>) -> Vec<String> {
    while choices.last().map(|s| s.trim().is_empty()).unwrap_or(false) {
        choices.pop();
    }
    choices
}
