use crate::export::format_display;
use crate::types::history::HistoryEntry;
use crate::types::score::Score;

pub const HEADER: [&str; 6] = ["Date", "Name", "Total", "Excluded", "Included", "All"];
const LIST_SEPARATOR: &str = " | ";

/// Header row plus one row per entry, numbers in the comma display form.
pub fn to_delimited(entries: &[HistoryEntry], delimiter: char) -> String {
    let mut output = String::new();
    push_row(&mut output, HEADER.iter().map(|cell| cell.to_string()), delimiter);

    for entry in entries {
        let result = &entry.result;
        let cells = [
            entry.timestamp.clone(),
            result.participant_name.clone(),
            format_display(result.total),
            join_scores(&result.excluded_scores),
            join_scores(&result.included_scores),
            join_scores(&result.all_scores),
        ];
        push_row(&mut output, cells.into_iter(), delimiter);
    }

    output
}

fn join_scores(scores: &[Score]) -> String {
    scores
        .iter()
        .map(|score| format_display(score.value()))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn push_row(output: &mut String, cells: impl Iterator<Item = String>, delimiter: char) {
    let row = cells
        .map(|cell| quote_if_needed(cell, delimiter))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string());
    output.push_str(&row);
    output.push('\n');
}

fn quote_if_needed(cell: String, delimiter: char) -> String {
    if cell.contains(delimiter) || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
    {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell
    }
}
