use std::cmp::Ordering;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use ctm_cli::types::{CriteriaSummary, MatchSummary};
use ctm_model::{AgeBound, ConditionSet, IssueKind, RunIssue};

pub fn print_match_summary(summary: &MatchSummary) {
    println!("Patients: {}", summary.patients_dir.display());
    println!("Trials: {}", summary.trials_dir.display());
    println!("Reference year: {}", summary.reference_year);
    match &summary.outputs {
        Some(outputs) => {
            for path in outputs.paths() {
                println!("Wrote: {}", path.display());
            }
        }
        None => println!("Dry run: no files written"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Patient"),
        header_cell("Eligible"),
        header_cell("Trials"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for result in &summary.run.results {
        let trial_ids: Vec<&str> = result
            .eligible_trials
            .iter()
            .map(|t| t.trial_id.as_str())
            .collect();
        let trials_cell = if trial_ids.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(trial_ids.join(", "))
        };
        table.add_row(vec![
            Cell::new(&result.patient_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            count_cell(result.eligible_trials.len(), Color::Green),
            trials_cell,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        count_cell(summary.run.eligible_pair_count(), Color::Green).add_attribute(Attribute::Bold),
        Cell::new(format!(
            "{} patients x {} trials",
            summary.patient_count, summary.trial_count
        ))
        .fg(Color::Cyan),
    ]);
    println!("{table}");

    print_issue_table(&summary.run.issues);
    let errors = summary.run.error_count();
    if errors > 0 {
        eprintln!("{errors} record(s) were skipped or failed.");
    }
}

pub fn print_criteria_summary(summary: &CriteriaSummary) {
    println!("Trials: {}", summary.trials_dir.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Trial"),
        header_cell("Name"),
        header_cell("Min age"),
        header_cell("Max age"),
        header_cell("Inclusion"),
        header_cell("Exclusion"),
    ]);
    apply_table_style(&mut table);
    for trial in &summary.trials {
        table.add_row(vec![
            Cell::new(&trial.trial_id)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&trial.trial_name),
            age_cell(trial.min_age),
            age_cell(trial.max_age),
            conditions_cell(&trial.inclusion_conditions),
            conditions_cell(&trial.exclusion_conditions),
        ]);
    }
    println!("{table}");
    print_issue_table(&summary.issues);
}

fn print_issue_table(issues: &[RunIssue]) {
    if issues.is_empty() {
        return;
    }
    let mut ordered: Vec<&RunIssue> = issues.iter().collect();
    ordered.sort_by(|a, b| {
        let severity = b.kind.is_error().cmp(&a.kind.is_error());
        if severity != Ordering::Equal {
            return severity;
        }
        a.kind.cmp(&b.kind).then_with(|| a.record.cmp(&b.record))
    });

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Severity"),
        header_cell("Kind"),
        header_cell("Record"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Center);
    for issue in ordered {
        table.add_row(vec![
            severity_cell(issue.kind),
            Cell::new(issue.kind.as_str()),
            Cell::new(&issue.record),
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
    if table.column_count() >= 6 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(11)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::LowerBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
        ]);
    }
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
    if table.column_count() >= 3 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(55)),
        ]);
    }
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 4 {
        table.set_constraints(vec![
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(26)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(kind: IssueKind) -> Cell {
    if kind.is_error() {
        Cell::new("ERROR").fg(Color::Red)
    } else {
        Cell::new("WARN").fg(Color::Yellow)
    }
}

fn age_cell(bound: AgeBound) -> Cell {
    if bound.is_default() {
        dim_cell(bound)
    } else {
        Cell::new(bound)
    }
}

fn conditions_cell(conditions: &ConditionSet) -> Cell {
    if conditions.is_empty() {
        dim_cell("-")
    } else {
        Cell::new(conditions.as_slice().join(", "))
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
