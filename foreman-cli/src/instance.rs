//! Parser for the line-oriented instance format.
//!
//! An instance starts with a `counts` header giving the six dimensions, followed by one named
//! section per table. Matrix sections list one row per line, single-row sections list their
//! values on one line. Blank lines and lines starting with `#` are ignored.

use std::io::BufRead;
use std::str::FromStr;

use foreman_lib::containers::HashSet;
use foreman_lib::dataset::DatasetTables;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum InstanceParseError {
    #[error("failed to read instance file: {0}")]
    Io(#[from] std::io::Error),

    #[error("the instance must start with a 'counts' header")]
    MissingCounts,

    #[error(
        "line {line}: the counts header expects 6 values \
         (shifts lines stages workers equipments functions), got {found}"
    )]
    MalformedCounts { line: usize, found: usize },

    #[error("line {line}: '{token}' is not an integer")]
    InvalidInteger { line: usize, token: Box<str> },

    #[error("line {line}: expected a section name")]
    ExpectedSection { line: usize },

    #[error("line {line}: unknown section '{name}'")]
    UnknownSection { line: usize, name: Box<str> },

    #[error("line {line}: section '{name}' appears twice")]
    DuplicateSection { line: usize, name: &'static str },

    #[error("line {line}: section '{section}' expects a single row")]
    ExtraRow { section: &'static str, line: usize },

    #[error("missing section '{name}'")]
    MissingSection { name: &'static str },
}

const SECTION_NAMES: [&str; 14] = [
    "line_stage",
    "worker_shift",
    "experience",
    "experience_threshold",
    "age",
    "health",
    "salary",
    "preassign",
    "equipment_function",
    "equipment_productivity",
    "line_requirement",
    "min_line_productivity",
    "activation",
    "weights",
];

/// The sections every instance has to provide; `min_line_productivity`, `activation` and
/// `weights` fall back to the defaults of [`DatasetTables::new`] when absent.
const REQUIRED_SECTIONS: [&str; 11] = [
    "line_stage",
    "worker_shift",
    "experience",
    "experience_threshold",
    "age",
    "health",
    "salary",
    "preassign",
    "equipment_function",
    "equipment_productivity",
    "line_requirement",
];

/// Reads an instance into raw tables. Shape and value-range checking is left to
/// [`Dataset::populate`](foreman_lib::dataset::Dataset::populate).
pub(crate) fn parse_instance(source: impl BufRead) -> Result<DatasetTables, InstanceParseError> {
    let mut lines: Vec<(usize, String)> = Vec::new();
    for (index, line) in source.lines().enumerate() {
        let line = line?;
        let content = line.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        lines.push((index + 1, content.to_owned()));
    }

    let (counts_line, counts) = lines.first().ok_or(InstanceParseError::MissingCounts)?;
    let mut tokens = counts.split_whitespace();
    if tokens.next() != Some("counts") {
        return Err(InstanceParseError::MissingCounts);
    }
    let dimensions = tokens
        .map(|token| parse_token::<usize>(*counts_line, token))
        .collect::<Result<Vec<usize>, InstanceParseError>>()?;
    let &[shifts, line_count, stages, workers, equipments, functions] = &dimensions[..] else {
        return Err(InstanceParseError::MalformedCounts {
            line: *counts_line,
            found: dimensions.len(),
        });
    };

    let mut tables = DatasetTables::new(shifts, line_count, stages, workers, equipments, functions);
    let mut seen: HashSet<&'static str> = HashSet::default();

    let mut position = 1;
    while position < lines.len() {
        let (header_line, header) = &lines[position];
        let header_line = *header_line;
        position += 1;

        if !is_section_header(header) {
            return Err(InstanceParseError::ExpectedSection { line: header_line });
        }
        let Some(name) = canonical_name(header) else {
            return Err(InstanceParseError::UnknownSection {
                line: header_line,
                name: header.as_str().into(),
            });
        };
        if !seen.insert(name) {
            return Err(InstanceParseError::DuplicateSection {
                line: header_line,
                name,
            });
        }

        let mut rows = Vec::new();
        while position < lines.len() && !is_section_header(&lines[position].1) {
            let (row_line, row) = &lines[position];
            rows.push(parse_row(*row_line, row)?);
            position += 1;
        }

        match name {
            "line_stage" => tables.line_stage = rows,
            "worker_shift" => tables.worker_shift = rows,
            "experience" => tables.experience = rows,
            "preassign" => tables.preassign = rows,
            "equipment_function" => tables.equipment_function = rows,
            "line_requirement" => tables.line_requirement = rows,
            "experience_threshold" => {
                tables.experience_threshold = single_row(name, rows, header_line)?;
            }
            "age" => tables.age = single_row(name, rows, header_line)?,
            "health" => tables.health = single_row(name, rows, header_line)?,
            "salary" => tables.salary = single_row(name, rows, header_line)?,
            "equipment_productivity" => {
                tables.equipment_productivity = single_row(name, rows, header_line)?;
            }
            "min_line_productivity" => {
                tables.min_line_productivity = single_row(name, rows, header_line)?;
            }
            "activation" => tables.activation = single_row(name, rows, header_line)?,
            "weights" => tables.weights = single_row(name, rows, header_line)?,
            _ => unreachable!("canonical_name only returns catalogued sections"),
        }
    }

    if let Some(missing) = REQUIRED_SECTIONS
        .into_iter()
        .find(|&name| !seen.contains(name))
    {
        return Err(InstanceParseError::MissingSection { name: missing });
    }

    // A zero-width row cannot be written in the text format, so the function matrices are
    // rebuilt from the counts when there are no functions.
    if functions == 0 {
        if tables.equipment_function.is_empty() {
            tables.equipment_function = vec![Vec::new(); equipments];
        }
        if tables.line_requirement.is_empty() {
            tables.line_requirement = vec![Vec::new(); line_count];
        }
    }

    Ok(tables)
}

fn is_section_header(content: &str) -> bool {
    content
        .chars()
        .next()
        .is_some_and(|character| character.is_ascii_alphabetic())
}

fn canonical_name(name: &str) -> Option<&'static str> {
    SECTION_NAMES.into_iter().find(|&section| section == name)
}

fn parse_token<T: FromStr>(line: usize, token: &str) -> Result<T, InstanceParseError> {
    token
        .parse()
        .map_err(|_| InstanceParseError::InvalidInteger {
            line,
            token: token.into(),
        })
}

fn parse_row(line: usize, content: &str) -> Result<Vec<i32>, InstanceParseError> {
    content
        .split_whitespace()
        .map(|token| parse_token(line, token))
        .collect()
}

fn single_row(
    section: &'static str,
    mut rows: Vec<Vec<i32>>,
    header_line: usize,
) -> Result<Vec<i32>, InstanceParseError> {
    if rows.len() > 1 {
        return Err(InstanceParseError::ExtraRow {
            section,
            line: header_line,
        });
    }
    Ok(rows.pop().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Result<DatasetTables, InstanceParseError> {
        parse_instance(source.as_bytes())
    }

    const SMALL_INSTANCE: &str = "\
# a two-shift plant with one line
counts 2 1 2 2 1 1

line_stage
1 1
worker_shift
1 1
1 -1
experience
80 0
0 70
experience_threshold
50 50
age
30 40
health
90 80
salary
25 30
preassign
0 0
0 -2
equipment_function
3
equipment_productivity
60
line_requirement
2
";

    #[test]
    fn a_full_instance_parses_into_tables() {
        let tables = parse(SMALL_INSTANCE).expect("the instance parses");

        assert_eq!(tables.shifts, 2);
        assert_eq!(tables.lines, 1);
        assert_eq!(tables.stages, 2);
        assert_eq!(tables.workers, 2);
        assert_eq!(tables.equipments, 1);
        assert_eq!(tables.functions, 1);

        assert_eq!(tables.line_stage, vec![vec![1, 1]]);
        assert_eq!(tables.worker_shift, vec![vec![1, 1], vec![1, -1]]);
        assert_eq!(tables.experience, vec![vec![80, 0], vec![0, 70]]);
        assert_eq!(tables.experience_threshold, vec![50, 50]);
        assert_eq!(tables.preassign, vec![vec![0, 0], vec![0, -2]]);
        assert_eq!(tables.equipment_function, vec![vec![3]]);
        assert_eq!(tables.equipment_productivity, vec![60]);
        assert_eq!(tables.line_requirement, vec![vec![2]]);
    }

    #[test]
    fn optional_sections_keep_their_defaults() {
        let tables = parse(SMALL_INSTANCE).expect("the instance parses");

        assert_eq!(tables.min_line_productivity, vec![0]);
        assert_eq!(tables.activation, vec![1, 0, 0, 0, 0]);
        assert_eq!(tables.weights, vec![1, 1, -1, 1, -1]);
    }

    #[test]
    fn the_counts_header_must_come_first() {
        let result = parse("line_stage\n1 1\n");
        assert!(matches!(result, Err(InstanceParseError::MissingCounts)));
    }

    #[test]
    fn the_counts_header_needs_all_six_dimensions() {
        let result = parse("counts 2 1 2\n");
        assert!(matches!(
            result,
            Err(InstanceParseError::MalformedCounts { line: 1, found: 3 })
        ));
    }

    #[test]
    fn an_unknown_section_is_rejected_with_its_line() {
        let result = parse("counts 1 1 1 1 0 0\nbogus_section\n");
        assert!(matches!(
            result,
            Err(InstanceParseError::UnknownSection { line: 2, .. })
        ));
    }

    #[test]
    fn a_repeated_section_is_rejected() {
        let result = parse("counts 1 1 1 1 0 0\nage\n20\nage\n30\n");
        assert!(matches!(
            result,
            Err(InstanceParseError::DuplicateSection { name: "age", .. })
        ));
    }

    #[test]
    fn a_non_integer_token_is_rejected() {
        let result = parse("counts 1 1 1 1 0 0\nage\n4.5\n");
        assert!(matches!(
            result,
            Err(InstanceParseError::InvalidInteger { line: 3, .. })
        ));
    }

    #[test]
    fn a_missing_required_section_is_reported() {
        let source = "\
counts 1 1 1 1 0 0
line_stage
1
worker_shift
1
experience
0
experience_threshold
0
age
20
health
50
preassign
0
equipment_function
equipment_productivity
line_requirement
";
        let result = parse(source);
        assert!(matches!(
            result,
            Err(InstanceParseError::MissingSection { name: "salary" })
        ));
    }

    #[test]
    fn function_free_instances_round_trip_through_populate() {
        let source = "\
counts 1 1 1 1 1 0
line_stage
1
worker_shift
1
experience
0
experience_threshold
0
age
20
health
50
salary
10
preassign
0
equipment_function
equipment_productivity
30
line_requirement
";
        let tables = parse(source).expect("the instance parses");
        assert_eq!(tables.equipment_function, vec![Vec::<i32>::new()]);
        assert_eq!(tables.line_requirement, vec![Vec::<i32>::new()]);

        let _ = foreman_lib::Dataset::populate(tables).expect("the tables validate");
    }
}
