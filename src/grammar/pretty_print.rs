use std::collections::{BTreeSet, HashSet};

use crowbook_text_processing::escape;
use serde::Serialize;

use super::{
    first_follow::{FirstSets, FollowSets},
    ll1_table::LL1ParsingTable,
    predictive_parser::{InputReport, ParseAction},
    Grammar, Symbol, EPSILON,
};

#[derive(Debug, Clone, Serialize)]
pub struct ProductionOutput<'a> {
    pub left: &'a str,
    pub rights: Vec<Vec<&'a str>>,
}

impl ProductionOutput<'_> {
    pub fn to_plaintext(&self, left_width: usize, multiline: bool) -> String {
        self.rights
            .iter()
            .map(|right| right.join(" "))
            .enumerate()
            .map(|(i, right)| {
                if i == 0 {
                    format!("{:>width$} -> {}", self.left, right, width = left_width)
                } else if multiline {
                    format!("{:>width$}  | {}", "", right, width = left_width)
                } else {
                    format!(" | {}", right)
                }
            })
            .collect::<Vec<_>>()
            .join(if multiline { "\n" } else { "" })
    }

    pub fn to_latex(&self, and_sign: bool, terminal_set: &HashSet<&str>) -> String {
        if self.rights.is_empty() {
            return String::new();
        }

        let left = if and_sign {
            format!("{} & \\rightarrow &", escape::tex(self.left))
        } else {
            format!("{} \\rightarrow ", escape::tex(self.left))
        };
        let right = self
            .rights
            .iter()
            .map(|right| {
                right
                    .iter()
                    .map(|s| {
                        if terminal_set.contains(s) {
                            format!("\\text{{{}}}", escape::tex(*s))
                        } else {
                            escape::tex(*s).to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(" \\ ")
            })
            .collect::<Vec<_>>()
            .join(" \\mid ");

        let output = left + &right;
        output.replace(EPSILON, "\\epsilon")
    }
}

#[derive(Serialize)]
pub struct ProductionOutputVec<'a> {
    productions: Vec<ProductionOutput<'a>>,
    #[serde(skip)]
    terminals: HashSet<&'a str>,
}

impl ProductionOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let left_max_len = self
            .productions
            .iter()
            .map(|p| p.left.chars().count())
            .max()
            .unwrap_or(0);
        self.productions
            .iter()
            .map(|s| s.to_plaintext(left_max_len, true))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_latex(&self) -> String {
        std::iter::once("\\[\\begin{array}{cll}".to_string())
            .chain(
                self.productions
                    .iter()
                    .map(|s| s.to_latex(true, &self.terminals)),
            )
            .chain(std::iter::once("\\end{array}\\]".to_string()))
            .collect::<Vec<String>>()
            .join("\\\\\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    fn terminal_name_set(&self) -> HashSet<&str> {
        self.terminals()
            .iter()
            .map(|&t| self.get_symbol_name(Symbol::Terminal(t)))
            .collect()
    }

    pub fn to_production_output_vec(&self) -> ProductionOutputVec {
        let productions = self
            .productions()
            .iter()
            .map(|production| ProductionOutput {
                left: self.get_symbol_name(Symbol::NonTerminal(production.left)),
                rights: production
                    .alternatives
                    .iter()
                    .map(|alt| self.alternative_to_vec_str(alt))
                    .collect(),
            })
            .collect();
        ProductionOutputVec {
            productions,
            terminals: self.terminal_name_set(),
        }
    }
}

#[derive(Serialize)]
struct FirstFollowOutput<'a> {
    name: &'a str,
    nullable: bool,
    first: Vec<&'a str>,
    follow: Vec<&'a str>,
}

impl FirstFollowOutput<'_> {
    fn to_plaintext(&self, name_width: usize) -> String {
        format!(
            "{:>width$} | {} | {{ {} }} | {{ {} }}",
            self.name,
            self.nullable,
            self.first.join(", "),
            self.follow.join(", "),
            width = name_width
        )
    }

    fn to_latex(&self) -> String {
        fn f(a: &[&str]) -> String {
            a.iter()
                .map(|s| escape::tex(*s))
                .collect::<Vec<_>>()
                .join(r"\ ")
                .replace(EPSILON, r"$\epsilon$")
        }

        format!(
            "{} & {} & {} & {}",
            escape::tex(self.name),
            self.nullable,
            f(&self.first),
            f(&self.follow)
        )
    }
}

#[derive(Serialize)]
pub struct FirstFollowOutputVec<'a> {
    data: Vec<FirstFollowOutput<'a>>,
}

impl FirstFollowOutputVec<'_> {
    pub fn to_plaintext(&self) -> String {
        let width = self
            .data
            .iter()
            .map(|s| s.name.chars().count())
            .max()
            .unwrap_or(0);
        self.data
            .iter()
            .map(|s| s.to_plaintext(width))
            .collect::<Vec<String>>()
            .join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    pub fn to_latex(&self) -> String {
        let content = self
            .data
            .iter()
            .map(|e| e.to_latex())
            .collect::<Vec<_>>()
            .join("\\\\\n ");

        "\\begin{tabular}{c|c|c|c}\n".to_string()
            + "Symbol & Nullable & First & Follow\\\\\\hline\n"
            + &content
            + "\\\\\n\\end{tabular}"
    }
}

impl Grammar {
    fn set_to_vec_str(&self, set: Option<&BTreeSet<Symbol>>) -> Vec<&str> {
        set.map(|set| set.iter().map(|s| self.get_symbol_name(*s)).collect())
            .unwrap_or_default()
    }

    pub fn to_first_follow_output_vec(
        &self,
        first: &FirstSets,
        follow: &FollowSets,
    ) -> FirstFollowOutputVec {
        let data = self
            .non_terminals()
            .iter()
            .map(|&nt| FirstFollowOutput {
                name: self.get_symbol_name(Symbol::NonTerminal(nt)),
                nullable: first.is_nullable(nt),
                first: self.set_to_vec_str(first.get(nt)),
                follow: self.set_to_vec_str(follow.get(nt)),
            })
            .collect();
        FirstFollowOutputVec { data }
    }
}

#[derive(Serialize)]
pub struct LL1ParsingTableOutput<'a> {
    terminals: Vec<&'a str>,
    rows: Vec<(&'a str, Vec<Option<ProductionOutput<'a>>>)>,
    conflicts: Vec<String>,
}

impl LL1ParsingTableOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut header: Vec<String> = vec![String::new()];
        header.extend(self.terminals.iter().map(|&t| t.to_string()));
        let mut output: Vec<Vec<String>> = vec![header];
        for (left, row) in &self.rows {
            let mut line: Vec<String> = vec![left.to_string()];
            line.extend(row.iter().map(|production| match production {
                Some(production) => production.to_plaintext(left.chars().count(), false),
                None => String::new(),
            }));
            output.push(line);
        }

        let width: Vec<usize> = (0..output[0].len())
            .map(|j| {
                output
                    .iter()
                    .map(|line| line[j].chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let table = output
            .iter()
            .map(|line| {
                line.iter()
                    .enumerate()
                    .map(|(i, s)| format!("{:>width$}", s, width = width[i]))
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n");

        if self.conflicts.is_empty() {
            table
        } else {
            table + "\n\n" + &self.conflicts.join("\n")
        }
    }

    pub fn to_latex(&self) -> String {
        let mut header: Vec<String> = vec![format!(
            "\\[\\begin{{array}}{{c{}}}\n",
            "|l".repeat(self.terminals.len()),
        )];
        header.extend(
            self.terminals
                .iter()
                .map(|&t| format!("\\text{{{}}}", escape::tex(t))),
        );
        let header = header.join(" & ");

        let terminal_set: HashSet<&str> = self.terminals.iter().cloned().collect();
        let output = self
            .rows
            .iter()
            .map(|(left, row)| {
                std::iter::once(escape::tex(*left).to_string())
                    .chain(row.iter().map(|production| match production {
                        Some(production) => production.to_latex(false, &terminal_set),
                        None => String::new(),
                    }))
                    .collect::<Vec<_>>()
                    .join(" & ")
            })
            .collect::<Vec<_>>()
            .join("\\\\\n");

        header + "\\\\\\hline\n" + &output + "\n\\end{array}\\]"
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    pub fn to_ll1_table_output(&self, table: &LL1ParsingTable) -> LL1ParsingTableOutput {
        let terminals = table
            .columns()
            .iter()
            .map(|&t| self.get_symbol_name(t))
            .collect();
        let rows = table
            .rows()
            .iter()
            .enumerate()
            .map(|(i, &nt)| {
                let left = self.get_symbol_name(Symbol::NonTerminal(nt));
                let row = (0..table.columns().len())
                    .map(|j| {
                        table.cell(i, j).map(|entry| ProductionOutput {
                            left,
                            rights: vec![self.alternative_to_vec_str(self.alternative_of(entry))],
                        })
                    })
                    .collect();
                (left, row)
            })
            .collect();
        let conflicts = table
            .conflicts()
            .iter()
            .map(|c| c.to_error(self).to_string())
            .collect();
        LL1ParsingTableOutput {
            terminals,
            rows,
            conflicts,
        }
    }
}

#[derive(Serialize)]
struct StepOutput<'a> {
    stack: Vec<&'a str>,
    input: &'a str,
    action: String,
}

#[derive(Serialize)]
struct LineOutput<'a> {
    line: usize,
    text: &'a str,
    steps: Vec<StepOutput<'a>>,
    errors: Vec<String>,
    aborted: Option<String>,
    error_count: usize,
}

#[derive(Serialize)]
pub struct ParseReportOutput<'a> {
    source: &'a str,
    lines: Vec<LineOutput<'a>>,
    total_errors: usize,
}

impl ParseReportOutput<'_> {
    pub fn to_plaintext(&self) -> String {
        let mut output: Vec<String> =
            vec![format!("Parsing Results for Input File: {}\n", self.source)];
        for line in &self.lines {
            output.push(format!("=== Parsing Line {}: \"{}\" ===", line.line, line.text));
            for step in &line.steps {
                output.push(format!("Stack: {}\tInput: {}", step.stack.join(" "), step.input));
                output.push(step.action.clone());
            }
            for error in &line.errors {
                output.push(format!("Line {}: Syntax Error - {}", line.line, error));
            }
            output.push(match &line.aborted {
                Some(reason) => format!("Line {}: Parsing aborted - {}", line.line, reason),
                None if line.error_count == 0 => {
                    format!("Line {}: Parsing completed successfully", line.line)
                }
                None => format!(
                    "Line {}: Parsing completed with {} errors",
                    line.line, line.error_count
                ),
            });
            output.push(String::new());
        }
        output.push(format!(
            "Parsing completed with a total of {} errors.",
            self.total_errors
        ));
        output.join("\n")
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl Grammar {
    fn action_to_string(&self, action: &ParseAction) -> String {
        match action {
            ParseAction::Match(symbol) => {
                format!("Action: Match {}", self.get_symbol_name(*symbol))
            }
            ParseAction::Expand(entry) => {
                format!("Action: Expand {}", self.entry_to_string(*entry))
            }
            ParseAction::Error(error) => format!("Error: {}", error),
        }
    }

    /// `source` names the input in the report header, usually a file path.
    pub fn to_parse_report_output<'a>(
        &'a self,
        source: &'a str,
        report: &'a InputReport,
    ) -> ParseReportOutput<'a> {
        let lines = report
            .lines
            .iter()
            .map(|line| {
                let (outcome, aborted) = match &line.result {
                    Ok(outcome) => (outcome, None),
                    // keep the trace up to the limit
                    Err(e) => (&e.partial, Some(e.cause.to_string())),
                };
                let steps = outcome
                    .steps
                    .iter()
                    .map(|step| StepOutput {
                        stack: self.alternative_to_vec_str(&step.stack),
                        input: step.lookahead.as_str(),
                        action: self.action_to_string(&step.action),
                    })
                    .collect();
                let errors = outcome.errors.iter().map(|e| e.to_string()).collect();
                LineOutput {
                    line: line.line,
                    text: line.text.as_str(),
                    steps,
                    errors,
                    aborted,
                    error_count: line.error_count(),
                }
            })
            .collect();
        ParseReportOutput {
            source,
            lines,
            total_errors: report.total_errors(),
        }
    }
}
