use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use log::error;

use ll1_helper::{
    grammar::{config::ParserConfig, error::Error},
    Grammar, Pipeline,
};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Productions before and after each transformation
    Prod,
    /// FIRST and FOLLOW sets
    Ff,
    /// LL(1) parsing table
    Table,
    /// Step-by-step parse of every input file
    Trace,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Plain,
    Latex,
    Json,
}

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// File containing the grammar, one production per line
    grammar: PathBuf,

    /// Files with one sentence per line to parse
    inputs: Vec<PathBuf>,

    /// What to print (default: everything)
    #[arg(short, long, value_enum)]
    output: Vec<Output>,

    #[arg(short, long, value_enum, default_value = "plain")]
    format: OutputFormat,

    /// JSON file with parser limits
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "N")]
    max_stack_depth: Option<usize>,

    #[arg(long, value_name = "N")]
    max_steps: Option<usize>,

    /// Write to FILE instead of stdout
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,
}

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(cli: &Cli) -> Result<ParserConfig, Error> {
    let mut config = match &cli.config {
        Some(path) => ParserConfig::from_json(&read(path)?)?,
        None => ParserConfig::default(),
    };
    if let Some(n) = cli.max_stack_depth {
        config.max_stack_depth = n;
    }
    if let Some(n) = cli.max_steps {
        config.max_steps = n;
    }
    Ok(config)
}

fn render(cli: &Cli, p: &Pipeline, sections: &mut Vec<String>) -> bool {
    let wants = |o: Output| cli.output.is_empty() || cli.output.contains(&o);
    let mut ok = true;

    if wants(Output::Prod) {
        for (title, g) in [
            ("Original CFG:", &p.original),
            ("CFG after Left Factoring:", &p.factored),
            ("CFG after Left Recursion Removal:", &p.grammar),
        ] {
            let t = g.to_production_output_vec();
            sections.push(match cli.format {
                OutputFormat::Plain => format!("{}\n{}", title, t.to_plaintext()),
                OutputFormat::Latex => t.to_latex(),
                OutputFormat::Json => t.to_json(),
            });
        }
    }

    if wants(Output::Ff) {
        let t = p.grammar.to_first_follow_output_vec(&p.first, &p.follow);
        sections.push(match cli.format {
            OutputFormat::Plain => t.to_plaintext(),
            OutputFormat::Latex => t.to_latex(),
            OutputFormat::Json => t.to_json(),
        });
    }

    if wants(Output::Table) {
        let t = p.grammar.to_ll1_table_output(&p.table);
        sections.push(match cli.format {
            OutputFormat::Plain => t.to_plaintext(),
            OutputFormat::Latex => t.to_latex(),
            OutputFormat::Json => t.to_json(),
        });
    }

    if wants(Output::Trace) {
        for path in &cli.inputs {
            let input = match read(path) {
                Ok(input) => input,
                Err(e) => {
                    // other input files are still parsed
                    error!("{}", e);
                    ok = false;
                    continue;
                }
            };
            let report = p.parse_input(&input);
            let source = path.display().to_string();
            let t = p.grammar.to_parse_report_output(&source, &report);
            sections.push(match cli.format {
                OutputFormat::Json => t.to_json(),
                // no LaTeX layout for traces
                OutputFormat::Plain | OutputFormat::Latex => t.to_plaintext(),
            });
        }
    }

    ok
}

fn run(cli: &Cli) -> Result<bool, Error> {
    let config = load_config(cli)?;
    let g = Grammar::parse(&read(&cli.grammar)?)?;
    let p = Pipeline::build(g).with_config(config);

    let mut sections: Vec<String> = Vec::new();
    let ok = render(cli, &p, &mut sections);
    let text = sections.join("\n\n") + "\n";

    match &cli.out {
        Some(path) => fs::File::create(path)
            .and_then(|mut f| f.write_all(text.as_bytes()))
            .map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?,
        None => print!("{}", text),
    }

    Ok(ok)
}

fn main() -> ExitCode {
    env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
