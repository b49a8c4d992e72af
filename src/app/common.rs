use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgMatches};
use log::info;
use molsat::{
    designs::{CandidateLine, Template},
    io::{CandidateLinesReader, TemplateReader},
    sat::ExternalSolver,
};
use std::{fs::File, path::PathBuf};

pub(crate) const ARG_INPUT: &str = "INPUT";

pub(crate) fn input_args() -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(false)
        .help("the input file")
        .required(true)
}

pub(crate) fn multiple_input_args(help: &'static str) -> Arg<'static, 'static> {
    Arg::with_name(ARG_INPUT)
        .short("f")
        .empty_values(false)
        .multiple(true)
        .number_of_values(1)
        .help(help)
        .required(true)
}

pub(crate) const ARG_SOLVER: &str = "SOLVER";
pub(crate) const ARG_SOLVER_OPTIONS: &str = "SOLVER_OPTIONS";

pub(crate) fn solver_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_SOLVER)
            .long("solver")
            .empty_values(false)
            .multiple(false)
            .help("the path to the external SAT solver")
            .required(true),
        Arg::with_name(ARG_SOLVER_OPTIONS)
            .long("solver-opt")
            .requires(ARG_SOLVER)
            .empty_values(false)
            .multiple(true)
            .number_of_values(1)
            .allow_hyphen_values(true)
            .help("an option to give to the external SAT solver")
            .required(false),
    ]
}

pub(crate) const ARG_CNF_FILE: &str = "CNF_FILE";
pub(crate) const ARG_RESULT_FILE: &str = "RESULT_FILE";

pub(crate) fn instance_file_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name(ARG_CNF_FILE)
            .long("cnf-file")
            .empty_values(false)
            .multiple(false)
            .default_value("encoding.cnf")
            .help("the file the CNF instance is written to"),
        Arg::with_name(ARG_RESULT_FILE)
            .long("result-file")
            .empty_values(false)
            .multiple(false)
            .default_value("solver-output.txt")
            .help("the file the solver output is captured to"),
    ]
}

pub(crate) fn solver_from_matches(arg_matches: &ArgMatches<'_>) -> ExternalSolver {
    let program = PathBuf::from(arg_matches.value_of(ARG_SOLVER).unwrap());
    let options = arg_matches
        .values_of(ARG_SOLVER_OPTIONS)
        .map(|v| v.map(str::to_string).collect())
        .unwrap_or_default();
    ExternalSolver::new(program, options)
}

pub(crate) fn read_candidate_lines_file(path: &str) -> Result<Vec<CandidateLine>> {
    let mut file =
        File::open(path).with_context(|| format!("while opening the candidate-line file {}", path))?;
    let lines = CandidateLinesReader::default()
        .read(&mut file)
        .with_context(|| format!("while reading the candidate-line file {}", path))?;
    info!("loaded {} candidate line(s) from {}", lines.len(), path);
    Ok(lines)
}

pub(crate) fn read_template_files(paths: &[&str]) -> Result<Template> {
    let mut template: Option<Template> = None;
    let reader = TemplateReader::default();
    for path in paths {
        let mut file =
            File::open(path).with_context(|| format!("while opening the template file {}", path))?;
        match template.as_mut() {
            None => template = Some(
                reader
                    .read(&mut file)
                    .with_context(|| format!("while reading the template file {}", path))?,
            ),
            Some(t) => {
                reader
                    .read_layers_into(t, &mut file)
                    .with_context(|| format!("while reading the template file {}", path))?;
            }
        }
    }
    let template = template.ok_or_else(|| anyhow!("no template file was given"))?;
    info!(
        "loaded a template with {} layer(s) of order {}",
        template.n_layers(),
        template.order()
    );
    Ok(template)
}
