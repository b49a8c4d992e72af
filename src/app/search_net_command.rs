use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{AppSettings, Arg, ArgMatches, SubCommand};
use molsat::{
    designs::{LineKind, ParallelClass},
    encodings::{ClassSizes, CoverageMode, NetEncodingOptions, PairwiseStyle},
    search::{search_net, NetSearchOutcome},
};
use std::{path::Path, str::FromStr};

const CMD_NAME: &str = "search-net";

const ARG_COVERAGE: &str = "COVERAGE";
const ARG_PAIRWISE_STYLE: &str = "PAIRWISE_STYLE";
const ARG_NO_DISJOINTNESS: &str = "NO_DISJOINTNESS";
const ARG_NO_ORTHOGONALITY: &str = "NO_ORTHOGONALITY";
const ARG_CLASS_SIZE: &str = "CLASS_SIZE";

pub(crate) struct SearchNetCommand;

impl SearchNetCommand {
    pub(crate) fn new() -> Self {
        SearchNetCommand
    }
}

impl<'a> Command<'a> for SearchNetCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> clap::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Searches a net refining two classes of candidate lines")
            .setting(AppSettings::DisableVersion)
            .arg(common::multiple_input_args(
                "a candidate-line file (exactly two, one per parallel class)",
            ))
            .arg(
                Arg::with_name(ARG_COVERAGE)
                    .long("coverage")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["at-least-one", "exactly-one", "none"])
                    .default_value("at-least-one")
                    .help("the point-coverage policy"),
            )
            .arg(
                Arg::with_name(ARG_PAIRWISE_STYLE)
                    .long("pairwise-style")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["forbid-clause", "mutual-implications"])
                    .default_value("mutual-implications")
                    .help("the rendering of pairwise forbidding constraints"),
            )
            .arg(
                Arg::with_name(ARG_NO_DISJOINTNESS)
                    .long("no-disjointness")
                    .takes_value(false)
                    .help("skip the within-class disjointness constraints"),
            )
            .arg(
                Arg::with_name(ARG_NO_ORTHOGONALITY)
                    .long("no-orthogonality")
                    .takes_value(false)
                    .help("skip the cross-class orthogonality constraints"),
            )
            .arg(
                Arg::with_name(ARG_CLASS_SIZE)
                    .long("class-size")
                    .empty_values(false)
                    .multiple(true)
                    .number_of_values(1)
                    .help("a CLASS:KIND=COUNT selected-line count (e.g. 0:relational=9)")
                    .required(false),
            )
            .args(&common::solver_args())
            .args(&common::instance_file_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let paths = arg_matches
            .values_of(common::ARG_INPUT)
            .unwrap()
            .collect::<Vec<_>>();
        if paths.len() != 2 {
            return Err(anyhow!(
                "expected exactly two candidate-line files, found {}",
                paths.len()
            ));
        }
        let first = ParallelClass::with_lines("A", common::read_candidate_lines_file(paths[0])?);
        let second = ParallelClass::with_lines("B", common::read_candidate_lines_file(paths[1])?);
        let options = options_from_matches(arg_matches)?;
        let solver = common::solver_from_matches(arg_matches);
        let outcome = search_net(
            [&first, &second],
            options,
            &solver,
            Path::new(arg_matches.value_of(common::ARG_CNF_FILE).unwrap()),
            Path::new(arg_matches.value_of(common::ARG_RESULT_FILE).unwrap()),
        )?;
        match outcome {
            NetSearchOutcome::Satisfiable { solution, defect } => {
                println!("s SATISFIABLE");
                for (c, class) in [&first, &second].iter().enumerate() {
                    let selected = solution
                        .selected(c)
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>();
                    println!("c class {}: lines {}", class.name(), selected.join(" "));
                }
                match defect {
                    None => Ok(()),
                    Some(d) => Err(anyhow!("the solution violates the net invariants: {}", d)),
                }
            }
            NetSearchOutcome::Unsatisfiable => {
                println!("s UNSATISFIABLE");
                Ok(())
            }
            NetSearchOutcome::Unknown => {
                println!("s UNKNOWN");
                Ok(())
            }
        }
    }
}

fn options_from_matches(arg_matches: &ArgMatches<'_>) -> Result<NetEncodingOptions> {
    let coverage = match arg_matches.value_of(ARG_COVERAGE).unwrap() {
        "none" => None,
        mode => Some(CoverageMode::from_str(mode).unwrap()),
    };
    let pairwise_style =
        PairwiseStyle::from_str(arg_matches.value_of(ARG_PAIRWISE_STYLE).unwrap()).unwrap();
    let mut class_sizes = [ClassSizes::default(); 2];
    if let Some(values) = arg_matches.values_of(ARG_CLASS_SIZE) {
        for v in values {
            let (class_and_kind, count) = v
                .split_once('=')
                .ok_or_else(|| anyhow!(r#"expected CLASS:KIND=COUNT, found "{}""#, v))?;
            let (class, kind) = class_and_kind
                .split_once(':')
                .ok_or_else(|| anyhow!(r#"expected CLASS:KIND=COUNT, found "{}""#, v))?;
            let class = class
                .parse::<usize>()
                .context("while parsing a class index")?;
            if class >= 2 {
                return Err(anyhow!("class indices are 0 and 1, found {}", class));
            }
            let count = count
                .parse::<usize>()
                .context("while parsing a selected-line count")?;
            match LineKind::from_str(kind)
                .map_err(|_| anyhow!(r#"unknown line kind "{}""#, kind))?
            {
                LineKind::Relational => class_sizes[class].relational = Some(count),
                LineKind::NonRelational => class_sizes[class].non_relational = Some(count),
            }
        }
    }
    Ok(NetEncodingOptions {
        coverage,
        pairwise_style,
        disjointness: !arg_matches.is_present(ARG_NO_DISJOINTNESS),
        orthogonality: !arg_matches.is_present(ARG_NO_ORTHOGONALITY),
        class_sizes,
    })
}
