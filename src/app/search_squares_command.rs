use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{AppSettings, Arg, ArgMatches, SubCommand};
use molsat::{
    designs::SquareSystem,
    encodings::SquareEncodingOptions,
    search::{search_squares, SquareSearchOutcome},
};
use std::path::Path;

const CMD_NAME: &str = "search-squares";

const ARG_ORDER: &str = "ORDER";
const ARG_N_SQUARES: &str = "N_SQUARES";
const ARG_NO_TEMPLATE_CLAUSES: &str = "NO_TEMPLATE_CLAUSES";
const ARG_RELATIONAL_SYMBOLS: &str = "RELATIONAL_SYMBOLS";

pub(crate) struct SearchSquaresCommand;

impl SearchSquaresCommand {
    pub(crate) fn new() -> Self {
        SearchSquaresCommand
    }
}

impl<'a> Command<'a> for SearchSquaresCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> clap::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Searches a square-system refinement of a template")
            .setting(AppSettings::DisableVersion)
            .arg(
                Arg::with_name(common::ARG_INPUT)
                    .short("f")
                    .empty_values(false)
                    .multiple(true)
                    .number_of_values(1)
                    .help("a template file (omit to search without a template)")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_ORDER)
                    .long("order")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("10")
                    .help("the grid order (ignored when a template is given)"),
            )
            .arg(
                Arg::with_name(ARG_N_SQUARES)
                    .long("squares")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("3")
                    .help("the number of squares (the third witnesses orthogonality)"),
            )
            .arg(
                Arg::with_name(ARG_NO_TEMPLATE_CLAUSES)
                    .long("no-template-clauses")
                    .takes_value(false)
                    .help("load the template but skip its cell-domain clauses"),
            )
            .arg(
                Arg::with_name(ARG_RELATIONAL_SYMBOLS)
                    .long("relational-symbols")
                    .empty_values(false)
                    .multiple(false)
                    .default_value("4")
                    .help("the number of symbols of the relational range"),
            )
            .args(&common::solver_args())
            .args(&common::instance_file_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let template = arg_matches
            .values_of(common::ARG_INPUT)
            .map(|v| common::read_template_files(&v.collect::<Vec<_>>()))
            .transpose()?;
        let order = match &template {
            Some(t) => t.order(),
            None => arg_matches
                .value_of(ARG_ORDER)
                .unwrap()
                .parse::<usize>()
                .context("while parsing the grid order")?,
        };
        let n_squares = arg_matches
            .value_of(ARG_N_SQUARES)
            .unwrap()
            .parse::<usize>()
            .context("while parsing the number of squares")?;
        if n_squares == 0 {
            return Err(anyhow!("at least one square is required"));
        }
        if let Some(t) = &template {
            if t.n_layers() > n_squares {
                return Err(anyhow!(
                    "the template holds {} layers but only {} square(s) are searched",
                    t.n_layers(),
                    n_squares
                ));
            }
        }
        let options = SquareEncodingOptions {
            order,
            n_squares,
            template_clauses: !arg_matches.is_present(ARG_NO_TEMPLATE_CLAUSES),
            relational_symbols: arg_matches
                .value_of(ARG_RELATIONAL_SYMBOLS)
                .unwrap()
                .parse::<usize>()
                .context("while parsing the relational symbol count")?,
        };
        let solver = common::solver_from_matches(arg_matches);
        let outcome = search_squares(
            template.as_ref(),
            options,
            &solver,
            Path::new(arg_matches.value_of(common::ARG_CNF_FILE).unwrap()),
            Path::new(arg_matches.value_of(common::ARG_RESULT_FILE).unwrap()),
        )?;
        match outcome {
            SquareSearchOutcome::Satisfiable { system, defect } => {
                println!("s SATISFIABLE");
                print_system(&system);
                match defect {
                    None => Ok(()),
                    Some(d) => Err(anyhow!("the solution violates the design invariants: {}", d)),
                }
            }
            SquareSearchOutcome::Unsatisfiable => {
                println!("s UNSATISFIABLE");
                Ok(())
            }
            SquareSearchOutcome::Unknown => {
                println!("s UNKNOWN");
                Ok(())
            }
        }
    }
}

fn print_system(system: &SquareSystem) {
    for square in 0..system.n_squares() {
        println!("c square {}:", square);
        for row in 0..system.order() {
            let symbols = (0..system.order())
                .map(|col| match system.symbol(square, row, col) {
                    Some(s) => s.to_string(),
                    None => "?".to_string(),
                })
                .collect::<Vec<_>>();
            println!("c   {}", symbols.join(" "));
        }
    }
}
