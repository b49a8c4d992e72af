use super::{cli_manager, command::Command, common};
use anyhow::Result;
use clap::{AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use molsat::designs::LineKind;

const CMD_NAME: &str = "check";

const ARG_FORMAT: &str = "FORMAT";

pub(crate) struct CheckCommand;

impl CheckCommand {
    pub(crate) fn new() -> Self {
        CheckCommand
    }
}

impl<'a> Command<'a> for CheckCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> clap::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Checks input candidate-line and template files for errors")
            .setting(AppSettings::DisableVersion)
            .arg(common::input_args())
            .arg(
                Arg::with_name(ARG_FORMAT)
                    .short("r")
                    .long("format")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["lines", "template"])
                    .help("the format of the input file")
                    .required(true),
            )
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let file = arg_matches.value_of(common::ARG_INPUT).unwrap();
        match arg_matches.value_of(ARG_FORMAT).unwrap() {
            "lines" => {
                let lines = common::read_candidate_lines_file(file)?;
                info!(
                    "{} relational and {} non-relational line(s)",
                    lines.iter().filter(|l| l.kind() == LineKind::Relational).count(),
                    lines
                        .iter()
                        .filter(|l| l.kind() == LineKind::NonRelational)
                        .count()
                );
            }
            "template" => {
                common::read_template_files(&[file])?;
            }
            _ => unreachable!(),
        }
        Ok(())
    }
}
