use super::{cli_manager, command::Command, common};
use anyhow::{anyhow, Context, Result};
use clap::{AppSettings, Arg, ArgMatches, SubCommand};
use log::info;
use molsat::{
    designs::LineKind,
    encodings::LineGenerationOptions,
    io::CandidateLinesWriter,
    search::generate_lines,
};
use std::{fs::OpenOptions, path::Path, str::FromStr};

const CMD_NAME: &str = "generate-lines";

const ARG_KIND: &str = "KIND";
const ARG_FREQUENCY_LAYER: &str = "FREQUENCY_LAYER";
const ARG_BUCKET: &str = "BUCKET";
const ARG_OUT: &str = "OUT";
const ARG_APPEND: &str = "APPEND";

pub(crate) struct GenerateLinesCommand;

impl GenerateLinesCommand {
    pub(crate) fn new() -> Self {
        GenerateLinesCommand
    }
}

impl<'a> Command<'a> for GenerateLinesCommand {
    fn name(&self) -> &str {
        CMD_NAME
    }

    fn clap_subcommand(&self) -> clap::App<'a, 'a> {
        SubCommand::with_name(CMD_NAME)
            .about("Enumerates the candidate lines of a template")
            .setting(AppSettings::DisableVersion)
            .arg(common::multiple_input_args(
                "a template file (layers of the given files are stacked in order)",
            ))
            .arg(
                Arg::with_name(ARG_KIND)
                    .short("k")
                    .long("kind")
                    .empty_values(false)
                    .multiple(false)
                    .possible_values(&["relational", "non-relational"])
                    .help("the kind of lines to generate")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_FREQUENCY_LAYER)
                    .long("frequency-square")
                    .empty_values(false)
                    .multiple(false)
                    .help("the index of the template layer gating cell eligibility")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_BUCKET)
                    .long("bucket")
                    .empty_values(false)
                    .multiple(true)
                    .number_of_values(1)
                    .help("a WEIGHT=COUNT override of the default weight buckets")
                    .required(false),
            )
            .arg(
                Arg::with_name(ARG_OUT)
                    .short("o")
                    .long("output")
                    .empty_values(false)
                    .multiple(false)
                    .help("the candidate-line file to produce")
                    .required(true),
            )
            .arg(
                Arg::with_name(ARG_APPEND)
                    .long("append")
                    .takes_value(false)
                    .help("append to the output file instead of truncating it"),
            )
            .args(&common::solver_args())
            .args(&common::instance_file_args())
            .arg(cli_manager::logging_level_cli_arg())
    }

    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()> {
        let template_paths = arg_matches.values_of(common::ARG_INPUT).unwrap().collect::<Vec<_>>();
        let template = common::read_template_files(&template_paths)?;
        let kind = LineKind::from_str(arg_matches.value_of(ARG_KIND).unwrap()).unwrap();
        let frequency_layer = arg_matches
            .value_of(ARG_FREQUENCY_LAYER)
            .unwrap()
            .parse::<usize>()
            .context("while parsing the frequency square index")?;
        if frequency_layer >= template.n_layers() {
            return Err(anyhow!(
                "the frequency square index ({}) exceeds the template layers ({})",
                frequency_layer,
                template.n_layers()
            ));
        }
        let options = LineGenerationOptions {
            kind,
            frequency_layer,
            bucket_counts: bucket_counts_from_matches(arg_matches)?,
        };
        let solver = common::solver_from_matches(arg_matches);
        let report = generate_lines(
            &template,
            options,
            &solver,
            Path::new(arg_matches.value_of(common::ARG_CNF_FILE).unwrap()),
            Path::new(arg_matches.value_of(common::ARG_RESULT_FILE).unwrap()),
        )?;
        let out_path = arg_matches.value_of(ARG_OUT).unwrap();
        let mut out_file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(arg_matches.is_present(ARG_APPEND))
            .truncate(!arg_matches.is_present(ARG_APPEND))
            .open(out_path)
            .with_context(|| format!("while opening the output file {}", out_path))?;
        CandidateLinesWriter::default().write(&mut out_file, &report.lines)?;
        info!(
            "wrote {} {} candidate line(s) to {}",
            report.lines.len(),
            kind.as_ref(),
            out_path
        );
        if let Some(t) = report.process_time {
            info!("solver-reported process time: {} seconds", t);
        }
        Ok(())
    }
}

fn bucket_counts_from_matches(arg_matches: &ArgMatches<'_>) -> Result<Option<Vec<(usize, usize)>>> {
    match arg_matches.values_of(ARG_BUCKET) {
        None => Ok(None),
        Some(values) => values
            .map(|v| {
                let (weight, count) = v
                    .split_once('=')
                    .ok_or_else(|| anyhow!(r#"expected WEIGHT=COUNT, found "{}""#, v))?;
                Ok((
                    weight.parse::<usize>().context("while parsing a bucket weight")?,
                    count.parse::<usize>().context("while parsing a bucket count")?,
                ))
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
    }
}
