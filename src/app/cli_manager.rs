use super::command::Command;
use anyhow::{Context, Result};
use clap::{App, AppSettings, Arg, ArgMatches};
use fern::colors::{Color, ColoredLevelConfig};
use log::{error, info, LevelFilter};
use std::time::Instant;

pub(crate) const ARG_LOGGING_LEVEL: &str = "LOGGING_LEVEL";

/// Returns the CLI argument used by every subcommand to select the minimal
/// displayed logging level.
pub(crate) fn logging_level_cli_arg<'a>() -> Arg<'a, 'a> {
    Arg::with_name(ARG_LOGGING_LEVEL)
        .long("logging-level")
        .empty_values(false)
        .multiple(false)
        .possible_values(&["off", "error", "warn", "info", "debug", "trace"])
        .default_value("info")
        .help("the minimal level of the displayed log messages")
}

/// The registry of subcommands: builds the clap application, initializes
/// the logger, dispatches to the selected command and reports the run
/// statistics at exit.
pub(crate) struct AppHelper<'a> {
    name: &'a str,
    version: &'a str,
    about: &'a str,
    commands: Vec<Box<dyn Command<'a>>>,
}

impl<'a> AppHelper<'a> {
    pub(crate) fn new(name: &'a str, version: &'a str, about: &'a str) -> Self {
        Self {
            name,
            version,
            about,
            commands: Vec::new(),
        }
    }

    pub(crate) fn add_command(&mut self, command: Box<dyn Command<'a>>) {
        self.commands.push(command);
    }

    /// Launches the app; never returns.
    pub(crate) fn launch_app(&self) -> ! {
        let start = Instant::now();
        let result = self.launch_command();
        log_exit_stats(start);
        match result {
            Ok(()) => std::process::exit(0),
            Err(e) => {
                error!("{:#}", e);
                std::process::exit(1)
            }
        }
    }

    fn launch_command(&self) -> Result<()> {
        let mut app = App::new(self.name)
            .version(self.version)
            .about(self.about)
            .setting(AppSettings::SubcommandRequiredElseHelp);
        for command in &self.commands {
            app = app.subcommand(command.clap_subcommand());
        }
        let matches = app.get_matches();
        let (command_name, sub_matches) = matches.subcommand();
        let sub_matches = sub_matches.expect("a subcommand is required");
        init_logger(sub_matches)?;
        info!("{} {}", self.name, self.version);
        let command = self
            .commands
            .iter()
            .find(|c| c.name() == command_name)
            .expect("an unknown subcommand passed the CLI parsing");
        command.execute(sub_matches)
    }
}

fn init_logger(matches: &ArgMatches<'_>) -> Result<()> {
    let level = match matches.value_of(ARG_LOGGING_LEVEL).unwrap_or("info") {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    let colors = ColoredLevelConfig::new()
        .error(Color::Red)
        .warn(Color::Yellow)
        .info(Color::Green)
        .debug(Color::Blue)
        .trace(Color::Magenta);
    fern::Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{}] [{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                colors.color(record.level()),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()
        .context("while initializing the logger")
}

fn log_exit_stats(start: Instant) {
    if let Ok(pid) = sysinfo::get_current_pid() {
        let mut system = sysinfo::System::new();
        if system.refresh_process(pid) {
            if let Some(process) = system.process(pid) {
                info!(
                    "resident memory at exit: {} kB",
                    process.memory() / 1024
                );
            }
        }
    }
    info!("exiting after {:.3}s", start.elapsed().as_secs_f64());
}
