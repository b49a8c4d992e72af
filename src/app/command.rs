use anyhow::Result;
use clap::App;
use clap::ArgMatches;

/// The trait shared by the app subcommands.
///
/// A command declares its CLI surface as a clap subcommand and runs itself
/// against the parsed arguments; the CLI manager owns the dispatch. Command
/// names must be unique across the app.
pub trait Command<'a> {
    /// Returns the unique name of the command.
    fn name(&self) -> &str;

    /// Builds the clap subcommand declaring the CLI arguments of this
    /// command.
    fn clap_subcommand(&self) -> App<'a, 'a>;

    /// Runs the command against the arguments clap matched for its
    /// subcommand.
    ///
    /// Returning `Ok(())` makes the app exit with a success status code; an
    /// error is logged and turns into a failure status code.
    fn execute(&self, arg_matches: &ArgMatches<'_>) -> Result<()>;
}
