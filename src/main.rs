use app::{CheckCommand, Command, GenerateLinesCommand, SearchNetCommand, SearchSquaresCommand};
use app::cli_manager::AppHelper;

mod app;

fn main() {
    let app_name = option_env!("CARGO_PKG_NAME").unwrap_or("unknown app name");
    let app_version = option_env!("CARGO_PKG_VERSION").unwrap_or("unknown version");
    let mut app = AppHelper::new(
        app_name,
        app_version,
        "Molsat, a SAT-based searcher for nets of mutually orthogonal Latin squares.",
    );
    let commands: Vec<Box<dyn Command>> = vec![
        Box::new(CheckCommand::new()),
        Box::new(GenerateLinesCommand::new()),
        Box::new(SearchNetCommand::new()),
        Box::new(SearchSquaresCommand::new()),
    ];
    for c in commands {
        app.add_command(c);
    }
    app.launch_app();
}
