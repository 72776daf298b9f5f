use clap::Parser;
use jardesigner::{cli, config::LaunchConfig, startup::Application};

#[tokio::main]
async fn main() {
    // Help and version displays are clean exits; anything else about
    // the arguments is a usage error and exits 1 before any bind.
    let config = match LaunchConfig::try_parse() {
        Ok(config) => config,
        Err(error) => {
            let code = if error.use_stderr() { 1 } else { 0 };
            let _ = error.print();
            std::process::exit(code);
        }
    };

    // Everything that can fail before serving fails here, before the
    // banner is printed and before any browser task exists.
    let app = match Application::build(&config).await {
        Ok(app) => app,
        Err(error) => {
            eprintln!("[jardesigner] failed to start: {error:#}");
            std::process::exit(1);
        }
    };

    cli::print_startup_summary(&config, &app);

    if config.should_open_browser() {
        cli::launch_browser(app.primary_url());
    }

    match app.run_until_stopped().await {
        Ok(()) => println!("[jardesigner] stopped. See you next time."),
        Err(error) => {
            eprintln!("[jardesigner] server error: {error}");
            std::process::exit(1);
        }
    }
}
