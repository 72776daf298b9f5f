use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Resolved startup parameters for one process invocation.
/// Immutable after parsing; nothing here changes while serving.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "jardesigner", version, about = "Launch the JARDesigner GUI")]
pub struct LaunchConfig {
    #[clap(
        long,
        default_value_t = DEFAULT_PORT,
        value_parser = clap::value_parser!(u16).range(1..),
        help = "Port to serve the GUI on"
    )]
    pub port: u16,
    #[clap(
        long,
        default_value = DEFAULT_HOST,
        help = "Address to bind the GUI server to"
    )]
    pub host: String,
    #[clap(
        long = "no-browser",
        default_value_t = false,
        action = clap::ArgAction::SetTrue,
        help = "Do not open the default browser after startup"
    )]
    pub no_browser: bool,
    #[clap(
        long,
        default_value_t = false,
        action = clap::ArgAction::SetTrue,
        help = "Enable verbose startup diagnostics"
    )]
    pub debug: bool,
    #[clap(
        long,
        value_name = "DIR",
        help = "Serve the frontend bundle from this directory instead of the packaged one"
    )]
    pub static_dir: Option<PathBuf>,
}

impl LaunchConfig {
    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// The browser opens unless the user asked it not to.
    pub fn should_open_browser(&self) -> bool {
        !self.no_browser
    }
}
