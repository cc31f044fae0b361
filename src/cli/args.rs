use clap::Parser;
use std::path::PathBuf;

/// Compose Dashboard - live status and start/stop for a docker compose project
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Listen address
    #[arg(short = 'a', long, env = "DASHBOARD_ADDRESS", default_value = "localhost")]
    pub address: String,

    /// Listen port
    #[arg(short, long, env = "DASHBOARD_PORT", default_value_t = 5555)]
    pub port: u16,

    /// Keep running after the last browser disconnects
    #[arg(short = 'k', long, env = "DASHBOARD_KEEP_ALIVE")]
    pub keep_alive: bool,

    /// Directory holding the frontend files
    #[arg(long, env = "DASHBOARD_ASSETS", default_value = "frontend")]
    pub assets: PathBuf,

    /// Compose project directory (defaults to the current directory)
    #[arg(short = 'C', long, env = "DASHBOARD_PROJECT_DIR")]
    pub project_directory: Option<PathBuf>,

    /// Docker binary
    #[arg(long, env = "DASHBOARD_DOCKER", default_value = "docker")]
    pub docker: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = CommandArgs::parse_from(["compose-dashboard"]);
        assert_eq!(args.address, "localhost");
        assert_eq!(args.port, 5555);
        assert!(!args.keep_alive);
        assert_eq!(args.docker, "docker");
        assert!(args.project_directory.is_none());
    }

    #[test]
    fn test_flags() {
        let args = CommandArgs::parse_from([
            "compose-dashboard",
            "-a",
            "0.0.0.0",
            "-p",
            "8080",
            "--keep-alive",
            "-C",
            "/srv/app",
        ]);
        assert_eq!(args.address, "0.0.0.0");
        assert_eq!(args.port, 8080);
        assert!(args.keep_alive);
        assert_eq!(args.project_directory, Some(PathBuf::from("/srv/app")));
    }
}
