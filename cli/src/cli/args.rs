//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

/// Box OAuth2 credential check.
///
/// Reads the credentials from the config file, refreshes the access token,
/// writes the rotated tokens back and prints the ID of the authenticated
/// user.
#[derive(Parser, Debug)]
#[command(name = "bx")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file to use [default: ~/.config/bx-dev/bx.toml].
    pub config: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_optional() {
        let cli = Cli::try_parse_from(["bx"]).unwrap();
        assert!(cli.config.is_none());

        let cli = Cli::try_parse_from(["bx", "/tmp/bx.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/bx.toml")));
    }

    #[test]
    fn rejects_extra_arguments() {
        assert!(Cli::try_parse_from(["bx", "a.toml", "b.toml"]).is_err());
    }
}
