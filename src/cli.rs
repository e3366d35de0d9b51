use clap::{Parser, ValueEnum};

use crate::address;
use crate::registry::{DEFAULT_MAX_NESTING_DEPTH, RegistryConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "jarlens")]
#[command(version)]
#[command(about = "Browse Java archives, including archives nested in archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  jarlens app.jar                               show packages, classes and resources\n  \
  jarlens -l 'jar:/opt/app.jar!/lib/dep.jar'    list the raw entries of a nested jar\n  \
  jarlens -p 'app.jar!/META-INF/MANIFEST.MF'    print an entry to stdout\n  \
  jarlens https://example.com/app.jar           browse a remote jar")]
pub struct Cli {
    /// Archive path, URL or `!/` address
    #[arg(value_name = "ADDRESS")]
    pub address: String,

    /// List raw archive entries instead of the content tree
    #[arg(short = 'l')]
    pub list: bool,

    /// Print the text of the addressed entry, no messages
    #[arg(short = 'p')]
    pub pipe: bool,

    /// Refuse addresses nested deeper than this
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_NESTING_DEPTH)]
    pub max_depth: usize,

    #[arg(long, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Quiet mode, hides the skipped entry summary
    #[arg(short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// The address argument, with `jar:` added to bare paths.
    pub fn address(&self) -> String {
        address::with_default_scheme(&self.address)
    }

    pub fn is_quiet(&self) -> bool {
        self.quiet || self.pipe
    }
}

impl From<&Cli> for RegistryConfig {
    fn from(cli: &Cli) -> Self {
        RegistryConfig {
            max_nesting_depth: cli.max_depth,
            ..RegistryConfig::default()
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    pub fn to_tracing_level(self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("jarlens").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults() {
        let cli = parse(&["app.jar"]);
        assert_eq!(cli.address(), "jar:app.jar");
        assert_eq!(cli.log_level, LogLevel::Warn);
        assert!(!cli.list && !cli.pipe && !cli.is_quiet());
        assert_eq!(RegistryConfig::from(&cli), RegistryConfig::default());
    }

    #[test]
    fn options() {
        let cli = parse(&["-p", "--max-depth", "2", "--log-level", "debug", "jar:/a.jar!/b.txt"]);
        assert_eq!(cli.address(), "jar:/a.jar!/b.txt");
        assert!(cli.is_quiet());
        assert_eq!(RegistryConfig::from(&cli).max_nesting_depth, 2);
        assert_eq!(cli.log_level.to_tracing_level(), Some(tracing::Level::DEBUG));
    }

    #[rstest]
    #[case("/opt/app.jar", "jar:/opt/app.jar")]
    #[case("https://example.com/app.jar", "https://example.com/app.jar")]
    #[case("file:/opt/app.jar", "file:/opt/app.jar")]
    fn promotes_bare_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(parse(&[input]).address(), expected);
    }

    #[test]
    fn silent_disables_tracing() {
        assert_eq!(LogLevel::Silent.to_tracing_level(), None);
    }

    #[test]
    fn requires_an_address() {
        assert!(Cli::try_parse_from(["jarlens"]).is_err());
    }
}
