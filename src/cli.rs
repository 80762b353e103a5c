//! Utility module for command line interfaces.

use std::{env, error::Error, fmt, fmt::Display};

/// An error struct to wrap simple static error messages.
#[derive(Debug)]
pub struct CliErr(pub &'static str);

impl Display for CliErr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Error for CliErr {}

/// What went wrong in a command line program, with the exit code to use.
///
/// Bad arguments and unreadable or malformed input abort with 1,
/// failure to write results aborts with 2.
#[derive(Debug)]
pub enum Failure {
    Usage(String),
    Input(std::io::Error),
    Output(std::io::Error),
}

impl Failure {
    pub fn usage(message: impl Into<String>) -> Failure {
        Failure::Usage(message.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Failure::Usage(_) | Failure::Input(_) => 1,
            Failure::Output(_) => 2,
        }
    }
}

impl Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Failure::Usage(message) => write!(f, "err; {}", message),
            Failure::Input(err) => write!(f, "err; could not load input: {}", err),
            Failure::Output(err) => write!(f, "err; could not write output: {}", err),
        }
    }
}

impl Error for Failure {}

/// Parsed command line parameters.
///
/// Every `--name` token starts a parameter; tokens up to the next `--name`
/// become its values. A parameter without values acts as a boolean flag.
/// Repeated parameters keep the values of their first occurrence.
#[derive(Debug, Default)]
pub struct Args {
    params: Vec<(String, Vec<String>)>,
}

impl Args {
    /// Parse the arguments of the current process (program name skipped).
    pub fn parse() -> Args {
        Self::from_iter(env::args().skip(1))
    }

    pub fn from_iter(args: impl Iterator<Item = String>) -> Args {
        let mut params: Vec<(String, Vec<String>)> = Vec::new();

        for arg in args {
            if let Some(name) = arg.strip_prefix("--") {
                params.push((name.to_string(), Vec::new()));
            } else if let Some(last) = params.last_mut() {
                last.1.push(arg);
            }
        }

        Args { params }
    }

    /// Was the parameter given at all?
    pub fn flag(&self, name: &str) -> bool {
        self.params.iter().any(|(param, _)| param == name)
    }

    /// All values of the parameter, if it was given.
    pub fn values(&self, name: &str) -> Option<&[String]> {
        self.params.iter().find(|(param, _)| param == name).map(|(_, values)| &values[..])
    }

    /// The first value of the parameter, if present.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.values(name).and_then(|values| values.first()).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Args {
        Args::from_iter(line.split_whitespace().map(String::from))
    }

    #[test]
    fn params_and_flags() {
        let args = args("--input graph.gr graph.co --order lazy --verbose");
        assert_eq!(args.values("input").unwrap(), &["graph.gr".to_string(), "graph.co".to_string()]);
        assert_eq!(args.value("order"), Some("lazy"));
        assert!(args.flag("verbose"));
        assert!(!args.flag("verify"));
        assert_eq!(args.value("partial"), None);
    }

    #[test]
    fn flag_has_no_values() {
        let args = args("--verify --order fixed order.txt");
        assert_eq!(args.values("verify").unwrap().len(), 0);
        assert_eq!(args.values("order").unwrap(), &["fixed".to_string(), "order.txt".to_string()]);
    }
}
