use crate::env::Environment;
use argh::FromArgs;

/// Environment variable holding a default clipboard command line.
pub const CLIPBOARD_VAR: &str = "JWT_CLI_CLIPBOARD";

#[derive(FromArgs, Debug, Default, PartialEq)]
/// Interactively collect claims and copy an unsigned JWT (alg "none") to the clipboard.
/// Keys "user_key" and "email" are required; "email" must look like an address.
pub struct Args {
    #[argh(option)]
    /// clipboard command that reads the token from stdin, e.g. "xclip -selection clipboard".
    /// Defaults to $JWT_CLI_CLIPBOARD, then the first of pbcopy, wl-copy, xclip, xsel, clip.exe on PATH.
    pub clipboard: Option<String>,

    #[argh(switch)]
    /// also print the token to standard output.
    pub print: bool,

    #[argh(option)]
    /// print the claims of an unsigned token as JSON and exit.
    pub decode: Option<String>,

    #[argh(switch, short = 'v')]
    /// log debug diagnostics to standard error.
    pub verbose: bool,
}

/// Settings for one run, after merging flags with the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub clipboard_command: Option<String>,
    pub print_token: bool,
    pub decode: Option<String>,
    pub verbose: bool,
}

impl Config {
    /// Flags win over environment variables.
    pub fn resolve(args: Args, env: &Environment) -> Self {
        let clipboard_command = args
            .clipboard
            .filter(|c| !c.trim().is_empty())
            .or_else(|| env.get_non_empty(CLIPBOARD_VAR).map(str::to_string));
        Self {
            clipboard_command,
            print_token: args.print,
            decode: args.decode,
            verbose: args.verbose,
        }
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "jwt_cli=debug"
        } else {
            "jwt_cli=warn"
        }
    }
}
