//! Command line tokenizer.
//!
//! Grammar:
//!   lesspass <site> <login> [<password>] [options]
//!
//! - The third token is the password unless it starts with `-`.
//! - Short flags bundle (`-lus`); `-L`/`-c` take the rest of the token or
//!   the next token as their value (`-L20`, `-L 20`).
//! - Long options match verbatim; `--length`/`--counter` take the next token.
//!
//! Every failure reports the same generic message. The precise reason is
//! kept on the error for logging.

use std::ffi::OsString;
use std::fmt;

use thiserror::Error;

use crate::charset::{CharClass, Charset};

pub const USAGE: &str = "\
Usage: lesspass <site> <login> [password] [options]
Options:
  -l                  add lowercase in password
  -u                  add uppercase in password
  -d                  add digits in password
  -s                  add symbols in password

  --no-lowercase      remove lowercase from password
  --no-uppercase      remove uppercase from password
  --no-digits         remove digits from password
  --no-symbols        remove symbols from password

  --length, -L        int (default 16)
  --counter, -c       int (default 1)

  --clipboard, -C     copy to clipboard instead of displaying it

  -h, --help          print this help (only argument)
  -V, --version       print the version (only argument)
";

/* -------------------------------------------------------------------------- */
/*                                   Errors                                   */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unrecognized or incorrect options used")]
pub struct ParseError {
    reason: Reason,
}

impl ParseError {
    fn new(reason: Reason) -> Self {
        Self { reason }
    }

    pub fn reason(&self) -> &Reason {
        &self.reason
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Reason {
    #[error("site and login are required")]
    MissingPositionals,
    #[error("expected an option, found {0:?}")]
    ExpectedOption(String),
    #[error("lone '-' outside of a flag bundle")]
    LoneDash,
    #[error("'-' in the middle of a flag bundle")]
    MisplacedDash,
    #[error("unknown flag -{0}")]
    UnknownShort(char),
    #[error("unknown option --{0}")]
    UnknownLong(String),
    #[error("{0} expects a value")]
    MissingValue(&'static str),
    #[error("{0:?} is not a base-10 integer")]
    InvalidNumber(String),
    #[error("argument is not valid unicode")]
    NotUnicode,
}

/* -------------------------------------------------------------------------- */
/*                               Parsed options                               */
/* -------------------------------------------------------------------------- */

/// Result of tokenizing one invocation.
///
/// Every optional field is `None` unless the flag appeared on the command
/// line, so "left at default" and "explicitly set" never look alike.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ParsedOptions {
    pub site: String,
    pub login: String,
    pub password: Option<String>,
    /// Classes turned on with `-l`/`-u`/`-d`/`-s`.
    pub include: Option<Charset>,
    /// Starts from [`Charset::ALL`]; `--no-*` removes classes.
    pub exclude: Option<Charset>,
    pub length: Option<i64>,
    pub counter: Option<i64>,
    pub clipboard: bool,
}

impl ParsedOptions {
    fn apply(&mut self, flag: Flag) {
        match flag {
            Flag::Include(class) => {
                self.include = Some(self.include.unwrap_or(Charset::EMPTY).with(class));
            }
            Flag::Exclude(class) => {
                self.exclude = Some(self.exclude.unwrap_or(Charset::ALL).without(class));
            }
            Flag::Clipboard => self.clipboard = true,
            Flag::Length(n) => self.length = Some(n),
            Flag::Counter(n) => self.counter = Some(n),
        }
    }
}

impl fmt::Debug for ParsedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParsedOptions")
            .field("site", &self.site)
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("length", &self.length)
            .field("counter", &self.counter)
            .field("clipboard", &self.clipboard)
            .finish()
    }
}

/// What the process was asked to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Help,
    Version,
    Generate(ParsedOptions),
}

/// Converts the raw process arguments (program name excluded).
pub fn from_os<I>(args: I) -> Result<Vec<String>, ParseError>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| arg.into_string().map_err(|_| ParseError::new(Reason::NotUnicode)))
        .collect()
}

/// Recognizes `--help`/`--version` when given alone, otherwise parses a
/// generation request.
pub fn parse_invocation<S: AsRef<str>>(args: &[S]) -> Result<Invocation, ParseError> {
    if let [only] = args {
        match only.as_ref() {
            "-h" | "--help" => return Ok(Invocation::Help),
            "-V" | "--version" => return Ok(Invocation::Version),
            _ => {}
        }
    }
    parse(args).map(Invocation::Generate)
}

/// Tokenizes the arguments following the program name.
pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<ParsedOptions, ParseError> {
    let args: Vec<&str> = args.iter().map(AsRef::as_ref).collect();
    let [site, login, rest @ ..] = args.as_slice() else {
        return Err(ParseError::new(Reason::MissingPositionals));
    };

    let mut opts = ParsedOptions {
        site: (*site).to_owned(),
        login: (*login).to_owned(),
        ..ParsedOptions::default()
    };

    let mut pos = 0;
    if let Some(password) = rest.first().filter(|tok| !tok.starts_with('-')) {
        opts.password = Some((*password).to_owned());
        pos = 1;
    }

    let mut state = State::ExpectOption;
    while pos < rest.len() || state != State::ExpectOption {
        let taken = step(rest, pos, state)?;
        if let Some(flag) = taken.flag {
            opts.apply(flag);
        }
        pos += taken.consumed;
        state = taken.next;
    }

    Ok(opts)
}

/* -------------------------------------------------------------------------- */
/*                               State machine                                */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State<'a> {
    /// Between tokens; the next token has to open with `-`.
    ExpectOption,
    /// Inside a short flag bundle; holds the unread tail of the token.
    InBundle(&'a str),
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Flag {
    Include(CharClass),
    Exclude(CharClass),
    Clipboard,
    Length(i64),
    Counter(i64),
}

#[derive(Debug, Eq, PartialEq)]
struct Step<'a> {
    flag: Option<Flag>,
    next: State<'a>,
    /// Whole tokens consumed from the cursor.
    consumed: usize,
}

impl<'a> Step<'a> {
    fn to(next: State<'a>, consumed: usize) -> Self {
        Self {
            flag: None,
            next,
            consumed,
        }
    }

    fn emit(flag: Flag, next: State<'a>, consumed: usize) -> Self {
        Self {
            flag: Some(flag),
            next,
            consumed,
        }
    }
}

/// Advances the machine by one unit of input. `pos` indexes the first token
/// not yet opened; in `InBundle` the current token has already been counted.
fn step<'a>(tokens: &[&'a str], pos: usize, state: State<'a>) -> Result<Step<'a>, ParseError> {
    match state {
        State::ExpectOption => {
            let token = tokens
                .get(pos)
                .copied()
                .ok_or_else(|| ParseError::new(Reason::MissingPositionals))?;
            let Some(body) = token.strip_prefix('-') else {
                return Err(ParseError::new(Reason::ExpectedOption(token.to_owned())));
            };
            if body.is_empty() {
                return Err(ParseError::new(Reason::LoneDash));
            }
            match body.strip_prefix('-') {
                Some(name) => long_option(tokens, pos + 1, name),
                None => Ok(Step::to(State::InBundle(body), 1)),
            }
        }
        State::InBundle(rest) => {
            let mut chars = rest.chars();
            let Some(c) = chars.next() else {
                return Ok(Step::to(State::ExpectOption, 0));
            };
            let tail = chars.as_str();
            match c {
                '-' if tail.is_empty() => Ok(Step::to(State::ExpectOption, 0)),
                '-' => Err(ParseError::new(Reason::MisplacedDash)),
                'C' => Ok(Step::emit(Flag::Clipboard, State::InBundle(tail), 0)),
                'L' => short_value(tokens, pos, tail, "-L").map(|(n, used)| {
                    Step::emit(Flag::Length(n), State::ExpectOption, used)
                }),
                'c' => short_value(tokens, pos, tail, "-c").map(|(n, used)| {
                    Step::emit(Flag::Counter(n), State::ExpectOption, used)
                }),
                other => match CharClass::from_flag(other) {
                    Some(class) => Ok(Step::emit(Flag::Include(class), State::InBundle(tail), 0)),
                    None => Err(ParseError::new(Reason::UnknownShort(other))),
                },
            }
        }
    }
}

/// `name` is the option without its `--`; `pos` points past the option token.
fn long_option<'a>(tokens: &[&'a str], pos: usize, name: &str) -> Result<Step<'a>, ParseError> {
    let flag = match name {
        "no-lowercase" => Flag::Exclude(CharClass::Lowercase),
        "no-uppercase" => Flag::Exclude(CharClass::Uppercase),
        "no-digits" => Flag::Exclude(CharClass::Digits),
        "no-symbols" => Flag::Exclude(CharClass::Symbols),
        "clipboard" => Flag::Clipboard,
        "length" => {
            let n = number(next_value(tokens, pos, "--length")?)?;
            return Ok(Step::emit(Flag::Length(n), State::ExpectOption, 2));
        }
        "counter" => {
            let n = number(next_value(tokens, pos, "--counter")?)?;
            return Ok(Step::emit(Flag::Counter(n), State::ExpectOption, 2));
        }
        _ => return Err(ParseError::new(Reason::UnknownLong(name.to_owned()))),
    };
    Ok(Step::emit(flag, State::ExpectOption, 1))
}

/// Value of `-L`/`-c`: the rest of the bundle if any, else the next token.
fn short_value(
    tokens: &[&str],
    pos: usize,
    attached: &str,
    flag: &'static str,
) -> Result<(i64, usize), ParseError> {
    if attached.is_empty() {
        Ok((number(next_value(tokens, pos, flag)?)?, 1))
    } else {
        Ok((number(attached)?, 0))
    }
}

fn next_value<'a>(tokens: &[&'a str], pos: usize, flag: &'static str) -> Result<&'a str, ParseError> {
    tokens
        .get(pos)
        .copied()
        .ok_or_else(|| ParseError::new(Reason::MissingValue(flag)))
}

/// The whole text has to be a base-10 integer.
fn number(text: &str) -> Result<i64, ParseError> {
    text.parse::<i64>()
        .map_err(|_| ParseError::new(Reason::InvalidNumber(text.to_owned())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(args: &[&str]) -> ParsedOptions {
        parse(args).unwrap_or_else(|e| panic!("{args:?} failed: {}", e.reason()))
    }

    fn reason(args: &[&str]) -> Reason {
        match parse(args) {
            Ok(opts) => panic!("{args:?} parsed as {opts:?}"),
            Err(e) => e.reason().clone(),
        }
    }

    fn set(classes: &[CharClass]) -> Charset {
        classes.iter().copied().collect()
    }

    #[test]
    fn positionals_only() {
        let opts = ok(&["example.org", "me"]);
        assert_eq!(opts.site, "example.org");
        assert_eq!(opts.login, "me");
        assert_eq!(opts.password, None);
        assert_eq!(opts.include, None);
        assert_eq!(opts.exclude, None);
        assert_eq!(opts.length, None);
        assert_eq!(opts.counter, None);
        assert!(!opts.clipboard);
    }

    #[test]
    fn too_few_positionals() {
        assert_eq!(reason(&[]), Reason::MissingPositionals);
        assert_eq!(reason(&["site"]), Reason::MissingPositionals);
    }

    #[test]
    fn third_token_is_password_unless_dashed() {
        let opts = ok(&["site", "login", "secret123"]);
        assert_eq!(opts.password.as_deref(), Some("secret123"));

        let opts = ok(&["site", "login", "-l"]);
        assert_eq!(opts.password, None);
        assert_eq!(opts.include, Some(set(&[CharClass::Lowercase])));
    }

    #[test]
    fn empty_third_token_is_a_password() {
        assert_eq!(ok(&["site", "login", ""]).password.as_deref(), Some(""));
    }

    #[test]
    fn fourth_positional_is_rejected() {
        assert_eq!(
            reason(&["site", "login", "secret", "extra"]),
            Reason::ExpectedOption("extra".into())
        );
        assert_eq!(
            reason(&["site", "login", "-l", "stray"]),
            Reason::ExpectedOption("stray".into())
        );
    }

    #[test]
    fn bundles_set_inclusion_bits() {
        let opts = ok(&["s", "l", "-lus", "-d"]);
        assert_eq!(opts.include, Some(Charset::ALL));
        assert_eq!(opts.exclude, None);
    }

    #[test]
    fn bundle_order_does_not_matter() {
        use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

        let mut rng = StdRng::seed_from_u64(0x1e55);
        let mut letters = vec!['l', 'u', 'd', 's', 'C'];
        let expected = ok(&["s", "l", "-ludsC"]);
        for _ in 0..32 {
            letters.shuffle(&mut rng);
            let bundle: String = std::iter::once('-').chain(letters.iter().copied()).collect();
            assert_eq!(ok(&["s", "l", bundle.as_str()]), expected, "bundle {bundle}");
        }
        assert_eq!(ok(&["s", "l", "-lus"]).include, ok(&["s", "l", "-sul"]).include);
    }

    #[test]
    fn exclusion_starts_from_all_classes() {
        let opts = ok(&["s", "l", "--no-digits", "--no-symbols"]);
        assert_eq!(opts.exclude, Some(set(&[CharClass::Lowercase, CharClass::Uppercase])));
        assert_eq!(opts.include, None);

        let all = ok(&[
            "s",
            "l",
            "--no-lowercase",
            "--no-uppercase",
            "--no-digits",
            "--no-symbols",
        ]);
        assert_eq!(all.exclude, Some(Charset::EMPTY));
    }

    #[test]
    fn inclusion_and_exclusion_both_recorded() {
        let opts = ok(&["s", "l", "-l", "--no-uppercase"]);
        assert!(opts.include.is_some());
        assert!(opts.exclude.is_some());
    }

    #[test]
    fn attached_and_detached_values_agree() {
        for args in [
            &["s", "l", "-L20"][..],
            &["s", "l", "-L", "20"],
            &["s", "l", "--length", "20"],
            &["s", "l", "-uL", "20"],
        ] {
            assert_eq!(ok(args).length, Some(20), "{args:?}");
        }
        for args in [
            &["s", "l", "-c3"][..],
            &["s", "l", "-c", "3"],
            &["s", "l", "--counter", "3"],
        ] {
            assert_eq!(ok(args).counter, Some(3), "{args:?}");
        }
    }

    #[test]
    fn value_flag_ends_the_bundle() {
        let opts = ok(&["s", "l", "-dL", "12", "-s"]);
        assert_eq!(opts.length, Some(12));
        assert_eq!(opts.include, Some(set(&[CharClass::Digits, CharClass::Symbols])));
    }

    #[test]
    fn later_values_win() {
        let opts = ok(&["s", "l", "-L", "10", "--length", "30", "-c2", "-c", "9"]);
        assert_eq!(opts.length, Some(30));
        assert_eq!(opts.counter, Some(9));
    }

    #[test]
    fn negative_and_zero_values_are_parsed() {
        assert_eq!(ok(&["s", "l", "-L", "-5"]).length, Some(-5));
        assert_eq!(ok(&["s", "l", "-c0"]).counter, Some(0));
    }

    #[test]
    fn trailing_garbage_in_values_is_rejected() {
        assert_eq!(reason(&["s", "l", "-L20u"]), Reason::InvalidNumber("20u".into()));
        assert_eq!(reason(&["s", "l", "-L", "20x"]), Reason::InvalidNumber("20x".into()));
        assert_eq!(
            reason(&["s", "l", "--counter", "1.5"]),
            Reason::InvalidNumber("1.5".into())
        );
        assert_eq!(reason(&["s", "l", "--length", ""]), Reason::InvalidNumber("".into()));
    }

    #[test]
    fn missing_values() {
        assert_eq!(reason(&["s", "l", "--length"]), Reason::MissingValue("--length"));
        assert_eq!(reason(&["s", "l", "--counter"]), Reason::MissingValue("--counter"));
        assert_eq!(reason(&["s", "l", "-L"]), Reason::MissingValue("-L"));
        assert_eq!(reason(&["s", "l", "-lc"]), Reason::MissingValue("-c"));
    }

    #[test]
    fn clipboard_forms() {
        assert!(ok(&["s", "l", "-C"]).clipboard);
        assert!(ok(&["s", "l", "--clipboard"]).clipboard);
        assert!(ok(&["s", "l", "pw", "-lC"]).clipboard);
    }

    #[test]
    fn dashes() {
        assert_eq!(reason(&["s", "l", "-"]), Reason::LoneDash);
        assert_eq!(reason(&["s", "l", "-l", "-"]), Reason::LoneDash);
        assert_eq!(reason(&["s", "l", "-l-u"]), Reason::MisplacedDash);
        assert_eq!(reason(&["s", "l", "-l--clipboard"]), Reason::MisplacedDash);

        let closed = ok(&["s", "l", "-lu-", "-d"]);
        assert_eq!(
            closed.include,
            Some(set(&[CharClass::Lowercase, CharClass::Uppercase, CharClass::Digits]))
        );
    }

    #[test]
    fn unknown_flags() {
        assert_eq!(reason(&["s", "l", "-x"]), Reason::UnknownShort('x'));
        assert_eq!(reason(&["s", "l", "-lx"]), Reason::UnknownShort('x'));
        assert_eq!(reason(&["s", "l", "--"]), Reason::UnknownLong("".into()));
        assert_eq!(reason(&["s", "l", "--length=5"]), Reason::UnknownLong("length=5".into()));
        assert_eq!(reason(&["s", "l", "--No-digits"]), Reason::UnknownLong("No-digits".into()));
    }

    #[test]
    fn long_options_do_not_bundle() {
        assert_eq!(reason(&["s", "l", "-no-digits"]), Reason::UnknownShort('n'));
    }

    #[test]
    fn generic_message_for_every_reason() {
        for args in [&["s"][..], &["s", "l", "-x"], &["s", "l", "--length"]] {
            let err = parse(args).unwrap_err();
            assert_eq!(err.to_string(), "Unrecognized or incorrect options used");
        }
    }

    #[test]
    fn help_and_version_only_alone() {
        assert_eq!(parse_invocation(&["--help"]).unwrap(), Invocation::Help);
        assert_eq!(parse_invocation(&["-h"]).unwrap(), Invocation::Help);
        assert_eq!(parse_invocation(&["-V"]).unwrap(), Invocation::Version);
        assert_eq!(parse_invocation(&["--version"]).unwrap(), Invocation::Version);
        assert_eq!(
            parse_invocation(&["s", "l", "--help"]).unwrap_err().reason(),
            &Reason::UnknownLong("help".into())
        );
        // As a site name it is just a string.
        assert!(matches!(
            parse_invocation(&["--help", "login"]).unwrap(),
            Invocation::Generate(_)
        ));
    }

    #[cfg(unix)]
    #[test]
    fn non_unicode_arguments_are_rejected() {
        use std::os::unix::ffi::OsStringExt;

        let args = vec![OsString::from("site"), OsString::from_vec(vec![0x66, 0xff])];
        assert_eq!(from_os(args).unwrap_err().reason(), &Reason::NotUnicode);
    }

    #[test]
    fn debug_hides_the_password() {
        let opts = ok(&["s", "l", "hunter2"]);
        let shown = format!("{opts:?}");
        assert!(!shown.contains("hunter2"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn step_reports_consumed_tokens() {
        let tokens = ["-lL", "7", "--counter", "2"];
        let open = step(&tokens, 0, State::ExpectOption).unwrap();
        assert_eq!(open, Step::to(State::InBundle("lL"), 1));

        let l = step(&tokens, 1, State::InBundle("lL")).unwrap();
        assert_eq!(l.flag, Some(Flag::Include(CharClass::Lowercase)));
        assert_eq!(l.next, State::InBundle("L"));
        assert_eq!(l.consumed, 0);

        let len = step(&tokens, 1, State::InBundle("L")).unwrap();
        assert_eq!(len, Step::emit(Flag::Length(7), State::ExpectOption, 1));

        let counter = step(&tokens, 2, State::ExpectOption).unwrap();
        assert_eq!(counter, Step::emit(Flag::Counter(2), State::ExpectOption, 2));
    }
}

// end of source
