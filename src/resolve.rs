//! Reconciles parsed options with the engine.
//!
//! Rules:
//! - Inclusion and exclusion flags together are an error, checked before
//!   the engine is touched
//! - Every explicit request must be applied verbatim; a clamped value is an
//!   error naming the field and the requested value
//! - Anything not given falls back to the engine default, unverified
//! - The password comes from the command line, else from the secret source

use std::fmt;

use tracing::debug;

use crate::args::ParsedOptions;
use crate::charset::Charset;
use crate::error::Error;
use crate::password::{Engine, Setting};
use crate::prompt::{SecretSource, PROMPT};

/// Settings the engine has accepted, plus what the caller needs to finish.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub charsets: Charset,
    pub length: u32,
    pub counter: u32,
    pub secret: String,
    pub copy_to_clipboard: bool,
}

impl fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("charsets", &self.charsets)
            .field("length", &self.length)
            .field("counter", &self.counter)
            .field("secret", &"<redacted>")
            .field("copy_to_clipboard", &self.copy_to_clipboard)
            .finish()
    }
}

/// Configures `engine` from `opts`.
///
/// The engine is left configured on success; on error its state is
/// unspecified and it should be dropped.
pub fn resolve<E, S>(opts: &ParsedOptions, engine: &mut E, secrets: &mut S) -> Result<ResolvedConfig, Error>
where
    E: Engine + ?Sized,
    S: SecretSource + ?Sized,
{
    let charsets = match (opts.include, opts.exclude) {
        (Some(_), Some(_)) => return Err(Error::InclusionExclusion),
        (Some(include), None) => {
            let applied = engine.set_charsets(Setting::Explicit(include));
            verify("inclusive charset flags", include.bits(), applied.bits())?;
            applied
        }
        (None, Some(exclude)) => {
            let applied = engine.set_charsets(Setting::Explicit(exclude));
            verify("exclusive charset flags", exclude.bits(), applied.bits())?;
            applied
        }
        (None, None) => engine.set_charsets(Setting::Unset),
    };

    let length = engine.set_length(Setting::from(opts.length));
    if let Some(requested) = opts.length {
        verify("length", requested, length)?;
    }
    let counter = engine.set_counter(Setting::from(opts.counter));
    if let Some(requested) = opts.counter {
        verify("counter", requested, counter)?;
    }
    debug!(%charsets, length, counter, "engine configured");

    let secret = match &opts.password {
        Some(password) => password.clone(),
        None => secrets.read_secret(PROMPT).map_err(Error::ReadPassword)?,
    };

    Ok(ResolvedConfig {
        charsets,
        length,
        counter,
        secret,
        copy_to_clipboard: opts.clipboard,
    })
}

/// Fails unless the engine applied exactly what was requested.
fn verify<R, A>(field: &'static str, requested: R, applied: A) -> Result<(), Error>
where
    R: Into<i64>,
    A: Into<i64>,
{
    let (requested, applied) = (requested.into(), applied.into());
    if requested == applied {
        return Ok(());
    }
    debug!(field, requested, applied, "engine refused value");
    Err(Error::CannotSetTo {
        field,
        value: requested,
    })
}


// end of source
