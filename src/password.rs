//! Deterministic password engine (LessPass v2).
//!
//! Guarantees:
//! - Same site, login, secret and settings always give the same password
//! - At least one char from each enabled class
//! - Settings are clamped to what the renderer supports, and the applied
//!   value is reported back so callers can detect clamping
//!
//! Derivation:
//!   entropy = PBKDF2-HMAC-SHA256(secret, site ‖ login ‖ hex(counter), 100k, 32B)
//! The entropy is consumed as one 256-bit integer by repeated division.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use tracing::{debug, trace};

use crate::charset::{CharClass, Charset};

pub const DEFAULT_LENGTH: u32 = 16;
pub const DEFAULT_COUNTER: u32 = 1;
pub const MIN_LENGTH: u32 = 5;
pub const MAX_LENGTH: u32 = 35;

const ITERATIONS: u32 = 100_000;
const ENTROPY_BYTES: usize = 32;

/* -------------------------------------------------------------------------- */
/*                               Engine boundary                              */
/* -------------------------------------------------------------------------- */

/// A requested engine setting.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Setting<T> {
    /// Apply the compiled-in default.
    Unset,
    Explicit(T),
}

impl<T> From<Option<T>> for Setting<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Setting::Unset, Setting::Explicit)
    }
}

/// Generation context for one invocation.
///
/// Each setter applies the request and returns the value actually in effect,
/// which differs from an explicit request when the engine had to clamp it.
pub trait Engine {
    fn set_charsets(&mut self, requested: Setting<Charset>) -> Charset;
    fn set_length(&mut self, requested: Setting<i64>) -> u32;
    fn set_counter(&mut self, requested: Setting<i64>) -> u32;
    fn generate(&self, site: &str, login: &str, secret: &str) -> String;
}

/* -------------------------------------------------------------------------- */
/*                                  LessPass                                  */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone)]
pub struct LessPass {
    charsets: Charset,
    length: u32,
    counter: u32,
}

impl LessPass {
    pub fn new() -> Self {
        Self {
            charsets: Charset::ALL,
            length: DEFAULT_LENGTH,
            counter: DEFAULT_COUNTER,
        }
    }

    fn entropy(&self, site: &str, login: &str, secret: &str) -> [u8; ENTROPY_BYTES] {
        let salt = format!("{site}{login}{:x}", self.counter);
        let mut out = [0u8; ENTROPY_BYTES];
        pbkdf2_hmac::<Sha256>(secret.as_bytes(), salt.as_bytes(), ITERATIONS, &mut out);
        out
    }
}

impl Default for LessPass {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for LessPass {
    fn set_charsets(&mut self, requested: Setting<Charset>) -> Charset {
        self.charsets = match requested {
            Setting::Explicit(set) if !set.is_empty() => set,
            Setting::Explicit(_) => {
                debug!("empty character set requested, keeping the default");
                Charset::ALL
            }
            Setting::Unset => Charset::ALL,
        };
        self.charsets
    }

    fn set_length(&mut self, requested: Setting<i64>) -> u32 {
        self.length = match requested {
            Setting::Explicit(n) => clamp(n, MIN_LENGTH, MAX_LENGTH),
            Setting::Unset => DEFAULT_LENGTH,
        };
        self.length
    }

    fn set_counter(&mut self, requested: Setting<i64>) -> u32 {
        self.counter = match requested {
            Setting::Explicit(n) => clamp(n, 1, u32::MAX),
            Setting::Unset => DEFAULT_COUNTER,
        };
        self.counter
    }

    fn generate(&self, site: &str, login: &str, secret: &str) -> String {
        trace!(charsets = %self.charsets, length = self.length, counter = self.counter, "deriving");
        let entropy = self.entropy(site, login, secret);
        render(&entropy, self.charsets, self.length as usize)
    }
}

#[inline]
fn clamp(value: i64, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(i64::from(min), i64::from(max));
    if clamped != value {
        debug!(value, clamped, "setting out of range");
    }
    // In range by construction.
    clamped as u32
}

/* -------------------------------------------------------------------------- */
/*                                  Rendering                                 */
/* -------------------------------------------------------------------------- */

/// Turns entropy into a password of `length` chars drawn from `charsets`.
///
/// The first `length - classes` chars come from the pooled alphabet, then
/// one char per enabled class is drawn and spliced in at derived positions.
fn render(entropy: &[u8; ENTROPY_BYTES], charsets: Charset, length: usize) -> String {
    let mut quotient = quotient::Quotient::from_be_bytes(entropy);
    let classes: Vec<CharClass> = charsets.classes().collect();
    let pool: Vec<u8> = classes.iter().flat_map(|c| c.alphabet()).copied().collect();

    let body = length.saturating_sub(classes.len());
    let mut password: Vec<u8> = (0..body)
        .map(|_| pool[quotient.div_rem(pool.len())])
        .collect();

    let required: Vec<u8> = classes
        .iter()
        .map(|class| {
            let alphabet = class.alphabet();
            alphabet[quotient.div_rem(alphabet.len())]
        })
        .collect();

    for ch in required {
        let at = if password.is_empty() {
            0
        } else {
            quotient.div_rem(password.len())
        };
        password.insert(at, ch);
    }

    // Alphabets are printable ASCII.
    password.into_iter().map(char::from).collect()
}

/* -------------------------------------------------------------------------- */
/*                            256-bit long division                           */
/* -------------------------------------------------------------------------- */

mod quotient {
    /// Unsigned 256-bit integer, most significant limb first.
    pub struct Quotient([u32; 8]);

    impl Quotient {
        pub fn from_be_bytes(bytes: &[u8; 32]) -> Self {
            let mut limbs = [0u32; 8];
            for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(4)) {
                *limb = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
            Self(limbs)
        }

        /// Divides in place by `divisor` and returns the remainder.
        #[inline]
        pub fn div_rem(&mut self, divisor: usize) -> usize {
            debug_assert!(divisor > 0 && divisor <= u32::MAX as usize);
            let divisor = divisor as u64;
            let mut rem = 0u64;
            for limb in self.0.iter_mut() {
                let cur = (rem << 32) | u64::from(*limb);
                *limb = (cur / divisor) as u32;
                rem = cur % divisor;
            }
            rem as usize
        }

        #[cfg(test)]
        pub fn limbs(&self) -> [u32; 8] {
            self.0
        }
    }
}


// end of source
