//! Character classes and the class bitmask shared by the parser, the
//! resolver and the engine.
//!
//! Bit layout (stable, reported in diagnostics):
//! - 0x01 lowercase
//! - 0x02 uppercase
//! - 0x04 digits
//! - 0x08 symbols

use std::fmt;

/* -------------------------------------------------------------------------- */
/*                               Char classes                                 */
/* -------------------------------------------------------------------------- */

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum CharClass {
    Lowercase,
    Uppercase,
    Digits,
    Symbols,
}

impl CharClass {
    /// Rendering order of the engine.
    pub const ALL: [CharClass; 4] = [
        CharClass::Lowercase,
        CharClass::Uppercase,
        CharClass::Digits,
        CharClass::Symbols,
    ];

    #[inline]
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }

    #[inline]
    pub fn alphabet(self) -> &'static [u8] {
        match self {
            CharClass::Lowercase => LOWERCASE,
            CharClass::Uppercase => UPPERCASE,
            CharClass::Digits => DIGITS,
            CharClass::Symbols => SYMBOLS,
        }
    }

    /// Letter used by the short inclusion flag (`-l`, `-u`, `-d`, `-s`).
    pub fn flag(self) -> char {
        match self {
            CharClass::Lowercase => 'l',
            CharClass::Uppercase => 'u',
            CharClass::Digits => 'd',
            CharClass::Symbols => 's',
        }
    }

    pub fn from_flag(flag: char) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.flag() == flag)
    }
}

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/* -------------------------------------------------------------------------- */
/*                                  Charset                                   */
/* -------------------------------------------------------------------------- */

/// Set of enabled character classes.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Charset(u8);

impl Charset {
    pub const EMPTY: Charset = Charset(0);
    pub const ALL: Charset = Charset(0x0f);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn contains(self, class: CharClass) -> bool {
        self.0 & class.bit() != 0
    }

    #[must_use]
    pub const fn with(self, class: CharClass) -> Self {
        Charset(self.0 | class.bit())
    }

    #[must_use]
    pub const fn without(self, class: CharClass) -> Self {
        Charset(self.0 & !class.bit())
    }

    /// Enabled classes in rendering order.
    pub fn classes(self) -> impl Iterator<Item = CharClass> {
        CharClass::ALL
            .into_iter()
            .filter(move |class| self.contains(*class))
    }
}

impl FromIterator<CharClass> for Charset {
    fn from_iter<I: IntoIterator<Item = CharClass>>(iter: I) -> Self {
        iter.into_iter().fold(Charset::EMPTY, Charset::with)
    }
}

/// Renders as the equivalent inclusion bundle, e.g. `-lud`.
impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("-")?;
        for class in self.classes() {
            write!(f, "{}", class.flag())?;
        }
        Ok(())
    }
}

impl fmt::Debug for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Charset({self} {:#04x})", self.0)
    }
}

/* -------------------------------------------------------------------------- */
/*                     Compile-time invariant validation                      */
/* -------------------------------------------------------------------------- */

const fn distinct(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        let mut j = i + 1;
        while j < bytes.len() {
            if bytes[i] == bytes[j] {
                return false;
            }
            j += 1;
        }
        i += 1;
    }
    true
}

const fn printable(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] <= b' ' || bytes[i] > b'~' {
            return false;
        }
        i += 1;
    }
    true
}

const _: () = {
    assert!(distinct(LOWERCASE) && LOWERCASE.len() == 26);
    assert!(distinct(UPPERCASE) && UPPERCASE.len() == 26);
    assert!(distinct(DIGITS) && DIGITS.len() == 10);
    assert!(distinct(SYMBOLS) && SYMBOLS.len() == 32);
    assert!(printable(SYMBOLS));
};


// end of source
