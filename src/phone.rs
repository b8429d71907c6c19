//! The fixed monophthong table
//!
//! TIMIT transcribes vowels with ARPABET codes. Only the 14 monophthongs below
//! are treated as vowel occurrences; every other label in an annotation file is
//! ignored. Each entry maps to its IPA symbol and a stable class index (table
//! order) used when rows are handed to a downstream classifier.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A monophthong vowel from the TIMIT phone set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Monophthong {
    Iy,
    Ih,
    Eh,
    Ae,
    Aa,
    Ah,
    Ao,
    Uh,
    Uw,
    Ux,
    Er,
    Ax,
    Ix,
    Axr,
}

impl Monophthong {
    /// All monophthongs in class-index order
    pub const ALL: [Monophthong; 14] = [
        Monophthong::Iy,
        Monophthong::Ih,
        Monophthong::Eh,
        Monophthong::Ae,
        Monophthong::Aa,
        Monophthong::Ah,
        Monophthong::Ao,
        Monophthong::Uh,
        Monophthong::Uw,
        Monophthong::Ux,
        Monophthong::Er,
        Monophthong::Ax,
        Monophthong::Ix,
        Monophthong::Axr,
    ];

    /// Look up a monophthong by its ARPABET code (as written in `.PHN` files)
    ///
    /// Returns `None` for consonants, diphthongs, pauses and anything else
    /// outside the table. Matching is exact (TIMIT codes are lowercase).
    pub fn from_arpabet(code: &str) -> Option<Self> {
        let vowel = match code {
            "iy" => Monophthong::Iy,
            "ih" => Monophthong::Ih,
            "eh" => Monophthong::Eh,
            "ae" => Monophthong::Ae,
            "aa" => Monophthong::Aa,
            "ah" => Monophthong::Ah,
            "ao" => Monophthong::Ao,
            "uh" => Monophthong::Uh,
            "uw" => Monophthong::Uw,
            "ux" => Monophthong::Ux,
            "er" => Monophthong::Er,
            "ax" => Monophthong::Ax,
            "ix" => Monophthong::Ix,
            "axr" => Monophthong::Axr,
            _ => return None,
        };
        Some(vowel)
    }

    /// The ARPABET code
    pub fn arpabet(self) -> &'static str {
        match self {
            Monophthong::Iy => "iy",
            Monophthong::Ih => "ih",
            Monophthong::Eh => "eh",
            Monophthong::Ae => "ae",
            Monophthong::Aa => "aa",
            Monophthong::Ah => "ah",
            Monophthong::Ao => "ao",
            Monophthong::Uh => "uh",
            Monophthong::Uw => "uw",
            Monophthong::Ux => "ux",
            Monophthong::Er => "er",
            Monophthong::Ax => "ax",
            Monophthong::Ix => "ix",
            Monophthong::Axr => "axr",
        }
    }

    /// The IPA symbol stored on every [`VowelOccurrence`](crate::VowelOccurrence)
    pub fn ipa(self) -> &'static str {
        match self {
            Monophthong::Iy => "i",
            Monophthong::Ih => "ɪ",
            Monophthong::Eh => "ɛ",
            Monophthong::Ae => "æ",
            Monophthong::Aa => "ɑ",
            Monophthong::Ah => "ʌ",
            Monophthong::Ao => "ɔ",
            Monophthong::Uh => "ʊ",
            Monophthong::Uw => "u",
            Monophthong::Ux => "ʉ",
            Monophthong::Er => "ɝ",
            Monophthong::Ax => "ə",
            Monophthong::Ix => "ɨ",
            Monophthong::Axr => "ɚ",
        }
    }

    /// Class index in `0..num_monophthongs()`
    pub fn class_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Monophthong {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ipa())
    }
}

/// Number of vowel classes
pub fn num_monophthongs() -> usize {
    Monophthong::ALL.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arpabet_lookup() {
        assert_eq!(Monophthong::from_arpabet("iy"), Some(Monophthong::Iy));
        assert_eq!(Monophthong::from_arpabet("axr"), Some(Monophthong::Axr));
        assert_eq!(Monophthong::from_arpabet("k"), None);
        assert_eq!(Monophthong::from_arpabet("h#"), None);
        // Diphthongs are not in the table
        assert_eq!(Monophthong::from_arpabet("ay"), None);
        assert_eq!(Monophthong::from_arpabet("IY"), None);
    }

    #[test]
    fn test_table_is_consistent() {
        assert_eq!(num_monophthongs(), 14);
        for (i, vowel) in Monophthong::ALL.iter().enumerate() {
            assert_eq!(vowel.class_index(), i);
            assert_eq!(Monophthong::from_arpabet(vowel.arpabet()), Some(*vowel));
        }
    }

    #[test]
    fn test_ipa_symbols() {
        assert_eq!(Monophthong::Iy.ipa(), "i");
        assert_eq!(Monophthong::Ax.ipa(), "ə");
        assert_eq!(Monophthong::Er.to_string(), "ɝ");
    }
}
