#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JamoKind {
    Initial,
    Vowel,
    Final,
}

/// One Hangul letter with its approximate Japanese sound and romanization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Jamo {
    pub grapheme: char,
    pub japanese: &'static str,
    pub romanization: &'static str,
    pub kind: JamoKind,
}

const fn initial(grapheme: char, japanese: &'static str, romanization: &'static str) -> Jamo {
    Jamo {
        grapheme,
        japanese,
        romanization,
        kind: JamoKind::Initial,
    }
}

const fn vowel(grapheme: char, japanese: &'static str, romanization: &'static str) -> Jamo {
    Jamo {
        grapheme,
        japanese,
        romanization,
        kind: JamoKind::Vowel,
    }
}

const fn last(grapheme: char, japanese: &'static str, romanization: &'static str) -> Jamo {
    Jamo {
        grapheme,
        japanese,
        romanization,
        kind: JamoKind::Final,
    }
}

pub const INITIAL_CONSONANTS: [Jamo; 14] = [
    initial('ㄱ', "k/g", "k/g"),
    initial('ㄴ', "n", "n"),
    initial('ㄷ', "t/d", "t/d"),
    initial('ㄹ', "r/l", "r/l"),
    initial('ㅁ', "m", "m"),
    initial('ㅂ', "p/b", "p/b"),
    initial('ㅅ', "s", "s"),
    initial('ㅇ', "ng/なし", "ng/-"),
    initial('ㅈ', "j", "j"),
    initial('ㅊ', "ch", "ch"),
    initial('ㅋ', "k", "k"),
    initial('ㅌ', "t", "t"),
    initial('ㅍ', "p", "p"),
    initial('ㅎ', "h", "h"),
];

pub const BASIC_VOWELS: [Jamo; 10] = [
    vowel('ㅏ', "ア", "a"),
    vowel('ㅑ', "ヤ", "ya"),
    vowel('ㅓ', "オ", "eo"),
    vowel('ㅕ', "ヨ", "yeo"),
    vowel('ㅗ', "オ", "o"),
    vowel('ㅛ', "ヨ", "yo"),
    vowel('ㅜ', "ウ", "u"),
    vowel('ㅠ', "ユ", "yu"),
    vowel('ㅡ', "ウ", "eu"),
    vowel('ㅣ', "イ", "i"),
];

// Shown on the reference table only; not quizzed.
pub const COMPOUND_VOWELS: [Jamo; 4] = [
    vowel('ㅐ', "エ", "ae"),
    vowel('ㅒ', "イェ", "yae"),
    vowel('ㅔ', "エ", "e"),
    vowel('ㅖ', "イェ", "ye"),
];

pub const FINAL_CONSONANTS: [Jamo; 7] = [
    last('ㄱ', "k", "k"),
    last('ㄴ', "n", "n"),
    last('ㄷ', "t", "t"),
    last('ㄹ', "l", "l"),
    last('ㅁ', "m", "m"),
    last('ㅂ', "p", "p"),
    last('ㅇ', "ng", "ng"),
];

/// The 24 letters used by the pronunciation quiz: basic consonants then basic vowels.
pub fn pronunciation_table() -> Vec<&'static Jamo> {
    INITIAL_CONSONANTS.iter().chain(BASIC_VOWELS.iter()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pronunciation_table_has_24_distinct_entries() {
        let table = pronunciation_table();
        assert_eq!(table.len(), 24);
        let graphemes: HashSet<char> = table.iter().map(|j| j.grapheme).collect();
        let romanizations: HashSet<&str> = table.iter().map(|j| j.romanization).collect();
        assert_eq!(graphemes.len(), 24);
        assert_eq!(romanizations.len(), 24, "romanizations double as answers");
    }

    #[test]
    fn graphemes_are_compatibility_jamo() {
        for j in INITIAL_CONSONANTS
            .iter()
            .chain(BASIC_VOWELS.iter())
            .chain(COMPOUND_VOWELS.iter())
            .chain(FINAL_CONSONANTS.iter())
        {
            assert!(('\u{3131}'..='\u{318E}').contains(&j.grapheme), "{j:?}");
        }
    }
}
