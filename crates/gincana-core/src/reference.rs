//! Portuguese Bible reference parsing
//!
//! References are typed by hand in the admin ("Jo 3:16", "Mt 6:9-13", "2 Pe 1:21").
//! Ranges are exploded into single verses because every verse is scored and fetched
//! on its own. Single verses resolve to USFM codes ("JHN.3.16") for the content API.

use log::warn;
use regex::Regex;
use std::{collections::HashMap, fmt, sync::LazyLock};

use crate::CoreError;

// Book token: optional 1-3 prefix, optional space, letters including Latin-1 accents
static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([1-3]?\s?[A-Za-zÀ-ÿ]+)\s+([0-9]+):([0-9]+)-([0-9]+)$")
        .expect("range pattern is valid")
});

static SINGLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([1-3]?\s?[A-Za-zÀ-ÿ]+)\s+([0-9]+):([0-9]+)$").expect("single pattern is valid")
});

/// Portuguese book names and abbreviations to USFM book codes
pub static BOOK_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("Gn", "GEN"), ("Gên", "GEN"), ("Gênesis", "GEN"),
        ("Ex", "EXO"), ("Êx", "EXO"), ("Êxodo", "EXO"),
        ("Lv", "LEV"), ("Levítico", "LEV"),
        ("Nm", "NUM"), ("Números", "NUM"),
        ("Dt", "DEU"), ("Deuteronômio", "DEU"),
        ("Js", "JOS"), ("Josué", "JOS"),
        ("Jz", "JDG"), ("Juízes", "JDG"),
        ("Rt", "RUT"), ("Rute", "RUT"),
        ("1Sm", "1SA"), ("1Samuel", "1SA"),
        ("2Sm", "2SA"), ("2Samuel", "2SA"),
        ("1Rs", "1KI"), ("1Reis", "1KI"),
        ("2Rs", "2KI"), ("2Reis", "2KI"),
        ("1Cr", "1CH"), ("1Crônicas", "1CH"),
        ("2Cr", "2CH"), ("2Crônicas", "2CH"),
        ("Ed", "EZR"), ("Esd", "EZR"), ("Esdras", "EZR"),
        ("Ne", "NEH"), ("Neemias", "NEH"),
        ("Et", "EST"), ("Ester", "EST"),
        ("Jó", "JOB"),
        ("Sl", "PSA"), ("Salmos", "PSA"),
        ("Pv", "PRO"), ("Provérbios", "PRO"),
        ("Ec", "ECC"), ("Eclesiastes", "ECC"),
        ("Ct", "SNG"), ("Cânticos", "SNG"), ("Cantares", "SNG"),
        ("Is", "ISA"), ("Isaías", "ISA"),
        ("Jr", "JER"), ("Jeremias", "JER"),
        ("Lm", "LAM"), ("Lamentações", "LAM"),
        ("Ez", "EZK"), ("Ezequiel", "EZK"),
        ("Dn", "DAN"), ("Dan", "DAN"), ("Daniel", "DAN"),
        ("Os", "HOS"), ("Oséias", "HOS"),
        ("Jl", "JOL"), ("Joel", "JOL"),
        ("Am", "AMO"), ("Amós", "AMO"),
        ("Ob", "OBA"), ("Obadias", "OBA"),
        ("Jn", "JON"), ("Jonas", "JON"),
        ("Mq", "MIC"), ("Miquéias", "MIC"),
        ("Na", "NAM"), ("Naum", "NAM"),
        ("Hc", "HAB"), ("Habacuque", "HAB"),
        ("Sf", "ZEP"), ("Sofonias", "ZEP"),
        ("Ag", "HAG"), ("Ageu", "HAG"),
        ("Zc", "ZEC"), ("Zac", "ZEC"), ("Zacarias", "ZEC"),
        ("Ml", "MAL"), ("Malaquias", "MAL"),
        ("Mt", "MAT"), ("Mateus", "MAT"),
        ("Mc", "MRK"), ("Mar", "MRK"), ("Marcos", "MRK"),
        ("Lc", "LUK"), ("Luc", "LUK"), ("Lucas", "LUK"),
        ("Jo", "JHN"), ("João", "JHN"),
        ("At", "ACT"), ("Atos", "ACT"),
        ("Rm", "ROM"), ("Romanos", "ROM"),
        ("1Co", "1CO"), ("1Coríntios", "1CO"),
        ("2Co", "2CO"), ("2Coríntios", "2CO"),
        ("Gl", "GAL"), ("Gál", "GAL"), ("Gálatas", "GAL"),
        ("Ef", "EPH"), ("Éf", "EPH"), ("Efésios", "EPH"),
        ("Fp", "PHP"), ("Fil", "PHP"), ("Filipenses", "PHP"),
        ("Cl", "COL"), ("Col", "COL"), ("Colossenses", "COL"),
        ("1Ts", "1TH"), ("1Tessalonicenses", "1TH"),
        ("2Ts", "2TH"), ("2Tessalonicenses", "2TH"),
        ("1Tm", "1TI"), ("1Timóteo", "1TI"),
        ("2Tm", "2TI"), ("2Timóteo", "2TI"),
        ("Tt", "TIT"), ("Tito", "TIT"),
        ("Fm", "PHM"), ("Filemom", "PHM"),
        ("Hb", "HEB"), ("Hebreus", "HEB"),
        ("Tg", "JAS"), ("Tia", "JAS"), ("Tiago", "JAS"),
        ("1Pe", "1PE"), ("1Pedro", "1PE"),
        ("2Pe", "2PE"), ("2Pedro", "2PE"),
        ("1Jo", "1JN"), ("1João", "1JN"),
        ("2Jo", "2JN"), ("2João", "2JN"),
        ("3Jo", "3JN"), ("3João", "3JN"),
        ("Jd", "JUD"), ("Judas", "JUD"),
        ("Ap", "REV"), ("Apocalipse", "REV"),
    ])
});

/// A single verse resolved to its USFM book code
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerseRef {
    pub book: &'static str,
    pub chapter: u32,
    pub verse: u32,
}

impl fmt::Display for VerseRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book, self.chapter, self.verse)
    }
}

/// Look up the USFM code for a book token ("2 Pe" and "2Pe" are the same book)
pub fn book_code(book: &str) -> Option<&'static str> {
    let normalized: String = book.chars().filter(|c| !c.is_whitespace()).collect();
    BOOK_CODES.get(normalized.as_str()).copied()
}

pub fn is_verse_range(reference: &str) -> bool {
    RANGE_PATTERN.is_match(reference.trim())
}

/// Most verses a range may cover: Psalm 119, the longest chapter
pub const MAX_RANGE_VERSES: u32 = 176;

/// Reject ranges covering more verses than any chapter holds.
///
/// Single references and inverted ranges pass; only the size is checked.
pub fn check_range_size(reference: &str) -> Result<(), CoreError> {
    let Some(captures) = RANGE_PATTERN.captures(reference.trim()) else {
        return Ok(());
    };
    match (captures[3].parse::<u32>(), captures[4].parse::<u32>()) {
        (Ok(start), Ok(end)) if end < start || end - start < MAX_RANGE_VERSES => Ok(()),
        _ => Err(CoreError::RangeTooLong {
            reference: reference.to_string(),
            max: MAX_RANGE_VERSES,
        }),
    }
}

/// Explode "Mt 6:9-13" into "Mt 6:9" .. "Mt 6:13".
///
/// Anything that is not a valid ascending range comes back unchanged as the only
/// element, including inverted ranges such as "Mt 6:13-9" and ranges longer than
/// [`MAX_RANGE_VERSES`].
pub fn expand_verse_range(reference: &str) -> Vec<String> {
    let Some(captures) = RANGE_PATTERN.captures(reference.trim()) else {
        return vec![reference.to_string()];
    };

    let book = &captures[1];
    let chapter = &captures[2];
    let (Ok(start), Ok(end)) = (captures[3].parse::<u32>(), captures[4].parse::<u32>()) else {
        warn!("invalid verse range \"{}\" (verse number out of range)", reference);
        return vec![reference.to_string()];
    };

    if start > end {
        warn!("invalid verse range \"{}\" (start > end)", reference);
        return vec![reference.to_string()];
    }
    if end - start >= MAX_RANGE_VERSES {
        warn!(
            "invalid verse range \"{}\" (more than {} verses)",
            reference, MAX_RANGE_VERSES
        );
        return vec![reference.to_string()];
    }

    (start..=end)
        .map(|verse| format!("{} {}:{}", book, chapter, verse))
        .collect()
}

/// Resolve a single verse reference ("Jo 3:16") to its canonical form (`JHN.3.16`)
pub fn parse_reference(reference: &str) -> Result<VerseRef, CoreError> {
    let captures = SINGLE_PATTERN
        .captures(reference.trim())
        .ok_or_else(|| CoreError::InvalidReference(reference.to_string()))?;

    let book_token = &captures[1];
    let book = book_code(book_token).ok_or_else(|| CoreError::UnknownBook {
        book: book_token.chars().filter(|c| !c.is_whitespace()).collect(),
        reference: reference.to_string(),
    })?;

    let chapter = captures[2]
        .parse::<u32>()
        .map_err(|_| CoreError::InvalidReference(reference.to_string()))?;
    let verse = captures[3]
        .parse::<u32>()
        .map_err(|_| CoreError::InvalidReference(reference.to_string()))?;

    Ok(VerseRef {
        book,
        chapter,
        verse,
    })
}
