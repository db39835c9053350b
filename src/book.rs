use std::fmt;

// the books are generated from a single table so that the names cannot drift apart
macro_rules! bible_books {
    ($($variant:ident => $osis:literal, $short:literal, $full:literal, [$($alt:literal),*];)*) => {
        /// The canonical books, in canonical order.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum BibleBook {
            $($variant),*
        }

        impl BibleBook {
            pub const ALL: &'static [BibleBook] = &[$(BibleBook::$variant),*];

            /// The OSIS identifier, e.g. `1Cor`.
            pub fn osis(self) -> &'static str {
                match self {
                    $(BibleBook::$variant => $osis),*
                }
            }
            /// The name used when printing references, e.g. `1 Cor`.
            pub fn short_name(self) -> &'static str {
                match self {
                    $(BibleBook::$variant => $short),*
                }
            }
            pub fn full_name(self) -> &'static str {
                match self {
                    $(BibleBook::$variant => $full),*
                }
            }
            pub fn alternates(self) -> &'static [&'static str] {
                match self {
                    $(BibleBook::$variant => &[$($alt),*]),*
                }
            }
        }
    };
}

bible_books! {
    Gen => "Gen", "Gen", "Genesis", ["Ge", "Gn"];
    Exod => "Exod", "Exod", "Exodus", ["Ex", "Exo"];
    Lev => "Lev", "Lev", "Leviticus", ["Lv"];
    Num => "Num", "Num", "Numbers", ["Nb", "Nm"];
    Deut => "Deut", "Deut", "Deuteronomy", ["Dt"];
    Josh => "Josh", "Josh", "Joshua", ["Jos"];
    Judg => "Judg", "Judg", "Judges", ["Jdg", "Jg"];
    Ruth => "Ruth", "Ruth", "Ruth", ["Rth"];
    Sam1 => "1Sam", "1 Sam", "1 Samuel", ["1Sm", "1 S"];
    Sam2 => "2Sam", "2 Sam", "2 Samuel", ["2Sm", "2 S"];
    Kgs1 => "1Kgs", "1 Kgs", "1 Kings", ["1Ki", "1K"];
    Kgs2 => "2Kgs", "2 Kgs", "2 Kings", ["2Ki", "2K"];
    Chr1 => "1Chr", "1 Chr", "1 Chronicles", ["1Ch"];
    Chr2 => "2Chr", "2 Chr", "2 Chronicles", ["2Ch"];
    Ezra => "Ezra", "Ezra", "Ezra", ["Ezr"];
    Neh => "Neh", "Neh", "Nehemiah", ["Ne"];
    Esth => "Esth", "Esth", "Esther", ["Est"];
    Job => "Job", "Job", "Job", ["Jb"];
    Ps => "Ps", "Ps", "Psalms", ["Psalm", "Pss", "Psa"];
    Prov => "Prov", "Prov", "Proverbs", ["Pr", "Prv"];
    Eccl => "Eccl", "Eccl", "Ecclesiastes", ["Ecc", "Qoh", "Qoheleth"];
    Song => "Song", "Song", "Song of Solomon", ["Song of Songs", "SOS", "Canticles"];
    Isa => "Isa", "Isa", "Isaiah", ["Is"];
    Jer => "Jer", "Jer", "Jeremiah", ["Jr"];
    Lam => "Lam", "Lam", "Lamentations", ["La"];
    Ezek => "Ezek", "Ezek", "Ezekiel", ["Ezk", "Eze"];
    Dan => "Dan", "Dan", "Daniel", ["Dn"];
    Hos => "Hos", "Hos", "Hosea", ["Ho"];
    Joel => "Joel", "Joel", "Joel", ["Jl"];
    Amos => "Amos", "Amos", "Amos", ["Am"];
    Obad => "Obad", "Obad", "Obadiah", ["Ob"];
    Jonah => "Jonah", "Jonah", "Jonah", ["Jnh"];
    Mic => "Mic", "Mic", "Micah", ["Mi"];
    Nah => "Nah", "Nah", "Nahum", ["Na"];
    Hab => "Hab", "Hab", "Habakkuk", ["Hb"];
    Zeph => "Zeph", "Zeph", "Zephaniah", ["Zp"];
    Hag => "Hag", "Hag", "Haggai", ["Hg"];
    Zech => "Zech", "Zech", "Zechariah", ["Zc"];
    Mal => "Mal", "Mal", "Malachi", ["Ml"];
    Matt => "Matt", "Matt", "Matthew", ["Mt"];
    Mark => "Mark", "Mark", "Mark", ["Mk", "Mrk"];
    Luke => "Luke", "Luke", "Luke", ["Lk"];
    John => "John", "John", "John", ["Jn", "Jhn"];
    Acts => "Acts", "Acts", "Acts", ["Ac"];
    Rom => "Rom", "Rom", "Romans", ["Rm"];
    Cor1 => "1Cor", "1 Cor", "1 Corinthians", ["1Co"];
    Cor2 => "2Cor", "2 Cor", "2 Corinthians", ["2Co"];
    Gal => "Gal", "Gal", "Galatians", ["Ga"];
    Eph => "Eph", "Eph", "Ephesians", ["Ephes"];
    Phil => "Phil", "Phil", "Philippians", ["Php", "Pp"];
    Col => "Col", "Col", "Colossians", ["Co"];
    Thess1 => "1Thess", "1 Thess", "1 Thessalonians", ["1Th"];
    Thess2 => "2Thess", "2 Thess", "2 Thessalonians", ["2Th"];
    Tim1 => "1Tim", "1 Tim", "1 Timothy", ["1Ti"];
    Tim2 => "2Tim", "2 Tim", "2 Timothy", ["2Ti"];
    Titus => "Titus", "Titus", "Titus", ["Tit"];
    Phlm => "Phlm", "Phlm", "Philemon", ["Phm"];
    Heb => "Heb", "Heb", "Hebrews", ["He"];
    Jas => "Jas", "Jas", "James", ["Jm"];
    Pet1 => "1Pet", "1 Pet", "1 Peter", ["1Pt"];
    Pet2 => "2Pet", "2 Pet", "2 Peter", ["2Pt"];
    John1 => "1John", "1 John", "1 John", ["1Jn"];
    John2 => "2John", "2 John", "2 John", ["2Jn"];
    John3 => "3John", "3 John", "3 John", ["3Jn"];
    Jude => "Jude", "Jude", "Jude", ["Jud"];
    Rev => "Rev", "Rev", "Revelation", ["Rv", "Revelations", "Apocalypse"];
}

impl BibleBook {
    /// Looks a book up by its OSIS identifier only.
    pub fn from_osis(osis: &str) -> Option<BibleBook> {
        BibleBook::ALL.iter().copied().find(|b| b.osis().eq_ignore_ascii_case(osis))
    }
}

impl fmt::Display for BibleBook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}

/// Reduces a book name to the form used for matching: lower case
/// alphanumerics only, so that "1 Cor", "1cor" and "1-Cor." all agree.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
