//! New Testament book names.
//!
//! Sources key their text by OSIS book id (`Matt`, `1John`, ...) or by the
//! book name used in file names. Users type whatever they like. [`Book::lookup`]
//! bridges the two: case-insensitive, spaces ignored.

/// A canonical New Testament book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Book {
    /// Display name, also used for per-book file names.
    pub name: &'static str,
    /// OSIS book identifier.
    pub osis: &'static str,
    aliases: &'static [&'static str],
}

impl Book {
    /// Resolve a user-typed book name.
    pub fn lookup(name: &str) -> Option<&'static Book> {
        let key = fold(name);
        if key.is_empty() {
            return None;
        }
        NEW_TESTAMENT.iter().find(|b| {
            fold(b.name) == key || fold(b.osis) == key || b.aliases.iter().any(|a| fold(a) == key)
        })
    }

    /// Resolve an OSIS book id exactly as it appears in `osisID` attributes.
    pub fn from_osis(osis: &str) -> Option<&'static Book> {
        NEW_TESTAMENT.iter().find(|b| b.osis == osis)
    }
}

fn fold(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Normalize a book name for comparison when it is not in the table.
pub(crate) fn book_key(name: &str) -> String {
    match Book::lookup(name) {
        Some(book) => book.osis.to_string(),
        None => fold(name),
    }
}

macro_rules! book {
    ($name:literal, $osis:literal, [$($alias:literal),* $(,)?]) => {
        Book { name: $name, osis: $osis, aliases: &[$($alias),*] }
    };
}

pub static NEW_TESTAMENT: [Book; 27] = [
    book!("Matthew", "Matt", ["Mt", "Mat"]),
    book!("Mark", "Mark", ["Mk", "Mrk", "Mar"]),
    book!("Luke", "Luke", ["Lk", "Luk"]),
    book!("John", "John", ["Jn", "Jhn", "Joh"]),
    book!("Acts", "Acts", ["Ac", "Act"]),
    book!("Romans", "Rom", ["Ro", "Rm"]),
    book!("1Corinthians", "1Cor", ["1Co"]),
    book!("2Corinthians", "2Cor", ["2Co"]),
    book!("Galatians", "Gal", ["Ga"]),
    book!("Ephesians", "Eph", ["Ep"]),
    book!("Philippians", "Phil", ["Php", "Pp"]),
    book!("Colossians", "Col", ["Co"]),
    book!("1Thessalonians", "1Thess", ["1Th"]),
    book!("2Thessalonians", "2Thess", ["2Th"]),
    book!("1Timothy", "1Tim", ["1Ti"]),
    book!("2Timothy", "2Tim", ["2Ti"]),
    book!("Titus", "Titus", ["Tit"]),
    book!("Philemon", "Phlm", ["Phm", "Philem"]),
    book!("Hebrews", "Heb", ["He"]),
    book!("James", "Jas", ["Jm", "Jam"]),
    book!("1Peter", "1Pet", ["1Pe", "1Pt"]),
    book!("2Peter", "2Pet", ["2Pe", "2Pt"]),
    book!("1John", "1John", ["1Jn", "1Jo"]),
    book!("2John", "2John", ["2Jn", "2Jo"]),
    book!("3John", "3John", ["3Jn", "3Jo"]),
    book!("Jude", "Jude", ["Jud", "Jd"]),
    book!("Revelation", "Rev", ["Re", "Rv", "Apocalypse"]),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name_osis_and_alias() {
        assert_eq!(Book::lookup("Matthew").unwrap().osis, "Matt");
        assert_eq!(Book::lookup("matt").unwrap().name, "Matthew");
        assert_eq!(Book::lookup("Mt").unwrap().osis, "Matt");
        assert_eq!(Book::lookup("1 John").unwrap().osis, "1John");
        assert_eq!(Book::lookup("1jn").unwrap().osis, "1John");
        assert_eq!(Book::lookup("Rev.").unwrap().name, "Revelation");
    }

    #[test]
    fn test_unknown_book() {
        assert!(Book::lookup("Genesis").is_none());
        assert!(Book::lookup("").is_none());
        assert_eq!(book_key("Genesis"), "genesis");
        assert_eq!(book_key("1 Cor"), "1Cor");
    }

    #[test]
    fn test_aliases_are_unambiguous() {
        for book in &NEW_TESTAMENT {
            for alias in book.aliases {
                assert_eq!(Book::lookup(alias).unwrap().osis, book.osis, "{alias}");
            }
            assert_eq!(Book::from_osis(book.osis), Some(book));
        }
    }
}
