//! # sword2flex
//!
//! Export Greek New Testament passages as interlinear FlexText for
//! FieldWorks Language Explorer.
//!
//! ## Features
//!
//! - Parse references such as `John 1:1`, `John 1:1-18`, `John 1:1-5:14`
//! - Read Strong's-tagged Greek from OSIS XML or per-book JSON, with fallback
//! - Gloss words from a Strong's → English JSON lexicon
//! - Attach a phrase translation from a selectable translation module
//! - Write FlexText XML and per-book JSON for a browser viewer
//! - Convert open Strong's datasets (CSV/TSV/JSON) into the gloss format
//!
//! ## Quick Start
//!
//! ```no_run
//! use sword2flex::{ExportConfig, Settings};
//! use sword2flex::export::FlexTextWriter;
//!
//! let interlinear = Settings::resolve(None, None, None).open()?;
//! let passage = interlinear.lookup("John 1:1-3")?;
//!
//! let xml = FlexTextWriter::new(ExportConfig::default()).write_passage(&passage.verses);
//! println!("{xml}");
//! # Ok::<(), sword2flex::Error>(())
//! ```
//!
//! ## Building the model by hand
//!
//! ```
//! use sword2flex::{InterlinearVerse, InterlinearWord};
//!
//! let mut verse = InterlinearVerse::new("John", 1, 1);
//! verse.add_word(InterlinearWord {
//!     greek_word: "Ἐν".into(),
//!     strongs_number: "G1722".into(),
//!     en_gloss: "in".into(),
//!     ..Default::default()
//! });
//! assert_eq!(verse.verse_ref().to_string(), "John 1:1");
//! ```

pub mod books;
pub mod config;
pub mod convert;
pub mod error;
pub mod export;
pub mod interlinear;
pub mod lexicon;
pub mod markup;
pub mod model;
pub mod reference;
pub mod source;
pub(crate) mod util;

pub use books::{Book, NEW_TESTAMENT};
pub use config::{ExportConfig, Settings};
pub use error::{Error, Result};
pub use interlinear::{Interlinear, NO_TRANSLATION};
pub use lexicon::GlossLexicon;
pub use model::{InterlinearVerse, InterlinearWord, Passage};
pub use reference::{PassageRange, VerseRef, parse_reference_range};
pub use source::{SourceChain, TextSource, open_source};
