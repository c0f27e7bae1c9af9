//! Export of interlinear data.
//!
//! - [`FlexTextWriter`]: FlexText XML for FieldWorks Language Explorer
//! - [`export_book`]: per-book JSON for the browser-only app
//!
//! # Example
//!
//! ```no_run
//! use sword2flex::{ExportConfig, Settings};
//! use sword2flex::export::{FlexTextWriter, save_flextext};
//!
//! let interlinear = Settings::resolve(None, None, None).open()?;
//! let passage = interlinear.lookup("John 1:1-5")?;
//!
//! let xml = FlexTextWriter::new(ExportConfig::default())
//!     .with_translation(|v| interlinear.phrase_translation(v))
//!     .write_passage(&passage.verses);
//! save_flextext(&xml, "out".as_ref(), &passage.passage_ref)?;
//! # Ok::<(), sword2flex::Error>(())
//! ```

mod flextext;
mod webdata;

pub use flextext::{FlexTextWriter, default_filename, save_flextext};
pub use webdata::{collect_book, export_book};
