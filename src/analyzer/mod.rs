//! # Page Analyzer
//!
//! Parses the token stream of one rulebook page into domain records using a
//! parser combinator design.
//!
//! ## Core Components
//!
//! * **Parser Trait**: [`Parser`] returns every outcome reachable from a position
//! * **Combinators**: small composable parsers, see [`combinators`] and [`prelude`]
//! * **Page Grammars**: one grammar per rulebook page layout, see [`parsers`]
//! * **Classification**: [`page::classify`] turns an outcome list into a page verdict
//!
//! ## Position in the Pipeline
//!
//! ```text
//! PDF bytes → Lexer → Token stream → Analyzer → Domain records → Mapper
//! ```
//!
//! ## Usage Example
//!
//! ```ignore
//! use fabula_import::analyzer::{classify, parsers::armor::parse_armor_page, PageParse, Parser};
//!
//! match classify(parse_armor_page().parse(&tokens, 0)) {
//!     PageParse::Success(armors) => println!("{} armors", armors.len()),
//!     PageParse::TooMany { count, .. } => println!("{count} parses"),
//!     PageParse::Failure(errors) => println!("{:?}", errors.first()),
//! }
//! ```

pub mod combinators;
pub mod core;
pub mod page;
pub mod parsers;
pub mod prelude;

pub use core::ParseError;
pub use core::ParseResult;
pub use core::Parser;
pub use page::{classify, PageParse, ParseFailure};
