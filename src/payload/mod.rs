//! Documents sent to the game platform.
//!
//! Records parsed from the rulebook are mapped into item and actor
//! payloads whose shape matches what the platform stores. Every mapping is
//! a pure function of the record and its [`Placement`].

pub mod actor;
pub mod item;

pub use actor::*;
pub use item::*;

use crate::model::Stat;
use crate::token::ImageToken;
use serde::{Deserialize, Serialize};

/// A `{ "value": … }` wrapper, the platform's field convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field<T> {
    pub value: T,
}

pub fn field<T>(value: T) -> Field<T> {
    Field { value }
}

/// Where a mapped entity lives: its image directory, folder and source tag.
#[derive(Debug, Clone, Copy)]
pub struct Placement<'a> {
    pub image_path: &'a str,
    pub folder_id: &'a str,
    pub source: &'a str,
}

impl Placement<'_> {
    /// Path of an uploaded image, see [`ImageToken::file_name`].
    pub fn image_for(&self, image: &ImageToken, name: &str) -> String {
        format!("{}/{}", self.image_path, image.file_name(name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributePair {
    pub primary: Field<Stat>,
    pub secondary: Field<Stat>,
}

impl AttributePair {
    pub fn new(primary: Stat, secondary: Stat) -> Self {
        Self {
            primary: field(primary),
            secondary: field(secondary),
        }
    }
}
