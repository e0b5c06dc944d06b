//! Turns the drawing operations of a page into tokens.
//!
//! Only a handful of operators matter: font selection, the text showing
//! operators and image painting. The transformation matrix is tracked so
//! that every image knows its vertical position on the page.

use crate::token::{ImageData, ImageToken, Token};
use lopdf::content::Operation;
use lopdf::{Document, Object};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// A font resource of the page.
#[derive(Debug, Clone, Default)]
pub struct Font {
    pub base_font: String,
    pub encoding: Option<String>,
}

/// An image XObject resource of the page.
#[derive(Debug, Clone)]
pub struct Image {
    pub width: f64,
    pub height: f64,
    pub data: Arc<ImageData>,
}

/// Resources referenced by name from the content stream.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    pub fonts: HashMap<Vec<u8>, Font>,
    pub images: HashMap<Vec<u8>, Image>,
}

/// `[a b c d e f]`
type Matrix = [f64; 6];

const IDENTITY: Matrix = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// `m × n`, the way `cm` concatenates onto the current matrix.
fn multiply(m: &Matrix, n: &Matrix) -> Matrix {
    [
        m[0] * n[0] + m[1] * n[2],
        m[0] * n[1] + m[1] * n[3],
        m[2] * n[0] + m[3] * n[2],
        m[2] * n[1] + m[3] * n[3],
        m[4] * n[0] + m[5] * n[2] + n[4],
        m[4] * n[1] + m[5] * n[3] + n[5],
    ]
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

struct State<'a> {
    font: Option<&'a Font>,
    matrix: Matrix,
    saved: Vec<Matrix>,
    tokens: Vec<Token>,
}

impl<'a> State<'a> {
    fn show(&mut self, strings: &[&[u8]]) {
        let encoding = self.font.and_then(|f| f.encoding.as_deref());
        let text: String = strings
            .iter()
            .map(|bytes| Document::decode_text(encoding, bytes))
            .collect();
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        let font = self.font.map(|f| f.base_font.clone()).unwrap_or_default();
        self.tokens.push(Token::text(text, font));
    }
}

/// Lexes one page. Unknown resources and malformed operands are skipped.
pub fn lex(operations: &[Operation], resources: &Resources) -> Vec<Token> {
    let mut state = State {
        font: None,
        matrix: IDENTITY,
        saved: Vec::new(),
        tokens: Vec::new(),
    };
    for operation in operations {
        let operands = &operation.operands;
        match operation.operator.as_str() {
            "q" => state.saved.push(state.matrix),
            "Q" => state.matrix = state.saved.pop().unwrap_or(IDENTITY),
            "cm" => {
                let values: Vec<f64> = operands.iter().filter_map(number).collect();
                if let Ok(m) = <Matrix>::try_from(values.as_slice()) {
                    state.matrix = multiply(&m, &state.matrix);
                }
            }
            "Tf" => {
                let name = operands.first().and_then(|o| o.as_name().ok());
                state.font = name.and_then(|name| resources.fonts.get(name));
                if state.font.is_none() {
                    trace!(target: "pdf::lexer", ?name, "unknown font");
                }
            }
            "Tj" | "'" | "\"" => {
                if let Some(Object::String(bytes, _)) = operands.last() {
                    state.show(&[bytes.as_slice()]);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let strings: Vec<&[u8]> = items
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(bytes.as_slice()),
                            _ => None,
                        })
                        .collect();
                    state.show(&strings);
                }
            }
            "Do" => {
                let image = operands
                    .first()
                    .and_then(|o| o.as_name().ok())
                    .and_then(|name| resources.images.get(name));
                if let Some(image) = image.filter(|i| i.width > 0.0 && i.height > 0.0) {
                    state.tokens.push(Token::Image(ImageToken {
                        width: image.width,
                        height: image.height,
                        y: state.matrix[5],
                        data: image.data.clone(),
                    }));
                }
            }
            _ => {}
        }
    }
    state.tokens
}
