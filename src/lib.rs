//! # jsonsideload — Sideloaded JSON → Rust model trees
//!
//! Maps a compound JSON document (a primary object plus sibling arrays of
//! related resources) onto statically shaped Rust models.
//!
//! ## Design Principles
//!
//! 1. **Schema-first**: relation fields are registered per model type through
//!    [`Model::schema`], built once, never discovered by reflection
//! 2. **serde does the primitives**: every node is first decoded by serde;
//!    relation directives only overwrite the fields they name
//! 3. **Document is read-only**: one decoded root, borrowed by every
//!    recursive step for sideloaded lookups
//! 4. **Dangling is not an error**: missing relations resolve to `None` or `[]`
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Deserialize;
//! use jsonsideload::sideload_model;
//!
//! #[derive(Debug, Deserialize)]
//! struct Author { id: u64, name: String }
//!
//! #[derive(Debug, Deserialize)]
//! struct Post {
//!     id: u64,
//!     #[serde(skip)]
//!     author: Option<Author>,
//! }
//!
//! sideload_model!(Author);
//! sideload_model!(Post { author: one => "hasone,authors,author_id" });
//!
//! # fn main() -> jsonsideload::Result<()> {
//! let payload = br#"{"id":1,"author_id":2,"authors":[{"id":2,"name":"A"}]}"#;
//! let post: Post = jsonsideload::unmarshal(payload)?;
//! assert_eq!(post.author.unwrap().name, "A");
//! # Ok(())
//! # }
//! ```
//!
//! ## Directives
//!
//! | Directive | Field | Source |
//! |-----------|-------|--------|
//! | `include,rel` | `Option<C>` | object nested at `node.rel` |
//! | `includes,rel` | `Vec<C>` | array nested at `node.rel` |
//! | `hasone,rel,idKey` | `Option<C>` | `document.rel[id == node.idKey]` |
//! | `hasmany,rel,idKey` | `Vec<C>` | `document.rel[id ∈ node.idKey]` |

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod directive;
pub mod document;
pub mod resolve;
pub mod schema;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::Options;
pub use directive::{Directive, DirectiveError, Mode};
pub use document::Document;
pub use resolve::Resolver;
pub use schema::{Field, Model, Schema, SchemaBuilder, SlotKind};

use serde_json::Value;

// ============================================================================
// Entry points
// ============================================================================

/// Decode `payload` and resolve it into a new `M` with default options.
pub fn unmarshal<M: Model>(payload: &[u8]) -> Result<M> {
    Unmarshaler::default().unmarshal(payload)
}

/// Decode `payload` and resolve it onto `model` with default options.
pub fn unmarshal_into<M: Model>(payload: &[u8], model: &mut M) -> Result<()> {
    Unmarshaler::default().unmarshal_into(payload, model)
}

/// Resolve an already decoded tree into a new `M` with default options.
pub fn from_value<M: Model>(value: Value) -> Result<M> {
    Unmarshaler::default().unmarshal_value(value)
}

/// Runs resolution passes with a fixed set of [`Options`].
#[derive(Debug, Clone, Default)]
pub struct Unmarshaler {
    options: Options,
}

impl Unmarshaler {
    pub fn new(options: Options) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn unmarshal<M: Model>(&self, payload: &[u8]) -> Result<M> {
        let document = Document::from_slice(payload)?;
        self.run(&document)
    }

    pub fn unmarshal_into<M: Model>(&self, payload: &[u8], model: &mut M) -> Result<()> {
        let document = Document::from_slice(payload)?;
        self.resolver::<M>(&document).resolve_into(document.root(), model)
    }

    pub fn unmarshal_value<M: Model>(&self, value: Value) -> Result<M> {
        let document = Document::from_value(value)?;
        self.run(&document)
    }

    fn run<M: Model>(&self, document: &Document) -> Result<M> {
        self.resolver::<M>(document).resolve(document.root())
    }

    fn resolver<'d, M: Model>(&'d self, document: &'d Document) -> Resolver<'d> {
        tracing::debug!(keys = document.len(), model = std::any::type_name::<M>(), "unmarshalling document");
        Resolver::new(document, &self.options)
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Malformed JSON provided: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("Malformed JSON provided: expected object, got {0}")]
    NotAnObject(&'static str),

    #[error("Bad directive on field '{field}': {source}")]
    BadDirective {
        field: String,
        #[source]
        source: DirectiveError,
    },

    #[error("Type mismatch on field '{field}': expected {expected}")]
    TypeMismatch { field: String, expected: &'static str },

    #[error("Data is not a sideloaded representation of '{type_name}': {message}")]
    StructuralMismatch { type_name: &'static str, message: String },
}

impl Error {
    /// True for both undecodable bytes and non-object roots.
    pub fn is_malformed_json(&self) -> bool {
        matches!(self, Error::MalformedJson(_) | Error::NotAnObject(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
