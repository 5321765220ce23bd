//! # Model Schemas
//!
//! Every target type implements [`Model`] and exposes a static [`Schema`]:
//! the ordered list of its relation fields, each with a directive and a typed
//! accessor. Schemas are built once per type and never inspected through
//! reflection.
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
//! sideload_model!(Author {});
//! sideload_model!(Post {
//!     author: one => "hasone,authors,author_id",
//! });
//! ```
//!
//! Relation fields should be `#[serde(skip)]` or `#[serde(default)]` so that
//! primitive binding does not require them in the node.

pub mod field;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::resolve::Resolver;
use crate::Result;
pub use field::{Field, SlotKind};
use field::Slot;

/// A type that relation resolution can produce.
pub trait Model: DeserializeOwned + 'static {
    /// Relation fields in declaration order.
    fn schema() -> &'static Schema<Self>;
}

/// Ordered relation fields of model `M`.
pub struct Schema<M> {
    fields: Vec<Field<M>>,
}

impl<M: Model> Schema<M> {
    pub fn builder() -> SchemaBuilder<M> {
        SchemaBuilder { fields: Vec::new() }
    }

    /// Schema for a leaf model with no relation fields.
    pub fn empty() -> Self {
        Self { fields: Vec::new() }
    }
}

impl<M> Schema<M> {
    pub fn fields(&self) -> &[Field<M>] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field<M>> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<M> std::fmt::Debug for Schema<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("model", &std::any::type_name::<M>())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Registers relation fields in declaration order.
pub struct SchemaBuilder<M> {
    fields: Vec<Field<M>>,
}

impl<M: Model> SchemaBuilder<M> {
    /// Register a single-reference field (`include` / `hasone`).
    pub fn one<C: Model>(
        mut self,
        name: &'static str,
        directive: &'static str,
        access: fn(&mut M) -> &mut Option<C>,
    ) -> Self {
        let assign = move |resolver: &Resolver<'_>, model: &mut M, node: Option<&Value>| -> Result<()> {
            let child = match node {
                Some(node) => Some(resolver.resolve_child::<C>(node)?),
                None => None,
            };
            *access(model) = child;
            Ok(())
        };
        let slot = Slot::One(Box::new(assign));
        self.fields.push(Field::new(name, directive, slot));
        self
    }

    /// Register a sequence field (`includes` / `hasmany`).
    pub fn many<C: Model>(
        mut self,
        name: &'static str,
        directive: &'static str,
        access: fn(&mut M) -> &mut Vec<C>,
    ) -> Self {
        let assign = move |resolver: &Resolver<'_>, model: &mut M, nodes: &[&Value]| -> Result<()> {
            let mut children = Vec::with_capacity(nodes.len());
            for node in nodes {
                children.push(resolver.resolve_child::<C>(node)?);
            }
            *access(model) = children;
            Ok(())
        };
        let slot = Slot::Many(Box::new(assign));
        self.fields.push(Field::new(name, directive, slot));
        self
    }

    pub fn build(self) -> Schema<M> {
        Schema { fields: self.fields }
    }
}

/// Implement [`Model`] for a struct, registering its relation fields.
///
/// Each entry is `field: one => "directive"` for `Option<C>` fields or
/// `field: many => "directive"` for `Vec<C>` fields. The schema is built on
/// first use and cached for the life of the process.
#[macro_export]
macro_rules! sideload_model {
    ($model:ty { $($field:ident : $kind:ident => $directive:expr),* $(,)? }) => {
        impl $crate::Model for $model {
            fn schema() -> &'static $crate::Schema<Self> {
                static SCHEMA: ::std::sync::OnceLock<$crate::Schema<$model>> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::Schema::<$model>::builder()
                        $(.$kind(stringify!($field), $directive, |m| &mut m.$field))*
                        .build()
                })
            }
        }
    };
    ($model:ty) => {
        $crate::sideload_model!($model {});
    };
}
