#![doc = include_str!("./docs/lib.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod context;
mod definition;
mod error;
mod factory;
mod metadata;
mod module;
mod provider;
mod registrar;
mod registry;
mod test_bean;
mod ty;

pub use context::*;
pub use definition::*;
pub use error::{BoxError, OverrideError};
pub use factory::*;
pub use metadata::*;
pub use module::*;
pub use provider::*;
pub use registrar::*;
pub use test_bean::*;
pub use testbean_core::*;
pub use ty::*;

/// Derive [`TestBeans`] for a struct whose fields declare bean overrides.
///
/// See the [crate-level documentation](crate) for the `#[test_bean(..)]` options.
#[cfg_attr(docsrs, doc(cfg(feature = "testbean-macro")))]
#[cfg(feature = "testbean-macro")]
pub use testbean_macro::TestBeans;
