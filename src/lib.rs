//! A declarative path router.
//!
//! Routes pair an RFC 6570 flavoured URI template (`/{title}/{+rest}`) or a
//! raw regex with an arbitrary value. All routes are compiled into a single
//! combined matcher that returns the first route matching a path in a
//! deterministic, lexical dispatch order, together with its parameters.
//!
//! See [`Router`] for the template syntax and an example.
#![deny(clippy::all)]
#![forbid(unsafe_code)]

#[macro_use]
extern crate log;

mod config;
mod descriptor;
mod discovery;
mod error;
mod matcher;
mod params;
mod pattern;
mod router;
mod table;
mod template;

pub use config::Config;
pub use descriptor::RouteDescriptor;
pub use discovery::{load_descriptors, JsonLoader, Loader};
pub use error::{Error, LoadError, RouteError};
pub use matcher::RawMatch;
pub use params::{Groups, Params, ParamsIter};
pub use pattern::{Pattern, Route};
pub use router::{Match, Router};
pub use table::{CompiledRoute, RouteTable};
pub use template::{compile, compile_pattern, sort_key, CompiledTemplate};
