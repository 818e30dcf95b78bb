//! Pluggable URL routing tables.
//!
//! Three interchangeable engines map path patterns to caller-supplied
//! values: [`engines::double_array::DoubleArrayEngine`] (a BASE/CHECK
//! trie), [`engines::tst::TstEngine`] (a ternary search tree), and
//! [`engines::regexp::RegexpEngine`] (one compiled regex per pattern).
//! All three implement [`engine::RouteEngine`] and are built from the same
//! [`record::Record`] list, so they can be swapped by name through the
//! [`registry`] without the caller depending on a concrete engine type.
//!
//! ```
//! use waytrie::{registry, record::Record};
//!
//! registry::register_builtin_engines::<&'static str>();
//! let mut engine = registry::new_url_router::<&'static str>("double_array").unwrap();
//! engine.build(vec![Record::new("/user/:id", "user-profile")]).unwrap();
//! let matched = engine.lookup("/user/42").unwrap();
//! assert_eq!(*matched.value, "user-profile");
//! assert_eq!(matched.params[0].value, "42");
//! ```

pub mod config;
pub mod engine;
pub mod engines;
pub mod error;
pub mod pattern;
pub mod record;
pub mod registry;
pub mod router;

pub use engine::{EngineFactory, RouteEngine};
pub use error::RouterError;
pub use record::{Matched, Param, Params, Record};
pub use router::Router;
