//! RFC 6570 URI Templates: expansion and extraction.
//!
//! A [`Template`] wraps a raw template string such as
//! `/repos/{owner}{?page}`. Expanding substitutes named variable values
//! into each `{...}` expression under the rules of the expression's
//! operator; extraction runs the template in reverse, matching a concrete
//! URI against an anchored pattern and recovering the variable values.
//!
//! Both directions are total over their inputs: any template string is
//! accepted, absent variables expand to nothing, and a URI that does not
//! fit the template simply fails to extract.
//!
//! # Example
//!
//! ```
//! use urimatch::{Template, Values};
//!
//! let template = Template::new("https://api.github.com/repos/{owner}/{repo}{/path*}{?page}");
//!
//! let mut vars = Values::new();
//! vars.set("owner", "rust-lang");
//! vars.set("repo", "regex");
//! vars.set("path", vec!["commits", "main"]);
//! assert_eq!(
//!     template.expand(&vars),
//!     "https://api.github.com/repos/rust-lang/regex/commits/main"
//! );
//!
//! let bound = template
//!     .extract("https://api.github.com/repos/rust-lang/regex?page=2")
//!     .unwrap();
//! assert_eq!(bound["owner"], "rust-lang");
//! assert_eq!(bound["page"], "2");
//! ```

mod expr;
mod matcher;
mod operator;
mod template;
mod value;

pub use matcher::{Pattern, PatternError};
pub use template::Template;
pub use value::{Value, Values};
