//! Settings resolution
//!
//! A project's settings live in one file under the project root, by default
//! `cypress.json`. Resolution proceeds in a fixed order:
//!
//! 1. **Locate** - the file named by [`ResolutionOptions`], the conventional
//!    default, or none at all when the file is disabled.
//! 2. **Load** - JSON files are read directly; any other file kind goes
//!    through a [`ModuleLoader`].
//! 3. **Bootstrap** - a missing file is created empty in interactive runs
//!    and is fatal otherwise.
//! 4. **Overlay** - the `component` or `e2e` sub-document is merged over the
//!    top level according to the testing type.
//! 5. **Migrate** - JSON files are passed through the [`rewrite`] rules and
//!    written back only when that changed something.
//!
//! # Example
//!
//! ```ignore
//! use settings_core::config::{ConfigResolver, ResolutionOptions, TestingType};
//! use settings_fs::NormalizedPath;
//!
//! let resolver = ConfigResolver::new();
//! let options = ResolutionOptions::new().with_testing_type(TestingType::Component);
//! let settings = resolver.resolve(&NormalizedPath::new("/path/to/project"), &options).await?;
//! ```

mod document;
mod loader;
mod options;
mod resolver;
pub mod rewrite;

pub use document::ConfigDocument;
pub use loader::{FormatLoader, LoadContext, LoadError, ModuleLoader};
pub use options::{ConfigFile, ResolutionOptions, RunArgs, TestingType};
pub use resolver::{ConfigResolver, ResolverSettings, is_json_file};
