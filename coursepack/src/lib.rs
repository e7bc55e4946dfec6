//! Coursepack - course module staging for video-training submissions
//!
//! This library loads a course module from its authoring folder, validates
//! its metadata, and stages the files a publisher expects into a build
//! directory: a `.meta` XML file, a demo bundle, the questions file, the
//! slide deck, and renamed video clips.
//!
//! # Example
//!
//! ```no_run
//! use coursepack::{Module, StageOptions};
//!
//! # async fn run() -> coursepack::StageResult<()> {
//! let module = Module::load_from_yaml("foo-fundamentals", "m1-fooFunModule/module.yaml").await?;
//! for message in module.validate() {
//!     eprintln!("{}", message);
//! }
//! let staged = module
//!     .stage_all("build/m1", "clips", &StageOptions::default())
//!     .await?;
//! println!("{} files staged", staged.file_count());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod module;
pub mod naming;
mod stage;

pub use config::{StageOptions, ValidationLimits};
pub use error::{StageError, StageResult};
pub use module::Module;
pub use stage::{StagedModule, MODULE_NAMESPACE};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
