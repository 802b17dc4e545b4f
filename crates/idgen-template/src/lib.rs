//! Template engine for rendering identifier candidates.
//!
//! A template such as `1f:l:@N+` describes how to combine named fields
//! (here the first character of `f`, all of `l`, then a random digit) into
//! an identifier. A [`Template`] session renders one candidate per call and
//! keeps producing distinct alternatives until the combinations run out,
//! so callers can retry when a candidate is already taken.
//!
//! ```rust
//! use idgen_template::{Template, TemplateSettings};
//!
//! let mut template = Template::with_template(TemplateSettings::default(), "1f:l");
//! template.merge_data([
//!     ("Tf".to_string(), "Grace".to_string()),
//!     ("Tl".to_string(), "Hopper".to_string()),
//! ]);
//!
//! assert_eq!(template.generate().unwrap(), "ghopper");
//! assert_eq!(template.generate().unwrap(), "rhopper");
//! ```

pub mod element;
pub mod error;
pub mod parser;
pub mod registry;
mod settings;
mod template;

pub use element::{Element, ElementKind, Window};
pub use error::{Result, TemplateError};
pub use registry::{predefined_data, predefined_data_unprefixed, DataMap};
pub use settings::{TemplateSettings, DEFAULT_PREFIX};
pub use template::{Candidates, Template};
