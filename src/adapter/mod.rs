//! Platform adapters.
//!
//! Each adapter scopes the token stylesheet to a container selector, boosts
//! its specificity and packages the result in the shape a publishing
//! platform expects. Adapters never touch the filesystem; the workspace
//! writes their [`Artifact`]s under `dist/`.

mod config;
mod pages;
mod platform;
mod scope;
mod tistory;
mod wordpress;

pub use config::{PlatformConfig, PlatformConfigs};
pub use pages::{PagesAdapter, PAGES_DIR};
pub use platform::{default_adapters, AdapterRegistry, Artifact, PlatformAdapter, PlatformKind};
pub use scope::{
    boost_specificity, max_rule_specificity, scope_and_boost, selector_specificity,
    wrap_with_scope, Specificity, BOOST_SUFFIX,
};
pub use tistory::{TistoryAdapter, TISTORY_SNIPPET};
pub use wordpress::{WordpressAdapter, WORDPRESS_CSS};
