//! Model catalog and registry
//!
//! The catalog is the static, validated list of every model the system knows
//! about, grouped by vendor. A [`ModelRegistry`] narrows it down to the models
//! a deployment may actually use.
//!
//! ```text
//! ModelCatalog
//! ├─ VendorCatalog (anthropic)
//! │  └─ ModelVariant (id, api_id, aliases, tier_class)
//! └─ VendorCatalog (openai)
//!    └─ ModelVariant ...
//!
//! "anthropic:claude-sonnet-4.5" ──parse_spec──▶ ModelSpec { Anthropic, "claude-sonnet-4-5" }
//! ```
//!
//! Identifiers are resolved once into a [`ModelSpec`], which carries the
//! canonical variant id and is the key used everywhere else (client pool,
//! routing, allow-list).

pub mod capability;
pub mod model_catalog;
pub mod registry;
pub mod spec;
pub mod variant;
pub mod vendor;
pub mod vendor_catalog;

pub use capability::{FastModelOverrides, ModelCapability};
pub use model_catalog::ModelCatalog;
pub use registry::ModelRegistry;
pub use spec::ModelSpec;
pub use variant::{ModelVariant, TierClass};
pub use vendor::Vendor;
pub use vendor_catalog::{VendorCatalog, VendorEntry};
