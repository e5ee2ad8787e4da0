//! SlotRouter Core Library
//!
//! This crate provides the routing engine behind SlotRouter, a hash-fragment
//! view switcher for single-page clients whose layout is split into ordered
//! "slots" (primary pane, detail pane, modal, player, ...).
//!
//! # Architecture
//!
//! A navigation is a pure step over an immutable route table:
//!
//! ```text
//! location change
//!     → url: split `#<pathname>?<query>`
//!     → matcher: first route whose pattern matches the full pathname
//!     → projector: (slot, index) of that route in the slot table
//!     → navigation: keep slots to the left, replace the slot, clear the right
//!     → view: render the active views in slot order
//! ```
//!
//! The platform location is injected through [`LocationSource`], so the
//! router runs unchanged against `window.location` (see `sr-wasm`) or an
//! in-memory history ([`MemoryLocation`]).
//!
//! # Modules
//!
//! - `types`: Route ids, slot positions, view keys and parameter maps
//! - `url`: Hash fragment splitting and query parsing
//! - `route`: Route definitions and the slot table
//! - `matcher`: Path matching and URL parameter extraction
//! - `projector`: Route to slot projection
//! - `navigation`: Per-slot navigation state
//! - `view`: View capability and rendering
//! - `location`: Location capability and the in-memory implementation
//! - `router`: Router lifecycle and the initial redirect policy

pub mod types;
pub mod url;
pub mod route;
pub mod matcher;
pub mod projector;
pub mod navigation;
pub mod view;
pub mod location;
pub mod router;

// Re-export commonly used types
pub use types::{Params, QueryParams, RouteId, SlotPosition, UrlParams, ViewKey};
pub use url::{parse_query, HashLocation};
pub use route::{ConfigError, RouteDefinition, ViewsConfig};
pub use matcher::{PathMatcher, RouteMatch};
pub use projector::project;
pub use navigation::{ActiveView, NavigationState, Transition};
pub use view::{render_views, RenderedView, View};
pub use location::{LocationCommand, LocationSource, MemoryLocation, Subscription};
pub use router::{
    normalize_initial_location, DeepLinkRestore, InitialRedirect, MountedRouter, Router,
    RouterBuilder,
};
