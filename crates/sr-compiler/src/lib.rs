//! SlotRouter Route Table Compiler
//!
//! This crate compiles declarative route tables (TOML or JSON) into a
//! validated [`sr_core::ViewsConfig`] and lints them for authoring mistakes.

pub mod parser;
pub mod analyzer;
pub mod builder;

pub use analyzer::{analyze_table, AnalyzeReport, Warning};
pub use builder::{build_views_config, BuildError, CompiledRoutes};
pub use parser::{parse_route_table, ParseError, RestorePolicy, RouteSpec, RouteTable, SlotSpec, TableFormat};
