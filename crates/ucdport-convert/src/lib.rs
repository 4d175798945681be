//! # ucdport-convert
//!
//! Maps a deployment-system export onto service and pipeline documents.
//!
//! Handles:
//! - **Source**: Loading the JSON export into applications and components.
//! - **Tags**: Parsing `key:value` tag tokens into mappings.
//! - **Identifier**: Sanitizing free text into schema-safe identifiers.
//! - **Classify**: Inferring the deployment type of an application.
//! - **Template**: Step-group template rules and their matching heuristic.
//! - **Document / Builder**: The generated YAML resources and their construction.
//! - **Convert**: Per-application orchestration into a [`convert::ConversionPlan`].
//! - **Emit**: Writing a plan to the output directory layout.

pub mod builder;
pub mod classify;
pub mod convert;
pub mod document;
pub mod emit;
pub mod identifier;
pub mod source;
pub mod tags;
pub mod template;
