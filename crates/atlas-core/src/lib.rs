//! Atlas Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Atlas pipeline
//! and its command-line front end. It includes:
//!
//! - **Diagrams**: the diagram forest model ([`diagram`] module)
//! - **Templates**: the read-only template catalog ([`template::Template`])
//! - **Styles**: visual defaults for generated entities ([`style`] module)
//! - **Identifiers**: collision-resistant id minting ([`identifier::IdGenerator`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)

pub mod color;
pub mod de;
pub mod diagram;
pub mod geometry;
pub mod identifier;
pub mod style;
pub mod template;
