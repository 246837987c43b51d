//! Outbound collaborators — the Strapi backend and remote image origins.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the outbound HTTP clients and their failure
//! taxonomies so route handlers can stay focused on cookie/parameter
//! extraction and error mapping.

pub mod image;
pub mod strapi;
