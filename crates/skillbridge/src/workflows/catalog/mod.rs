//! Category and skill catalog helpers.

pub mod router;
pub mod slug;

pub use router::{catalog_router, SlugRequest, SlugResponse};
pub use slug::{slugify, unique_slug, FALLBACK_SLUG};
