//! folio-cms — Strapi content for the portfolio
//!
//! [`StrapiClient`] talks to the CMS, [`ContentSource`] is the seam the
//! server and tests plug into, and [`Feed`] pages a store from any source.
//! Rich text, video embeds and the project detail view live here too, since
//! they render CMS shapes directly.

pub mod client;
pub mod config;
pub mod detail;
pub mod dto;
pub mod error;
pub mod feed;
pub mod richtext;
pub mod source;
pub mod video;

pub use client::StrapiClient;
pub use config::CmsConfig;
pub use detail::{render_detail, render_not_found, ProjectDetail};
pub use error::{CmsError, CmsResult};
pub use feed::Feed;
pub use richtext::{render_blocks, Block};
pub use source::ContentSource;
