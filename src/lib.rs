//! Rust client for the Diffbot content-extraction API.
//!
//! Diffbot analyzes web pages server-side and returns structured JSON; this
//! crate builds the versioned REST request, submits the page URL as a
//! form-encoded POST, and projects the schema-less JSON response into a
//! flat field-access API.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use diffbot::Diffbot;
//!
//! fn main() -> Result<(), diffbot::Error> {
//!     let mut client = Diffbot::new("your-api-token")?;
//!     client.set_timeout(20)?;
//!
//!     client.api_request("https://example.com/some-article")?;
//!     let result = client.parse_response()?;
//!
//!     println!("{}", result.field("title"));
//!     for (name, value) in result.all_fields() {
//!         println!("{name}={value}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Requests are synchronous and blocking; each call uses one transport
//! handle with no pooling, caching or retries. Nested response data is
//! available through [`DiffbotResult::json`].

mod client;
mod error;
mod result;

pub use client::{Diffbot, SUPPORTED_API_VERSION};
pub use error::{Error, Result};
pub use result::{DiffbotResult, OBJECT_SENTINEL, UNKNOWN_SENTINEL};
