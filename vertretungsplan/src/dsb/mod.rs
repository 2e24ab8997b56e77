//! DSBMobile client.
//!
//! This module talks to the DSBMobile app backend, which schools use to
//! publish their substitution plans.
//!
//! Key characteristics of the backend:
//! - One endpoint, `GetData`, takes gzipped and base64 encoded JSON and
//!   answers in the same format
//! - The answer is a menu tree of unknown depth whose leaves carry
//!   document URLs in `Detail`
//! - Timetables are separate HTML documents fetched by plain GET

mod client;
mod codec;
mod error;
mod menu;
mod mock;
mod transport;
mod types;

pub use client::{DEFAULT_DATA_URL, DsbClient, DsbConfig};
pub use codec::{decode_response, encode_request, format_timestamp, pack, unpack};
pub use error::DsbError;
pub use menu::{
    MenuNode, discover_timetables, discover_urls, is_document_ref, is_timetable_url,
};
pub use mock::MockTransport;
pub use transport::{HttpTransport, Transport};
pub use types::{
    InvalidMenuItem, MenuItem, RESULT_CODE_OK, RequestBody, RequestData, RequestPayload,
    ResponseBody, ResponseEnvelope, menu_items,
};
