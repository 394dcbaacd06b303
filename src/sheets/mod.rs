//! The external side of the waitlist: a minimal Google Sheets v4 client.
//! `ServiceAccount` handles credentials and token assertions, `SheetsClient` does the HTTP calls.

mod client;
mod credentials;
mod error;

pub use client::{SheetsClient, WaitlistRow};
pub use credentials::{ServiceAccount, SHEETS_SCOPE};
pub use error::{Result, SheetsError};
