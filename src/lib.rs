//! Fileferry Core Library
//!
//! Client for a remote FileTransfer endpoint reachable over HTTP with NTLM
//! authentication. It can download a single pending file, download a
//! server-side bundle of every pending file, and upload local files to a
//! remote folder.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`session`] - Authenticated transport session bound to a base address
//! - [`transfer`] - The three remote operations and response interpretation
//! - [`batch`] - Composed helpers: directory upload, download-and-persist

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod session;
pub mod transfer;

// Re-export commonly used types
pub use batch::{SaveOutcome, UploadBatchOutcome, download_and_save, upload_from_path};
pub use session::{Credentials, Session};
pub use transfer::{TransferClient, TransferError, TransferResult, UploadOutcome};
