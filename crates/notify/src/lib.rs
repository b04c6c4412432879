//! Notifications and outbound email for the workflow-template marketplace.
//!
//! Two concerns live here:
//!
//! - [`bus`] carries transient in-app notices (toasts, status badges) over
//!   a `tokio::sync::broadcast` channel.
//! - [`email`] renders transactional HTML documents and assembles them
//!   into `lettre` messages. Delivery itself is an external service's
//!   job and stays out of this crate.

pub mod bus;
pub mod email;

pub use bus::{Notice, NoticeBus, Severity};
pub use email::message::{receipt_message, verification_message, EmailConfig, EmailError};
pub use email::templates::{receipt_email, verification_email, Receipt};
