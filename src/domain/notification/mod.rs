//! Notification domain module.
//!
//! - `dispatcher`: per-update dispatch runs over the relevant subscribers
//! - `log`: persisted notification records and their status transitions
//! - `transport`: the email delivery boundary
//! - `links`: unsubscribe, preference and site URLs placed in emails

mod dispatcher;
mod links;
mod log;
pub mod transport;
mod types;

pub use dispatcher::{DispatcherStats, DispatcherStatsSnapshot, NotificationDispatcher};
pub use links::LinkBuilder;
pub use log::NotificationLog;
pub use transport::{
    create_transport, EmailMessage, EmailTransport, SendError, SendReceipt, SimulatedTransport,
};
pub use types::{
    DispatchError, DispatchOutcome, DispatchReport, Notification, NotificationFilter,
    NotificationLogError, NotificationStats, NotificationStatus,
};
