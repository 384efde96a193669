//! Domain layer modules
//!
//! - `content`: Content updates that trigger notification runs
//! - `storage`: Named-collection persistence (memory or Redis)
//! - `subscriber`: Subscriber store and delivery preferences
//! - `template`: Email template catalog and placeholder engine
//! - `notification`: Notification log, transport and dispatcher

pub mod content;
pub mod notification;
pub mod storage;
pub mod subscriber;
pub mod template;
