//! Message-to-record extraction pipeline.
//!
//! Each raw message runs through: header decoding → received-date
//! normalization → body extraction → due-date inference → priority
//! classification → pending-task detection → record assembly. [`order`]
//! then imposes the canonical display ordering over the record set.

pub mod body;
pub mod dates;
pub mod due;
pub mod headers;
pub mod keywords;
pub mod priority;
pub mod processor;
pub mod tasks;
pub mod types;

pub use processor::{RecordAssembler, order};
pub use types::{MessageRecord, PointInTime, Priority, RawMessage};
