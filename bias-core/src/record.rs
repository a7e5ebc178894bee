//! Records of diagnostics produced while generating datasets.
//!
//! A [`Record`] is a small key-value container. Dataset generation returns one
//! next to the arrays it builds, carrying advisory statistics such as the
//! fraction of sampled states on which comparator agents disagreed with the
//! primary agent. These statistics are never part of a dataset itself.
//!
//! ```rust
//! use bias_core::record::{Record, RecordValue};
//!
//! let mut record = Record::from_scalar("num_examples", 12.0);
//! record.insert("fraction_different", RecordValue::Array1(vec![0.25]));
//! assert_eq!(record.get_array1("fraction_different").unwrap(), vec![0.25]);
//! ```
mod base;

pub use base::{Record, RecordValue};
