//! Key line grammar
//!
//! This module provides the parsers for authorized_keys content:
//! - Key type whitelist
//! - Options string parsing
//! - Key line tokenizing and parsing

mod keytype;
mod line;
mod options;

pub use keytype::{DEFAULT_KEY_TYPES, KeyTypeSet};
pub use line::{KeyEntry, tokenize};
pub use options::KeyOptions;
