//! Document model and decoding
//!
//! Copyright (c) 2025 Repodata Team
//! Licensed under the Apache-2.0 license

pub mod decode;
pub mod node;

pub use decode::{decode_yaml, reject_duplicate_keys};
pub use node::{Mapping, Node};
