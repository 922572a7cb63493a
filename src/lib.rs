// doccmp: semantic and line-level comparison of two documents.
//
// This is the library root. Extraction turns a file into text, similarity
// and diff consume the two texts, compare ties them together.

pub mod compare;
pub mod config;
pub mod diff;
pub mod error;
pub mod extract;
pub mod output;
pub mod similarity;

#[cfg(feature = "web")]
pub mod web;
