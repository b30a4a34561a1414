//! tunesift: query a music library from the command line.
//!
//! Songs are read from a JSON library file and filtered with the tunesift query
//! language: plain words, tag searches such as `artist = /beatles/`, numeric
//! comparisons such as `#(length > 3:00)` and their combinations. Settings come from
//! `.tunesift.toml` files discovered from the working directory upwards.

#![warn(missing_docs)]

pub mod cli;
