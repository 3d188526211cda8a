// src/lib.rs

//! Speech archiver library
//!
//! Resolves the speeches linked from an index page, extracts each one into
//! a tagged XML record and stores them together in a single zip archive.

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
