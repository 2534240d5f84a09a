//! Timetable server.
//!
//! Normalizes train and metro timetable spreadsheets into one schedule
//! index and answers station and station-pair lookups over HTTP.

pub mod config;
pub mod domain;
pub mod ingest;
pub mod tabular;
pub mod timetable;
pub mod web;
