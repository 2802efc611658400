//! Modules layer - Infrastructure components shared by features
//!
//! Contains the local upload storage used for news images and documents.

pub mod storage;
