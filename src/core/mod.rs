/*!
 * Core Module
 * Error handling shared by the resolver, compiler and launcher
 */

pub mod errors;

pub use errors::*;
