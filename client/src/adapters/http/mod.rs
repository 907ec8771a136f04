//! HTTP adapter for the Tarmeez API

mod client;

pub use client::HttpBlogApi;
