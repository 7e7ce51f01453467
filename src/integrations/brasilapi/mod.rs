pub mod client;

pub use client::BrasilApi;
