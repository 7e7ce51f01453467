pub mod client;

pub use client::ViaCep;
