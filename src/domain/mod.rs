// src/domain/mod.rs
//
// Domain Root
//
// Pure value objects: the canonical CEP and the Address it resolves to.
// No I/O happens here.

pub mod address;
pub mod cep;

pub use address::Address;
pub use cep::{canonicalize, valid, Cep, InvalidCode, CEP_LEN};
