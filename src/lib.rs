//! Zero-knowledge range proofs built on Bulletproofs and an Inner Product
//! Argument (IPA), following Bünz, Bootle, Boneh, Poelstra, Wuille and
//! Maxwell (2017), extended to arbitrary intervals `[A, B)` via the
//! two-proof reduction of Camenisch, Chaabouni and Shelat (CCS08).
//!
//! A prover convinces a verifier that a Pedersen-committed secret integer
//! lies in a public interval without revealing it. [`range_proof`] proves
//! membership in `[0, 2^n)` directly; [`generic_range`] composes two base
//! proofs to cover an arbitrary `[A, B)`.
//!
//! All group arithmetic runs over Ristretto255
//! (`curve25519_dalek::ristretto`); Fiat-Shamir challenges are derived from
//! a [`merlin::Transcript`].

#![allow(non_snake_case)]

pub mod errors;
pub mod generators;
pub mod generic_range;
pub mod inner_product_proof;
pub mod range_proof;
mod transcript;
mod util;

pub use crate::errors::Error;
pub use crate::generators::{BulletproofGens, PedersenGens};
pub use crate::generic_range::{GenericParams, GenericRangeProof, SetupGeneric};
pub use crate::inner_product_proof::InnerProductProof;
pub use crate::range_proof::{PublicParams, RangeProof, Setup};
