//! JSON API routes.

pub mod checkout;
