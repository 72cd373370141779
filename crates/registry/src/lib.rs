//! Name tokenisation, institutional email resolution and registration
//! submission for the membership sign-up service.

pub mod models;
pub mod services;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
