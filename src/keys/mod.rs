// Accelhub - Keys Module
//
// Named data encryption keys bound to an accel module. Material is held
// in zeroizing buffers and only ever surfaced in redacted form.

mod models;
mod store;

pub use models::{Cipher, CryptoKey, CryptoKeySummary, NewCryptoKey, Redacted, TweakMode, REDACTED};
pub use store::{CryptoKeyStore, InMemoryKeyStore};
