//! Organization identifier generation.

use rand::Rng;

const ORG_ID_PREFIX: &str = "HTL-";
const ORG_ID_TOKEN_LEN: usize = 6;
const ORG_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a human-readable organization identifier, e.g. `HTL-4K7Q2Z`.
///
/// The token is non-cryptographic: it identifies an organization on printed
/// material and in support conversations, it is not a secret.
pub fn generate_org_id() -> String {
    let mut rng = rand::thread_rng();
    let token: String = (0..ORG_ID_TOKEN_LEN)
        .map(|_| {
            let index = rng.gen_range(0..ORG_ID_ALPHABET.len());
            ORG_ID_ALPHABET[index] as char
        })
        .collect();
    format!("{ORG_ID_PREFIX}{token}")
}
