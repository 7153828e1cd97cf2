use itertools::Itertools;
use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha512};

const NONCE_LENGTH: usize = 6;

/// Builds the `apiSig` parameter for an authorized Codeforces API call.
///
/// The signature is `nonce ++ hex(sha512("{nonce}/{method}?{params}#{secret}"))`
/// where `params` is the query string sorted by key, then by value.
pub fn api_signature<R: Rng>(
    rng: &mut R,
    method: &str,
    params: &[(String, String)],
    secret: &str,
) -> String {
    let nonce: String = rng
        .sample_iter(&Alphanumeric)
        .take(NONCE_LENGTH)
        .map(char::from)
        .collect();

    sign_with_nonce(&nonce, method, params, secret)
}

pub(crate) fn sign_with_nonce(
    nonce: &str,
    method: &str,
    params: &[(String, String)],
    secret: &str,
) -> String {
    let query = canonical_query(params);
    let digest = Sha512::digest(format!("{}/{}?{}#{}", nonce, method, query, secret).as_bytes());

    format!("{}{:02x}", nonce, digest.iter().format(""))
}

fn canonical_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .sorted()
        .map(|(key, value)| format!("{}={}", key, value))
        .join("&")
}
