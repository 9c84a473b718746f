use rand::RngCore;
use tokio::task;

use crate::error::AppError;

fn config() -> argon2::Config<'static> {
    if cfg!(test) {
        // keep the test suite fast, the encoded hash records its own cost
        argon2::Config {
            mem_cost: 1024,
            time_cost: 1,
            ..argon2::Config::default()
        }
    } else {
        argon2::Config::default()
    }
}

/// Hashes `password` into an encoded argon2 string on the blocking pool.
pub async fn hash(password: &str) -> Result<String, AppError> {
    let password = password.as_bytes().to_vec();

    Ok(task::spawn_blocking(move || {
        let mut salt = [0u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        argon2::hash_encoded(&password, &salt, &config())
    })
    .await??)
}

pub async fn verify(encoded: &str, password: &str) -> Result<bool, AppError> {
    let encoded = encoded.to_owned();
    let password = password.as_bytes().to_vec();

    Ok(task::spawn_blocking(move || argon2::verify_encoded(&encoded, &password)).await??)
}
