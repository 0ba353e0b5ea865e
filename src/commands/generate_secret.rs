use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

/// Length of a generated signing secret, before encoding.
pub const SECRET_BYTES: usize = 64;

/// 64 random bytes from the OS-seeded generator, base64 encoded.
pub fn generate_secret() -> String {
    let mut secret = [0u8; SECRET_BYTES];
    rand::thread_rng().fill_bytes(&mut secret);

    general_purpose::STANDARD.encode(secret)
}

pub fn handle_generate_secret_command() {
    println!("🔐 Generated JWT Secret:");
    println!();
    println!("jwt:");
    println!("  secret: \"{}\"", generate_secret());
    println!("  expiration_hours: 1");
    println!();
    println!("Add this to your config/{{environment}}.yaml file or set APP_JWT__SECRET.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_decodes_to_64_bytes() {
        let secret = generate_secret();

        let decoded = general_purpose::STANDARD
            .decode(&secret)
            .expect("Secret should be valid base64");
        assert_eq!(decoded.len(), SECRET_BYTES);
    }

    #[test]
    fn test_secrets_differ() {
        assert_ne!(generate_secret(), generate_secret());
    }
}
