use rand::RngCore;

pub const PRIVATE_ID_BYTES: usize = 128;

/// Fresh write credential: random bytes rendered as lowercase hex
pub fn generate_private_id() -> String {
    let mut bytes = [0u8; PRIVATE_ID_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
