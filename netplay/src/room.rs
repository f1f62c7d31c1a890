use rand::Rng;

use crate::NetError;

const CODE_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
pub const ROOM_CODE_LEN: usize = 5;

/// Random room code from A-Z and 0-9
pub fn generate_room_code(rng: &mut impl Rng) -> String {
    (0..ROOM_CODE_LEN)
        .map(|_| {
            let idx = rng.gen_range(0..CODE_CHARS.len());
            CODE_CHARS[idx] as char
        })
        .collect()
}

/// Trim and uppercase a user-typed code, rejecting anything that cannot be one
pub fn normalize_room_code(code: &str, max_len: usize) -> Result<String, NetError> {
    let trimmed = code.trim();
    if trimmed.is_empty()
        || trimmed.len() > max_len
        || !trimmed.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return Err(NetError::InvalidRoomCode(code.to_string()));
    }
    Ok(trimmed.to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_generated_codes_are_valid() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let code = generate_room_code(&mut rng);
            assert_eq!(code.len(), ROOM_CODE_LEN);
            assert_eq!(normalize_room_code(&code, 16).unwrap(), code);
        }
    }

    #[test]
    fn test_normalize_uppercases() {
        assert_eq!(normalize_room_code(" ab12c ", 16).unwrap(), "AB12C");
    }

    #[test]
    fn test_rejects_bad_codes() {
        for bad in ["", "   ", "AB-12", "ÄBC", "TOOLONGCODE"] {
            assert!(
                matches!(normalize_room_code(bad, 8), Err(NetError::InvalidRoomCode(_))),
                "{bad:?} should be rejected"
            );
        }
    }
}
