//! Short code generation and shape checks.

/// Length of every short code handed out by the service.
pub const SHORT_CODE_LENGTH: usize = 6;

/// Upper and lower case letters plus digits.
pub const ALPHABET: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Produces candidate short codes.
///
/// Implementations are pure generators: they never consult storage, so a
/// generated code is not guaranteed to be unused.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Draws each character uniformly from [`ALPHABET`].
#[derive(Debug, Clone)]
pub struct RandomCodeGenerator {
    length: usize,
}

impl RandomCodeGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl Default for RandomCodeGenerator {
    fn default() -> Self {
        Self::new(SHORT_CODE_LENGTH)
    }
}

impl CodeGenerator for RandomCodeGenerator {
    fn generate(&self) -> String {
        generate_short_code(self.length)
    }
}

pub fn generate_short_code(length: usize) -> String {
    std::iter::repeat_with(|| ALPHABET[rand::random_range(0..ALPHABET.len())] as char)
        .take(length)
        .collect()
}

/// Cheap check run before any lookup: the code must be exactly
/// [`SHORT_CODE_LENGTH`] characters long.
pub fn has_valid_shape(code: &str) -> bool {
    code.chars().count() == SHORT_CODE_LENGTH
}
