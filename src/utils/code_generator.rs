//! Short code generation.
//!
//! Codes are drawn from the operating system CSPRNG so that consecutive codes
//! cannot be predicted from one another.

/// Symbols a short code may contain.
pub const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Code length used when none is configured.
pub const DEFAULT_CODE_LENGTH: usize = 6;

/// Largest multiple of the alphabet size that fits in a byte (4 * 62).
/// Bytes at or above it are discarded to keep every symbol equally likely.
const ACCEPT_BELOW: u8 = 248;

/// Generates a random code of `length` symbols from [`CODE_ALPHABET`].
///
/// Each symbol is chosen independently and uniformly. Random bytes come from
/// `getrandom`; bytes that would bias the modulo reduction are rejected and
/// redrawn.
///
/// # Errors
///
/// Returns the underlying [`getrandom::Error`] if the entropy source fails.
/// There is no fallback to a weaker generator.
///
/// # Examples
///
/// ```ignore
/// let code = generate_code(6)?;
/// assert_eq!(code.len(), 6);
/// assert!(code.bytes().all(|b| b.is_ascii_alphanumeric()));
/// ```
pub fn generate_code(length: usize) -> Result<String, getrandom::Error> {
    let mut code = String::with_capacity(length);
    let mut buffer = [0u8; 32];

    while code.len() < length {
        getrandom::fill(&mut buffer)?;

        for &byte in buffer.iter().filter(|&&b| b < ACCEPT_BELOW) {
            if code.len() == length {
                break;
            }
            code.push(CODE_ALPHABET[(byte % CODE_ALPHABET.len() as u8) as usize] as char);
        }
    }

    Ok(code)
}

/// Returns true if `code` only uses symbols from [`CODE_ALPHABET`].
pub fn is_alphabet_code(code: &str) -> bool {
    !code.is_empty() && code.bytes().all(|b| CODE_ALPHABET.contains(&b))
}
