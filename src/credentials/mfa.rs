//! MFA token providers
//!
//! Role assumption with `mfa_serial` needs a one-time code from the user.
//! [`StdinTokenProvider`] prompts for it on the terminal. The prompt goes to
//! stderr so it never mixes with command output on stdout.

use std::fmt;
use std::io::{self, BufRead, Write};

use crate::error::TokenError;

/// Prompt printed before reading a token code
pub const TOKEN_PROMPT: &str = "Assume Role MFA token code: ";

/// Source of MFA token codes
///
/// Implementations may block; callers run them off the async runtime.
pub trait TokenProvider: Send + Sync + fmt::Debug {
    /// Token code for the MFA device `mfa_serial`
    fn token_code(&self, mfa_serial: &str) -> Result<String, TokenError>;
}

/// Reads token codes interactively from standard input, prompting on stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinTokenProvider;

impl TokenProvider for StdinTokenProvider {
    fn token_code(&self, mfa_serial: &str) -> Result<String, TokenError> {
        tracing::debug!(mfa_serial = %mfa_serial, "Prompting for MFA token code");
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        read_token_code(&mut stdin.lock(), &mut stderr)
    }
}

/// Write the prompt to `output` and read one line from `input`
pub fn read_token_code<R, W>(input: &mut R, output: &mut W) -> Result<String, TokenError>
where
    R: BufRead,
    W: Write,
{
    output.write_all(TOKEN_PROMPT.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(TokenError::Closed);
    }
    Ok(line.trim().to_string())
}

/// Returns the same token code every time
#[derive(Clone)]
pub struct StaticTokenProvider {
    code: String,
}

impl StaticTokenProvider {
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider")
            .field("code", &"** redacted **")
            .finish()
    }
}

impl TokenProvider for StaticTokenProvider {
    fn token_code(&self, _mfa_serial: &str) -> Result<String, TokenError> {
        Ok(self.code.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_token_code_prompts_and_trims() {
        let mut input = Cursor::new(b"123456\n".to_vec());
        let mut output = Vec::new();

        let code = read_token_code(&mut input, &mut output).unwrap();
        assert_eq!(code, "123456");
        assert_eq!(String::from_utf8(output).unwrap(), TOKEN_PROMPT);
    }

    #[test]
    fn test_read_token_code_handles_crlf() {
        let mut input = Cursor::new(b" 654321\r\n".to_vec());
        let code = read_token_code(&mut input, &mut Vec::new()).unwrap();
        assert_eq!(code, "654321");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let mut input = Cursor::new(Vec::new());
        let err = read_token_code(&mut input, &mut Vec::new()).unwrap_err();
        assert!(matches!(err, TokenError::Closed));
    }

    #[test]
    fn test_static_provider_redacts_code() {
        let provider = StaticTokenProvider::new("000000");
        assert_eq!(provider.token_code("arn:aws:iam::1:mfa/a").unwrap(), "000000");
        assert!(!format!("{:?}", provider).contains("000000"));
    }
}
