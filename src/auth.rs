/// API token wrapper that keeps the secret out of debug and log output.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Debug for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Token(****)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exposes_the_raw_token() {
        let token = Token::from("ghp_secret");
        assert_eq!(token.as_str(), "ghp_secret");
    }

    #[test]
    fn debug_output_redacts_the_token() {
        let token = Token::from("ghp_secret");
        let rendered = format!("{token:?}");
        assert!(
            !rendered.contains("ghp_secret"),
            "Debug output must not leak the token, got {rendered}"
        );
    }
}
