//! TOTP 两步验证
//!
//! SHA1 / 6 位 / 30 秒步长，校验时允许前后各 2 个步长的时钟偏差。

use totp_rs::{Algorithm, Secret, TOTP};

use crate::errors::CampusError;

const DIGITS: usize = 6;
const SKEW: u8 = 2;
const STEP: u64 = 30;

/// 生成新的 base32 密钥
pub fn generate_secret() -> String {
    Secret::generate_secret().to_encoded().to_string()
}

fn build(secret: &str) -> Result<TOTP, CampusError> {
    let bytes = Secret::Encoded(secret.to_string())
        .to_bytes()
        .map_err(|e| CampusError::validation(format!("无效的 TOTP 密钥: {e:?}")))?;
    TOTP::new(Algorithm::SHA1, DIGITS, SKEW, STEP, bytes)
        .map_err(|e| CampusError::validation(format!("无效的 TOTP 密钥: {e:?}")))
}

/// 认证器 App 使用的 otpauth URL
pub fn otpauth_url(secret: &str, issuer: &str, account: &str) -> String {
    let label = format!("{}:{}", encode_component(issuer), encode_component(account));
    format!(
        "otpauth://totp/{label}?secret={secret}&issuer={}&algorithm=SHA1&digits={DIGITS}&period={STEP}",
        encode_component(issuer)
    )
}

fn encode_component(s: &str) -> String {
    s.bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'@' => {
                (b as char).to_string()
            }
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// 以指定时间戳校验动态码
pub fn verify_at(secret: &str, token: &str, timestamp: u64) -> bool {
    let token = token.trim();
    if token.len() != DIGITS || !token.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    build(secret)
        .map(|totp| totp.check(token, timestamp))
        .unwrap_or(false)
}

/// 以当前时间校验动态码
pub fn verify(secret: &str, token: &str) -> bool {
    verify_at(secret, token, chrono::Utc::now().timestamp().max(0) as u64)
}

/// 生成指定时间的动态码
pub fn generate_at(secret: &str, timestamp: u64) -> Result<String, CampusError> {
    Ok(build(secret)?.generate(timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_700_000_010;

    #[test]
    fn test_generated_secret_is_base32() {
        let secret = generate_secret();
        assert!(secret.len() >= 26);
        assert!(secret.chars().all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c)));
        assert!(build(&secret).is_ok());
    }

    #[test]
    fn test_token_accepted_within_skew() {
        let secret = generate_secret();
        let code = generate_at(&secret, T0).unwrap();
        assert!(verify_at(&secret, &code, T0));
        assert!(verify_at(&secret, &code, T0 + 2 * STEP));
        assert!(verify_at(&secret, &format!(" {code} "), T0 - STEP));
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let secret = generate_secret();
        assert!(!verify_at(&secret, "12345", T0));
        assert!(!verify_at(&secret, "abcdef", T0));
        assert!(!verify_at("not base32!", "123456", T0));
    }

    #[test]
    fn test_otpauth_url_encodes_label() {
        let url = otpauth_url("JBSWY3DPEHPK3PXP", "Campus Hub", "asha@college.edu");
        assert!(url.starts_with("otpauth://totp/Campus%20Hub:asha@college.edu?"));
        assert!(url.contains("secret=JBSWY3DPEHPK3PXP"));
        assert!(url.contains("issuer=Campus%20Hub"));
    }
}
