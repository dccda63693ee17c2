use rand::Rng;
use rand::distr::Alphanumeric;

/// 生成大写字母数字随机串（备用码、初始密码）
pub fn generate_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(|c| (c as char).to_ascii_uppercase())
        .collect()
}

/// 生成一组 `XXXX-XXXX` 形式的备用码
pub fn generate_backup_codes(count: usize) -> Vec<String> {
    (0..count)
        .map(|_| {
            let raw = generate_code(8);
            format!("{}-{}", &raw[..4], &raw[4..])
        })
        .collect()
}

/// 统一备用码格式（去掉空白与连字符并转大写）
pub fn normalize_backup_code(code: &str) -> String {
    let compact: String = code
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if compact.len() == 8 {
        format!("{}-{}", &compact[..4], &compact[4..])
    } else {
        compact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_codes_shape() {
        let codes = generate_backup_codes(10);
        assert_eq!(codes.len(), 10);
        for code in &codes {
            assert_eq!(code.len(), 9);
            assert_eq!(code.as_bytes()[4], b'-');
        }
    }

    #[test]
    fn test_normalize_backup_code() {
        assert_eq!(normalize_backup_code("ab12 cd34"), "AB12-CD34");
        assert_eq!(normalize_backup_code("AB12-CD34"), "AB12-CD34");
    }
}
