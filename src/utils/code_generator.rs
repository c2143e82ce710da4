use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

/// 券码字符表：大写字母 + 数字，共 36 个符号
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// 券码长度
const CODE_LEN: usize = 12;

/// 生成12位字母数字券码。随机源由调用方注入，种子相同则结果相同。
pub fn generate_coupon_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// 线程随机源的便捷封装
pub fn generate_coupon_code_thread_rng() -> String {
    generate_coupon_code(&mut rand::thread_rng())
}

/// 校验上游配置的预置券码格式（仅告警用，不拦截发放）
pub fn is_valid_coupon_code(code: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^[A-Z0-9]{4,32}$").expect("valid coupon code regex"));
    re.is_match(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_code_shape() {
        let code = generate_coupon_code_thread_rng();
        assert_eq!(code.len(), 12);
        assert!(
            code.chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_same_seed_same_code() {
        let mut a = StdRng::seed_from_u64(2024);
        let mut b = StdRng::seed_from_u64(2024);
        assert_eq!(generate_coupon_code(&mut a), generate_coupon_code(&mut b));
    }

    #[test]
    fn test_different_seeds_differ() {
        // 理论上可能相同，但 36^12 空间下概率可忽略
        let mut a = StdRng::seed_from_u64(1);
        let mut b = StdRng::seed_from_u64(2);
        assert_ne!(generate_coupon_code(&mut a), generate_coupon_code(&mut b));
    }

    #[test]
    fn test_coupon_code_validation() {
        assert!(is_valid_coupon_code("SPA2024"));
        assert!(is_valid_coupon_code("ABCDEFGH1234"));
        assert!(!is_valid_coupon_code("abc123"));
        assert!(!is_valid_coupon_code("HAS SPACE"));
        assert!(!is_valid_coupon_code("X"));
    }
}
