/// 最大公因數（輾轉相除法）
#[must_use]
pub const fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// 將寬高化簡為 `W:H`
///
/// 任一邊為 0 時不化簡，直接回傳原始 `W:H`
#[must_use]
pub fn reduce_ratio(width: u32, height: u32) -> String {
    if width == 0 || height == 0 {
        return format!("{width}:{height}");
    }

    let divisor = gcd(width, height);
    format!("{}:{}", width / divisor, height / divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_ratio_common_sizes() {
        assert_eq!(reduce_ratio(1920, 1080), "16:9");
        assert_eq!(reduce_ratio(1080, 1920), "9:16");
        assert_eq!(reduce_ratio(640, 480), "4:3");
        assert_eq!(reduce_ratio(500, 500), "1:1");
        assert_eq!(reduce_ratio(1001, 7), "143:1");
    }

    #[test]
    fn test_reduce_ratio_zero_dimension_is_unreduced() {
        assert_eq!(reduce_ratio(0, 1080), "0:1080");
        assert_eq!(reduce_ratio(1920, 0), "1920:0");
        assert_eq!(reduce_ratio(0, 0), "0:0");
    }

    #[test]
    fn test_reduce_ratio_properties() {
        for width in (1..400).step_by(7) {
            for height in (1..300).step_by(11) {
                let ratio = reduce_ratio(width, height);
                let (a, b) = ratio.split_once(':').unwrap();
                let (a, b): (u32, u32) = (a.parse().unwrap(), b.parse().unwrap());
                assert_eq!(gcd(a, b), 1, "{width}x{height} -> {ratio}");
                assert_eq!(u64::from(a) * u64::from(height), u64::from(b) * u64::from(width));
            }
        }
    }
}
