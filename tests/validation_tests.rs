use chrono::Duration;
use group_admin_bot::utils::validation::*;

#[cfg(test)]
mod validation_tests {
    use super::*;

    #[test]
    fn test_valid_phone_numbers() {
        let valid = ["+8613812345678", "+85261234567", "+886912345678", "+123456", "+123456789012345"];
        for phone in valid {
            assert!(validate_phone_number(phone).is_ok(), "Should accept phone: {}", phone);
        }
        assert_eq!(validate_phone_number("  +8613812345678\n").unwrap(), "+8613812345678");
    }

    #[test]
    fn test_invalid_phone_numbers() {
        let invalid = [
            "",
            "8613812345678",     // missing +
            "+12345",            // too short
            "+1234567890123456", // too long
            "+86 138 1234 5678", // spaces
            "+86-13812345678",
            "+861381234567a",
        ];
        for phone in invalid {
            assert!(validate_phone_number(phone).is_err(), "Should reject phone: {}", phone);
        }
    }

    #[test]
    fn test_verification_code_format() {
        assert_eq!(validate_verification_code(" 123456 ", 6).unwrap(), "123456");
        assert!(validate_verification_code("12345", 6).is_err());
        assert!(validate_verification_code("1234567", 6).is_err());
        assert!(validate_verification_code("12345a", 6).is_err());
        assert!(validate_verification_code("１２３４５６", 6).is_err()); // full-width digits
        assert!(validate_verification_code("12345678", 8).is_ok());
    }

    #[test]
    fn test_extract_bracketed_group_numbers() {
        assert_eq!(extract_group_number("【621】"), Some("621".to_string()));
        assert_eq!(extract_group_number("请问 [ 999 ] 在吗"), Some("999".to_string()));
        assert_eq!(extract_group_number("(0621)"), Some("621".to_string()));
        assert_eq!(extract_group_number("【1 0 9 6】"), Some("1096".to_string()));
        assert_eq!(extract_group_number("【000】"), Some("0".to_string()));
        assert_eq!(extract_group_number("【12345】"), Some("12345".to_string()));
    }

    #[test]
    fn test_extract_bare_group_numbers() {
        assert_eq!(extract_group_number("001"), Some("1".to_string()));
        assert_eq!(extract_group_number("  1096 "), Some("1096".to_string()));
        assert_eq!(extract_group_number("12"), None);
        assert_eq!(extract_group_number("12345"), None);
        assert_eq!(extract_group_number("群 621"), None);
        assert_eq!(extract_group_number("承兑"), None);
    }

    #[test]
    fn test_parse_target_user() {
        assert_eq!(parse_target_user("123456789").unwrap(), TargetUser::Id(123456789));
        assert_eq!(parse_target_user("@123").unwrap(), TargetUser::Id(123));
        assert_eq!(parse_target_user("@spammer").unwrap(), TargetUser::Username("spammer".to_string()));
        assert!(parse_target_user("").is_err());
        assert!(parse_target_user("@").is_err());
        assert!(parse_target_user("99999999999999999999999").is_err());
    }

    #[test]
    fn test_parse_mute_duration_units() {
        assert_eq!(parse_mute_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_mute_duration("2h").unwrap(), Duration::hours(2));
        assert_eq!(parse_mute_duration("1D").unwrap(), Duration::days(1));
        assert_eq!(parse_mute_duration("45").unwrap(), Duration::minutes(45));
        assert_eq!(parse_mute_duration("10x").unwrap(), Duration::minutes(10));
        assert_eq!(parse_mute_duration("h").unwrap(), Duration::hours(1));
    }

    #[test]
    fn test_parse_mute_duration_rejects_bad_values() {
        assert!(parse_mute_duration("").is_err());
        assert!(parse_mute_duration("0m").is_err());
        assert!(parse_mute_duration("367d").is_err());
        assert!(parse_mute_duration("99999999999999999999m").is_err());
        assert_eq!(
            parse_mute_duration("366d").unwrap().num_seconds(),
            MAX_MUTE_DURATION_SECS
        );
    }

    #[test]
    fn test_format_mute_duration() {
        assert_eq!(format_mute_duration(Duration::minutes(30)), "30分钟");
        assert_eq!(format_mute_duration(Duration::seconds(DEFAULT_MUTE_DURATION_SECS)), "1小时");
        assert_eq!(format_mute_duration(Duration::hours(6)), "6小时");
        assert_eq!(format_mute_duration(Duration::days(2)), "2天");
    }
}
