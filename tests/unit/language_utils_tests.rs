/*!
 * Tests for target language handling
 */

use eduspeak::language_utils::TargetLanguage;

/// The selector offers exactly five languages
#[test]
fn test_all_shouldListSupportedCodesInOrder() {
    let codes: Vec<&str> = TargetLanguage::ALL.iter().map(|l| l.code()).collect();
    assert_eq!(codes, vec!["ta", "kn", "hi", "te", "ml"]);
}

/// Every language round-trips through its code and name
#[test]
fn test_fromStr_withCodeOrName_shouldReturnSameLanguage() {
    for language in TargetLanguage::ALL {
        assert_eq!(language.code().parse::<TargetLanguage>().unwrap(), language);
        assert_eq!(language.english_name().parse::<TargetLanguage>().unwrap(), language);
        assert_eq!(language.part3_code().parse::<TargetLanguage>().unwrap(), language);
        assert_eq!(language.to_string(), language.code());
    }
}

#[test]
fn test_fromStr_withEnglish_shouldBeRejected() {
    assert!("en".parse::<TargetLanguage>().is_err());
    assert!("English".parse::<TargetLanguage>().is_err());
}
