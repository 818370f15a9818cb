use crate::shared::ids::ProviderAlias;
use getrandom::getrandom;

const ALIAS_SUFFIX_BYTES: usize = 3;

pub fn generate_alias(preface: &str) -> Result<ProviderAlias, String> {
    let mut bytes = [0_u8; ALIAS_SUFFIX_BYTES];
    getrandom(&mut bytes)
        .map_err(|err| format!("failed to generate provider alias randomness: {err}"))?;
    alias_with_suffix(preface, &bytes)
}

fn alias_with_suffix(preface: &str, bytes: &[u8]) -> Result<ProviderAlias, String> {
    let suffix: String = bytes.iter().map(|byte| format!("{byte:02x}")).collect();
    ProviderAlias::parse(&format!("{}-{suffix}", preface.trim_end_matches('-')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_lowercase_hex() {
        let alias = alias_with_suffix("okta-saml", &[0x0a, 0xff, 0x10]).expect("alias");
        assert_eq!(alias.as_str(), "okta-saml-0aff10");
    }

    #[test]
    fn generated_aliases_keep_preface() {
        let alias = generate_alias("onelogin-saml").expect("alias");
        let suffix = alias
            .as_str()
            .strip_prefix("onelogin-saml-")
            .expect("preface kept");
        assert_eq!(suffix.len(), ALIAS_SUFFIX_BYTES * 2);
        assert!(suffix.chars().all(|ch| ch.is_ascii_hexdigit()));
    }

    #[test]
    fn invalid_preface_is_rejected() {
        assert!(generate_alias("okta saml").is_err());
    }
}
