//! Language catalog: static table of every language code the crate accepts.
//!
//! Codes are ISO 639-1 two-letter codes. The table is immutable and shared
//! process-wide through a `OnceLock` singleton.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Catalog entry for one language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageConfig {
    /// ISO 639-1 language code (e.g., "en", "es")
    pub code: &'static str,

    /// English display name (e.g., "English", "Spanish")
    pub name: &'static str,
}

impl LanguageConfig {
    const fn new(code: &'static str, name: &'static str) -> Self {
        Self { code, name }
    }
}

/// Global language catalog.
pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
    by_code: HashMap<&'static str, usize>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global catalog, building the code index on first use.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: LANGUAGES,
            by_code: LANGUAGES
                .iter()
                .enumerate()
                .map(|(i, lang)| (lang.code, i))
                .collect(),
        })
    }

    /// Look up a language by code.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace, so
    /// `" FR "` finds French.
    pub fn get_by_code(&self, code: &str) -> Option<&'static LanguageConfig> {
        let normalized = code.trim().to_ascii_lowercase();
        self.by_code
            .get(normalized.as_str())
            .map(|&i| &self.languages[i])
    }

    /// Whether `code` names a catalogued language.
    pub fn is_valid(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }

    /// Display name for `code`, or `None` when unknown.
    pub fn name_of(&self, code: &str) -> Option<&'static str> {
        self.get_by_code(code).map(|lang| lang.name)
    }

    /// All catalogued languages in code order.
    pub fn list_all(&self) -> &'static [LanguageConfig] {
        self.languages
    }
}

static LANGUAGES: &[LanguageConfig] = &[
    LanguageConfig::new("aa", "Afar"),
    LanguageConfig::new("ab", "Abkhazian"),
    LanguageConfig::new("af", "Afrikaans"),
    LanguageConfig::new("am", "Amharic"),
    LanguageConfig::new("ar", "Arabic"),
    LanguageConfig::new("as", "Assamese"),
    LanguageConfig::new("ay", "Aymara"),
    LanguageConfig::new("az", "Azerbaijani"),
    LanguageConfig::new("ba", "Bashkir"),
    LanguageConfig::new("be", "Belarusian"),
    LanguageConfig::new("bg", "Bulgarian"),
    LanguageConfig::new("bh", "Bihari"),
    LanguageConfig::new("bi", "Bislama"),
    LanguageConfig::new("bn", "Bengali"),
    LanguageConfig::new("bo", "Tibetan"),
    LanguageConfig::new("br", "Breton"),
    LanguageConfig::new("ca", "Catalan"),
    LanguageConfig::new("co", "Corsican"),
    LanguageConfig::new("cs", "Czech"),
    LanguageConfig::new("cy", "Welsh"),
    LanguageConfig::new("da", "Danish"),
    LanguageConfig::new("de", "German"),
    LanguageConfig::new("dz", "Dzongkha"),
    LanguageConfig::new("el", "Greek"),
    LanguageConfig::new("en", "English"),
    LanguageConfig::new("eo", "Esperanto"),
    LanguageConfig::new("es", "Spanish"),
    LanguageConfig::new("et", "Estonian"),
    LanguageConfig::new("eu", "Basque"),
    LanguageConfig::new("fa", "Persian"),
    LanguageConfig::new("fi", "Finnish"),
    LanguageConfig::new("fj", "Fijian"),
    LanguageConfig::new("fo", "Faroese"),
    LanguageConfig::new("fr", "French"),
    LanguageConfig::new("fy", "Frisian"),
    LanguageConfig::new("ga", "Irish"),
    LanguageConfig::new("gd", "Gaelic"),
    LanguageConfig::new("gl", "Galician"),
    LanguageConfig::new("gn", "Guarani"),
    LanguageConfig::new("gu", "Gujarati"),
    LanguageConfig::new("ha", "Hausa"),
    LanguageConfig::new("hi", "Hindi"),
    LanguageConfig::new("hr", "Croatian"),
    LanguageConfig::new("hu", "Hungarian"),
    LanguageConfig::new("hy", "Armenian"),
    LanguageConfig::new("ia", "Interlingua"),
    LanguageConfig::new("id", "Indonesian"),
    LanguageConfig::new("ie", "Interlingue"),
    LanguageConfig::new("ik", "Inupiak"),
    LanguageConfig::new("is", "Icelandic"),
    LanguageConfig::new("it", "Italian"),
    LanguageConfig::new("iu", "Inuktitut"),
    LanguageConfig::new("ja", "Japanese"),
    LanguageConfig::new("jv", "Javanese"),
    LanguageConfig::new("ka", "Georgian"),
    LanguageConfig::new("kk", "Kazakh"),
    LanguageConfig::new("kl", "Greenlandic"),
    LanguageConfig::new("km", "Cambodian"),
    LanguageConfig::new("kn", "Kannada"),
    LanguageConfig::new("ko", "Korean"),
    LanguageConfig::new("ks", "Kashmiri"),
    LanguageConfig::new("ku", "Kurdish"),
    LanguageConfig::new("ky", "Kirghiz"),
    LanguageConfig::new("la", "Latin"),
    LanguageConfig::new("ln", "Lingala"),
    LanguageConfig::new("lo", "Laothian"),
    LanguageConfig::new("lt", "Lithuanian"),
    LanguageConfig::new("lv", "Latvian"),
    LanguageConfig::new("mg", "Malagasy"),
    LanguageConfig::new("mi", "Maori"),
    LanguageConfig::new("mk", "Macedonian"),
    LanguageConfig::new("ml", "Malayalam"),
    LanguageConfig::new("mn", "Mongolian"),
    LanguageConfig::new("mo", "Moldavian"),
    LanguageConfig::new("mr", "Marathi"),
    LanguageConfig::new("ms", "Malay"),
    LanguageConfig::new("mt", "Maltese"),
    LanguageConfig::new("my", "Burmese"),
    LanguageConfig::new("na", "Nauru"),
    LanguageConfig::new("ne", "Nepali"),
    LanguageConfig::new("nl", "Dutch"),
    LanguageConfig::new("no", "Norwegian"),
    LanguageConfig::new("oc", "Occitan"),
    LanguageConfig::new("om", "Oromo"),
    LanguageConfig::new("or", "Oriya"),
    LanguageConfig::new("pa", "Punjabi"),
    LanguageConfig::new("pl", "Polish"),
    LanguageConfig::new("ps", "Pashto"),
    LanguageConfig::new("pt", "Portuguese"),
    LanguageConfig::new("qu", "Quechua"),
    LanguageConfig::new("rm", "Romansh"),
    LanguageConfig::new("rn", "Kirundi"),
    LanguageConfig::new("ro", "Romanian"),
    LanguageConfig::new("ru", "Russian"),
    LanguageConfig::new("rw", "Kinyarwanda"),
    LanguageConfig::new("sa", "Sanskrit"),
    LanguageConfig::new("sd", "Sindhi"),
    LanguageConfig::new("sg", "Sango"),
    LanguageConfig::new("si", "Sinhalese"),
    LanguageConfig::new("sk", "Slovak"),
    LanguageConfig::new("sl", "Slovenian"),
    LanguageConfig::new("sm", "Samoan"),
    LanguageConfig::new("sn", "Shona"),
    LanguageConfig::new("so", "Somali"),
    LanguageConfig::new("sq", "Albanian"),
    LanguageConfig::new("sr", "Serbian"),
    LanguageConfig::new("ss", "Siswati"),
    LanguageConfig::new("st", "Sesotho"),
    LanguageConfig::new("su", "Sundanese"),
    LanguageConfig::new("sv", "Swedish"),
    LanguageConfig::new("sw", "Swahili"),
    LanguageConfig::new("ta", "Tamil"),
    LanguageConfig::new("te", "Telugu"),
    LanguageConfig::new("tg", "Tajik"),
    LanguageConfig::new("th", "Thai"),
    LanguageConfig::new("ti", "Tigrinya"),
    LanguageConfig::new("tk", "Turkmen"),
    LanguageConfig::new("tl", "Tagalog"),
    LanguageConfig::new("tn", "Setswana"),
    LanguageConfig::new("to", "Tonga"),
    LanguageConfig::new("tr", "Turkish"),
    LanguageConfig::new("ts", "Tsonga"),
    LanguageConfig::new("tt", "Tatar"),
    LanguageConfig::new("tw", "Twi"),
    LanguageConfig::new("uk", "Ukrainian"),
    LanguageConfig::new("ur", "Urdu"),
    LanguageConfig::new("uz", "Uzbek"),
    LanguageConfig::new("vi", "Vietnamese"),
    LanguageConfig::new("vo", "Volapuk"),
    LanguageConfig::new("wo", "Wolof"),
    LanguageConfig::new("xh", "Xhosa"),
    LanguageConfig::new("yi", "Yiddish"),
    LanguageConfig::new("yo", "Yoruba"),
    LanguageConfig::new("za", "Zhuang"),
    LanguageConfig::new("zh", "Chinese"),
    LanguageConfig::new("zu", "Zulu"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_get_returns_singleton() {
        let registry1 = LanguageRegistry::get();
        let registry2 = LanguageRegistry::get();
        assert!(std::ptr::eq(registry1, registry2));
    }

    #[test]
    fn test_get_by_code_english() {
        let config = LanguageRegistry::get().get_by_code("en").unwrap();
        assert_eq!(config.code, "en");
        assert_eq!(config.name, "English");
    }

    #[test]
    fn test_get_by_code_is_case_insensitive() {
        let registry = LanguageRegistry::get();
        assert_eq!(registry.get_by_code("FR").unwrap().name, "French");
        assert_eq!(registry.get_by_code(" de ").unwrap().name, "German");
    }

    #[test]
    fn test_get_by_code_nonexistent() {
        let registry = LanguageRegistry::get();
        assert!(registry.get_by_code("xx").is_none());
        assert!(registry.get_by_code("").is_none());
        assert!(registry.get_by_code("eng").is_none());
    }

    #[test]
    fn test_name_of() {
        let registry = LanguageRegistry::get();
        assert_eq!(registry.name_of("ja"), Some("Japanese"));
        assert_eq!(registry.name_of("zu"), Some("Zulu"));
        assert_eq!(registry.name_of("qq"), None);
    }

    #[test]
    fn test_catalog_has_no_duplicate_codes() {
        let registry = LanguageRegistry::get();
        assert_eq!(registry.by_code.len(), registry.list_all().len());
    }

    #[test]
    fn test_catalog_codes_are_two_lowercase_letters() {
        for lang in LanguageRegistry::get().list_all() {
            assert_eq!(lang.code.len(), 2, "bad code {}", lang.code);
            assert!(lang.code.chars().all(|c| c.is_ascii_lowercase()));
        }
    }

    #[test]
    fn test_catalog_size() {
        assert_eq!(LanguageRegistry::get().list_all().len(), 136);
    }
}
