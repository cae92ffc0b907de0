use plugwiz::text::{
    abbreviate, decompose, precompose, sanitize, sanitize_bytes, split_camel_case, to_camel_case,
    ErrorPolicy, SanitizeOptions,
};

const WORDS: [&str; 7] = [
    "My Plugin Extraordinaire!",
    "Super Duper Plugin",
    "RSS Generator",
    "    ",
    "_",
    "AndreSSuperPLUGIN",
    "AndisSSuper_PluginSTOP !",
];

#[test]
fn test_to_camel_case() {
    for word in
        ["hot flaming cats", "hotFlamingCats", "hot_flaming_cats", "Hot Flaming _ Cats", "Hot_Flaming __ Cats"]
    {
        assert_eq!(to_camel_case(word, true), "HotFlamingCats", "input: {word:?}");
    }
    assert_eq!(to_camel_case("hôt_Flâmíng __ Cåts", false), "hôtFlâmíngCåts");
    assert_eq!(to_camel_case("   ", true), "");
}

#[test]
fn test_split_camel_case() {
    let expected: [&[&str]; 7] = [
        &["My", "Plugin", "Extraordinaire"],
        &["Super", "Duper", "Plugin"],
        &["RSS", "Generator"],
        &[],
        &[],
        &["Andre", "SSuper", "PLUGIN"],
        &["Andis", "SSuper", "Plugin", "STOP"],
    ];
    for (word, expected) in WORDS.iter().zip(expected) {
        assert_eq!(split_camel_case(word), expected, "input: {word:?}");
    }
}

#[test]
fn test_abbreviate() {
    let expected = ["MPE", "SDP", "RG", "", "", "ASP", "ASPS"];
    for (word, expected) in WORDS.iter().zip(expected) {
        assert_eq!(abbreviate(word, 0), expected, "input: {word:?}");
    }
    assert_eq!(abbreviate("AndisSSuper_PluginSTOP !", 2), "AS");
}

#[test]
fn test_abbreviate_respects_limit() {
    for word in WORDS {
        for limit in 1..4 {
            assert!(abbreviate(word, limit).chars().count() <= limit);
        }
    }
}

#[test]
fn test_sanitize_defaults() {
    let expected = [
        "My_Plugin_Extraordinaire_",
        "Super_Duper_Plugin",
        "RSS_Generator",
        "____",
        "_",
        "AndreSSuperPLUGIN",
        "AndisSSuper_PluginSTOP__",
    ];
    let options = SanitizeOptions::default();
    for (word, expected) in WORDS.iter().zip(expected) {
        assert_eq!(sanitize(word, &options), expected, "input: {word:?}");
    }
    assert_eq!(sanitize("Really", &options), "Really");
    assert_eq!(sanitize("", &options), "_");
}

#[test]
fn test_sanitize_transliterating() {
    let options = SanitizeOptions::default().safe_char("").allowed_chars("").transliterate_all();
    let cases = [
        ("Äsbëst-Shop", "AesbestShop"),
        ("Süper Düper Plugin", "SueperDueperPlugin"),
        ("__RiemannΖ", "RiemannZeta"),
        ("    ", ""),
        ("\\_", ""),
        ("Andre'sSSuperPLUGIN", "AndresSSuperPLUGIN"),
        ("AndisSSuper_PluginSTOP !", "AndisSSuperPluginSTOP"),
        ("\"Gauß\"", "Gauss"),
        ("André", "Andre"),
    ];
    for (word, expected) in cases {
        assert_eq!(sanitize(word, &options), expected, "input: {word:?}");
    }
}

#[test]
fn test_sanitize_dash_without_umlauts() {
    let options = SanitizeOptions::default()
        .safe_char("-")
        .allowed_chars("\\")
        .diacritics(true)
        .greek(true);
    let cases = [
        ("Asbest-Shop", "Asbest-Shop"),
        ("Super Duper Plugin", "Super-Duper-Plugin"),
        ("__RiemannΖ", "--RiemannZeta"),
        ("    ", "----"),
        ("\\_", "\\-"),
        ("Andre'sSSuperPLUGIN", "Andre-sSSuperPLUGIN"),
        ("AndisSSuper_PluginSTOP !", "AndisSSuper-PluginSTOP--"),
        ("\"Gauß\"", "-Gau--"),
    ];
    for (word, expected) in cases {
        assert_eq!(sanitize(word, &options), expected, "input: {word:?}");
    }
}

#[test]
fn test_sanitize_without_transliteration() {
    assert_eq!(sanitize("Äsbëst-Shop", &SanitizeOptions::default()), "_sb_st-Shop");
    assert_eq!(sanitize("Äsbëst-Shop", &SanitizeOptions::default().safe_char("")), "sbst-Shop");
    assert_eq!(
        sanitize("Äsbëst-Shop", &SanitizeOptions::default().safe_char("").umlauts(true)),
        "Aesbst-Shop"
    );
}

#[test]
fn test_sanitize_is_idempotent() {
    let options = SanitizeOptions::default().transliterate_all();
    for word in WORDS.iter().chain(&["Äsbëst-Shop", "__RiemannΖ", "\"Gauß\""]) {
        let once = sanitize(word, &options);
        assert_eq!(sanitize(&once, &options), once, "input: {word:?}");
    }
}

#[test]
fn test_sanitize_bytes() {
    let invalid = b"Plug\xffin";
    let replaced = sanitize_bytes(invalid, &SanitizeOptions::default()).unwrap();
    assert_eq!(replaced, "Plug_in");

    let strict = SanitizeOptions::default().on_error(ErrorPolicy::Strict);
    assert!(sanitize_bytes(invalid, &strict).is_err());
    assert_eq!(sanitize_bytes("Plugin".as_bytes(), &strict).unwrap(), "Plugin");
}

#[test]
fn test_normalization() {
    let decomposed = "e\u{0301}";
    assert_eq!(precompose(decomposed, false), "\u{e9}");
    assert_eq!(decompose("\u{e9}", false), decomposed);
    assert_eq!(precompose("\u{fb01}", true), "fi");
    assert_eq!(precompose("\u{fb01}", false), "\u{fb01}");
}

#[test]
fn test_camel_case_round_trip() {
    let words = ["Hot", "Flaming", "Cats"];
    let camel = to_camel_case(&words.join(" "), true);
    assert!(!camel.contains([' ', '_']));
    assert_eq!(split_camel_case(&camel), words);
}
