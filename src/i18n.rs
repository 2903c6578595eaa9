// ==========================================
// GPL Cart - message translation
// ==========================================
// Catalogs: locales/en.yml (fallback), locales/zh-CN.yml
// Row validation messages and job messages are produced in the
// process-wide locale at the time they are written.
// ==========================================

/// Locales with a message catalog
pub const SUPPORTED_LOCALES: [&str; 2] = ["en", "zh-CN"];

pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// Switch the process-wide locale
///
/// Unknown locales are ignored and `false` is returned.
pub fn set_locale(locale: &str) -> bool {
    if !SUPPORTED_LOCALES.contains(&locale) {
        return false;
    }
    rust_i18n::set_locale(locale);
    true
}

pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// Translate and fill `%{name}` placeholders
///
/// # Example
/// ```no_run
/// use gplcart::i18n::t_with_args;
/// let msg = t_with_args("validation.required", &[("field", "title")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |message, (name, value)| {
        message.replace(&format!("%{{{}}}", name), value)
    })
}
