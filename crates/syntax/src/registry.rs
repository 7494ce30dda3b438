//! Language registry mapping extensions and names to grammars.
//!
//! A [`LanguageConfig`] bundles the tree-sitter `Language` with the
//! highlight query that [`crate::TreeSitterHighlighter`] compiles. The
//! registry maps file extensions and common language names onto the eight
//! bundled grammars.

use std::collections::HashMap;
use tree_sitter::Language;

/// A grammar plus its highlight query.
#[derive(Clone)]
pub struct LanguageConfig {
    pub language: Language,
    pub highlights_query: &'static str,
}

impl LanguageConfig {
    pub fn new(language: Language, highlights_query: &'static str) -> Self {
        Self {
            language,
            highlights_query,
        }
    }
}

/// Registry of bundled languages keyed by file extension.
pub struct LanguageRegistry {
    configs: HashMap<&'static str, LanguageConfig>,
}

impl LanguageRegistry {
    /// A registry with no languages; every lookup misses.
    pub fn empty() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// A registry with all bundled languages.
    pub fn new() -> Self {
        let mut configs = HashMap::new();

        let rust = LanguageConfig::new(
            tree_sitter_rust::LANGUAGE.into(),
            tree_sitter_rust::HIGHLIGHTS_QUERY,
        );
        configs.insert("rs", rust);

        // Note: the C grammar names its query HIGHLIGHT_QUERY (no S).
        let c = LanguageConfig::new(tree_sitter_c::LANGUAGE.into(), tree_sitter_c::HIGHLIGHT_QUERY);
        configs.insert("c", c.clone());
        configs.insert("h", c);

        let python = LanguageConfig::new(
            tree_sitter_python::LANGUAGE.into(),
            tree_sitter_python::HIGHLIGHTS_QUERY,
        );
        configs.insert("py", python);

        let javascript = LanguageConfig::new(
            tree_sitter_javascript::LANGUAGE.into(),
            tree_sitter_javascript::HIGHLIGHT_QUERY,
        );
        configs.insert("js", javascript.clone());
        configs.insert("jsx", javascript.clone());
        configs.insert("mjs", javascript);

        let json = LanguageConfig::new(
            tree_sitter_json::LANGUAGE.into(),
            tree_sitter_json::HIGHLIGHTS_QUERY,
        );
        configs.insert("json", json);

        let html = LanguageConfig::new(
            tree_sitter_html::LANGUAGE.into(),
            tree_sitter_html::HIGHLIGHTS_QUERY,
        );
        configs.insert("html", html.clone());
        configs.insert("htm", html);

        let css = LanguageConfig::new(
            tree_sitter_css::LANGUAGE.into(),
            tree_sitter_css::HIGHLIGHTS_QUERY,
        );
        configs.insert("css", css);

        let bash = LanguageConfig::new(
            tree_sitter_bash::LANGUAGE.into(),
            tree_sitter_bash::HIGHLIGHT_QUERY,
        );
        configs.insert("sh", bash.clone());
        configs.insert("bash", bash.clone());
        configs.insert("zsh", bash);

        Self { configs }
    }

    /// Looks up a configuration by file extension, with or without the
    /// leading dot.
    pub fn config_for_extension(&self, ext: &str) -> Option<&LanguageConfig> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        self.configs.get(ext)
    }

    /// Looks up a configuration by language name ("rust", "python",
    /// "shell"). Unknown names fall through to the extension table, so
    /// extension-style names also resolve.
    pub fn config_for_language_name(&self, name: &str) -> Option<&LanguageConfig> {
        let name = name.to_lowercase();
        let ext = match name.trim() {
            "rust" => "rs",
            "python" => "py",
            "javascript" | "js" => "js",
            "json" => "json",
            "html" => "html",
            "css" => "css",
            "bash" | "shell" | "sh" => "sh",
            "c" => "c",
            other => other,
        };
        self.config_for_extension(ext)
    }

    pub fn supported_extensions(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().copied()
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::new()
    }
}
