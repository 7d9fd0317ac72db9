//! Asset minification for CSS, HTML and JS.
//!
//! Uses lightningcss for stylesheets, minify-html for markup and oxc for
//! scripts. Every function here is pure: text in, text out.

use lightningcss::properties::Property;
use lightningcss::rules::{CssRule, CssRuleList};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use super::{AssetKind, ProcessingOptions};

/// Line length after which `wrap` breaks stylesheet output.
pub const WRAP_WIDTH: usize = 80;

/// Stylesheet-specific switches.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssOptions {
    pub wrap: bool,
    pub keep_comments: bool,
    pub sort: bool,
}

impl From<&ProcessingOptions> for CssOptions {
    fn from(options: &ProcessingOptions) -> Self {
        Self {
            wrap: options.wrap,
            keep_comments: options.keep_comments,
            sort: options.sort_properties,
        }
    }
}

/// Minify with the minifier matching `kind`.
///
/// Returns `None` when the minifier cannot parse the input.
pub fn minify(kind: AssetKind, source: &str, options: &ProcessingOptions) -> Option<String> {
    match kind {
        AssetKind::Stylesheet => minify_css(source, CssOptions::from(options)),
        AssetKind::Markup => Some(minify_html(source, options.keep_comments)),
        AssetKind::Script => minify_js(source),
    }
}

/// Minify JavaScript source code.
///
/// Parses as an ES module first and falls back to a classic script.
pub fn minify_js(source: &str) -> Option<String> {
    let module = SourceType::mjs();
    minify_js_as(source, module).or_else(|| minify_js_as(source, module.with_module(false)))
}

fn minify_js_as(source: &str, source_type: SourceType) -> Option<String> {
    let allocator = Allocator::default();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        return None;
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Some(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str, options: CssOptions) -> Option<String> {
    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default()).ok()?;
    if options.sort {
        sort_rules(&mut stylesheet.rules);
    }
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .ok()?;

    let mut code = result.code;
    if options.wrap {
        code = wrap_lines(&code, WRAP_WIDTH);
    }
    if options.keep_comments {
        let banner = leading_comments(source);
        if !banner.is_empty() {
            code = format!("{}{}", banner.concat(), code);
        }
    }
    Some(code)
}

/// Minify HTML source code.
pub fn minify_html(source: &str, keep_comments: bool) -> String {
    let mut cfg = minify_html::Cfg::new();
    cfg.keep_comments = keep_comments;
    cfg.minify_css = true;
    cfg.minify_js = true;
    let out = minify_html::minify(source.as_bytes(), &cfg);
    String::from_utf8_lossy(&out).into_owned()
}

/// Sort declarations by property name in every style rule, recursively.
fn sort_rules<R>(rules: &mut CssRuleList<'_, R>) {
    for rule in rules.0.iter_mut() {
        match rule {
            CssRule::Style(style) => {
                sort_declarations(&mut style.declarations.declarations);
                sort_declarations(&mut style.declarations.important_declarations);
                sort_rules(&mut style.rules);
            }
            CssRule::Media(media) => sort_rules(&mut media.rules),
            CssRule::Supports(supports) => sort_rules(&mut supports.rules),
            _ => {}
        }
    }
}

fn sort_declarations(declarations: &mut [Property<'_>]) {
    declarations.sort_by_cached_key(|p| p.property_id().name().to_string());
}

/// Break after `}` once the current line is at least `width` chars long.
fn wrap_lines(css: &str, width: usize) -> String {
    let mut out = String::with_capacity(css.len() + css.len() / width);
    let mut line_len = 0;
    for ch in css.chars() {
        out.push(ch);
        line_len += 1;
        if ch == '}' && line_len >= width {
            out.push('\n');
            line_len = 0;
        }
    }
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

/// `/* ... */` comments at the very top of a stylesheet.
///
/// License comments (`/*!`) are skipped: lightningcss prints those itself.
fn leading_comments(source: &str) -> Vec<&str> {
    let mut comments = Vec::new();
    let mut rest = source.trim_start();
    while rest.starts_with("/*") {
        let Some(end) = rest[2..].find("*/") else {
            break;
        };
        let comment = &rest[..end + 4];
        if !comment.starts_with("/*!") {
            comments.push(comment);
        }
        rest = rest[end + 4..].trim_start();
    }
    comments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_css_basic() {
        let out = minify_css("a {\n  color: red;\n}\n", CssOptions::default()).unwrap();
        assert_eq!(out, "a{color:red}");
    }

    #[test]
    fn test_minify_css_invalid() {
        assert!(minify_css("%%% { color: red; }", CssOptions::default()).is_none());
    }

    #[test]
    fn test_minify_css_sort() {
        let source = "a { z-index: 1; color: red; }";
        let plain = minify_css(source, CssOptions::default()).unwrap();
        assert_eq!(plain, "a{z-index:1;color:red}");

        let sorted = minify_css(
            source,
            CssOptions {
                sort: true,
                ..CssOptions::default()
            },
        )
        .unwrap();
        assert_eq!(sorted, "a{color:red;z-index:1}");
    }

    #[test]
    fn test_minify_css_sort_inside_media() {
        let source = "@media screen { a { z-index: 1; color: red; } }";
        let sorted = minify_css(
            source,
            CssOptions {
                sort: true,
                ..CssOptions::default()
            },
        )
        .unwrap();
        assert!(sorted.contains("a{color:red;z-index:1}"));
    }

    #[test]
    fn test_minify_css_keep_comments() {
        let source = "/* banner */\na { color: red; }";
        let stripped = minify_css(source, CssOptions::default()).unwrap();
        assert!(!stripped.contains("banner"));

        let kept = minify_css(
            source,
            CssOptions {
                keep_comments: true,
                ..CssOptions::default()
            },
        )
        .unwrap();
        assert!(kept.starts_with("/* banner */"));
        assert!(kept.ends_with("a{color:red}"));
    }

    #[test]
    fn test_wrap_lines() {
        let css: String = (0..40).map(|i| format!(".c{i}{{color:red}}")).collect();
        let wrapped = wrap_lines(&css, WRAP_WIDTH);
        assert_eq!(wrapped.replace('\n', ""), css);

        let lines: Vec<_> = wrapped.lines().collect();
        assert!(lines.len() > 1);
        for line in &lines[..lines.len() - 1] {
            assert!(line.ends_with('}'));
            assert!(line.len() >= WRAP_WIDTH);
        }
    }

    #[test]
    fn test_wrap_breaks_when_width_reached() {
        // 10 rules of 8 chars: the 10th `}` lands exactly on column 80
        let css = "a{top:0}".repeat(11);
        let wrapped = wrap_lines(&css, WRAP_WIDTH);
        assert_eq!(wrapped.lines().next().unwrap().len(), WRAP_WIDTH);
        assert_eq!(wrapped.lines().count(), 2);
    }

    #[test]
    fn test_wrap_short_input_untouched() {
        assert_eq!(wrap_lines("a{color:red}", WRAP_WIDTH), "a{color:red}");
    }

    #[test]
    fn test_leading_comments() {
        let source = "  /* one */ /*! license */\n/* two */ a{} /* later */";
        assert_eq!(leading_comments(source), vec!["/* one */", "/* two */"]);
        assert!(leading_comments("/* unterminated").is_empty());
    }

    #[test]
    fn test_minify_html_comments() {
        let source = "<p>  hello   world  </p>\n<!-- note -->\n";
        let out = minify_html(source, false);
        assert!(out.contains("hello world"));
        assert!(!out.contains("note"));

        let kept = minify_html(source, true);
        assert!(kept.contains("note"));
    }

    #[test]
    fn test_minify_js() {
        let source = "function add(first, second) {\n  return first + second;\n}\nconsole.log(add(1, 2));\n";
        let out = minify_js(source).unwrap();
        assert!(out.len() < source.len());
        assert!(!out.contains("second"));
    }

    #[test]
    fn test_minify_js_classic_script() {
        // `with` is only legal outside strict/module code
        let out = minify_js("with (obj) { value = 1; }").unwrap();
        assert!(out.contains("with"));
    }

    #[test]
    fn test_minify_js_invalid() {
        assert!(minify_js("function (").is_none());
    }

    #[test]
    fn test_dispatch_by_kind() {
        let options = ProcessingOptions::default();
        assert_eq!(
            minify(AssetKind::Stylesheet, "a { color: red; }", &options).as_deref(),
            Some("a{color:red}")
        );
        assert!(minify(AssetKind::Script, "let x = 1;", &options).is_some());
        assert!(minify(AssetKind::Markup, "<p>hi</p>", &options).is_some());
    }
}
