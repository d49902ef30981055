//! Cleanup of WordPress post content.
//!
//! Content still carries Divi page-builder shortcodes from the old theme.
//! Everything here is a best-effort text rewrite over trusted CMS output:
//! the functions are total and never fail, malformed input just produces
//! imperfect output.

use crate::domain::model::NormalizedContent;
use regex::{Captures, Regex};
use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

pub const DEFAULT_EXCERPT_LENGTH: usize = 160;
pub const ELLIPSIS: &str = "...";

/// Upper bound for repeat-until-stable passes over nested markup.
const MAX_PASSES: usize = 8;

macro_rules! regex {
    ($name:ident, $pattern:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new($pattern).expect(concat!(stringify!($name), " regex should compile"))
        });
    };
}

regex!(BUILDER_WRAPPER_OPEN, r#"(?i)<div\b[^>]*\bclass\s*=\s*["']\s*et_pb_[^>]*>"#);
regex!(CONTAINER_CLOSE, r"(?i)</div\s*>");
regex!(
    LAYOUT_MARKER,
    r"\[/?et_pb_(?:section|row_inner|row|column_inner|column)\b[^\]]*\]"
);
regex!(TEXT_BLOCK, r"(?s)\[et_pb_text\b[^\]]*\](.*?)\[/et_pb_text\]");
regex!(IMAGE_MARKER, r"\[et_pb_image\b([^\]]*)\](?:\s*\[/et_pb_image\])?");
regex!(BUTTON_MARKER, r"\[et_pb_button\b([^\]]*)\](?:\s*\[/et_pb_button\])?");
regex!(CODE_BLOCK, r"(?s)\[et_pb_code\b[^\]]*\](.*?)\[/et_pb_code\]");
regex!(
    ACCORDION_ITEM,
    r"(?s)\[et_pb_accordion_item\b([^\]]*)\](.*?)\[/et_pb_accordion_item\]"
);
regex!(TAB_ITEM, r"(?s)\[et_pb_tab\b([^\]]*)\](.*?)\[/et_pb_tab\]");
regex!(ITEM_CONTAINER, r"\[/?et_pb_(?:accordion|tabs)\b[^\]]*\]");
regex!(BUILDER_MARKER, r"\[/?et_pb_[^\]]*\]");
regex!(OPENING_MARKER, r"\[([A-Za-z][\w-]*)(?:\s[^\]]*)?\]");
regex!(ANY_MARKER, r"\[[^\]]*\]");
regex!(NUMERIC_ENTITY, r"&#([0-9]+);?");
regex!(BLANK_LINES, r"(?:[ \t]*\r?\n){3,}");
regex!(SPACE_RUN, r" {3,}");
regex!(EMPTY_PARAGRAPH, r"(?i)<p\b[^>]*>(?:\s|&nbsp;)*</p\s*>");
regex!(
    ATTRIBUTE,
    r#"([A-Za-z_][\w-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"']+))"#
);

regex!(SCRIPT_BLOCK, r"(?is)<script\b[^>]*>.*?</script\s*>");
regex!(STYLE_BLOCK, r"(?is)<style\b[^>]*>.*?</style\s*>");
regex!(OPENING_TAG, r#"<[A-Za-z](?:[^>"']|"[^"]*"|'[^']*')*>"#);
regex!(
    EVENT_HANDLER,
    r#"(?i)\s+on[a-z]+\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+)"#
);

regex!(TAG, r"<[^>]*>");
regex!(WHITESPACE, r"\s+");

/// Parses `key="value"` pairs out of a shortcode's attribute text.
///
/// WordPress' texturizer sometimes rewrites the quotes to `&#8221;`, so those
/// are folded back to plain quotes first.
fn parse_attributes(raw: &str) -> HashMap<String, String> {
    let raw = raw
        .replace("&#8221;", "\"")
        .replace("&#8243;", "\"")
        .replace(['\u{201d}', '\u{2033}'], "\"");

    ATTRIBUTE
        .captures_iter(&raw)
        .filter_map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
            Some((caps[1].to_string(), value.as_str().to_string()))
        })
        .collect()
}

fn replace_until_stable(input: String, re: &Regex, replacement: &str) -> String {
    let mut current = input;
    for _ in 0..MAX_PASSES {
        let next = re.replace_all(&current, replacement).into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn unwrap_titled_item(caps: &Captures) -> String {
    let attributes = parse_attributes(&caps[1]);
    match attributes.get("title").filter(|t| !t.trim().is_empty()) {
        Some(title) => format!("<h3>{}</h3>{}", title.trim(), &caps[2]),
        None => caps[2].to_string(),
    }
}

/// Unwraps `[name ...]inner[/name]` pairs whose names match.
fn unwrap_generic_pairs(input: String) -> String {
    let names: BTreeSet<String> = OPENING_MARKER
        .captures_iter(&input)
        .map(|caps| caps[1].to_string())
        .filter(|name| input.contains(&format!("[/{}]", name)))
        .collect();

    names.into_iter().fold(input, |text, name| {
        let pattern = format!(
            r"(?s)\[{0}(?:\s[^\]]*)?\](.*?)\[/{0}\]",
            regex::escape(&name)
        );
        match Regex::new(&pattern) {
            Ok(re) => replace_until_stable(text, &re, "${1}"),
            Err(_) => text,
        }
    })
}

/// Folds texturized quotes and guillemets back to plain characters. The
/// trailing `;` is optional since the stored content often lacks it.
pub fn normalize_numeric_entities(input: &str) -> String {
    NUMERIC_ENTITY
        .replace_all(input, |caps: &Captures| {
            match &caps[1] {
                "8220" | "8221" | "8243" => "\"",
                "8216" | "8217" | "8242" => "'",
                "171" => "\u{ab}",
                "187" => "\u{bb}",
                _ => return caps[0].to_string(),
            }
            .to_string()
        })
        .into_owned()
}

/// Only paragraphs: every `</div>` is already gone by the time this runs.
fn remove_empty_paragraphs(input: String) -> String {
    let mut current = input;
    for _ in 0..MAX_PASSES {
        let next = EMPTY_PARAGRAPH.replace_all(&current, "").into_owned();
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Strips page-builder shortcodes, keeping the content they wrap.
///
/// The rewrites run in a fixed order; later ones assume the earlier ones
/// already ran.
pub fn strip_legacy_shortcodes(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let text = BUILDER_WRAPPER_OPEN.replace_all(html, "");
    let text = CONTAINER_CLOSE.replace_all(&text, "");
    let text = LAYOUT_MARKER.replace_all(&text, "");
    let text = TEXT_BLOCK.replace_all(&text, "${1}");

    let text = IMAGE_MARKER.replace_all(&text, |caps: &Captures| {
        match parse_attributes(&caps[1]).get("src") {
            Some(src) => format!(r#"<img src="{}" alt="" />"#, src),
            None => caps[0].to_string(),
        }
    });

    let text = BUTTON_MARKER.replace_all(&text, |caps: &Captures| {
        let attributes = parse_attributes(&caps[1]);
        match (attributes.get("button_url"), attributes.get("button_text")) {
            (Some(url), Some(label)) => {
                format!(r#"<a href="{}" class="btn-primary">{}</a>"#, url, label)
            }
            _ => caps[0].to_string(),
        }
    });

    let text = CODE_BLOCK.replace_all(&text, "${1}");
    let text = ACCORDION_ITEM.replace_all(&text, unwrap_titled_item);
    let text = TAB_ITEM.replace_all(&text, unwrap_titled_item);
    let text = ITEM_CONTAINER.replace_all(&text, "");
    let text = BUILDER_MARKER.replace_all(&text, "");

    let text = unwrap_generic_pairs(text.into_owned());
    let text = ANY_MARKER.replace_all(&text, "");

    let text = normalize_numeric_entities(&text);
    let text = BLANK_LINES.replace_all(&text, "\n\n");
    let text = SPACE_RUN.replace_all(&text, " ");
    let text = remove_empty_paragraphs(text.into_owned());

    text.trim().to_string()
}

/// Drops script/style blocks and inline event handlers.
///
/// Not an allowlist sanitizer: the remaining markup is trusted CMS output.
pub fn sanitize_html(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let text = SCRIPT_BLOCK.replace_all(html, "");
    let text = STYLE_BLOCK.replace_all(&text, "");

    // handlers only count inside a tag; body text like `online=9` stays
    OPENING_TAG
        .replace_all(&text, |caps: &Captures| {
            EVENT_HANDLER.replace_all(&caps[0], "").into_owned()
        })
        .into_owned()
}

pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

pub fn extract_plain_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }

    let text = TAG.replace_all(html, "");
    let text = decode_entities(&text);
    WHITESPACE.replace_all(&text, " ").trim().to_string()
}

/// Plain-text excerpt cut at a character boundary, not a word boundary.
pub fn generate_excerpt(content: &str, max_length: usize) -> String {
    truncate_excerpt(&extract_plain_text(content), max_length)
}

/// Cuts text that is already plain. Never decodes again.
pub fn truncate_excerpt(plain: &str, max_length: usize) -> String {
    if plain.chars().count() <= max_length {
        return plain.to_string();
    }

    let truncated: String = plain.chars().take(max_length).collect();
    format!("{}{}", truncated.trim_end(), ELLIPSIS)
}

impl NormalizedContent {
    pub fn from_html(raw: &str, excerpt_length: usize) -> Self {
        let cleaned_html = sanitize_html(&strip_legacy_shortcodes(raw));
        let plain_text = extract_plain_text(&cleaned_html);
        let excerpt = generate_excerpt(&cleaned_html, excerpt_length);
        Self {
            cleaned_html,
            plain_text,
            excerpt,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_block_is_unwrapped() {
        assert_eq!(strip_legacy_shortcodes("[et_pb_text]Hello[/et_pb_text]"), "Hello");
        assert_eq!(
            strip_legacy_shortcodes(r#"[et_pb_text admin_label="Intro" _builder_version="4.9"]<p>Hola</p>[/et_pb_text]"#),
            "<p>Hola</p>"
        );
    }

    #[test]
    fn test_layout_markers_and_wrappers_removed() {
        let input = concat!(
            r#"<div class="et_pb_section et_pb_section_0">"#,
            r#"[et_pb_section fb_built="1"][et_pb_row][et_pb_column type="4_4"]"#,
            "<h2>Servicios</h2>",
            "[/et_pb_column][/et_pb_row][/et_pb_section]</div>"
        );
        assert_eq!(strip_legacy_shortcodes(input), "<h2>Servicios</h2>");
    }

    #[test]
    fn test_image_marker_becomes_img() {
        let input = r#"[et_pb_image src="https://web2025.ecomm360.net/wp-content/uploads/logo.png" align="center"][/et_pb_image]"#;
        assert_eq!(
            strip_legacy_shortcodes(input),
            r#"<img src="https://web2025.ecomm360.net/wp-content/uploads/logo.png" alt="" />"#
        );
    }

    #[test]
    fn test_image_with_texturized_quotes() {
        let input = "[et_pb_image src=&#8221;/img/a.png&#8221;]";
        assert_eq!(strip_legacy_shortcodes(input), r#"<img src="/img/a.png" alt="" />"#);
    }

    #[test]
    fn test_button_marker_becomes_cta() {
        let input = r#"[et_pb_button button_text="Contactar" button_url="/contacto" _builder_version="4.9"][/et_pb_button]"#;
        assert_eq!(
            strip_legacy_shortcodes(input),
            r#"<a href="/contacto" class="btn-primary">Contactar</a>"#
        );
    }

    #[test]
    fn test_button_without_url_is_removed() {
        assert_eq!(strip_legacy_shortcodes(r#"[et_pb_button button_text="Hola"]"#), "");
    }

    #[test]
    fn test_code_block_keeps_inner_content() {
        assert_eq!(
            strip_legacy_shortcodes("[et_pb_code]<iframe src=\"/mapa\"></iframe>[/et_pb_code]"),
            "<iframe src=\"/mapa\"></iframe>"
        );
    }

    #[test]
    fn test_accordion_items_become_headings() {
        let input = concat!(
            "[et_pb_accordion]",
            r#"[et_pb_accordion_item title="¿Qué es Magento?" open="on"]<p>Una plataforma.</p>[/et_pb_accordion_item]"#,
            r#"[et_pb_accordion_item title="¿Y Shopify?"]<p>Otra.</p>[/et_pb_accordion_item]"#,
            "[/et_pb_accordion]"
        );
        assert_eq!(
            strip_legacy_shortcodes(input),
            "<h3>¿Qué es Magento?</h3><p>Una plataforma.</p><h3>¿Y Shopify?</h3><p>Otra.</p>"
        );
    }

    #[test]
    fn test_tabs_become_headings() {
        let input = r#"[et_pb_tabs][et_pb_tab title="B2B"]Mayoristas[/et_pb_tab][et_pb_tab]Sin título[/et_pb_tab][/et_pb_tabs]"#;
        assert_eq!(strip_legacy_shortcodes(input), "<h3>B2B</h3>MayoristasSin título");
    }

    #[test]
    fn test_unknown_builder_markers_removed() {
        assert_eq!(
            strip_legacy_shortcodes(r#"A[et_pb_divider show_divider="on"]B[/et_pb_slider]C"#),
            "ABC"
        );
    }

    #[test]
    fn test_generic_pairs_unwrapped_and_orphans_removed() {
        assert_eq!(
            strip_legacy_shortcodes(r#"[caption id="a1"]<img src="/x.png" />Pie[/caption] [gallery ids="1,2"]"#),
            r#"<img src="/x.png" />Pie"#
        );
        assert_eq!(strip_legacy_shortcodes("[b][b]x[/b][/b]"), "x");
    }

    #[test]
    fn test_smart_quote_entities_normalized() {
        let output = strip_legacy_shortcodes(
            "[et_pb_text]<p>&#8220;Hola&#8221; &#8216;mundo&#8217; &#171;cita&#187;</p>[/et_pb_text]",
        );
        assert_eq!(output, "<p>\"Hola\" 'mundo' «cita»</p>");
        assert!(!output.contains("&#8221;"));
    }

    #[test]
    fn test_malformed_entities_without_semicolon() {
        assert_eq!(strip_legacy_shortcodes("&#8220Hola&#8221"), "\"Hola\"");
        assert_eq!(strip_legacy_shortcodes("&#1712;"), "&#1712;");
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            strip_legacy_shortcodes("uno\n\n\n\n\ndos   tres  cuatro"),
            "uno\n\ndos tres  cuatro"
        );
    }

    #[test]
    fn test_empty_elements_removed() {
        assert_eq!(
            strip_legacy_shortcodes("<p>Texto</p><p> </p><p class=\"x\">&nbsp;</p>[et_pb_text]<p></p>[/et_pb_text]"),
            "<p>Texto</p>"
        );
    }

    #[test]
    fn test_closing_divs_removed_unconditionally() {
        assert_eq!(
            strip_legacy_shortcodes("<div class=\"row\"><p>Hola</p></div>"),
            "<div class=\"row\"><p>Hola</p>"
        );
        assert_eq!(
            strip_legacy_shortcodes("<div class=\"spacer\"></div><p></p>"),
            "<div class=\"spacer\">"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(strip_legacy_shortcodes(""), "");
        assert_eq!(sanitize_html(""), "");
        assert_eq!(extract_plain_text(""), "");
        assert_eq!(generate_excerpt("", 10), "");
    }

    #[test]
    fn test_sanitize_removes_scripts_styles_and_handlers() {
        let input = concat!(
            "<p onclick=\"track()\">Hola</p>",
            "<script type=\"text/javascript\">alert(1)</script>",
            "<STYLE>.x{color:red}</STYLE>",
            "<img src=\"/a.png\" onerror='boom()' alt=\"a\">"
        );
        assert_eq!(sanitize_html(input), "<p>Hola</p><img src=\"/a.png\" alt=\"a\">");
    }

    #[test]
    fn test_handler_lookalikes_in_text_survive() {
        assert_eq!(sanitize_html("<p>Precio online=9</p>"), "<p>Precio online=9</p>");
        assert_eq!(
            sanitize_html(r#"<p>Escribe onclick="x" en el atributo</p>"#),
            r#"<p>Escribe onclick="x" en el atributo</p>"#
        );
    }

    #[test]
    fn test_handler_with_angle_bracket_in_value() {
        assert_eq!(
            sanitize_html(r#"<button onclick="if (a > b) go()" type="button">Ir</button>"#),
            r#"<button type="button">Ir</button>"#
        );
        assert_eq!(sanitize_html("<div onload=init>x</div>"), "<div>x</div>");
    }

    #[test]
    fn test_truncate_excerpt_does_not_decode() {
        assert_eq!(truncate_excerpt("a &lt;b&gt; <i>", 20), "a &lt;b&gt; <i>");
        assert_eq!(truncate_excerpt("Diseño ágil", 5), "Diseñ...");
    }

    #[test]
    fn test_sanitize_keeps_other_markup() {
        let input = r#"<a href="/contacto" class="btn-primary" data-online="1">Contactar</a>"#;
        assert_eq!(sanitize_html(input), input);
    }

    #[test]
    fn test_extract_plain_text() {
        assert_eq!(extract_plain_text("A&amp;B"), "A&B");
        assert_eq!(
            extract_plain_text("<p>Hola&nbsp;<b>mundo</b></p>\n\n  <p>&lt;tag&gt; &quot;x&quot; &#039;y&#039;</p>"),
            "Hola mundo <tag> \"x\" 'y'"
        );
        assert_eq!(extract_plain_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_generate_excerpt_truncates_at_char_boundary() {
        assert_eq!(generate_excerpt("<p>Hello <b>World</b></p>", 5), "Hello...");
        assert_eq!(generate_excerpt("<p>Hello World</p>", 6), "Hello...");
        assert_eq!(generate_excerpt("Diseño ágil", 5), "Diseñ...");
    }

    #[test]
    fn test_generate_excerpt_short_text_unchanged() {
        let short = "Agencia de comercio electrónico";
        assert_eq!(generate_excerpt(short, DEFAULT_EXCERPT_LENGTH), short);
        assert_eq!(generate_excerpt("<p>  Hola  </p>", 4), "Hola");
    }

    #[test]
    fn test_excerpt_length_bound() {
        let long = "palabra ".repeat(100);
        let excerpt = generate_excerpt(&long, DEFAULT_EXCERPT_LENGTH);
        assert!(excerpt.chars().count() <= DEFAULT_EXCERPT_LENGTH + ELLIPSIS.len());
        assert!(excerpt.ends_with(ELLIPSIS));
    }

    #[test]
    fn test_normalized_content_from_divi_html() {
        let raw = concat!(
            "[et_pb_section][et_pb_row][et_pb_column type=\"4_4\"]",
            "[et_pb_text]<p>&#8220;Vendemos&#8221; más</p><script>x()</script>[/et_pb_text]",
            "[/et_pb_column][/et_pb_row][/et_pb_section]"
        );
        let content = NormalizedContent::from_html(raw, 8);
        assert_eq!(content.cleaned_html, "<p>\"Vendemos\" más</p>");
        assert_eq!(content.plain_text, "\"Vendemos\" más");
        assert_eq!(content.excerpt, "\"Vendemo...");
        assert!(!content.cleaned_html.contains('['));
    }
}
