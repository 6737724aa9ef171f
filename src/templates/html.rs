//! Head tags injected into the entry HTML page.

const HEAD_CLOSE: &str = "</head>";

/// Returns `html` with deployment tags inserted before the first `</head>`.
///
/// Adds cache-control meta, preload hints for `js/main.js` and
/// `css/style.css` when present in the build, a preconnect per CDN origin and
/// a viewport meta unless one exists. Pages without `</head>` are returned
/// unchanged, as are pages that already carry the tags.
pub fn inject_head_tags(
    html: &str,
    has_main_js: bool,
    has_main_css: bool,
    cdn_origins: &[String],
) -> String {
    let Some(index) = find_ignore_case(html, HEAD_CLOSE) else {
        return html.to_string();
    };

    let mut tags = Vec::new();
    if !html.contains("http-equiv=\"Cache-Control\"") {
        tags.push(
            r#"<meta http-equiv="Cache-Control" content="no-cache, no-store, must-revalidate">"#
                .to_string(),
        );
    }
    if has_main_js && !html.contains(r#"href="js/main.js""#) {
        tags.push(r#"<link rel="preload" href="js/main.js" as="script">"#.to_string());
    }
    if has_main_css && !html.contains(r#"href="css/style.css" as="style""#) {
        tags.push(r#"<link rel="preload" href="css/style.css" as="style">"#.to_string());
    }
    for origin in cdn_origins {
        let tag = format!(r#"<link rel="preconnect" href="{}">"#, origin);
        if !html.contains(&tag) {
            tags.push(tag);
        }
    }
    if find_ignore_case(html, "name=\"viewport\"").is_none() {
        tags.push(
            r#"<meta name="viewport" content="width=device-width, initial-scale=1.0">"#
                .to_string(),
        );
    }

    if tags.is_empty() {
        return html.to_string();
    }

    let block: String = tags.iter().map(|t| format!("    {}\n", t)).collect();
    format!("{}{}{}", &html[..index], block, &html[index..])
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "<html>\n<head>\n<title>Tower</title>\n</head>\n<body></body>\n</html>\n";

    #[test]
    fn test_injects_before_head_close() {
        let out = inject_head_tags(
            PAGE,
            true,
            false,
            &["https://cdn.skypack.dev".to_string()],
        );

        let head_close = out.find("</head>").unwrap();
        let preload = out.find(r#"href="js/main.js""#).unwrap();
        assert!(preload < head_close);
        assert!(out.contains(r#"<link rel="preconnect" href="https://cdn.skypack.dev">"#));
        assert!(out.contains("name=\"viewport\""));
        assert!(!out.contains("css/style.css"));
        assert!(out.contains("<title>Tower</title>"));
    }

    #[test]
    fn test_keeps_existing_viewport() {
        let page = PAGE.replace(
            "<title>",
            "<meta name=\"viewport\" content=\"width=device-width\">\n<title>",
        );
        let out = inject_head_tags(&page, false, false, &[]);
        assert_eq!(out.matches("name=\"viewport\"").count(), 1);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let once = inject_head_tags(PAGE, true, true, &[]);
        let twice = inject_head_tags(&once, true, true, &[]);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_page_without_head_is_unchanged() {
        let page = "<p>fragment</p>";
        assert_eq!(inject_head_tags(page, true, true, &[]), page);
    }
}
