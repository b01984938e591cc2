use ragdesk_core::render_markdown;

#[test]
fn renders_common_markdown() {
    assert_eq!(render_markdown("**bold**"), "<p><strong>bold</strong></p>\n");
    let list = render_markdown("- one\n- two\n");
    assert!(list.contains("<ul>"));
    assert!(list.contains("<li>two</li>"));
}

#[test]
fn raw_html_blocks_are_escaped() {
    let html = render_markdown("<script>alert(1)</script>\n");
    assert!(!html.contains("<script"));
    assert!(html.contains("&lt;script&gt;"));
}

#[test]
fn inline_html_is_escaped() {
    let html = render_markdown("range is <span style=\"x\">300</span> miles");
    assert!(!html.contains("<span"));
    assert!(html.contains("&lt;span"));
}

#[test]
fn unsafe_links_are_neutralized() {
    let html = render_markdown("[click](javascript:alert(1)) ![img](data:image/png;base64,AA)");
    assert!(!html.contains("javascript:"));
    assert!(!html.contains("data:"));
    assert!(html.contains("href=\"#\""));
}

#[test]
fn safe_links_survive() {
    let html = render_markdown("[manual](https://example.com/manual.pdf)");
    assert!(html.contains("href=\"https://example.com/manual.pdf\""));
}
